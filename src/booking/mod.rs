//! Flujo de reserva
//!
//! Este módulo contiene el núcleo del flujo de reserva: precios,
//! disponibilidad y la máquina de estados del formulario.

pub mod availability;
pub mod form;
pub mod pricing;

pub use availability::{check_car, Availability};
pub use form::{BookingDetails, BookingForm, FormState};
pub use pricing::{format_amount, quote, rental_days, rental_total, RentalQuote};
