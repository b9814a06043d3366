//! Cliente del marketplace de renta de autos
//!
//! Biblioteca con el núcleo del lado cliente: el cliente HTTP tipado del
//! backend REST, el filtro del catálogo, el cálculo de precios y la máquina
//! de estados del formulario de reserva.

pub mod booking;
pub mod catalog;
pub mod client;
pub mod config;
pub mod models;
pub mod utils;

pub use client::{BookingBackend, RentalApi};
pub use utils::errors::{ApiError, ApiResult};
