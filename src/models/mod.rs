//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que espejan los contratos
//! JSON del backend de renta de autos.

pub mod booking;
pub mod car;
pub mod catalog;
pub mod session;

pub use booking::{Booking, BookingStatus, CreateBookingRequest, PaymentStatus};
pub use car::{Car, CarStatus, CatalogRef, ResourceId};
pub use catalog::{Brand, CatalogSnapshot, Category};
pub use session::{Session, SessionUser, SharedSession};
