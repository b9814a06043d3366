//! Cliente HTTP del backend de renta
//!
//! Este módulo contiene el cliente tipado del backend REST y el trait
//! con las operaciones que consume el flujo de reserva.

pub mod rental_api;

pub use rental_api::RentalApi;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Booking, CreateBookingRequest, ResourceId};
use crate::utils::errors::ApiResult;

/// Operaciones del backend que el formulario de reserva necesita
///
/// El cliente real las implementa contra la red; los tests las implementan
/// con respuestas guionadas.
#[async_trait]
pub trait BookingBackend {
    /// Consultar si el auto está libre en el rango de fechas
    async fn check_availability(
        &self,
        car_id: &ResourceId,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> ApiResult<bool>;

    /// Crear la reserva
    async fn create_booking(&self, request: &CreateBookingRequest) -> ApiResult<Booking>;
}
