//! Chequeo de disponibilidad
//!
//! Este módulo consulta al backend si un auto está libre en un rango de
//! fechas y reduce el resultado al veredicto que gobierna el formulario.

use chrono::NaiveDate;
use tracing::warn;

use crate::client::BookingBackend;
use crate::models::ResourceId;
use crate::utils::errors::ApiResult;

use super::pricing::rental_days;

/// Veredicto de disponibilidad visto desde el formulario
///
/// Un fallo de red o de HTTP gatea igual que `available: false`; sólo
/// cambia el mensaje que se muestra.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    Unknown,
    Available,
    Unavailable { message: String },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Consultar la disponibilidad de un auto para un rango de fechas
///
/// El rango se valida localmente antes de tocar la red; un rango inválido
/// es error de validación, no un veredicto.
pub async fn check_car<B: BookingBackend + ?Sized>(
    backend: &B,
    car_id: &ResourceId,
    pickup_date: NaiveDate,
    return_date: NaiveDate,
) -> ApiResult<Availability> {
    rental_days(pickup_date, return_date)?;

    match backend.check_availability(car_id, pickup_date, return_date).await {
        Ok(true) => Ok(Availability::Available),
        Ok(false) => Ok(Availability::Unavailable {
            message: "El auto no está disponible en esas fechas".to_string(),
        }),
        Err(e) => {
            warn!("⚠️ Chequeo de disponibilidad falló para car {}: {}", car_id, e);
            Ok(Availability::Unavailable {
                message: e.user_message(),
            })
        }
    }
}
