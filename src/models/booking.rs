//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking con su ciclo de vida de estados,
//! el estado de pago y el request para crear reservas.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::car::ResourceId;

/// Estado de la reserva - sólo avanza, salvo la cancelación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    fn rank(self) -> u8 {
        match self {
            BookingStatus::Pending => 0,
            BookingStatus::Confirmed => 1,
            BookingStatus::Active => 2,
            BookingStatus::Completed => 3,
            BookingStatus::Cancelled => 4,
        }
    }

    /// Reglas de transición: hacia adelante únicamente, y `Cancelled`
    /// sólo es alcanzable desde pending/confirmed/active.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        match next {
            BookingStatus::Cancelled => matches!(
                self,
                BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Active
            ),
            _ => {
                self != BookingStatus::Cancelled
                    && self != BookingStatus::Completed
                    && next.rank() > self.rank()
            }
        }
    }

    pub fn is_cancellable(self) -> bool {
        self.can_transition_to(BookingStatus::Cancelled)
    }
}

/// Estado del pago de la reserva
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Failed,
}

/// Booking tal como lo entrega el backend
///
/// Los montos se fijan en la creación (subtotal = precio diario × días,
/// total = subtotal + impuestos) y el cliente nunca los recalcula.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: ResourceId,
    pub car_id: ResourceId,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub pickup_location: String,
    pub return_location: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pickup_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub returned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
}

impl Booking {
    /// Invariante de montos: total = subtotal + impuestos
    pub fn amounts_consistent(&self) -> bool {
        self.total_price == self.subtotal + self.tax_amount
    }
}

/// Request para crear una reserva (`POST /bookings`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub car_id: ResourceId,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,

    #[validate(length(min = 1, message = "El punto de retiro es requerido"))]
    pub pickup_location: String,

    #[validate(length(min = 1, message = "El punto de devolución es requerido"))]
    pub return_location: String,

    #[validate(length(min = 2, max = 100))]
    pub customer_name: String,

    #[validate(email)]
    pub customer_email: String,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub customer_phone: String,

    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_only_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Active));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Active.can_transition_to(BookingStatus::Confirmed));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Active));
    }

    #[test]
    fn test_cancellation_reachability() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Active.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Completed.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_create_booking_request_validation() {
        let request = CreateBookingRequest {
            car_id: ResourceId::Numeric(12),
            pickup_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            pickup_location: "Sucursal Centro".to_string(),
            return_location: "Aeropuerto".to_string(),
            customer_name: "Ana Torres".to_string(),
            customer_email: "ana@example.com".to_string(),
            customer_phone: "5512345678".to_string(),
            notes: None,
        };
        assert!(request.validate().is_ok());

        let mut missing_location = request.clone();
        missing_location.pickup_location = String::new();
        assert!(missing_location.validate().is_err());

        let mut bad_email = request;
        bad_email.customer_email = "ana-example".to_string();
        assert!(bad_email.validate().is_err());
    }
}
