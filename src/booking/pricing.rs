//! Cálculo de precios de renta
//!
//! Este módulo contiene el cálculo de duración y total de una renta.
//! La misma regla de días alimenta la cotización del formulario y el
//! resumen del recibo; ninguna otra parte del cliente cuenta días.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Booking;
use crate::utils::errors::{validation_error, ApiResult};

/// Cotización derivada de los inputs visibles del formulario
///
/// Se recalcula sincrónicamente ante cualquier cambio de fecha o de tarifa,
/// así el total mostrado nunca queda desfasado.
#[derive(Debug, Clone, PartialEq)]
pub struct RentalQuote {
    pub days: i64,
    pub daily_rate: Decimal,
    pub total: Decimal,
}

/// Días facturables entre retiro y devolución
///
/// Regla exclusiva: `return − pickup`. Retiro y devolución el mismo día
/// son 0 días (sin cargo). Una devolución anterior al retiro se rechaza
/// con error de validación en lugar de tomar la diferencia absoluta.
pub fn rental_days(pickup_date: NaiveDate, return_date: NaiveDate) -> ApiResult<i64> {
    if return_date < pickup_date {
        return Err(validation_error(
            "return_date",
            "return date is before pickup date",
        ));
    }
    Ok((return_date - pickup_date).num_days())
}

/// Total de la renta, sin redondeo
pub fn rental_total(daily_rate: Decimal, days: i64) -> Decimal {
    daily_rate * Decimal::from(days)
}

/// Cotizar una renta completa a partir de la tarifa diaria y el rango
pub fn quote(daily_rate: Decimal, pickup_date: NaiveDate, return_date: NaiveDate) -> ApiResult<RentalQuote> {
    let days = rental_days(pickup_date, return_date)?;
    Ok(RentalQuote {
        days,
        daily_rate,
        total: rental_total(daily_rate, days),
    })
}

/// Formatear un monto para mostrar: 2 decimales, redondeo half-up
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "${:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Línea de resumen de un booking ya creado
///
/// Los montos salen del booking tal como los fijó el backend; sólo el
/// conteo de días se deriva, con la misma regla que la cotización.
pub fn receipt_summary(booking: &Booking) -> ApiResult<String> {
    let days = rental_days(booking.pickup_date, booking.return_date)?;
    Ok(format!(
        "{} día(s) — subtotal {}, impuestos {}, total {}",
        days,
        format_amount(booking.subtotal),
        format_amount(booking.tax_amount),
        format_amount(booking.total_price),
    ))
}
