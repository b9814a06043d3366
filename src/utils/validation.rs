//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use serde::Serialize;
use validator::ValidationError;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_digit(10)).collect::<String>();
    if clean_phone.len() < 10 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + std::fmt::Display + Serialize>(
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}
