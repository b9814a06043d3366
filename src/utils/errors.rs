//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del cliente
//! y los helpers para construirlos.

use thiserror::Error;

/// Errores principales del cliente
///
/// Las cuatro familias que puede producir una operación contra el backend:
/// fallo de transporte, fallo HTTP (status no-2xx), rechazo de aplicación
/// (2xx con `success: false`) y fallo de validación local.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl ApiError {
    /// Mensaje corto para mostrar al usuario junto a la acción que falló
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => "No se pudo contactar al servidor".to_string(),
            ApiError::Status { status, message } => {
                if message.is_empty() {
                    format!("El servidor respondió con error {}", status)
                } else {
                    message.clone()
                }
            }
            ApiError::Rejected(msg) => msg.clone(),
            ApiError::Validation(_) => "Los datos ingresados no son válidos".to_string(),
            ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::Conflict(msg) => msg.clone(),
        }
    }

    /// Indica si el error corresponde a una sesión inválida (HTTP 401)
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. } | ApiError::Unauthorized(_))
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type ApiResult<T> = Result<T, ApiError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> ApiError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("field".into(), &field);
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    ApiError::Validation(errors)
}

/// Función helper para crear errores de rechazo de aplicación
pub fn rejected_error(message: &str) -> ApiError {
    ApiError::Rejected(message.to_string())
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(operation: &str, reason: &str) -> ApiError {
    ApiError::Conflict(format!("Cannot {}: {}", operation, reason))
}

/// Función helper para crear errores de sesión
pub fn unauthorized_error(message: &str) -> ApiError {
    ApiError::Unauthorized(message.to_string())
}
