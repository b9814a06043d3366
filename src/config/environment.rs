//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    /// URL base del backend REST, sin slash final
    pub api_base_url: String,
    /// Timeout de cada request HTTP en segundos
    pub request_timeout_secs: u64,
    /// Token bearer precargado (la obtención del token es del colaborador de auth)
    pub api_token: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            api_base_url: env::var("CAR_RENTAL_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout_secs: env::var("CAR_RENTAL_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("CAR_RENTAL_TIMEOUT_SECS must be a valid number"),
            api_token: env::var("CAR_RENTAL_API_TOKEN").ok(),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Construir la URL completa de un endpoint
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let config = EnvironmentConfig {
            environment: "test".to_string(),
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: 30,
            api_token: None,
        };
        assert_eq!(config.endpoint("/cars"), "http://localhost:8000/api/cars");
        assert_eq!(config.endpoint("cars/12"), "http://localhost:8000/api/cars/12");
    }
}
