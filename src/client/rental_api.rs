//! Cliente HTTP para el backend de renta de autos
//!
//! Este módulo contiene el cliente HTTP tipado del marketplace: catálogo,
//! disponibilidad, reservas y pago. Cada llamada autenticada relee el token
//! de la sesión compartida en el momento de armar el request.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::BookingBackend;
use crate::config::EnvironmentConfig;
use crate::models::{
    Booking, Brand, Car, CatalogSnapshot, Category, CreateBookingRequest, ResourceId,
    SharedSession,
};
use crate::utils::errors::{rejected_error, unauthorized_error, ApiError, ApiResult};

/// Envelope `{data: ...}` de los endpoints de lectura
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Respuesta de `POST /check-availability`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

/// Envelope de `POST /bookings`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingEnvelope {
    pub success: bool,
    pub data: Option<Booking>,
    pub message: Option<String>,
}

/// Envelope de `POST /bookings/{id}/payment` (aceptador mock)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEnvelope {
    pub success: bool,
    pub message: Option<String>,
}

/// Body de `POST /check-availability`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub car_id: ResourceId,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// Cliente HTTP del marketplace de renta
pub struct RentalApi {
    client: Client,
    config: EnvironmentConfig,
    session: SharedSession,
}

impl RentalApi {
    /// Crear nuevo cliente con la configuración de entorno
    pub fn new(config: EnvironmentConfig, session: SharedSession) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    /// Releer el token de la sesión; las llamadas autenticadas fallan
    /// localmente si no hay sesión vigente
    async fn bearer_token(&self) -> ApiResult<String> {
        let session = self.session.read().await;
        match session.bearer_token() {
            Some(token) => Ok(token.to_string()),
            None => Err(unauthorized_error("No hay sesión activa")),
        }
    }

    /// Mapear una respuesta HTTP al resultado tipado
    ///
    /// Un status no-2xx es fallo aunque el body parsee como JSON; un 401
    /// además invalida la sesión compartida.
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("🧹 Respuesta 401: invalidando sesión");
            self.session.write().await.clear();
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|value| {
                    value
                        .get("message")
                        .and_then(|m| m.as_str())
                        .map(|m| m.to_string())
                })
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

            warn!("❌ HTTP {} del backend: {}", status.as_u16(), message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    /// Obtener el catálogo completo de autos (`GET /cars`)
    pub async fn list_cars(&self) -> ApiResult<Vec<Car>> {
        let url = self.config.endpoint("/cars");
        debug!("📤 GET {}", url);

        let response = self.client.get(&url).send().await?;
        let envelope: DataEnvelope<Vec<Car>> = self.handle_response(response).await?;

        for car in &envelope.data {
            if let Err(e) = car.validate_record() {
                warn!("⚠️ Car '{}' con registro inválido: {}", car.id, e);
            }
        }

        Ok(envelope.data)
    }

    /// Obtener un auto por id (`GET /cars/{id}`)
    pub async fn get_car(&self, id: &ResourceId) -> ApiResult<Car> {
        let url = self.config.endpoint(&format!("/cars/{}", id));
        debug!("📤 GET {}", url);

        let response = self.client.get(&url).send().await?;
        let envelope: DataEnvelope<Car> = self.handle_response(response).await?;
        Ok(envelope.data)
    }

    /// Obtener las brands (`GET /brands`)
    pub async fn list_brands(&self) -> ApiResult<Vec<Brand>> {
        let url = self.config.endpoint("/brands");
        debug!("📤 GET {}", url);

        let response = self.client.get(&url).send().await?;
        let envelope: DataEnvelope<Vec<Brand>> = self.handle_response(response).await?;
        Ok(envelope.data)
    }

    /// Obtener las categories (`GET /categories`)
    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let url = self.config.endpoint("/categories");
        debug!("📤 GET {}", url);

        let response = self.client.get(&url).send().await?;
        let envelope: DataEnvelope<Vec<Category>> = self.handle_response(response).await?;
        Ok(envelope.data)
    }

    /// Cargar el snapshot de catálogo para la vista de búsqueda
    ///
    /// Brands y categories se piden lado a lado; los autos primero porque
    /// de ellos se derivan las facetas.
    pub async fn load_catalog(&self) -> ApiResult<CatalogSnapshot> {
        let cars = self.list_cars().await?;
        let (brands, categories) =
            futures::future::join(self.list_brands(), self.list_categories()).await;

        Ok(CatalogSnapshot {
            cars,
            brands: brands?,
            categories: categories?,
        })
    }

    /// Pagar una reserva (`POST /bookings/{id}/payment`)
    pub async fn pay_booking(&self, booking_id: &ResourceId) -> ApiResult<String> {
        let token = self.bearer_token().await?;
        let url = self.config.endpoint(&format!("/bookings/{}/payment", booking_id));
        debug!("📤 POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let envelope: PaymentEnvelope = self.handle_response(response).await?;
        if !envelope.success {
            return Err(rejected_error(
                envelope.message.as_deref().unwrap_or("Payment was not accepted"),
            ));
        }

        Ok(envelope
            .message
            .unwrap_or_else(|| "Pago registrado".to_string()))
    }
}

#[async_trait]
impl BookingBackend for RentalApi {
    async fn check_availability(
        &self,
        car_id: &ResourceId,
        pickup_date: NaiveDate,
        return_date: NaiveDate,
    ) -> ApiResult<bool> {
        let token = self.bearer_token().await?;
        let url = self.config.endpoint("/check-availability");
        debug!("📤 POST {} para car {}", url, car_id);

        let body = AvailabilityRequest {
            car_id: car_id.clone(),
            pickup_date,
            return_date,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let parsed: AvailabilityResponse = self.handle_response(response).await?;
        Ok(parsed.available)
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ApiResult<Booking> {
        let token = self.bearer_token().await?;
        let url = self.config.endpoint("/bookings");
        debug!("📤 POST {} para car {}", url, request.car_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let envelope: BookingEnvelope = self.handle_response(response).await?;
        if !envelope.success {
            return Err(rejected_error(
                envelope.message.as_deref().unwrap_or("Booking was rejected"),
            ));
        }

        envelope
            .data
            .ok_or_else(|| rejected_error("Booking response did not include data"))
    }
}
