//! Formulario de reserva
//!
//! Este módulo contiene la máquina de estados del formulario multi-paso:
//! fechas → disponibilidad → datos del cliente → resumen → envío.
//!
//! Las llamadas asíncronas se modelan con tickets begin/apply: `begin_*`
//! toma una foto de los inputs y `apply_*` descarta resultados que llegan
//! después de que el formulario cambió (guard contra resultados viejos).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::client::BookingBackend;
use crate::models::{Booking, Car, CreateBookingRequest, ResourceId};
use crate::utils::errors::{conflict_error, validation_error, ApiResult};

use super::availability::{check_car, Availability};
use super::pricing::{quote, rental_days, RentalQuote};

/// Estados del formulario
///
/// "Listo para enviar" no es un estado almacenado: se deriva validando la
/// foto actual de los datos (ver [`BookingForm::is_ready_to_submit`]).
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    EnteringDates,
    AvailabilityUnknown,
    Available,
    Unavailable { message: String },
    Submitting,
    Submitted { booking: Booking },
    Failed { message: String },
}

/// Datos de retiro/devolución y del cliente
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BookingDetails {
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

/// Ticket de un chequeo de disponibilidad en vuelo
#[derive(Debug)]
pub struct PendingCheck {
    generation: u64,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
}

/// Ticket de un envío de reserva en vuelo
#[derive(Debug)]
pub struct PendingSubmit {
    pub request: CreateBookingRequest,
}

/// Máquina de estados del formulario de reserva de un auto
pub struct BookingForm {
    car: Car,
    pickup_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    details: BookingDetails,
    state: FormState,
    generation: u64,
}

impl BookingForm {
    pub fn new(car: Car) -> Self {
        Self {
            car,
            pickup_date: None,
            return_date: None,
            details: BookingDetails::default(),
            state: FormState::EnteringDates,
            generation: 0,
        }
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn pickup_date(&self) -> Option<NaiveDate> {
        self.pickup_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn details(&self) -> &BookingDetails {
        &self.details
    }

    /// Id del booking creado, si el envío ya fue aceptado
    pub fn booking_id(&self) -> Option<&ResourceId> {
        match &self.state {
            FormState::Submitted { booking } => Some(&booking.id),
            _ => None,
        }
    }

    fn reset_availability(&mut self) {
        self.generation += 1;
        self.state = if self.pickup_date.is_some() && self.return_date.is_some() {
            FormState::AvailabilityUnknown
        } else {
            FormState::EnteringDates
        };
    }

    /// Cambiar la fecha de retiro
    ///
    /// Cualquier edición de fecha invalida el veredicto anterior: el
    /// formulario vuelve a `AvailabilityUnknown` y exige re-chequear.
    pub fn set_pickup_date(&mut self, date: NaiveDate) -> ApiResult<()> {
        if self.state == FormState::Submitting {
            return Err(conflict_error("editar fechas", "hay un envío en curso"));
        }
        self.pickup_date = Some(date);
        self.reset_availability();
        Ok(())
    }

    /// Cambiar la fecha de devolución
    pub fn set_return_date(&mut self, date: NaiveDate) -> ApiResult<()> {
        if self.state == FormState::Submitting {
            return Err(conflict_error("editar fechas", "hay un envío en curso"));
        }
        self.return_date = Some(date);
        self.reset_availability();
        Ok(())
    }

    /// Cotización derivada sincrónicamente de los inputs actuales
    pub fn quote(&self) -> ApiResult<RentalQuote> {
        let (pickup, ret) = self.require_dates()?;
        quote(self.daily_rate(), pickup, ret)
    }

    fn daily_rate(&self) -> Decimal {
        self.car.price
    }

    fn require_dates(&self) -> ApiResult<(NaiveDate, NaiveDate)> {
        match (self.pickup_date, self.return_date) {
            (Some(pickup), Some(ret)) => Ok((pickup, ret)),
            _ => Err(validation_error("dates", "pickup and return dates are required")),
        }
    }

    /// Iniciar un chequeo de disponibilidad sobre las fechas actuales
    pub fn begin_availability_check(&mut self) -> ApiResult<PendingCheck> {
        if self.state == FormState::Submitting {
            return Err(conflict_error("chequear disponibilidad", "hay un envío en curso"));
        }
        let (pickup_date, return_date) = self.require_dates()?;
        rental_days(pickup_date, return_date)?;

        self.state = FormState::AvailabilityUnknown;
        Ok(PendingCheck {
            generation: self.generation,
            pickup_date,
            return_date,
        })
    }

    /// Aplicar el veredicto de un chequeo; devuelve false si el resultado
    /// quedó viejo (las fechas cambiaron mientras la llamada volaba)
    pub fn apply_availability(&mut self, ticket: PendingCheck, verdict: Availability) -> bool {
        if ticket.generation != self.generation {
            debug!("🗑️ Veredicto de disponibilidad descartado: fechas cambiadas");
            return false;
        }
        self.state = match verdict {
            Availability::Available => FormState::Available,
            Availability::Unavailable { message } => FormState::Unavailable { message },
            Availability::Unknown => FormState::AvailabilityUnknown,
        };
        true
    }

    /// Chequear disponibilidad contra el backend y aplicar el resultado
    pub async fn run_availability_check<B: BookingBackend + ?Sized>(
        &mut self,
        backend: &B,
    ) -> ApiResult<&FormState> {
        let ticket = self.begin_availability_check()?;
        let verdict = check_car(backend, &self.car.id, ticket.pickup_date, ticket.return_date).await?;
        self.apply_availability(ticket, verdict);
        Ok(&self.state)
    }

    /// Secciones de datos/resumen visibles sólo con disponibilidad confirmada
    pub fn details_unlocked(&self) -> bool {
        matches!(
            self.state,
            FormState::Available | FormState::Submitting | FormState::Failed { .. }
        )
    }

    /// Capturar los datos del cliente (sección bloqueada hasta confirmar
    /// disponibilidad)
    pub fn set_details(&mut self, details: BookingDetails) -> ApiResult<()> {
        if self.state == FormState::Submitting {
            return Err(conflict_error("capturar datos", "hay un envío en curso"));
        }
        if !self.details_unlocked() {
            return Err(conflict_error(
                "capturar datos",
                "la disponibilidad no está confirmada",
            ));
        }
        self.details = details;
        Ok(())
    }

    /// Validación pura de la foto actual de los datos
    pub fn validate_details(&self) -> Result<(), ValidationErrors> {
        self.details.validate()
    }

    /// Estado derivado: el formulario puede enviarse
    pub fn is_ready_to_submit(&self) -> bool {
        self.details_unlocked()
            && self.state != FormState::Submitting
            && self.require_dates().is_ok()
            && self.validate_details().is_ok()
    }

    /// Iniciar el envío de la reserva
    ///
    /// Guard de concurrencia: con un envío en curso cualquier reintento se
    /// rechaza; a lo sumo una creación de reserva en vuelo por formulario.
    pub fn begin_submit(&mut self) -> ApiResult<PendingSubmit> {
        match &self.state {
            FormState::Submitting => {
                return Err(conflict_error("enviar la reserva", "ya hay un envío en curso"));
            }
            FormState::Available | FormState::Failed { .. } => {}
            FormState::Unavailable { .. } => {
                return Err(conflict_error(
                    "enviar la reserva",
                    "el auto no está disponible en esas fechas",
                ));
            }
            _ => {
                return Err(conflict_error(
                    "enviar la reserva",
                    "la disponibilidad no fue verificada",
                ));
            }
        }

        let (pickup_date, return_date) = self.require_dates()?;
        self.validate_details()?;

        let request = CreateBookingRequest {
            car_id: self.car.id.clone(),
            pickup_date,
            return_date,
            pickup_location: self.details.pickup_location.clone(),
            return_location: self.details.return_location.clone(),
            customer_name: self.details.customer_name.clone(),
            customer_email: self.details.customer_email.clone(),
            customer_phone: self.details.customer_phone.clone(),
            notes: self.details.notes.clone(),
        };

        self.state = FormState::Submitting;
        Ok(PendingSubmit { request })
    }

    /// Aplicar el resultado del envío
    ///
    /// El éxito navega a checkout con el id del booking; el fallo deja el
    /// mensaje del servidor a la vista y el formulario listo para reintentar.
    pub fn apply_submit_result(
        &mut self,
        _ticket: PendingSubmit,
        result: ApiResult<Booking>,
    ) -> &FormState {
        if self.state != FormState::Submitting {
            debug!("🗑️ Resultado de envío descartado: el formulario ya no está enviando");
            return &self.state;
        }
        self.state = match result {
            Ok(booking) => FormState::Submitted { booking },
            Err(e) => FormState::Failed {
                message: e.user_message(),
            },
        };
        &self.state
    }

    /// Enviar la reserva contra el backend y aplicar el resultado
    pub async fn submit<B: BookingBackend + ?Sized>(&mut self, backend: &B) -> ApiResult<&FormState> {
        let ticket = self.begin_submit()?;
        let result = backend.create_booking(&ticket.request).await;
        Ok(self.apply_submit_result(ticket, result))
    }
}
