//! Tests de escenario del flujo de reserva contra un backend guionado.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use car_rental_client::booking::{pricing, Availability, BookingDetails, BookingForm, FormState};
use car_rental_client::client::BookingBackend;
use car_rental_client::models::{
    Booking, BookingStatus, Car, CarStatus, CreateBookingRequest, PaymentStatus, ResourceId,
};
use car_rental_client::utils::errors::{rejected_error, ApiError, ApiResult};

/// Backend guionado: responde con la cola de resultados que cargue el test
struct ScriptedBackend {
    availability: Mutex<VecDeque<ApiResult<bool>>>,
    bookings: Mutex<VecDeque<ApiResult<Booking>>>,
}

impl ScriptedBackend {
    fn new() -> Self {
        Self {
            availability: Mutex::new(VecDeque::new()),
            bookings: Mutex::new(VecDeque::new()),
        }
    }

    fn push_availability(&self, result: ApiResult<bool>) {
        self.availability.lock().unwrap().push_back(result);
    }

    fn push_booking(&self, result: ApiResult<Booking>) {
        self.bookings.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl BookingBackend for ScriptedBackend {
    async fn check_availability(
        &self,
        _car_id: &ResourceId,
        _pickup_date: NaiveDate,
        _return_date: NaiveDate,
    ) -> ApiResult<bool> {
        self.availability
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted availability response")
    }

    async fn create_booking(&self, request: &CreateBookingRequest) -> ApiResult<Booking> {
        self.bookings
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted booking response")
            .map(|mut booking| {
                booking.car_id = request.car_id.clone();
                booking.pickup_date = request.pickup_date;
                booking.return_date = request.return_date;
                booking
            })
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn demo_car() -> Car {
    Car {
        id: ResourceId::Numeric(12),
        name: "Corolla Sedan".to_string(),
        brand: None,
        category: None,
        year: 2021,
        price: Decimal::from(50),
        status: CarStatus::Available,
        fuel_type: Some("gasoline".to_string()),
        transmission: Some("automatic".to_string()),
        mileage: Some(32000),
        condition: Some("excellent".to_string()),
        featured: false,
        image: None,
    }
}

fn demo_details() -> BookingDetails {
    BookingDetails {
        pickup_location: "Sucursal Centro".to_string(),
        return_location: "Aeropuerto".to_string(),
        customer_name: "Ana Torres".to_string(),
        customer_email: "ana@example.com".to_string(),
        customer_phone: "5512345678".to_string(),
        notes: None,
    }
}

fn demo_booking(pickup: NaiveDate, ret: NaiveDate) -> Booking {
    let days = pricing::rental_days(pickup, ret).unwrap();
    let subtotal = Decimal::from(50) * Decimal::from(days);
    let tax = subtotal * "0.16".parse::<Decimal>().unwrap();
    Booking {
        id: ResourceId::Numeric(901),
        car_id: ResourceId::Numeric(12),
        pickup_date: pickup,
        return_date: ret,
        pickup_location: "Sucursal Centro".to_string(),
        return_location: "Aeropuerto".to_string(),
        customer_name: "Ana Torres".to_string(),
        customer_email: "ana@example.com".to_string(),
        customer_phone: "5512345678".to_string(),
        notes: None,
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
        subtotal,
        tax_amount: tax,
        total_price: subtotal + tax,
        created_at: Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap(),
        confirmed_at: None,
        pickup_at: None,
        returned_at: None,
        cancelled_at: None,
        cancellation_reason: None,
    }
}

/// Arma un formulario con fechas cargadas y disponibilidad ya confirmada
async fn form_with_confirmed_availability(backend: &ScriptedBackend) -> BookingForm {
    backend.push_availability(Ok(true));

    let mut form = BookingForm::new(demo_car());
    form.set_pickup_date(date(2024, 6, 1)).unwrap();
    form.set_return_date(date(2024, 6, 4)).unwrap();
    form.run_availability_check(backend).await.unwrap();
    assert_eq!(form.state(), &FormState::Available);
    form
}

#[tokio::test]
async fn availability_gates_details_and_summary() {
    let backend = ScriptedBackend::new();
    backend.push_availability(Ok(true));

    let mut form = BookingForm::new(demo_car());
    form.set_pickup_date(date(2024, 6, 1)).unwrap();
    form.set_return_date(date(2024, 6, 4)).unwrap();

    // Cotización sincrónica: 3 días a $50
    let quote = form.quote().unwrap();
    assert_eq!(quote.days, 3);
    assert_eq!(pricing::format_amount(quote.total), "$150.00");

    // Hasta que el chequeo resuelva, las secciones siguen bloqueadas
    assert!(!form.details_unlocked());
    assert!(form.set_details(demo_details()).is_err());

    form.run_availability_check(&backend).await.unwrap();
    assert_eq!(form.state(), &FormState::Available);
    assert!(form.details_unlocked());
}

#[tokio::test]
async fn unavailable_and_network_failure_gate_identically() {
    let backend = ScriptedBackend::new();
    backend.push_availability(Ok(false));

    let mut form = BookingForm::new(demo_car());
    form.set_pickup_date(date(2024, 6, 1)).unwrap();
    form.set_return_date(date(2024, 6, 4)).unwrap();
    form.run_availability_check(&backend).await.unwrap();
    assert!(matches!(form.state(), FormState::Unavailable { .. }));
    assert!(!form.details_unlocked());

    // Un fallo HTTP resuelve igual que available=false; cambia el mensaje
    backend.push_availability(Err(ApiError::Status {
        status: 503,
        message: "Service Unavailable".to_string(),
    }));
    form.run_availability_check(&backend).await.unwrap();
    match form.state() {
        FormState::Unavailable { message } => assert_eq!(message, "Service Unavailable"),
        other => panic!("estado inesperado: {:?}", other),
    }
    assert!(!form.details_unlocked());
}

#[tokio::test]
async fn date_edit_after_check_resets_availability() {
    let backend = ScriptedBackend::new();
    let mut form = form_with_confirmed_availability(&backend).await;
    form.set_details(demo_details()).unwrap();
    assert!(form.is_ready_to_submit());

    // Editar la devolución invalida el veredicto: el resumen desaparece
    form.set_return_date(date(2024, 6, 6)).unwrap();
    assert_eq!(form.state(), &FormState::AvailabilityUnknown);
    assert!(!form.details_unlocked());
    assert!(!form.is_ready_to_submit());
    assert!(form.begin_submit().is_err());
}

#[tokio::test]
async fn submission_failure_keeps_form_with_server_message() {
    let backend = ScriptedBackend::new();
    let mut form = form_with_confirmed_availability(&backend).await;
    form.set_details(demo_details()).unwrap();

    backend.push_booking(Err(rejected_error("Car not available")));
    form.submit(&backend).await.unwrap();

    match form.state() {
        FormState::Failed { message } => assert_eq!(message, "Car not available"),
        other => panic!("estado inesperado: {:?}", other),
    }
    // Sin navegación a checkout, y el formulario queda listo para reintentar
    assert!(form.booking_id().is_none());
    assert!(form.is_ready_to_submit());
}

#[tokio::test]
async fn successful_submission_carries_booking_id() {
    let backend = ScriptedBackend::new();
    let mut form = form_with_confirmed_availability(&backend).await;
    form.set_details(demo_details()).unwrap();

    backend.push_booking(Ok(demo_booking(date(2024, 6, 1), date(2024, 6, 4))));
    form.submit(&backend).await.unwrap();

    assert_eq!(form.booking_id(), Some(&ResourceId::Numeric(901)));
}

#[tokio::test]
async fn retry_after_failure_succeeds() {
    let backend = ScriptedBackend::new();
    let mut form = form_with_confirmed_availability(&backend).await;
    form.set_details(demo_details()).unwrap();

    backend.push_booking(Err(rejected_error("Car not available")));
    form.submit(&backend).await.unwrap();
    assert!(matches!(form.state(), FormState::Failed { .. }));

    backend.push_booking(Ok(demo_booking(date(2024, 6, 1), date(2024, 6, 4))));
    form.submit(&backend).await.unwrap();
    assert!(form.booking_id().is_some());
}

#[tokio::test]
async fn stale_availability_result_is_dropped() {
    let backend = ScriptedBackend::new();
    let mut form = BookingForm::new(demo_car());
    form.set_pickup_date(date(2024, 6, 1)).unwrap();
    form.set_return_date(date(2024, 6, 4)).unwrap();

    // El chequeo sale a la red; mientras vuela, el usuario edita la fecha
    let ticket = form.begin_availability_check().unwrap();
    form.set_return_date(date(2024, 6, 10)).unwrap();

    let applied = form.apply_availability(ticket, Availability::Available);
    assert!(!applied);
    assert_eq!(form.state(), &FormState::AvailabilityUnknown);

    // El chequeo sobre las fechas vigentes sí aplica
    backend.push_availability(Ok(true));
    form.run_availability_check(&backend).await.unwrap();
    assert_eq!(form.state(), &FormState::Available);
}

#[test]
fn second_submit_while_in_flight_is_rejected() {
    let mut form = BookingForm::new(demo_car());
    form.set_pickup_date(date(2024, 6, 1)).unwrap();
    form.set_return_date(date(2024, 6, 4)).unwrap();
    let ticket = form.begin_availability_check().unwrap();
    form.apply_availability(ticket, Availability::Available);
    form.set_details(demo_details()).unwrap();

    let pending = form.begin_submit().unwrap();
    assert_eq!(form.state(), &FormState::Submitting);

    // Guard de concurrencia: a lo sumo un create-booking en vuelo
    assert!(form.begin_submit().is_err());
    assert!(form.set_pickup_date(date(2024, 6, 2)).is_err());

    form.apply_submit_result(pending, Ok(demo_booking(date(2024, 6, 1), date(2024, 6, 4))));
    assert!(form.booking_id().is_some());
}

#[test]
fn quote_and_receipt_agree_on_day_count() {
    let pickup = date(2024, 6, 1);
    let ret = date(2024, 6, 4);

    let quote = pricing::quote(Decimal::from(50), pickup, ret).unwrap();
    let booking = demo_booking(pickup, ret);
    let receipt = pricing::receipt_summary(&booking).unwrap();

    assert!(booking.amounts_consistent());
    assert!(receipt.starts_with(&format!("{} día(s)", quote.days)));
}

#[test]
fn validation_failure_blocks_before_any_network_call() {
    let mut form = BookingForm::new(demo_car());
    form.set_pickup_date(date(2024, 6, 1)).unwrap();
    form.set_return_date(date(2024, 6, 4)).unwrap();
    let ticket = form.begin_availability_check().unwrap();
    form.apply_availability(ticket, Availability::Available);

    // Datos incompletos: el begin_submit falla localmente; nunca se armó
    // un request (el backend guionado habría entrado en pánico al tocarlo)
    let result = form.begin_submit();
    assert!(matches!(result, Err(ApiError::Validation(_))));
}
