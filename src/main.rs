use anyhow::Result;
use colored::*;
use dotenvy::dotenv;
use std::io::{self, Write};
use tracing::info;

use car_rental_client::booking::{format_amount, pricing, BookingDetails, BookingForm, FormState};
use car_rental_client::catalog::{derive_facets, filter_cars, from_query_string, suggest, to_query_string, FilterCriteria};
use car_rental_client::config::EnvironmentConfig;
use car_rental_client::models::{Car, ResourceId, Session};
use car_rental_client::utils::validation::validate_date;
use car_rental_client::RentalApi;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("{}", "🚗 Car Rental Marketplace".bright_blue().bold());
    println!("{}", "=========================".bright_blue());
    println!();

    let config = EnvironmentConfig::default();
    info!("🌐 Backend: {}", config.api_base_url);

    let session = Session::shared();
    if let Some(token) = config.api_token.clone() {
        session.write().await.resume(token);
    } else {
        println!("{}", "⚠️  Sin CAR_RENTAL_API_TOKEN: sólo catálogo y búsqueda.".yellow());
    }

    let api = RentalApi::new(config, session)?;

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🏠 Ver catálogo");
        println!("2. 🔍 Buscar autos");
        println!("3. 📅 Reservar un auto");
        println!("4. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-4): ")?;

        let outcome = match choice.as_str() {
            "1" => show_catalog(&api).await,
            "2" => run_search(&api).await,
            "3" => run_booking_flow(&api).await,
            "4" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("{} {}", "❌".bright_red(), e.to_string().bright_red());
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn print_car_row(car: &Car) {
    let brand = car.brand_name().unwrap_or("-");
    println!(
        "  [{}] {} ({}) — {} — {} / día",
        car.id,
        car.name.bold(),
        car.year,
        brand,
        format_amount(car.price).bright_cyan(),
    );
}

async fn show_catalog(api: &RentalApi) -> Result<()> {
    let snapshot = api.load_catalog().await?;

    let featured = snapshot.featured_cars();
    if !featured.is_empty() {
        println!();
        println!("{}", "⭐ DESTACADOS".bright_cyan().bold());
        for car in featured {
            print_car_row(car);
        }
    }

    println!();
    println!("{}", format!("🚗 CATÁLOGO ({} autos)", snapshot.cars.len()).bright_cyan().bold());
    for car in &snapshot.cars {
        print_car_row(car);
    }

    Ok(())
}

async fn run_search(api: &RentalApi) -> Result<()> {
    let snapshot = api.load_catalog().await?;
    let facets = derive_facets(&snapshot.cars);

    println!();
    println!("{}", "🔍 BÚSQUEDA".bright_cyan().bold());
    println!("Deja un campo vacío para no filtrar por esa dimensión.");
    println!("Transmisiones vistas: {}", facets.transmissions.join(", "));
    println!("Combustibles vistos: {}", facets.fuel_types.join(", "));
    println!();

    let pasted = prompt("Deep link (ej: ?q=sedan&price_max=80), o Enter para cargar criterios: ")?;
    let criteria = if pasted.is_empty() {
        read_criteria(snapshot.brands.len(), snapshot.categories.len())?
    } else {
        from_query_string(&pasted)
    };

    if let Some(q) = &criteria.query {
        let suggestions = suggest(&snapshot.cars, q);
        if !suggestions.is_empty() {
            println!();
            println!("{}", "💡 Sugerencias:".bright_blue());
            for car in suggestions {
                print_car_row(car);
            }
        }
    }

    let results = filter_cars(&snapshot.cars, &criteria);
    println!();
    println!("{}", format!("📄 {} resultado(s)", results.len()).bright_green().bold());
    for car in &results {
        print_car_row(car);
    }

    let deep_link = to_query_string(&criteria);
    if !deep_link.is_empty() {
        println!();
        println!("🔗 Deep link de esta búsqueda: ?{}", deep_link);
    }

    Ok(())
}

fn read_criteria(brand_count: usize, category_count: usize) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::default();

    let query = prompt("Texto libre: ")?;
    if !query.is_empty() {
        criteria.query = Some(query);
    }
    let brand = prompt(&format!("Brand id ({} cargadas): ", brand_count))?;
    if !brand.is_empty() {
        criteria.brand_id = Some(ResourceId::from(brand.as_str()));
    }
    let category = prompt(&format!("Category id ({} cargadas): ", category_count))?;
    if !category.is_empty() {
        criteria.category_id = Some(ResourceId::from(category.as_str()));
    }
    let price_min = prompt("Precio mínimo por día: ")?;
    if !price_min.is_empty() {
        criteria.price_min = price_min.parse().ok();
    }
    let price_max = prompt("Precio máximo por día: ")?;
    if !price_max.is_empty() {
        criteria.price_max = price_max.parse().ok();
    }
    let transmission = prompt("Transmisión exacta: ")?;
    if !transmission.is_empty() {
        criteria.transmission = Some(transmission);
    }
    let fuel_type = prompt("Combustible exacto: ")?;
    if !fuel_type.is_empty() {
        criteria.fuel_type = Some(fuel_type);
    }

    Ok(criteria)
}

fn read_date(label: &str) -> Result<chrono::NaiveDate> {
    loop {
        let raw = prompt(label)?;
        match validate_date(&raw) {
            Ok(date) => return Ok(date),
            Err(_) => println!("{}", "❌ Formato esperado: YYYY-MM-DD".bright_red()),
        }
    }
}

async fn run_booking_flow(api: &RentalApi) -> Result<()> {
    println!();
    println!("{}", "📅 RESERVA".bright_cyan().bold());

    let raw_id = prompt("Id del auto a reservar: ")?;
    let car = api.get_car(&ResourceId::from(raw_id.as_str())).await?;
    print_car_row(&car);

    let mut form = BookingForm::new(car);
    let pickup = read_date("Fecha de retiro (YYYY-MM-DD): ")?;
    let ret = read_date("Fecha de devolución (YYYY-MM-DD): ")?;
    form.set_pickup_date(pickup)?;
    form.set_return_date(ret)?;

    let quote = form.quote()?;
    println!(
        "💰 {} día(s) × {} = {}",
        quote.days,
        format_amount(quote.daily_rate),
        format_amount(quote.total).bright_cyan().bold(),
    );

    println!("{}", "⏳ Verificando disponibilidad...".bright_blue());
    form.run_availability_check(api).await?;
    match form.state() {
        FormState::Available => println!("{}", "✅ Disponible".bright_green()),
        FormState::Unavailable { message } => {
            println!("{} {}", "❌".bright_red(), message.bright_red());
            return Ok(());
        }
        _ => return Ok(()),
    }

    let details = BookingDetails {
        pickup_location: prompt("Punto de retiro: ")?,
        return_location: prompt("Punto de devolución: ")?,
        customer_name: prompt("Nombre completo: ")?,
        customer_email: prompt("Email: ")?,
        customer_phone: prompt("Teléfono: ")?,
        notes: {
            let notes = prompt("Notas (opcional): ")?;
            if notes.is_empty() { None } else { Some(notes) }
        },
    };
    form.set_details(details)?;

    if let Err(e) = form.validate_details() {
        println!("{} {}", "❌ Datos inválidos:".bright_red(), e);
        return Ok(());
    }

    println!();
    println!("{}", "📦 RESUMEN".bright_green().bold());
    print_car_row(form.car());
    println!("  {} → {}", pickup, ret);
    println!("  Total estimado: {}", format_amount(quote.total).bold());
    let confirmation = prompt("¿Confirmar reserva? (s/n): ")?;
    if confirmation.to_lowercase() != "s" {
        println!("{}", "🚪 Reserva cancelada por el usuario".yellow());
        return Ok(());
    }

    form.submit(api).await?;
    match form.state() {
        FormState::Submitted { booking } => {
            println!("{}", format!("✅ Reserva creada: #{}", booking.id).bright_green().bold());
            println!("  {}", pricing::receipt_summary(booking)?);

            let pay = prompt("¿Pagar ahora? (s/n): ")?;
            if pay.to_lowercase() == "s" {
                let booking_id = booking.id.clone();
                let message = api.pay_booking(&booking_id).await?;
                println!("{} {}", "💳".bright_green(), message.bright_green());
            }
        }
        FormState::Failed { message } => {
            println!("{} {}", "❌".bright_red(), message.bright_red());
            println!("El formulario queda como estaba; podés reintentar desde el menú.");
        }
        _ => {}
    }

    Ok(())
}
