//! Deep links de búsqueda
//!
//! Este módulo sincroniza los criterios de búsqueda con el query string de
//! la vista (`q, brand_id, category_id, price_min, price_max, transmission,
//! fuel_type`): parámetro ausente ⇔ criterio ausente, así el estado de
//! búsqueda se puede compartir y restaurar al recargar.

use rust_decimal::Decimal;

use crate::models::ResourceId;

use super::filter::FilterCriteria;

fn push_param(parts: &mut Vec<String>, key: &str, value: &str) {
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        parts.push(format!("{}={}", key, urlencoding::encode(trimmed)));
    }
}

/// Serializar los criterios como query string (sin el `?` inicial)
pub fn to_query_string(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();

    if let Some(q) = &criteria.query {
        push_param(&mut parts, "q", q);
    }
    if let Some(brand_id) = &criteria.brand_id {
        push_param(&mut parts, "brand_id", &brand_id.to_string());
    }
    if let Some(category_id) = &criteria.category_id {
        push_param(&mut parts, "category_id", &category_id.to_string());
    }
    if let Some(price_min) = &criteria.price_min {
        push_param(&mut parts, "price_min", &price_min.to_string());
    }
    if let Some(price_max) = &criteria.price_max {
        push_param(&mut parts, "price_max", &price_max.to_string());
    }
    if let Some(transmission) = &criteria.transmission {
        push_param(&mut parts, "transmission", transmission);
    }
    if let Some(fuel_type) = &criteria.fuel_type {
        push_param(&mut parts, "fuel_type", fuel_type);
    }

    parts.join("&")
}

/// Reconstruir los criterios desde un query string
///
/// Tolerante: parámetros desconocidos o valores no parseables se ignoran,
/// y un valor vacío equivale a no tener el criterio.
pub fn from_query_string(raw: &str) -> FilterCriteria {
    let mut criteria = FilterCriteria::default();

    for pair in raw.trim_start_matches('?').split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => continue,
        };
        let value = match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => continue,
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key {
            "q" => criteria.query = Some(value.to_string()),
            "brand_id" => criteria.brand_id = Some(ResourceId::from(value)),
            "category_id" => criteria.category_id = Some(ResourceId::from(value)),
            "price_min" => criteria.price_min = value.parse::<Decimal>().ok(),
            "price_max" => criteria.price_max = value.parse::<Decimal>().ok(),
            "transmission" => criteria.transmission = Some(value.to_string()),
            "fuel_type" => criteria.fuel_type = Some(value.to_string()),
            _ => {}
        }
    }

    criteria
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_criteria_produces_empty_string() {
        assert_eq!(to_query_string(&FilterCriteria::default()), "");
    }

    #[test]
    fn test_round_trip_preserves_criteria() {
        let criteria = FilterCriteria {
            query: Some("sedan familiar".to_string()),
            brand_id: Some(ResourceId::Numeric(3)),
            category_id: None,
            price_min: Some("25.50".parse().unwrap()),
            price_max: Some(Decimal::from(120)),
            transmission: Some("automatic".to_string()),
            fuel_type: None,
        };

        let qs = to_query_string(&criteria);
        assert!(qs.contains("q=sedan%20familiar"));
        assert!(qs.contains("brand_id=3"));
        assert!(!qs.contains("category_id"));
        assert_eq!(from_query_string(&qs), criteria);
    }

    #[test]
    fn test_leading_question_mark_and_unknown_params() {
        let criteria = from_query_string("?q=suv&page=2&fuel_type=diesel");
        assert_eq!(criteria.query.as_deref(), Some("suv"));
        assert_eq!(criteria.fuel_type.as_deref(), Some("diesel"));
        assert!(criteria.brand_id.is_none());
    }

    #[test]
    fn test_empty_value_means_no_constraint() {
        let criteria = from_query_string("q=&brand_id=7");
        assert!(criteria.query.is_none());
        assert_eq!(criteria.brand_id, Some(ResourceId::Numeric(7)));
    }

    #[test]
    fn test_unparseable_price_is_ignored() {
        let criteria = from_query_string("price_min=abc&price_max=80");
        assert!(criteria.price_min.is_none());
        assert_eq!(criteria.price_max, Some(Decimal::from(80)));
    }
}
