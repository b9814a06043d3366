//! Filtro del catálogo
//!
//! Este módulo contiene el pipeline de búsqueda de la vista de shop:
//! criterios multi-dimensión sobre la lista de autos en memoria, facetas
//! derivadas y el lookup de sugerencias del autocomplete.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Car, ResourceId};

/// Criterios de búsqueda - todos opcionales
///
/// Un campo ausente (o string vacío) no restringe esa dimensión.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub brand_id: Option<ResourceId>,
    pub category_id: Option<ResourceId>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        active_text(&self.query).is_none()
            && self.brand_id.is_none()
            && self.category_id.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && active_text(&self.transmission).is_none()
            && active_text(&self.fuel_type).is_none()
    }
}

/// Valores seleccionables para los filtros de transmission y fuel_type
///
/// Se derivan de los valores distintos observados en la lista cargada,
/// no de un enum fijo; hay que recalcularlas cuando la lista cambia.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFacets {
    pub transmissions: Vec<String>,
    pub fuel_types: Vec<String>,
}

fn active_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Match del query de texto libre
///
/// Substring case-insensitive contra name, brand/category embebidos,
/// fuel_type y transmission. Brand/category en forma de foreign key crudo
/// no matchean nunca por nombre.
fn matches_query(car: &Car, needle_lower: &str) -> bool {
    contains_ci(&car.name, needle_lower)
        || car.brand_name().map_or(false, |n| contains_ci(n, needle_lower))
        || car.category_name().map_or(false, |n| contains_ci(n, needle_lower))
        || car.fuel_type.as_deref().map_or(false, |n| contains_ci(n, needle_lower))
        || car.transmission.as_deref().map_or(false, |n| contains_ci(n, needle_lower))
}

fn matches(car: &Car, criteria: &FilterCriteria) -> bool {
    if let Some(q) = active_text(&criteria.query) {
        if !matches_query(car, &q.to_lowercase()) {
            return false;
        }
    }

    if let Some(brand_id) = &criteria.brand_id {
        match car.brand_id() {
            Some(id) if id == brand_id => {}
            _ => return false,
        }
    }

    if let Some(category_id) = &criteria.category_id {
        match car.category_id() {
            Some(id) if id == category_id => {}
            _ => return false,
        }
    }

    if let Some(min) = criteria.price_min {
        if car.price < min {
            return false;
        }
    }

    if let Some(max) = criteria.price_max {
        if car.price > max {
            return false;
        }
    }

    if let Some(transmission) = active_text(&criteria.transmission) {
        if car.transmission.as_deref() != Some(transmission) {
            return false;
        }
    }

    if let Some(fuel_type) = active_text(&criteria.fuel_type) {
        if car.fuel_type.as_deref() != Some(fuel_type) {
            return false;
        }
    }

    true
}

/// Filtrar la lista de autos con los criterios dados
///
/// Función pura y estable: preserva el orden relativo de entrada y no
/// re-ordena. Los criterios presentes se combinan con AND.
pub fn filter_cars(cars: &[Car], criteria: &FilterCriteria) -> Vec<Car> {
    cars.iter()
        .filter(|car| matches(car, criteria))
        .cloned()
        .collect()
}

/// Sugerencias para el dropdown de autocomplete
///
/// Mismo substring que el query de texto pero sólo contra name y
/// brand/category embebidos; ignora el resto de los criterios y corta en
/// los primeros 5 matches en orden original.
pub fn suggest<'a>(cars: &'a [Car], partial_query: &str) -> Vec<&'a Car> {
    let needle = partial_query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    cars.iter()
        .filter(|car| {
            contains_ci(&car.name, &needle)
                || car.brand_name().map_or(false, |n| contains_ci(n, &needle))
                || car.category_name().map_or(false, |n| contains_ci(n, &needle))
        })
        .take(5)
        .collect()
}

/// Derivar las facetas de la lista cargada
pub fn derive_facets(cars: &[Car]) -> CatalogFacets {
    let mut facets = CatalogFacets::default();

    for car in cars {
        if let Some(transmission) = car.transmission.as_deref().map(str::trim) {
            if !transmission.is_empty() && !facets.transmissions.iter().any(|t| t == transmission) {
                facets.transmissions.push(transmission.to_string());
            }
        }
        if let Some(fuel_type) = car.fuel_type.as_deref().map(str::trim) {
            if !fuel_type.is_empty() && !facets.fuel_types.iter().any(|f| f == fuel_type) {
                facets.fuel_types.push(fuel_type.to_string());
            }
        }
    }

    facets
}
