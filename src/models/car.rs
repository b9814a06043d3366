//! Modelo de Car
//!
//! Este módulo contiene el struct Car del catálogo y los tipos que
//! normalizan las dos formas en que el backend entrega brand/category
//! (foreign key crudo u objeto embebido).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::utils::validation::{validate_non_negative, validate_range};

/// Identificador de recurso tal como llega del backend
///
/// Los ids pueden llegar como número o como string según el endpoint.
/// La igualdad es coercitiva: `Numeric(7)` y `Text("7")` son iguales.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Numeric(i64),
    Text(String),
}

impl PartialEq for ResourceId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResourceId::Numeric(a), ResourceId::Numeric(b)) => a == b,
            (ResourceId::Text(a), ResourceId::Text(b)) => a == b,
            (ResourceId::Numeric(a), ResourceId::Text(b))
            | (ResourceId::Text(b), ResourceId::Numeric(a)) => a.to_string() == *b,
        }
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceId::Numeric(v) => write!(f, "{}", v),
            ResourceId::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        ResourceId::Numeric(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(v) => ResourceId::Numeric(v),
            Err(_) => ResourceId::Text(value.to_string()),
        }
    }
}

/// Referencia a brand o category dentro de un Car
///
/// Se normaliza una sola vez al deserializar: el resto del código pregunta
/// por `id()` / `name()` y nunca vuelve a inspeccionar la forma del JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CatalogRef {
    Embedded { id: ResourceId, name: String },
    Raw(ResourceId),
}

impl CatalogRef {
    /// Id de la referencia, sin importar la forma en que llegó
    pub fn id(&self) -> &ResourceId {
        match self {
            CatalogRef::Embedded { id, .. } => id,
            CatalogRef::Raw(id) => id,
        }
    }

    /// Nombre embebido, si el endpoint lo incluyó
    pub fn name(&self) -> Option<&str> {
        match self {
            CatalogRef::Embedded { name, .. } => Some(name.as_str()),
            CatalogRef::Raw(_) => None,
        }
    }

    pub fn matches_id(&self, other: &ResourceId) -> bool {
        self.id() == other
    }
}

/// Estado del auto en el catálogo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Rented,
    Maintenance,
}

/// Car del catálogo - copia transitoria de lo que entrega el backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Car {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub brand: Option<CatalogRef>,
    #[serde(default)]
    pub category: Option<CatalogRef>,
    pub year: i32,
    pub price: Decimal,
    pub status: CarStatus,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub image: Option<String>,
}

impl Car {
    pub fn brand_id(&self) -> Option<&ResourceId> {
        self.brand.as_ref().map(|b| b.id())
    }

    pub fn brand_name(&self) -> Option<&str> {
        self.brand.as_ref().and_then(|b| b.name())
    }

    pub fn category_id(&self) -> Option<&ResourceId> {
        self.category.as_ref().map(|c| c.id())
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.name())
    }

    /// Validar invariantes del registro: precio no negativo y año de 4 dígitos
    pub fn validate_record(&self) -> Result<(), ValidationError> {
        validate_non_negative(self.price)?;
        validate_range(self.year, 1000, 9999)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_coercion() {
        assert_eq!(ResourceId::Numeric(7), ResourceId::Text("7".to_string()));
        assert_eq!(ResourceId::Text("7".to_string()), ResourceId::Numeric(7));
        assert_ne!(ResourceId::Numeric(7), ResourceId::Text("07".to_string()));
        assert_ne!(ResourceId::Numeric(7), ResourceId::Numeric(8));
    }

    #[test]
    fn test_catalog_ref_shapes() {
        let embedded: CatalogRef =
            serde_json::from_str(r#"{"id": 3, "name": "Toyota"}"#).unwrap();
        assert_eq!(embedded.id(), &ResourceId::Numeric(3));
        assert_eq!(embedded.name(), Some("Toyota"));

        let raw: CatalogRef = serde_json::from_str("3").unwrap();
        assert_eq!(raw.id(), &ResourceId::Numeric(3));
        assert_eq!(raw.name(), None);

        let raw_text: CatalogRef = serde_json::from_str(r#""3""#).unwrap();
        assert!(raw_text.matches_id(&ResourceId::Numeric(3)));
    }

    #[test]
    fn test_car_deserializes_both_shapes() {
        let json = r#"{
            "id": "12",
            "name": "Corolla",
            "brand": {"id": 3, "name": "Toyota"},
            "category": 5,
            "year": 2021,
            "price": "45.50",
            "status": "available",
            "fuel_type": "gasoline",
            "transmission": "automatic",
            "mileage": 32000,
            "condition": "excellent",
            "featured": true,
            "image": "cars/corolla.jpg"
        }"#;

        let car: Car = serde_json::from_str(json).unwrap();
        assert_eq!(car.brand_name(), Some("Toyota"));
        assert_eq!(car.category_name(), None);
        assert_eq!(car.category_id(), Some(&ResourceId::Numeric(5)));
        assert_eq!(car.status, CarStatus::Available);
        assert!(car.validate_record().is_ok());
    }

    #[test]
    fn test_validate_record_rejects_bad_year() {
        let json = r#"{
            "id": 1,
            "name": "Prototipo",
            "brand": null,
            "category": null,
            "year": 21,
            "price": "10.00",
            "status": "maintenance",
            "fuel_type": null,
            "transmission": null,
            "mileage": null,
            "condition": null,
            "image": null
        }"#;

        let car: Car = serde_json::from_str(json).unwrap();
        assert!(car.validate_record().is_err());
    }
}
