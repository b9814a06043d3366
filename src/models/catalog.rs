//! Modelos de catálogo
//!
//! Este módulo contiene las filas de lookup de brands y categories
//! y el snapshot de catálogo que arma el cliente para la vista de búsqueda.

use serde::{Deserialize, Serialize};

use super::car::{Car, ResourceId};

/// Brand tal como la entrega `GET /brands`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Category tal como la entrega `GET /categories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Snapshot del catálogo cargado para una vista
///
/// Copia read-mostly que se descarta al navegar; el backend es el dueño
/// de los datos.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub cars: Vec<Car>,
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
}

impl CatalogSnapshot {
    /// Autos marcados como destacados para la portada
    pub fn featured_cars(&self) -> Vec<&Car> {
        self.cars.iter().filter(|car| car.featured).collect()
    }
}
