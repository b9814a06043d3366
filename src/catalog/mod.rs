//! Catálogo y búsqueda
//!
//! Este módulo contiene el pipeline de filtrado de la vista de shop y el
//! codec de deep links del estado de búsqueda.

pub mod filter;
pub mod query;

pub use filter::{derive_facets, filter_cars, suggest, CatalogFacets, FilterCriteria};
pub use query::{from_query_string, to_query_string};
