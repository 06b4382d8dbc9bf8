//! Rutas de la API

pub mod auth_routes;
pub mod export_routes;
pub mod filter_routes;
pub mod record_routes;
pub mod sales_routes;
