//! Controladores
//!
//! Median entre las rutas HTTP y los repositorios/servicios.

pub mod auth_controller;
pub mod export_controller;
pub mod filter_controller;
pub mod record_controller;
pub mod sales_controller;
