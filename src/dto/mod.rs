//! DTOs de la API
//!
//! Requests y responses que viajan por el wire, compartidos por el servidor
//! y el cliente HTTP.

pub mod auth_dto;
pub mod filter_dto;
pub mod record_dto;
pub mod sales_dto;
pub mod warranty_dto;
