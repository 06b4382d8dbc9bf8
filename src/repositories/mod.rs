//! Repositorios de acceso a datos

pub mod record_repository;

pub use record_repository::{FilterColumn, RecordRepository};
