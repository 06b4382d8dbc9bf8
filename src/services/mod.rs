//! Servicios de dominio
//!
//! Lógica pura compartida por controladores y núcleo cliente: cálculo de
//! garantía, agregación de ventas y generación de exportaciones.

pub mod export_service;
pub mod sales_summary_service;
pub mod warranty_service;
