//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Umbral por defecto para "garantía por vencer" (días)
pub const DEFAULT_EXPIRING_SOON_DAYS: u32 = 30;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expire_hours: i64,
    pub cors_origins: Vec<String>,
    // Hashes bcrypt de los códigos de acceso por rol
    pub maintenance_passcode_hash: String,
    pub sales_passcode_hash: String,
    // Garantía
    pub expiring_soon_days: u32,
    // Límite de filas para exportaciones
    pub export_row_cap: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expire_hours: env::var("JWT_EXPIRE_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRE_HOURS must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            maintenance_passcode_hash: env::var("MAINTENANCE_PASSCODE_HASH")
                .expect("MAINTENANCE_PASSCODE_HASH must be set"),
            sales_passcode_hash: env::var("SALES_PASSCODE_HASH")
                .expect("SALES_PASSCODE_HASH must be set"),
            expiring_soon_days: env::var("EXPIRING_SOON_DAYS")
                .unwrap_or_else(|_| DEFAULT_EXPIRING_SOON_DAYS.to_string())
                .parse()
                .expect("EXPIRING_SOON_DAYS must be a valid number"),
            export_row_cap: env::var("EXPORT_ROW_CAP")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .expect("EXPORT_ROW_CAP must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
