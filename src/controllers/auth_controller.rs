//! Controlador de autenticación
//!
//! Login por código de acceso: el código determina el rol y se emite un JWT
//! con ese rol como claim. Los códigos se verifican contra hashes bcrypt.

use validator::Validate;

use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{LoginRequest, TokenResponse};
use crate::middleware::auth::generate_jwt_token;
use crate::models::role::Role;
use crate::utils::errors::AppError;

pub struct AuthController {
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self { config }
    }

    pub fn login(&self, request: LoginRequest) -> Result<TokenResponse, AppError> {
        request.validate()?;

        let role = if self.matches(&request.passcode, &self.config.maintenance_passcode_hash)? {
            Role::Maintenance
        } else if self.matches(&request.passcode, &self.config.sales_passcode_hash)? {
            Role::Sales
        } else {
            log::warn!("🔒 Intento de login con código de acceso inválido");
            return Err(AppError::Unauthorized("Código de acceso inválido".to_string()));
        };

        let token = generate_jwt_token(role, &self.config)?;
        log::info!("✅ Login correcto con rol '{}'", role);

        Ok(TokenResponse::bearer(token, role))
    }

    fn matches(&self, passcode: &str, hash: &str) -> Result<bool, AppError> {
        bcrypt::verify(passcode, hash).map_err(|e| AppError::Hash(e.to_string()))
    }
}
