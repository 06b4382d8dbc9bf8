use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::role::Role;

/// Request de login por código de acceso
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "El código de acceso es requerido"))]
    pub passcode: String,
}

/// Response de login con el token de acceso
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: Role,
}

impl TokenResponse {
    pub fn bearer(access_token: String, role: Role) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            role,
        }
    }
}
