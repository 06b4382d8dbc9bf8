//! Middleware de autenticación JWT
//!
//! Extrae el token bearer, valida el JWT y deja el rol autenticado en las
//! extensions de la request. Las guardas por rol se aplican por router.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::EnvironmentConfig;
use crate::models::role::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Rol autenticado que se inyecta en las requests
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedRole(pub Role);

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let role = decode_role(auth_header, &state.config.jwt_secret)?;

    request.extensions_mut().insert(AuthenticatedRole(role));

    Ok(next.run(request).await)
}

/// Decodificar y validar el JWT, devolviendo el rol de sus claims
pub fn decode_role(token: &str, jwt_secret: &str) -> Result<Role, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    Role::parse(&token_data.claims.role)
        .ok_or_else(|| AppError::Forbidden("Rol inválido".to_string()))
}

/// Guarda: solo rol de mantenimiento
pub async fn require_maintenance(
    Extension(AuthenticatedRole(role)): Extension<AuthenticatedRole>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if role != Role::Maintenance {
        return Err(AppError::Forbidden(
            "Se requiere el rol de mantenimiento".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Guarda: solo rol de ventas
pub async fn require_sales(
    Extension(AuthenticatedRole(role)): Extension<AuthenticatedRole>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if role != Role::Sales {
        return Err(AppError::Forbidden("Se requiere el rol de ventas".to_string()));
    }

    Ok(next.run(request).await)
}

/// Función para generar JWT token con el rol como claim
pub fn generate_jwt_token(role: Role, config: &EnvironmentConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::hours(config.jwt_expire_hours);

    let claims = Claims {
        role: role.as_str().to_string(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando JWT: {}", e)))
}
