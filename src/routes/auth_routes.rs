use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, TokenResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Login por código de acceso; devuelve el token bearer y el rol
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let controller = AuthController::new(state.config.clone());
    Ok(Json(controller.login(request)?))
}
