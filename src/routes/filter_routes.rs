//! Rutas de opciones de filtros (cualquier rol autenticado)

use axum::{extract::State, middleware, routing::get, Json, Router};

use crate::controllers::filter_controller::FilterController;
use crate::dto::filter_dto::FilterOptionsResponse;
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_filter_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/options", get(filter_options))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptionsResponse>, AppError> {
    let controller = FilterController::new(state.pool.clone());
    Ok(Json(controller.options().await?))
}
