//! Middleware de CORS
//!
//! Configuración permisiva para que el frontend pueda consumir la API
//! desde otro origen.

use tower_http::cors::{Any, CorsLayer};

pub fn cors_middleware() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
