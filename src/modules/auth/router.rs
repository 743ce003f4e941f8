use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{perfil, solicitar_codigo, verificar_codigo};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/solicitar-codigo", post(solicitar_codigo))
        .route("/verificar-codigo", post(verificar_codigo))
        .route("/perfil", get(perfil))
}
