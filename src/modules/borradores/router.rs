use crate::modules::borradores::controller::{get_borrador, guardar_borrador};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub fn init_borradores_router() -> Router<AppState> {
    Router::new()
        .route("/guardar", put(guardar_borrador))
        .route("/get/{grupo_id}", get(get_borrador))
}
