use crate::modules::supervision::controller::{get_informes, reabrir_informe};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub fn init_supervision_router() -> Router<AppState> {
    Router::new()
        .route("/informes", get(get_informes))
        .route("/informes/reabrir/{id}", put(reabrir_informe))
}
