use crate::modules::docentes::controller::{
    create_docente, delete_docente, get_docente, get_docentes, update_docente,
    verificar_dependencias,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn init_docentes_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_docente))
        .route("/get", get(get_docentes))
        .route("/get/{id}", get(get_docente))
        .route("/update/{id}", put(update_docente))
        .route("/delete/{id}", delete(delete_docente))
        .route("/verificar-dependencias/{id}", get(verificar_dependencias))
}
