use crate::modules::estudiantes::controller::{
    create_estudiante, delete_estudiante, get_estudiante, get_estudiantes, update_estudiante,
    verificar_dependencias,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn init_estudiantes_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_estudiante))
        .route("/get", get(get_estudiantes))
        .route("/get/{id}", get(get_estudiante))
        .route("/update/{id}", put(update_estudiante))
        .route("/delete/{id}", delete(delete_estudiante))
        .route("/verificar-dependencias/{id}", get(verificar_dependencias))
}
