use crate::modules::grupos::controller::{
    agregar_estudiante, create_grupo, delete_grupo, get_grupo, get_grupos, quitar_estudiante,
    update_grupo, verificar_dependencias,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub fn init_grupos_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_grupo))
        .route("/get", get(get_grupos))
        .route("/get/{id}", get(get_grupo))
        .route("/update/{id}", put(update_grupo))
        .route("/delete/{id}", delete(delete_grupo))
        .route("/verificar-dependencias/{id}", get(verificar_dependencias))
        .route("/{id}/estudiantes", post(agregar_estudiante))
        .route(
            "/{id}/estudiantes/{estudiante_id}",
            delete(quitar_estudiante),
        )
}
