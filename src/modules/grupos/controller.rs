use crate::dependencias::model::ConfirmacionEliminar;
use crate::middleware::auth::AuthDocente;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::grupos::model::{
    AgregarEstudianteDto, CreateGrupoDto, DeleteGrupoOutcome, DeleteGrupoParams, Grupo,
    GrupoConDocente, GrupoConMiembros, GrupoEliminado, GrupoQueryParams, MiembroGrupo,
    UpdateGrupoDto, VerificacionGrupo,
};
use crate::modules::grupos::service::GrupoService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::instrument;

#[utoipa::path(
    post,
    path = "/api/grupos/create",
    request_body = CreateGrupoDto,
    responses(
        (status = 200, description = "Grupo creado", body = Grupo),
        (status = 400, description = "Docente asignado inexistente", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 422, description = "Cuerpo inválido", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grupos"
)]
#[instrument(skip(state))]
pub async fn create_grupo(
    State(state): State<AppState>,
    _auth: AuthDocente,
    ValidatedJson(dto): ValidatedJson<CreateGrupoDto>,
) -> Result<Json<Grupo>, AppError> {
    let grupo = GrupoService::create_grupo(&state.db, dto).await?;
    Ok(Json(grupo))
}

#[utoipa::path(
    get,
    path = "/api/grupos/get",
    params(GrupoQueryParams),
    responses(
        (status = 200, description = "Listado de grupos", body = [GrupoConDocente]),
        (status = 401, description = "Sin token válido", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grupos"
)]
#[instrument(skip(state))]
pub async fn get_grupos(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Query(params): Query<GrupoQueryParams>,
) -> Result<Json<Vec<GrupoConDocente>>, AppError> {
    let grupos = GrupoService::get_grupos(&state.db, &params).await?;
    Ok(Json(grupos))
}

#[utoipa::path(
    get,
    path = "/api/grupos/get/{id}",
    params(("id" = i32, Path, description = "ID del grupo")),
    responses(
        (status = 200, description = "Grupo con sus miembros", body = GrupoConMiembros),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Grupo no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grupos"
)]
#[instrument(skip(state))]
pub async fn get_grupo(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
) -> Result<Json<GrupoConMiembros>, AppError> {
    let grupo = GrupoService::get_grupo(&state.db, id).await?;
    Ok(Json(grupo))
}

#[utoipa::path(
    put,
    path = "/api/grupos/update/{id}",
    params(("id" = i32, Path, description = "ID del grupo")),
    request_body = UpdateGrupoDto,
    responses(
        (status = 200, description = "Grupo actualizado", body = Grupo),
        (status = 400, description = "Docente asignado inexistente", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Grupo no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grupos"
)]
#[instrument(skip(state))]
pub async fn update_grupo(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateGrupoDto>,
) -> Result<Json<Grupo>, AppError> {
    let grupo = GrupoService::update_grupo(&state.db, id, dto).await?;
    Ok(Json(grupo))
}

#[utoipa::path(
    post,
    path = "/api/grupos/{id}/estudiantes",
    params(("id" = i32, Path, description = "ID del grupo")),
    request_body = AgregarEstudianteDto,
    responses(
        (status = 200, description = "Miembro incorporado o reactivado", body = MiembroGrupo),
        (status = 400, description = "Incompatibilidad de carrera, semestre, paralelo o cupo", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Grupo o estudiante no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grupos"
)]
#[instrument(skip(state))]
pub async fn agregar_estudiante(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<AgregarEstudianteDto>,
) -> Result<Json<MiembroGrupo>, AppError> {
    let miembro = GrupoService::agregar_estudiante(&state.db, id, dto.estudiante_id).await?;
    Ok(Json(miembro))
}

#[utoipa::path(
    delete,
    path = "/api/grupos/{id}/estudiantes/{estudiante_id}",
    params(
        ("id" = i32, Path, description = "ID del grupo"),
        ("estudiante_id" = i32, Path, description = "ID del estudiante")
    ),
    responses(
        (status = 200, description = "Miembro desactivado"),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Membresía inexistente", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grupos"
)]
#[instrument(skip(state))]
pub async fn quitar_estudiante(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path((id, estudiante_id)): Path<(i32, i32)>,
) -> Result<Json<serde_json::Value>, AppError> {
    GrupoService::quitar_estudiante(&state.db, id, estudiante_id).await?;
    Ok(Json(
        json!({"mensaje": "Estudiante retirado del grupo correctamente"}),
    ))
}

#[utoipa::path(
    get,
    path = "/api/grupos/verificar-dependencias/{id}",
    operation_id = "verificar_dependencias_grupo",
    params(("id" = i32, Path, description = "ID del grupo")),
    responses(
        (status = 200, description = "Dependencias del grupo", body = VerificacionGrupo),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Grupo no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grupos"
)]
#[instrument(skip(state))]
pub async fn verificar_dependencias(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
) -> Result<Json<VerificacionGrupo>, AppError> {
    let verificacion = GrupoService::verificar_dependencias(&state.db, id).await?;
    Ok(Json(verificacion))
}

#[utoipa::path(
    delete,
    path = "/api/grupos/delete/{id}",
    params(
        ("id" = i32, Path, description = "ID del grupo"),
        DeleteGrupoParams
    ),
    responses(
        (status = 200, description = "Grupo y dependencias eliminados", body = GrupoEliminado),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Grupo no encontrado", body = ErrorResponse),
        (status = 409, description = "Dependencias pendientes de confirmación", body = ConfirmacionEliminar)
    ),
    security(("bearer_auth" = [])),
    tag = "Grupos"
)]
#[instrument(skip(state))]
pub async fn delete_grupo(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
    Query(params): Query<DeleteGrupoParams>,
) -> Result<Response, AppError> {
    match GrupoService::eliminar_grupo(&state.db, id, params.confirmado()).await? {
        DeleteGrupoOutcome::RequiereConfirmacion(confirmacion) => {
            Ok((StatusCode::CONFLICT, Json(*confirmacion)).into_response())
        }
        DeleteGrupoOutcome::Eliminado(eliminado) => Ok(Json(*eliminado).into_response()),
    }
}
