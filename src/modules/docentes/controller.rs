use crate::dependencias::model::ConfirmacionEliminar;
use crate::middleware::auth::AuthDocente;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::docentes::model::{
    CreateDocenteDto, DeleteDocenteOutcome, DeleteDocenteParams, DocenteConCarreras,
    DocenteEliminado, UpdateDocenteDto, VerificacionDocente,
};
use crate::modules::docentes::service::DocenteService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

#[utoipa::path(
    post,
    path = "/api/docentes/create",
    request_body = CreateDocenteDto,
    responses(
        (status = 200, description = "Docente creado", body = DocenteConCarreras),
        (status = 400, description = "Correo duplicado o rol desconocido", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 422, description = "Cuerpo inválido", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Docentes"
)]
#[instrument(skip(state))]
pub async fn create_docente(
    State(state): State<AppState>,
    _auth: AuthDocente,
    ValidatedJson(dto): ValidatedJson<CreateDocenteDto>,
) -> Result<Json<DocenteConCarreras>, AppError> {
    let docente = DocenteService::create_docente(&state.db, dto).await?;
    Ok(Json(docente))
}

#[utoipa::path(
    get,
    path = "/api/docentes/get",
    responses(
        (status = 200, description = "Listado de docentes con sus carreras", body = [DocenteConCarreras]),
        (status = 401, description = "Sin token válido", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Docentes"
)]
#[instrument(skip(state))]
pub async fn get_docentes(
    State(state): State<AppState>,
    _auth: AuthDocente,
) -> Result<Json<Vec<DocenteConCarreras>>, AppError> {
    let docentes = DocenteService::get_docentes(&state.db).await?;
    Ok(Json(docentes))
}

#[utoipa::path(
    get,
    path = "/api/docentes/get/{id}",
    params(("id" = i32, Path, description = "ID del docente")),
    responses(
        (status = 200, description = "Docente con sus carreras", body = DocenteConCarreras),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Docente no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Docentes"
)]
#[instrument(skip(state))]
pub async fn get_docente(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
) -> Result<Json<DocenteConCarreras>, AppError> {
    let docente = DocenteService::get_docente(&state.db, id).await?;
    Ok(Json(docente))
}

#[utoipa::path(
    put,
    path = "/api/docentes/update/{id}",
    params(("id" = i32, Path, description = "ID del docente")),
    request_body = UpdateDocenteDto,
    responses(
        (status = 200, description = "Docente actualizado", body = DocenteConCarreras),
        (status = 400, description = "Correo duplicado o rol desconocido", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Docente no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Docentes"
)]
#[instrument(skip(state))]
pub async fn update_docente(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateDocenteDto>,
) -> Result<Json<DocenteConCarreras>, AppError> {
    let docente = DocenteService::update_docente(&state.db, id, dto).await?;
    Ok(Json(docente))
}

#[utoipa::path(
    get,
    path = "/api/docentes/verificar-dependencias/{id}",
    operation_id = "verificar_dependencias_docente",
    params(("id" = i32, Path, description = "ID del docente")),
    responses(
        (status = 200, description = "Dependencias del docente y destinos de reasignación", body = VerificacionDocente),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Docente no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Docentes"
)]
#[instrument(skip(state))]
pub async fn verificar_dependencias(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
) -> Result<Json<VerificacionDocente>, AppError> {
    let verificacion = DocenteService::verificar_dependencias(&state.db, id).await?;
    Ok(Json(verificacion))
}

#[utoipa::path(
    delete,
    path = "/api/docentes/delete/{id}",
    params(
        ("id" = i32, Path, description = "ID del docente"),
        DeleteDocenteParams
    ),
    responses(
        (status = 200, description = "Docente y dependencias eliminados", body = DocenteEliminado),
        (status = 400, description = "Parámetros de reasignación inválidos", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Docente no encontrado", body = ErrorResponse),
        (status = 409, description = "Dependencias pendientes de confirmación", body = ConfirmacionEliminar)
    ),
    security(("bearer_auth" = [])),
    tag = "Docentes"
)]
#[instrument(skip(state))]
pub async fn delete_docente(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
    Query(params): Query<DeleteDocenteParams>,
) -> Result<Response, AppError> {
    match DocenteService::eliminar_docente(&state.db, id, &params).await? {
        DeleteDocenteOutcome::RequiereConfirmacion(confirmacion) => {
            Ok((StatusCode::CONFLICT, Json(*confirmacion)).into_response())
        }
        DeleteDocenteOutcome::Eliminado(eliminado) => Ok(Json(*eliminado).into_response()),
    }
}
