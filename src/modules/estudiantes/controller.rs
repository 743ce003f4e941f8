use crate::dependencias::model::{ConfirmacionEliminar, ConfirmacionLimpieza};
use crate::middleware::auth::AuthDocente;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::estudiantes::model::{
    CreateEstudianteDto, DeleteEstudianteOutcome, DeleteEstudianteParams, Estudiante,
    EstudianteActualizado, EstudianteEliminado, PaginatedEstudiantesResponse, PaginationMeta,
    QueryParams, UpdateEstudianteDto, UpdateEstudianteOutcome, UpdateEstudianteParams,
    VerificacionEstudiante,
};
use crate::modules::estudiantes::service::EstudianteService;
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
    path = "/api/estudiantes/create",
    request_body = CreateEstudianteDto,
    responses(
        (status = 200, description = "Estudiante creado", body = Estudiante),
        (status = 400, description = "Código duplicado", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 422, description = "Cuerpo inválido", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Estudiantes"
)]
#[instrument(skip(state))]
pub async fn create_estudiante(
    State(state): State<AppState>,
    _auth: AuthDocente,
    ValidatedJson(dto): ValidatedJson<CreateEstudianteDto>,
) -> Result<Json<Estudiante>, AppError> {
    let estudiante = EstudianteService::create_estudiante(&state.db, dto).await?;
    Ok(Json(estudiante))
}

#[utoipa::path(
    get,
    path = "/api/estudiantes/get",
    params(QueryParams),
    responses(
        (status = 200, description = "Listado paginado de estudiantes", body = PaginatedEstudiantesResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Estudiantes"
)]
#[instrument(skip(state))]
pub async fn get_estudiantes(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Query(params): Query<QueryParams>,
) -> Result<Json<PaginatedEstudiantesResponse>, AppError> {
    let limit = params.limit();
    let page = params.page();

    let (estudiantes, total) = EstudianteService::get_estudiantes(&state.db, &params).await?;

    let total_pages = (total as f64 / limit as f64).ceil() as i64;

    Ok(Json(PaginatedEstudiantesResponse {
        data: estudiantes,
        meta: PaginationMeta {
            page,
            limit,
            total,
            total_pages,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/estudiantes/get/{id}",
    params(("id" = i32, Path, description = "ID del estudiante")),
    responses(
        (status = 200, description = "Estudiante", body = Estudiante),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Estudiante no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Estudiantes"
)]
#[instrument(skip(state))]
pub async fn get_estudiante(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
) -> Result<Json<Estudiante>, AppError> {
    let estudiante = EstudianteService::get_estudiante(&state.db, id).await?;
    Ok(Json(estudiante))
}

#[utoipa::path(
    put,
    path = "/api/estudiantes/update/{id}",
    params(
        ("id" = i32, Path, description = "ID del estudiante"),
        UpdateEstudianteParams
    ),
    request_body = UpdateEstudianteDto,
    responses(
        (status = 200, description = "Actualizado (con o sin depuración)", body = EstudianteActualizado),
        (status = 400, description = "Código duplicado", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Estudiante no encontrado", body = ErrorResponse),
        (status = 409, description = "Cambio crítico pendiente de confirmación", body = ConfirmacionLimpieza)
    ),
    security(("bearer_auth" = [])),
    tag = "Estudiantes"
)]
#[instrument(skip(state))]
pub async fn update_estudiante(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
    Query(params): Query<UpdateEstudianteParams>,
    ValidatedJson(dto): ValidatedJson<UpdateEstudianteDto>,
) -> Result<Response, AppError> {
    match EstudianteService::update_estudiante(&state.db, id, dto, params.confirmado()).await? {
        UpdateEstudianteOutcome::RequiereConfirmacion(confirmacion) => {
            Ok((StatusCode::CONFLICT, Json(*confirmacion)).into_response())
        }
        UpdateEstudianteOutcome::Actualizado(estudiante) => Ok(Json(*estudiante).into_response()),
        UpdateEstudianteOutcome::ActualizadoConLimpieza(actualizado) => {
            Ok(Json(*actualizado).into_response())
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/estudiantes/verificar-dependencias/{id}",
    operation_id = "verificar_dependencias_estudiante",
    params(("id" = i32, Path, description = "ID del estudiante")),
    responses(
        (status = 200, description = "Dependencias del estudiante", body = VerificacionEstudiante),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Estudiante no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Estudiantes"
)]
#[instrument(skip(state))]
pub async fn verificar_dependencias(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
) -> Result<Json<VerificacionEstudiante>, AppError> {
    let verificacion = EstudianteService::verificar_dependencias(&state.db, id).await?;
    Ok(Json(verificacion))
}

#[utoipa::path(
    delete,
    path = "/api/estudiantes/delete/{id}",
    params(
        ("id" = i32, Path, description = "ID del estudiante"),
        DeleteEstudianteParams
    ),
    responses(
        (status = 200, description = "Estudiante y dependencias eliminados", body = EstudianteEliminado),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Estudiante no encontrado", body = ErrorResponse),
        (status = 409, description = "Dependencias pendientes de confirmación", body = ConfirmacionEliminar)
    ),
    security(("bearer_auth" = [])),
    tag = "Estudiantes"
)]
#[instrument(skip(state))]
pub async fn delete_estudiante(
    State(state): State<AppState>,
    _auth: AuthDocente,
    Path(id): Path<i32>,
    Query(params): Query<DeleteEstudianteParams>,
) -> Result<Response, AppError> {
    match EstudianteService::eliminar_estudiante(&state.db, id, params.confirmado()).await? {
        DeleteEstudianteOutcome::RequiereConfirmacion(confirmacion) => {
            Ok((StatusCode::CONFLICT, Json(*confirmacion)).into_response())
        }
        DeleteEstudianteOutcome::Eliminado(eliminado) => Ok(Json(*eliminado).into_response()),
    }
}
