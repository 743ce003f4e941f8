use crate::middleware::auth::AuthDocente;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::borradores::model::{Borrador, GuardarBorradorDto};
use crate::modules::borradores::service::BorradorService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

#[utoipa::path(
    put,
    path = "/api/borradores/guardar",
    request_body = GuardarBorradorDto,
    responses(
        (status = 200, description = "Borrador guardado (creado o actualizado)", body = Borrador),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Grupo no encontrado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borradores"
)]
#[instrument(skip(state))]
pub async fn guardar_borrador(
    State(state): State<AppState>,
    auth: AuthDocente,
    ValidatedJson(dto): ValidatedJson<GuardarBorradorDto>,
) -> Result<Json<Borrador>, AppError> {
    let docente_id = auth.docente_id()?;
    let borrador = BorradorService::guardar(&state.db, docente_id, dto).await?;
    Ok(Json(borrador))
}

#[utoipa::path(
    get,
    path = "/api/borradores/get/{grupo_id}",
    params(("grupo_id" = i32, Path, description = "ID del grupo")),
    responses(
        (status = 200, description = "Borrador propio para el grupo", body = Borrador),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 404, description = "Sin borrador para ese grupo", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Borradores"
)]
#[instrument(skip(state))]
pub async fn get_borrador(
    State(state): State<AppState>,
    auth: AuthDocente,
    Path(grupo_id): Path<i32>,
) -> Result<Json<Borrador>, AppError> {
    let docente_id = auth.docente_id()?;
    let borrador = BorradorService::obtener(&state.db, docente_id, grupo_id).await?;
    Ok(Json(borrador))
}
