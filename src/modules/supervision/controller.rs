use crate::middleware::auth::AuthDocente;
use crate::middleware::role::exigir_supervisor;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::supervision::model::{InformeDetalle, InformeQueryParams, InformeReabierto};
use crate::modules::supervision::service::SupervisionService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

#[utoipa::path(
    get,
    path = "/api/supervision/informes",
    params(InformeQueryParams),
    responses(
        (status = 200, description = "Informes con estudiante, grupo y docente", body = [InformeDetalle]),
        (status = 400, description = "Estado desconocido", body = ErrorResponse),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 403, description = "Solo supervisores", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervisión"
)]
#[instrument(skip(state))]
pub async fn get_informes(
    State(state): State<AppState>,
    auth: AuthDocente,
    Query(params): Query<InformeQueryParams>,
) -> Result<Json<Vec<InformeDetalle>>, AppError> {
    exigir_supervisor(&auth)?;
    let informes = SupervisionService::listar_informes(&state.db, &params).await?;
    Ok(Json(informes))
}

#[utoipa::path(
    put,
    path = "/api/supervision/informes/reabrir/{id}",
    params(("id" = i32, Path, description = "ID del informe")),
    responses(
        (status = 200, description = "Informe reabierto", body = InformeReabierto),
        (status = 401, description = "Sin token válido", body = ErrorResponse),
        (status = 403, description = "Solo supervisores", body = ErrorResponse),
        (status = 404, description = "Informe no encontrado", body = ErrorResponse),
        (status = 409, description = "El informe no está finalizado", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Supervisión"
)]
#[instrument(skip(state))]
pub async fn reabrir_informe(
    State(state): State<AppState>,
    auth: AuthDocente,
    Path(id): Path<i32>,
) -> Result<Json<InformeReabierto>, AppError> {
    exigir_supervisor(&auth)?;
    let informe = SupervisionService::reabrir_informe(&state.db, id).await?;
    Ok(Json(informe))
}
