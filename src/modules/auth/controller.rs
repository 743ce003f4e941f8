use crate::middleware::auth::AuthDocente;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;
use axum::Json;
use axum::extract::State;
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use super::model::{LoginResponse, MensajeResponse, SolicitarCodigoDto, VerificarCodigoDto};
use super::service::AuthService;
use crate::modules::docentes::model::Docente;

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request a one-time login code by email
#[utoipa::path(
    post,
    path = "/api/auth/solicitar-codigo",
    request_body = SolicitarCodigoDto,
    responses(
        (status = 200, description = "Código enviado al correo del docente", body = MensajeResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 404, description = "No existe un docente con ese correo", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Autenticación"
)]
#[instrument(skip(state))]
pub async fn solicitar_codigo(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SolicitarCodigoDto>,
) -> Result<Json<MensajeResponse>, AppError> {
    AuthService::solicitar_codigo(&state.db, dto, &state.email_config).await?;
    Ok(Json(MensajeResponse {
        mensaje: "Se envió un código de acceso a tu correo.".to_string(),
    }))
}

/// Exchange a login code for a JWT
#[utoipa::path(
    post,
    path = "/api/auth/verificar-codigo",
    request_body = VerificarCodigoDto,
    responses(
        (status = 200, description = "Inicio de sesión correcto", body = LoginResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Código incorrecto, expirado o agotado", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Autenticación"
)]
#[instrument(skip(state, dto))]
pub async fn verificar_codigo(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<VerificarCodigoDto>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::verificar_codigo(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Profile of the authenticated docente
#[utoipa::path(
    get,
    path = "/api/auth/perfil",
    responses(
        (status = 200, description = "Perfil del docente autenticado", body = Docente),
        (status = 401, description = "Token ausente o inválido", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Autenticación"
)]
#[instrument(skip(state))]
pub async fn perfil(
    State(state): State<AppState>,
    auth: AuthDocente,
) -> Result<Json<Docente>, AppError> {
    let docente = AuthService::perfil(&state.db, auth.docente_id()?).await?;
    Ok(Json(docente))
}
