use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the bearer JWT and exposes the authenticated
/// docente's claims. Handlers receive identity and scope through this
/// value explicitly; nothing is read from ambient storage.
#[derive(Debug, Clone)]
pub struct AuthDocente(pub Claims);

impl AuthDocente {
    /// The authenticated docente's id as stored in the `sub` claim.
    pub fn docente_id(&self) -> Result<i32, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Token con identidad inválida")))
    }

    pub fn correo(&self) -> &str {
        &self.0.correo
    }

    pub fn es_supervisor(&self) -> bool {
        self.0.rol == "supervisor"
    }
}

impl FromRequestParts<AppState> for AuthDocente {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Falta el encabezado de autorización"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Formato de autorización inválido"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthDocente(claims))
    }
}
