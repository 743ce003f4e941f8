use crate::middleware::auth::AuthDocente;
use crate::utils::errors::AppError;

/// Guard para handlers exclusivos de supervisores.
pub fn exigir_supervisor(auth: &AuthDocente) -> Result<(), AppError> {
    if !auth.es_supervisor() {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Solo un supervisor puede acceder a este recurso"
        )));
    }
    Ok(())
}
