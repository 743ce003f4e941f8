use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::docentes::model::Docente;

// JWT claims for an authenticated docente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // docente_id
    pub correo: String,
    pub rol: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SolicitarCodigoDto {
    #[validate(email(message = "El correo no es válido"))]
    pub correo: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerificarCodigoDto {
    #[validate(email(message = "El correo no es válido"))]
    pub correo: String,
    #[validate(length(equal = 6, message = "El código debe tener 6 dígitos"))]
    pub codigo: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MensajeResponse {
    pub mensaje: String,
}

// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub docente: Docente,
}
