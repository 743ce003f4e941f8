//! Borradores de calificación: uno por (docente, grupo), el guardado
//! siempre es un upsert.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct Borrador {
    pub id: i32,
    pub docente_id: i32,
    pub grupo_id: i32,
    #[schema(value_type = Object)]
    pub contenido: serde_json::Value,
    pub actualizado_en: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct GuardarBorradorDto {
    pub grupo_id: i32,
    /// Estado libre del formulario de calificación; el backend no lo
    /// interpreta.
    #[schema(value_type = Object)]
    pub contenido: serde_json::Value,
}
