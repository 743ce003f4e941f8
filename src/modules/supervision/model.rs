//! Modelos de la vista de supervisión sobre informes de calificación.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

pub const ESTADO_FINALIZADO: &str = "finalizado";
pub const ESTADO_REABIERTO: &str = "reabierto";

/// Un informe de calificación emitido por un docente.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Informe {
    pub id: i32,
    pub estudiante_id: i32,
    pub grupo_id: i32,
    pub docente_id: i32,
    pub rubrica_id: Option<i32>,
    pub estado: String,
    pub observaciones: Option<String>,
    pub creado_en: chrono::DateTime<chrono::Utc>,
}

/// Informe con los nombres que el supervisor necesita para auditar.
#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct InformeDetalle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub informe: Informe,
    pub estudiante_nombre: String,
    pub estudiante_apellido: String,
    pub grupo_nombre: String,
    pub docente_nombre: String,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct InformeQueryParams {
    /// `finalizado` o `reabierto`.
    pub estado: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct InformeReabierto {
    pub mensaje: String,
    pub informe: Informe,
}
