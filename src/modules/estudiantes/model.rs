//! Modelos y DTOs de estudiantes.
//!
//! `semestre` se normaliza en la frontera serde: el frontend histórico lo
//! envía indistintamente como `"3"` o `3` y ambos deben comparar iguales
//! contra la columna INTEGER.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dependencias::model::{
    CamposAfectados, ConfirmacionEliminar, ConfirmacionLimpieza, DeletionSummary, DependencyReport,
};

#[derive(Deserialize)]
#[serde(untagged)]
enum SemestreRaw {
    Numero(i64),
    Texto(String),
}

impl SemestreRaw {
    fn normalizar(self) -> Result<i32, String> {
        match self {
            SemestreRaw::Numero(n) => {
                i32::try_from(n).map_err(|_| format!("semestre fuera de rango: {}", n))
            }
            SemestreRaw::Texto(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|_| format!("semestre inválido: {:?}", s)),
        }
    }
}

pub fn semestre_flexible<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    SemestreRaw::deserialize(deserializer)?
        .normalizar()
        .map_err(serde::de::Error::custom)
}

pub fn semestre_flexible_opcional<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<SemestreRaw>::deserialize(deserializer)? {
        Some(raw) => raw
            .normalizar()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Un estudiante matriculado.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Estudiante {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub codigo: String,
    pub carrera: String,
    pub semestre: i32,
    pub paralelo: Option<String>,
    pub unidad_educativa: Option<String>,
    pub creado_en: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateEstudianteDto {
    #[validate(length(min = 1, max = 100, message = "El nombre es obligatorio"))]
    pub nombre: String,
    #[validate(length(min = 1, max = 100, message = "El apellido es obligatorio"))]
    pub apellido: String,
    #[validate(length(min = 1, max = 30, message = "El código es obligatorio"))]
    pub codigo: String,
    #[validate(length(min = 1, max = 100, message = "La carrera es obligatoria"))]
    pub carrera: String,
    #[serde(deserialize_with = "semestre_flexible")]
    #[schema(value_type = i32)]
    pub semestre: i32,
    #[validate(length(min = 1, max = 5))]
    pub paralelo: Option<String>,
    pub unidad_educativa: Option<String>,
}

/// Todos los campos opcionales; `carrera` y `semestre` son críticos y
/// pueden exigir confirmación de limpieza.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct UpdateEstudianteDto {
    #[validate(length(min = 1, max = 100, message = "El nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    #[validate(length(min = 1, max = 100, message = "El apellido no puede estar vacío"))]
    pub apellido: Option<String>,
    #[validate(length(min = 1, max = 30, message = "El código no puede estar vacío"))]
    pub codigo: Option<String>,
    #[validate(length(min = 1, max = 100, message = "La carrera no puede estar vacía"))]
    pub carrera: Option<String>,
    #[serde(default, deserialize_with = "semestre_flexible_opcional")]
    #[schema(value_type = Option<i32>)]
    pub semestre: Option<i32>,
    #[validate(length(min = 1, max = 5))]
    pub paralelo: Option<String>,
    pub unidad_educativa: Option<String>,
}

/// Filtros y paginación del listado.
#[derive(Deserialize, Debug, IntoParams)]
pub struct QueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub carrera: Option<String>,
    pub semestre: Option<i32>,
    pub paralelo: Option<String>,
    /// Busca en nombre, apellido y código.
    pub busqueda: Option<String>,
}

impl QueryParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaginatedEstudiantesResponse {
    pub data: Vec<Estudiante>,
    pub meta: PaginationMeta,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct UpdateEstudianteParams {
    pub confirmar_limpieza: Option<bool>,
}

impl UpdateEstudianteParams {
    pub fn confirmado(&self) -> bool {
        self.confirmar_limpieza.unwrap_or(false)
    }
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct DeleteEstudianteParams {
    pub confirmar: Option<bool>,
}

impl DeleteEstudianteParams {
    pub fn confirmado(&self) -> bool {
        self.confirmar.unwrap_or(false)
    }
}

/// Respuesta de `GET /api/estudiantes/verificar-dependencias/{id}`.
#[derive(Serialize, Debug, ToSchema)]
pub struct VerificacionEstudiante {
    pub estudiante: Estudiante,
    #[schema(value_type = Object)]
    pub dependencias: DependencyReport,
    #[serde(rename = "tieneDependencias")]
    pub tiene_dependencias: bool,
}

/// Respuesta de una actualización que depuró registros dependientes.
#[derive(Serialize, Debug, ToSchema)]
pub struct EstudianteActualizado {
    pub mensaje: String,
    pub estudiante: Estudiante,
    #[serde(rename = "dependenciasEliminadas")]
    #[schema(value_type = Object)]
    pub dependencias_eliminadas: DeletionSummary,
    pub campos_afectados: CamposAfectados,
}

#[derive(Debug)]
pub enum UpdateEstudianteOutcome {
    RequiereConfirmacion(Box<ConfirmacionLimpieza>),
    Actualizado(Box<Estudiante>),
    ActualizadoConLimpieza(Box<EstudianteActualizado>),
}

/// Respuesta de una eliminación aplicada.
#[derive(Serialize, Debug, ToSchema)]
pub struct EstudianteEliminado {
    pub mensaje: String,
    pub estudiante: Estudiante,
    #[serde(rename = "dependenciasEliminadas")]
    #[schema(value_type = Object)]
    pub dependencias_eliminadas: DeletionSummary,
}

#[derive(Debug)]
pub enum DeleteEstudianteOutcome {
    RequiereConfirmacion(Box<ConfirmacionEliminar>),
    Eliminado(Box<EstudianteEliminado>),
}
