//! Modelos y DTOs de docentes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dependencias::model::{ConfirmacionEliminar, DeletionSummary, DependencyReport};

/// Un docente o supervisor registrado.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Docente {
    pub id: i32,
    pub nombre: String,
    pub correo: String,
    pub rol: String,
    pub creado_en: chrono::DateTime<chrono::Utc>,
}

impl Docente {
    pub fn es_supervisor(&self) -> bool {
        self.rol == "supervisor"
    }
}

/// Docente junto a las carreras que tiene asignadas.
#[derive(Serialize, Debug, ToSchema)]
pub struct DocenteConCarreras {
    #[serde(flatten)]
    pub docente: Docente,
    pub carreras: Vec<String>,
}

/// Identificación mínima para el selector de reasignación.
#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct DocenteResumen {
    pub id: i32,
    pub nombre: String,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateDocenteDto {
    #[validate(length(min = 1, max = 150, message = "El nombre es obligatorio"))]
    pub nombre: String,
    #[validate(email(message = "El correo no es válido"))]
    pub correo: String,
    /// `docente` (por defecto) o `supervisor`.
    pub rol: Option<String>,
    #[serde(default)]
    pub carreras: Vec<String>,
}

/// Todos los campos son opcionales; `carreras` reemplaza la lista completa.
#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct UpdateDocenteDto {
    #[validate(length(min = 1, max = 150, message = "El nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    #[validate(email(message = "El correo no es válido"))]
    pub correo: Option<String>,
    pub rol: Option<String>,
    pub carreras: Option<Vec<String>>,
}

/// Parámetros de confirmación del DELETE.
#[derive(Deserialize, Debug, IntoParams)]
pub struct DeleteDocenteParams {
    pub confirmar: Option<bool>,
    /// Reasigna los grupos del docente a otro docente existente.
    pub reasignar_a: Option<i32>,
    /// Elimina los grupos del docente junto con sus registros asociados.
    pub borrar_grupos: Option<bool>,
}

impl DeleteDocenteParams {
    pub fn confirmado(&self) -> bool {
        self.confirmar.unwrap_or(false)
    }

    pub fn borrar_grupos(&self) -> bool {
        self.borrar_grupos.unwrap_or(false)
    }
}

/// Respuesta de `GET /api/docentes/verificar-dependencias/{id}`.
#[derive(Serialize, Debug, ToSchema)]
pub struct VerificacionDocente {
    pub docente: Docente,
    #[schema(value_type = Object)]
    pub dependencias: DependencyReport,
    #[serde(rename = "tieneDependencias")]
    pub tiene_dependencias: bool,
    #[serde(rename = "docentesDisponibles")]
    pub docentes_disponibles: Vec<DocenteResumen>,
}

/// Qué se hizo con los grupos del docente eliminado.
#[derive(Serialize, Debug, ToSchema)]
pub struct AccionGrupos {
    /// `reasignados`, `eliminados` o `sin_docente`.
    pub accion: String,
    pub cantidad: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasignado_a: Option<i32>,
}

/// Respuesta de una eliminación aplicada.
#[derive(Serialize, Debug, ToSchema)]
pub struct DocenteEliminado {
    pub mensaje: String,
    pub docente: Docente,
    #[serde(rename = "dependenciasEliminadas")]
    #[schema(value_type = Object)]
    pub dependencias_eliminadas: DeletionSummary,
    #[serde(rename = "accionGrupos", skip_serializing_if = "Option::is_none")]
    pub accion_grupos: Option<AccionGrupos>,
}

/// El servicio de eliminación o pide confirmación o devuelve el resumen.
#[derive(Debug)]
pub enum DeleteDocenteOutcome {
    RequiereConfirmacion(Box<ConfirmacionEliminar>),
    Eliminado(Box<DocenteEliminado>),
}
