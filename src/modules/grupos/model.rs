//! Modelos, DTOs y reglas de compatibilidad de grupos.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dependencias::model::{ConfirmacionEliminar, DeletionSummary, DependencyReport};
use crate::modules::estudiantes::model::{Estudiante, semestre_flexible};

/// Única carrera donde el paralelo diferencia secciones; en el resto el
/// campo es informativo y no restringe la incorporación.
pub const CARRERA_CON_PARALELO: &str = "Ciencias Básicas";

/// Tope de miembros activos por grupo.
pub const MAX_MIEMBROS_ACTIVOS: i64 = 5;

/// Un grupo de proyecto.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct Grupo {
    pub id: i32,
    pub nombre_proyecto: String,
    pub materia: String,
    pub carrera: String,
    pub semestre: i32,
    pub paralelo: Option<String>,
    pub docente_id: Option<i32>,
    pub creado_en: chrono::DateTime<chrono::Utc>,
}

/// Grupo con el nombre del docente responsable (si tiene).
#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct GrupoConDocente {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub grupo: Grupo,
    pub docente_nombre: Option<String>,
}

/// Fila de membresía tal como la consume el frontend.
#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct MiembroGrupo {
    pub id: i32,
    pub estudiante_id: i32,
    pub nombre: String,
    pub apellido: String,
    pub codigo: String,
    pub activo: bool,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct GrupoConMiembros {
    #[serde(flatten)]
    pub grupo: Grupo,
    pub miembros: Vec<MiembroGrupo>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateGrupoDto {
    #[validate(length(min = 1, max = 200, message = "El nombre del proyecto es obligatorio"))]
    pub nombre_proyecto: String,
    #[validate(length(min = 1, max = 100, message = "La materia es obligatoria"))]
    pub materia: String,
    #[validate(length(min = 1, max = 100, message = "La carrera es obligatoria"))]
    pub carrera: String,
    #[serde(deserialize_with = "semestre_flexible")]
    #[schema(value_type = i32)]
    pub semestre: i32,
    #[validate(length(min = 1, max = 5))]
    pub paralelo: Option<String>,
    pub docente_id: Option<i32>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct UpdateGrupoDto {
    #[validate(length(min = 1, max = 200, message = "El nombre del proyecto no puede estar vacío"))]
    pub nombre_proyecto: Option<String>,
    #[validate(length(min = 1, max = 100, message = "La materia no puede estar vacía"))]
    pub materia: Option<String>,
    pub docente_id: Option<i32>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct AgregarEstudianteDto {
    pub estudiante_id: i32,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct GrupoQueryParams {
    pub docente_id: Option<i32>,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct DeleteGrupoParams {
    pub confirmar: Option<bool>,
}

impl DeleteGrupoParams {
    pub fn confirmado(&self) -> bool {
        self.confirmar.unwrap_or(false)
    }
}

/// Respuesta de `GET /api/grupos/verificar-dependencias/{id}`.
#[derive(Serialize, Debug, ToSchema)]
pub struct VerificacionGrupo {
    pub grupo: Grupo,
    #[schema(value_type = Object)]
    pub dependencias: DependencyReport,
    #[serde(rename = "tieneDependencias")]
    pub tiene_dependencias: bool,
}

/// Respuesta de una eliminación aplicada.
#[derive(Serialize, Debug, ToSchema)]
pub struct GrupoEliminado {
    pub mensaje: String,
    pub grupo: Grupo,
    #[serde(rename = "dependenciasEliminadas")]
    #[schema(value_type = Object)]
    pub dependencias_eliminadas: DeletionSummary,
}

#[derive(Debug)]
pub enum DeleteGrupoOutcome {
    RequiereConfirmacion(Box<ConfirmacionEliminar>),
    Eliminado(Box<GrupoEliminado>),
}

/// Decide si un estudiante puede incorporarse al grupo. `miembros_activos`
/// ya excluye al propio candidato, de modo que reincorporar a un miembro
/// activo es idempotente y no consume cupo.
pub fn verificar_compatibilidad(
    grupo: &Grupo,
    estudiante: &Estudiante,
    miembros_activos: i64,
) -> Result<(), String> {
    if estudiante.carrera != grupo.carrera {
        return Err(format!(
            "El estudiante pertenece a la carrera {} y el grupo a {}",
            estudiante.carrera, grupo.carrera
        ));
    }
    if estudiante.semestre != grupo.semestre {
        return Err(format!(
            "El estudiante cursa el semestre {} y el grupo corresponde al semestre {}",
            estudiante.semestre, grupo.semestre
        ));
    }
    if grupo.carrera == CARRERA_CON_PARALELO && estudiante.paralelo != grupo.paralelo {
        return Err("El paralelo del estudiante no coincide con el del grupo".to_string());
    }
    if miembros_activos >= MAX_MIEMBROS_ACTIVOS {
        return Err(format!(
            "El grupo ya tiene el máximo de {} miembros activos",
            MAX_MIEMBROS_ACTIVOS
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn grupo_base() -> Grupo {
        Grupo {
            id: 1,
            nombre_proyecto: "Sistema de Riego".to_string(),
            materia: "Programación II".to_string(),
            carrera: "Sistemas".to_string(),
            semestre: 3,
            paralelo: None,
            docente_id: Some(7),
            creado_en: Utc::now(),
        }
    }

    fn estudiante_base() -> Estudiante {
        Estudiante {
            id: 42,
            nombre: "Ana".to_string(),
            apellido: "Rojas".to_string(),
            codigo: "E-101".to_string(),
            carrera: "Sistemas".to_string(),
            semestre: 3,
            paralelo: None,
            unidad_educativa: None,
            creado_en: Utc::now(),
        }
    }

    #[test]
    fn test_compatibilidad_acepta_mismo_perfil() {
        assert!(verificar_compatibilidad(&grupo_base(), &estudiante_base(), 0).is_ok());
    }

    #[test]
    fn test_compatibilidad_rechaza_otra_carrera() {
        let mut estudiante = estudiante_base();
        estudiante.carrera = "Industrial".to_string();
        let motivo = verificar_compatibilidad(&grupo_base(), &estudiante, 0).unwrap_err();
        assert!(motivo.contains("carrera"));
    }

    #[test]
    fn test_compatibilidad_rechaza_otro_semestre() {
        let mut estudiante = estudiante_base();
        estudiante.semestre = 5;
        let motivo = verificar_compatibilidad(&grupo_base(), &estudiante, 0).unwrap_err();
        assert!(motivo.contains("semestre"));
    }

    #[test]
    fn test_paralelo_solo_restringe_en_ciencias_basicas() {
        let mut grupo = grupo_base();
        let mut estudiante = estudiante_base();
        grupo.paralelo = Some("A".to_string());
        estudiante.paralelo = Some("B".to_string());

        // Fuera de Ciencias Básicas el paralelo no importa.
        assert!(verificar_compatibilidad(&grupo, &estudiante, 0).is_ok());

        grupo.carrera = CARRERA_CON_PARALELO.to_string();
        estudiante.carrera = CARRERA_CON_PARALELO.to_string();
        let motivo = verificar_compatibilidad(&grupo, &estudiante, 0).unwrap_err();
        assert!(motivo.contains("paralelo"));

        estudiante.paralelo = Some("A".to_string());
        assert!(verificar_compatibilidad(&grupo, &estudiante, 0).is_ok());
    }

    #[test]
    fn test_capacidad_maxima() {
        let resultado =
            verificar_compatibilidad(&grupo_base(), &estudiante_base(), MAX_MIEMBROS_ACTIVOS);
        assert!(resultado.unwrap_err().contains("máximo"));

        assert!(verificar_compatibilidad(
            &grupo_base(),
            &estudiante_base(),
            MAX_MIEMBROS_ACTIVOS - 1
        )
        .is_ok());
    }

    #[test]
    fn test_semestre_flexible_en_create_grupo() {
        let dto: CreateGrupoDto = serde_json::from_str(
            r#"{"nombre_proyecto":"Riego","materia":"Prog II","carrera":"Sistemas","semestre":"3"}"#,
        )
        .unwrap();
        assert_eq!(dto.semestre, 3);
    }
}
