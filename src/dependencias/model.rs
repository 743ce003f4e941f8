//! Report and payload types for the dependency-resolution protocol.
//!
//! Every relation reports the same fixed shape (`cantidad` plus a bounded
//! `detalle` sample), so consumers pattern-match instead of probing ad hoc
//! JSON. The wire keys follow the frontend contract
//! (`tieneDependencias`, `campos_afectados.cambioCarrera`, ...).

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

/// Dependent relations known to the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Borradores,
    Informes,
    Calificaciones,
    Rubricas,
    /// Owned groups (docente) or group memberships (estudiante).
    Grupos,
    /// Career assignment rows of a docente.
    Carreras,
    /// Membership rows seen from the grupo side.
    Estudiantes,
}

/// One sampled dependent row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct SampleRow {
    pub id: i32,
    pub descripcion: String,
}

/// Count plus bounded sample (≤10 rows) for one relation.
#[derive(Debug, Clone, Serialize)]
pub struct RelationReport {
    #[serde(skip)]
    pub kind: RelationKind,
    #[serde(skip)]
    pub label: &'static str,
    pub cantidad: i64,
    pub detalle: Vec<SampleRow>,
}

/// Aggregate of every dependent row referencing one entity, in catalog
/// (deletion) order. Serializes to `{ <label>: { cantidad, detalle } }`.
#[derive(Debug, Clone, Default)]
pub struct DependencyReport {
    pub relations: Vec<RelationReport>,
}

impl DependencyReport {
    pub fn tiene_dependencias(&self) -> bool {
        self.relations.iter().any(|r| r.cantidad > 0)
    }

    pub fn cantidad(&self, kind: RelationKind) -> i64 {
        self.relations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.cantidad)
            .sum()
    }
}

impl Serialize for DependencyReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.relations.len()))?;
        for relation in &self.relations {
            map.serialize_entry(relation.label, relation)?;
        }
        map.end()
    }
}

/// Rows actually removed by a confirmed delete or cleanup, keyed by
/// relation label. Group-cascade rows accumulate onto the same labels.
#[derive(Debug, Clone, Default)]
pub struct DeletionSummary {
    entries: Vec<(&'static str, u64)>,
}

impl DeletionSummary {
    pub fn record(&mut self, label: &'static str, count: u64) {
        if count == 0 {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(l, _)| *l == label) {
            entry.1 += count;
        } else {
            self.entries.push((label, count));
        }
    }

    pub fn count(&self, label: &str) -> u64 {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, c)| *c)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

impl Serialize for DeletionSummary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

/// Remediation hints sent with a blocked docente deletion.
#[derive(Debug, Serialize, ToSchema)]
pub struct OpcionesEliminacion {
    pub reasignar_a: &'static str,
    pub borrar_grupos: &'static str,
    pub por_defecto: &'static str,
}

impl OpcionesEliminacion {
    pub fn docente() -> Self {
        Self {
            reasignar_a: "reasignar_a=<id>: transfiere los grupos a otro docente",
            borrar_grupos: "borrar_grupos=true: elimina los grupos y sus miembros",
            por_defecto: "sin parámetros los grupos quedan sin docente asignado",
        }
    }
}

/// 409 payload for a delete blocked pending confirmation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmacionEliminar {
    pub error: String,
    #[schema(value_type = Object)]
    pub dependencias: DependencyReport,
    pub mensaje: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opciones: Option<OpcionesEliminacion>,
}

impl ConfirmacionEliminar {
    pub fn new(entidad: &str, dependencias: DependencyReport) -> Self {
        Self {
            error: format!("El {} tiene dependencias asociadas", entidad),
            mensaje: format!(
                "Reenvíe la solicitud con confirmar=true para eliminar el {} y sus dependencias",
                entidad
            ),
            dependencias,
            opciones: None,
        }
    }

    pub fn with_opciones(mut self, opciones: OpcionesEliminacion) -> Self {
        self.opciones = Some(opciones);
        self
    }
}

/// Which critical fields an estudiante update touches.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct CamposAfectados {
    #[serde(rename = "cambioCarrera")]
    pub cambio_carrera: bool,
    #[serde(rename = "cambioSemestre")]
    pub cambio_semestre: bool,
}

impl CamposAfectados {
    pub fn hay_cambio(&self) -> bool {
        self.cambio_carrera || self.cambio_semestre
    }
}

/// 409 payload for a critical-field update blocked pending confirmation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmacionLimpieza {
    pub error: String,
    #[schema(value_type = Object)]
    pub dependencias: DependencyReport,
    pub mensaje: String,
    pub campos_afectados: CamposAfectados,
}

impl ConfirmacionLimpieza {
    pub fn new(dependencias: DependencyReport, campos_afectados: CamposAfectados) -> Self {
        Self {
            error: "El cambio de carrera o semestre invalida registros asociados".to_string(),
            mensaje: "Reenvíe la solicitud con confirmar_limpieza=true para aplicar el cambio y depurar los registros".to_string(),
            dependencias,
            campos_afectados,
        }
    }
}
