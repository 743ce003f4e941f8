//! Static catalogs of dependent relations per entity.
//!
//! Catalog order IS the deletion order: leaf tables first, so each DELETE
//! only ever removes rows nothing else references. Adding a dependent table
//! to the schema means adding one entry here; the counting query, the
//! samples and the purge loop all derive from these entries.

use super::model::RelationKind;

/// One dependent relation: where its rows live, how they reference the
/// owning entity and how to render a bounded sample for the 409 payload.
#[derive(Debug, Clone, Copy)]
pub struct RelationSpec {
    pub kind: RelationKind,
    /// JSON key in dependency reports and deletion summaries.
    pub label: &'static str,
    /// Table holding the dependent rows (also the purge target).
    pub table: &'static str,
    /// Column on `table` referencing the owning entity.
    pub fk_column: &'static str,
    /// Query producing `(id, descripcion)` rows; `$1` is the owner id.
    pub sample_sql: &'static str,
}

impl RelationSpec {
    /// `SELECT '<label>' AS relacion, COUNT(*) AS cantidad FROM ... WHERE fk = $1`
    fn count_sql(&self) -> String {
        format!(
            "SELECT '{}' AS relacion, COUNT(*) AS cantidad FROM {} WHERE {} = $1",
            self.label, self.table, self.fk_column
        )
    }

    /// `DELETE FROM <table> WHERE <fk_column> = $1`
    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = $1", self.table, self.fk_column)
    }
}

/// Single round trip counting every relation of a catalog.
pub fn count_union_sql(specs: &[RelationSpec]) -> String {
    specs
        .iter()
        .map(RelationSpec::count_sql)
        .collect::<Vec<_>>()
        .join(" UNION ALL ")
}

/// Dependents of a docente. `grupos` is intentionally late: informes,
/// calificaciones and borradores may reference those grupos and must be
/// gone before they are touched.
pub const DOCENTE_RELATIONS: &[RelationSpec] = &[
    RelationSpec {
        kind: RelationKind::Borradores,
        label: "borradores",
        table: "borradores",
        fk_column: "docente_id",
        sample_sql: "SELECT b.id, 'borrador del grupo ' || g.nombre_proyecto AS descripcion \
                     FROM borradores b JOIN grupos g ON g.id = b.grupo_id \
                     WHERE b.docente_id = $1 ORDER BY b.id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Informes,
        label: "informes",
        table: "informes",
        fk_column: "docente_id",
        sample_sql: "SELECT id, 'informe ' || estado || ' del grupo ' || grupo_id::TEXT AS descripcion \
                     FROM informes WHERE docente_id = $1 ORDER BY id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Calificaciones,
        label: "calificaciones",
        table: "calificaciones",
        fk_column: "docente_id",
        sample_sql: "SELECT id, 'nota ' || nota::TEXT || ' en el grupo ' || grupo_id::TEXT AS descripcion \
                     FROM calificaciones WHERE docente_id = $1 ORDER BY id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Rubricas,
        label: "rubricas",
        table: "rubricas",
        fk_column: "docente_id",
        sample_sql: "SELECT id, nombre AS descripcion FROM rubricas \
                     WHERE docente_id = $1 ORDER BY id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Grupos,
        label: "grupos",
        table: "grupos",
        fk_column: "docente_id",
        sample_sql: "SELECT id, nombre_proyecto || ' (' || materia || ')' AS descripcion \
                     FROM grupos WHERE docente_id = $1 ORDER BY id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Carreras,
        label: "carreras",
        table: "docente_carrera",
        fk_column: "docente_id",
        sample_sql: "SELECT id, carrera AS descripcion FROM docente_carrera \
                     WHERE docente_id = $1 ORDER BY id LIMIT 10",
    },
];

/// Dependents of an estudiante. Memberships (`estudiante_grupo`) go last
/// because informes and calificaciones describe that participation.
pub const ESTUDIANTE_RELATIONS: &[RelationSpec] = &[
    RelationSpec {
        kind: RelationKind::Informes,
        label: "informes",
        table: "informes",
        fk_column: "estudiante_id",
        sample_sql: "SELECT id, 'informe ' || estado || ' del grupo ' || grupo_id::TEXT AS descripcion \
                     FROM informes WHERE estudiante_id = $1 ORDER BY id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Calificaciones,
        label: "calificaciones",
        table: "calificaciones",
        fk_column: "estudiante_id",
        sample_sql: "SELECT id, 'nota ' || nota::TEXT || ' en el grupo ' || grupo_id::TEXT AS descripcion \
                     FROM calificaciones WHERE estudiante_id = $1 ORDER BY id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Grupos,
        label: "grupos",
        table: "estudiante_grupo",
        fk_column: "estudiante_id",
        sample_sql: "SELECT eg.id, g.nombre_proyecto || \
                     CASE WHEN eg.activo THEN ' (activo)' ELSE ' (inactivo)' END AS descripcion \
                     FROM estudiante_grupo eg JOIN grupos g ON g.id = eg.grupo_id \
                     WHERE eg.estudiante_id = $1 ORDER BY eg.id LIMIT 10",
    },
];

/// Dependents of a grupo. Memberships close the list for the same reason
/// as in the estudiante catalog.
pub const GRUPO_RELATIONS: &[RelationSpec] = &[
    RelationSpec {
        kind: RelationKind::Borradores,
        label: "borradores",
        table: "borradores",
        fk_column: "grupo_id",
        sample_sql: "SELECT b.id, 'borrador del docente ' || d.nombre AS descripcion \
                     FROM borradores b JOIN docentes d ON d.id = b.docente_id \
                     WHERE b.grupo_id = $1 ORDER BY b.id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Informes,
        label: "informes",
        table: "informes",
        fk_column: "grupo_id",
        sample_sql: "SELECT id, 'informe ' || estado AS descripcion \
                     FROM informes WHERE grupo_id = $1 ORDER BY id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Calificaciones,
        label: "calificaciones",
        table: "calificaciones",
        fk_column: "grupo_id",
        sample_sql: "SELECT id, 'nota ' || nota::TEXT AS descripcion \
                     FROM calificaciones WHERE grupo_id = $1 ORDER BY id LIMIT 10",
    },
    RelationSpec {
        kind: RelationKind::Estudiantes,
        label: "estudiantes",
        table: "estudiante_grupo",
        fk_column: "grupo_id",
        sample_sql: "SELECT eg.id, e.apellido || ' ' || e.nombre AS descripcion \
                     FROM estudiante_grupo eg JOIN estudiantes e ON e.id = eg.estudiante_id \
                     WHERE eg.grupo_id = $1 ORDER BY eg.id LIMIT 10",
    },
];
