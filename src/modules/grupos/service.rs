use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dependencias::aggregator;
use crate::dependencias::catalog::GRUPO_RELATIONS;
use crate::dependencias::model::{ConfirmacionEliminar, DeletionSummary};
use crate::modules::estudiantes::model::Estudiante;
use crate::modules::grupos::model::{
    CreateGrupoDto, DeleteGrupoOutcome, Grupo, GrupoConDocente, GrupoConMiembros, GrupoEliminado,
    GrupoQueryParams, MiembroGrupo, UpdateGrupoDto, VerificacionGrupo, verificar_compatibilidad,
};
use crate::utils::errors::AppError;

const GRUPO_COLUMNS: &str =
    "id, nombre_proyecto, materia, carrera, semestre, paralelo, docente_id, creado_en";

pub struct GrupoService;

impl GrupoService {
    #[instrument(skip(db, dto))]
    pub async fn create_grupo(db: &PgPool, dto: CreateGrupoDto) -> Result<Grupo, AppError> {
        if let Some(docente_id) = dto.docente_id {
            Self::exigir_docente(db, docente_id).await?;
        }

        let grupo = sqlx::query_as(&format!(
            "INSERT INTO grupos (nombre_proyecto, materia, carrera, semestre, paralelo, docente_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            GRUPO_COLUMNS
        ))
        .bind(&dto.nombre_proyecto)
        .bind(&dto.materia)
        .bind(&dto.carrera)
        .bind(dto.semestre)
        .bind(&dto.paralelo)
        .bind(dto.docente_id)
        .fetch_one(db)
        .await?;

        Ok(grupo)
    }

    #[instrument(skip(db))]
    pub async fn get_grupos(
        db: &PgPool,
        params: &GrupoQueryParams,
    ) -> Result<Vec<GrupoConDocente>, AppError> {
        let base = format!(
            "SELECT g.id, g.nombre_proyecto, g.materia, g.carrera, g.semestre, g.paralelo, \
             g.docente_id, g.creado_en, d.nombre AS docente_nombre \
             FROM grupos g LEFT JOIN docentes d ON d.id = g.docente_id{} ORDER BY g.id",
            if params.docente_id.is_some() {
                " WHERE g.docente_id = $1"
            } else {
                ""
            }
        );

        let mut query = sqlx::query_as::<_, GrupoConDocente>(&base);
        if let Some(docente_id) = params.docente_id {
            query = query.bind(docente_id);
        }

        Ok(query.fetch_all(db).await?)
    }

    #[instrument(skip(db))]
    pub async fn get_grupo(db: &PgPool, id: i32) -> Result<GrupoConMiembros, AppError> {
        let grupo = Self::fetch_grupo(db, id).await?;

        let miembros: Vec<MiembroGrupo> = sqlx::query_as(
            "SELECT eg.id, eg.estudiante_id, e.nombre, e.apellido, e.codigo, eg.activo \
             FROM estudiante_grupo eg JOIN estudiantes e ON e.id = eg.estudiante_id \
             WHERE eg.grupo_id = $1 ORDER BY e.apellido, e.nombre",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(GrupoConMiembros { grupo, miembros })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_grupo(db: &PgPool, id: i32, dto: UpdateGrupoDto) -> Result<Grupo, AppError> {
        let existing = Self::fetch_grupo(db, id).await?;

        if let Some(docente_id) = dto.docente_id {
            Self::exigir_docente(db, docente_id).await?;
        }

        let nombre_proyecto = dto.nombre_proyecto.unwrap_or(existing.nombre_proyecto);
        let materia = dto.materia.unwrap_or(existing.materia);
        let docente_id = dto.docente_id.or(existing.docente_id);

        let grupo = sqlx::query_as(&format!(
            "UPDATE grupos SET nombre_proyecto = $1, materia = $2, docente_id = $3 \
             WHERE id = $4 RETURNING {}",
            GRUPO_COLUMNS
        ))
        .bind(&nombre_proyecto)
        .bind(&materia)
        .bind(docente_id)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(grupo)
    }

    /// Comprueba compatibilidad (§ modelo) y hace el upsert idempotente de
    /// la membresía: reincorporar a un miembro lo reactiva sin duplicar la
    /// fila ni consumir cupo.
    #[instrument(skip(db))]
    pub async fn agregar_estudiante(
        db: &PgPool,
        grupo_id: i32,
        estudiante_id: i32,
    ) -> Result<MiembroGrupo, AppError> {
        let mut tx = db.begin().await?;

        let grupo: Grupo = sqlx::query_as(&format!(
            "SELECT {} FROM grupos WHERE id = $1",
            GRUPO_COLUMNS
        ))
        .bind(grupo_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Grupo no encontrado")))?;

        let estudiante: Estudiante = sqlx::query_as(
            "SELECT id, nombre, apellido, codigo, carrera, semestre, paralelo, \
             unidad_educativa, creado_en FROM estudiantes WHERE id = $1",
        )
        .bind(estudiante_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Estudiante no encontrado")))?;

        let miembros_activos: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM estudiante_grupo \
             WHERE grupo_id = $1 AND activo = TRUE AND estudiante_id <> $2",
        )
        .bind(grupo_id)
        .bind(estudiante_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Err(motivo) = verificar_compatibilidad(&grupo, &estudiante, miembros_activos) {
            return Err(AppError::bad_request(anyhow!(motivo)));
        }

        let (membresia_id, activo): (i32, bool) = sqlx::query_as(
            "INSERT INTO estudiante_grupo (estudiante_id, grupo_id) VALUES ($1, $2) \
             ON CONFLICT (estudiante_id, grupo_id) DO UPDATE SET activo = TRUE \
             RETURNING id, activo",
        )
        .bind(estudiante_id)
        .bind(grupo_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(MiembroGrupo {
            id: membresia_id,
            estudiante_id,
            nombre: estudiante.nombre,
            apellido: estudiante.apellido,
            codigo: estudiante.codigo,
            activo,
        })
    }

    /// Desactiva la membresía; la fila se conserva para poder reincorporar.
    #[instrument(skip(db))]
    pub async fn quitar_estudiante(
        db: &PgPool,
        grupo_id: i32,
        estudiante_id: i32,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE estudiante_grupo SET activo = FALSE \
             WHERE grupo_id = $1 AND estudiante_id = $2",
        )
        .bind(grupo_id)
        .bind(estudiante_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(
                "El estudiante no es miembro del grupo"
            )));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn verificar_dependencias(db: &PgPool, id: i32) -> Result<VerificacionGrupo, AppError> {
        let grupo = Self::fetch_grupo(db, id).await?;

        let mut conn = db.acquire().await?;
        let report = aggregator::fetch_report(&mut conn, GRUPO_RELATIONS, id).await?;

        Ok(VerificacionGrupo {
            grupo,
            tiene_dependencias: report.tiene_dependencias(),
            dependencias: report,
        })
    }

    /// Eliminación guiada: borradores, informes, calificaciones y
    /// membresías caen con el grupo una vez confirmado.
    #[instrument(skip(db))]
    pub async fn eliminar_grupo(
        db: &PgPool,
        id: i32,
        confirmar: bool,
    ) -> Result<DeleteGrupoOutcome, AppError> {
        let grupo = Self::fetch_grupo(db, id).await?;

        if !confirmar {
            let mut conn = db.acquire().await?;
            let report = aggregator::fetch_report(&mut conn, GRUPO_RELATIONS, id).await?;
            if report.tiene_dependencias() {
                return Ok(DeleteGrupoOutcome::RequiereConfirmacion(Box::new(
                    ConfirmacionEliminar::new("grupo", report),
                )));
            }
        }

        let mut tx = db.begin().await?;

        let report = aggregator::fetch_report(&mut tx, GRUPO_RELATIONS, id).await?;
        if report.tiene_dependencias() && !confirmar {
            return Ok(DeleteGrupoOutcome::RequiereConfirmacion(Box::new(
                ConfirmacionEliminar::new("grupo", report),
            )));
        }

        let mut resumen = DeletionSummary::default();
        for spec in GRUPO_RELATIONS {
            if report.cantidad(spec.kind) == 0 {
                continue;
            }
            let filas = aggregator::purge_relation(&mut tx, spec, id).await?;
            resumen.record(spec.label, filas);
        }

        let result = sqlx::query("DELETE FROM grupos WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Grupo no encontrado")));
        }

        tx.commit().await?;

        info!(
            grupo_id = id,
            filas_eliminadas = resumen.total(),
            "grupo eliminado"
        );

        Ok(DeleteGrupoOutcome::Eliminado(Box::new(GrupoEliminado {
            mensaje: format!("Grupo {} eliminado correctamente", grupo.nombre_proyecto),
            grupo,
            dependencias_eliminadas: resumen,
        })))
    }

    async fn exigir_docente(db: &PgPool, docente_id: i32) -> Result<(), AppError> {
        let existe: Option<i32> = sqlx::query_scalar("SELECT id FROM docentes WHERE id = $1")
            .bind(docente_id)
            .fetch_optional(db)
            .await?;
        if existe.is_none() {
            return Err(AppError::bad_request(anyhow!(
                "El docente asignado {} no existe",
                docente_id
            )));
        }
        Ok(())
    }

    async fn fetch_grupo(db: &PgPool, id: i32) -> Result<Grupo, AppError> {
        sqlx::query_as(&format!("SELECT {} FROM grupos WHERE id = $1", GRUPO_COLUMNS))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Grupo no encontrado")))
    }
}
