use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use crate::dependencias::aggregator;
use crate::dependencias::catalog::{DOCENTE_RELATIONS, GRUPO_RELATIONS};
use crate::dependencias::model::{
    ConfirmacionEliminar, DeletionSummary, OpcionesEliminacion, RelationKind,
};
use crate::modules::docentes::model::{
    AccionGrupos, CreateDocenteDto, DeleteDocenteOutcome, DeleteDocenteParams, Docente,
    DocenteConCarreras, DocenteEliminado, DocenteResumen, UpdateDocenteDto, VerificacionDocente,
};
use crate::utils::errors::AppError;

const DOCENTE_COLUMNS: &str = "id, nombre, correo, rol, creado_en";

fn validar_rol(rol: &str) -> Result<(), AppError> {
    if rol == "docente" || rol == "supervisor" {
        Ok(())
    } else {
        Err(AppError::bad_request(anyhow!(
            "Rol desconocido: {} (se admite docente o supervisor)",
            rol
        )))
    }
}

pub struct DocenteService;

impl DocenteService {
    #[instrument(skip(db, dto))]
    pub async fn create_docente(
        db: &PgPool,
        dto: CreateDocenteDto,
    ) -> Result<DocenteConCarreras, AppError> {
        let rol = dto.rol.as_deref().unwrap_or("docente");
        validar_rol(rol)?;

        let mut tx = db.begin().await?;

        let docente: Docente = sqlx::query_as(&format!(
            "INSERT INTO docentes (nombre, correo, rol) VALUES ($1, $2, $3) RETURNING {}",
            DOCENTE_COLUMNS
        ))
        .bind(&dto.nombre)
        .bind(&dto.correo)
        .bind(rol)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow!(
                    "Ya existe un docente con el correo {}",
                    dto.correo
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        for carrera in &dto.carreras {
            sqlx::query(
                "INSERT INTO docente_carrera (docente_id, carrera) VALUES ($1, $2) \
                 ON CONFLICT (docente_id, carrera) DO NOTHING",
            )
            .bind(docente.id)
            .bind(carrera)
            .execute(&mut *tx)
            .await?;
        }

        let carreras = Self::carreras_de(&mut tx, docente.id).await?;
        tx.commit().await?;

        Ok(DocenteConCarreras { docente, carreras })
    }

    #[instrument(skip(db))]
    pub async fn get_docentes(db: &PgPool) -> Result<Vec<DocenteConCarreras>, AppError> {
        let docentes: Vec<Docente> = sqlx::query_as(&format!(
            "SELECT {} FROM docentes ORDER BY nombre",
            DOCENTE_COLUMNS
        ))
        .fetch_all(db)
        .await?;

        let filas: Vec<(i32, String)> =
            sqlx::query_as("SELECT docente_id, carrera FROM docente_carrera ORDER BY carrera")
                .fetch_all(db)
                .await?;

        let mut por_docente: HashMap<i32, Vec<String>> = HashMap::new();
        for (docente_id, carrera) in filas {
            por_docente.entry(docente_id).or_default().push(carrera);
        }

        Ok(docentes
            .into_iter()
            .map(|docente| {
                let carreras = por_docente.remove(&docente.id).unwrap_or_default();
                DocenteConCarreras { docente, carreras }
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_docente(db: &PgPool, id: i32) -> Result<DocenteConCarreras, AppError> {
        let docente = Self::fetch_docente(db, id).await?;
        let carreras: Vec<String> = sqlx::query_scalar(
            "SELECT carrera FROM docente_carrera WHERE docente_id = $1 ORDER BY carrera",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(DocenteConCarreras { docente, carreras })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_docente(
        db: &PgPool,
        id: i32,
        dto: UpdateDocenteDto,
    ) -> Result<DocenteConCarreras, AppError> {
        let existing = Self::fetch_docente(db, id).await?;

        let nombre = dto.nombre.unwrap_or(existing.nombre);
        let correo = dto.correo.unwrap_or(existing.correo);
        let rol = dto.rol.unwrap_or(existing.rol);
        validar_rol(&rol)?;

        let mut tx = db.begin().await?;

        let docente: Docente = sqlx::query_as(&format!(
            "UPDATE docentes SET nombre = $1, correo = $2, rol = $3 WHERE id = $4 RETURNING {}",
            DOCENTE_COLUMNS
        ))
        .bind(&nombre)
        .bind(&correo)
        .bind(&rol)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow!(
                    "Ya existe un docente con el correo {}",
                    correo
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        if let Some(carreras) = &dto.carreras {
            sqlx::query("DELETE FROM docente_carrera WHERE docente_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for carrera in carreras {
                sqlx::query(
                    "INSERT INTO docente_carrera (docente_id, carrera) VALUES ($1, $2) \
                     ON CONFLICT (docente_id, carrera) DO NOTHING",
                )
                .bind(id)
                .bind(carrera)
                .execute(&mut *tx)
                .await?;
            }
        }

        let carreras = Self::carreras_de(&mut tx, id).await?;
        tx.commit().await?;

        Ok(DocenteConCarreras { docente, carreras })
    }

    #[instrument(skip(db))]
    pub async fn verificar_dependencias(
        db: &PgPool,
        id: i32,
    ) -> Result<VerificacionDocente, AppError> {
        let docente = Self::fetch_docente(db, id).await?;

        let mut conn = db.acquire().await?;
        let report = aggregator::fetch_report(&mut conn, DOCENTE_RELATIONS, id).await?;

        let docentes_disponibles: Vec<DocenteResumen> =
            sqlx::query_as("SELECT id, nombre FROM docentes WHERE id <> $1 ORDER BY nombre")
                .bind(id)
                .fetch_all(db)
                .await?;

        Ok(VerificacionDocente {
            docente,
            tiene_dependencias: report.tiene_dependencias(),
            dependencias: report,
            docentes_disponibles,
        })
    }

    /// Protocolo de eliminación guiada (§ ver `dependencias`): sin
    /// `confirmar=true` y con dependencias devuelve la confirmación;
    /// confirmado, borra dependientes en orden de catálogo dentro de una
    /// transacción, resolviendo los grupos según los parámetros.
    #[instrument(skip(db))]
    pub async fn eliminar_docente(
        db: &PgPool,
        id: i32,
        params: &DeleteDocenteParams,
    ) -> Result<DeleteDocenteOutcome, AppError> {
        if params.reasignar_a.is_some() && params.borrar_grupos() {
            return Err(AppError::bad_request(anyhow!(
                "Los parámetros reasignar_a y borrar_grupos no pueden combinarse"
            )));
        }
        if params.reasignar_a == Some(id) {
            return Err(AppError::bad_request(anyhow!(
                "No se puede reasignar los grupos al docente que se elimina"
            )));
        }

        let docente = Self::fetch_docente(db, id).await?;

        if !params.confirmado() {
            let mut conn = db.acquire().await?;
            let report = aggregator::fetch_report(&mut conn, DOCENTE_RELATIONS, id).await?;
            if report.tiene_dependencias() {
                return Ok(DeleteDocenteOutcome::RequiereConfirmacion(Box::new(
                    ConfirmacionEliminar::new("docente", report)
                        .with_opciones(OpcionesEliminacion::docente()),
                )));
            }
        }

        let mut tx = db.begin().await?;

        // El recuento dentro de la transacción es el que manda; el estado
        // pudo cambiar desde la verificación previa.
        let report = aggregator::fetch_report(&mut tx, DOCENTE_RELATIONS, id).await?;
        if report.tiene_dependencias() && !params.confirmado() {
            return Ok(DeleteDocenteOutcome::RequiereConfirmacion(Box::new(
                ConfirmacionEliminar::new("docente", report)
                    .with_opciones(OpcionesEliminacion::docente()),
            )));
        }

        let mut resumen = DeletionSummary::default();
        let mut accion_grupos = None;

        if report.cantidad(RelationKind::Grupos) > 0 {
            accion_grupos = Some(Self::resolver_grupos(&mut tx, id, params, &mut resumen).await?);
        }

        for spec in DOCENTE_RELATIONS {
            // Los grupos no se purgan por catálogo: se reasignan, se
            // borran con su cascada o quedan sin docente.
            if spec.kind == RelationKind::Grupos {
                continue;
            }
            if report.cantidad(spec.kind) == 0 {
                continue;
            }
            let n = aggregator::purge_relation(&mut tx, spec, id).await?;
            resumen.record(spec.label, n);
        }

        let result = sqlx::query("DELETE FROM docentes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Docente no encontrado")));
        }

        tx.commit().await?;

        info!(
            docente_id = id,
            filas_eliminadas = resumen.total(),
            "docente eliminado"
        );

        Ok(DeleteDocenteOutcome::Eliminado(Box::new(DocenteEliminado {
            mensaje: format!("Docente {} eliminado correctamente", docente.nombre),
            docente,
            dependencias_eliminadas: resumen,
            accion_grupos,
        })))
    }

    async fn resolver_grupos(
        conn: &mut PgConnection,
        docente_id: i32,
        params: &DeleteDocenteParams,
        resumen: &mut DeletionSummary,
    ) -> Result<AccionGrupos, AppError> {
        if let Some(destino) = params.reasignar_a {
            let existe: Option<i32> = sqlx::query_scalar("SELECT id FROM docentes WHERE id = $1")
                .bind(destino)
                .fetch_optional(&mut *conn)
                .await?;
            if existe.is_none() {
                return Err(AppError::bad_request(anyhow!(
                    "El docente destino {} no existe",
                    destino
                )));
            }

            let n = sqlx::query("UPDATE grupos SET docente_id = $1 WHERE docente_id = $2")
                .bind(destino)
                .bind(docente_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

            return Ok(AccionGrupos {
                accion: "reasignados".to_string(),
                cantidad: n,
                reasignado_a: Some(destino),
            });
        }

        if params.borrar_grupos() {
            // Primero los registros que cuelgan de los grupos, en el mismo
            // orden de hojas que usa el catálogo del grupo.
            for spec in GRUPO_RELATIONS {
                let sql = format!(
                    "DELETE FROM {} WHERE {} IN (SELECT id FROM grupos WHERE docente_id = $1)",
                    spec.table, spec.fk_column
                );
                let n = sqlx::query(&sql)
                    .bind(docente_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected();
                let etiqueta = if spec.kind == RelationKind::Estudiantes {
                    "miembros"
                } else {
                    spec.label
                };
                resumen.record(etiqueta, n);
            }

            let n = sqlx::query("DELETE FROM grupos WHERE docente_id = $1")
                .bind(docente_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();
            resumen.record("grupos", n);

            return Ok(AccionGrupos {
                accion: "eliminados".to_string(),
                cantidad: n,
                reasignado_a: None,
            });
        }

        let n = sqlx::query("UPDATE grupos SET docente_id = NULL WHERE docente_id = $1")
            .bind(docente_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();

        Ok(AccionGrupos {
            accion: "sin_docente".to_string(),
            cantidad: n,
            reasignado_a: None,
        })
    }

    async fn carreras_de(conn: &mut PgConnection, id: i32) -> Result<Vec<String>, AppError> {
        let carreras = sqlx::query_scalar(
            "SELECT carrera FROM docente_carrera WHERE docente_id = $1 ORDER BY carrera",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(carreras)
    }

    async fn fetch_docente(db: &PgPool, id: i32) -> Result<Docente, AppError> {
        sqlx::query_as(&format!(
            "SELECT {} FROM docentes WHERE id = $1",
            DOCENTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Docente no encontrado")))
    }
}
