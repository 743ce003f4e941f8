use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::dependencias::aggregator;
use crate::dependencias::catalog::ESTUDIANTE_RELATIONS;
use crate::dependencias::model::{
    CamposAfectados, ConfirmacionEliminar, ConfirmacionLimpieza, DeletionSummary,
};
use crate::modules::estudiantes::model::{
    CreateEstudianteDto, DeleteEstudianteOutcome, Estudiante, EstudianteActualizado,
    EstudianteEliminado, QueryParams, UpdateEstudianteDto, UpdateEstudianteOutcome,
    VerificacionEstudiante,
};
use crate::utils::errors::AppError;

const ESTUDIANTE_COLUMNS: &str =
    "id, nombre, apellido, codigo, carrera, semestre, paralelo, unidad_educativa, creado_en";

fn conflicto_codigo(e: sqlx::Error, codigo: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow!(
            "Ya existe un estudiante con el código {} en esa carrera, semestre y paralelo",
            codigo
        ));
    }
    AppError::database(anyhow::Error::from(e))
}

pub struct EstudianteService;

impl EstudianteService {
    #[instrument(skip(db, dto))]
    pub async fn create_estudiante(
        db: &PgPool,
        dto: CreateEstudianteDto,
    ) -> Result<Estudiante, AppError> {
        let estudiante = sqlx::query_as(&format!(
            "INSERT INTO estudiantes (nombre, apellido, codigo, carrera, semestre, paralelo, unidad_educativa) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            ESTUDIANTE_COLUMNS
        ))
        .bind(&dto.nombre)
        .bind(&dto.apellido)
        .bind(&dto.codigo)
        .bind(&dto.carrera)
        .bind(dto.semestre)
        .bind(&dto.paralelo)
        .bind(&dto.unidad_educativa)
        .fetch_one(db)
        .await
        .map_err(|e| conflicto_codigo(e, &dto.codigo))?;

        Ok(estudiante)
    }

    #[instrument(skip(db))]
    pub async fn get_estudiantes(
        db: &PgPool,
        params: &QueryParams,
    ) -> Result<(Vec<Estudiante>, i64), AppError> {
        let mut condiciones: Vec<String> = Vec::new();
        let mut n = 0;

        if params.carrera.is_some() {
            n += 1;
            condiciones.push(format!("carrera = ${}", n));
        }
        if params.semestre.is_some() {
            n += 1;
            condiciones.push(format!("semestre = ${}", n));
        }
        if params.paralelo.is_some() {
            n += 1;
            condiciones.push(format!("paralelo = ${}", n));
        }
        if params.busqueda.is_some() {
            n += 1;
            condiciones.push(format!(
                "(nombre ILIKE ${0} OR apellido ILIKE ${0} OR codigo ILIKE ${0})",
                n
            ));
        }

        let where_clause = if condiciones.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", condiciones.join(" AND "))
        };
        let patron = params.busqueda.as_ref().map(|b| format!("%{}%", b));

        let count_sql = format!("SELECT COUNT(*) FROM estudiantes{}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(carrera) = &params.carrera {
            count_query = count_query.bind(carrera);
        }
        if let Some(semestre) = params.semestre {
            count_query = count_query.bind(semestre);
        }
        if let Some(paralelo) = &params.paralelo {
            count_query = count_query.bind(paralelo);
        }
        if let Some(patron) = &patron {
            count_query = count_query.bind(patron);
        }
        let total = count_query.fetch_one(db).await?;

        let data_sql = format!(
            "SELECT {} FROM estudiantes{} ORDER BY apellido, nombre LIMIT ${} OFFSET ${}",
            ESTUDIANTE_COLUMNS,
            where_clause,
            n + 1,
            n + 2
        );
        let mut data_query = sqlx::query_as::<_, Estudiante>(&data_sql);
        if let Some(carrera) = &params.carrera {
            data_query = data_query.bind(carrera);
        }
        if let Some(semestre) = params.semestre {
            data_query = data_query.bind(semestre);
        }
        if let Some(paralelo) = &params.paralelo {
            data_query = data_query.bind(paralelo);
        }
        if let Some(patron) = &patron {
            data_query = data_query.bind(patron);
        }
        let estudiantes = data_query
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(db)
            .await?;

        Ok((estudiantes, total))
    }

    #[instrument(skip(db))]
    pub async fn get_estudiante(db: &PgPool, id: i32) -> Result<Estudiante, AppError> {
        sqlx::query_as(&format!(
            "SELECT {} FROM estudiantes WHERE id = $1",
            ESTUDIANTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Estudiante no encontrado")))
    }

    #[instrument(skip(db))]
    pub async fn verificar_dependencias(
        db: &PgPool,
        id: i32,
    ) -> Result<VerificacionEstudiante, AppError> {
        let estudiante = Self::get_estudiante(db, id).await?;

        let mut conn = db.acquire().await?;
        let report = aggregator::fetch_report(&mut conn, ESTUDIANTE_RELATIONS, id).await?;

        Ok(VerificacionEstudiante {
            estudiante,
            tiene_dependencias: report.tiene_dependencias(),
            dependencias: report,
        })
    }

    /// Actualización guiada (§ ver `dependencias`): cambiar carrera o
    /// semestre invalida informes, calificaciones y membresías, así que
    /// exige `confirmar_limpieza=true` cuando existen. La depuración y el
    /// UPDATE comparten transacción.
    #[instrument(skip(db, dto))]
    pub async fn update_estudiante(
        db: &PgPool,
        id: i32,
        dto: UpdateEstudianteDto,
        confirmar_limpieza: bool,
    ) -> Result<UpdateEstudianteOutcome, AppError> {
        let existing = Self::get_estudiante(db, id).await?;

        let campos_afectados = CamposAfectados {
            cambio_carrera: dto.carrera.as_ref().is_some_and(|c| *c != existing.carrera),
            cambio_semestre: dto.semestre.is_some_and(|s| s != existing.semestre),
        };

        if campos_afectados.hay_cambio() && !confirmar_limpieza {
            let mut conn = db.acquire().await?;
            let report = aggregator::fetch_report(&mut conn, ESTUDIANTE_RELATIONS, id).await?;
            if report.tiene_dependencias() {
                return Ok(UpdateEstudianteOutcome::RequiereConfirmacion(Box::new(
                    ConfirmacionLimpieza::new(report, campos_afectados),
                )));
            }
        }

        let nombre = dto.nombre.unwrap_or(existing.nombre);
        let apellido = dto.apellido.unwrap_or(existing.apellido);
        let codigo = dto.codigo.unwrap_or(existing.codigo);
        let carrera = dto.carrera.unwrap_or(existing.carrera);
        let semestre = dto.semestre.unwrap_or(existing.semestre);
        let paralelo = dto.paralelo.or(existing.paralelo);
        let unidad_educativa = dto.unidad_educativa.or(existing.unidad_educativa);

        let mut tx = db.begin().await?;

        let mut depurados = None;
        if campos_afectados.hay_cambio() {
            // Recuento autoritativo dentro de la transacción.
            let report = aggregator::fetch_report(&mut tx, ESTUDIANTE_RELATIONS, id).await?;
            if report.tiene_dependencias() {
                if !confirmar_limpieza {
                    return Ok(UpdateEstudianteOutcome::RequiereConfirmacion(Box::new(
                        ConfirmacionLimpieza::new(report, campos_afectados),
                    )));
                }
                let mut resumen = DeletionSummary::default();
                for spec in ESTUDIANTE_RELATIONS {
                    if report.cantidad(spec.kind) == 0 {
                        continue;
                    }
                    let filas = aggregator::purge_relation(&mut tx, spec, id).await?;
                    resumen.record(spec.label, filas);
                }
                depurados = Some(resumen);
            }
        }

        let estudiante: Estudiante = sqlx::query_as(&format!(
            "UPDATE estudiantes SET nombre = $1, apellido = $2, codigo = $3, carrera = $4, \
             semestre = $5, paralelo = $6, unidad_educativa = $7 WHERE id = $8 RETURNING {}",
            ESTUDIANTE_COLUMNS
        ))
        .bind(&nombre)
        .bind(&apellido)
        .bind(&codigo)
        .bind(&carrera)
        .bind(semestre)
        .bind(&paralelo)
        .bind(&unidad_educativa)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflicto_codigo(e, &codigo))?;

        tx.commit().await?;

        match depurados {
            Some(resumen) => {
                info!(
                    estudiante_id = id,
                    filas_depuradas = resumen.total(),
                    "actualización con limpieza aplicada"
                );
                Ok(UpdateEstudianteOutcome::ActualizadoConLimpieza(Box::new(
                    EstudianteActualizado {
                        mensaje: "Estudiante actualizado; los registros invalidados fueron depurados"
                            .to_string(),
                        estudiante,
                        dependencias_eliminadas: resumen,
                        campos_afectados,
                    },
                )))
            }
            None => Ok(UpdateEstudianteOutcome::Actualizado(Box::new(estudiante))),
        }
    }

    /// Eliminación guiada: misma estructura que la de docentes, sin el
    /// tratamiento especial de grupos (las membresías sí se purgan).
    #[instrument(skip(db))]
    pub async fn eliminar_estudiante(
        db: &PgPool,
        id: i32,
        confirmar: bool,
    ) -> Result<DeleteEstudianteOutcome, AppError> {
        let estudiante = Self::get_estudiante(db, id).await?;

        if !confirmar {
            let mut conn = db.acquire().await?;
            let report = aggregator::fetch_report(&mut conn, ESTUDIANTE_RELATIONS, id).await?;
            if report.tiene_dependencias() {
                return Ok(DeleteEstudianteOutcome::RequiereConfirmacion(Box::new(
                    ConfirmacionEliminar::new("estudiante", report),
                )));
            }
        }

        let mut tx = db.begin().await?;

        let report = aggregator::fetch_report(&mut tx, ESTUDIANTE_RELATIONS, id).await?;
        if report.tiene_dependencias() && !confirmar {
            return Ok(DeleteEstudianteOutcome::RequiereConfirmacion(Box::new(
                ConfirmacionEliminar::new("estudiante", report),
            )));
        }

        let mut resumen = DeletionSummary::default();
        for spec in ESTUDIANTE_RELATIONS {
            if report.cantidad(spec.kind) == 0 {
                continue;
            }
            let filas = aggregator::purge_relation(&mut tx, spec, id).await?;
            resumen.record(spec.label, filas);
        }

        let result = sqlx::query("DELETE FROM estudiantes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Estudiante no encontrado")));
        }

        tx.commit().await?;

        info!(
            estudiante_id = id,
            filas_eliminadas = resumen.total(),
            "estudiante eliminado"
        );

        Ok(DeleteEstudianteOutcome::Eliminado(Box::new(
            EstudianteEliminado {
                mensaje: format!(
                    "Estudiante {} {} eliminado correctamente",
                    estudiante.nombre, estudiante.apellido
                ),
                estudiante,
                dependencias_eliminadas: resumen,
            },
        )))
    }
}
