use anyhow::anyhow;
use axum::http::StatusCode;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::modules::supervision::model::{
    ESTADO_FINALIZADO, ESTADO_REABIERTO, Informe, InformeDetalle, InformeQueryParams,
    InformeReabierto,
};
use crate::utils::errors::AppError;

const INFORME_COLUMNS: &str =
    "id, estudiante_id, grupo_id, docente_id, rubrica_id, estado, observaciones, creado_en";

pub struct SupervisionService;

impl SupervisionService {
    #[instrument(skip(db))]
    pub async fn listar_informes(
        db: &PgPool,
        params: &InformeQueryParams,
    ) -> Result<Vec<InformeDetalle>, AppError> {
        if let Some(estado) = &params.estado
            && estado != ESTADO_FINALIZADO
            && estado != ESTADO_REABIERTO
        {
            return Err(AppError::bad_request(anyhow!(
                "Estado desconocido: {} (se admite finalizado o reabierto)",
                estado
            )));
        }

        let base = format!(
            "SELECT i.id, i.estudiante_id, i.grupo_id, i.docente_id, i.rubrica_id, i.estado, \
             i.observaciones, i.creado_en, \
             e.nombre AS estudiante_nombre, e.apellido AS estudiante_apellido, \
             g.nombre_proyecto AS grupo_nombre, d.nombre AS docente_nombre \
             FROM informes i \
             JOIN estudiantes e ON e.id = i.estudiante_id \
             JOIN grupos g ON g.id = i.grupo_id \
             JOIN docentes d ON d.id = i.docente_id{} \
             ORDER BY i.creado_en DESC",
            if params.estado.is_some() {
                " WHERE i.estado = $1"
            } else {
                ""
            }
        );

        let mut query = sqlx::query_as::<_, InformeDetalle>(&base);
        if let Some(estado) = &params.estado {
            query = query.bind(estado);
        }

        Ok(query.fetch_all(db).await?)
    }

    /// Reabre un informe finalizado para que el docente corrija la
    /// calificación. Solo la transición finalizado → reabierto es válida.
    #[instrument(skip(db))]
    pub async fn reabrir_informe(db: &PgPool, id: i32) -> Result<InformeReabierto, AppError> {
        let actualizado: Option<Informe> = sqlx::query_as(&format!(
            "UPDATE informes SET estado = $1 WHERE id = $2 AND estado = $3 RETURNING {}",
            INFORME_COLUMNS
        ))
        .bind(ESTADO_REABIERTO)
        .bind(id)
        .bind(ESTADO_FINALIZADO)
        .fetch_optional(db)
        .await?;

        match actualizado {
            Some(informe) => {
                info!(informe_id = id, "informe reabierto");
                Ok(InformeReabierto {
                    mensaje: "Informe reabierto; el docente puede corregir la calificación"
                        .to_string(),
                    informe,
                })
            }
            None => {
                let estado: Option<String> =
                    sqlx::query_scalar("SELECT estado FROM informes WHERE id = $1")
                        .bind(id)
                        .fetch_optional(db)
                        .await?;
                match estado {
                    None => Err(AppError::not_found(anyhow!("Informe no encontrado"))),
                    Some(estado) => Err(AppError::new(
                        StatusCode::CONFLICT,
                        anyhow!("El informe está {} y no puede reabrirse", estado),
                    )),
                }
            }
        }
    }
}
