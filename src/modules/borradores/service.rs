use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::borradores::model::{Borrador, GuardarBorradorDto};
use crate::utils::errors::AppError;

const BORRADOR_COLUMNS: &str = "id, docente_id, grupo_id, contenido, actualizado_en";

pub struct BorradorService;

impl BorradorService {
    /// Upsert del borrador del docente para un grupo: el segundo guardado
    /// sobre el mismo par actualiza el primero.
    #[instrument(skip(db, dto))]
    pub async fn guardar(
        db: &PgPool,
        docente_id: i32,
        dto: GuardarBorradorDto,
    ) -> Result<Borrador, AppError> {
        let grupo_existe: Option<i32> = sqlx::query_scalar("SELECT id FROM grupos WHERE id = $1")
            .bind(dto.grupo_id)
            .fetch_optional(db)
            .await?;
        if grupo_existe.is_none() {
            return Err(AppError::not_found(anyhow!("Grupo no encontrado")));
        }

        let borrador = sqlx::query_as(&format!(
            "INSERT INTO borradores (docente_id, grupo_id, contenido) VALUES ($1, $2, $3) \
             ON CONFLICT (docente_id, grupo_id) \
             DO UPDATE SET contenido = EXCLUDED.contenido, actualizado_en = NOW() \
             RETURNING {}",
            BORRADOR_COLUMNS
        ))
        .bind(docente_id)
        .bind(dto.grupo_id)
        .bind(&dto.contenido)
        .fetch_one(db)
        .await?;

        Ok(borrador)
    }

    #[instrument(skip(db))]
    pub async fn obtener(db: &PgPool, docente_id: i32, grupo_id: i32) -> Result<Borrador, AppError> {
        sqlx::query_as(&format!(
            "SELECT {} FROM borradores WHERE docente_id = $1 AND grupo_id = $2",
            BORRADOR_COLUMNS
        ))
        .bind(docente_id)
        .bind(grupo_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("No hay borrador guardado para este grupo")))
    }
}
