//! Builds [`DependencyReport`]s and purges relation rows.
//!
//! Works over `&mut PgConnection` so the same code runs against the pool
//! (read-only checks) and inside a transaction (the authoritative recount
//! right before deleting).

use sqlx::PgConnection;

use super::catalog::{count_union_sql, RelationSpec};
use super::model::{DependencyReport, RelationReport, SampleRow};
use crate::utils::errors::AppError;

#[derive(sqlx::FromRow)]
struct CountRow {
    relacion: String,
    cantidad: i64,
}

/// Counts every relation of the catalog in a single round trip and samples
/// up to 10 rows for each non-empty one.
pub async fn fetch_report(
    conn: &mut PgConnection,
    specs: &[RelationSpec],
    owner_id: i32,
) -> Result<DependencyReport, AppError> {
    let counts: Vec<CountRow> = sqlx::query_as(&count_union_sql(specs))
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await?;

    let mut relations = Vec::with_capacity(specs.len());
    for spec in specs {
        let cantidad = counts
            .iter()
            .find(|row| row.relacion == spec.label)
            .map(|row| row.cantidad)
            .unwrap_or(0);

        let detalle = if cantidad > 0 {
            sqlx::query_as::<_, SampleRow>(spec.sample_sql)
                .bind(owner_id)
                .fetch_all(&mut *conn)
                .await?
        } else {
            Vec::new()
        };

        relations.push(RelationReport {
            kind: spec.kind,
            label: spec.label,
            cantidad,
            detalle,
        });
    }

    Ok(DependencyReport { relations })
}

/// Deletes every row of one relation referencing `owner_id`. Returns the
/// number of rows removed.
pub async fn purge_relation(
    conn: &mut PgConnection,
    spec: &RelationSpec,
    owner_id: i32,
) -> Result<u64, AppError> {
    let result = sqlx::query(&spec.delete_sql())
        .bind(owner_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
