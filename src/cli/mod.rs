use sqlx::PgPool;

/// Bootstraps a supervisor account. Login needs an existing docente row,
/// so the very first account has to come from outside the API.
pub async fn crear_supervisor(
    db: &PgPool,
    nombre: &str,
    correo: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = sqlx::query(
        "INSERT INTO docentes (nombre, correo, rol)
         VALUES ($1, $2, 'supervisor')
         ON CONFLICT (correo) DO NOTHING",
    )
    .bind(nombre)
    .bind(correo)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("A docente with this correo already exists".into());
    }

    Ok(())
}
