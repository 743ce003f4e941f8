use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::config::email::EmailConfig;
use crate::config::jwt::JwtConfig;
use crate::modules::docentes::model::Docente;
use crate::utils::codigos::{codigo_coincide, generar_codigo, hash_codigo};
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;

use super::model::{LoginResponse, SolicitarCodigoDto, VerificarCodigoDto};

/// Minutes before an issued code stops being accepted.
const CODIGO_TTL_MINUTOS: i64 = 10;
/// Wrong tries allowed before the code burns out.
const MAX_INTENTOS: i32 = 5;

fn credenciales_invalidas() -> AppError {
    AppError::unauthorized(anyhow::anyhow!("Correo o código incorrecto"))
}

pub struct AuthService;

impl AuthService {
    /// Issues a fresh login code for the docente and mails it. Any code
    /// still pending for the same docente is invalidated first, so at
    /// most one code is live per account.
    #[instrument(skip(db, email_config))]
    pub async fn solicitar_codigo(
        db: &PgPool,
        dto: SolicitarCodigoDto,
        email_config: &EmailConfig,
    ) -> Result<(), AppError> {
        let docente = sqlx::query_as::<_, Docente>(
            "SELECT id, nombre, correo, rol, creado_en FROM docentes WHERE correo = $1",
        )
        .bind(&dto.correo)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::not_found(anyhow::anyhow!("No existe un docente con ese correo"))
        })?;

        let codigo = generar_codigo();
        let codigo_hash = hash_codigo(&codigo)?;
        let expira_en = Utc::now() + Duration::minutes(CODIGO_TTL_MINUTOS);

        let mut tx = db.begin().await?;

        sqlx::query("UPDATE codigos_login SET usado = TRUE WHERE docente_id = $1 AND usado = FALSE")
            .bind(docente.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO codigos_login (docente_id, codigo_hash, expira_en) VALUES ($1, $2, $3)",
        )
        .bind(docente.id)
        .bind(&codigo_hash)
        .bind(expira_en)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let email_service = EmailService::new(email_config.clone());
        email_service
            .send_login_code(&docente.correo, &docente.nombre, &codigo)
            .await?;

        tracing::info!(docente_id = docente.id, "código de acceso emitido");

        Ok(())
    }

    /// Exchanges a pending login code for a JWT. Codes expire after
    /// [`CODIGO_TTL_MINUTOS`] and burn out after [`MAX_INTENTOS`] wrong
    /// tries; both cases mark the row used so it cannot be retried.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn verificar_codigo(
        db: &PgPool,
        dto: VerificarCodigoDto,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let docente = sqlx::query_as::<_, Docente>(
            "SELECT id, nombre, correo, rol, creado_en FROM docentes WHERE correo = $1",
        )
        .bind(&dto.correo)
        .fetch_optional(db)
        .await?
        .ok_or_else(credenciales_invalidas)?;

        #[derive(sqlx::FromRow)]
        struct CodigoRow {
            id: i32,
            codigo_hash: String,
            expira_en: DateTime<Utc>,
            intentos: i32,
        }

        let pendiente = sqlx::query_as::<_, CodigoRow>(
            "SELECT id, codigo_hash, expira_en, intentos FROM codigos_login
             WHERE docente_id = $1 AND usado = FALSE
             ORDER BY creado_en DESC
             LIMIT 1",
        )
        .bind(docente.id)
        .fetch_optional(db)
        .await?
        .ok_or_else(credenciales_invalidas)?;

        if pendiente.expira_en < Utc::now() {
            Self::marcar_usado(db, pendiente.id).await?;
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "El código ha expirado, solicita uno nuevo"
            )));
        }

        if pendiente.intentos >= MAX_INTENTOS {
            Self::marcar_usado(db, pendiente.id).await?;
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Demasiados intentos fallidos, solicita un código nuevo"
            )));
        }

        if !codigo_coincide(&dto.codigo, &pendiente.codigo_hash)? {
            sqlx::query("UPDATE codigos_login SET intentos = intentos + 1 WHERE id = $1")
                .bind(pendiente.id)
                .execute(db)
                .await?;
            return Err(AppError::unauthorized(anyhow::anyhow!("Código incorrecto")));
        }

        Self::marcar_usado(db, pendiente.id).await?;

        let token = create_access_token(docente.id, &docente.correo, &docente.rol, jwt_config)?;

        tracing::info!(docente_id = docente.id, "inicio de sesión correcto");

        Ok(LoginResponse { token, docente })
    }

    #[instrument(skip(db))]
    pub async fn perfil(db: &PgPool, docente_id: i32) -> Result<Docente, AppError> {
        sqlx::query_as::<_, Docente>(
            "SELECT id, nombre, correo, rol, creado_en FROM docentes WHERE id = $1",
        )
        .bind(docente_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Docente no encontrado")))
    }

    async fn marcar_usado(db: &PgPool, codigo_id: i32) -> Result<(), AppError> {
        sqlx::query("UPDATE codigos_login SET usado = TRUE WHERE id = $1")
            .bind(codigo_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
