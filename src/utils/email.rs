use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Sends the one-time login code. With SMTP disabled (local dev, CI)
    /// the code is written to the log instead and the call succeeds.
    #[instrument(skip(self, codigo))]
    pub async fn send_login_code(
        &self,
        to_email: &str,
        to_name: &str,
        codigo: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!(correo = %to_email, codigo = %codigo, "SMTP deshabilitado, código registrado en el log");
            return Ok(());
        }

        let html_body = self.login_code_template(to_name, codigo);
        let text_body = format!(
            "Hola {},\n\n\
             Tu código de acceso a EvalProy es: {}\n\n\
             El código expira en 10 minutos y solo puede usarse una vez.\n\n\
             Si no solicitaste este código, ignora este correo.",
            to_name, codigo
        );

        self.send_email(to_email, "Código de acceso", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(from.parse().map_err(|e| {
                AppError::internal(anyhow::anyhow!("Invalid from email: {}", e))
            })?)
            .to(to_email.parse().map_err(|e| {
                AppError::internal(anyhow::anyhow!("Invalid to email: {}", e))
            })?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        mailer
            .send(&email)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn login_code_template(&self, to_name: &str, codigo: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif; color: #222;">
    <h2>Código de acceso</h2>
    <p>Hola {},</p>
    <p>Tu código de acceso a EvalProy es:</p>
    <p style="font-size: 28px; letter-spacing: 6px; font-weight: bold;">{}</p>
    <p>El código expira en 10 minutos y solo puede usarse una vez.</p>
    <p>Si no solicitaste este código, ignora este correo.</p>
  </body>
</html>"#,
            to_name, codigo
        )
    }
}
