/// Transactional email over async SMTP
///
/// When email is disabled in the configuration the mailer logs the send
/// and drops it, so development and tests run without a relay.
use crate::config::EmailSettings;
use crate::error::{Result, ServerError};
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
}

impl Mailer {
    pub fn new(settings: &EmailSettings) -> Result<Self> {
        let transport = if settings.enabled {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
                    .map_err(|e| ServerError::Email(e.to_string()))?
                    .port(settings.smtp_port);

            if !settings.smtp_username.is_empty() {
                builder = builder.credentials(Credentials::new(
                    settings.smtp_username.clone(),
                    settings.smtp_password.clone(),
                ));
            }

            Some(builder.build())
        } else {
            None
        };

        Ok(Self {
            transport,
            from_address: settings.from_address.clone(),
        })
    }

    pub async fn send_welcome(&self, to: &str, name: &str) -> Result<()> {
        let body = format!(
            "Hi {name},\n\nWelcome to Aria Store! Your account is ready.\n\nThe Aria Store team"
        );
        self.send(to, "Welcome to Aria Store", body).await
    }

    pub async fn send_order_completed(&self, to: &str, order_id: i64) -> Result<()> {
        let body = format!(
            "Your order #{order_id} is complete. The albums are now available in your library.\n\n\
             Thanks for shopping with Aria Store!"
        );
        self.send(to, &format!("Order #{order_id} complete"), body)
            .await
    }

    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<()> {
        let body = format!(
            "A password reset was requested for your account.\n\n\
             Reset token: {token}\n\n\
             If you did not request this, you can ignore this email."
        );
        self.send(to, "Aria Store password reset", body).await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<()> {
        let Some(transport) = &self.transport else {
            tracing::info!("Email disabled, dropping \"{}\" to {}", subject, to);
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e| ServerError::Email(format!("invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| ServerError::Email(format!("invalid recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| ServerError::Email(e.to_string()))?;

        transport
            .send(message)
            .await
            .map_err(|e| ServerError::Email(e.to_string()))?;

        tracing::debug!("Sent \"{}\" to {}", subject, to);
        Ok(())
    }
}
