use async_trait::async_trait;
use lettre::message::{Mailbox, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::plugins::traits::Notifier;
use crate::utils::error::Result;

/// Sends plain-text mail through an SMTP relay.
pub struct EmailNotifier {
    config: SmtpConfig,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailNotifier {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port);

        let builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            mailer: builder.build(),
            config,
        })
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message> {
        let from: Mailbox =
            format!("{} <{}>", self.config.from_name, self.config.from_address).parse()?;

        let mut builder = Message::builder().from(from).subject(subject);
        for to in &self.config.to_addresses {
            builder = builder.to(to.parse()?);
        }

        let message = builder.singlepart(
            SinglePart::builder()
                .header(header::ContentType::TEXT_PLAIN)
                .body(body.to_string()),
        )?;
        Ok(message)
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = self.build_message(subject, body)?;
        self.mailer.send(message).await?;
        tracing::info!(
            "Sent '{}' to {} recipient(s)",
            subject,
            self.config.to_addresses.len()
        );
        Ok(())
    }
}
