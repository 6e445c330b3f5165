//! # Outbound Mail
//!
//! Thin wrapper around an async SMTP transport for the notification emails
//! sent when a connection request is created.
//!
//! Delivery is best-effort and fire-and-forget: handlers spawn a detached
//! task that calls into this module, and a failed send is logged by that
//! task without ever affecting the originating request.

use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Shared SMTP client. Cloning is cheap; the underlying transport pools
/// its connections.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build the transport from configuration. No connection is made here;
    /// SMTP sessions are opened lazily on the first send.
    pub fn new(config: &Config) -> AppResult<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
            .build();

        // Unconfigured SMTP user (local dev) still gets a parseable From;
        // sends will fail at the relay and be logged by the caller's task
        let from_addr = if config.smtp_user.is_empty() {
            "no-reply@rentscout.app"
        } else {
            &config.smtp_user
        };
        let from = format!("RentScout <{}>", from_addr)
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        Ok(Self { transport, from })
    }

    /// Notify `recipient_email` that `sender_name` wants to connect.
    pub async fn send_connection_request(
        &self,
        recipient_email: &str,
        sender_name: &str,
    ) -> AppResult<()> {
        let to: Mailbox = recipient_email
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid recipient address: {}", e)))?;

        let text = format!(
            "{} wants to connect with you on RentScout. \
             Log in to view their profile and respond!",
            sender_name
        );
        let html = format!(
            "<p><b>{}</b> wants to connect with you on RentScout. \
             Log in to view their profile and respond!</p>",
            sender_name
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("You have a new connection request on RentScout!")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
