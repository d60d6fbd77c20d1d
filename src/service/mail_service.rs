use crate::config::parameter;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{error, info};

type MailError = Box<dyn std::error::Error + Send + Sync>;

/// Sends the account-verification email. Delivery is fire-and-forget:
/// failures are logged and never surfaced, so signup succeeds even when the
/// mail server is down.
pub struct MailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    from_name: String,
    base_url: String,
}

impl MailService {
    pub fn from_parameters() -> Result<Arc<Self>, MailError> {
        let credentials = Credentials::new(
            parameter::get("SMTP_USERNAME"),
            parameter::get("SMTP_PASSWORD"),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&parameter::get("SMTP_SERVER"))?
            .port(parameter::get_u16("SMTP_PORT"))
            .credentials(credentials)
            .build();

        let from: Mailbox = format!(
            "{} <{}>",
            parameter::get("MAIL_FROM_NAME"),
            parameter::get("MAIL_FROM")
        )
        .parse()?;

        Ok(Arc::new(Self {
            transport,
            from,
            from_name: parameter::get("MAIL_FROM_NAME"),
            base_url: parameter::get("APP_BASE_URL"),
        }))
    }

    /// Spawn delivery off the request path.
    pub fn send_verification_in_background(self: &Arc<Self>, email: String, username: String, token: String) {
        let mailer = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = mailer.send_verification(&email, &username, &token).await {
                error!("Failed to deliver verification email: {}", e);
            }
        });
    }

    async fn send_verification(&self, email: &str, username: &str, token: &str) -> Result<(), MailError> {
        let link = format!("{}/api/auth/confirmed_email/{}", self.base_url.trim_end_matches('/'), token);
        let body = format!(
            "<html><body>\
             <p>Hi {username},</p>\
             <p>Welcome to {app}! Please confirm your email address by following this link:</p>\
             <p><a href=\"{link}\">{link}</a></p>\
             <p>If you did not create an account, ignore this message.</p>\
             </body></html>",
            username = username,
            app = self.from_name,
            link = link,
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(email.parse()?)
            .subject(format!("Confirm your email on {}", self.from_name))
            .header(ContentType::TEXT_HTML)
            .body(body)?;

        self.transport.send(message).await?;
        info!("Verification email queued for delivery");
        Ok(())
    }
}
