//! Notification service implementation
//!
//! This service formats and sends the registration and payment confirmation
//! emails. Sending is best-effort: the `dispatch_*` methods hand the message
//! to a detached task whose failures are only ever logged, so email trouble
//! can never fail the operation that triggered it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::EmailConfig;
use crate::models::registration::ExperienceLevel;
use crate::utils::errors::{Result, SwingRegError};

/// A rendered email ready for the transport
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body_html: String,
}

/// Transport seam so tests can observe outgoing mail without an SMTP server
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<()>;

    fn name(&self) -> &'static str;
}

/// SMTP transport backed by lettre
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| SwingRegError::Config(format!("Invalid sender address: {}", e)))?;

        let transport = if config.smtp_username.is_empty() {
            // No auth, plaintext: local development against Mailpit/Mailhog
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
                .credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ))
                .port(config.smtp_port)
                .build()
        };

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.body_html)?;

        self.transport.send(message).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

/// Data rendered into confirmation emails
#[derive(Debug, Clone)]
pub struct EmailData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub experience: ExperienceLevel,
    pub registration_date: DateTime<Utc>,
    pub waiting_list: bool,
}

/// Notification service for confirmation email handling
#[derive(Clone)]
pub struct NotificationService {
    transport: Arc<dyn EmailTransport>,
    config: EmailConfig,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(transport: Arc<dyn EmailTransport>, config: EmailConfig) -> Self {
        Self { transport, config }
    }

    /// Send the registration confirmation email. The body branches only on
    /// whether the registrant landed on the waiting list.
    pub async fn send_registration_confirmation(&self, data: &EmailData) -> Result<()> {
        let email = self.registration_confirmation_message(data);
        self.deliver(email).await
    }

    /// Send the payment confirmation email, including the door access code.
    pub async fn send_payment_confirmation(&self, data: &EmailData) -> Result<()> {
        let email = self.payment_confirmation_message(data);
        self.deliver(email).await
    }

    /// Fire-and-forget registration confirmation
    pub fn dispatch_registration_confirmation(&self, data: EmailData) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.send_registration_confirmation(&data).await {
                error!(to = %data.email, error = %e, "Registration confirmation email failed");
            }
        });
    }

    /// Fire-and-forget payment confirmation
    pub fn dispatch_payment_confirmation(&self, data: EmailData) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.send_payment_confirmation(&data).await {
                error!(to = %data.email, error = %e, "Payment confirmation email failed");
            }
        });
    }

    async fn deliver(&self, email: OutgoingEmail) -> Result<()> {
        debug!(to = %email.to, subject = %email.subject, transport = self.transport.name(), "Sending email");

        self.transport.send(email.clone()).await?;

        info!(to = %email.to, subject = %email.subject, "Email sent successfully");
        Ok(())
    }

    fn registration_confirmation_message(&self, data: &EmailData) -> OutgoingEmail {
        let subject = if data.waiting_list {
            "You're on the Waiting List - Registration Received".to_string()
        } else {
            "Registration Confirmed - Welcome!".to_string()
        };

        let details = format!(
            r#"<h3>Registration Details</h3>
<p><strong>Name:</strong> {first} {last}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Experience Level:</strong> {experience}</p>
<p><strong>Registered:</strong> {date}</p>"#,
            first = data.first_name,
            last = data.last_name,
            email = data.email,
            experience = data.experience,
            date = data.registration_date.format("%Y-%m-%d %H:%M UTC"),
        );

        let body_html = if data.waiting_list {
            format!(
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h1>You're on the Waiting List</h1>
<h2>Hi {first}!</h2>
<p>Thank you for your interest! We've received your registration, but the event is currently at full capacity.</p>
{details}
<p><strong>Status:</strong> Waiting List</p>
<h3>What Happens Next?</h3>
<ul>
<li>We'll notify you as soon as a spot becomes available</li>
<li>You'll then have 24 hours to confirm and pay</li>
</ul>
<p>Best regards,<br>The Organizer Team</p>
</div>"#,
                first = data.first_name,
                details = details,
            )
        } else {
            format!(
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h1>Welcome!</h1>
<h2>Hi {first}!</h2>
<p>Thank you for registering. We're excited to have you join us on the dance floor.</p>
{details}
<h3>Payment Information</h3>
<p>Your registration is currently <strong>pending payment</strong>. Please complete your payment to confirm your spot.</p>
<p>Best regards,<br>The Organizer Team</p>
</div>"#,
                first = data.first_name,
                details = details,
            )
        };

        OutgoingEmail {
            to: data.email.clone(),
            subject,
            body_html,
        }
    }

    fn payment_confirmation_message(&self, data: &EmailData) -> OutgoingEmail {
        let body_html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h1>Payment Confirmed!</h1>
<h2>Hi {first}!</h2>
<p>Great news! Your payment has been received and your registration is now <strong>confirmed</strong>.</p>
<p><strong>Experience Level:</strong> {experience}</p>
<h3>Door Access</h3>
<p><strong>Door Code:</strong> <span style="font-family: monospace;">{code}</span></p>
<p><strong>Important:</strong> This door code works only during the event. Please do not share it with anyone.</p>
<p>Just show up with your dancing shoes - we'll have your name on the guest list.</p>
<p>Best regards,<br>The Organizer Team</p>
</div>"#,
            first = data.first_name,
            experience = data.experience,
            code = self.config.access_code,
        );

        OutgoingEmail {
            to: data.email.clone(),
            subject: "Payment Confirmed - See You on the Dance Floor!".to_string(),
            body_html,
        }
    }
}

/// Mock transport for tests: records every attempted send and can be told to
/// fail, optionally signalling attempts over a channel for detached sends.
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    pub struct MockTransport {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
        notify: Mutex<Option<mpsc::UnboundedSender<OutgoingEmail>>>,
    }

    impl MockTransport {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
                notify: Mutex::new(None),
            })
        }

        /// A transport whose every send fails after recording the attempt
        pub fn failing() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
                notify: Mutex::new(None),
            })
        }

        /// A transport that signals every attempt over a channel, for
        /// synchronizing with fire-and-forget sends.
        pub fn with_channel() -> (Arc<Self>, mpsc::UnboundedReceiver<OutgoingEmail>) {
            let (tx, rx) = mpsc::unbounded_channel();
            let transport = Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                fail: false,
                notify: Mutex::new(Some(tx)),
            });
            (transport, rx)
        }

        /// All attempted sends so far
        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmailTransport for MockTransport {
        async fn send(&self, email: OutgoingEmail) -> Result<()> {
            self.sent.lock().unwrap().push(email.clone());
            if let Some(tx) = self.notify.lock().unwrap().as_ref() {
                let _ = tx.send(email);
            }

            if self.fail {
                return Err(SwingRegError::Delivery(
                    "mock transport configured to fail".to_string(),
                ));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn test_service(transport: Arc<dyn EmailTransport>) -> NotificationService {
        let mut config = EmailConfig {
            access_code: "1234A".to_string(),
            ..crate::config::Settings::default().email
        };
        config.from_address = "events@swingreg.fi".to_string();
        NotificationService::new(transport, config)
    }

    fn test_data(waiting_list: bool) -> EmailData {
        EmailData {
            first_name: "Aino".to_string(),
            last_name: "Korhonen".to_string(),
            email: "aino@example.fi".to_string(),
            experience: ExperienceLevel::Beginner,
            registration_date: Utc::now(),
            waiting_list,
        }
    }

    #[test]
    fn test_registration_body_branches_on_waiting_list() {
        let service = test_service(MockTransport::new());

        let seated = service.registration_confirmation_message(&test_data(false));
        assert!(seated.subject.contains("Confirmed"));
        assert!(seated.body_html.contains("pending payment"));
        assert!(!seated.body_html.contains("Waiting List"));

        let waitlisted = service.registration_confirmation_message(&test_data(true));
        assert!(waitlisted.subject.contains("Waiting List"));
        assert!(waitlisted.body_html.contains("Waiting List"));
        assert!(!waitlisted.body_html.contains("pending payment"));
    }

    #[test]
    fn test_payment_body_contains_access_code() {
        let service = test_service(MockTransport::new());
        let email = service.payment_confirmation_message(&test_data(false));
        assert!(email.body_html.contains("1234A"));
        assert_eq!(email.to, "aino@example.fi");
    }

    #[tokio::test]
    async fn test_send_records_attempt() {
        let transport = MockTransport::new();
        let service = test_service(transport.clone());

        service
            .send_registration_confirmation(&test_data(false))
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "aino@example.fi");
    }

    #[tokio::test]
    async fn test_send_surfaces_transport_failure() {
        let transport = MockTransport::failing();
        let service = test_service(transport.clone());

        let result = service.send_payment_confirmation(&test_data(false)).await;
        assert_matches!(result, Err(SwingRegError::Delivery(_)));
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_sends_exactly_once() {
        let (transport, mut rx) = MockTransport::with_channel();
        let service = test_service(transport);

        service.dispatch_payment_confirmation(test_data(false));

        let email = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("dispatch should deliver within a second")
            .expect("channel open");
        assert!(email.subject.contains("Payment Confirmed"));

        // No second attempt follows
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
