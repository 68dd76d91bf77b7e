//! Outgoing email.
//!
//! Delivery is fire-and-forget: callers log a failed send and carry on.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Object-safe mail transport, held as `Arc<dyn Mailer>`.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> anyhow::Result<()>;
}

/// Writes every message to the log instead of delivering it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        info!(to = %email.to, subject = %email.subject, "\n{}", email.body);
        Ok(())
    }
}

/// Keeps sent messages in memory so they can be inspected.
#[derive(Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<Email>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        self.sent
            .lock()
            .map_err(|_| anyhow::anyhow!("mailbox lock poisoned"))?
            .push(email);
        Ok(())
    }
}

pub fn verification_email(app_url: &str, to: &str, name: &str, token: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Verify your email for BlogCollab".into(),
        body: format!(
            "Hello {name},\n\n\
             Thank you for registering with BlogCollab. To complete your registration,\n\
             please verify your email by opening the link below:\n\n\
             {app_url}/verify-email/{token}\n\n\
             If you did not register for BlogCollab, please ignore this email.\n"
        ),
    }
}

pub fn password_reset_email(
    app_url: &str,
    to: &str,
    name: &str,
    token: &str,
    ttl_minutes: i64,
) -> Email {
    Email {
        to: to.to_string(),
        subject: "Reset your BlogCollab password".into(),
        body: format!(
            "Hello {name},\n\n\
             We received a request to reset your BlogCollab password. To choose a new one,\n\
             open the link below:\n\n\
             {app_url}/reset-password/{token}\n\n\
             This link expires in {ttl_minutes} minutes. If you did not request a reset,\n\
             you can ignore this email.\n"
        ),
    }
}

pub fn edit_proposed_email(to: &str, name: &str, blog_title: &str, proposer: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: format!("New suggested edits for your blog \"{blog_title}\""),
        body: format!(
            "Hello {name},\n\n\
             {proposer} has suggested edits to your blog post \"{blog_title}\".\n\n\
             Log in to your account to review, accept, or reject these changes.\n"
        ),
    }
}
