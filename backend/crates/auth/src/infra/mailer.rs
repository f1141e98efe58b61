//! Outbound Message Dispatch
//!
//! Transport mechanics are out of scope for this service; the dispatch
//! collaborator only needs to hand the message off. This implementation
//! writes it to the structured log, which is also what keeps the
//! confirmation codes observable in development.

use crate::domain::repository::Mailer;
use crate::error::AuthResult;

/// Dispatcher that emits messages as log events
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn dispatch(&self, to: &str, subject: &str, body: &str) -> AuthResult<()> {
        tracing::info!(to = %to, subject = %subject, body = %body, "Outbound message");
        Ok(())
    }
}
