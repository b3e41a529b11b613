//! Outbound email: delivery, detached jobs and the HTML templates.

mod email_job;
mod templates;

pub use email_job::{EmailJob, MessagingService, SmtpMessagingService};
pub use templates::{HtmlTemplateService, TemplateService};

#[cfg(any(test, feature = "test-utils"))]
pub use email_job::MockMessagingService;
#[cfg(any(test, feature = "test-utils"))]
pub use templates::MockTemplateService;
