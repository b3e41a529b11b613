//! HTML email templates.
//!
//! Every caller-supplied value is escaped before it reaches the markup.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Renders transactional emails to HTML.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TemplateService: Send + Sync {
    fn render_welcome_email(&self, user_name: &str, password: &str) -> AppResult<String>;

    fn render_password_reset_email(&self, user_name: &str, reset_link: &str) -> AppResult<String>;

    fn render_email_validation(&self, user_name: &str, validation_link: &str) -> AppResult<String>;
}

/// Built-in templates sharing one HTML frame
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTemplateService;

impl HtmlTemplateService {
    pub fn new() -> Self {
        Self
    }
}

fn require(fields: &[(&str, &str)]) -> AppResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Failed to render template: {} required",
            missing.join(", ")
        )))
    }
}

fn frame(title: &str, header: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{ margin: 0; padding: 0; font-family: Helvetica, Arial, sans-serif; }}
        .header {{ background-color: #185691; color: white; font-size: 2rem; padding: 10px; text-align: center; }}
        .content {{ text-align: center; padding: 20px; }}
        .message {{ font-size: 1.2rem; color: #3c3c3c; text-align: justify; line-height: 1.6; }}
        .highlight-box {{ text-align: center; margin: 20px 0; }}
        .highlight-label {{ font-size: 1.1rem; color: #185691; font-weight: bold; }}
        .highlight-value {{ font-size: 1.3rem; font-weight: bold; background-color: #f5f5f5; padding: 8px 16px; border-radius: 4px; display: inline-block; font-family: monospace; }}
        .button {{ display: inline-block; background-color: #185691; color: white; text-decoration: none; padding: 12px 24px; border-radius: 5px; font-weight: bold; }}
        .footer {{ background-color: #4a4a4a; color: white; text-align: center; padding: 10px 0; margin-top: 30px; }}
    </style>
</head>
<body>
    <div class="header">{header}</div>
    <div class="content">
        {content}
    </div>
    <div class="footer">Admin API - All rights reserved</div>
</body>
</html>"#
    )
}

impl TemplateService for HtmlTemplateService {
    fn render_welcome_email(&self, user_name: &str, password: &str) -> AppResult<String> {
        require(&[("userName", user_name), ("password", password)])?;
        let user_name = encode_text(user_name);
        let password = encode_text(password);

        let content = format!(
            r#"<div class="message">
            Hello {user_name}!<br><br>
            Your administrator account has been created and you can start using the portal right away.
            <div class="highlight-box">
                <div class="highlight-label">Your access password:</div>
                <div class="highlight-value">{password}</div>
            </div>
            If you have any questions, just reply to this email.
        </div>"#
        );

        Ok(frame("Welcome", "Welcome aboard", &content))
    }

    fn render_password_reset_email(&self, user_name: &str, reset_link: &str) -> AppResult<String> {
        require(&[("userName", user_name), ("resetLink", reset_link)])?;
        let user_name = encode_text(user_name);
        let reset_link = encode_double_quoted_attribute(reset_link);

        let content = format!(
            r#"<div class="message">
            Hello {user_name},<br><br>
            We received a request to reset your password. If it was you, follow the link below:
            <div class="highlight-box">
                <a href="{reset_link}" class="button">Reset password</a>
            </div>
            The link expires in 1 hour.<br><br>
            If you did not ask for this change you can ignore this email.
        </div>"#
        );

        Ok(frame("Reset password", "Reset password", &content))
    }

    fn render_email_validation(&self, user_name: &str, validation_link: &str) -> AppResult<String> {
        require(&[("userName", user_name), ("validationLink", validation_link)])?;
        let user_name = encode_text(user_name);
        let validation_link = encode_double_quoted_attribute(validation_link);

        let content = format!(
            r#"<div class="message">
            Hello {user_name}!<br><br>
            To finish your registration we need to verify your email address.
            <div class="highlight-box">
                <a href="{validation_link}" class="button">Verify email</a>
            </div>
            The link expires in 24 hours.<br><br>
            If you did not sign up you can ignore this email.
        </div>"#
        );

        Ok(frame("Verify email", "Email verification", &content))
    }
}
