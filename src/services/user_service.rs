//! User service - Handles user-related business logic.
//!
//! Every operation runs in its own unit of work and settles it before
//! returning. Password hashes never leave this service.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

use crate::config::WELCOME_EMAIL_SUBJECT;
use crate::domain::{
    AdminBootstrap, CreateUser, NewUser, PasswordHasher, UpdateUser, User, UserChanges, UserRole,
};
use crate::errors::{AppError, AppResult};
use crate::infra::{settle, UnitOfWorkFactory};
use crate::jobs::{EmailJob, MessagingService, TemplateService};
use crate::types::{Paginated, Pagination};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create an enabled, email-validated user
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// List users; unpaginated requests come back as one full page
    async fn get_all(&self, pagination: Option<Pagination>) -> AppResult<Paginated<User>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<User>;

    async fn find_by_email(&self, email: &str) -> AppResult<User>;

    /// Apply a partial update
    async fn update_by_id(&self, id: Uuid, input: UpdateUser) -> AppResult<()>;

    /// Soft delete (disable) a user
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Create the configured administrator unless it already exists
    async fn create_initial_admin(&self, admin: &AdminBootstrap) -> AppResult<()>;
}

fn not_found(e: AppError) -> AppError {
    match e {
        AppError::NoRows => AppError::NotFound,
        other => other,
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Concrete implementation of UserService.
pub struct UserManager {
    factory: Arc<dyn UnitOfWorkFactory>,
    hasher: Arc<dyn PasswordHasher>,
    messaging: Option<Arc<dyn MessagingService>>,
    templates: Option<Arc<dyn TemplateService>>,
    tracker: TaskTracker,
}

impl UserManager {
    pub fn new(factory: Arc<dyn UnitOfWorkFactory>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            factory,
            hasher,
            messaging: None,
            templates: None,
            tracker: TaskTracker::new(),
        }
    }

    /// Enable welcome emails. Both collaborators are needed; a missing
    /// one leaves the feature off.
    pub fn with_messaging(
        mut self,
        messaging: Option<Arc<dyn MessagingService>>,
        templates: Option<Arc<dyn TemplateService>>,
    ) -> Self {
        self.messaging = messaging;
        self.templates = templates;
        self
    }

    /// Tracker of in-flight email deliveries, drained on shutdown
    pub fn tracker(&self) -> TaskTracker {
        self.tracker.clone()
    }

    /// Fire-and-forget welcome email. Owns copies of everything it sends.
    fn send_welcome(&self, user: &User, password: &str) {
        let (Some(messaging), Some(templates)) = (&self.messaging, &self.templates) else {
            return;
        };

        let body = match templates.render_welcome_email(&user.name, password) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(user_id = %user.id, "Welcome email not rendered: {}", e);
                return;
            }
        };

        let job = EmailJob::new(user.email.clone(), WELCOME_EMAIL_SUBJECT, body);
        self.tracker.spawn(job.run(Arc::clone(messaging)));
    }

    fn changes_from(&self, input: UpdateUser) -> AppResult<UserChanges> {
        let password = input
            .password
            .as_deref()
            .map(|plain| self.hasher.hash(plain))
            .transpose()?;

        let role = input
            .role
            .as_deref()
            .map(|r| r.trim().parse::<UserRole>())
            .transpose()?;

        Ok(UserChanges {
            name: input.name.as_deref().map(normalize_name),
            password,
            img: input.img,
            role,
            status: input.status,
            email_validated: input.email_validated,
        })
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let role = UserRole::validate(input.role.as_deref())?;
        let password = input
            .password
            .as_deref()
            .map(|plain| self.hasher.hash(plain))
            .transpose()?;

        let new_user = NewUser {
            name: normalize_name(&input.name),
            email: input.email.trim().to_string(),
            password,
            img: None,
            role,
            status: true,
            email_validated: true,
        };

        let uow = self.factory.begin().await?;
        let outcome = async {
            match uow.users().find_by_email(&new_user.email).await {
                Ok(_) => return Err(AppError::conflict("User")),
                Err(AppError::NoRows) => {}
                Err(e) => return Err(e),
            }
            uow.users().create(new_user).await
        }
        .await;
        let user = settle(uow, outcome).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");

        self.send_welcome(&user, input.password.as_deref().unwrap_or_default());
        Ok(user.without_password())
    }

    async fn get_all(&self, pagination: Option<Pagination>) -> AppResult<Paginated<User>> {
        let uow = self.factory.begin().await?;
        let outcome = uow.users().get_all(pagination.clone()).await;
        let (users, total) = settle(uow, outcome).await?;

        let users: Vec<User> = users.into_iter().map(User::without_password).collect();

        Ok(match pagination {
            Some(p) => Paginated::new(users, p.page, p.limit, total),
            None => Paginated::full(users, total),
        })
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        let uow = self.factory.begin().await?;
        let outcome = uow.users().get_by_id(id).await;
        let user = settle(uow, outcome).await.map_err(not_found)?;
        Ok(user.without_password())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        let uow = self.factory.begin().await?;
        let outcome = uow.users().find_by_email(email).await;
        let user = settle(uow, outcome).await.map_err(not_found)?;
        Ok(user.without_password())
    }

    async fn update_by_id(&self, id: Uuid, input: UpdateUser) -> AppResult<()> {
        let changes = self.changes_from(input)?;
        if changes.is_empty() {
            return Err(AppError::validation("At least one field is required to update"));
        }

        let uow = self.factory.begin().await?;
        let outcome = uow.users().update_by_id(id, changes).await;
        settle(uow, outcome).await.map_err(not_found)?;

        tracing::info!(user_id = %id, "User updated");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let uow = self.factory.begin().await?;
        let outcome = uow.users().delete(id).await;
        settle(uow, outcome).await.map_err(not_found)?;

        tracing::info!(user_id = %id, "User disabled");
        Ok(())
    }

    async fn create_initial_admin(&self, admin: &AdminBootstrap) -> AppResult<()> {
        match self.find_by_email(&admin.email).await {
            Ok(_) => {
                tracing::debug!(email = %admin.email, "Initial admin already present");
                return Ok(());
            }
            Err(AppError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let password = admin
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::config("ADMIN_PASSWORD is required to create the initial admin"))?;

        let new_user = NewUser {
            name: admin.name.clone(),
            email: admin.email.clone(),
            password: Some(self.hasher.hash(password)?),
            img: None,
            role: UserRole::Admin,
            status: true,
            email_validated: true,
        };

        let uow = self.factory.begin().await?;
        let outcome = uow.users().create(new_user).await;
        let user = settle(uow, outcome).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "Initial admin created");
        Ok(())
    }
}
