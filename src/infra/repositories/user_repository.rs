//! Transaction-scoped user repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::{Alias, Expr, Func},
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User, UserChanges};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::Pagination;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Idempotent schema for the `users` table
pub(crate) const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password TEXT,
    img TEXT,
    role VARCHAR(50) NOT NULL DEFAULT 'USER_ROLE',
    status BOOLEAN NOT NULL DEFAULT TRUE,
    email_validated BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMPTZ
)"#;

/// User persistence operations, bound to one unit of work.
///
/// Lookups that match nothing fail with `AppError::NoRows`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create the users table if it does not exist
    async fn migrate(&self) -> AppResult<()>;

    /// Insert a new user; a taken email is a conflict
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// List users, newest first, with the total of the filtered set
    async fn get_all(&self, pagination: Option<Pagination>) -> AppResult<(Vec<User>, u64)>;

    /// Find user by ID
    async fn get_by_id(&self, id: Uuid) -> AppResult<User>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<User>;

    /// Apply the present fields of `changes`
    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> AppResult<()>;

    /// Soft delete: the row stays, status becomes disabled
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// PostgreSQL implementation of [`UserRepository`].
///
/// Owns the transaction until the unit of work takes it back to commit
/// or roll back; every call after that fails with `TransactionClosed`.
pub struct PgUserRepository {
    txn: Option<DatabaseTransaction>,
}

impl PgUserRepository {
    pub(crate) fn new(txn: DatabaseTransaction) -> Self {
        Self { txn: Some(txn) }
    }

    /// Hand the transaction back for its terminal call
    pub(crate) fn take_transaction(&mut self) -> Option<DatabaseTransaction> {
        self.txn.take()
    }

    fn txn(&self) -> AppResult<&DatabaseTransaction> {
        self.txn.as_ref().ok_or(AppError::TransactionClosed)
    }
}

/// Listing query, optionally narrowed by a case-insensitive search
/// over name, email and "name email".
fn listing(search: Option<&str>) -> Select<UserEntity> {
    let query = UserEntity::find();

    let Some(term) = search else {
        return query;
    };

    let pattern = format!("%{}%", term.to_lowercase());
    let full_name = Func::cust(Alias::new("CONCAT"))
        .arg(Expr::col(user::Column::Name))
        .arg(" ")
        .arg(Expr::col(user::Column::Email));

    query.filter(
        Condition::any()
            .add(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(pattern.clone()))
            .add(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(pattern.clone()))
            .add(Expr::expr(Func::lower(full_name)).like(pattern)),
    )
}

/// Map the present fields onto an otherwise untouched active model
fn apply_changes(changes: UserChanges) -> ActiveModel {
    let mut active = <ActiveModel as ActiveModelTrait>::default();

    if let Some(name) = changes.name {
        active.name = Set(name);
    }
    if let Some(password) = changes.password {
        active.password = Set(Some(password));
    }
    if let Some(img) = changes.img {
        active.img = Set(Some(img));
    }
    if let Some(role) = changes.role {
        active.role = Set(role.as_str().to_string());
    }
    if let Some(status) = changes.status {
        active.status = Set(status);
    }
    if let Some(email_validated) = changes.email_validated {
        active.email_validated = Set(email_validated);
    }
    active.updated_at = Set(Some(Utc::now()));

    active
}

fn map_insert_error(err: DbErr) -> AppError {
    insert_error(err.sql_err(), err)
}

/// A taken email surfaces as a conflict, anything else stays a database error
fn insert_error(violation: Option<SqlErr>, err: DbErr) -> AppError {
    match violation {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("User"),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn migrate(&self) -> AppResult<()> {
        self.txn()?.execute_unprepared(CREATE_USERS_TABLE).await?;
        Ok(())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(user.name),
            email: Set(user.email),
            password: Set(user.password),
            img: Set(user.img),
            role: Set(user.role.as_str().to_string()),
            status: Set(user.status),
            email_validated: Set(user.email_validated),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        };

        let model = active_model
            .insert(self.txn()?)
            .await
            .map_err(map_insert_error)?;

        Ok(User::from(model))
    }

    async fn get_all(&self, pagination: Option<Pagination>) -> AppResult<(Vec<User>, u64)> {
        let txn = self.txn()?;
        let query = listing(pagination.as_ref().and_then(|p| p.search.as_deref()));

        let total = query.clone().count(txn).await?;

        let mut query = query.order_by_desc(user::Column::CreatedAt);
        if let Some(p) = &pagination {
            query = query.limit(p.limit).offset(p.offset());
        }

        let models = query.all(txn).await?;
        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<User> {
        UserEntity::find_by_id(id)
            .one(self.txn()?)
            .await?
            .map(User::from)
            .ok_or_no_rows()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<User> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.txn()?)
            .await?
            .map(User::from)
            .ok_or_no_rows()
    }

    async fn update_by_id(&self, id: Uuid, changes: UserChanges) -> AppResult<()> {
        if changes.is_empty() {
            return Err(AppError::validation(format!(
                "No fields to update for user {}",
                id
            )));
        }

        let result = UserEntity::update_many()
            .set(apply_changes(changes))
            .filter(user::Column::Id.eq(id))
            .exec(self.txn()?)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NoRows);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.update_by_id(id, UserChanges::disable()).await
    }
}
