//! Shared fakes for service tests.
//!
//! `TestFactory` hands out one queued `MockUserRepository` per unit of
//! work and records how every unit ended.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use admin_api::domain::{MockPasswordHasher, PasswordError, User, UserRole};
use admin_api::errors::{AppError, AppResult};
use admin_api::infra::{MockUserRepository, TxState, UnitOfWork, UnitOfWorkFactory, UserRepository};

/// How the units of work of one test ended
#[derive(Default)]
pub struct Ledger {
    begun: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

impl Ledger {
    pub fn begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

/// Unit of work with the same state machine as the postgres one
pub struct TestUnitOfWork {
    repo: MockUserRepository,
    state: TxState,
    ledger: Arc<Ledger>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        &self.repo
    }

    async fn commit(&mut self) -> AppResult<()> {
        match self.state {
            TxState::Committed => Err(AppError::AlreadyCommitted),
            TxState::RolledBack => Err(AppError::AlreadyRolledBack),
            TxState::Open => {
                self.state = TxState::Committed;
                self.ledger.commits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }

    async fn rollback(&mut self) -> AppResult<()> {
        match self.state {
            TxState::Committed => Err(AppError::AlreadyCommitted),
            TxState::RolledBack => Ok(()),
            TxState::Open => {
                self.state = TxState::RolledBack;
                self.ledger.rollbacks.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    }

    fn state(&self) -> TxState {
        self.state
    }
}

pub struct TestFactory {
    repos: Mutex<VecDeque<MockUserRepository>>,
    pub ledger: Arc<Ledger>,
}

impl TestFactory {
    /// One repository per expected `begin`, in order
    pub fn new(repos: Vec<MockUserRepository>) -> Arc<Self> {
        Arc::new(Self {
            repos: Mutex::new(repos.into()),
            ledger: Arc::new(Ledger::default()),
        })
    }

    /// A factory that must never be used
    pub fn unused() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl UnitOfWorkFactory for TestFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let repo = self
            .repos
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::internal("unexpected unit of work"))?;

        self.ledger.begun.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TestUnitOfWork {
            repo,
            state: TxState::Open,
            ledger: self.ledger.clone(),
        }))
    }
}

pub fn test_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: "JANE DOE".to_string(),
        email: email.to_string(),
        password: Some("stored-hash".to_string()),
        img: None,
        role: UserRole::User,
        status: true,
        email_validated: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// Hasher that prefixes instead of hashing
pub fn prefix_hasher() -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|plain| Ok(format!("hashed:{}", plain)));
    hasher
        .expect_verify()
        .returning(|hash, plain| {
            if hash == format!("hashed:{}", plain) {
                Ok(())
            } else {
                Err(PasswordError::Mismatch)
            }
        });
    hasher
}
