//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! Every service call opens its own unit of work through the injected
//! factory and settles it before returning.

mod auth_service;
mod migration_service;
mod user_service;

pub use auth_service::{AuthResponse, AuthService, Authenticator};
pub use migration_service::MigrationService;
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
