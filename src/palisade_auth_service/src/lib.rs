pub mod auth_service;
pub mod bootstrap;
pub mod tracing;

pub use auth_service::AuthService;
pub use bootstrap::{configure_postgresql, configure_redis, get_redis_client};
pub use crate::tracing::init_tracing;
