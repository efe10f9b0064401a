pub mod hashmap_user_store;
pub mod in_memory_reset_token_store;
pub mod in_memory_revoked_session_store;
pub mod postgres_user_store;
pub mod redis_revoked_session_store;
