pub mod bridge;
pub mod jwt;
