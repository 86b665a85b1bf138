pub mod auth;
pub mod error;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod validation;
