pub mod auth;
pub mod builders;
pub mod services;
