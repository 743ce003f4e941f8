//! Configuration modules.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with development-friendly defaults.
//!
//! - [`cors`]: allowed origins for the SPA frontend
//! - [`database`]: PostgreSQL pool initialization and migrations
//! - [`email`]: SMTP settings for login-code delivery
//! - [`jwt`]: token secret and expiry

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
