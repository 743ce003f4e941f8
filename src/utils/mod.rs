//! Utility modules for the EvalProy API.
//!
//! This module contains shared utilities used throughout the application:
//!
//! - [`codigos`]: Login code generation and verification
//! - [`email`]: Email sending utilities using SMTP
//! - [`errors`]: Application error types and handling
//! - [`jwt`]: JWT token creation and verification

pub mod codigos;
pub mod email;
pub mod errors;
pub mod jwt;
