//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: bearer JWT validation and the [`auth::AuthDocente`] extractor
//! - [`role`]: supervisor gate for audit routes
//!
//! # Authentication flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthDocente`] validates the JWT and exposes the claims
//! 3. The handler receives the authenticated identity as a parameter

pub mod auth;
pub mod role;
