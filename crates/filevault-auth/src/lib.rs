//! # filevault-auth
//!
//! Identity resolution for FileVault. Tokens are issued elsewhere; this
//! crate only verifies HS256 access tokens and turns them into a
//! [`filevault_core::types::UserId`].

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, TokenType};
