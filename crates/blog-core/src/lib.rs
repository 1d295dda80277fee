//! # Blog Core
//!
//! The domain layer of the blog backend.
//! This crate contains the post model, its validation rules, the session
//! auth gate and the repository port. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::PostService;
