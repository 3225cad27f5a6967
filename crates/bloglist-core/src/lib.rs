//! # Bloglist Core
//!
//! The domain layer of the bloglist service.
//! This crate contains the blog/user entities, the statistics helpers over
//! blog lists, and the ports infrastructure must implement. It has no
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod stats;

pub use error::DomainError;
