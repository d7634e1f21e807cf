//! Error handling for the Deuces backend.

pub mod domain;

pub use domain::DomainError;
