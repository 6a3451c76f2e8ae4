//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate annotation, routing and repository calls into use-case
//!   level APIs for the outer shells (CLI, UI bridges).
//! - Stay storage-agnostic: services are generic over repository traits.

pub mod capture_service;
pub mod note_service;
pub mod query_service;
