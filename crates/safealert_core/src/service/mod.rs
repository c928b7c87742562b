//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod account_service;
pub mod alert_service;
pub mod alert_view;
pub mod group_service;
