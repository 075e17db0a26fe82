//! Configuration and credential types.

pub mod config;
pub mod credentials;
