//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod compare;
pub mod init;
pub mod inspect;
pub mod validate;
