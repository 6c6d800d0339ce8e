//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the vocabulary every panel crate agrees on:
//! - Error classification and the unified error type
//! - The JSON response envelope (`success` / `msg` / `obj`)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod response;
