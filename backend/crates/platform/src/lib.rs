//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Key generation and Base64 helpers
//! - Cookie parsing
//! - Telegram Bot API client

pub mod cookie;
pub mod crypto;
pub mod telegram;
