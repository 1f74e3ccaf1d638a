//! Token, identity and webhook subscription operations.

pub mod account_service;
pub mod webhook_service;
