//! Request handlers

pub mod autocomplete;
pub mod health;
pub mod search;
