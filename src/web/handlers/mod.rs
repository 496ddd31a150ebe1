//! Request handlers

pub mod health;
pub mod push;
