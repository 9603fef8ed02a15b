//! Route handlers

pub mod feedback;
pub mod health;
