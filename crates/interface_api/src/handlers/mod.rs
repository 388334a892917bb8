//! Request handlers

pub mod assessments;
pub mod health;
