//! Request and response bodies

pub mod assessments;
