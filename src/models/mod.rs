//! Domain models

pub mod audit;
pub mod employee;
pub mod permission;
