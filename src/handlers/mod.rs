//! HTTP handler modules

pub mod audit;
pub mod employee;
pub mod health;
pub mod permission;
