// Main library entry point for globalint.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
