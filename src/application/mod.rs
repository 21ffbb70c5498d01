//! Application layer - Use cases built on the domain
//!
//! This layer contains:
//! - Services: the dice state reducer and server-side rolling
//! - Ports: random source and board feed interfaces

pub mod ports;
pub mod services;
