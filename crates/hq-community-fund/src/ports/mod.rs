//! # Ports Layer
//!
//! Boundary traits of the hexagonal architecture: the inbound API the rest
//! of HQ calls, and the outbound ports the service drives (vote storage,
//! the user address book, the pool voting API).

pub mod inbound;
pub mod outbound;
