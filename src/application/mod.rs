//! Application layer orchestrating order registration.
//!
//! This module defines the `OrderRegistrar`, which validates an order, signs
//! its canonical string and submits it through the gateway port.

pub mod registration;
