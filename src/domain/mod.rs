//! Payment-order model: validation, account classification, canonical
//! signing input and the ports to the gateway's collaborators.

pub mod account;
pub mod bank;
pub mod canonical;
pub mod order;
pub mod ports;
pub mod protocol;
pub mod text;
