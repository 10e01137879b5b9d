pub mod ed25519;
pub mod http;
pub mod in_memory;
