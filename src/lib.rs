pub mod connection;
pub mod constants;
pub mod error;
pub mod session;
pub mod wire;
