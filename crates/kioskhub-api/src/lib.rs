// kioskhub-api: Async Rust client for the FreeKiosk tablet control API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::KioskClient;
pub use error::Error;
pub use models::{CommandResponse, StatusResponse};
pub use transport::TransportConfig;
