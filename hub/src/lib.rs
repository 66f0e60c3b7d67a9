pub mod client;
pub mod monitor;
pub mod transfer;
