pub mod artifacts;
pub mod bytes;
pub mod config;
pub mod macros;
pub mod token;
