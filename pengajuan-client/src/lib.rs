#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod client;
pub use client::Client;

mod detail;
pub use detail::{DetailPage, PendingToggle};

mod error;
pub use error::ClientError;
