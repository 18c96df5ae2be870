#![warn(missing_docs)]
// Note: this overwrites the link in the README to point to the rust docs of the pengajuan-core crate.
//! [pengajuan_core]: https://docs.rs/pengajuan_core/latest/pengajuan_core/index.html
//! [pengajuan_sqlite]: https://docs.rs/pengajuan_sqlite/latest/pengajuan_sqlite/index.html
//! [pengajuan_axum]: https://docs.rs/pengajuan_axum/latest/pengajuan_axum/index.html
#![doc = include_str!("../README.md")]

/// Core domain models for the submission portal.
///
/// This module contains the data structures that represent submissions,
/// their attached files, the required-file configuration and the session of
/// the person acting on them.
///
/// The models are plain data with the small amount of behavior needed to
/// keep their wire representation stable, following the hexagonal
/// architecture: persistence and transport live in other crates.
pub mod models;

/// Interface traits for the submission portal.
///
/// These are the "ports" of the hexagonal architecture: they define the
/// contract between the workflow rules and the adapters (database, HTTP)
/// without specifying implementation details.
pub mod ports;

/// The approval workflow.
///
/// The transition table, the verification aggregator and the authorization
/// rules that decide which actions a session may perform on a record. The
/// server uses these to enforce transitions; clients use the same functions
/// to decide which actions to offer.
pub mod workflow;

/// Printable HTML report for a submission.
pub mod report;
