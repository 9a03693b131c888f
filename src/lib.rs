//! Vigil - personal safety evidence recorder
//!
//! This crate records time-boxed audio, video, and location evidence
//! from the local device and persists it to a local or remote store.
//! Panic sessions capture every capability at once and cannot be
//! stopped early; every session releases its device resources on all
//! exit paths.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core value objects, entities, and errors
//! - **Application**: Session use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, geocoding,
//!   evidence stores, notifications)
//! - **CLI**: Command-line interface, argument parsing, and output

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
