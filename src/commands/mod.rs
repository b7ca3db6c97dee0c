//! CLI command implementations for cadabra.
//!
//! - [`somatic`] - Call somatic indels from matched tumor/normal BAMs
//! - [`common`] - Option groups shared by calling commands
//! - [`command`] - The [`command::Command`] trait dispatched from `main`

pub mod command;
pub mod common;
pub mod somatic;
