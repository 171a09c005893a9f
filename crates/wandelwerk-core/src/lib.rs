// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wandelwerk — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod metadata;
pub mod types;

pub use config::{AppConfig, MissingInputPolicy};
pub use error::WandelwerkError;
pub use metadata::{MetadataRecord, MetadataValue};
pub use types::*;
