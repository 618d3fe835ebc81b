//! Error types for the fallible edges of the library
//!
//! Parsing never fails. Errors only come from the validation gate, config
//! loading and the completion store.

use std::path::PathBuf;

use thiserror::Error;

use crate::plan::PlanKind;

#[derive(Debug, Error)]
pub enum PlanError {
    /// Text rejected by the validation gate
    #[error("Nenhum Plano Válido Disponível")]
    NoValidPlan { kind: PlanKind },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Completion store error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
