//! Plano Core - Interpreter for Portuguese fitness, nutrition and rehab plans
//!
//! This crate turns loosely formatted, LLM-written plan text into structure:
//! - Line classification and section building
//! - Section typing per plan kind
//! - Item formatting (exercises, meals, shopping lists, facts)
//! - "What do I do today?" resolution
//! - Exercise check-off storage

pub mod config;
pub mod constants;
pub mod error;
pub mod paths;
pub mod plan;
pub mod storage;
pub mod text;

// Re-exports for convenience
pub use config::PlanoConfig;
pub use error::PlanError;
pub use plan::{
    format_items, parse, resolve_rehab, resolve_workout, Item, Plan, PlanKind, PlanProfile,
    Section, SectionType,
};
pub use storage::{Database, SqliteCompletionStore};
