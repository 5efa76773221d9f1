//! Shared types, error model, and configuration for SmartCheck.
//!
//! This crate is the foundation depended on by all other SmartCheck crates.
//! It provides:
//! - [`SmartCheckError`]: the unified error type
//! - Domain types ([`ScopeRecord`], [`CostItem`], [`ChecklistTemplateRef`],
//!   [`PlannedChecklist`], and the area/trade/phase enums)
//! - The validated answer set ([`AnswerSet`], [`QuestionCode`])
//! - Configuration ([`AppConfig`], [`PlannerSettings`], config loading)

pub mod answers;
pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use answers::{AnswerKind, AnswerSet, AnswerValue, QuestionCode, normalize_code};
pub use config::{
    AppConfig, DEFAULT_MEDIUM_RISK_SCORE, DefaultsConfig, OutputFormat, PlannerConfig,
    PlannerSettings, config_dir, config_file_path, init_config, init_config_at, load_config,
    load_config_from,
};
pub use error::{Result, SmartCheckError};
pub use types::{
    AreaType, AssigneeRole, ChecklistTemplateRef, CostItem, Phase, PlannedChecklist,
    PlannedChecklistId, PlannedItem, ProjectType, RiskLevel, ScopeRecord, TemplateItemRef,
    TradeType,
};
