//! Checklist inference and planning for SmartCheck.
//!
//! This crate ties together context building, area/trade matrix building,
//! and checklist planning into a single deterministic pipeline
//! (e.g., `run_pipeline`).

pub mod context;
pub mod matrix;
pub mod pipeline;
pub mod planner;
pub mod questions;
pub mod summary;

pub use context::{ChecklistContext, DerivedFlags, DetectedArea, RiskFlags, build_context};
pub use matrix::{AreaTradeMatrix, AreaTradeScope, MatrixArea, build_area_trade_matrix};
pub use pipeline::{PipelineInput, PipelineOutput, run_pipeline};
pub use planner::{PlanInput, Planner, classify_risk, plan_checklists};
pub use questions::{PendingQuestion, pending_questions};
pub use summary::{PlanSummary, plan_fingerprint};
