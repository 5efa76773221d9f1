//! End-to-end planning pipeline: scope + answers → context → matrix → plan.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument};

use smartcheck_catalog::Catalog;
use smartcheck_shared::{
    AnswerSet, ChecklistTemplateRef, PlannedChecklist, PlannerSettings, ProjectType, Result,
    ScopeRecord, SmartCheckError,
};

use crate::context::{ChecklistContext, build_context};
use crate::matrix::{AreaTradeMatrix, build_area_trade_matrix};
use crate::planner::{PlanInput, Planner};

/// Inputs of one planning run, already validated at the boundary.
#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    pub project_type: ProjectType,
    pub scope_records: Vec<ScopeRecord>,
    pub answers: AnswerSet,
    pub templates: Vec<ChecklistTemplateRef>,
}

impl PipelineInput {
    /// Build from raw JSON documents. `null` stands for "not provided".
    pub fn from_json(
        project_type: ProjectType,
        scope_records: &Value,
        answers: &Value,
        templates: &Value,
    ) -> Result<Self> {
        Ok(Self {
            project_type,
            scope_records: parse_array(scope_records, "scope records")?,
            answers: AnswerSet::from_json(answers)?,
            templates: parse_array(templates, "templates")?,
        })
    }
}

fn parse_array<T: DeserializeOwned>(value: &Value, what: &str) -> Result<Vec<T>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    if !value.is_array() {
        return Err(SmartCheckError::validation(format!(
            "{what} must be a JSON array"
        )));
    }
    serde_json::from_value(value.clone())
        .map_err(|e| SmartCheckError::parse(format!("invalid {what}: {e}")))
}

/// Everything produced by one run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub context: ChecklistContext,
    pub matrix: AreaTradeMatrix,
    pub checklists: Vec<PlannedChecklist>,
}

/// Run context building, matrix building and planning in sequence.
///
/// The matrix is always built; it reaches the planner only when
/// `include_area_trade_checklists` is set.
#[instrument(skip_all, fields(project_type = %input.project_type))]
pub fn run_pipeline(
    input: &PipelineInput,
    catalog: &Catalog,
    settings: &PlannerSettings,
) -> PipelineOutput {
    let context = build_context(input.project_type, &input.scope_records, &input.answers);
    let matrix = build_area_trade_matrix(&input.scope_records);

    let planner = Planner::new(*catalog, settings.clone());
    let checklists = planner.plan(&PlanInput {
        project_type: input.project_type,
        context: &context,
        templates: &input.templates,
        area_trade_matrix: settings
            .include_area_trade_checklists
            .then_some(&matrix),
    });

    info!(
        risk_score = context.risk_score,
        areas = matrix.areas.len(),
        checklists = checklists.len(),
        "pipeline complete"
    );

    PipelineOutput {
        context,
        matrix,
        checklists,
    }
}
