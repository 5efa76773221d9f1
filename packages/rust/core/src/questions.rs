//! Unanswered catalog questions for a project's areas and trades.

use serde::Serialize;
use tracing::debug;

use smartcheck_catalog::Catalog;
use smartcheck_shared::{AnswerKind, AnswerSet, ProjectType, QuestionCode, TradeType};

use crate::matrix::AreaTradeMatrix;

/// A catalog question not yet present in the answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingQuestion {
    pub code: QuestionCode,
    pub prompt: &'static str,
    pub kind: AnswerKind,
    /// Matrix areas whose templates ask this question, in area order.
    pub area_keys: Vec<String>,
}

/// Questions asked by catalog templates matching any matrix area, minus the
/// ones already answered. Deduplicated by code; the first prompt wins.
pub fn pending_questions(
    catalog: &Catalog,
    matrix: &AreaTradeMatrix,
    project_type: ProjectType,
    answers: &AnswerSet,
) -> Vec<PendingQuestion> {
    let mut pending: Vec<PendingQuestion> = Vec::new();

    for (area, trades) in matrix.entries() {
        if trades.is_empty() {
            continue;
        }
        let trades: Vec<TradeType> = trades.iter().copied().collect();
        for question in catalog.get_area_trade_questions(area.area_type, &trades, Some(project_type)) {
            if answers.is_answered(question.code) {
                continue;
            }
            match pending.iter_mut().find(|p| p.code == question.code) {
                Some(existing) => {
                    if !existing.area_keys.contains(&area.key) {
                        existing.area_keys.push(area.key.clone());
                    }
                }
                None => pending.push(PendingQuestion {
                    code: question.code,
                    prompt: question.prompt,
                    kind: question.code.kind(),
                    area_keys: vec![area.key.clone()],
                }),
            }
        }
    }

    debug!(pending = pending.len(), answered = answers.len(), "pending questions resolved");
    pending
}
