//! Plan fingerprinting and summary counts.

use std::collections::BTreeMap;

use serde::Serialize;
use sha2::{Digest, Sha256};

use smartcheck_shared::{Phase, PlannedChecklist, RiskLevel, Result, SmartCheckError};

/// SHA-256 (hex) over the plan with checklist ids removed.
///
/// Two planning calls with identical inputs produce the same fingerprint even
/// though their ids differ.
pub fn plan_fingerprint(plan: &[PlannedChecklist]) -> Result<String> {
    let mut value = serde_json::to_value(plan)
        .map_err(|e| SmartCheckError::parse(format!("failed to serialize plan: {e}")))?;

    if let Some(checklists) = value.as_array_mut() {
        for checklist in checklists {
            if let Some(fields) = checklist.as_object_mut() {
                fields.remove("id");
            }
        }
    }

    let canonical = serde_json::to_vec(&value)
        .map_err(|e| SmartCheckError::parse(format!("failed to serialize plan: {e}")))?;

    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Aggregate counts over a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub total: usize,
    pub enabled: usize,
    pub total_items: usize,
    pub by_phase: BTreeMap<Phase, usize>,
    pub by_risk: BTreeMap<RiskLevel, usize>,
}

impl PlanSummary {
    pub fn from_plan(plan: &[PlannedChecklist]) -> Self {
        let mut summary = Self {
            total: plan.len(),
            ..Self::default()
        };
        for checklist in plan {
            if checklist.enabled {
                summary.enabled += 1;
            }
            summary.total_items += checklist.item_count;
            *summary.by_phase.entry(checklist.phase).or_default() += 1;
            *summary.by_risk.entry(checklist.risk_level).or_default() += 1;
        }
        summary
    }

    pub fn high_risk(&self) -> usize {
        self.by_risk.get(&RiskLevel::High).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcheck_shared::PlannedChecklistId;

    fn make_checklist(title: &str, phase: Phase, risk_level: RiskLevel, item_count: usize) -> PlannedChecklist {
        PlannedChecklist {
            id: PlannedChecklistId::new(),
            phase,
            title: title.into(),
            template_ids: vec![format!("tpl-{title}")],
            area_key: None,
            trades: None,
            reason_tags: vec!["bath".into()],
            risk_level,
            item_count,
            enabled: true,
            items: None,
        }
    }

    #[test]
    fn fingerprint_ignores_ids() {
        let a = vec![
            make_checklist("a", Phase::Precon, RiskLevel::Low, 3),
            make_checklist("b", Phase::Rough, RiskLevel::High, 5),
        ];
        let b: Vec<_> = a
            .iter()
            .cloned()
            .map(|mut c| {
                c.id = PlannedChecklistId::new();
                c
            })
            .collect();

        let fa = plan_fingerprint(&a).expect("fingerprint");
        let fb = plan_fingerprint(&b).expect("fingerprint");
        assert_eq!(fa, fb);
        assert_eq!(fa.len(), 64);
    }

    #[test]
    fn fingerprint_tracks_content_and_order() {
        let mut plan = vec![
            make_checklist("a", Phase::Precon, RiskLevel::Low, 3),
            make_checklist("b", Phase::Rough, RiskLevel::High, 5),
        ];
        let before = plan_fingerprint(&plan).expect("fingerprint");

        plan[0].set_enabled(false);
        let toggled = plan_fingerprint(&plan).expect("fingerprint");
        assert_ne!(before, toggled);

        plan[0].set_enabled(true);
        plan.swap(0, 1);
        assert_ne!(before, plan_fingerprint(&plan).expect("fingerprint"));
    }

    #[test]
    fn empty_plan_fingerprint_is_stable() {
        let a = plan_fingerprint(&[]).expect("fingerprint");
        let b = plan_fingerprint(&[]).expect("fingerprint");
        assert_eq!(a, b);
    }

    #[test]
    fn summary_counts() {
        let mut plan = vec![
            make_checklist("a", Phase::Precon, RiskLevel::Low, 3),
            make_checklist("b", Phase::Rough, RiskLevel::High, 5),
            make_checklist("c", Phase::Rough, RiskLevel::Medium, 2),
        ];
        plan[2].set_enabled(false);

        let summary = PlanSummary::from_plan(&plan);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.enabled, 2);
        assert_eq!(summary.total_items, 10);
        assert_eq!(summary.by_phase.get(&Phase::Rough), Some(&2));
        assert_eq!(summary.by_phase.get(&Phase::Punch), None);
        assert_eq!(summary.high_risk(), 1);
    }

    #[test]
    fn summary_serializes_enum_keys() {
        let plan = vec![make_checklist("a", Phase::Punch, RiskLevel::Low, 1)];
        let json = serde_json::to_value(PlanSummary::from_plan(&plan)).expect("serialize");
        assert_eq!(json["by_phase"]["punch"], 1);
        assert_eq!(json["by_risk"]["low"], 1);
    }
}
