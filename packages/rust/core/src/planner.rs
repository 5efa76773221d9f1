//! Checklist planner.
//!
//! Evaluates an ordered list of rules against the checklist context and the
//! caller-supplied templates, then appends per-area checklists synthesized
//! from the area/trade catalog. Output is deduplicated, risk-classified and
//! ordered by phase then risk.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, instrument};

use smartcheck_catalog::{Catalog, CatalogItem};
use smartcheck_shared::{
    AreaType, ChecklistTemplateRef, Phase, PlannedChecklist, PlannedChecklistId, PlannerSettings,
    ProjectType, RiskLevel, TradeType,
};

use crate::context::ChecklistContext;
use crate::matrix::AreaTradeMatrix;

/// Reason tags that make a checklist high risk.
pub const HIGH_RISK_TAGS: &[&str] = &["waterproofing", "structural", "curbless"];

/// Reason tags that make a checklist at least medium risk.
pub const MEDIUM_RISK_TAGS: &[&str] = &["electrical", "occupied", "hvac"];

const ANY_PHASE: &[Phase] = &[
    Phase::Precon,
    Phase::Rough,
    Phase::Finish,
    Phase::Punch,
    Phase::Warranty,
];
const KITCHEN_PHASES: &[Phase] = &[Phase::Precon, Phase::Rough, Phase::Finish];
const BATH_PHASES: &[Phase] = &[Phase::Precon, Phase::Finish];

const OCCUPIED_NAME_FALLBACKS: &[&str] = &["occupied", "daily closeout"];
const WALKTHROUGH_NAME_FALLBACKS: &[&str] = &["walkthrough", "walk-through", "walk through"];
const GENERAL_NAME_FALLBACKS: &[&str] = &["general", "kickoff"];

/// Everything one planning call needs.
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    pub project_type: ProjectType,
    pub context: &'a ChecklistContext,
    pub templates: &'a [ChecklistTemplateRef],
    pub area_trade_matrix: Option<&'a AreaTradeMatrix>,
}

/// Risk level for a set of reason tags under the given global risk score.
pub fn classify_risk<S: AsRef<str>>(reason_tags: &[S], risk_score: u8, threshold: u8) -> RiskLevel {
    let has_any = |set: &[&str]| reason_tags.iter().any(|t| set.contains(&t.as_ref()));

    if has_any(HIGH_RISK_TAGS) {
        RiskLevel::High
    } else if risk_score >= threshold || has_any(MEDIUM_RISK_TAGS) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Whether an external template applies to a project type.
fn template_applies(template: &ChecklistTemplateRef, project_type: ProjectType) -> bool {
    match template.project_type {
        None => true,
        Some(pt) if pt == project_type => true,
        Some(ProjectType::KitchenRemodel | ProjectType::BathRemodel) => {
            project_type == ProjectType::FullHomeRemodel
        }
        Some(_) => false,
    }
}

/// Stateless planner over a catalog and settings.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    catalog: Catalog,
    settings: PlannerSettings,
}

impl Planner {
    pub fn new(catalog: Catalog, settings: PlannerSettings) -> Self {
        Self { catalog, settings }
    }

    /// Plan checklists for a project. Pure and deterministic apart from the
    /// freshly generated checklist ids.
    #[instrument(skip_all, fields(project_type = %input.project_type, templates = input.templates.len()))]
    pub fn plan(&self, input: &PlanInput<'_>) -> Vec<PlannedChecklist> {
        let mut plan = PlanBuilder::new(input, &self.settings);
        let flags = &input.context.flags;
        let project_type = input.project_type;

        // full-home projects get kitchen and bath templates per detected area instead
        let full_home = project_type == ProjectType::FullHomeRemodel;
        let per_area_kitchen =
            full_home && input.context.areas_of_type(AreaType::Kitchen).next().is_some();
        let per_area_bath =
            full_home && input.context.areas_of_type(AreaType::Bath).next().is_some();

        // kitchen
        if project_type == ProjectType::KitchenRemodel || flags.includes_kitchen {
            if !per_area_kitchen {
                for t in plan.tagged("kitchen", KITCHEN_PHASES) {
                    plan.add(t, &["kitchen"], None);
                }
            }
            if flags.has_structural {
                for t in plan.tagged("structural", ANY_PHASE) {
                    plan.add(t, &["kitchen", "structural"], None);
                }
            }
            if flags.includes_electrical_heavy {
                for t in plan.tagged("electrical", ANY_PHASE) {
                    plan.add(t, &["kitchen", "electrical"], None);
                }
            }
        }

        // bath
        if project_type == ProjectType::BathRemodel || flags.includes_bath {
            if !per_area_bath {
                for t in plan.tagged("bath", BATH_PHASES) {
                    plan.add(t, &["bath"], None);
                }
            }
            if flags.has_waterproofing_scope {
                for t in plan.tagged("waterproofing", ANY_PHASE) {
                    plan.add(t, &["bath", "waterproofing"], None);
                }
            }
            if flags.has_curbless_shower {
                let curbless = plan.tagged("curbless", ANY_PHASE);
                if curbless.is_empty() {
                    for t in plan.tagged("waterproofing", ANY_PHASE) {
                        plan.add_or_retag(t, &["bath", "curbless", "waterproofing"]);
                    }
                } else {
                    for t in curbless {
                        plan.add(t, &["bath", "curbless"], None);
                    }
                }
            }
            if flags.has_new_shower_pan || flags.has_curbless_shower {
                let plumbing = plan.tagged("plumbing", &[Phase::Rough]);
                let bath_plumbing: Vec<_> = plumbing
                    .iter()
                    .copied()
                    .filter(|t| t.has_tag("bath"))
                    .collect();
                let chosen = if bath_plumbing.is_empty() {
                    plumbing
                } else {
                    bath_plumbing
                };
                for t in chosen {
                    plan.add(t, &["bath", "plumbing"], None);
                }
            }
        }

        // full home, per detected area
        if full_home {
            for area in input.context.areas_of_type(AreaType::Kitchen) {
                for t in plan.tagged("kitchen", KITCHEN_PHASES) {
                    plan.add(t, &["full_home", "kitchen"], Some(area.label.as_str()));
                }
            }
            for area in input.context.areas_of_type(AreaType::Bath) {
                for t in plan.tagged("bath", BATH_PHASES) {
                    plan.add(t, &["full_home", "bath"], Some(area.label.as_str()));
                }
            }
            if let Some(t) = plan.general_precon() {
                plan.add(t, &["full_home", "general"], None);
            }
            if flags.has_structural {
                for t in plan.tagged("structural", ANY_PHASE) {
                    plan.add(t, &["full_home", "structural"], None);
                }
            }
            if flags.has_exterior_scope {
                for t in plan.tagged("exterior", ANY_PHASE) {
                    plan.add(t, &["full_home", "exterior"], None);
                }
            }
        }

        if flags.is_occupied_during_work {
            let mut occupied = plan.tagged("occupied", ANY_PHASE);
            if occupied.is_empty() {
                occupied = plan.named_any(OCCUPIED_NAME_FALLBACKS, ANY_PHASE);
            }
            for t in occupied {
                plan.add(t, &["occupied"], None);
            }
        }

        if let Some(t) = plan.walkthrough() {
            plan.add(t, &["walkthrough"], None);
        }

        if let Some(matrix) = input.area_trade_matrix {
            plan.add_area_trade_checklists(&self.catalog, matrix);
        }

        plan.finish()
    }
}

/// [`Planner::plan`] with the built-in catalog and default settings.
pub fn plan_checklists(input: &PlanInput<'_>) -> Vec<PlannedChecklist> {
    Planner::default().plan(input)
}

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

struct PlanBuilder<'a> {
    templates: &'a [ChecklistTemplateRef],
    project_type: ProjectType,
    risk_score: u8,
    settings: &'a PlannerSettings,
    planned: Vec<PlannedChecklist>,
    /// (template id, area key) -> index into `planned`
    template_keys: HashMap<(String, Option<String>), usize>,
    /// `area_key::phase`
    area_phase_keys: HashSet<String>,
}

impl<'a> PlanBuilder<'a> {
    fn new(input: &PlanInput<'a>, settings: &'a PlannerSettings) -> Self {
        Self {
            templates: input.templates,
            project_type: input.project_type,
            risk_score: input.context.risk_score,
            settings,
            planned: Vec::new(),
            template_keys: HashMap::new(),
            area_phase_keys: HashSet::new(),
        }
    }

    fn applicable(&self) -> impl Iterator<Item = &'a ChecklistTemplateRef> + use<'a> {
        let project_type = self.project_type;
        self.templates
            .iter()
            .filter(move |t| template_applies(t, project_type))
    }

    /// Applicable templates carrying `tag` whose phase is in `phases`.
    fn tagged(&self, tag: &str, phases: &[Phase]) -> Vec<&'a ChecklistTemplateRef> {
        self.applicable()
            .filter(|t| phases.contains(&t.phase) && t.has_tag(tag))
            .collect()
    }

    /// Applicable templates whose name contains any of `needles`.
    fn named_any(&self, needles: &[&str], phases: &[Phase]) -> Vec<&'a ChecklistTemplateRef> {
        self.applicable()
            .filter(|t| phases.contains(&t.phase) && needles.iter().any(|n| t.name_contains(n)))
            .collect()
    }

    fn general_precon(&self) -> Option<&'a ChecklistTemplateRef> {
        let precon = &[Phase::Precon];
        self.tagged("general", precon)
            .into_iter()
            .next()
            .or_else(|| self.named_any(GENERAL_NAME_FALLBACKS, precon).into_iter().next())
    }

    fn walkthrough(&self) -> Option<&'a ChecklistTemplateRef> {
        let punch = &[Phase::Punch];
        self.tagged("walkthrough", punch)
            .into_iter()
            .next()
            .or_else(|| self.named_any(WALKTHROUGH_NAME_FALLBACKS, punch).into_iter().next())
    }

    fn classify(&self, reason_tags: &[String]) -> RiskLevel {
        classify_risk(
            reason_tags,
            self.risk_score,
            self.settings.medium_risk_score_threshold,
        )
    }

    /// Add a template-based checklist unless the same template is already
    /// planned for the same area key. Returns the index of the checklist.
    fn add(
        &mut self,
        template: &ChecklistTemplateRef,
        reasons: &[&str],
        area_key: Option<&str>,
    ) -> usize {
        let key = (template.id.clone(), area_key.map(String::from));
        if let Some(&idx) = self.template_keys.get(&key) {
            return idx;
        }

        let reason_tags = merge_tags(Vec::new(), reasons.iter().copied());
        let title = match area_key {
            Some(area) => format!("{} - {}", template.name, area),
            None => template.name.clone(),
        };

        let idx = self.planned.len();
        self.planned.push(PlannedChecklist {
            id: PlannedChecklistId::new(),
            phase: template.phase,
            title,
            template_ids: vec![template.id.clone()],
            area_key: area_key.map(String::from),
            trades: None,
            risk_level: self.classify(&reason_tags),
            reason_tags,
            item_count: template.items.len(),
            enabled: self.settings.enabled_by_default,
            items: None,
        });
        self.template_keys.insert(key, idx);
        idx
    }

    /// Add a project-wide checklist, or extend the reason tags of the one
    /// already planned from the same template.
    fn add_or_retag(&mut self, template: &ChecklistTemplateRef, reasons: &[&str]) {
        let idx = self.add(template, reasons, None);
        let existing = std::mem::take(&mut self.planned[idx].reason_tags);
        let reason_tags = merge_tags(existing, reasons.iter().copied());
        self.planned[idx].risk_level = self.classify(&reason_tags);
        self.planned[idx].reason_tags = reason_tags;
    }

    /// One synthetic checklist per (area, phase) with catalog items.
    fn add_area_trade_checklists(&mut self, catalog: &Catalog, matrix: &AreaTradeMatrix) {
        for (area, trades) in matrix.entries() {
            if trades.is_empty() {
                continue;
            }
            let trades: Vec<TradeType> = trades.iter().copied().collect();
            let items =
                catalog.get_area_trade_checklist_items(area.area_type, &trades, Some(self.project_type));

            let mut by_phase: BTreeMap<u8, (Phase, Vec<&CatalogItem>)> = BTreeMap::new();
            for item in items {
                by_phase
                    .entry(item.phase.order())
                    .or_insert_with(|| (item.phase, Vec::new()))
                    .1
                    .push(item);
            }

            for (phase, items) in by_phase.into_values() {
                self.add_area_phase(&area.key, area.area_type, phase, &trades, &items);
            }
        }
    }

    fn add_area_phase(
        &mut self,
        area_key: &str,
        area_type: AreaType,
        phase: Phase,
        trades: &[TradeType],
        items: &[&CatalogItem],
    ) {
        if items.is_empty() || !self.area_phase_keys.insert(format!("{area_key}::{phase}")) {
            return;
        }

        let reason_tags = merge_tags(
            vec![area_type.as_str().to_string()],
            items.iter().flat_map(|item| item.tags.iter().copied()),
        );
        let risk_level = self.classify(&reason_tags);

        self.planned.push(PlannedChecklist {
            id: PlannedChecklistId::new(),
            phase,
            title: format!("{} {}", area_key, phase.label()),
            template_ids: Vec::new(),
            area_key: Some(area_key.to_string()),
            trades: Some(trades.to_vec()),
            reason_tags,
            risk_level,
            item_count: items.len(),
            enabled: self.settings.enabled_by_default,
            items: Some(items.iter().map(|item| item.to_planned()).collect()),
        });
    }

    fn finish(mut self) -> Vec<PlannedChecklist> {
        self.planned
            .sort_by_key(|c| (c.phase.order(), c.risk_level.rank()));
        debug!(
            checklists = self.planned.len(),
            synthetic = self.area_phase_keys.len(),
            "checklists planned"
        );
        self.planned
    }
}

/// Append `extra` tags to `tags`, skipping duplicates and keeping order.
fn merge_tags<'t>(mut tags: Vec<String>, extra: impl IntoIterator<Item = &'t str>) -> Vec<String> {
    for tag in extra {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::build_context;
    use crate::matrix::build_area_trade_matrix;
    use smartcheck_shared::{AnswerSet, AnswerValue, CostItem, QuestionCode, ScopeRecord, TemplateItemRef};

    fn make_template(
        id: &str,
        name: &str,
        phase: Phase,
        tags: &[&str],
        project_type: Option<ProjectType>,
    ) -> ChecklistTemplateRef {
        ChecklistTemplateRef {
            id: id.into(),
            name: name.into(),
            phase,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            project_type,
            items: vec![TemplateItemRef {
                code: None,
                text: format!("{name} item"),
            }],
        }
    }

    fn make_item(code: Option<&str>, name: Option<&str>) -> CostItem {
        CostItem {
            id: "c".into(),
            cost_code_code: code.map(String::from),
            cost_code_name: name.map(String::from),
            ..Default::default()
        }
    }

    fn make_record(id: &str, title: &str, cost_items: Vec<CostItem>) -> ScopeRecord {
        ScopeRecord {
            id: id.into(),
            title: title.into(),
            cost_items,
        }
    }

    fn standard_templates() -> Vec<ChecklistTemplateRef> {
        vec![
            make_template("gen", "General Kickoff", Phase::Precon, &["general"], None),
            make_template("k-pre", "Kitchen Precon", Phase::Precon, &["kitchen"], Some(ProjectType::KitchenRemodel)),
            make_template("k-rough", "Kitchen Rough", Phase::Rough, &["kitchen"], Some(ProjectType::KitchenRemodel)),
            make_template("k-punch", "Kitchen Punch", Phase::Punch, &["kitchen"], None),
            make_template("b-pre", "Bath Precon", Phase::Precon, &["bath"], Some(ProjectType::BathRemodel)),
            make_template("b-fin", "Bath Finish", Phase::Finish, &["bath"], Some(ProjectType::BathRemodel)),
            make_template("wp", "Shower Waterproofing", Phase::Rough, &["bath", "waterproofing"], None),
            make_template("plb", "Bath Plumbing Rough", Phase::Rough, &["bath", "plumbing"], None),
            make_template("str", "Structural Review", Phase::Rough, &["structural"], None),
            make_template("elec", "Electrical Service", Phase::Rough, &["electrical"], None),
            make_template("ext", "Exterior Envelope", Phase::Rough, &["exterior"], None),
            make_template("occ", "Occupied Home Daily Closeout", Phase::Rough, &[], None),
            make_template("walk", "Final Walkthrough", Phase::Punch, &["walkthrough"], None),
        ]
    }

    fn plan_for(
        project_type: ProjectType,
        records: &[ScopeRecord],
        answers: &AnswerSet,
        templates: &[ChecklistTemplateRef],
        with_matrix: bool,
    ) -> Vec<PlannedChecklist> {
        let context = build_context(project_type, records, answers);
        let matrix = build_area_trade_matrix(records);
        plan_checklists(&PlanInput {
            project_type,
            context: &context,
            templates,
            area_trade_matrix: with_matrix.then_some(&matrix),
        })
    }

    fn template_ids(plan: &[PlannedChecklist]) -> Vec<&str> {
        plan.iter().filter_map(|c| c.primary_template_id()).collect()
    }

    /// Plan with ids stripped, for equality checks.
    fn comparable(plan: &[PlannedChecklist]) -> serde_json::Value {
        let mut value = serde_json::to_value(plan).expect("serialize");
        for checklist in value.as_array_mut().expect("array") {
            checklist.as_object_mut().expect("object").remove("id");
        }
        value
    }

    #[test]
    fn classify_risk_levels() {
        assert_eq!(classify_risk(&["bath", "curbless"], 10, 60), RiskLevel::High);
        assert_eq!(classify_risk(&["occupied"], 10, 60), RiskLevel::Medium);
        assert_eq!(classify_risk(&["kitchen"], 60, 60), RiskLevel::Medium);
        assert_eq!(classify_risk(&["kitchen"], 59, 60), RiskLevel::Low);
        assert_eq!(classify_risk::<&str>(&[], 10, 60), RiskLevel::Low);
    }

    #[test]
    fn empty_project_plans_only_the_walkthrough() {
        let plan = plan_for(ProjectType::Other, &[], &AnswerSet::new(), &standard_templates(), true);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].primary_template_id(), Some("walk"));
        assert_eq!(plan[0].phase, Phase::Punch);
        assert_eq!(plan[0].risk_level, RiskLevel::Low);
        assert!(plan[0].enabled);
    }

    #[test]
    fn walkthrough_falls_back_to_name() {
        let templates = vec![make_template("fw", "Final Walk-Through", Phase::Punch, &[], None)];
        let plan = plan_for(ProjectType::Other, &[], &AnswerSet::new(), &templates, false);
        assert_eq!(template_ids(&plan), vec!["fw"]);

        let none = plan_for(ProjectType::Other, &[], &AnswerSet::new(), &[], false);
        assert!(none.is_empty());
    }

    #[test]
    fn kitchen_rule_adds_phase_limited_templates() {
        let records = vec![make_record("s1", "Kitchen", vec![make_item(Some("ELEC-20"), Some("Panel upgrade"))])];
        let answers = AnswerSet::new().with(QuestionCode::StructuralChanges, AnswerValue::Bool(true));
        let plan = plan_for(ProjectType::KitchenRemodel, &records, &answers, &standard_templates(), false);
        let ids = template_ids(&plan);

        assert!(ids.contains(&"k-pre"));
        assert!(ids.contains(&"k-rough"));
        // punch-phase kitchen templates are not part of the kitchen rule
        assert!(!ids.contains(&"k-punch"));
        assert!(ids.contains(&"str"));
        assert!(ids.contains(&"elec"));
        // bath templates restricted to bath remodels do not apply
        assert!(!ids.contains(&"b-pre"));

        let structural = plan.iter().find(|c| c.primary_template_id() == Some("str")).expect("structural");
        assert_eq!(structural.risk_level, RiskLevel::High);
        assert_eq!(structural.reason_tags, vec!["kitchen", "structural"]);
    }

    #[test]
    fn curbless_bath_scenario_retags_waterproofing_template() {
        let records = vec![make_record("s1", "Primary Bath", vec![make_item(None, Some("linear drain"))])];
        let answers = AnswerSet::new().with(
            QuestionCode::WaterproofingLevel,
            AnswerValue::Text("curbless / linear drain".into()),
        );
        let plan = plan_for(ProjectType::BathRemodel, &records, &answers, &standard_templates(), false);

        let curbless: Vec<_> = plan.iter().filter(|c| c.has_reason("curbless")).collect();
        assert_eq!(curbless.len(), 1);
        assert_eq!(curbless[0].primary_template_id(), Some("wp"));
        assert_eq!(curbless[0].reason_tags, vec!["bath", "waterproofing", "curbless"]);
        assert_eq!(curbless[0].risk_level, RiskLevel::High);

        // no duplicate waterproofing checklist
        assert_eq!(template_ids(&plan).iter().filter(|id| **id == "wp").count(), 1);
        // curbless pulls in rough plumbing
        assert!(template_ids(&plan).contains(&"plb"));
    }

    #[test]
    fn curbless_specific_templates_win_over_fallback() {
        let mut templates = standard_templates();
        templates.push(make_template("crb", "Curbless Pan", Phase::Rough, &["curbless"], None));
        let answers = AnswerSet::new().with(
            QuestionCode::ShowerType,
            AnswerValue::Text("Curbless".into()),
        );
        let plan = plan_for(ProjectType::BathRemodel, &[], &answers, &templates, false);

        let crb = plan.iter().find(|c| c.primary_template_id() == Some("crb")).expect("curbless template");
        assert_eq!(crb.reason_tags, vec!["bath", "curbless"]);
        let wp = plan.iter().find(|c| c.primary_template_id() == Some("wp")).expect("waterproofing");
        assert!(!wp.has_reason("curbless"));
    }

    #[test]
    fn occupied_rule_falls_back_to_name_search() {
        let answers = AnswerSet::new().with(QuestionCode::OccupiedDuringWork, AnswerValue::Bool(true));
        let plan = plan_for(ProjectType::Other, &[], &answers, &standard_templates(), false);
        let occupied = plan.iter().find(|c| c.primary_template_id() == Some("occ")).expect("occupied");
        assert_eq!(occupied.reason_tags, vec!["occupied"]);
        assert_eq!(occupied.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn full_home_adds_per_area_templates() {
        let records = vec![
            make_record("s1", "Kitchen", vec![]),
            make_record("s2", "Primary Bath", vec![]),
            make_record("s3", "Hall Bath", vec![]),
        ];
        let plan = plan_for(ProjectType::FullHomeRemodel, &records, &AnswerSet::new(), &standard_templates(), false);

        let bath_finish_areas: Vec<_> = plan
            .iter()
            .filter(|c| c.primary_template_id() == Some("b-fin"))
            .map(|c| c.area_key.as_deref())
            .collect();
        // per bath area only, no project-wide copy
        assert_eq!(bath_finish_areas, vec![Some("Primary Bath"), Some("Hall Bath")]);
        assert!(
            plan.iter()
                .filter(|c| c.primary_template_id() == Some("k-pre"))
                .all(|c| c.area_key.is_some())
        );

        let per_area = plan
            .iter()
            .find(|c| c.area_key.as_deref() == Some("Kitchen") && c.primary_template_id() == Some("k-pre"))
            .expect("per-area kitchen precon");
        assert_eq!(per_area.title, "Kitchen Precon - Kitchen");

        assert_eq!(template_ids(&plan).iter().filter(|id| **id == "gen").count(), 1);
        // risk score 20, no risky tags
        assert!(plan.iter().all(|c| c.risk_level == RiskLevel::Low));
    }

    #[test]
    fn full_home_adds_structural_and_exterior_templates() {
        let records = vec![make_record("s1", "Living Room", vec![make_item(None, Some("Structural beam"))])];
        let answers = AnswerSet::new().with(QuestionCode::ExteriorWork, AnswerValue::Bool(true));
        let plan = plan_for(ProjectType::FullHomeRemodel, &records, &answers, &standard_templates(), false);

        let structural = plan.iter().find(|c| c.primary_template_id() == Some("str")).expect("structural");
        assert_eq!(structural.reason_tags, vec!["full_home", "structural"]);
        assert_eq!(structural.risk_level, RiskLevel::High);
        assert_eq!(structural.area_key, None);

        let exterior = plan.iter().find(|c| c.primary_template_id() == Some("ext")).expect("exterior");
        assert_eq!(exterior.reason_tags, vec!["full_home", "exterior"]);
        assert!(template_ids(&plan).contains(&"gen"));

        // neither flag set: no structural or exterior checklist
        let plain = plan_for(
            ProjectType::FullHomeRemodel,
            &[make_record("s1", "Living Room", vec![])],
            &AnswerSet::new(),
            &standard_templates(),
            false,
        );
        let ids = template_ids(&plain);
        assert!(!ids.contains(&"str"));
        assert!(!ids.contains(&"ext"));
    }

    #[test]
    fn template_ids_are_unique_per_area_key() {
        let records = vec![
            make_record("s1", "Kitchen", vec![make_item(None, Some("Structural beam"))]),
            make_record("s2", "Primary Bath", vec![make_item(None, Some("Shower pan"))]),
        ];
        let answers = AnswerSet::new()
            .with(QuestionCode::OccupiedDuringWork, AnswerValue::Bool(true))
            .with(QuestionCode::ExteriorWork, AnswerValue::Bool(true));
        let plan = plan_for(ProjectType::FullHomeRemodel, &records, &answers, &standard_templates(), true);

        let mut seen = HashSet::new();
        for checklist in &plan {
            if let Some(id) = checklist.primary_template_id() {
                assert!(
                    seen.insert((id.to_string(), checklist.area_key.clone())),
                    "duplicate {id} for {:?}",
                    checklist.area_key
                );
            }
        }
    }

    #[test]
    fn matrix_checklists_are_grouped_by_area_and_phase() {
        let records = vec![make_record(
            "s1",
            "Kitchen Demo",
            vec![make_item(Some("DEMO-01"), None)],
        )];
        let plan = plan_for(ProjectType::KitchenRemodel, &records, &AnswerSet::new(), &[], true);

        let synthetic: Vec<_> = plan.iter().filter(|c| c.template_ids.is_empty()).collect();
        assert!(!synthetic.is_empty());

        let mut keys = HashSet::new();
        for checklist in &synthetic {
            assert_eq!(checklist.area_key.as_deref(), Some("Kitchen Demo"));
            assert_eq!(checklist.trades.as_deref(), Some(&[TradeType::Demo][..]));
            assert!(checklist.has_reason("kitchen"));
            let items = checklist.items.as_ref().expect("items");
            assert_eq!(items.len(), checklist.item_count);
            assert!(items.iter().all(|item| item.phase == checklist.phase));
            assert!(keys.insert(checklist.phase), "phase repeated");
        }
    }

    #[test]
    fn matrix_checklist_risk_comes_from_reason_tags() {
        let records = vec![make_record(
            "s1",
            "Kitchen Demo",
            vec![make_item(Some("DEMO-01"), None)],
        )];
        let plan = plan_for(ProjectType::KitchenRemodel, &records, &AnswerSet::new(), &[], true);

        let precon = plan
            .iter()
            .find(|c| c.template_ids.is_empty() && c.phase == Phase::Precon)
            .expect("precon checklist");
        assert_eq!(precon.reason_tags, vec!["kitchen", "protection", "safety"]);
        // a medium-risk item stays on the item; the checklist follows its tags
        let items = precon.items.as_ref().expect("items");
        assert!(items.iter().any(|item| item.risk_level == Some(RiskLevel::Medium)));
        assert_eq!(precon.risk_level, RiskLevel::Low);
    }

    #[test]
    fn matrix_is_ignored_when_not_supplied() {
        let records = vec![make_record("s1", "Kitchen Demo", vec![make_item(Some("DEMO-01"), None)])];
        let plan = plan_for(ProjectType::KitchenRemodel, &records, &AnswerSet::new(), &[], false);
        assert!(plan.is_empty());
    }

    #[test]
    fn output_is_sorted_by_phase_then_risk() {
        let records = vec![
            make_record("s1", "Kitchen", vec![make_item(None, Some("LVL beam")), make_item(None, Some("Panel"))]),
            make_record("s2", "Primary Bath", vec![make_item(None, Some("Curbless linear drain"))]),
        ];
        let answers = AnswerSet::new().with(QuestionCode::OccupiedDuringWork, AnswerValue::Bool(true));
        let plan = plan_for(ProjectType::FullHomeRemodel, &records, &answers, &standard_templates(), true);

        assert!(plan.len() > 5);
        for pair in plan.windows(2) {
            let a = (pair[0].phase.order(), pair[0].risk_level.rank());
            let b = (pair[1].phase.order(), pair[1].risk_level.rank());
            assert!(a <= b, "{:?} before {:?}", pair[0].title, pair[1].title);
        }
    }

    #[test]
    fn planning_is_idempotent() {
        let records = vec![
            make_record("s1", "Kitchen", vec![make_item(Some("CAB-10"), Some("Cabinets"))]),
            make_record("s2", "Primary Bath", vec![make_item(Some("WP-01"), Some("Linear drain"))]),
        ];
        let answers = AnswerSet::new().with(QuestionCode::OccupiedDuringWork, AnswerValue::Bool(true));
        let templates = standard_templates();

        let first = plan_for(ProjectType::FullHomeRemodel, &records, &answers, &templates, true);
        let second = plan_for(ProjectType::FullHomeRemodel, &records, &answers, &templates, true);
        assert_eq!(comparable(&first), comparable(&second));
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn settings_control_threshold_and_enabled() {
        let context = build_context(ProjectType::Other, &[], &AnswerSet::new());
        let templates = standard_templates();
        let planner = Planner::new(
            Catalog::builtin(),
            PlannerSettings {
                medium_risk_score_threshold: 10,
                include_area_trade_checklists: true,
                enabled_by_default: false,
            },
        );
        let plan = planner.plan(&PlanInput {
            project_type: ProjectType::Other,
            context: &context,
            templates: &templates,
            area_trade_matrix: None,
        });
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].risk_level, RiskLevel::Medium);
        assert!(!plan[0].enabled);
    }

    #[test]
    fn template_applicability() {
        let kitchen = make_template("k", "K", Phase::Precon, &[], Some(ProjectType::KitchenRemodel));
        assert!(template_applies(&kitchen, ProjectType::KitchenRemodel));
        assert!(template_applies(&kitchen, ProjectType::FullHomeRemodel));
        assert!(!template_applies(&kitchen, ProjectType::BathRemodel));

        let addition = make_template("a", "A", Phase::Precon, &[], Some(ProjectType::Addition));
        assert!(!template_applies(&addition, ProjectType::FullHomeRemodel));

        let any = make_template("x", "X", Phase::Precon, &[], None);
        assert!(template_applies(&any, ProjectType::Exterior));
    }
}
