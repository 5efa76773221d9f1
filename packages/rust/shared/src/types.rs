//! Core domain types for SmartCheck.
//!
//! Inputs ([`ScopeRecord`], [`CostItem`], [`ChecklistTemplateRef`]) are owned by
//! external subsystems and only read here. [`PlannedChecklist`] is the output
//! handed back to callers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answers::normalize_code;

// ---------------------------------------------------------------------------
// ProjectType
// ---------------------------------------------------------------------------

/// Kind of construction project the estimate belongs to.
///
/// Deserialization is lenient: unknown or oddly formatted values become
/// [`ProjectType::Other`] instead of failing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum ProjectType {
    KitchenRemodel,
    BathRemodel,
    FullHomeRemodel,
    Addition,
    BasementFinish,
    Exterior,
    #[default]
    Other,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KitchenRemodel => "kitchen_remodel",
            Self::BathRemodel => "bath_remodel",
            Self::FullHomeRemodel => "full_home_remodel",
            Self::Addition => "addition",
            Self::BasementFinish => "basement_finish",
            Self::Exterior => "exterior",
            Self::Other => "other",
        }
    }

    /// Parse a project type from free-form text (`"Bath Remodel"`, `"bath-remodel"`, ...).
    pub fn parse(raw: &str) -> Self {
        match normalize_code(raw).as_str() {
            "kitchen_remodel" | "kitchen" => Self::KitchenRemodel,
            "bath_remodel" | "bathroom_remodel" | "bath" => Self::BathRemodel,
            "full_home_remodel" | "whole_home_remodel" | "full_remodel" => Self::FullHomeRemodel,
            "addition" => Self::Addition,
            "basement_finish" | "basement" => Self::BasementFinish,
            "exterior" => Self::Exterior,
            _ => Self::Other,
        }
    }

    /// Project types whose scope spans the whole structure.
    pub fn is_full_scope(&self) -> bool {
        matches!(self, Self::FullHomeRemodel | Self::Addition)
    }
}

impl From<String> for ProjectType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AreaType / TradeType
// ---------------------------------------------------------------------------

/// Physical area classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaType {
    Kitchen,
    Bath,
    Bedroom,
    Living,
    Hall,
    Exterior,
    Other,
}

impl AreaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Bath => "bath",
            Self::Bedroom => "bedroom",
            Self::Living => "living",
            Self::Hall => "hall",
            Self::Exterior => "exterior",
            Self::Other => "other",
        }
    }

    /// Every area type, in classification order.
    pub const ALL: [AreaType; 7] = [
        Self::Kitchen,
        Self::Bath,
        Self::Bedroom,
        Self::Living,
        Self::Hall,
        Self::Exterior,
        Self::Other,
    ];
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AreaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code = normalize_code(s);
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == code)
            .ok_or_else(|| format!("unknown area type '{s}'"))
    }
}

/// Category of construction work.
///
/// Declaration order is the trade classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    Demo,
    Waterproofing,
    Framing,
    Plumbing,
    Electrical,
    Hvac,
    Insulation,
    Drywall,
    Tile,
    Cabinetry,
    Countertops,
    Flooring,
    Painting,
    FinishCarpentry,
    Roofing,
    Exterior,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Waterproofing => "waterproofing",
            Self::Framing => "framing",
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
            Self::Hvac => "hvac",
            Self::Insulation => "insulation",
            Self::Drywall => "drywall",
            Self::Tile => "tile",
            Self::Cabinetry => "cabinetry",
            Self::Countertops => "countertops",
            Self::Flooring => "flooring",
            Self::Painting => "painting",
            Self::FinishCarpentry => "finish_carpentry",
            Self::Roofing => "roofing",
            Self::Exterior => "exterior",
        }
    }

    pub const ALL: [TradeType; 16] = [
        Self::Demo,
        Self::Waterproofing,
        Self::Framing,
        Self::Plumbing,
        Self::Electrical,
        Self::Hvac,
        Self::Insulation,
        Self::Drywall,
        Self::Tile,
        Self::Cabinetry,
        Self::Countertops,
        Self::Flooring,
        Self::Painting,
        Self::FinishCarpentry,
        Self::Roofing,
        Self::Exterior,
    ];
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TradeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let code = normalize_code(s);
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == code)
            .ok_or_else(|| format!("unknown trade '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Phase / RiskLevel / AssigneeRole
// ---------------------------------------------------------------------------

/// Construction phase a checklist belongs to. `Ord` follows [`Phase::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[serde(alias = "preconstruction", alias = "pre_construction")]
    Precon,
    Rough,
    Finish,
    Punch,
    Warranty,
}

impl Phase {
    /// Position in the fixed phase order (precon=0 .. warranty=4).
    pub fn order(&self) -> u8 {
        match self {
            Self::Precon => 0,
            Self::Rough => 1,
            Self::Finish => 2,
            Self::Punch => 3,
            Self::Warranty => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precon => "precon",
            Self::Rough => "rough",
            Self::Finish => "finish",
            Self::Punch => "punch",
            Self::Warranty => "warranty",
        }
    }

    /// Human-readable label used in generated titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Precon => "Pre-Construction",
            Self::Rough => "Rough-In",
            Self::Finish => "Finish",
            Self::Punch => "Punch",
            Self::Warranty => "Warranty",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk classification of a planned checklist or catalog item.
///
/// Declared high-first so the derived `Ord` sorts the riskiest entries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Sort rank within a phase (high=0, medium=1, low=2).
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a checklist item is assigned to by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeRole {
    ProjectManager,
    Superintendent,
    LeadCarpenter,
    Subcontractor,
    Inspector,
}

// ---------------------------------------------------------------------------
// Scope inputs
// ---------------------------------------------------------------------------

/// A priced line item referencing a cost code.
///
/// Every field except `id` is optional; absent fields mean "no signal".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostItem {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_code_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_code_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_code_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_code_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
}

impl CostItem {
    /// Lower-cased cost-code text (name, code, category) used for keyword matching.
    pub fn code_text(&self) -> String {
        [
            self.cost_code_name.as_deref(),
            self.cost_code_code.as_deref(),
            self.cost_code_category.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }

    /// Trimmed, non-empty area label.
    pub fn area(&self) -> Option<&str> {
        self.area_label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One titled section of an accepted cost estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub cost_items: Vec<CostItem>,
}

// ---------------------------------------------------------------------------
// External template catalog
// ---------------------------------------------------------------------------

/// One item of an externally authored template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateItemRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub text: String,
}

/// Externally owned checklist template definition. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTemplateRef {
    pub id: String,
    pub name: String,
    pub phase: Phase,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default)]
    pub items: Vec<TemplateItemRef>,
}

impl ChecklistTemplateRef {
    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.trim().eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive substring match on the template name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

// ---------------------------------------------------------------------------
// PlannedChecklist
// ---------------------------------------------------------------------------

/// Ephemeral identifier of a planned checklist (UUID v7).
///
/// Fresh on every planning call; only meaningful until the caller commits
/// the selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlannedChecklistId(pub Uuid);

impl PlannedChecklistId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for PlannedChecklistId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlannedChecklistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete checklist item carried by area/trade checklists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedItem {
    pub code: String,
    pub text: String,
    pub phase: Phase,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_assignee_role: Option<AssigneeRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

/// A recommended, not-yet-persisted checklist bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedChecklist {
    pub id: PlannedChecklistId,
    pub phase: Phase,
    pub title: String,
    /// Source template ids; empty for checklists synthesized from the area/trade catalog.
    pub template_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trades: Option<Vec<TradeType>>,
    pub reason_tags: Vec<String>,
    pub risk_level: RiskLevel,
    pub item_count: usize,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PlannedItem>>,
}

impl PlannedChecklist {
    /// Caller-driven selection toggle. The only mutation after planning.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn has_reason(&self, tag: &str) -> bool {
        self.reason_tags.iter().any(|t| t == tag)
    }

    /// First source template id, if any.
    pub fn primary_template_id(&self) -> Option<&str> {
        self.template_ids.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_type_parses_leniently() {
        assert_eq!(ProjectType::parse("bath_remodel"), ProjectType::BathRemodel);
        assert_eq!(ProjectType::parse("Bath Remodel"), ProjectType::BathRemodel);
        assert_eq!(ProjectType::parse("kitchen-remodel"), ProjectType::KitchenRemodel);
        assert_eq!(ProjectType::parse("FULL_HOME_REMODEL"), ProjectType::FullHomeRemodel);
        assert_eq!(ProjectType::parse("pool"), ProjectType::Other);
        assert_eq!(ProjectType::parse(""), ProjectType::Other);
    }

    #[test]
    fn project_type_deserializes_unknown_as_other() {
        let pt: ProjectType = serde_json::from_str("\"treehouse\"").expect("deserialize");
        assert_eq!(pt, ProjectType::Other);
        let pt: ProjectType = serde_json::from_str("\"Kitchen Remodel\"").expect("deserialize");
        assert_eq!(pt, ProjectType::KitchenRemodel);
        assert_eq!(
            serde_json::to_string(&ProjectType::FullHomeRemodel).expect("serialize"),
            "\"full_home_remodel\""
        );
    }

    #[test]
    fn phase_order_matches_ord() {
        let mut phases = vec![Phase::Warranty, Phase::Rough, Phase::Punch, Phase::Precon, Phase::Finish];
        phases.sort();
        let orders: Vec<u8> = phases.iter().map(Phase::order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn phase_accepts_preconstruction_alias() {
        let phase: Phase = serde_json::from_str("\"preconstruction\"").expect("deserialize");
        assert_eq!(phase, Phase::Precon);
    }

    #[test]
    fn risk_level_sorts_high_first() {
        let mut levels = vec![RiskLevel::Low, RiskLevel::High, RiskLevel::Medium];
        levels.sort();
        assert_eq!(levels, vec![RiskLevel::High, RiskLevel::Medium, RiskLevel::Low]);
        assert_eq!(RiskLevel::Medium.rank(), 1);
    }

    #[test]
    fn cost_item_code_text_joins_and_lowercases() {
        let item = CostItem {
            id: "ci-1".into(),
            cost_code_code: Some("DEMO-01".into()),
            cost_code_name: Some("Selective Demolition".into()),
            cost_code_category: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(item.code_text(), "selective demolition demo-01");
    }

    #[test]
    fn cost_item_area_ignores_blank_labels() {
        let mut item = CostItem::default();
        assert_eq!(item.area(), None);
        item.area_label = Some("   ".into());
        assert_eq!(item.area(), None);
        item.area_label = Some(" Hall Bath ".into());
        assert_eq!(item.area(), Some("Hall Bath"));
    }

    #[test]
    fn sparse_scope_record_deserializes() {
        let json = r#"{"id": "s1", "cost_items": [{"id": "c1"}]}"#;
        let record: ScopeRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.title, "");
        assert_eq!(record.cost_items.len(), 1);
        assert!(record.cost_items[0].cost_code_name.is_none());
    }

    #[test]
    fn template_tag_and_name_matching() {
        let template = ChecklistTemplateRef {
            id: "t1".into(),
            name: "Occupied Home Daily Closeout".into(),
            phase: Phase::Rough,
            tags: vec!["Occupied".into()],
            project_type: None,
            items: vec![],
        };
        assert!(template.has_tag("occupied"));
        assert!(!template.has_tag("bath"));
        assert!(template.name_contains("daily closeout"));
    }

    #[test]
    fn area_and_trade_from_str() {
        assert_eq!("Bath".parse::<AreaType>(), Ok(AreaType::Bath));
        assert_eq!("finish carpentry".parse::<TradeType>(), Ok(TradeType::FinishCarpentry));
        assert!("garage".parse::<AreaType>().is_err());
    }

    #[test]
    fn templates_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/templates.fixture.json")
            .expect("read fixture");
        let parsed: Vec<ChecklistTemplateRef> =
            serde_json::from_str(&fixture).expect("deserialize fixture templates");
        assert!(parsed.iter().any(|t| t.phase == Phase::Punch));
        assert!(parsed.iter().any(|t| t.has_tag("waterproofing")));
    }

    #[test]
    fn scope_fixture_validates() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/scope.fixture.json")
            .expect("read fixture");
        let parsed: Vec<ScopeRecord> =
            serde_json::from_str(&fixture).expect("deserialize fixture scope");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].title, "Kitchen");
    }
}
