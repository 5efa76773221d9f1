//! Checklist context builder.
//!
//! Derives boolean scope signals, detected areas, and a risk score from
//! estimate scope records plus validated answers. Every flag is an OR over
//! independent sources (answers, cost-code text, scope titles), so adding
//! scope data can only turn a flag on.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use smartcheck_catalog::classify_area;
use smartcheck_shared::{
    AnswerSet, AreaType, ProjectType, QuestionCode, ScopeRecord, normalize_code,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Scope signals derived once per context build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFlags {
    pub has_structural: bool,
    pub has_waterproofing_scope: bool,
    pub has_curbless_shower: bool,
    pub has_new_shower_pan: bool,
    pub has_steam_shower: bool,
    pub is_occupied_during_work: bool,
    pub includes_electrical_heavy: bool,
    pub includes_kitchen: bool,
    pub includes_bath: bool,
    pub includes_hvac: bool,
    pub has_exterior_scope: bool,
    pub relocates_plumbing: bool,
    pub requires_permit: bool,
}

impl DerivedFlags {
    /// Names of the flags that are set, in declaration order.
    pub fn active(&self) -> Vec<&'static str> {
        [
            ("has_structural", self.has_structural),
            ("has_waterproofing_scope", self.has_waterproofing_scope),
            ("has_curbless_shower", self.has_curbless_shower),
            ("has_new_shower_pan", self.has_new_shower_pan),
            ("has_steam_shower", self.has_steam_shower),
            ("is_occupied_during_work", self.is_occupied_during_work),
            ("includes_electrical_heavy", self.includes_electrical_heavy),
            ("includes_kitchen", self.includes_kitchen),
            ("includes_bath", self.includes_bath),
            ("includes_hvac", self.includes_hvac),
            ("has_exterior_scope", self.has_exterior_scope),
            ("relocates_plumbing", self.relocates_plumbing),
            ("requires_permit", self.requires_permit),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

/// A physical area referenced by a scope title or item label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedArea {
    pub label: String,
    #[serde(rename = "type")]
    pub area_type: AreaType,
    pub source_scope_id: String,
}

/// Summary risk signals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFlags {
    pub structural_risk: bool,
    pub waterproofing_risk: bool,
    pub inspection_heavy: bool,
    pub schedule_complex: bool,
}

/// Everything the planner needs to know about a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistContext {
    pub project_type: ProjectType,
    pub flags: DerivedFlags,
    pub detected_areas: Vec<DetectedArea>,
    /// Additive risk score, clamped to `0..=100`.
    pub risk_score: u8,
    pub risk_flags: RiskFlags,
}

impl ChecklistContext {
    pub fn areas_of_type(&self, area_type: AreaType) -> impl Iterator<Item = &DetectedArea> {
        self.detected_areas
            .iter()
            .filter(move |a| a.area_type == area_type)
    }
}

// ---------------------------------------------------------------------------
// Keyword lists
// ---------------------------------------------------------------------------

const STRUCTURAL_CODES: &[&str] = &[
    "structural", "beam", "header", "load bearing", "load-bearing", "joist", "footing",
    "foundation", "shoring", "lvl",
];
const STRUCTURAL_TITLES: &[&str] = &["structural", "addition", "wall removal", "load bearing"];

const WATERPROOFING_CODES: &[&str] = &[
    "waterproof", "membrane", "shower pan", "linear drain", "curbless", "kerdi", "hot mop",
    "flood test",
];
const WATERPROOFING_TITLES: &[&str] = &["shower", "wet room"];

const CURBLESS_CODES: &[&str] = &[
    "curbless", "linear drain", "zero entry", "zero-entry", "barrier free", "barrier-free",
];
const CURBLESS_TITLES: &[&str] = &["curbless", "zero entry", "barrier free"];

const SHOWER_PAN_CODES: &[&str] = &[
    "shower pan", "mortar bed", "shower base", "hot mop", "shower receptor",
];

const STEAM_CODES: &[&str] = &["steam"];

const ELECTRICAL_HEAVY_CODES: &[&str] = &[
    "panel", "service upgrade", "subpanel", "sub-panel", "200a", "400a", "rewire", "meter base",
];

const OCCUPIED_CODES: &[&str] = &["occupied", "temporary kitchen", "dust protection", "daily cleanup"];
const OCCUPIED_TITLES: &[&str] = &["occupied"];

const KITCHEN_CODES: &[&str] = &["kitchen", "range hood", "dishwasher"];
const KITCHEN_TITLES: &[&str] = &["kitchen"];

const BATH_CODES: &[&str] = &["bath", "vanity", "toilet", "shower", "bathtub"];
const BATH_TITLES: &[&str] = &["bath", "shower", "powder"];

const HVAC_CODES: &[&str] = &["hvac", "duct", "furnace", "heat pump", "mini split", "air handler"];
const HVAC_TITLES: &[&str] = &["hvac", "mechanical"];

const EXTERIOR_CODES: &[&str] = &["siding", "roof", "exterior", "deck", "window", "stucco", "gutter"];
const EXTERIOR_TITLES: &[&str] = &["exterior", "deck", "roof", "siding", "porch"];

const RELOCATION_CODES: &[&str] = &["relocate", "reroute", "move drain"];

const PERMIT_CODES: &[&str] = &["permit", "inspection fee"];
const PERMIT_TITLES: &[&str] = &["permit"];

/// Waterproofing answers that mean "no waterproofing work".
const NO_WATERPROOFING_ANSWERS: &[&str] = &["", "none", "no", "n_a", "not_applicable"];

// ---------------------------------------------------------------------------
// Risk weights
// ---------------------------------------------------------------------------

const BASE_RISK: u32 = 10;
const STRUCTURAL_WEIGHT: u32 = 20;
const WATERPROOFING_WEIGHT: u32 = 20;
const OCCUPIED_WEIGHT: u32 = 15;
const ELECTRICAL_HEAVY_WEIGHT: u32 = 10;
const FULL_SCOPE_WEIGHT: u32 = 10;
const CURBLESS_WEIGHT: u32 = 10;
const STEAM_WEIGHT: u32 = 5;
const MAX_RISK: u32 = 100;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Lower-cased text views over the scope data, computed once per build.
struct Signals<'a> {
    code_texts: Vec<String>,
    titles: Vec<String>,
    answers: &'a AnswerSet,
}

impl<'a> Signals<'a> {
    fn new(scope_records: &[ScopeRecord], answers: &'a AnswerSet) -> Self {
        let code_texts = scope_records
            .iter()
            .flat_map(|r| r.cost_items.iter())
            .map(|item| item.code_text())
            .filter(|text| !text.is_empty())
            .collect();
        let titles = scope_records
            .iter()
            .map(|r| r.title.trim().to_lowercase())
            .filter(|title| !title.is_empty())
            .collect();
        Self {
            code_texts,
            titles,
            answers,
        }
    }

    fn any_code(&self, patterns: &[&str]) -> bool {
        contains_any(&self.code_texts, patterns)
    }

    fn any_title(&self, patterns: &[&str]) -> bool {
        contains_any(&self.titles, patterns)
    }

    fn answer_mentions(&self, code: QuestionCode, needles: &[&str]) -> bool {
        needles
            .iter()
            .any(|needle| self.answers.contains_text(code, needle))
    }
}

fn contains_any(haystacks: &[String], patterns: &[&str]) -> bool {
    haystacks
        .iter()
        .any(|text| patterns.iter().any(|p| text.contains(p)))
}

/// Build the checklist context for a project. Total: sparse or empty input
/// yields all-false flags, no areas, and the base risk score.
#[instrument(skip_all, fields(%project_type, records = scope_records.len(), answers = answers.len()))]
pub fn build_context(
    project_type: ProjectType,
    scope_records: &[ScopeRecord],
    answers: &AnswerSet,
) -> ChecklistContext {
    let signals = Signals::new(scope_records, answers);
    let flags = derive_flags(&signals);
    let detected_areas = detect_areas(scope_records);
    let risk_score = risk_score(&flags, project_type);
    let risk_flags = risk_flags(&flags, project_type);

    debug!(
        flags = ?flags.active(),
        areas = detected_areas.len(),
        risk_score,
        "checklist context built"
    );

    ChecklistContext {
        project_type,
        flags,
        detected_areas,
        risk_score,
        risk_flags,
    }
}

fn derive_flags(s: &Signals<'_>) -> DerivedFlags {
    use QuestionCode as Q;

    let has_curbless_shower = s.answer_mentions(Q::WaterproofingLevel, &["curbless", "linear drain"])
        || s.answer_mentions(Q::ShowerType, &["curbless", "zero entry"])
        || s.any_code(CURBLESS_CODES)
        || s.any_title(CURBLESS_TITLES);

    let has_new_shower_pan = s.answer_mentions(Q::ShowerType, &["pan", "mortar", "tile shower"])
        || s.any_code(SHOWER_PAN_CODES);

    let has_steam_shower = s.answers.flag(Q::SteamShower)
        || s.answer_mentions(Q::ShowerType, &["steam"])
        || s.any_code(STEAM_CODES)
        || s.any_title(STEAM_CODES);

    let waterproofing_answered = s
        .answers
        .text(Q::WaterproofingLevel)
        .is_some_and(|level| !NO_WATERPROOFING_ANSWERS.contains(&normalize_code(level).as_str()));

    let has_waterproofing_scope = waterproofing_answered
        || s.any_code(WATERPROOFING_CODES)
        || s.any_title(WATERPROOFING_TITLES)
        || has_curbless_shower
        || has_steam_shower;

    DerivedFlags {
        has_structural: s.answers.flag(Q::StructuralChanges)
            || s.any_code(STRUCTURAL_CODES)
            || s.any_title(STRUCTURAL_TITLES),
        has_waterproofing_scope,
        has_curbless_shower,
        has_new_shower_pan,
        has_steam_shower,
        is_occupied_during_work: s.answers.flag(Q::OccupiedDuringWork)
            || s.any_code(OCCUPIED_CODES)
            || s.any_title(OCCUPIED_TITLES),
        includes_electrical_heavy: s.answers.flag(Q::PanelUpgrade)
            || s.answer_mentions(Q::ElectricalScope, &["panel", "service", "heavy", "rewire"])
            || s.any_code(ELECTRICAL_HEAVY_CODES),
        includes_kitchen: s.answer_mentions(Q::RoomsInScope, &["kitchen"])
            || s.any_code(KITCHEN_CODES)
            || s.any_title(KITCHEN_TITLES),
        includes_bath: s.answer_mentions(Q::RoomsInScope, &["bath", "powder"])
            || s.any_code(BATH_CODES)
            || s.any_title(BATH_TITLES),
        includes_hvac: s.answers.flag(Q::HvacChanges)
            || s.any_code(HVAC_CODES)
            || s.any_title(HVAC_TITLES),
        has_exterior_scope: s.answers.flag(Q::ExteriorWork)
            || s.any_code(EXTERIOR_CODES)
            || s.any_title(EXTERIOR_TITLES),
        relocates_plumbing: s.answers.flag(Q::RelocatingPlumbing) || s.any_code(RELOCATION_CODES),
        requires_permit: s.answers.flag(Q::PermitRequired)
            || s.any_code(PERMIT_CODES)
            || s.any_title(PERMIT_TITLES),
    }
}

/// Detect areas from scope titles and item labels. The first classification
/// of a label wins; later occurrences are ignored.
fn detect_areas(scope_records: &[ScopeRecord]) -> Vec<DetectedArea> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut areas = Vec::new();

    for record in scope_records {
        let labels = std::iter::once(record.title.trim())
            .chain(record.cost_items.iter().filter_map(|item| item.area()));

        for label in labels {
            if label.is_empty() || !seen.insert(label) {
                continue;
            }
            areas.push(DetectedArea {
                label: label.to_string(),
                area_type: classify_area(label),
                source_scope_id: record.id.clone(),
            });
        }
    }

    areas
}

fn risk_score(flags: &DerivedFlags, project_type: ProjectType) -> u8 {
    let weights = [
        (flags.has_structural, STRUCTURAL_WEIGHT),
        (flags.has_waterproofing_scope, WATERPROOFING_WEIGHT),
        (flags.is_occupied_during_work, OCCUPIED_WEIGHT),
        (flags.includes_electrical_heavy, ELECTRICAL_HEAVY_WEIGHT),
        (project_type.is_full_scope(), FULL_SCOPE_WEIGHT),
        (flags.has_curbless_shower, CURBLESS_WEIGHT),
        (flags.has_steam_shower, STEAM_WEIGHT),
    ];

    let score = weights
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(BASE_RISK, |acc, (_, weight)| acc + weight);

    // MAX_RISK fits in u8
    score.min(MAX_RISK) as u8
}

fn risk_flags(flags: &DerivedFlags, project_type: ProjectType) -> RiskFlags {
    RiskFlags {
        structural_risk: flags.has_structural,
        waterproofing_risk: flags.has_waterproofing_scope
            || flags.has_curbless_shower
            || flags.has_steam_shower,
        inspection_heavy: flags.has_structural
            || flags.includes_electrical_heavy
            || flags.requires_permit
            || flags.relocates_plumbing
            || project_type.is_full_scope(),
        schedule_complex: flags.is_occupied_during_work
            || project_type.is_full_scope()
            || (flags.includes_kitchen && flags.includes_bath),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
