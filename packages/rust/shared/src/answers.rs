//! Validated question/answer set.
//!
//! Answers arrive from the external Q&A flow as a loose JSON object. They are
//! checked once here against the known question codes and their expected
//! value kinds, so the inference pipeline only ever sees typed values.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SmartCheckError};

/// Runs of anything that is not a lower-case letter or digit.
static NON_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("code regex"));

/// Normalize a free-form code to `snake_case` (`"Waterproofing Level"` → `waterproofing_level`).
pub fn normalize_code(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    NON_CODE_RE
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

// ---------------------------------------------------------------------------
// Question codes
// ---------------------------------------------------------------------------

/// Expected value kind of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    Bool,
    Text,
    List,
}

/// Known question codes. Answers for any other code are dropped at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCode {
    StructuralChanges,
    WaterproofingLevel,
    ShowerType,
    SteamShower,
    OccupiedDuringWork,
    ElectricalScope,
    PanelUpgrade,
    RoomsInScope,
    ExteriorWork,
    HvacChanges,
    RelocatingPlumbing,
    PermitRequired,
}

impl QuestionCode {
    pub const ALL: [QuestionCode; 12] = [
        Self::StructuralChanges,
        Self::WaterproofingLevel,
        Self::ShowerType,
        Self::SteamShower,
        Self::OccupiedDuringWork,
        Self::ElectricalScope,
        Self::PanelUpgrade,
        Self::RoomsInScope,
        Self::ExteriorWork,
        Self::HvacChanges,
        Self::RelocatingPlumbing,
        Self::PermitRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuralChanges => "structural_changes",
            Self::WaterproofingLevel => "waterproofing_level",
            Self::ShowerType => "shower_type",
            Self::SteamShower => "steam_shower",
            Self::OccupiedDuringWork => "occupied_during_work",
            Self::ElectricalScope => "electrical_scope",
            Self::PanelUpgrade => "panel_upgrade",
            Self::RoomsInScope => "rooms_in_scope",
            Self::ExteriorWork => "exterior_work",
            Self::HvacChanges => "hvac_changes",
            Self::RelocatingPlumbing => "relocating_plumbing",
            Self::PermitRequired => "permit_required",
        }
    }

    pub fn kind(&self) -> AnswerKind {
        match self {
            Self::WaterproofingLevel | Self::ShowerType | Self::ElectricalScope => AnswerKind::Text,
            Self::RoomsInScope => AnswerKind::List,
            _ => AnswerKind::Bool,
        }
    }

    /// Look up a code after normalization. Returns `None` for unknown codes.
    pub fn from_code(raw: &str) -> Option<Self> {
        let code = normalize_code(raw);
        Self::ALL.into_iter().find(|q| q.as_str() == code)
    }
}

impl std::fmt::Display for QuestionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// A typed answer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    pub fn kind(&self) -> AnswerKind {
        match self {
            Self::Bool(_) => AnswerKind::Bool,
            Self::Text(_) => AnswerKind::Text,
            Self::List(_) => AnswerKind::List,
        }
    }
}

// ---------------------------------------------------------------------------
// AnswerSet
// ---------------------------------------------------------------------------

/// Answers keyed by question code. Every value matches its code's [`AnswerKind`].
///
/// Deserialization goes through [`AnswerSet::from_json`], so the same
/// validation applies however the set is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct AnswerSet(BTreeMap<QuestionCode, AnswerValue>);

impl TryFrom<serde_json::Value> for AnswerSet {
    type Error = SmartCheckError;

    fn try_from(raw: serde_json::Value) -> Result<Self> {
        Self::from_json(&raw)
    }
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a raw JSON answer object.
    ///
    /// Unknown codes and `null` values are dropped; values are coerced to the
    /// code's expected kind where unambiguous. Anything else is a validation error.
    pub fn from_json(raw: &serde_json::Value) -> Result<Self> {
        let obj = match raw {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Object(obj) => obj,
            other => {
                return Err(SmartCheckError::validation(format!(
                    "answers must be a JSON object, got {}",
                    json_kind(other)
                )));
            }
        };

        let mut answers = Self::default();
        for (raw_code, value) in obj {
            let Some(code) = QuestionCode::from_code(raw_code) else {
                warn!(code = %raw_code, "dropping answer for unknown question code");
                continue;
            };
            if let Some(value) = coerce(code, value)? {
                answers.0.insert(code, value);
            }
        }

        debug!(answer_count = answers.0.len(), "answers validated");
        Ok(answers)
    }

    /// Insert an answer, checking its kind against the question.
    pub fn insert(&mut self, code: QuestionCode, value: AnswerValue) -> Result<()> {
        if value.kind() != code.kind() {
            return Err(SmartCheckError::validation(format!(
                "{code} expects a {:?} answer, got {:?}",
                code.kind(),
                value.kind()
            )));
        }
        self.0.insert(code, value);
        Ok(())
    }

    /// Builder-style insert for literals known to be well-kinded.
    /// Mismatched kinds are ignored.
    pub fn with(mut self, code: QuestionCode, value: AnswerValue) -> Self {
        if value.kind() == code.kind() {
            self.0.insert(code, value);
        }
        self
    }

    pub fn is_answered(&self, code: QuestionCode) -> bool {
        self.0.contains_key(&code)
    }

    /// `true` only for an explicit yes.
    pub fn flag(&self, code: QuestionCode) -> bool {
        matches!(self.0.get(&code), Some(AnswerValue::Bool(true)))
    }

    pub fn text(&self, code: QuestionCode) -> Option<&str> {
        match self.0.get(&code) {
            Some(AnswerValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, code: QuestionCode) -> &[String] {
        match self.0.get(&code) {
            Some(AnswerValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Case-insensitive substring test against a text answer or any list entry.
    pub fn contains_text(&self, code: QuestionCode, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        match self.0.get(&code) {
            Some(AnswerValue::Text(s)) => s.to_lowercase().contains(&needle),
            Some(AnswerValue::List(items)) => {
                items.iter().any(|s| s.to_lowercase().contains(&needle))
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn coerce(code: QuestionCode, value: &serde_json::Value) -> Result<Option<AnswerValue>> {
    use serde_json::Value;

    let mismatch = || {
        SmartCheckError::validation(format!(
            "{code} expects a {:?} answer, got {}",
            code.kind(),
            json_kind(value)
        ))
    };

    let coerced = match (code.kind(), value) {
        (_, Value::Null) => return Ok(None),

        (AnswerKind::Bool, Value::Bool(b)) => AnswerValue::Bool(*b),
        (AnswerKind::Bool, Value::Number(n)) => {
            AnswerValue::Bool(n.as_f64().is_some_and(|f| f != 0.0))
        }
        (AnswerKind::Bool, Value::String(s)) => match normalize_code(s).as_str() {
            "yes" | "y" | "true" | "1" => AnswerValue::Bool(true),
            "no" | "n" | "false" | "0" | "" => AnswerValue::Bool(false),
            _ => return Err(mismatch()),
        },

        (AnswerKind::Text, Value::String(s)) => AnswerValue::Text(s.clone()),
        (AnswerKind::Text, Value::Number(n)) => AnswerValue::Text(n.to_string()),

        (AnswerKind::List, Value::String(s)) => AnswerValue::List(vec![s.clone()]),
        (AnswerKind::List, Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    Value::Null => {}
                    _ => return Err(mismatch()),
                }
            }
            AnswerValue::List(out)
        }

        _ => return Err(mismatch()),
    };

    Ok(Some(coerced))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
