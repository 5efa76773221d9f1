//! Catalog types and area/trade/project-type matching.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, instrument};

use smartcheck_shared::{
    AreaType, AssigneeRole, Phase, PlannedItem, ProjectType, QuestionCode, RiskLevel, TradeType,
};

use crate::data::BUILTIN_TEMPLATES;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A statically defined checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub code: &'static str,
    pub text: &'static str,
    pub phase: Phase,
    pub tags: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_assignee_role: Option<AssigneeRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

impl CatalogItem {
    /// Owned copy for inclusion in a planned checklist.
    pub fn to_planned(&self) -> PlannedItem {
        PlannedItem {
            code: self.code.to_string(),
            text: self.text.to_string(),
            phase: self.phase,
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            default_assignee_role: self.default_assignee_role,
            risk_level: self.risk_level,
        }
    }
}

/// A scoping question a template wants answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogQuestion {
    pub code: QuestionCode,
    pub prompt: &'static str,
}

/// A named group of catalog items keyed by area types, trades, and
/// optionally project types.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AreaTradeTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub area_types: &'static [AreaType],
    pub trade_types: &'static [TradeType],
    /// `None` means the template applies to every project type.
    pub project_types: Option<&'static [ProjectType]>,
    pub questions: &'static [CatalogQuestion],
    pub items: &'static [CatalogItem],
}

impl AreaTradeTemplate {
    /// Area must be declared, trades must intersect, and a project-type
    /// restriction (if any) must include the queried type.
    pub fn matches(
        &self,
        area_type: AreaType,
        trades: &[TradeType],
        project_type: Option<ProjectType>,
    ) -> bool {
        if !self.area_types.contains(&area_type) {
            return false;
        }
        if !self.trade_types.iter().any(|t| trades.contains(t)) {
            return false;
        }
        match self.project_types {
            None => true,
            Some(allowed) => project_type.is_some_and(|pt| allowed.contains(&pt)),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Read-only view over a set of area/trade templates.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    templates: &'static [AreaTradeTemplate],
}

impl Catalog {
    /// Wrap a custom template table (tests, alternative catalogs).
    pub const fn new(templates: &'static [AreaTradeTemplate]) -> Self {
        Self { templates }
    }

    /// The catalog compiled into SmartCheck.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TEMPLATES)
    }

    pub fn templates(&self) -> &'static [AreaTradeTemplate] {
        self.templates
    }

    pub fn template(&self, id: &str) -> Option<&'static AreaTradeTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates matching the area/trade/project-type criteria, in declaration order.
    pub fn find_area_trade_templates(
        &self,
        area_type: AreaType,
        trades: &[TradeType],
        project_type: Option<ProjectType>,
    ) -> Vec<&'static AreaTradeTemplate> {
        self.templates
            .iter()
            .filter(|t| t.matches(area_type, trades, project_type))
            .collect()
    }

    /// Questions of all matching templates, deduplicated by question code.
    pub fn get_area_trade_questions(
        &self,
        area_type: AreaType,
        trades: &[TradeType],
        project_type: Option<ProjectType>,
    ) -> Vec<&'static CatalogQuestion> {
        let mut seen = HashSet::new();
        self.find_area_trade_templates(area_type, trades, project_type)
            .into_iter()
            .flat_map(|t| t.questions.iter())
            .filter(|q| seen.insert(q.code))
            .collect()
    }

    /// Checklist items of all matching templates.
    ///
    /// Deduplicated by item code (first occurrence in declaration order wins),
    /// then stably sorted by phase.
    #[instrument(skip(self), level = "debug")]
    pub fn get_area_trade_checklist_items(
        &self,
        area_type: AreaType,
        trades: &[TradeType],
        project_type: Option<ProjectType>,
    ) -> Vec<&'static CatalogItem> {
        let templates = self.find_area_trade_templates(area_type, trades, project_type);

        let mut seen = HashSet::new();
        let mut items: Vec<&'static CatalogItem> = templates
            .iter()
            .flat_map(|t| t.items.iter())
            .filter(|item| seen.insert(item.code))
            .collect();
        items.sort_by_key(|item| item.phase.order());

        debug!(
            templates = templates.len(),
            items = items.len(),
            "catalog items matched"
        );
        items
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Free functions over the built-in catalog
// ---------------------------------------------------------------------------

/// [`Catalog::find_area_trade_templates`] on the built-in catalog.
pub fn find_area_trade_templates(
    area_type: AreaType,
    trades: &[TradeType],
    project_type: Option<ProjectType>,
) -> Vec<&'static AreaTradeTemplate> {
    Catalog::builtin().find_area_trade_templates(area_type, trades, project_type)
}

/// [`Catalog::get_area_trade_questions`] on the built-in catalog.
pub fn get_area_trade_questions(
    area_type: AreaType,
    trades: &[TradeType],
    project_type: Option<ProjectType>,
) -> Vec<&'static CatalogQuestion> {
    Catalog::builtin().get_area_trade_questions(area_type, trades, project_type)
}

/// [`Catalog::get_area_trade_checklist_items`] on the built-in catalog.
pub fn get_area_trade_checklist_items(
    area_type: AreaType,
    trades: &[TradeType],
    project_type: Option<ProjectType>,
) -> Vec<&'static CatalogItem> {
    Catalog::builtin().get_area_trade_checklist_items(area_type, trades, project_type)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
