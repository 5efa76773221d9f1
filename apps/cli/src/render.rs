//! Plain-text rendering of command results.

use std::fmt::Write;

use smartcheck_catalog::{AreaTradeTemplate, CatalogItem, CatalogQuestion};
use smartcheck_core::{AreaTradeMatrix, ChecklistContext, PendingQuestion, PlanSummary};
use smartcheck_shared::PlannedChecklist;

fn join<T: std::fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_dash(s: String) -> String {
    if s.is_empty() { "-".to_string() } else { s }
}

pub(crate) fn context(ctx: &ChecklistContext) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project type:  {}", ctx.project_type);
    let _ = writeln!(out, "Risk score:    {}", ctx.risk_score);
    let _ = writeln!(out, "Flags:         {}", or_dash(join(ctx.flags.active())));

    let risk = &ctx.risk_flags;
    let risk_names = [
        ("structural", risk.structural_risk),
        ("waterproofing", risk.waterproofing_risk),
        ("inspection_heavy", risk.inspection_heavy),
        ("schedule_complex", risk.schedule_complex),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then_some(name));
    let _ = writeln!(out, "Risk flags:    {}", or_dash(join(risk_names)));

    let _ = writeln!(out, "Areas:");
    if ctx.detected_areas.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for area in &ctx.detected_areas {
        let _ = writeln!(
            out,
            "  {:<24} {:<10} {}",
            area.label,
            area.area_type.as_str(),
            area.source_scope_id
        );
    }
    out.trim_end().to_string()
}

pub(crate) fn matrix(matrix: &AreaTradeMatrix) -> String {
    if matrix.is_empty() {
        return "(no areas)".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {:<10} TRADES", "AREA", "TYPE");
    for (area, trades) in matrix.entries() {
        let _ = writeln!(
            out,
            "{:<24} {:<10} {}",
            area.key,
            area.area_type.as_str(),
            or_dash(join(trades))
        );
    }
    out.trim_end().to_string()
}

pub(crate) fn plan(
    ctx: &ChecklistContext,
    checklists: &[PlannedChecklist],
    summary: &PlanSummary,
    fingerprint: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<17} {:<7} {:<3} {:>5}  TITLE",
        "PHASE", "RISK", "ON", "ITEMS"
    );
    for checklist in checklists {
        let _ = writeln!(
            out,
            "{:<17} {:<7} {:<3} {:>5}  {}",
            checklist.phase.label(),
            checklist.risk_level.as_str(),
            if checklist.enabled { "y" } else { "n" },
            checklist.item_count,
            checklist.title,
        );
        let _ = writeln!(
            out,
            "{:<37}  reasons: {}",
            "",
            or_dash(join(&checklist.reason_tags))
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} checklists ({} enabled, {} high risk), {} items, risk score {}",
        summary.total,
        summary.enabled,
        summary.high_risk(),
        summary.total_items,
        ctx.risk_score
    );
    let phases = summary
        .by_phase
        .iter()
        .map(|(phase, count)| format!("{}: {count}", phase.label()));
    let _ = writeln!(out, "by phase: {}", or_dash(join(phases)));
    let _ = writeln!(out, "fingerprint: {fingerprint}");
    out.trim_end().to_string()
}

pub(crate) fn questions(pending: &[PendingQuestion]) -> String {
    if pending.is_empty() {
        return "(no pending questions)".to_string();
    }
    let mut out = String::new();
    for question in pending {
        let _ = writeln!(
            out,
            "{} ({:?}) - {}\n    areas: {}",
            question.code.as_str(),
            question.kind,
            question.prompt,
            join(&question.area_keys)
        );
    }
    out.trim_end().to_string()
}

pub(crate) fn catalog_templates(templates: &[AreaTradeTemplate]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {:<32} {:<20} TRADES", "ID", "NAME", "AREAS");
    for template in templates {
        let _ = writeln!(
            out,
            "{:<24} {:<32} {:<20} {}",
            template.id,
            template.name,
            join(template.area_types),
            join(template.trade_types)
        );
    }
    out.trim_end().to_string()
}

pub(crate) fn catalog_query(
    templates: &[&str],
    questions: &[&CatalogQuestion],
    items: &[&CatalogItem],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Templates: {}", or_dash(join(templates)));

    let _ = writeln!(out, "Questions:");
    for question in questions {
        let _ = writeln!(out, "  {:<22} {}", question.code.as_str(), question.prompt);
    }

    let _ = writeln!(out, "Items:");
    for item in items {
        let _ = writeln!(
            out,
            "  {:<14} {:<17} {}",
            item.code,
            item.phase.label(),
            item.text
        );
    }
    out.trim_end().to_string()
}
