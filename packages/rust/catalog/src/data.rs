//! Built-in area/trade catalog.
//!
//! Declaration order matters: item deduplication keeps the first occurrence
//! while scanning templates in this order.

use smartcheck_shared::{
    AreaType, AssigneeRole, Phase, ProjectType, QuestionCode, RiskLevel, TradeType,
};

use crate::matcher::{AreaTradeTemplate, CatalogItem, CatalogQuestion};

use AssigneeRole::{LeadCarpenter, ProjectManager, Subcontractor, Superintendent};
use Phase::{Finish, Precon, Punch, Rough};
use RiskLevel::{High, Medium};

const INTERIOR: &[AreaType] = &[
    AreaType::Kitchen,
    AreaType::Bath,
    AreaType::Bedroom,
    AreaType::Living,
    AreaType::Hall,
    AreaType::Other,
];

const ANY_AREA: &[AreaType] = &AreaType::ALL;

const fn item(code: &'static str, phase: Phase, text: &'static str) -> CatalogItem {
    CatalogItem {
        code,
        text,
        phase,
        tags: &[],
        default_assignee_role: None,
        risk_level: None,
    }
}

impl CatalogItem {
    const fn tags(mut self, tags: &'static [&'static str]) -> Self {
        self.tags = tags;
        self
    }

    const fn role(mut self, role: AssigneeRole) -> Self {
        self.default_assignee_role = Some(role);
        self
    }

    const fn risk(mut self, risk: RiskLevel) -> Self {
        self.risk_level = Some(risk);
        self
    }
}

const fn question(code: QuestionCode, prompt: &'static str) -> CatalogQuestion {
    CatalogQuestion { code, prompt }
}

/// The default catalog.
pub static BUILTIN_TEMPLATES: &[AreaTradeTemplate] = &[
    // -- Kitchen -----------------------------------------------------------
    AreaTradeTemplate {
        id: "kitchen-demo",
        name: "Kitchen Demolition",
        area_types: &[AreaType::Kitchen],
        trade_types: &[TradeType::Demo],
        project_types: None,
        questions: &[question(
            QuestionCode::OccupiedDuringWork,
            "Will the owners live in the home during demolition?",
        )],
        items: &[
            item("KIT-DEMO-01", Precon, "Protect adjacent flooring and finishes before demolition")
                .tags(&["protection"])
                .role(Superintendent),
            item("KIT-DEMO-02", Precon, "Locate and tag gas, water, and power shut-offs")
                .tags(&["safety"])
                .role(LeadCarpenter)
                .risk(Medium),
            item("KIT-DEMO-03", Rough, "Document concealed conditions found after tear-out")
                .tags(&["documentation"])
                .role(ProjectManager),
            item("KIT-DEMO-04", Rough, "Debris removed and dust barriers re-inspected at end of demo")
                .tags(&["cleanup"]),
        ],
    },
    AreaTradeTemplate {
        id: "kitchen-plumbing",
        name: "Kitchen Plumbing",
        area_types: &[AreaType::Kitchen],
        trade_types: &[TradeType::Plumbing],
        project_types: None,
        questions: &[question(
            QuestionCode::RelocatingPlumbing,
            "Is the sink or any plumbing fixture moving?",
        )],
        items: &[
            item("KIT-PLB-01", Precon, "Confirm sink, dishwasher, and fridge water locations against plan"),
            item("KIT-PLB-02", Rough, "Pressure test supply lines before close-in")
                .tags(&["inspection"])
                .role(Subcontractor)
                .risk(Medium),
            item("KIT-PLB-03", Rough, "Verify drain slope and venting for relocated sink")
                .tags(&["plumbing", "inspection"]),
            item("KIT-PLB-04", Finish, "Check for leaks under sink and at dishwasher after 24h of use")
                .tags(&["plumbing"]),
        ],
    },
    AreaTradeTemplate {
        id: "kitchen-electrical",
        name: "Kitchen Electrical",
        area_types: &[AreaType::Kitchen],
        trade_types: &[TradeType::Electrical],
        project_types: None,
        questions: &[
            question(
                QuestionCode::ElectricalScope,
                "Describe the electrical scope (new circuits, relocation, service change)",
            ),
            question(QuestionCode::PanelUpgrade, "Is the electrical panel being upgraded?"),
        ],
        items: &[
            item("KIT-ELE-01", Precon, "Confirm appliance amperage requirements with final spec sheets")
                .tags(&["electrical"]),
            item("KIT-ELE-02", Rough, "Dedicated circuits for range, dishwasher, disposal, and microwave verified")
                .tags(&["electrical", "inspection"])
                .risk(Medium),
            item("KIT-ELE-03", Rough, "Countertop receptacle spacing and GFCI/AFCI protection meet code")
                .tags(&["electrical", "inspection"]),
            item("KIT-ELE-04", Finish, "Under-cabinet lighting and device covers installed and tested")
                .tags(&["electrical"]),
        ],
    },
    AreaTradeTemplate {
        id: "kitchen-cabinetry",
        name: "Kitchen Cabinets & Countertops",
        area_types: &[AreaType::Kitchen],
        trade_types: &[TradeType::Cabinetry, TradeType::Countertops],
        project_types: None,
        questions: &[],
        items: &[
            item("KIT-CAB-01", Precon, "Cabinet order verified against field measurements")
                .tags(&["cabinetry"])
                .role(ProjectManager)
                .risk(Medium),
            item("KIT-CAB-02", Rough, "Blocking installed for upper cabinets and heavy appliances")
                .tags(&["cabinetry", "framing"]),
            item("KIT-CAB-03", Finish, "Cabinets level, plumb, and fastened to blocking")
                .tags(&["cabinetry"]),
            item("KIT-CAB-04", Finish, "Countertop seams, overhangs, and sink cutout inspected")
                .tags(&["countertops"]),
            item("KIT-CAB-05", Punch, "Doors and drawers aligned with even reveals")
                .tags(&["cabinetry"]),
        ],
    },
    AreaTradeTemplate {
        id: "kitchen-tile",
        name: "Kitchen Backsplash",
        area_types: &[AreaType::Kitchen],
        trade_types: &[TradeType::Tile],
        project_types: None,
        questions: &[],
        items: &[
            item("KIT-TILE-01", Finish, "Backsplash layout approved before setting").tags(&["tile"]),
            item("KIT-TILE-02", Finish, "Grout joints consistent and sealed").tags(&["tile"]),
            item("KIT-TILE-03", Punch, "Flexible sealant at countertop-to-backsplash joint").tags(&["tile"]),
        ],
    },
    // -- Bath --------------------------------------------------------------
    AreaTradeTemplate {
        id: "bath-demo",
        name: "Bath Demolition",
        area_types: &[AreaType::Bath],
        trade_types: &[TradeType::Demo],
        project_types: None,
        questions: &[],
        items: &[
            item("BATH-DEMO-01", Precon, "Floor protection laid from entry to bath")
                .tags(&["protection"])
                .role(Superintendent),
            item("BATH-DEMO-02", Rough, "Inspect subfloor and joists around toilet flange and tub drain")
                .tags(&["subfloor"])
                .risk(Medium),
            item("BATH-DEMO-03", Rough, "Removed materials checked for asbestos and lead hazards")
                .tags(&["safety"]),
        ],
    },
    AreaTradeTemplate {
        id: "bath-plumbing",
        name: "Bath Plumbing",
        area_types: &[AreaType::Bath],
        trade_types: &[TradeType::Plumbing],
        project_types: None,
        questions: &[
            question(QuestionCode::ShowerType, "What type of shower is being installed?"),
            question(
                QuestionCode::RelocatingPlumbing,
                "Is the sink or any plumbing fixture moving?",
            ),
        ],
        items: &[
            item("BATH-PLB-01", Precon, "Valve trim and fixture selections match rough-in valves")
                .role(ProjectManager),
            item("BATH-PLB-02", Rough, "Shower valve depth set to manufacturer spec before close-in")
                .tags(&["plumbing"])
                .role(Subcontractor)
                .risk(Medium),
            item("BATH-PLB-03", Rough, "Drain and vent rough inspected")
                .tags(&["plumbing", "inspection"]),
            item("BATH-PLB-04", Finish, "Fixtures tested for flow, temperature limit, and leaks")
                .tags(&["plumbing"]),
        ],
    },
    AreaTradeTemplate {
        id: "bath-waterproofing",
        name: "Shower Waterproofing",
        area_types: &[AreaType::Bath],
        trade_types: &[TradeType::Waterproofing, TradeType::Tile],
        project_types: None,
        questions: &[
            question(
                QuestionCode::WaterproofingLevel,
                "What level of waterproofing does the shower need?",
            ),
            question(QuestionCode::SteamShower, "Is this a steam shower?"),
        ],
        items: &[
            item("BATH-WP-01", Precon, "Waterproofing system and manufacturer details selected")
                .tags(&["waterproofing"]),
            item("BATH-WP-02", Rough, "Membrane installed with required overlaps at seams and corners")
                .tags(&["waterproofing"])
                .role(Subcontractor)
                .risk(High),
            item("BATH-WP-03", Rough, "24-hour flood test passed and photo documented")
                .tags(&["waterproofing", "inspection"])
                .role(Superintendent)
                .risk(High),
            item("BATH-WP-04", Finish, "Movement joints at changes of plane left open for sealant")
                .tags(&["waterproofing", "tile"]),
        ],
    },
    AreaTradeTemplate {
        id: "bath-curbless",
        name: "Curbless Shower",
        area_types: &[AreaType::Bath],
        trade_types: &[TradeType::Waterproofing],
        project_types: Some(&[ProjectType::BathRemodel, ProjectType::FullHomeRemodel]),
        questions: &[
            question(
                QuestionCode::WaterproofingLevel,
                "What level of waterproofing does the shower need?",
            ),
            question(QuestionCode::ShowerType, "What type of shower is being installed?"),
        ],
        items: &[
            item("BATH-CRB-01", Precon, "Subfloor recess or joist modification approved for curbless entry")
                .tags(&["curbless", "structural"])
                .role(ProjectManager)
                .risk(High),
            item("BATH-CRB-02", Rough, "Linear drain set to finished floor height with continuous slope")
                .tags(&["curbless", "waterproofing"])
                .risk(High),
            item("BATH-CRB-03", Rough, "Bonding flange integrated with membrane at linear drain")
                .tags(&["curbless", "waterproofing"])
                .risk(High),
            item("BATH-CRB-04", Finish, "Water stays within wet zone during full-flow test")
                .tags(&["curbless"])
                .role(Superintendent)
                .risk(High),
        ],
    },
    AreaTradeTemplate {
        id: "bath-tile",
        name: "Bath Tile",
        area_types: &[AreaType::Bath],
        trade_types: &[TradeType::Tile],
        project_types: None,
        questions: &[],
        items: &[
            item("BATH-TILE-01", Precon, "Tile layout and niche locations approved").tags(&["tile"]),
            item("BATH-TILE-02", Finish, "Lippage within tolerance on floor and walls").tags(&["tile"]),
            item("BATH-TILE-03", Punch, "Grout sealed and haze removed").tags(&["tile"]),
        ],
    },
    AreaTradeTemplate {
        id: "bath-ventilation",
        name: "Bath Ventilation & Electrical",
        area_types: &[AreaType::Bath],
        trade_types: &[TradeType::Electrical, TradeType::Hvac],
        project_types: None,
        questions: &[],
        items: &[
            item("BATH-VENT-01", Rough, "Exhaust fan ducted to exterior, not into attic")
                .tags(&["hvac", "inspection"])
                .risk(Medium),
            item("BATH-VENT-02", Rough, "GFCI protection on all bath receptacles").tags(&["electrical"]),
            item("BATH-VENT-03", Finish, "Fan and lights operate on correct switches").tags(&["electrical"]),
        ],
    },
    // -- Any interior ------------------------------------------------------
    AreaTradeTemplate {
        id: "interior-demo",
        name: "Interior Demolition",
        area_types: &[AreaType::Bedroom, AreaType::Living, AreaType::Hall, AreaType::Other],
        trade_types: &[TradeType::Demo],
        project_types: None,
        questions: &[],
        items: &[
            item("DEMO-01", Precon, "Dust control and floor protection set up").tags(&["protection"]),
            item("DEMO-02", Rough, "Concealed conditions documented after demolition")
                .tags(&["documentation"])
                .role(ProjectManager),
        ],
    },
    AreaTradeTemplate {
        id: "structural-framing",
        name: "Structural Framing",
        area_types: INTERIOR,
        trade_types: &[TradeType::Framing],
        project_types: None,
        questions: &[
            question(
                QuestionCode::StructuralChanges,
                "Are any load-bearing walls, beams, or joists changing?",
            ),
            question(QuestionCode::PermitRequired, "Does this work require a permit?"),
        ],
        items: &[
            item("FRM-01", Precon, "Engineer's details on site for beams, headers, and point loads")
                .tags(&["structural"])
                .role(ProjectManager)
                .risk(High),
            item("FRM-02", Rough, "Temporary shoring in place before load-bearing removal")
                .tags(&["structural", "safety"])
                .role(LeadCarpenter)
                .risk(High),
            item("FRM-03", Rough, "Framing inspection passed before insulation")
                .tags(&["structural", "inspection"]),
            item("FRM-04", Rough, "Walls plumb and flat where tile or cabinets will land")
                .tags(&["framing"]),
        ],
    },
    AreaTradeTemplate {
        id: "interior-electrical",
        name: "Interior Electrical",
        area_types: &[AreaType::Bedroom, AreaType::Living, AreaType::Hall, AreaType::Other],
        trade_types: &[TradeType::Electrical],
        project_types: None,
        questions: &[question(QuestionCode::PanelUpgrade, "Is the electrical panel being upgraded?")],
        items: &[
            item("ELE-01", Precon, "Lighting and device plan walked with client").tags(&["electrical"]),
            item("ELE-02", Rough, "Rough electrical inspection passed")
                .tags(&["electrical", "inspection"])
                .risk(Medium),
            item("ELE-03", Finish, "All circuits labeled in panel").tags(&["electrical"]),
        ],
    },
    AreaTradeTemplate {
        id: "hvac",
        name: "HVAC",
        area_types: ANY_AREA,
        trade_types: &[TradeType::Hvac],
        project_types: None,
        questions: &[question(QuestionCode::HvacChanges, "Are ducts, registers, or equipment changing?")],
        items: &[
            item("HVAC-01", Precon, "Load calculation reviewed for added or relocated registers")
                .tags(&["hvac"]),
            item("HVAC-02", Rough, "Duct joints sealed and supported")
                .tags(&["hvac", "inspection"])
                .risk(Medium),
            item("HVAC-03", Finish, "Registers balanced and airflow verified").tags(&["hvac"]),
        ],
    },
    AreaTradeTemplate {
        id: "insulation",
        name: "Insulation & Air Sealing",
        area_types: ANY_AREA,
        trade_types: &[TradeType::Insulation],
        project_types: None,
        questions: &[],
        items: &[
            item("INS-01", Rough, "Insulation R-values match energy compliance").tags(&["inspection"]),
            item("INS-02", Rough, "Air sealing at top plates and penetrations complete"),
        ],
    },
    AreaTradeTemplate {
        id: "drywall-paint",
        name: "Drywall & Paint",
        area_types: INTERIOR,
        trade_types: &[TradeType::Drywall, TradeType::Painting],
        project_types: None,
        questions: &[],
        items: &[
            item("DRY-01", Rough, "Insulation and vapor control inspected before board")
                .tags(&["inspection"]),
            item("DRY-02", Finish, "Drywall finish level matches lighting conditions"),
            item("DRY-03", Finish, "Paint sheen and colors verified against schedule"),
            item("DRY-04", Punch, "Touch-up pass complete after final trades").role(Superintendent),
        ],
    },
    AreaTradeTemplate {
        id: "flooring",
        name: "Flooring",
        area_types: INTERIOR,
        trade_types: &[TradeType::Flooring],
        project_types: None,
        questions: &[],
        items: &[
            item("FLR-01", Precon, "Moisture test subfloor or slab before flooring delivery")
                .tags(&["flooring"])
                .risk(Medium),
            item("FLR-02", Finish, "Flooring acclimated per manufacturer").tags(&["flooring"]),
            item("FLR-03", Finish, "Transitions flush at doorways").tags(&["flooring"]),
            item("FLR-04", Punch, "Floors cleaned and protected until handover"),
        ],
    },
    AreaTradeTemplate {
        id: "finish-carpentry",
        name: "Finish Carpentry",
        area_types: INTERIOR,
        trade_types: &[TradeType::FinishCarpentry],
        project_types: None,
        questions: &[],
        items: &[
            item("TRIM-01", Finish, "Casing and base joints tight and filled"),
            item("TRIM-02", Finish, "Doors swing freely with consistent reveals"),
            item("TRIM-03", Punch, "Hardware installed and adjusted").role(LeadCarpenter),
        ],
    },
    // -- Exterior ----------------------------------------------------------
    AreaTradeTemplate {
        id: "exterior-envelope",
        name: "Exterior Envelope",
        area_types: &[AreaType::Exterior],
        trade_types: &[TradeType::Roofing, TradeType::Exterior, TradeType::Framing],
        project_types: None,
        questions: &[
            question(QuestionCode::ExteriorWork, "Does the work open the exterior envelope?"),
            question(QuestionCode::PermitRequired, "Does this work require a permit?"),
        ],
        items: &[
            item("EXT-01", Precon, "Weather protection plan for open envelope")
                .tags(&["exterior"])
                .role(Superintendent),
            item("EXT-02", Rough, "Flashing at windows, doors, and roof-to-wall integrated with WRB")
                .tags(&["exterior", "waterproofing"])
                .risk(High),
            item("EXT-03", Rough, "Roof underlayment and ice barrier inspected")
                .tags(&["exterior", "inspection"]),
            item("EXT-04", Finish, "Sealant joints complete and painted").tags(&["exterior"]),
            item("EXT-05", Punch, "Gutters and downspouts discharge away from foundation")
                .tags(&["exterior"]),
        ],
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn template_ids_are_unique() {
        let mut seen = HashSet::new();
        for template in BUILTIN_TEMPLATES {
            assert!(seen.insert(template.id), "duplicate template id {}", template.id);
        }
    }

    #[test]
    fn item_codes_are_unique() {
        let mut seen = HashSet::new();
        for template in BUILTIN_TEMPLATES {
            for item in template.items {
                assert!(seen.insert(item.code), "duplicate item code {}", item.code);
            }
        }
    }

    #[test]
    fn every_template_has_areas_trades_and_items() {
        for template in BUILTIN_TEMPLATES {
            assert!(!template.area_types.is_empty(), "{} has no areas", template.id);
            assert!(!template.trade_types.is_empty(), "{} has no trades", template.id);
            assert!(!template.items.is_empty(), "{} has no items", template.id);
        }
    }

    #[test]
    fn catalog_items_never_use_warranty_phase() {
        for template in BUILTIN_TEMPLATES {
            for item in template.items {
                assert_ne!(item.phase, Phase::Warranty, "{}", item.code);
            }
        }
    }
}
