//! Ordered keyword tables for area and trade classification.
//!
//! Matching is plain case-insensitive substring search. Table order is part
//! of the observable behavior: the first entry with a matching keyword wins.

use tracing::trace;

use smartcheck_shared::{AreaType, TradeType};

/// Area keywords, checked top to bottom against a lower-cased label.
/// Labels that match nothing are [`AreaType::Other`].
pub const AREA_KEYWORDS: &[(AreaType, &[&str])] = &[
    (
        AreaType::Kitchen,
        &["kitchen", "pantry", "scullery", "kitchenette"],
    ),
    (
        AreaType::Bath,
        &[
            "bath", "shower", "powder", "ensuite", "en suite", "lavatory", "restroom", "washroom",
        ],
    ),
    (
        AreaType::Bedroom,
        &["bedroom", "suite", "nursery", "guest room", "bunk room"],
    ),
    (
        AreaType::Living,
        &[
            "living", "family room", "great room", "dining", "office", "library", "bonus room",
        ],
    ),
    (
        AreaType::Hall,
        &["hall", "entry", "foyer", "stair", "corridor", "mudroom", "landing"],
    ),
    (
        AreaType::Exterior,
        &[
            "exterior", "deck", "patio", "porch", "roof", "siding", "yard", "garden", "driveway",
            "facade", "fence",
        ],
    ),
];

/// Trade keywords, checked top to bottom against lower-cased cost-code text.
pub const TRADE_KEYWORDS: &[(TradeType, &[&str])] = &[
    (
        TradeType::Demo,
        &["demo", "tear out", "tear-out", "removal", "haul away"],
    ),
    (
        TradeType::Waterproofing,
        &[
            "waterproof", "membrane", "shower pan", "linear drain", "curbless", "kerdi", "hot mop",
        ],
    ),
    (
        TradeType::Framing,
        &["framing", "frame", "structural", "beam", "header", "joist", "stud"],
    ),
    (
        TradeType::Plumbing,
        &[
            "plumb", "drain", "valve", "faucet", "toilet", "sink", "water heater", "supply line",
        ],
    ),
    (
        TradeType::Electrical,
        &[
            "electric", "wiring", "panel", "circuit", "outlet", "receptacle", "lighting",
            "light fixture", "recessed",
        ],
    ),
    (
        TradeType::Hvac,
        &[
            "hvac", "duct", "furnace", "heat pump", "mini split", "exhaust fan", "air handler",
        ],
    ),
    (
        TradeType::Insulation,
        &["insulation", "insulate", "spray foam"],
    ),
    (
        TradeType::Drywall,
        &["drywall", "sheetrock", "gypsum", "plaster", "tape and mud"],
    ),
    (TradeType::Tile, &["tile", "backsplash", "grout", "mosaic"]),
    (TradeType::Cabinetry, &["cabinet", "vanity", "millwork"]),
    (
        TradeType::Countertops,
        &["countertop", "counter top", "quartz", "granite", "slab"],
    ),
    (
        TradeType::Flooring,
        &["floor", "hardwood", "lvp", "laminate", "carpet"],
    ),
    (TradeType::Painting, &["paint", "primer", "coating"]),
    (
        TradeType::FinishCarpentry,
        &["trim", "baseboard", "casing", "crown", "interior door"],
    ),
    (
        TradeType::Roofing,
        &["roof", "shingle", "gutter", "flashing", "skylight"],
    ),
    (
        TradeType::Exterior,
        &["siding", "stucco", "exterior", "deck", "window"],
    ),
];

/// Classify a free-form area label. First matching keyword wins; default `other`.
pub fn classify_area(label: &str) -> AreaType {
    let lower = label.to_lowercase();
    let area = AREA_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(area, _)| *area)
        .unwrap_or(AreaType::Other);
    trace!(label, %area, "classified area");
    area
}

/// Classify cost-code text into at most one trade. First matching trade wins.
pub fn classify_trade(code_text: &str) -> Option<TradeType> {
    let lower = code_text.to_lowercase();
    let trade = TRADE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(trade, _)| *trade);
    trace!(code_text, trade = ?trade, "classified trade");
    trade
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_area_first_match_wins() {
        assert_eq!(classify_area("Kitchen Demo"), AreaType::Kitchen);
        assert_eq!(classify_area("Primary Bath"), AreaType::Bath);
        // bath is checked before hall
        assert_eq!(classify_area("Hall Bath"), AreaType::Bath);
        assert_eq!(classify_area("Hallway"), AreaType::Hall);
        assert_eq!(classify_area("Primary Suite"), AreaType::Bedroom);
        assert_eq!(classify_area("Great Room"), AreaType::Living);
        assert_eq!(classify_area("Back Deck"), AreaType::Exterior);
        assert_eq!(classify_area("Vegetable Garden"), AreaType::Exterior);
    }

    #[test]
    fn classify_area_defaults_to_other() {
        assert_eq!(classify_area("General Conditions"), AreaType::Other);
        assert_eq!(classify_area(""), AreaType::Other);
    }

    #[test]
    fn classify_area_is_case_insensitive() {
        assert_eq!(classify_area("KITCHEN"), AreaType::Kitchen);
        assert_eq!(classify_area("powder room"), AreaType::Bath);
    }

    #[test]
    fn classify_trade_examples() {
        assert_eq!(classify_trade("DEMO-01"), Some(TradeType::Demo));
        assert_eq!(classify_trade("linear drain"), Some(TradeType::Waterproofing));
        assert_eq!(classify_trade("Shower valve PLB-12"), Some(TradeType::Plumbing));
        assert_eq!(classify_trade("Panel upgrade 200A"), Some(TradeType::Electrical));
        assert_eq!(classify_trade("LVL beam"), Some(TradeType::Framing));
        assert_eq!(classify_trade("Quartz countertop"), Some(TradeType::Countertops));
        assert_eq!(classify_trade("Exterior paint"), Some(TradeType::Painting));
    }

    #[test]
    fn classify_trade_order_resolves_overlaps() {
        // tile is checked before flooring
        assert_eq!(classify_trade("floor tile"), Some(TradeType::Tile));
        // waterproofing is checked before plumbing
        assert_eq!(classify_trade("shower pan and drain"), Some(TradeType::Waterproofing));
        // roofing is checked before exterior
        assert_eq!(classify_trade("roof deck"), Some(TradeType::Roofing));
    }

    #[test]
    fn classify_trade_no_match() {
        assert_eq!(classify_trade("Dumpster GC-01"), None);
        assert_eq!(classify_trade(""), None);
    }

    #[test]
    fn tables_cover_every_non_default_variant() {
        for area in AreaType::ALL.into_iter().filter(|a| *a != AreaType::Other) {
            assert!(AREA_KEYWORDS.iter().any(|(a, _)| *a == area), "{area} missing");
        }
        for trade in TradeType::ALL {
            assert!(TRADE_KEYWORDS.iter().any(|(t, _)| *t == trade), "{trade} missing");
        }
    }
}
