//! Compiled-in area/trade checklist catalog and classification tables.
//!
//! This crate provides:
//! - [`keywords`]: ordered keyword tables and the area/trade classifiers
//! - [`Catalog`]: read-only lookup over [`AreaTradeTemplate`] definitions
//! - [`BUILTIN_TEMPLATES`]: the default catalog shipped with SmartCheck
//!
//! The catalog is immutable static data. Tests and callers that need a
//! different catalog construct their own [`Catalog`] instead of mutating
//! global state.

mod data;
pub mod keywords;
mod matcher;

pub use data::BUILTIN_TEMPLATES;
pub use keywords::{AREA_KEYWORDS, TRADE_KEYWORDS, classify_area, classify_trade};
pub use matcher::{
    AreaTradeTemplate, Catalog, CatalogItem, CatalogQuestion, find_area_trade_templates,
    get_area_trade_checklist_items, get_area_trade_questions,
};
