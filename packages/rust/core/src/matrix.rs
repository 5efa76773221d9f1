//! Area × trade matrix built from estimate scope records.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use smartcheck_catalog::{classify_area, classify_trade};
use smartcheck_shared::{AreaType, ScopeRecord, TradeType};

/// Key used when a scope record has neither title nor id.
const UNASSIGNED_KEY: &str = "unassigned";

/// One keyed area of the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixArea {
    pub key: String,
    #[serde(rename = "type")]
    pub area_type: AreaType,
    pub source_scope_id: String,
}

/// The trades observed for one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaTradeScope {
    pub area_key: String,
    pub trades: BTreeSet<TradeType>,
}

/// Areas in first-seen order, each with the set of trades touching it.
///
/// `areas[i].key == scopes[i].area_key` for every index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaTradeMatrix {
    pub areas: Vec<MatrixArea>,
    pub scopes: Vec<AreaTradeScope>,
}

impl AreaTradeMatrix {
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn area(&self, key: &str) -> Option<&MatrixArea> {
        self.areas.iter().find(|a| a.key == key)
    }

    pub fn trades_for(&self, key: &str) -> Option<&BTreeSet<TradeType>> {
        self.scopes
            .iter()
            .find(|s| s.area_key == key)
            .map(|s| &s.trades)
    }

    /// `(area, trades)` pairs in area order.
    pub fn entries(&self) -> impl Iterator<Item = (&MatrixArea, &BTreeSet<TradeType>)> {
        self.areas.iter().zip(self.scopes.iter().map(|s| &s.trades))
    }
}

/// Incremental builder keeping `areas` and `scopes` index-aligned.
#[derive(Default)]
struct MatrixBuilder {
    matrix: AreaTradeMatrix,
    index: HashMap<String, usize>,
}

impl MatrixBuilder {
    /// Index of the area keyed `key`, creating it on first sight.
    fn ensure_area(&mut self, key: &str, source_scope_id: &str) -> usize {
        if let Some(&idx) = self.index.get(key) {
            return idx;
        }
        let idx = self.matrix.areas.len();
        self.matrix.areas.push(MatrixArea {
            key: key.to_string(),
            area_type: classify_area(key),
            source_scope_id: source_scope_id.to_string(),
        });
        self.matrix.scopes.push(AreaTradeScope {
            area_key: key.to_string(),
            trades: BTreeSet::new(),
        });
        self.index.insert(key.to_string(), idx);
        idx
    }

    fn add_trade(&mut self, idx: usize, trade: TradeType) {
        self.matrix.scopes[idx].trades.insert(trade);
    }
}

fn record_key(record: &ScopeRecord) -> &str {
    let title = record.title.trim();
    if !title.is_empty() {
        return title;
    }
    let id = record.id.trim();
    if !id.is_empty() {
        return id;
    }
    UNASSIGNED_KEY
}

/// Build the area × trade matrix.
///
/// Every record contributes an area keyed by its trimmed title. Items with
/// an area label also resolve (or create) an area for that label. A cost
/// item with a classifiable trade adds it to the record's area and, when
/// different, to its labelled area.
#[instrument(skip_all, fields(records = scope_records.len()))]
pub fn build_area_trade_matrix(scope_records: &[ScopeRecord]) -> AreaTradeMatrix {
    let mut builder = MatrixBuilder::default();

    for record in scope_records {
        let key = record_key(record);
        let record_idx = builder.ensure_area(key, &record.id);

        for item in &record.cost_items {
            let label_idx = item
                .area()
                .map(|label| builder.ensure_area(label, &record.id))
                .filter(|&idx| idx != record_idx);

            let Some(trade) = classify_trade(&item.code_text()) else {
                continue;
            };
            builder.add_trade(record_idx, trade);
            if let Some(idx) = label_idx {
                builder.add_trade(idx, trade);
            }
        }
    }

    let matrix = builder.matrix;
    debug!(
        areas = matrix.areas.len(),
        trades = matrix.scopes.iter().map(|s| s.trades.len()).sum::<usize>(),
        "area/trade matrix built"
    );
    matrix
}
