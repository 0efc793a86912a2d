//! The request cart: line items selected for one transfer request.
//!
//! The cart owns the ordered list of selected items and enforces the
//! quantity and merge rules. It performs no I/O and raises no errors:
//! invalid numeric input is clamped, unknown ids are ignored, and callers
//! are responsible for triggering persistence (autosave) after each
//! mutating call.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Quantity};

/// One stock location/batch allocation within a composite line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    /// Stock location the allocation is drawn from.
    pub location: String,
    /// Batch identifier/description within the location.
    pub batch: String,
    /// Stock available at this location/batch. Advisory upper bound only:
    /// the request may exceed it, which is surfaced as a warning.
    pub available: u32,
    /// Currently requested quantity for this allocation.
    pub quantity: Quantity,
    /// Baseline per-unit ratio used when the parent quantity changes.
    pub default_quantity: Quantity,
}

impl SubItem {
    /// Create an allocation with its quantity seeded to the default ratio.
    ///
    /// This is the candidate-construction contract: the catalog hands the
    /// cart sub-items that already carry `quantity == default_quantity`.
    #[must_use]
    pub fn seeded(
        location: impl Into<String>,
        batch: impl Into<String>,
        available: u32,
        default_quantity: Quantity,
    ) -> Self {
        Self {
            location: location.into(),
            batch: batch.into(),
            available,
            quantity: default_quantity,
            default_quantity,
        }
    }

    /// Whether the requested quantity exceeds the available stock.
    #[must_use]
    pub const fn exceeds_available(&self) -> bool {
        self.quantity.get() > self.available
    }

    /// Merge identity: allocations match on `(location, batch)`.
    fn matches(&self, other: &Self) -> bool {
        self.location == other.location && self.batch == other.batch
    }
}

/// The simple/composite variant of a line item, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineItemKind {
    /// A plain catalog item fulfilled from a single stock pool.
    Simple {
        /// Total available stock, when the catalog knows it.
        balance: Option<u32>,
        /// Requested quantity.
        quantity: Quantity,
    },
    /// An item fulfilled from multiple stock locations/batches.
    Composite {
        /// The scaling multiplier: editing it rescales every sub-item to
        /// `default_quantity * multiplier`. Merging adds to it. The
        /// displayed aggregate quantity is derived from the sub-items
        /// instead (see [`LineItem::requested_quantity`]).
        quantity: Quantity,
        /// Ordered stock allocations.
        sub_items: Vec<SubItem>,
    },
}

/// A single entry in the request cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog identifier, unique within the cart.
    pub id: ItemId,
    /// Catalog code as displayed.
    pub code: String,
    /// Item name.
    pub name: String,
    /// Item description.
    pub description: String,
    /// Simple or composite payload.
    #[serde(flatten)]
    pub kind: LineItemKind,
}

impl LineItem {
    /// Create a simple line item.
    #[must_use]
    pub fn simple(
        id: impl Into<ItemId>,
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        balance: Option<u32>,
        quantity: Quantity,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            description: description.into(),
            kind: LineItemKind::Simple { balance, quantity },
        }
    }

    /// Create a composite line item from its seeded allocations.
    #[must_use]
    pub fn composite(
        id: impl Into<ItemId>,
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        quantity: Quantity,
        sub_items: Vec<SubItem>,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            description: description.into(),
            kind: LineItemKind::Composite {
                quantity,
                sub_items,
            },
        }
    }

    /// Whether this item is fulfilled from multiple allocations.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self.kind, LineItemKind::Composite { .. })
    }

    /// The aggregate requested quantity.
    ///
    /// For composite items this is the sum of the sub-item quantities,
    /// recomputed on every read rather than stored redundantly.
    #[must_use]
    pub fn requested_quantity(&self) -> u32 {
        match &self.kind {
            LineItemKind::Simple { quantity, .. } => quantity.get(),
            LineItemKind::Composite { sub_items, .. } => sub_items
                .iter()
                .fold(0u32, |sum, sub| sum.saturating_add(sub.quantity.get())),
        }
    }

    /// The total available stock, derived for composite items.
    #[must_use]
    pub fn balance(&self) -> Option<u32> {
        match &self.kind {
            LineItemKind::Simple { balance, .. } => *balance,
            LineItemKind::Composite { sub_items, .. } => Some(
                sub_items
                    .iter()
                    .fold(0u32, |sum, sub| sum.saturating_add(sub.available)),
            ),
        }
    }

    /// The editable quantity shown next to the item: the simple quantity,
    /// or the composite scaling multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> Quantity {
        match &self.kind {
            LineItemKind::Simple { quantity, .. }
            | LineItemKind::Composite { quantity, .. } => *quantity,
        }
    }

    /// The sub-item allocations, empty for simple items.
    #[must_use]
    pub fn sub_items(&self) -> &[SubItem] {
        match &self.kind {
            LineItemKind::Simple { .. } => &[],
            LineItemKind::Composite { sub_items, .. } => sub_items,
        }
    }

    /// Whether any allocation requests more than its available stock.
    #[must_use]
    pub fn has_over_request(&self) -> bool {
        self.sub_items().iter().any(SubItem::exceeds_available)
    }

    /// Merge a candidate with the same id into this item.
    ///
    /// Precondition: both sides have the same shape. The catalog produces
    /// one fixed shape per id, so a mismatch means corrupt upstream data;
    /// it is asserted in debug builds and ignored in release.
    fn merge(&mut self, candidate: Self) {
        match (&mut self.kind, candidate.kind) {
            (
                LineItemKind::Simple { quantity, .. },
                LineItemKind::Simple {
                    quantity: added, ..
                },
            ) => {
                *quantity = quantity.saturating_add(added);
            }
            (
                LineItemKind::Composite {
                    quantity,
                    sub_items,
                },
                LineItemKind::Composite {
                    quantity: added,
                    sub_items: candidates,
                },
            ) => {
                for sub in candidates {
                    match sub_items.iter_mut().find(|existing| existing.matches(&sub)) {
                        Some(existing) => {
                            existing.quantity = existing.quantity.saturating_add(sub.quantity);
                        }
                        None => sub_items.push(sub),
                    }
                }
                // Keep the multiplier in step so a later parent edit
                // rescales from the accumulated total.
                *quantity = quantity.saturating_add(added);
            }
            (_, candidate_kind) => {
                debug_assert!(
                    false,
                    "catalog produced mismatched shapes for item {}: candidate was {candidate_kind:?}",
                    self.id
                );
            }
        }
    }
}

/// The ordered collection of line items for one in-progress request.
///
/// Items keep their insertion order; re-adding an existing id merges into
/// the item in place instead of appending or reordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCart {
    items: Vec<LineItem>,
}

impl RequestCart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a fully-formed candidate to the cart.
    ///
    /// A new id is appended; an existing id merges: simple items sum
    /// quantities, composite items sum matching `(location, batch)`
    /// allocations, append unmatched ones, and accumulate the scaling
    /// multiplier.
    pub fn add_item(&mut self, candidate: LineItem) {
        match self.items.iter_mut().find(|item| item.id == candidate.id) {
            Some(existing) => existing.merge(candidate),
            None => self.items.push(candidate),
        }
    }

    /// Remove the item with the given id. No-op when absent.
    pub fn remove_item(&mut self, id: &ItemId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Set a new quantity for an item or one of its allocations.
    ///
    /// `raw` is clamped to `>= 1` before applying. With `sub_index` on a
    /// composite item, that allocation's quantity is set directly. Without
    /// it, a composite item's multiplier is set and every allocation is
    /// rescaled to `default_quantity * multiplier`, superseding any manual
    /// allocation edits. Simple items set their quantity directly.
    ///
    /// Unknown ids and out-of-range sub-indices are ignored.
    pub fn update_quantity(&mut self, id: &ItemId, raw: i64, sub_index: Option<usize>) {
        let clamped = Quantity::clamp(raw);
        let Some(item) = self.items.iter_mut().find(|item| &item.id == id) else {
            return;
        };

        match (&mut item.kind, sub_index) {
            (LineItemKind::Simple { quantity, .. }, _) => {
                *quantity = clamped;
            }
            (LineItemKind::Composite { sub_items, .. }, Some(index)) => {
                if let Some(sub) = sub_items.get_mut(index) {
                    sub.quantity = clamped;
                }
            }
            (
                LineItemKind::Composite {
                    quantity,
                    sub_items,
                },
                None,
            ) => {
                *quantity = clamped;
                for sub in sub_items.iter_mut() {
                    sub.quantity = sub.default_quantity.saturating_mul(clamped);
                }
            }
        }
    }

    /// The items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether the cart holds an item with the given id.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Number of line items (merged items count once).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the aggregate requested quantities across all items.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.requested_quantity()))
    }
}
