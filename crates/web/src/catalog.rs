//! In-memory warehouse catalog and company/warehouse reference data.
//!
//! The catalog is loaded once at startup and never mutated. It feeds the
//! selection table and is the only producer of cart candidates: a catalog
//! entry plus a requested quantity yields a fully-formed line item with
//! composite allocations pre-seeded to their default ratios.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use almacen_core::{CompanyCode, ItemId, LineItem, Quantity, SubItem, WarehouseCode};

/// One stock location/batch a catalog entry can be fulfilled from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAllocation {
    /// Stock location.
    pub location: String,
    /// Batch identifier/description.
    pub batch: String,
    /// Stock available at this location/batch.
    pub available: u32,
    /// Baseline per-unit ratio for this allocation.
    pub default_quantity: u32,
}

/// A warehouse article as listed in the selection table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Catalog identifier.
    pub id: ItemId,
    /// Article code.
    pub code: String,
    /// Article name.
    pub name: String,
    /// Article description.
    pub description: String,
    /// Total available stock; `None` for composite entries, whose balance
    /// is derived from the allocations instead.
    pub balance: Option<u32>,
    /// Stock allocations; empty for simple entries.
    pub stock: Vec<StockAllocation>,
}

impl CatalogEntry {
    /// Whether this entry is fulfilled from multiple allocations.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        !self.stock.is_empty()
    }

    /// Build a cart candidate for this entry.
    ///
    /// Simple entries carry the requested quantity directly. Composite
    /// entries carry it as the scaling multiplier while every allocation
    /// starts at its default ratio, which is what the cart's rescale rule
    /// expects.
    #[must_use]
    pub fn to_line_item(&self, quantity: Quantity) -> LineItem {
        if self.is_composite() {
            let sub_items = self
                .stock
                .iter()
                .map(|stock| {
                    SubItem::seeded(
                        stock.location.clone(),
                        stock.batch.clone(),
                        stock.available,
                        Quantity::clamp(i64::from(stock.default_quantity)),
                    )
                })
                .collect();
            LineItem::composite(
                self.id.clone(),
                self.code.clone(),
                self.name.clone(),
                self.description.clone(),
                quantity,
                sub_items,
            )
        } else {
            LineItem::simple(
                self.id.clone(),
                self.code.clone(),
                self.name.clone(),
                self.description.clone(),
                self.balance,
                quantity,
            )
        }
    }

    /// Whether the entry matches a free-text search over code, description,
    /// and allocation locations.
    fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.code.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self
                .stock
                .iter()
                .any(|stock| stock.location.to_lowercase().contains(&needle))
    }
}

/// A warehouse a company can transfer from or to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub code: WarehouseCode,
    pub label: String,
}

impl Warehouse {
    fn new(code: &str, label: &str) -> Self {
        Self {
            code: WarehouseCode::new(code),
            label: label.to_string(),
        }
    }
}

/// A company and the warehouses assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub code: CompanyCode,
    pub label: String,
    /// Warehouses material can be drawn from.
    pub origins: Vec<Warehouse>,
    /// Warehouses material can be delivered to.
    pub destinations: Vec<Warehouse>,
}

/// Sort modes offered by the selection-table dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogSort {
    #[default]
    CodeAsc,
    CodeDesc,
    DescriptionAsc,
    DescriptionDesc,
    BalanceAsc,
    BalanceDesc,
}

impl CatalogSort {
    /// All sort modes, in dropdown order.
    pub const ALL: [Self; 6] = [
        Self::CodeAsc,
        Self::CodeDesc,
        Self::DescriptionAsc,
        Self::DescriptionDesc,
        Self::BalanceAsc,
        Self::BalanceDesc,
    ];

    /// Query-parameter key for this mode.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CodeAsc => "codigo_asc",
            Self::CodeDesc => "codigo_desc",
            Self::DescriptionAsc => "descripcion_asc",
            Self::DescriptionDesc => "descripcion_desc",
            Self::BalanceAsc => "saldo_asc",
            Self::BalanceDesc => "saldo_desc",
        }
    }

    /// Dropdown label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CodeAsc => "Código (A-Z)",
            Self::CodeDesc => "Código (Z-A)",
            Self::DescriptionAsc => "Descripción (A-Z)",
            Self::DescriptionDesc => "Descripción (Z-A)",
            Self::BalanceAsc => "Saldo (Menor a Mayor)",
            Self::BalanceDesc => "Saldo (Mayor a Menor)",
        }
    }
}

impl FromStr for CatalogSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.key() == s)
            .ok_or_else(|| format!("invalid catalog sort: {s}"))
    }
}

/// The full reference data set: articles plus companies/warehouses.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    companies: Vec<Company>,
}

impl Catalog {
    /// Load the built-in demo catalog.
    #[must_use]
    pub fn seed() -> Self {
        Self {
            entries: seed_entries(),
            companies: seed_companies(),
        }
    }

    /// All catalog entries.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    /// Search and sort entries for the selection table.
    #[must_use]
    pub fn search(&self, query: &str, sort: CatalogSort) -> Vec<&CatalogEntry> {
        let mut matches: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|entry| query.trim().is_empty() || entry.matches(query.trim()))
            .collect();

        // Entries without a balance sort after everything with one, in
        // either direction, mirroring how the table shows them as "-".
        match sort {
            CatalogSort::CodeAsc => matches.sort_by(|a, b| a.code.cmp(&b.code)),
            CatalogSort::CodeDesc => matches.sort_by(|a, b| b.code.cmp(&a.code)),
            CatalogSort::DescriptionAsc => {
                matches.sort_by(|a, b| a.description.cmp(&b.description));
            }
            CatalogSort::DescriptionDesc => {
                matches.sort_by(|a, b| b.description.cmp(&a.description));
            }
            CatalogSort::BalanceAsc => {
                matches.sort_by_key(|entry| entry.balance.map_or(u64::from(u32::MAX) + 1, u64::from));
            }
            CatalogSort::BalanceDesc => {
                matches.sort_by_key(|entry| {
                    entry.balance.map_or(i64::from(u32::MAX) + 1, |b| -i64::from(b))
                });
            }
        }

        matches
    }

    /// All companies the user can request for.
    #[must_use]
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// Look up a company by code.
    #[must_use]
    pub fn company(&self, code: &CompanyCode) -> Option<&Company> {
        self.companies.iter().find(|company| &company.code == code)
    }

    /// Display label for a warehouse code, searched across all companies.
    #[must_use]
    pub fn warehouse_label(&self, code: &WarehouseCode) -> Option<&str> {
        self.companies
            .iter()
            .flat_map(|company| company.origins.iter().chain(company.destinations.iter()))
            .find(|warehouse| &warehouse.code == code)
            .map(|warehouse| warehouse.label.as_str())
    }

    /// Destination options for a company, excluding the chosen origin.
    #[must_use]
    pub fn destination_options(
        &self,
        company: &CompanyCode,
        origin: Option<&WarehouseCode>,
    ) -> Vec<&Warehouse> {
        self.company(company).map_or_else(Vec::new, |company| {
            company
                .destinations
                .iter()
                .filter(|warehouse| Some(&warehouse.code) != origin)
                .collect()
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

// =============================================================================
// Seed Data
// =============================================================================

fn seed_entries() -> Vec<CatalogEntry> {
    fn simple(id: &str, code: &str, description: &str, balance: u32) -> CatalogEntry {
        CatalogEntry {
            id: ItemId::new(id),
            code: code.to_string(),
            name: code.to_string(),
            description: description.to_string(),
            balance: Some(balance),
            stock: Vec::new(),
        }
    }

    vec![
        simple("1", "2-1065", "GANCHO S PARA HERRAJE DE...", 96),
        CatalogEntry {
            id: ItemId::new("2"),
            code: "2-2100".to_string(),
            name: "2-2100".to_string(),
            description: "VM2_11_2".to_string(),
            balance: None,
            stock: vec![
                StockAllocation {
                    location: "2-2100".to_string(),
                    batch: "GRAPA DE HORQUILLA, CERCA DE 1 1/4 X 9".to_string(),
                    available: 50,
                    default_quantity: 14,
                },
                StockAllocation {
                    location: "2-2100".to_string(),
                    batch: "GRAPA CONEXION A VARILLA".to_string(),
                    available: 50,
                    default_quantity: 6,
                },
            ],
        },
        simple("3", "2-2140", "POSTES DE MADERA 25 PIES,...", 125),
        CatalogEntry {
            id: ItemId::new("4"),
            code: "2-2150".to_string(),
            name: "2-2150".to_string(),
            description: "POSTES DE MADERA 30 PIES,...".to_string(),
            balance: Some(14),
            stock: vec![StockAllocation {
                location: "Patio Exterior".to_string(),
                batch: "LOTE-P01".to_string(),
                available: 14,
                default_quantity: 1,
            }],
        },
        simple("5", "2-2340", "REGULADOR DE VOLTAGE 100...", 3),
        simple("6", "2-2500", "VARILLA CONEXION A TIERRA...", 2),
        simple("7", "2-2647", "TUBO HG DE 2 PULGADAS (1.5...", 7),
    ]
}

fn seed_companies() -> Vec<Company> {
    let central = Warehouse::new("ALM001", "Almacén Central - San José");
    let norte = Warehouse::new("ALM002", "Almacén Norte - Alajuela");
    let sur = Warehouse::new("ALM003", "Almacén Sur - Cartago");
    let este = Warehouse::new("ALM004", "Almacén Este - Limón");
    let oeste = Warehouse::new("ALM005", "Almacén Oeste - Puntarenas");
    let guanacaste = Warehouse::new("ALM006", "Almacén Regional Guanacaste");
    let heredia = Warehouse::new("ALM007", "Almacén Heredia Centro");
    let perez = Warehouse::new("ALM008", "Almacén Pérez Zeledón");
    let liberia = Warehouse::new("ALM009", "Almacén Liberia");
    let turrialba = Warehouse::new("ALM010", "Almacén Turrialba");

    vec![
        Company {
            code: CompanyCode::new("CPL"),
            label: "CPL - COOPELESCA R.L.".to_string(),
            origins: vec![central.clone(), norte.clone(), sur.clone()],
            destinations: vec![
                central.clone(),
                norte.clone(),
                sur.clone(),
                este.clone(),
                oeste.clone(),
            ],
        },
        Company {
            code: CompanyCode::new("HDJ"),
            label: "HDJ - HIDROELECT. DOÑA JULIA SRL".to_string(),
            origins: vec![guanacaste.clone()],
            destinations: vec![guanacaste.clone(), liberia.clone()],
        },
        Company {
            code: CompanyCode::new("CCU"),
            label: "CCU - CONSORCIO COOP. CUBUJUQUI R.L.".to_string(),
            origins: vec![heredia.clone(), turrialba.clone()],
            destinations: vec![heredia, turrialba.clone()],
        },
        Company {
            code: CompanyCode::new("TVN"),
            label: "TVN - T.V. NORTE CANAL CATORCE S.A.".to_string(),
            origins: vec![norte],
            destinations: vec![liberia],
        },
        Company {
            code: CompanyCode::new("GEG"),
            label: "GEG - GREEN ENERGY GROUP".to_string(),
            origins: vec![perez.clone()],
            destinations: vec![perez, turrialba],
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn candidate_construction_seeds_default_quantities() {
        let catalog = Catalog::seed();
        let entry = catalog.get(&ItemId::new("2")).unwrap();

        let item = entry.to_line_item(Quantity::clamp(2));
        assert!(item.is_composite());
        assert_eq!(item.multiplier().get(), 2);

        let quantities: Vec<u32> = item.sub_items().iter().map(|s| s.quantity.get()).collect();
        assert_eq!(quantities, [14, 6], "allocations start at their defaults");
    }

    #[test]
    fn simple_candidate_carries_balance_and_quantity() {
        let catalog = Catalog::seed();
        let entry = catalog.get(&ItemId::new("1")).unwrap();

        let item = entry.to_line_item(Quantity::clamp(3));
        assert!(!item.is_composite());
        assert_eq!(item.balance(), Some(96));
        assert_eq!(item.requested_quantity(), 3);
    }

    #[test]
    fn search_matches_code_description_and_location() {
        let catalog = Catalog::seed();

        let by_code = catalog.search("2-21", CatalogSort::CodeAsc);
        assert!(by_code.iter().any(|e| e.code == "2-2100"));
        assert!(by_code.iter().any(|e| e.code == "2-2140"));

        let by_description = catalog.search("postes", CatalogSort::CodeAsc);
        assert_eq!(by_description.len(), 2);

        let by_location = catalog.search("patio", CatalogSort::CodeAsc);
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].code, "2-2150");
    }

    #[test]
    fn balance_sort_puts_unknown_balance_last() {
        let catalog = Catalog::seed();

        let ascending = catalog.search("", CatalogSort::BalanceAsc);
        assert_eq!(ascending.first().unwrap().code, "2-2500");
        assert_eq!(ascending.last().unwrap().code, "2-2100");

        let descending = catalog.search("", CatalogSort::BalanceDesc);
        assert_eq!(descending.first().unwrap().code, "2-2140");
        assert_eq!(descending.last().unwrap().code, "2-2100");
    }

    #[test]
    fn destination_options_exclude_the_origin() {
        let catalog = Catalog::seed();
        let cpl = CompanyCode::new("CPL");
        let origin = WarehouseCode::new("ALM001");

        let options = catalog.destination_options(&cpl, Some(&origin));
        assert_eq!(options.len(), 4);
        assert!(options.iter().all(|w| w.code != origin));

        let unfiltered = catalog.destination_options(&cpl, None);
        assert_eq!(unfiltered.len(), 5);
    }

    #[test]
    fn sort_keys_round_trip() {
        for sort in CatalogSort::ALL {
            let parsed: CatalogSort = sort.key().parse().unwrap();
            assert_eq!(parsed, sort);
        }
    }
}
