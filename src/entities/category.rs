// 🏷️ Category Entity - Curated material categories
//
// Every item requirement belongs to exactly one material category. Membership
// is decided by curated tables: ordered lists of canonical item names that are
// tested as substrings of the scraped item name.
//
// The tables are configuration, not globals. A `CategoryCatalog` is built once
// (from defaults or from a config file) and handed to the parser and the
// aggregator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "valuable_items")]
    Valuable,

    #[serde(rename = "hardware_items")]
    Hardware,

    #[serde(rename = "medical_items")]
    Medical,

    #[serde(rename = "electronic_items")]
    Electronic,
}

impl Category {
    /// Fixed resolution precedence
    pub const ALL: [Category; 4] = [
        Category::Valuable,
        Category::Hardware,
        Category::Medical,
        Category::Electronic,
    ];

    /// Key used in the hideout document
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Valuable => "valuable_items",
            Category::Hardware => "hardware_items",
            Category::Medical => "medical_items",
            Category::Electronic => "electronic_items",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CURATED TABLE
// ============================================================================

/// Hand-maintained list of canonical item names for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuratedTable {
    pub category: Category,

    /// Canonical item names, in display order
    pub items: Vec<String>,
}

impl CuratedTable {
    pub fn new(category: Category, items: &[&str]) -> Self {
        CuratedTable {
            category,
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// First curated entry contained in `item_name`
    pub fn matching_entry(&self, item_name: &str) -> Option<&str> {
        self.items
            .iter()
            .map(String::as_str)
            .find(|entry| !entry.is_empty() && item_name.contains(entry))
    }

    pub fn contains_match(&self, item_name: &str) -> bool {
        self.matching_entry(item_name).is_some()
    }
}

// ============================================================================
// CATEGORY CATALOG (the resolver)
// ============================================================================

/// Ordered set of curated tables.
///
/// Resolution walks the tables in order and returns the first category whose
/// table has an entry contained in the item name. `None` means uncategorized;
/// the caller reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCatalog {
    tables: Vec<CuratedTable>,
}

impl CategoryCatalog {
    /// Create catalog from tables, kept in the given order
    pub fn from_tables(tables: Vec<CuratedTable>) -> Self {
        CategoryCatalog { tables }
    }

    /// Catalog with the built-in curated tables
    pub fn with_defaults() -> Self {
        CategoryCatalog::from_tables(default_tables())
    }

    pub fn resolve(&self, item_name: &str) -> Option<Category> {
        self.tables
            .iter()
            .find(|table| table.contains_match(item_name))
            .map(|table| table.category)
    }

    /// Every category whose table matches `item_name`, in precedence order.
    /// More than one entry means the curated tables overlap.
    pub fn matching_categories(&self, item_name: &str) -> Vec<Category> {
        self.tables
            .iter()
            .filter(|table| table.contains_match(item_name))
            .map(|table| table.category)
            .collect()
    }

    /// Exact curated-name lookup (no substring matching)
    pub fn is_curated(&self, item_name: &str) -> bool {
        self.tables
            .iter()
            .any(|t| t.items.iter().any(|i| i == item_name))
    }

    pub fn tables(&self) -> &[CuratedTable] {
        &self.tables
    }

    pub fn item_count(&self) -> usize {
        self.tables.iter().map(|t| t.items.len()).sum()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// ITEM ALIASES
// ============================================================================

/// Page spelling → curated name, applied before resolution
pub type ItemAliases = BTreeMap<String, String>;

pub fn default_aliases() -> ItemAliases {
    let mut aliases = ItemAliases::new();
    aliases.insert("Roubles".to_string(), "Rubles".to_string());
    aliases
}

// ============================================================================
// DEFAULT TABLES
// ============================================================================

fn default_tables() -> Vec<CuratedTable> {
    vec![
        CuratedTable::new(
            Category::Valuable,
            &[
                "Rubles",
                "USD",
                "Euro",
                "Bronze lion",
                "Chainlet",
                "Golden neck chain",
                "Gold skull ring",
                "Horse figurine",
                "Roler Submariner gold wrist watch",
                "Diary",
                "Slim diary",
                "Folder with Intelligence",
                "Factory plan map",
                "Tech manual",
                "Coffee Majaica",
                "Fierce Hatchling moonshine",
                "Lucky Scav Junk box",
                "Christmas tree ornament (Red)",
                "Christmas tree ornament (White)",
                "Christmas tree ornament (Violet)",
            ],
        ),
        CuratedTable::new(
            Category::Hardware,
            &[
                "A pack of nails",
                "A pack of screws",
                "Toolset",
                "Bolts",
                "Screw Nut",
                "Bulbex cable cutter",
                "Corrugated Hose",
                "Dry Fuel",
                "Duct Tape",
                "KEKTAPE",
                "TP-200 TNT brick",
                "Construction measuring tape",
                "Electric Drill",
                "Hand Drill",
                "Pliers Elite",
                "Leatherman Multitool",
                "FireKlean Gun Lube",
                "WD-40 (100ml)",
                "Can of thermite",
                "Metal Spare Parts",
                "Military corrugated tube",
                "Silicone tube",
                "Pipe grip wrench",
                "Ratchet wrench",
                "Wrench",
                "Pressure Gauge",
                "Analog Thermometer",
                "Radiator Helix",
                "Shustrilo sealing foam",
                "Xenomorph sealing foam",
                "Smoked Chimney drain cleaner",
                "Alkaline cleaner for heat exchangers",
                "Sodium Bicarbonate",
                "Spark plug",
                "Air filter for gas mask",
                "Classic matches",
                "Hunting matches",
                "Crickent lighter",
                "Toilet paper",
                "Toothpaste",
                "Soap",
            ],
        ),
        CuratedTable::new(
            Category::Medical,
            &[
                "Aseptic bandage",
                "Disposable syringe",
                "Esmarch tourniquet",
                "LEDX",
                "Medical Bloodset",
                "Medical tools",
                "Opthalmoscope",
                "Pile of meds",
                "Saline Solution",
            ],
        ),
        CuratedTable::new(
            Category::Electronic,
            &[
                "6-STEN-140-M military battery",
                "GreenBat lithium battery",
                "Car Battery",
                "CPU Fan",
                "Capacitors",
                "DVD drive",
                "Damaged hard drive",
                "SSD Drive",
                "Secure Flash Drive",
                "Secured magnetic tape cassette",
                "VPX Flash Storage Module",
                "Energy-saving lamp",
                "Light Bulb",
                "Electric Motor",
                "Gas Analyzer",
                "Magnet",
                "Military COFDM",
                "Military cable",
                "Military power filter",
                "NIXXOR lens",
                "Phase Control Relay",
                "Phased Array Element",
                "Power Supply Unit",
                "Powercord",
                "Printed Circuit Board",
                "T-Shaped plug",
                "Working LCD",
                "Wires",
            ],
        ),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
