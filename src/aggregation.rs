// ➕ Aggregation - Per-category material totals
//
// For every curated item name: total = Σ need over every item requirement of
// every module whose item equals that name exactly.
//
// Totals are a derived view. They hold no state of their own and can be
// recomputed from the current module set at any time.

use crate::entities::{Category, CategoryCatalog, Module};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Summed quantity of one item does not fit in a `u64`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("total for {item:?} overflows at {module} level {level}")]
pub struct AggregateError {
    pub item: String,
    pub module: String,
    pub level: u32,
}

// ============================================================================
// CATEGORY TOTAL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub item: String,
    pub priority: bool,
    pub remaining: u64,
    pub total: u64,
}

impl CategoryTotal {
    pub fn new(item: impl Into<String>, total: u64) -> Self {
        CategoryTotal {
            item: item.into(),
            priority: false,
            remaining: total,
            total,
        }
    }
}

/// Totals for one curated list, in curated order.
/// Curated items nobody needs yield a zero total.
pub fn aggregate(curated: &[String], modules: &[Module]) -> Result<Vec<CategoryTotal>, AggregateError> {
    let needs = sum_needs(modules)?;

    Ok(curated
        .iter()
        .map(|item| CategoryTotal::new(item.as_str(), needs.get(item.as_str()).copied().unwrap_or(0)))
        .collect())
}

fn sum_needs(modules: &[Module]) -> Result<HashMap<&str, u64>, AggregateError> {
    let mut needs: HashMap<&str, u64> = HashMap::new();
    for module in modules {
        for requirement in &module.item_requirements {
            let total = needs.entry(requirement.item.as_str()).or_insert(0);
            *total = total.checked_add(requirement.need).ok_or_else(|| AggregateError {
                item: requirement.item.clone(),
                module: module.name.clone(),
                level: module.level,
            })?;
        }
    }
    Ok(needs)
}

// ============================================================================
// CATEGORY TOTALS
// ============================================================================

/// Totals for every category of the hideout document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub valuable_items: Vec<CategoryTotal>,
    pub medical_items: Vec<CategoryTotal>,
    pub electronic_items: Vec<CategoryTotal>,
    pub hardware_items: Vec<CategoryTotal>,
}

impl CategoryTotals {
    fn get_mut(&mut self, category: Category) -> &mut Vec<CategoryTotal> {
        match category {
            Category::Valuable => &mut self.valuable_items,
            Category::Medical => &mut self.medical_items,
            Category::Electronic => &mut self.electronic_items,
            Category::Hardware => &mut self.hardware_items,
        }
    }

    /// Keep only totals accepted by `keep`, in every category
    pub fn retain_items<F>(&mut self, mut keep: F)
    where
        F: FnMut(&CategoryTotal) -> bool,
    {
        for category in Category::ALL {
            self.get_mut(category).retain(|t| keep(t));
        }
    }
}

/// Run `aggregate` for every category table of the catalog
pub fn aggregate_catalog(catalog: &CategoryCatalog, modules: &[Module]) -> Result<CategoryTotals, AggregateError> {
    let mut totals = CategoryTotals::default();
    for table in catalog.tables() {
        totals
            .get_mut(table.category)
            .extend(aggregate(&table.items, modules)?);
    }
    Ok(totals)
}

// ============================================================================
// TESTS
// ============================================================================
