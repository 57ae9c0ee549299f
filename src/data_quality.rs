// ✅ Data Quality Engine - Curated tables vs. scraped content
//
// Substring resolution hides two kinds of data gaps:
// - a curated name matched by more than one category table (first table wins
//   silently)
// - an item requirement that resolves by substring but is not a curated name,
//   so the aggregator never counts it
// This pass makes both visible, together with the unclassified lines,
// uncategorized items and skipped rows of a run.

use crate::entities::{Category, CategoryCatalog, Module};
use crate::parser::{ParseError, UncategorizedItem, UnclassifiedLine};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// QUALITY ISSUE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Content is lost from the document
    Warning,  // Content is kept but may be counted wrong
    Info,     // Curated data could be tidier
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub subject: String,
    pub issue: String,
    pub recommendation: String,
}

/// Row left out of the document under the skip-row policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub module: String,
    pub level: u32,
    pub reason: String,
}

impl From<&ParseError> for SkippedRow {
    fn from(err: &ParseError) -> Self {
        SkippedRow {
            module: err.module().to_string(),
            level: err.level(),
            reason: err.to_string(),
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub issues: Vec<QualityIssue>,
    pub unclassified: Vec<UnclassifiedLine>,
    pub uncategorized: Vec<UncategorizedItem>,
    pub skipped_rows: Vec<SkippedRow>,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        format!(
            "{} unclassified lines, {} uncategorized items, {} skipped rows, {} issues ({} warnings)",
            self.unclassified.len(),
            self.uncategorized.len(),
            self.skipped_rows.len(),
            self.issues.len(),
            self.count(Severity::Warning)
        )
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Nothing needs attention
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
            && self.unclassified.is_empty()
            && self.uncategorized.is_empty()
            && self.skipped_rows.is_empty()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.count(Severity::Critical) > 0
    }

    /// Distinct uncategorized item names, first-seen order
    pub fn uncategorized_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.uncategorized
            .iter()
            .map(|u| u.item.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct DataQualityEngine;

impl DataQualityEngine {
    pub fn new() -> Self {
        DataQualityEngine
    }

    /// Overlapping and duplicated curated names
    pub fn check_catalog(&self, catalog: &CategoryCatalog) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        for table in catalog.tables() {
            let mut seen = HashSet::new();
            for item in &table.items {
                if !seen.insert(item.as_str()) {
                    issues.push(QualityIssue {
                        severity: Severity::Info,
                        subject: item.clone(),
                        issue: format!("Listed more than once in {}", table.category),
                        recommendation: "Remove the duplicate entry".to_string(),
                    });
                    continue;
                }

                let matches = catalog.matching_categories(item);
                if matches.len() > 1 {
                    issues.push(QualityIssue {
                        severity: Severity::Warning,
                        subject: item.clone(),
                        issue: format!("Matches {} category tables: {}", matches.len(), join(&matches)),
                        recommendation: format!(
                            "Make the curated names distinct; {} currently wins",
                            matches[0]
                        ),
                    });
                }
            }
        }

        issues
    }

    /// Item requirements the aggregator will not count
    pub fn check_modules(&self, catalog: &CategoryCatalog, modules: &[Module]) -> Vec<QualityIssue> {
        let mut reported = HashSet::new();
        let mut issues = Vec::new();

        for module in modules {
            for requirement in &module.item_requirements {
                if catalog.is_curated(&requirement.item) || !reported.insert(requirement.item.as_str()) {
                    continue;
                }

                issues.push(QualityIssue {
                    severity: Severity::Warning,
                    subject: requirement.item.clone(),
                    issue: format!(
                        "Resolved to {} but is not a curated name; its quantities are left out of the totals",
                        requirement.category
                    ),
                    recommendation: format!(
                        "Add \"{}\" to the {} table",
                        requirement.item,
                        requirement.category
                    ),
                });
            }
        }

        issues
    }

    /// Full report for one run
    pub fn report(
        &self,
        catalog: &CategoryCatalog,
        modules: &[Module],
        unclassified: Vec<UnclassifiedLine>,
        uncategorized: Vec<UncategorizedItem>,
        skipped_rows: Vec<SkippedRow>,
    ) -> QualityReport {
        let mut issues = self.check_catalog(catalog);
        issues.extend(self.check_modules(catalog, modules));

        for skipped in &skipped_rows {
            issues.push(QualityIssue {
                severity: Severity::Critical,
                subject: format!("{} level {}", skipped.module, skipped.level),
                issue: skipped.reason.clone(),
                recommendation: "Fix the quantity on the source page or in the scraped rows".to_string(),
            });
        }

        QualityReport {
            issues,
            unclassified,
            uncategorized,
            skipped_rows,
        }
    }
}

fn join(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CuratedTable, ItemRequirement, RequirementKind};
    use crate::parser::QuantityError;

    #[test]
    fn test_default_catalog_is_clean() {
        let engine = DataQualityEngine::new();

        let issues = engine.check_catalog(&CategoryCatalog::with_defaults());

        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_overlap_is_flagged() {
        let engine = DataQualityEngine::new();
        let catalog = CategoryCatalog::from_tables(vec![
            CuratedTable::new(Category::Valuable, &["Gold"]),
            CuratedTable::new(Category::Hardware, &["Gold chain"]),
        ]);

        let issues = engine.check_catalog(&catalog);

        // "Gold chain" contains "Gold", so it resolves to valuable
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].subject, "Gold chain");
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].issue.contains("valuable_items, hardware_items"));
    }

    #[test]
    fn test_duplicate_is_flagged() {
        let engine = DataQualityEngine::new();
        let catalog = CategoryCatalog::from_tables(vec![CuratedTable::new(
            Category::Medical,
            &["LEDX", "LEDX"],
        )]);

        let issues = engine.check_catalog(&catalog);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn test_uncounted_requirement_is_flagged_once() {
        let engine = DataQualityEngine::new();
        let catalog = CategoryCatalog::with_defaults();
        let mut module = Module::new("Intelligence Center", 1);
        for _ in 0..2 {
            module.push(RequirementKind::Item(ItemRequirement::new(
                "Printed Circuit Board (PCB)".to_string(),
                1,
                Category::Electronic,
            )));
        }
        module.push(RequirementKind::Item(ItemRequirement::new(
            "Wires".to_string(),
            2,
            Category::Electronic,
        )));

        let issues = engine.check_modules(&catalog, &[module]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].subject, "Printed Circuit Board (PCB)");
    }

    #[test]
    fn test_report_counts() {
        let engine = DataQualityEngine::new();
        let catalog = CategoryCatalog::with_defaults();
        let error = ParseError::MalformedQuantity {
            module: "Stash".to_string(),
            level: 2,
            source: QuantityError {
                line: "1O Bolts".to_string(),
                token: "1O".to_string(),
            },
        };

        let report = engine.report(
            &catalog,
            &[],
            vec![UnclassifiedLine {
                module: "Lavatory".to_string(),
                level: 1,
                text: "Complete quest X".to_string(),
            }],
            vec![
                UncategorizedItem {
                    module: "Bitcoin Farm".to_string(),
                    level: 1,
                    item: "Graphics card".to_string(),
                    need: 1,
                },
                UncategorizedItem {
                    module: "Bitcoin Farm".to_string(),
                    level: 2,
                    item: "Graphics card".to_string(),
                    need: 10,
                },
            ],
            vec![SkippedRow::from(&error)],
        );

        assert!(!report.is_clean());
        assert!(report.has_critical_issues());
        assert_eq!(report.uncategorized_names(), vec!["Graphics card"]);
        assert_eq!(report.skipped_rows[0].module, "Stash");
        assert!(report.summary().starts_with("1 unclassified lines, 2 uncategorized items, 1 skipped rows"));
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = QualityReport::default();

        assert!(report.is_clean());
        assert!(!report.has_critical_issues());
    }
}
