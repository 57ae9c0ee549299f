// 🏠 Hideout Document - Build pipeline
//
// rows → parse (per module level) → rename → filter → aggregate → document
//
// The builder owns no I/O. It takes scraped rows and returns the document
// together with the reports a caller needs to keep curated data in sync.

use crate::aggregation::{aggregate_catalog, AggregateError, CategoryTotal, CategoryTotals};
use crate::config::{ExtractConfig, MalformedPolicy};
use crate::data_quality::{DataQualityEngine, QualityReport, SkippedRow};
use crate::entities::Module;
use crate::parser::{ParseError, RequirementParser};
use crate::reference::{ReferenceCounts, ReferenceTables};
use crate::rules::{NameNormalizer, Rename};
use crate::source::{fingerprint, RawModuleRow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

// ============================================================================
// DOCUMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideoutDocument {
    pub percentage: u32,
    pub valuable_items: Vec<CategoryTotal>,
    pub medical_items: Vec<CategoryTotal>,
    pub electronic_items: Vec<CategoryTotal>,
    pub hardware_items: Vec<CategoryTotal>,
    pub hideout_version: String,
    pub modules: Vec<Module>,
}

impl HideoutDocument {
    pub fn new(version: impl Into<String>, modules: Vec<Module>, totals: CategoryTotals) -> Self {
        HideoutDocument {
            percentage: 0,
            valuable_items: totals.valuable_items,
            medical_items: totals.medical_items,
            electronic_items: totals.electronic_items,
            hardware_items: totals.hardware_items,
            hideout_version: version.into(),
            modules,
        }
    }

    pub fn module(&self, name: &str, level: u32) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name && m.level == level)
    }
}

// ============================================================================
// RUN SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub hideout_version: String,
    pub date: NaiveDate,
    pub items: usize,
    pub traders: usize,
    pub skills: usize,
    pub modules: usize,
    pub requirements: usize,
    pub unclassified: usize,
    pub uncategorized: usize,
    pub skipped_rows: usize,
    pub fingerprint: String,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "v{} ({}): {} items, {} traders, {} skills, {} modules, {} requirements | {} unclassified, {} uncategorized, {} skipped",
            self.hideout_version,
            self.date,
            self.items,
            self.traders,
            self.skills,
            self.modules,
            self.requirements,
            self.unclassified,
            self.uncategorized,
            self.skipped_rows
        )
    }
}

/// Everything one build produces
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub document: HideoutDocument,
    pub reference: ReferenceTables,
    pub quality: QualityReport,
    pub renames: Vec<Rename>,
    pub summary: RunSummary,
}

// ============================================================================
// BUILDER
// ============================================================================

pub struct HideoutBuilder {
    config: ExtractConfig,
    parser: RequirementParser,
    normalizer: NameNormalizer,
    quality: DataQualityEngine,
}

impl HideoutBuilder {
    pub fn new(config: ExtractConfig) -> Self {
        let parser = config.parser();
        let normalizer = config.normalizer();

        HideoutBuilder {
            config,
            parser,
            normalizer,
            quality: DataQualityEngine::new(),
        }
    }

    /// Build the document for `version` as of today
    pub fn build(&self, version: &str, rows: &[RawModuleRow]) -> Result<BuildOutput, BuildError> {
        self.build_on(version, chrono::Local::now().date_naive(), rows)
    }

    /// Same as `build` with an explicit run date
    pub fn build_on(
        &self,
        version: &str,
        date: NaiveDate,
        rows: &[RawModuleRow],
    ) -> Result<BuildOutput, BuildError> {
        let mut modules = Vec::with_capacity(rows.len());
        let mut unclassified = Vec::new();
        let mut uncategorized = Vec::new();
        let mut skipped_rows = Vec::new();

        // 1. Parse
        for row in rows {
            match self.parser.parse_row(row) {
                Ok(parsed) => {
                    modules.push(parsed.module);
                    unclassified.extend(parsed.unclassified);
                    uncategorized.extend(parsed.uncategorized);
                }
                Err(err) if self.config.on_malformed == MalformedPolicy::SkipRow => {
                    tracing::warn!(error = %err, "skipping module row");
                    skipped_rows.push(SkippedRow::from(&err));
                }
                Err(err) => return Err(err.into()),
            }
        }

        // 2. Canonical names
        let renames = self.normalizer.normalize(&mut modules);

        // 3. Filters
        let filter = &self.config.filter;
        let before = modules.len();
        modules.retain(|m| filter.keeps(m));
        if modules.len() != before {
            tracing::debug!(dropped = before - modules.len(), "filtered module levels");
        }

        // 4. Totals over the modules that made it into the document
        let mut totals = aggregate_catalog(&self.config.categories, &modules)?;
        if !filter.include_seasonal {
            totals.retain_items(|t| !filter.is_seasonal(&t.item));
        }

        let reference = ReferenceTables::from_rows(self.parser.classifier(), rows);
        let counts: ReferenceCounts = reference.counts();

        let quality = self.quality.report(
            &self.config.categories,
            &modules,
            unclassified,
            uncategorized,
            skipped_rows,
        );

        let summary = RunSummary {
            hideout_version: version.to_string(),
            date,
            items: counts.items,
            traders: counts.traders,
            skills: counts.skills,
            modules: counts.modules,
            requirements: modules.iter().map(Module::requirement_count).sum(),
            unclassified: quality.unclassified.len(),
            uncategorized: quality.uncategorized.len(),
            skipped_rows: quality.skipped_rows.len(),
            fingerprint: fingerprint(rows),
        };

        tracing::info!(
            modules = modules.len(),
            unclassified = summary.unclassified,
            uncategorized = summary.uncategorized,
            "built hideout document"
        );

        Ok(BuildOutput {
            document: HideoutDocument::new(version, modules, totals),
            reference,
            quality,
            renames,
            summary,
        })
    }
}

impl Default for HideoutBuilder {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleFilter;
    use crate::entities::Category;

    fn sample_rows() -> Vec<RawModuleRow> {
        vec![
            RawModuleRow::new("Stash", 1, &["Standard Edition purchase"]),
            RawModuleRow::new("Stash", 2, &["2,500,000 Rubles", "Level 1 Lavatory"]),
            RawModuleRow::new(
                "Lavatory",
                1,
                &["50000 Rubles", "Prapor LL1", "Metabolism Level 2", "Level 1 Security"],
            ),
            RawModuleRow::new("Air filter absorber", 1, &["3 Wires", "Complete quest X"]),
            RawModuleRow::new("christmas tree", 1, &["1 Christmas tree ornament (Red)", "10000 Rubles"]),
            RawModuleRow::new("Bitcoin Farm", 1, &["1 Graphics card", "10 Wires"]),
        ]
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 24).unwrap()
    }

    #[test]
    fn test_build_document() {
        let builder = HideoutBuilder::default();

        let output = builder.build_on("0.15", date(), &sample_rows()).unwrap();
        let doc = &output.document;

        // Stash 1 and the seasonal module are dropped
        assert_eq!(doc.modules.len(), 4);
        assert!(doc.module("Stash", 1).is_none());
        assert!(doc.modules.iter().all(|m| !m.name.contains("Christmas")));

        // Renamed before filtering
        assert!(doc.module("Air Filtering Unit", 1).is_some());
        assert_eq!(output.renames.len(), 2);

        let lavatory = doc.module("Lavatory", 1).unwrap();
        assert_eq!(lavatory.item_requirements[0].need, 50000);
        assert_eq!(lavatory.loyalty_requirements[0].item, "Prapor, 1");

        assert_eq!(doc.hideout_version, "0.15");
        assert_eq!(doc.percentage, 0);
    }

    #[test]
    fn test_totals_follow_document_modules() {
        let builder = HideoutBuilder::default();

        let output = builder.build_on("0.15", date(), &sample_rows()).unwrap();
        let doc = &output.document;

        let rubles = doc.valuable_items.iter().find(|t| t.item == "Rubles").unwrap();
        assert_eq!(rubles.total, 2_550_000);
        assert_eq!(rubles.remaining, 2_550_000);

        let wires = doc.electronic_items.iter().find(|t| t.item == "Wires").unwrap();
        assert_eq!(wires.total, 13);

        // Seasonal curated items are dropped with the seasonal module
        assert!(doc.valuable_items.iter().all(|t| !t.item.contains("Christmas")));
    }

    #[test]
    fn test_include_seasonal() {
        let mut config = ExtractConfig::default();
        config.filter = ModuleFilter {
            include_seasonal: true,
            ..ModuleFilter::default()
        };
        let builder = HideoutBuilder::new(config);

        let output = builder.build_on("0.15", date(), &sample_rows()).unwrap();
        let doc = &output.document;

        assert!(doc.module("Christmas Tree", 1).is_some());
        let ornament = doc
            .valuable_items
            .iter()
            .find(|t| t.item == "Christmas tree ornament (Red)")
            .unwrap();
        assert_eq!(ornament.total, 1);
    }

    #[test]
    fn test_reports() {
        let builder = HideoutBuilder::default();

        let output = builder.build_on("0.15", date(), &sample_rows()).unwrap();

        let unclassified: Vec<&str> = output.quality.unclassified.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(unclassified, vec!["Standard Edition purchase", "Complete quest X"]);
        assert_eq!(output.quality.uncategorized_names(), vec!["Graphics card"]);

        let summary = &output.summary;
        assert_eq!(summary.unclassified, 2);
        assert_eq!(summary.uncategorized, 1);
        assert_eq!(summary.skipped_rows, 0);
        assert_eq!(summary.traders, 1);
        assert_eq!(summary.skills, 1);
        assert_eq!(summary.modules, 2);
        // Stash 2: 2, Lavatory 1: 4, Air Filtering Unit 1: 1, Bitcoin Farm 1: 1
        assert_eq!(summary.requirements, 8);
        assert_eq!(summary.date, date());
        assert_eq!(summary.fingerprint.len(), 64);
    }

    #[test]
    fn test_malformed_quantity_aborts_by_default() {
        let builder = HideoutBuilder::default();
        let rows = vec![
            RawModuleRow::new("Vents", 1, &["1 Wires"]),
            RawModuleRow::new("Vents", 2, &["1O Wires"]),
        ];

        let err = builder.build_on("0.15", date(), &rows).unwrap_err();

        match err {
            BuildError::Parse(err) => {
                assert_eq!(err.module(), "Vents");
                assert_eq!(err.level(), 2);
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_totals_abort_the_build() {
        let builder = HideoutBuilder::default();
        let rows = vec![
            RawModuleRow::new("Stash", 2, &["10000000000000000000 Rubles"]),
            RawModuleRow::new("Stash", 3, &["10000000000000000000 Rubles"]),
        ];

        let err = builder.build_on("0.15", date(), &rows).unwrap_err();

        assert!(matches!(err, BuildError::Aggregate(ref e) if e.item == "Rubles" && e.level == 3));
    }

    #[test]
    fn test_malformed_quantity_skip_row() {
        let mut config = ExtractConfig::default();
        config.on_malformed = MalformedPolicy::SkipRow;
        let builder = HideoutBuilder::new(config);
        let rows = vec![
            RawModuleRow::new("Vents", 1, &["1 Wires"]),
            RawModuleRow::new("Vents", 2, &["1O Wires"]),
        ];

        let output = builder.build_on("0.15", date(), &rows).unwrap();

        assert_eq!(output.document.modules.len(), 1);
        assert_eq!(output.summary.skipped_rows, 1);
        assert!(output.quality.has_critical_issues());
    }

    #[test]
    fn test_document_json_shape() {
        let builder = HideoutBuilder::default();
        let rows = vec![RawModuleRow::new("Medstation", 1, &["1 LEDX"])];

        let output = builder.build_on("0.15", date(), &rows).unwrap();
        let value = serde_json::to_value(&output.document).unwrap();

        assert_eq!(value["percentage"], 0);
        assert_eq!(value["hideout_version"], "0.15");
        assert_eq!(value["modules"][0]["module"], "Medstation");
        assert_eq!(value["modules"][0]["item_requirements"][0]["category"], "medical_items");
        assert!(value["medical_items"].as_array().unwrap().iter().any(|t| t["item"] == "LEDX" && t["total"] == 1));
        assert_eq!(Category::ALL.len(), 4);
    }

    #[test]
    fn test_empty_rows() {
        let builder = HideoutBuilder::default();

        let output = builder.build_on("0.15", date(), &[]).unwrap();

        assert!(output.document.modules.is_empty());
        assert_eq!(output.document.valuable_items.iter().map(|t| t.total).sum::<u64>(), 0);
        assert!(output.quality.is_clean());
    }
}
