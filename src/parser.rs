// 🏗️ Requirement Parser - Raw lines → typed requirements
//
// Each requirement line of one module level is classified, then turned into a
// record:
//   "Prapor LL1"          → Loyalty  "Prapor, 1"
//   "Metabolism Level 2"  → Skill    "Metabolism Level, 2"
//   "Level 1 Security"    → Module   "Security, 1"
//   "50,000 Rubles"       → Item     { item: "Rubles", need: 50000, .. }
//
// Unknown shapes and items without a curated category are reported, never
// dropped. A quantity that is not a number is an error for the row.

use crate::classifier::{LineClassifier, LineKind};
use crate::entities::{
    default_aliases, CategoryCatalog, ItemAliases, ItemRequirement, LoyaltyRequirement, Module,
    ModuleRequirement, RequirementKind, SkillRequirement,
};
use crate::source::RawModuleRow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Leading token of an item line is not a quantity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed quantity {token:?} in {line:?}")]
pub struct QuantityError {
    pub line: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{module} level {level}: {source}")]
    MalformedQuantity {
        module: String,
        level: u32,
        #[source]
        source: QuantityError,
    },
}

impl ParseError {
    pub fn module(&self) -> &str {
        match self {
            ParseError::MalformedQuantity { module, .. } => module,
        }
    }

    pub fn level(&self) -> u32 {
        match self {
            ParseError::MalformedQuantity { level, .. } => *level,
        }
    }
}

// ============================================================================
// REPORT ENTRIES
// ============================================================================

/// Item line whose name matched no curated table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncategorizedItem {
    pub module: String,
    pub level: u32,
    pub item: String,
    pub need: u64,
}

/// Line that fit none of the four shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnclassifiedLine {
    pub module: String,
    pub level: u32,
    pub text: String,
}

// ============================================================================
// PARSE RESULTS
// ============================================================================

/// Outcome of a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Requirement(RequirementKind),
    Uncategorized { item: String, need: u64 },
    Unclassified(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRequirements {
    pub item_requirements: Vec<ItemRequirement>,
    pub skill_requirements: Vec<SkillRequirement>,
    pub module_requirements: Vec<ModuleRequirement>,
    pub loyalty_requirements: Vec<LoyaltyRequirement>,
    pub uncategorized: Vec<UncategorizedItem>,
    pub unclassified: Vec<UnclassifiedLine>,
}

impl ParsedRequirements {
    /// Build the module level; the reports stay behind
    pub fn to_module(&self, name: &str, level: u32) -> Module {
        let mut module = Module::new(name, level);
        module.item_requirements = self.item_requirements.clone();
        module.skill_requirements = self.skill_requirements.clone();
        module.module_requirements = self.module_requirements.clone();
        module.loyalty_requirements = self.loyalty_requirements.clone();
        module
    }
}

/// One scraped row, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModule {
    pub module: Module,
    pub uncategorized: Vec<UncategorizedItem>,
    pub unclassified: Vec<UnclassifiedLine>,
}

// ============================================================================
// REQUIREMENT PARSER
// ============================================================================

#[derive(Debug, Clone)]
pub struct RequirementParser {
    classifier: LineClassifier,
    catalog: CategoryCatalog,
    aliases: ItemAliases,
}

impl RequirementParser {
    pub fn new(classifier: LineClassifier, catalog: CategoryCatalog) -> Self {
        RequirementParser {
            classifier,
            catalog,
            aliases: ItemAliases::new(),
        }
    }

    /// Parser with default tokens, curated tables and aliases
    pub fn with_defaults() -> Self {
        Self::new(LineClassifier::default(), CategoryCatalog::with_defaults())
            .with_aliases(default_aliases())
    }

    /// Item names (exact) rewritten to their curated spelling
    pub fn with_aliases(mut self, aliases: ItemAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Classify and parse one line
    pub fn parse_line(&self, line: &str) -> Result<ParsedLine, QuantityError> {
        let text = line.trim();
        let kw = self.classifier.config().level_keyword.as_str();

        let parsed = match self.classifier.classify(text) {
            LineKind::Trader => self
                .classifier
                .trader_parts(text)
                .map(|(name, level)| {
                    ParsedLine::Requirement(RequirementKind::Loyalty(LoyaltyRequirement {
                        item: format!("{}, {}", name, level),
                    }))
                }),
            LineKind::Skill => self.classifier.skill_parts(text).map(|(name, level)| {
                ParsedLine::Requirement(RequirementKind::Skill(SkillRequirement {
                    item: format!("{} {}, {}", name, kw, level),
                }))
            }),
            LineKind::Module => self.classifier.module_parts(text).map(|(name, level)| {
                ParsedLine::Requirement(RequirementKind::Module(ModuleRequirement {
                    item: format!("{}, {}", name, level),
                }))
            }),
            LineKind::Item => match self.classifier.item_parts(text) {
                Some((token, name)) => Some(self.parse_item(text, token, name)?),
                None => None,
            },
            LineKind::Unclassified => None,
        };

        Ok(parsed.unwrap_or_else(|| ParsedLine::Unclassified(text.to_string())))
    }

    fn parse_item(&self, line: &str, token: &str, name: &str) -> Result<ParsedLine, QuantityError> {
        let need = parse_quantity(token).ok_or_else(|| QuantityError {
            line: line.to_string(),
            token: token.to_string(),
        })?;
        let name = self.aliases.get(name).map_or(name, String::as_str);

        Ok(match self.catalog.resolve(name) {
            Some(category) => ParsedLine::Requirement(RequirementKind::Item(ItemRequirement::new(
                name.to_string(),
                need,
                category,
            ))),
            None => ParsedLine::Uncategorized {
                item: name.to_string(),
                need,
            },
        })
    }

    /// Parse every requirement line of one module level
    pub fn parse<S: AsRef<str>>(
        &self,
        lines: &[S],
        module: &str,
        level: u32,
    ) -> Result<ParsedRequirements, ParseError> {
        let mut parsed = ParsedRequirements::default();

        for line in lines {
            let line: &str = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }

            let outcome = self
                .parse_line(line)
                .map_err(|source| ParseError::MalformedQuantity {
                    module: module.to_string(),
                    level,
                    source,
                })?;

            match outcome {
                ParsedLine::Requirement(RequirementKind::Item(r)) => parsed.item_requirements.push(r),
                ParsedLine::Requirement(RequirementKind::Skill(r)) => parsed.skill_requirements.push(r),
                ParsedLine::Requirement(RequirementKind::Module(r)) => {
                    parsed.module_requirements.push(r)
                }
                ParsedLine::Requirement(RequirementKind::Loyalty(r)) => {
                    parsed.loyalty_requirements.push(r)
                }
                ParsedLine::Uncategorized { item, need } => {
                    tracing::warn!(module, level, item = %item, "item has no curated category");
                    parsed.uncategorized.push(UncategorizedItem {
                        module: module.to_string(),
                        level,
                        item,
                        need,
                    });
                }
                ParsedLine::Unclassified(text) => {
                    tracing::debug!(module, level, line = %text, "unclassified requirement line");
                    parsed.unclassified.push(UnclassifiedLine {
                        module: module.to_string(),
                        level,
                        text,
                    });
                }
            }
        }

        Ok(parsed)
    }

    /// Parse a scraped row into its module level plus reports
    pub fn parse_row(&self, row: &RawModuleRow) -> Result<ParsedModule, ParseError> {
        let parsed = self.parse(&row.lines, &row.module, row.level)?;
        let module = parsed.to_module(&row.module, row.level);

        Ok(ParsedModule {
            module,
            uncategorized: parsed.uncategorized,
            unclassified: parsed.unclassified,
        })
    }
}

impl Default for RequirementParser {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// "395,000" → 395000
pub fn parse_quantity(token: &str) -> Option<u64> {
    let digits: String = token.chars().filter(|c| *c != ',').collect();
    digits.parse().ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, CuratedTable};

    // Test-only helper: total across the four structured requirement lists
    impl ParsedRequirements {
        fn structured_count(&self) -> usize {
            self.item_requirements.len()
                + self.skill_requirements.len()
                + self.module_requirements.len()
                + self.loyalty_requirements.len()
        }
    }

    #[test]
    fn test_parse_lavatory_example() {
        let parser = RequirementParser::with_defaults();
        let lines = ["50000 Rubles", "Prapor LL1", "Metabolism Level 2", "Level 1 Security"];

        let parsed = parser.parse(&lines, "Lavatory", 1).unwrap();

        assert_eq!(
            parsed.item_requirements,
            vec![ItemRequirement {
                complete: false,
                need: 50000,
                category: Category::Valuable,
                have: 0,
                item: "Rubles".to_string(),
            }]
        );
        assert_eq!(parsed.loyalty_requirements[0].item, "Prapor, 1");
        assert_eq!(parsed.skill_requirements[0].item, "Metabolism Level, 2");
        assert_eq!(parsed.module_requirements[0].item, "Security, 1");
        assert!(parsed.unclassified.is_empty());
        assert!(parsed.uncategorized.is_empty());
    }

    #[test]
    fn test_each_line_lands_in_one_list() {
        let parser = RequirementParser::with_defaults();
        let lines = ["2 Bolts", "Skier LL2", "Endurance Level 1", "Level 2 Generator", "Complete quest X"];

        let parsed = parser.parse(&lines, "Workbench", 2).unwrap();

        assert_eq!(parsed.structured_count() + parsed.unclassified.len(), lines.len());
        assert_eq!(parsed.unclassified.len(), 1);
    }

    #[test]
    fn test_thousands_separator() {
        let parser = RequirementParser::with_defaults();

        let parsed = parser.parse(&["2,500,000 Rubles"], "Stash", 4).unwrap();

        assert_eq!(parsed.item_requirements[0].need, 2_500_000);
    }

    #[test]
    fn test_multi_word_module_name() {
        let parser = RequirementParser::with_defaults();

        let parsed = parser.parse(&["Level 1 Intelligence Center"], "Library", 1).unwrap();

        assert_eq!(parsed.module_requirements[0].item, "Intelligence Center, 1");
    }

    #[test]
    fn test_unclassified_line_is_reported() {
        let parser = RequirementParser::with_defaults();

        let parsed = parser.parse(&["Complete quest X"], "Lavatory", 1).unwrap();

        assert_eq!(parsed.structured_count(), 0);
        assert_eq!(
            parsed.unclassified,
            vec![UnclassifiedLine {
                module: "Lavatory".to_string(),
                level: 1,
                text: "Complete quest X".to_string(),
            }]
        );
    }

    #[test]
    fn test_uncategorized_item_is_excluded_but_reported() {
        let parser = RequirementParser::with_defaults();

        let parsed = parser.parse(&["3 Graphics card"], "Bitcoin Farm", 1).unwrap();

        assert!(parsed.item_requirements.is_empty());
        assert_eq!(parsed.uncategorized.len(), 1);
        assert_eq!(parsed.uncategorized[0].item, "Graphics card");
        assert_eq!(parsed.uncategorized[0].need, 3);
    }

    #[test]
    fn test_malformed_quantity_is_an_error() {
        let parser = RequirementParser::with_defaults();

        let err = parser.parse(&["1O,000 Rubles"], "Stash", 2).unwrap_err();

        assert_eq!(err.module(), "Stash");
        assert_eq!(err.level(), 2);
        match err {
            ParseError::MalformedQuantity { source, .. } => assert_eq!(source.token, "1O,000"),
        }
    }

    #[test]
    fn test_quantity_overflow_is_an_error() {
        let parser = RequirementParser::with_defaults();

        assert!(parser.parse(&["99999999999999999999999 Rubles"], "Stash", 2).is_err());
    }

    #[test]
    fn test_page_spelling_counts_as_curated_name() {
        let parser = RequirementParser::with_defaults();

        let parsed = parser.parse(&["395,000 Roubles"], "Stash", 3).unwrap();

        assert!(parsed.uncategorized.is_empty());
        assert_eq!(
            parsed.item_requirements,
            vec![ItemRequirement::new("Rubles".to_string(), 395_000, Category::Valuable)]
        );
    }

    #[test]
    fn test_blank_lines_skipped() {
        let parser = RequirementParser::with_defaults();

        let parsed = parser.parse(&["", "   ", "  1 LEDX  "], "Medstation", 3).unwrap();

        assert_eq!(parsed.item_requirements.len(), 1);
        assert_eq!(parsed.item_requirements[0].item, "LEDX");
        assert!(parsed.unclassified.is_empty());
    }

    #[test]
    fn test_synthetic_catalog() {
        let catalog = CategoryCatalog::from_tables(vec![CuratedTable::new(Category::Medical, &["Herb"])]);
        let parser = RequirementParser::new(LineClassifier::default(), catalog);

        let parsed = parser.parse(&["4 Herb", "1 Rubles"], "Garden", 1).unwrap();

        assert_eq!(parsed.item_requirements.len(), 1);
        assert_eq!(parsed.item_requirements[0].category, Category::Medical);
        assert_eq!(parsed.uncategorized[0].item, "Rubles");
    }

    #[test]
    fn test_parse_row() {
        let parser = RequirementParser::with_defaults();
        let row = RawModuleRow {
            module: "Vents".to_string(),
            level: 2,
            lines: vec!["1 Air filter for gas mask".to_string(), "Mechanic LL1".to_string()],
        };

        let parsed = parser.parse_row(&row).unwrap();

        assert_eq!(parsed.module.name, "Vents");
        assert_eq!(parsed.module.level, 2);
        assert_eq!(parsed.module.item_requirements[0].category, Category::Hardware);
        assert_eq!(parsed.module.loyalty_requirements[0].item, "Mechanic, 1");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("395,000"), Some(395000));
        assert_eq!(parse_quantity("7"), Some(7));
        assert_eq!(parse_quantity("x7"), None);
        assert_eq!(parse_quantity(""), None);
    }
}
