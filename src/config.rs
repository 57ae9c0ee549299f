// ⚙️ Extraction Config - Everything that is data, not logic
//
// Curated tables, classifier tokens, rename rules and module filters live in
// one JSON document. Every section is optional and falls back to the
// built-in defaults.

use crate::classifier::{ClassifierConfig, LineClassifier};
use crate::entities::{default_aliases, CategoryCatalog, ItemAliases, Module};
use crate::parser::RequirementParser;
use crate::rules::{default_rules, NameNormalizer, RenameRule};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// MODULE FILTER
// ============================================================================

/// One (module, level) row left out of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedLevel {
    pub module: String,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleFilter {
    /// Keep seasonal modules and seasonal curated items
    pub include_seasonal: bool,

    /// Case-insensitive marker of seasonal content
    pub seasonal_keyword: String,

    /// Levels every player owns from the start
    pub excluded_levels: Vec<ExcludedLevel>,
}

impl Default for ModuleFilter {
    fn default() -> Self {
        ModuleFilter {
            include_seasonal: false,
            seasonal_keyword: "Christmas".to_string(),
            excluded_levels: vec![ExcludedLevel {
                module: "Stash".to_string(),
                level: 1,
            }],
        }
    }
}

impl ModuleFilter {
    pub fn is_seasonal(&self, name: &str) -> bool {
        !self.seasonal_keyword.is_empty()
            && name.to_lowercase().contains(&self.seasonal_keyword.to_lowercase())
    }

    /// Whether a module level stays in the document
    pub fn keeps(&self, module: &Module) -> bool {
        if !self.include_seasonal && self.is_seasonal(&module.name) {
            return false;
        }

        !self
            .excluded_levels
            .iter()
            .any(|e| e.module == module.name && e.level == module.level)
    }
}

// ============================================================================
// MALFORMED QUANTITY POLICY
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Stop the run at the first malformed quantity
    #[default]
    Abort,

    /// Leave the row out and report it
    SkipRow,
}

// ============================================================================
// EXTRACT CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub classifier: ClassifierConfig,
    pub categories: CategoryCatalog,
    pub aliases: ItemAliases,
    pub renames: Vec<RenameRule>,
    pub filter: ModuleFilter,
    pub on_malformed: MalformedPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            classifier: ClassifierConfig::default(),
            categories: CategoryCatalog::with_defaults(),
            aliases: default_aliases(),
            renames: default_rules(),
            filter: ModuleFilter::default(),
            on_malformed: MalformedPolicy::default(),
        }
    }
}

impl ExtractConfig {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse config JSON")
    }

    pub fn parser(&self) -> RequirementParser {
        RequirementParser::new(
            LineClassifier::new(self.classifier.clone()),
            self.categories.clone(),
        )
        .with_aliases(self.aliases.clone())
    }

    pub fn normalizer(&self) -> NameNormalizer {
        NameNormalizer::from_rules(self.renames.clone())
    }
}
