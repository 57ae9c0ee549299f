// 🏷️ Rename Rules - Module names as data
// The wiki names the same module differently across levels; these rules map
// the known variants to one canonical display name.

use crate::entities::Module;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameRule {
    /// Rule ID for tracking
    pub id: String,

    /// Case-insensitive fragment to look for (supports wildcards with *)
    pub pattern: String,

    /// Canonical module name
    pub replacement: String,

    /// Description/notes about this rule
    #[serde(default)]
    pub description: Option<String>,
}

impl RenameRule {
    pub fn new(id: &str, pattern: &str, replacement: &str) -> Self {
        RenameRule {
            id: id.to_string(),
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
            description: None,
        }
    }

    /// Check if pattern occurs in the given name
    pub fn matches(&self, name: &str) -> bool {
        let pattern = self.pattern.to_lowercase();
        let name = name.to_lowercase();

        if !pattern.contains('*') {
            return !pattern.is_empty() && name.contains(&pattern);
        }

        // Wildcard: every literal part in order, anywhere in the name
        let mut rest = name.as_str();
        for part in pattern.split('*').filter(|p| !p.is_empty()) {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
        true
    }
}

// ============================================================================
// NAME NORMALIZER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct NameNormalizer {
    rules: Vec<RenameRule>,
}

/// Rename applied to one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub rule_id: String,
    pub from: String,
    pub to: String,
}

impl NameNormalizer {
    /// Normalizer with the built-in rename table
    pub fn with_defaults() -> Self {
        Self::from_rules(default_rules())
    }

    /// Load rules from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rename rules file: {:?}", path.as_ref()))?;

        let rules: Vec<RenameRule> =
            serde_json::from_str(&content).context("Failed to parse rename rules JSON")?;

        Ok(NameNormalizer::from_rules(rules))
    }

    /// Create normalizer from a list of rules, evaluated in list order
    pub fn from_rules(rules: Vec<RenameRule>) -> Self {
        NameNormalizer { rules }
    }

    /// Canonical name, or None when no rule applies
    pub fn canonical_name(&self, name: &str) -> Option<&RenameRule> {
        self.rules.iter().find(|rule| rule.matches(name))
    }

    /// Rename every module in place; first matching rule wins
    pub fn normalize(&self, modules: &mut [Module]) -> Vec<Rename> {
        let mut renames = Vec::new();

        for module in modules.iter_mut() {
            let Some(rule) = self.canonical_name(&module.name) else {
                continue;
            };
            if module.name == rule.replacement {
                continue;
            }

            tracing::debug!(rule = %rule.id, from = %module.name, to = %rule.replacement, "renamed module");
            renames.push(Rename {
                rule_id: rule.id.clone(),
                from: std::mem::replace(&mut module.name, rule.replacement.clone()),
                to: rule.replacement.clone(),
            });
        }

        renames
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

pub fn default_rules() -> Vec<RenameRule> {
    vec![
        RenameRule::new("air_filtering_unit", "filter absorber", "Air Filtering Unit"),
        RenameRule::new("water_collector", "Water filter", "Water Collector"),
        RenameRule::new("christmas_tree", "christmas", "Christmas Tree"),
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_substring_match() {
        let rule = RenameRule::new("afu", "filter absorber", "Air Filtering Unit");

        assert!(rule.matches("Air filter absorber"));
        assert!(rule.matches("AIR FILTER ABSORBER"));
        assert!(!rule.matches("Water filter"));
    }

    #[test]
    fn test_wildcard_pattern() {
        let rule = RenameRule::new("wc", "water*filter", "Water Collector");

        assert!(rule.matches("Water filter"));
        assert!(rule.matches("Water purification filter"));
        assert!(!rule.matches("filter water"));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        let rule = RenameRule::new("empty", "", "Nothing");

        assert!(!rule.matches("Stash"));
    }

    #[test]
    fn test_default_renames() {
        let normalizer = NameNormalizer::with_defaults();
        let mut modules = vec![
            Module::new("Air filter absorber", 1),
            Module::new("Water filter", 1),
            Module::new("christmas tree", 1),
            Module::new("Stash", 2),
        ];

        let renames = normalizer.normalize(&mut modules);

        let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Air Filtering Unit", "Water Collector", "Christmas Tree", "Stash"]);
        assert_eq!(renames.len(), 3);
        assert_eq!(renames[0].from, "Air filter absorber");
        assert_eq!(renames[0].rule_id, "air_filtering_unit");
    }

    #[test]
    fn test_already_canonical_is_not_reported() {
        let normalizer = NameNormalizer::with_defaults();
        let mut modules = vec![Module::new("Christmas Tree", 1)];

        let renames = normalizer.normalize(&mut modules);

        assert!(renames.is_empty());
        assert_eq!(modules[0].name, "Christmas Tree");
    }

    #[test]
    fn test_first_rule_wins() {
        let normalizer = NameNormalizer::from_rules(vec![
            RenameRule::new("first", "filter", "First"),
            RenameRule::new("second", "water filter", "Second"),
        ]);

        let mut modules = vec![Module::new("Water filter", 1)];
        normalizer.normalize(&mut modules);

        assert_eq!(modules[0].name, "First");
    }

    #[test]
    fn test_load_rules_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "gen", "pattern": "power gen", "replacement": "Generator"}}]"#
        )
        .unwrap();

        let normalizer = NameNormalizer::from_file(file.path()).unwrap();

        assert_eq!(normalizer.rule_count(), 1);
        assert_eq!(
            normalizer.canonical_name("Power gen unit").map(|r| r.replacement.as_str()),
            Some("Generator")
        );
    }

    #[test]
    fn test_bad_rules_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(NameNormalizer::from_file(file.path()).is_err());
    }
}
