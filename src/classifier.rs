// 🔎 Line Classifier - Lexical shape of a requirement line
//
// Wiki list entries come in four shapes:
//   "Prapor LL2"                 → Trader
//   "Endurance Level 2"          → Skill
//   "Level 1 Intelligence Center"→ Module
//   "50,000 Rubles"              → Item
// Anything else is Unclassified and gets reported.
//
// Shapes are tested through an ordered rule table. First match wins.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// LINE KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    Item,
    Trader,
    Skill,
    Module,
    Unclassified,
}

impl LineKind {
    pub fn name(&self) -> &'static str {
        match self {
            LineKind::Item => "item",
            LineKind::Trader => "trader",
            LineKind::Skill => "skill",
            LineKind::Module => "module",
            LineKind::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Fixed tokens the classifier looks for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Trader standing marker, "LL" in "Prapor LL2"
    pub loyalty_marker: String,

    /// Keyword shared by skill and module lines
    pub level_keyword: String,

    /// Line standing alone between two alternative requirements
    pub alternative_marker: String,

    /// Case-insensitive phrases of non-material prerequisites (game editions)
    pub excluded_phrases: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            loyalty_marker: "LL".to_string(),
            level_keyword: "Level".to_string(),
            alternative_marker: "OR".to_string(),
            excluded_phrases: vec!["Edge of Darkness".to_string(), "Edition".to_string()],
        }
    }
}

// ============================================================================
// SHAPE RULES
// ============================================================================

type ShapePredicate = fn(&LineClassifier, &str) -> bool;

/// One row of the rule table
#[derive(Clone, Copy)]
pub struct ShapeRule {
    pub id: &'static str,
    pub kind: LineKind,
    predicate: ShapePredicate,
}

impl ShapeRule {
    pub fn matches(&self, classifier: &LineClassifier, text: &str) -> bool {
        (self.predicate)(classifier, text)
    }
}

impl fmt::Debug for ShapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRule")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

const SHAPE_RULES: [ShapeRule; 4] = [
    ShapeRule {
        id: "trader_loyalty",
        kind: LineKind::Trader,
        predicate: is_trader,
    },
    ShapeRule {
        id: "skill_level",
        kind: LineKind::Skill,
        predicate: is_skill,
    },
    ShapeRule {
        id: "module_level",
        kind: LineKind::Module,
        predicate: is_module,
    },
    ShapeRule {
        id: "item_quantity",
        kind: LineKind::Item,
        predicate: is_item,
    },
];

fn is_trader(c: &LineClassifier, text: &str) -> bool {
    c.trader_parts(text).is_some()
}

fn is_skill(c: &LineClassifier, text: &str) -> bool {
    c.skill_parts(text).is_some()
}

fn is_module(c: &LineClassifier, text: &str) -> bool {
    c.module_parts(text).is_some()
}

fn is_item(c: &LineClassifier, text: &str) -> bool {
    c.item_parts(text).is_some()
}

// ============================================================================
// LINE CLASSIFIER
// ============================================================================

#[derive(Debug, Clone)]
pub struct LineClassifier {
    config: ClassifierConfig,
    rules: Vec<ShapeRule>,
}

impl LineClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        LineClassifier {
            config,
            rules: SHAPE_RULES.to_vec(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, text: &str) -> LineKind {
        let text = text.trim();
        self.rules
            .iter()
            .find(|rule| rule.matches(self, text))
            .map(|rule| rule.kind)
            .unwrap_or(LineKind::Unclassified)
    }

    // ========================================================================
    // SHAPE EXTRACTION
    // ========================================================================

    /// "Ragman LL3" → ("Ragman", "3")
    pub fn trader_parts<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let marker = self.config.loyalty_marker.as_str();
        if marker.is_empty() {
            return None;
        }

        text.match_indices(marker).find_map(|(pos, _)| {
            let at_token_start = text[..pos].chars().next_back().map_or(true, char::is_whitespace);
            if !at_token_start {
                return None;
            }

            let after = &text[pos + marker.len()..];
            let level = leading_digits(after);
            let name = text[..pos].trim();
            if level.is_empty() || name.is_empty() {
                None
            } else {
                Some((name, level))
            }
        })
    }

    /// "Metabolism Level 3" → ("Metabolism", "3").
    /// The second element is the rest of the line from the level token on,
    /// so "Metabolism Level 3 (Elite)" → ("Metabolism", "3 (Elite)").
    pub fn skill_parts<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let mut tokens = text.split_whitespace();
        let name = tokens.next()?;
        if tokens.next()? != self.config.level_keyword {
            return None;
        }

        let level = tokens.next()?;
        if !level.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let level_start = level.as_ptr() as usize - text.as_ptr() as usize;
        Some((name, text[level_start..].trim_end()))
    }

    /// "Level 2 Stash" → ("Stash", "2")
    pub fn module_parts<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        let mut tokens = text.split_whitespace();
        if tokens.next()? != self.config.level_keyword {
            return None;
        }

        let level = tokens.next()?;
        if !level.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let name_token = tokens.next()?;
        let name_start = name_token.as_ptr() as usize - text.as_ptr() as usize;
        Some((text[name_start..].trim_end(), level))
    }

    /// "395,000 Roubles" → ("395,000", "Roubles")
    pub fn item_parts<'a>(&self, text: &'a str) -> Option<(&'a str, &'a str)> {
        if self.is_excluded(text) {
            return None;
        }

        let (quantity, name) = text.split_once(char::is_whitespace)?;
        let name = name.trim();
        if quantity.starts_with(|c: char| c.is_ascii_digit()) && !name.is_empty() {
            Some((quantity, name))
        } else {
            None
        }
    }

    /// Edition purchases and "OR" separators are never materials
    pub fn is_excluded(&self, text: &str) -> bool {
        let text = text.trim();
        if text == self.config.alternative_marker {
            return true;
        }

        let lower = text.to_lowercase();
        self.config
            .excluded_phrases
            .iter()
            .filter(|p| !p.is_empty())
            .any(|phrase| lower.contains(&phrase.to_lowercase()))
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

fn leading_digits(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(text.len(), |(i, _)| i);
    &text[..end]
}

// ============================================================================
// TESTS
// ============================================================================
