// Hideout Extract - Core Library
// Requirement classification, parsing, category resolution and aggregation

pub mod classifier;
pub mod entities;
pub mod parser;
pub mod aggregation;
pub mod rules;          // Module rename rules
pub mod config;
pub mod source;         // Scraped rows (CSV) + fingerprint
pub mod reference;      // Unique names per bucket
pub mod data_quality;
pub mod hideout;        // Build pipeline + document

// Re-export commonly used types
pub use classifier::{ClassifierConfig, LineClassifier, LineKind, ShapeRule};
pub use entities::{
    Category, CategoryCatalog, CuratedTable, ItemAliases, default_aliases,
    ItemRequirement, SkillRequirement, ModuleRequirement, LoyaltyRequirement,
    Module, RequirementKind,
};
pub use parser::{
    RequirementParser, ParsedRequirements, ParsedModule, ParsedLine,
    ParseError, QuantityError, UncategorizedItem, UnclassifiedLine,
    parse_quantity,
};
pub use aggregation::{aggregate, aggregate_catalog, AggregateError, CategoryTotal, CategoryTotals};
pub use rules::{NameNormalizer, RenameRule, Rename};
pub use config::{ExtractConfig, ModuleFilter, ExcludedLevel, MalformedPolicy};
pub use source::{RawModuleRow, RequirementRecord, load_rows, read_rows, fingerprint};
pub use reference::{ReferenceTables, ReferenceCounts};
pub use data_quality::{DataQualityEngine, QualityReport, QualityIssue, Severity, SkippedRow};
pub use hideout::{HideoutBuilder, HideoutDocument, BuildOutput, BuildError, RunSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
