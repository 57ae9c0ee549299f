// 🏗️ Module Entity - One upgrade level of a hideout module
//
// A module row is created once per (module, level) scraped from the source.
// After creation only the name normalizer and the module filters touch it.

use super::category::Category;
use serde::{Deserialize, Serialize};

// ============================================================================
// REQUIREMENT RECORDS
// ============================================================================

/// Material needed to build a level, e.g. "50000 Rubles"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequirement {
    pub complete: bool,
    pub need: u64,
    pub category: Category,
    pub have: u64,
    pub item: String,
}

impl ItemRequirement {
    /// New requirement, nothing collected yet
    pub fn new(item: String, need: u64, category: Category) -> Self {
        ItemRequirement {
            complete: false,
            need,
            category,
            have: 0,
            item,
        }
    }
}

/// "<SkillName> Level, <N>"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub item: String,
}

/// "<ModuleName>, <N>"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRequirement {
    pub item: String,
}

/// "<TraderName>, <N>"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyRequirement {
    pub item: String,
}

/// One parsed requirement line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementKind {
    Item(ItemRequirement),
    Skill(SkillRequirement),
    Module(ModuleRequirement),
    Loyalty(LoyaltyRequirement),
}

// ============================================================================
// MODULE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    #[serde(rename = "module")]
    pub name: String,

    pub level: u32,

    pub complete: bool,

    pub skill_requirements: Vec<SkillRequirement>,
    pub item_requirements: Vec<ItemRequirement>,
    pub module_requirements: Vec<ModuleRequirement>,
    pub loyalty_requirements: Vec<LoyaltyRequirement>,
}

impl Module {
    /// Create module level with no requirements
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Module {
            name: name.into(),
            level,
            complete: false,
            skill_requirements: Vec::new(),
            item_requirements: Vec::new(),
            module_requirements: Vec::new(),
            loyalty_requirements: Vec::new(),
        }
    }

    /// Route one parsed requirement into its list
    pub fn push(&mut self, requirement: RequirementKind) {
        match requirement {
            RequirementKind::Item(r) => self.item_requirements.push(r),
            RequirementKind::Skill(r) => self.skill_requirements.push(r),
            RequirementKind::Module(r) => self.module_requirements.push(r),
            RequirementKind::Loyalty(r) => self.loyalty_requirements.push(r),
        }
    }

    /// Total number of structured requirements on this level
    pub fn requirement_count(&self) -> usize {
        self.item_requirements.len()
            + self.skill_requirements.len()
            + self.module_requirements.len()
            + self.loyalty_requirements.len()
    }
}
