// Entity Models
//
// Each entity is plain data:
// - Category: curated material tables + resolver
// - Module: one upgrade level and its parsed requirements

pub mod category;
pub mod module;

pub use category::{default_aliases, Category, CategoryCatalog, CuratedTable, ItemAliases};
pub use module::{
    ItemRequirement, LoyaltyRequirement, Module, ModuleRequirement, RequirementKind,
    SkillRequirement,
};
