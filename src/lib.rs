// Fri Aug 07 2026 - Alex

pub mod config;
pub mod datatype;
pub mod engine;
pub mod expression;
pub mod layout;
pub mod macros;
pub mod utils;

pub use config::EngineConfig;
pub use datatype::{BaseType, DataTypeDefinition, DataTypeRegistry};
pub use engine::{DictionaryEngine, ProjectError, ProjectFile};
pub use expression::evaluate;
pub use layout::{LayoutEntry, LayoutTable, LayoutValue, LayoutWalker, SizeSource, SizeofResolver};
pub use macros::{Expansion, MacroDefinition, MacroError, MacroLocation, MacroResolver};
