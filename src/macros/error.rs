// Thu Aug 06 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MacroError {
    #[error("Macro '{name}' conflicts with an existing definition: '{existing}' vs '{imported}'")]
    ConflictingDefinition {
        name: String,
        existing: String,
        imported: String,
    },
}
