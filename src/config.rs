// Wed Aug 05 2026 - Alex

use serde::{Deserialize, Serialize};

pub const DEFAULT_MACRO_IDENTIFIER: &str = "##";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub macro_identifier: String,
    pub seed_default_types: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            macro_identifier: DEFAULT_MACRO_IDENTIFIER.to_string(),
            seed_default_types: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_macro_identifier(mut self, identifier: &str) -> Self {
        self.macro_identifier = identifier.to_string();
        self
    }

    pub fn with_seed_default_types(mut self, seed: bool) -> Self {
        self.seed_default_types = seed;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.macro_identifier.is_empty() {
            return Err("macro_identifier must not be empty".to_string());
        }
        if self.macro_identifier.chars().any(|c| c.is_whitespace()) {
            return Err("macro_identifier must not contain whitespace".to_string());
        }
        if self.macro_identifier.chars().any(|c| c.is_alphanumeric()) {
            return Err("macro_identifier must not contain alphanumeric characters".to_string());
        }
        Ok(())
    }
}
