// Thu Aug 06 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDefinition {
    pub name: String,
    pub value: String,
}

impl MacroDefinition {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for MacroDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

/// Ordered list of macro definitions. Names are matched ignoring case;
/// duplicate names are tolerated and lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: Vec<MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self { macros: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    pub fn definitions(&self) -> &[MacroDefinition] {
        &self.macros
    }

    pub fn set(&mut self, definitions: Vec<MacroDefinition>) {
        self.macros = definitions;
    }

    pub fn push(&mut self, definition: MacroDefinition) {
        self.macros.push(definition);
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.macros
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Raw (unexpanded) value of the named macro
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.macros[i].value.as_str())
    }
}
