// Fri Aug 07 2026 - Alex

use crate::config::EngineConfig;
use crate::datatype::{DataTypeDefinition, DataTypeRegistry};
use crate::engine::project::ProjectFile;
use crate::layout::size::{SizeSource, SizeofResolver};
use crate::layout::table::LayoutTable;
use crate::layout::walker::LayoutWalker;
use crate::macros::{Expansion, MacroDefinition, MacroError, MacroLocation, MacroResolver};

/// Owns the primitive type registry, the macro resolver, and the layout
/// table, and wires the size lookups between them. All queries are
/// in-memory and synchronous; `rebuild_layout` replaces the table
/// wholesale.
pub struct DictionaryEngine {
    config: EngineConfig,
    types: DataTypeRegistry,
    macros: MacroResolver,
    layout: LayoutTable,
}

impl DictionaryEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let types = if config.seed_default_types {
            DataTypeRegistry::with_c_types()
        } else {
            DataTypeRegistry::new()
        };
        let macros = MacroResolver::with_identifier(&config.macro_identifier);

        Self {
            config,
            types,
            macros,
            layout: LayoutTable::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn data_types(&self) -> &DataTypeRegistry {
        &self.types
    }

    pub fn layout(&self) -> &LayoutTable {
        &self.layout
    }

    pub fn macros(&self) -> &MacroResolver {
        &self.macros
    }

    /// Replace the primitive type set. Cached macro values may embed stale
    /// sizes afterwards, so they are dropped.
    pub fn set_data_types(&mut self, definitions: Vec<DataTypeDefinition>) {
        self.types.set_types(definitions);
        self.macros.clear_cached_values();
    }

    pub fn add_data_type(&mut self, definition: DataTypeDefinition) {
        self.types.add(definition);
        self.macros.clear_cached_values();
    }

    pub fn set_macros(&mut self, definitions: Vec<MacroDefinition>) {
        self.macros.set_macros(definitions);
    }

    /// Merge imported macro definitions; see `MacroResolver::update_macros`
    pub fn update_macros(
        &mut self,
        definitions: Vec<MacroDefinition>,
    ) -> Result<usize, MacroError> {
        let sizes = SizeofResolver::new(&self.types, &self.layout);
        self.macros.update_macros(definitions, &sizes)
    }

    pub fn is_macro_exists(&self, name: &str) -> bool {
        self.macros.is_exists(name)
    }

    pub fn has_macro(&self, text: &str) -> bool {
        self.macros.has_macro(text)
    }

    pub fn expand(&self, text: &str) -> Expansion {
        let sizes = SizeofResolver::new(&self.types, &self.layout);
        self.macros.expand(text, &sizes)
    }

    pub fn expand_with_types(&self, text: &str, valid_data_types: &[String]) -> Expansion {
        let sizes = SizeofResolver::new(&self.types, &self.layout);
        self.macros.expand_with_types(text, &sizes, valid_data_types)
    }

    pub fn resolve_macro(&self, name: &str) -> Option<String> {
        let sizes = SizeofResolver::new(&self.types, &self.layout);
        self.macros.resolve(name, &sizes)
    }

    pub fn is_macro_recursive(&self, name: &str) -> bool {
        let sizes = SizeofResolver::new(&self.types, &self.layout);
        self.macros.is_recursive(name, &sizes)
    }

    pub fn referenced_macros(&self, text: &str) -> Vec<String> {
        self.macros.referenced_macros(text)
    }

    pub fn macro_locations(&self, text: &str) -> Vec<MacroLocation> {
        self.macros.macro_locations(text)
    }

    pub fn replace_macro_name(&self, old_name: &str, new_name: &str, text: &str) -> String {
        self.macros.replace_macro_name(old_name, new_name, text)
    }

    /// Rebuild the layout table from a pre-order variable hierarchy. The
    /// previous table is discarded; callers must not query between the
    /// start and end of the rebuild.
    pub fn rebuild_layout<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.layout = LayoutWalker::new(&self.types, &self.macros).build(paths);
    }

    /// Byte offset of the variable path relative to its root structure;
    /// macros in the path are expanded before the lookup. Root structure
    /// paths report offset 0.
    pub fn offset_of(&self, path: &str) -> Option<u32> {
        let expanded = self.expand(path).text;
        self.layout.offset_of(&expanded)
    }

    /// Size in bytes of a primitive or structure type; 0 if unknown
    pub fn size_of_type(&self, name: &str) -> u32 {
        SizeofResolver::new(&self.types, &self.layout).size_in_bytes(name)
    }

    /// Load a full dictionary: data types, macros, then the layout
    pub fn load_project(&mut self, project: &ProjectFile) {
        self.types = if self.config.seed_default_types {
            DataTypeRegistry::with_c_types()
        } else {
            DataTypeRegistry::new()
        };
        for definition in &project.data_types {
            self.types.add(definition.clone());
        }

        self.macros.set_macros(project.macros.clone());
        self.rebuild_layout(&project.variables);

        log::info!(
            "project loaded: {} data types, {} macros, {} layout entries",
            self.types.len(),
            self.macros.definitions().len(),
            self.layout.len()
        );
    }
}

impl Default for DictionaryEngine {
    fn default() -> Self {
        Self::new()
    }
}
