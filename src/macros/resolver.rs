// Thu Aug 06 2026 - Alex

use crate::config::DEFAULT_MACRO_IDENTIFIER;
use crate::expression::evaluate;
use crate::layout::size::{has_sizeof, replace_sizeof, SizeSource};
use crate::macros::error::MacroError;
use crate::macros::scan::{MacroLocation, MacroPattern};
use crate::macros::table::{MacroDefinition, MacroTable};
use parking_lot::RwLock;

/// Result of expanding macro references and sizeof() calls in a text.
/// `recursive` is raised when a reference cycle was hit, `invalid_type`
/// when a sizeof() call named a type outside the caller's allow-list;
/// either flag means the text cannot be trusted as a numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub text: String,
    pub recursive: bool,
    pub invalid_type: bool,
}

impl Expansion {
    fn untouched(text: &str) -> Self {
        Self {
            text: text.to_string(),
            recursive: false,
            invalid_type: false,
        }
    }

    pub fn is_trusted(&self) -> bool {
        !self.recursive && !self.invalid_type
    }
}

// Memoized expansion of one macro; the recursion flag is cached with the
// text so repeated lookups report the same result
#[derive(Debug, Clone)]
struct ExpandedValue {
    text: String,
    recursive: bool,
}

/// Resolves macro names to their fully expanded values: nested references
/// are substituted recursively with cycle detection, sizeof() calls are
/// replaced by byte sizes, and results that reduce to arithmetic
/// expressions are folded to integers and memoized.
pub struct MacroResolver {
    table: MacroTable,
    pattern: MacroPattern,
    expanded: RwLock<Vec<Option<ExpandedValue>>>,
}

impl MacroResolver {
    pub fn new() -> Self {
        Self::with_identifier(DEFAULT_MACRO_IDENTIFIER)
    }

    pub fn with_identifier(identifier: &str) -> Self {
        Self {
            table: MacroTable::new(),
            pattern: MacroPattern::new(identifier),
            expanded: RwLock::new(Vec::new()),
        }
    }

    pub fn pattern(&self) -> &MacroPattern {
        &self.pattern
    }

    pub fn definitions(&self) -> &[MacroDefinition] {
        self.table.definitions()
    }

    /// Replace the macro set and drop every cached expansion
    pub fn set_macros(&mut self, definitions: Vec<MacroDefinition>) {
        self.table.set(definitions);
        *self.expanded.write() = vec![None; self.table.len()];
        log::debug!("macro table replaced: {} definitions", self.table.len());
    }

    /// Case-insensitive membership test
    pub fn is_exists(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    pub fn has_macro(&self, text: &str) -> bool {
        self.pattern.has_macro(text)
    }

    pub fn full_name(&self, name: &str) -> String {
        self.pattern.full_name(name)
    }

    /// Drop cached expansions, e.g. after structure sizes changed and
    /// embedded sizeof() values may be stale
    pub fn clear_cached_values(&self) {
        let mut cache = self.expanded.write();
        for slot in cache.iter_mut() {
            *slot = None;
        }
    }

    /// Fully expanded value of the named macro, or `None` if no macro with
    /// that name exists
    pub fn resolve(&self, name: &str, sizes: &dyn SizeSource) -> Option<String> {
        self.resolve_entry(name, sizes).map(|entry| entry.text)
    }

    /// True if resolving the named macro encounters a reference cycle
    pub fn is_recursive(&self, name: &str, sizes: &dyn SizeSource) -> bool {
        self.resolve_entry(name, sizes)
            .map(|entry| entry.recursive)
            .unwrap_or(false)
    }

    /// Expand every macro reference and sizeof() call in the text
    pub fn expand(&self, text: &str, sizes: &dyn SizeSource) -> Expansion {
        self.expand_impl(text, sizes, None)
    }

    /// Expand, flagging sizeof() calls whose type is not in the allow-list
    pub fn expand_with_types(
        &self,
        text: &str,
        sizes: &dyn SizeSource,
        valid_data_types: &[String],
    ) -> Expansion {
        self.expand_impl(text, sizes, Some(valid_data_types))
    }

    /// Names of the defined macros referenced in the text, each once, in
    /// first-seen order
    pub fn referenced_macros(&self, text: &str) -> Vec<String> {
        self.pattern.referenced(text, &self.table)
    }

    /// Every reference to a defined macro in the text, with offsets
    pub fn macro_locations(&self, text: &str) -> Vec<MacroLocation> {
        self.pattern.locations(text, &self.table)
    }

    /// Replace all references to `old_name` with `new_name` (both
    /// delimited) in the supplied text
    pub fn replace_macro_name(&self, old_name: &str, new_name: &str, text: &str) -> String {
        self.pattern.replace_name(old_name, new_name, text, &self.table)
    }

    /// Expand every cell of the supplied rows in place
    pub fn expand_rows(&self, rows: &mut [Vec<String>], sizes: &dyn SizeSource) {
        for row in rows.iter_mut() {
            for cell in row.iter_mut() {
                *cell = self.expand(cell, sizes).text;
            }
        }
    }

    /// Merge externally supplied definitions. A definition whose expanded
    /// value conflicts with an existing macro of the same name aborts the
    /// merge before anything is added. Returns the number of macros
    /// appended; the expansion cache is invalidated only when that count is
    /// nonzero.
    pub fn update_macros(
        &mut self,
        definitions: Vec<MacroDefinition>,
        sizes: &dyn SizeSource,
    ) -> Result<usize, MacroError> {
        let mut additions: Vec<MacroDefinition> = Vec::new();

        for definition in definitions {
            let existing_raw = self
                .table
                .value_of(&definition.name)
                .map(str::to_string)
                .or_else(|| {
                    additions
                        .iter()
                        .find(|a| a.name.eq_ignore_ascii_case(&definition.name))
                        .map(|a| a.value.clone())
                });

            match existing_raw {
                None => additions.push(definition),
                Some(raw) => {
                    let existing = self.expand_impl(&raw, sizes, None).text;
                    let imported = self.expand_impl(&definition.value, sizes, None).text;

                    if existing != imported {
                        return Err(MacroError::ConflictingDefinition {
                            name: definition.name,
                            existing,
                            imported,
                        });
                    }
                }
            }
        }

        let added = additions.len();

        if added > 0 {
            for definition in additions {
                self.table.push(definition);
            }
            *self.expanded.write() = vec![None; self.table.len()];
            log::debug!("macro import merged: {} added", added);
        }

        Ok(added)
    }

    fn expand_impl(
        &self,
        text: &str,
        sizes: &dyn SizeSource,
        valid_data_types: Option<&[String]>,
    ) -> Expansion {
        // Fast path: nothing that could expand
        if !self.pattern.has_macro(text) && !has_sizeof(text) {
            return Expansion::untouched(text);
        }

        let (working, invalid_type) = replace_sizeof(text, sizes, valid_data_types);

        let mut recursive = false;
        let mut result = String::new();
        let mut last_end = 0;

        for location in self.pattern.locations(&working, &self.table) {
            result.push_str(&working[last_end..location.start]);

            let name = self.pattern.strip(&location.name);
            match self.resolve_entry(name, sizes) {
                Some(entry) => {
                    recursive |= entry.recursive;
                    result.push_str(&entry.text);
                }
                None => result.push_str(&location.name),
            }

            last_end = location.end();
        }

        result.push_str(&working[last_end..]);

        if let Some(reduced) = reduce_expression_list(&result) {
            result = reduced;
        }

        Expansion {
            text: result,
            recursive,
            invalid_type,
        }
    }

    fn resolve_entry(&self, name: &str, sizes: &dyn SizeSource) -> Option<ExpandedValue> {
        let index = self.table.index_of(name)?;

        if let Some(entry) = self.expanded.read().get(index).cloned().flatten() {
            return Some(entry);
        }

        let mut recursive = false;
        let mut text = self.resolve_nested(name, &[], sizes, &mut recursive)?;

        if let Some(value) = evaluate(&text) {
            text = integer_text(value);
        }

        let entry = ExpandedValue { text, recursive };
        log::trace!("macro {} resolved to '{}'", name, entry.text);

        let mut cache = self.expanded.write();
        if let Some(slot) = cache.get_mut(index) {
            *slot = Some(entry.clone());
        }

        Some(entry)
    }

    // Expand the named macro's raw value. Each recursive step receives its
    // own copy of the ancestor list, so sibling branches never observe each
    // other's ancestry; a name already on the list marks the resolution
    // recursive and is left unexpanded.
    fn resolve_nested(
        &self,
        name: &str,
        ancestors: &[String],
        sizes: &dyn SizeSource,
        recursive: &mut bool,
    ) -> Option<String> {
        if ancestors.iter().any(|a| a.eq_ignore_ascii_case(name)) {
            *recursive = true;
            return None;
        }

        let raw = self.table.value_of(name)?.to_string();

        let mut path = ancestors.to_vec();
        path.push(name.to_string());

        let (mut value, _) = replace_sizeof(&raw, sizes, None);

        for referenced in self.pattern.referenced(&value, &self.table) {
            // Short-circuit once a cycle has been found
            if *recursive {
                break;
            }

            if let Some(replacement) = self.resolve_nested(&referenced, &path, sizes, recursive) {
                value = self
                    .pattern
                    .replace_value(&value, &referenced, &replacement, &self.table);
            }
        }

        Some(value)
    }
}

impl Default for MacroResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn integer_text(value: f64) -> String {
    (value.trunc() as i64).to_string()
}

// Split on commas outside parentheses
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (index, byte) in text.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }

    parts.push(&text[start..]);
    parts
}

// Reduce the text to integer form if it is a single expression or a
// comma-separated list where every part is one; `None` leaves the caller's
// text unchanged
fn reduce_expression_list(text: &str) -> Option<String> {
    let parts = split_top_level(text);

    if parts.len() == 1 {
        return evaluate(parts[0]).map(integer_text);
    }

    let values: Option<Vec<f64>> = parts.iter().map(|part| evaluate(part)).collect();
    values.map(|values| {
        values
            .iter()
            .map(|v| integer_text(*v))
            .collect::<Vec<String>>()
            .join(", ")
    })
}
