// Thu Aug 06 2026 - Alex

use crate::macros::table::MacroTable;
use regex::Regex;
use std::fmt;

/// A located macro reference: the delimited name and its byte offset in
/// the searched text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroLocation {
    pub name: String,
    pub start: usize,
}

impl MacroLocation {
    /// Offset one past the end of the delimited name
    pub fn end(&self) -> usize {
        self.start + self.name.len()
    }
}

impl fmt::Display for MacroLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.name, self.start)
    }
}

/// Search patterns for one macro delimiter string
#[derive(Debug, Clone)]
pub struct MacroPattern {
    identifier: String,
    locate: Regex,
    any: Regex,
}

impl MacroPattern {
    pub fn new(identifier: &str) -> Self {
        // An empty string cannot delimit anything; fall back to the default
        let identifier = if identifier.is_empty() {
            crate::config::DEFAULT_MACRO_IDENTIFIER
        } else {
            identifier
        };
        let id = regex::escape(identifier);
        // The name capture excludes the identifier's lead character, so a
        // match can never span a delimiter
        let lead = regex::escape(
            &identifier.chars().next().map(String::from).unwrap_or_default(),
        );
        let locate = Regex::new(&format!("{id}([^{lead}]+){id}"))
            .expect("escaped delimiter pattern is a valid regex");
        let any = Regex::new(&format!("(?s){id}.+{id}"))
            .expect("escaped delimiter pattern is a valid regex");

        Self {
            identifier: identifier.to_string(),
            locate,
            any,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Wrap a bare macro name in the delimiter string
    pub fn full_name(&self, name: &str) -> String {
        format!("{}{}{}", self.identifier, name, self.identifier)
    }

    /// Remove the delimiters from a located macro name
    pub fn strip<'a>(&self, delimited: &'a str) -> &'a str {
        delimited
            .strip_prefix(self.identifier.as_str())
            .and_then(|s| s.strip_suffix(self.identifier.as_str()))
            .unwrap_or(delimited)
    }

    /// Quick test for a possible macro reference (delimiter pair with at
    /// least one character between)
    pub fn has_macro(&self, text: &str) -> bool {
        self.any.is_match(text)
    }

    /// Locate every reference to a defined macro, left to right. A token
    /// that merely looks delimited but matches no defined macro is skipped
    /// by advancing a single character, so false positives cannot mask a
    /// real reference later in the text.
    pub fn locations(&self, text: &str, table: &MacroTable) -> Vec<MacroLocation> {
        let mut locations = Vec::new();
        let mut remaining = text;
        let mut start = 0;

        while let Some(captures) = self.locate.captures(remaining) {
            let Some(full) = captures.get(0) else {
                break;
            };
            let is_defined = captures
                .get(1)
                .map(|name| table.contains(name.as_str()))
                .unwrap_or(false);

            if is_defined {
                locations.push(MacroLocation {
                    name: full.as_str().to_string(),
                    start: start + full.start(),
                });
                start += full.end();
                remaining = &remaining[full.end()..];
            } else {
                // Advance past the first character of the false positive
                // and retry
                let first_len = remaining[full.start()..]
                    .chars()
                    .next()
                    .map(|c| c.len_utf8())
                    .unwrap_or(1);
                let skip = full.start() + first_len;
                start += skip;
                remaining = &remaining[skip..];
            }
        }

        locations
    }

    /// Names of the defined macros referenced in the text, without
    /// delimiters, each listed once in first-seen order
    pub fn referenced(&self, text: &str, table: &MacroTable) -> Vec<String> {
        let mut referenced: Vec<String> = Vec::new();

        for location in self.locations(text, table) {
            let name = self.strip(&location.name);
            if !referenced.iter().any(|r| r.eq_ignore_ascii_case(name)) {
                referenced.push(name.to_string());
            }
        }

        referenced
    }

    /// Replace every reference to `old_name` with `new_name` (both
    /// delimited). Applied in reverse so earlier offsets stay valid as the
    /// text length changes.
    pub fn replace_name(
        &self,
        old_name: &str,
        new_name: &str,
        text: &str,
        table: &MacroTable,
    ) -> String {
        let mut result = text.to_string();

        for location in self.locations(text, table).iter().rev() {
            if result[location.start..].starts_with(old_name) {
                result.replace_range(location.start..location.start + old_name.len(), new_name);
            }
        }

        result
    }

    /// Replace every reference to the named macro with the supplied value,
    /// matching the name ignoring case
    pub fn replace_value(
        &self,
        text: &str,
        name: &str,
        value: &str,
        table: &MacroTable,
    ) -> String {
        let mut result = text.to_string();

        for location in self.locations(text, table).iter().rev() {
            if self.strip(&location.name).eq_ignore_ascii_case(name) {
                result.replace_range(location.start..location.end(), value);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::table::MacroDefinition;

    fn table(names: &[&str]) -> MacroTable {
        let mut table = MacroTable::new();
        table.set(
            names
                .iter()
                .map(|n| MacroDefinition::new(n, "1"))
                .collect(),
        );
        table
    }

    #[test]
    fn test_locations_basic() {
        let pattern = MacroPattern::new("##");
        let table = table(&["RATE", "DEPTH"]);
        let locations = pattern.locations("a ##RATE## b ##DEPTH##", &table);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].name, "##RATE##");
        assert_eq!(locations[0].start, 2);
        assert_eq!(locations[1].name, "##DEPTH##");
        assert_eq!(locations[1].start, 13);
    }

    #[test]
    fn test_false_positive_does_not_mask_later_match() {
        let pattern = MacroPattern::new("##");
        let table = table(&["REAL"]);
        // "##bogus##" pairs with the leading delimiter of "##REAL##" unless
        // the scan advances one character at a time past it
        let locations = pattern.locations("##bogus## then ##REAL##", &table);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "##REAL##");
        assert_eq!(locations[0].start, 15);
    }

    #[test]
    fn test_adjacent_references() {
        let pattern = MacroPattern::new("##");
        let table = table(&["A", "B"]);
        let locations = pattern.locations("##A####B##", &table);
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].start, 0);
        assert_eq!(locations[1].start, 5);
    }

    #[test]
    fn test_referenced_dedup_first_seen_order() {
        let pattern = MacroPattern::new("##");
        let table = table(&["A", "B"]);
        let referenced = pattern.referenced("##B## ##A## ##b## ##A##", &table);
        assert_eq!(referenced, vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn test_replace_name_everywhere() {
        let pattern = MacroPattern::new("##");
        let table = table(&["OLD"]);
        let text = "x = ##OLD## + ##OLD##; pad ".repeat(40);
        let replaced = pattern.replace_name("##OLD##", "##NEW##", &text, &table);
        assert!(!replaced.contains("##OLD##"));
        assert_eq!(replaced.matches("##NEW##").count(), 80);
    }

    #[test]
    fn test_has_macro() {
        let pattern = MacroPattern::new("##");
        assert!(pattern.has_macro("##ANY##"));
        assert!(pattern.has_macro("text ##x## text"));
        assert!(!pattern.has_macro("no reference"));
        assert!(!pattern.has_macro("####"));
    }

    #[test]
    fn test_strip_and_full_name() {
        let pattern = MacroPattern::new("##");
        assert_eq!(pattern.full_name("LIMIT"), "##LIMIT##");
        assert_eq!(pattern.strip("##LIMIT##"), "LIMIT");
        assert_eq!(pattern.strip("LIMIT"), "LIMIT");
    }

    #[test]
    fn test_alternate_identifier() {
        let pattern = MacroPattern::new("@");
        let table = table(&["N"]);
        let locations = pattern.locations("size @N@", &table);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].name, "@N@");
        assert_eq!(locations[0].start, 5);
    }
}
