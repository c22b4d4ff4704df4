// Thu Aug 06 2026 - Alex

use crate::datatype::DataTypeRegistry;
use crate::layout::table::LayoutTable;
use once_cell::sync::Lazy;
use regex::Regex;

static SIZEOF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sizeof\(\s*([^)]+?)\s*\)").expect("sizeof pattern is a valid regex"));

/// Source of byte sizes for named data types. Unknown types size to zero.
pub trait SizeSource {
    fn size_in_bytes(&self, data_type: &str) -> u32;
}

/// Primitive-only size source
impl SizeSource for DataTypeRegistry {
    fn size_in_bytes(&self, data_type: &str) -> u32 {
        DataTypeRegistry::size_in_bytes(self, data_type)
    }
}

/// Resolves a type name against the primitive registry first, then the
/// structure sizes recorded in the layout table
pub struct SizeofResolver<'a> {
    types: &'a DataTypeRegistry,
    layout: &'a LayoutTable,
}

impl<'a> SizeofResolver<'a> {
    pub fn new(types: &'a DataTypeRegistry, layout: &'a LayoutTable) -> Self {
        Self { types, layout }
    }
}

impl SizeSource for SizeofResolver<'_> {
    fn size_in_bytes(&self, data_type: &str) -> u32 {
        if self.types.is_primitive(data_type) {
            self.types.size_in_bytes(data_type)
        } else {
            self.layout.struct_size(data_type)
        }
    }
}

/// Check if the supplied text contains a sizeof() call
pub fn has_sizeof(text: &str) -> bool {
    SIZEOF_PATTERN.is_match(text)
}

/// Check if the supplied text contains a sizeof() call for the specified
/// data type
pub fn has_sizeof_of(text: &str, data_type: &str) -> bool {
    SIZEOF_PATTERN
        .captures_iter(text)
        .any(|c| c.get(1).map(|m| m.as_str() == data_type).unwrap_or(false))
}

/// Replace each sizeof(data type) call with its numeric byte size. When an
/// allow-list is supplied, a call naming a type outside it raises the
/// returned invalid flag; substitution still proceeds with whatever size is
/// available.
pub fn replace_sizeof(
    text: &str,
    sizes: &dyn SizeSource,
    valid_data_types: Option<&[String]>,
) -> (String, bool) {
    let mut result = text.to_string();
    let mut invalid = false;

    loop {
        let Some((range, data_type)) = SIZEOF_PATTERN.captures(&result).and_then(|captures| {
            let call = captures.get(0)?;
            let data_type = captures.get(1)?;
            Some((call.range(), data_type.as_str().to_string()))
        }) else {
            break;
        };

        if let Some(valid) = valid_data_types {
            if !valid.iter().any(|v| v == &data_type) {
                invalid = true;
            }
        }

        let size = sizes.size_in_bytes(&data_type).to_string();
        result.replace_range(range, &size);
    }

    (result, invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{BaseType, DataTypeDefinition};

    fn registry() -> DataTypeRegistry {
        let mut registry = DataTypeRegistry::new();
        registry.add(DataTypeDefinition::new("uint8", 1, BaseType::UnsignedInt));
        registry.add(DataTypeDefinition::new("uint16", 2, BaseType::UnsignedInt));
        registry
    }

    #[test]
    fn test_replace_single_call() {
        let registry = registry();
        let (text, invalid) = replace_sizeof("sizeof(uint16)", &registry, None);
        assert_eq!(text, "2");
        assert!(!invalid);
    }

    #[test]
    fn test_replace_multiple_calls() {
        let registry = registry();
        let (text, _) = replace_sizeof("sizeof(uint16) + sizeof(uint8)", &registry, None);
        assert_eq!(text, "2 + 1");
    }

    #[test]
    fn test_whitespace_inside_call() {
        let registry = registry();
        let (text, _) = replace_sizeof("sizeof( uint16 )", &registry, None);
        assert_eq!(text, "2");
    }

    #[test]
    fn test_unknown_type_sizes_to_zero() {
        let registry = registry();
        let (text, invalid) = replace_sizeof("sizeof(Ghost)", &registry, None);
        assert_eq!(text, "0");
        assert!(!invalid);
    }

    #[test]
    fn test_allow_list_flags_invalid_type() {
        let registry = registry();
        let valid = vec!["uint8".to_string()];
        let (text, invalid) = replace_sizeof("sizeof(uint16)", &registry, Some(&valid));
        assert_eq!(text, "2");
        assert!(invalid);
    }

    #[test]
    fn test_sizeof_predicates() {
        assert!(has_sizeof("a + sizeof(uint8)"));
        assert!(!has_sizeof("plain text"));
        assert!(has_sizeof_of("sizeof(uint8)", "uint8"));
        assert!(!has_sizeof_of("sizeof(uint8)", "uint16"));
    }

    #[test]
    fn test_resolver_prefers_primitive_table() {
        let registry = registry();
        let mut layout = LayoutTable::new();
        layout.push("uint16", 9);
        let resolver = SizeofResolver::new(&registry, &layout);
        assert_eq!(resolver.size_in_bytes("uint16"), 2);
        assert_eq!(resolver.size_in_bytes("Missing"), 0);
    }
}
