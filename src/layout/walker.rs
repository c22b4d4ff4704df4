// Fri Aug 07 2026 - Alex

use crate::datatype::DataTypeRegistry;
use crate::layout::bitpack::BitPackState;
use crate::layout::path::{
    array_definition_path, data_type_of, is_first_array_member, is_member_path,
};
use crate::layout::size::SizeofResolver;
use crate::layout::table::LayoutTable;
use crate::macros::MacroResolver;

/// Builds the layout table from a pre-order listing of every structure and
/// variable path. Offsets are byte offsets relative to each path's root
/// structure; a root/prototype entry receives the structure's total size
/// once its scope closes.
pub struct LayoutWalker<'a> {
    types: &'a DataTypeRegistry,
    macros: &'a MacroResolver,
}

impl<'a> LayoutWalker<'a> {
    pub fn new(types: &'a DataTypeRegistry, macros: &'a MacroResolver) -> Self {
        Self { types, macros }
    }

    /// One full pre-order pass over the variable hierarchy. Nodes must
    /// arrive in the exact order they occupy memory; the result replaces
    /// any previous table wholesale.
    pub fn build<I, S>(&self, paths: I) -> LayoutTable
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = LayoutTable::new();
        let mut pack = BitPackState::new();
        let mut offset: u32 = 0;
        let mut struct_index: Option<usize> = None;

        for raw_path in paths {
            // Expand any macros in the path; sizeof() calls see the sizes
            // recorded so far
            let mut var_path = {
                let sizes = SizeofResolver::new(self.types, &table);
                self.macros.expand(raw_path.as_ref(), &sizes).text
            };

            if is_member_path(&var_path) {
                let data_type = data_type_of(&var_path).to_string();

                if self.types.is_primitive(&data_type) {
                    // Split off the bit length, keeping the path without it
                    let mut bit_length = String::new();
                    if let Some(index) = var_path.find(':') {
                        bit_length = var_path[index + 1..].to_string();
                        var_path.truncate(index);
                    }

                    let byte_size = self.types.size_in_bytes(&data_type);
                    offset = pack.adjust_offset(&data_type, byte_size, &bit_length, offset);
                } else {
                    // A nested structure member: flush the previous
                    // member's storage and restart packing; its own members
                    // follow and accumulate into the running offset
                    offset += pack.last_byte_size();
                    pack.reset();
                }
            } else {
                // A root/prototype structure boundary closes out the one
                // before it
                if let Some(index) = struct_index {
                    offset = self.close_out(&mut pack, offset);
                    table.set_value_at(index, offset);
                }

                struct_index = Some(table.len());
                offset = 0;
                pack.reset();
            }

            // The first member of an array also records the bare array
            // path at the same offset
            if is_first_array_member(&var_path) {
                table.push(array_definition_path(&var_path), offset);
            }

            // A prototype structure can be listed twice (bare placeholder,
            // then populated); keep only the populated entry
            if let Some(existing) = table.index_of(&var_path) {
                table.remove_index(existing);
                if let Some(index) = struct_index.as_mut() {
                    if existing < *index {
                        *index -= 1;
                    }
                }
            }

            table.push(&var_path, offset);
        }

        if let Some(index) = struct_index {
            offset = self.close_out(&mut pack, offset);
            table.set_value_at(index, offset);
        }

        // Cached macro values may embed sizes that were still zero
        // mid-build; drop them so later expansions see the finished table
        self.macros.clear_cached_values();

        log::debug!("layout rebuilt: {} entries", table.len());

        table
    }

    // Flush trailing bit-field state at the end of a structure's scope
    fn close_out(&self, pack: &mut BitPackState, offset: u32) -> u32 {
        let last_type = pack.last_data_type().to_string();
        let byte_size = self.types.size_in_bytes(&last_type);
        pack.adjust_offset(&last_type, byte_size, "", offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{BaseType, DataTypeDefinition};
    use crate::macros::MacroDefinition;

    fn types() -> DataTypeRegistry {
        let mut registry = DataTypeRegistry::new();
        registry.add(DataTypeDefinition::new("uint8", 1, BaseType::UnsignedInt));
        registry.add(DataTypeDefinition::new("uint16", 2, BaseType::UnsignedInt));
        registry.add(DataTypeDefinition::new("uint32", 4, BaseType::UnsignedInt));
        registry
    }

    fn build(paths: &[&str]) -> LayoutTable {
        build_with_macros(paths, &[])
    }

    fn build_with_macros(paths: &[&str], macros: &[(&str, &str)]) -> LayoutTable {
        let types = types();
        let mut resolver = MacroResolver::new();
        resolver.set_macros(
            macros
                .iter()
                .map(|(n, v)| MacroDefinition::new(n, v))
                .collect(),
        );
        LayoutWalker::new(&types, &resolver).build(paths)
    }

    #[test]
    fn test_bit_packed_structure() {
        let table = build(&[
            "S",
            "S,uint8.a",
            "S,uint8.b:4",
            "S,uint8.c:4",
            "S,uint16.d",
        ]);

        assert_eq!(table.offset_of("S,uint8.a"), Some(0));
        assert_eq!(table.offset_of("S,uint8.b"), Some(1));
        // c packs into the same byte as b
        assert_eq!(table.offset_of("S,uint8.c"), Some(1));
        assert_eq!(table.offset_of("S,uint16.d"), Some(2));
        assert_eq!(table.struct_size("S"), 4);
        assert_eq!(table.offset_of("S"), Some(0));
    }

    #[test]
    fn test_bit_length_stripped_from_stored_path() {
        let table = build(&["S", "S,uint8.b:4"]);
        assert!(table.contains("S,uint8.b"));
        assert!(!table.contains("S,uint8.b:4"));
        // The query side tolerates the suffix
        assert_eq!(table.offset_of("S,uint8.b:4"), Some(0));
    }

    #[test]
    fn test_nested_structure_rolls_up_into_parent() {
        let table = build(&[
            "S",
            "S,uint8.a",
            "S,uint8.b:4",
            "S,uint8.c:4",
            "S,uint16.d",
            "R",
            "R,S.inner",
            "R,S.inner,uint8.a",
            "R,S.inner,uint8.b:4",
            "R,S.inner,uint8.c:4",
            "R,S.inner,uint16.d",
            "R,uint8.e",
        ]);

        assert_eq!(table.struct_size("S"), 4);
        assert_eq!(table.offset_of("R,S.inner"), Some(0));
        assert_eq!(table.offset_of("R,S.inner,uint16.d"), Some(2));
        // e lands after the whole of the nested structure
        assert_eq!(table.offset_of("R,uint8.e"), Some(4));
        assert_eq!(table.struct_size("R"), 5);
    }

    #[test]
    fn test_prototype_listed_twice_keeps_populated_entry() {
        let table = build(&[
            "S",
            "R",
            "R,uint8.x",
            "S",
            "S,uint16.w",
        ]);

        let entries: Vec<&str> = table.paths().filter(|p| *p == "S").collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(table.struct_size("S"), 2);
        assert_eq!(table.struct_size("R"), 1);
    }

    #[test]
    fn test_array_definition_entry() {
        let table = build(&[
            "T",
            "T,uint16.arr[0]",
            "T,uint16.arr[1]",
        ]);

        assert_eq!(table.offset_of("T,uint16.arr"), Some(0));
        assert_eq!(table.offset_of("T,uint16.arr[0]"), Some(0));
        assert_eq!(table.offset_of("T,uint16.arr[1]"), Some(2));
        assert_eq!(table.struct_size("T"), 4);
    }

    #[test]
    fn test_multi_dimension_array_definitions() {
        let table = build(&[
            "G",
            "G,uint8.grid[0][0]",
            "G,uint8.grid[0][1]",
            "G,uint8.grid[1][0]",
            "G,uint8.grid[1][1]",
        ]);

        assert_eq!(table.offset_of("G,uint8.grid"), Some(0));
        assert_eq!(table.offset_of("G,uint8.grid[1]"), Some(2));
        assert_eq!(table.offset_of("G,uint8.grid[1][1]"), Some(3));
        assert_eq!(table.struct_size("G"), 4);
    }

    #[test]
    fn test_macro_expanded_bit_length() {
        let table = build_with_macros(
            &["S", "S,uint8.a:##W##", "S,uint8.b:##W##"],
            &[("W", "4")],
        );

        // Both fields pack into one byte once the widths expand
        assert_eq!(table.offset_of("S,uint8.a"), Some(0));
        assert_eq!(table.offset_of("S,uint8.b"), Some(0));
        assert_eq!(table.struct_size("S"), 1);
    }

    #[test]
    fn test_unknown_member_type_occupies_nothing() {
        let table = build(&["S", "S,ghost.g", "S,uint8.a"]);

        // The unknown type is treated as a structure member with no size
        assert_eq!(table.offset_of("S,uint8.a"), Some(0));
        assert_eq!(table.struct_size("S"), 1);
    }

    #[test]
    fn test_multiple_roots_reset_offsets() {
        let table = build(&[
            "A",
            "A,uint32.w",
            "B",
            "B,uint8.x",
        ]);

        assert_eq!(table.offset_of("A,uint32.w"), Some(0));
        assert_eq!(table.struct_size("A"), 4);
        assert_eq!(table.offset_of("B,uint8.x"), Some(0));
        assert_eq!(table.struct_size("B"), 1);
    }

    #[test]
    fn test_sizeof_of_built_structure_in_macro() {
        let types = types();
        let mut resolver = MacroResolver::new();
        resolver.set_macros(vec![MacroDefinition::new("SLEN", "sizeof(S)")]);

        let table = LayoutWalker::new(&types, &resolver).build([
            "S",
            "S,uint16.a",
            "S,uint16.b",
        ]);

        // The rebuild cleared cached values, so the macro now sees the
        // final structure size
        let sizes = SizeofResolver::new(&types, &table);
        assert_eq!(resolver.resolve("SLEN", &sizes), Some("4".to_string()));
    }

    #[test]
    fn test_empty_hierarchy() {
        let table = build(&[]);
        assert!(table.is_empty());
    }
}
