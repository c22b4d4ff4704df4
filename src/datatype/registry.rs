// Wed Aug 05 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base class of a primitive data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseType {
    SignedInt,
    UnsignedInt,
    Float,
    Character,
    Pointer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeDefinition {
    pub name: String,
    pub size: u32,
    pub base: BaseType,
}

impl DataTypeDefinition {
    pub fn new(name: &str, size: u32, base: BaseType) -> Self {
        Self {
            name: name.to_string(),
            size,
            base,
        }
    }
}

impl fmt::Display for DataTypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.size)
    }
}

/// Registry of primitive data types. Name lookups ignore case; an unknown
/// type sizes to zero so partial dictionaries never block computation.
#[derive(Debug, Clone, Default)]
pub struct DataTypeRegistry {
    types: Vec<DataTypeDefinition>,
}

impl DataTypeRegistry {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// Registry pre-loaded with the stock C99 primitive set
    pub fn with_c_types() -> Self {
        let mut registry = Self::new();
        registry.add(DataTypeDefinition::new("int8_t", 1, BaseType::SignedInt));
        registry.add(DataTypeDefinition::new("int16_t", 2, BaseType::SignedInt));
        registry.add(DataTypeDefinition::new("int32_t", 4, BaseType::SignedInt));
        registry.add(DataTypeDefinition::new("int64_t", 8, BaseType::SignedInt));
        registry.add(DataTypeDefinition::new("uint8_t", 1, BaseType::UnsignedInt));
        registry.add(DataTypeDefinition::new("uint16_t", 2, BaseType::UnsignedInt));
        registry.add(DataTypeDefinition::new("uint32_t", 4, BaseType::UnsignedInt));
        registry.add(DataTypeDefinition::new("uint64_t", 8, BaseType::UnsignedInt));
        registry.add(DataTypeDefinition::new("float", 4, BaseType::Float));
        registry.add(DataTypeDefinition::new("double", 8, BaseType::Float));
        registry.add(DataTypeDefinition::new("char", 1, BaseType::Character));
        registry.add(DataTypeDefinition::new("address", 8, BaseType::Pointer));
        registry
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn definitions(&self) -> &[DataTypeDefinition] {
        &self.types
    }

    /// Add a definition, replacing any existing type with the same name
    pub fn add(&mut self, definition: DataTypeDefinition) {
        if let Some(existing) = self
            .types
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(&definition.name))
        {
            *existing = definition;
        } else {
            self.types.push(definition);
        }
    }

    pub fn set_types(&mut self, definitions: Vec<DataTypeDefinition>) {
        self.types.clear();
        for definition in definitions {
            self.add(definition);
        }
    }

    pub fn get(&self, name: &str) -> Option<&DataTypeDefinition> {
        self.types.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn is_primitive(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Size in bytes of the named type; 0 if the type is unknown
    pub fn size_in_bytes(&self, name: &str) -> u32 {
        self.get(name).map(|t| t.size).unwrap_or(0)
    }

    pub fn size_in_bits(&self, name: &str) -> u32 {
        self.size_in_bytes(name) * 8
    }

    pub fn base_type(&self, name: &str) -> Option<BaseType> {
        self.get(name).map(|t| t.base)
    }

    pub fn is_integer(&self, name: &str) -> bool {
        matches!(
            self.base_type(name),
            Some(BaseType::SignedInt) | Some(BaseType::UnsignedInt)
        )
    }

    pub fn is_signed(&self, name: &str) -> bool {
        self.base_type(name) == Some(BaseType::SignedInt)
    }

    pub fn is_unsigned(&self, name: &str) -> bool {
        self.base_type(name) == Some(BaseType::UnsignedInt)
    }

    pub fn is_float(&self, name: &str) -> bool {
        self.base_type(name) == Some(BaseType::Float)
    }

    pub fn is_character(&self, name: &str) -> bool {
        self.base_type(name) == Some(BaseType::Character)
    }

    pub fn is_pointer(&self, name: &str) -> bool {
        self.base_type(name) == Some(BaseType::Pointer)
    }
}
