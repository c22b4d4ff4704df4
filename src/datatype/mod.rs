// Wed Aug 05 2026 - Alex

pub mod registry;

pub use registry::{BaseType, DataTypeDefinition, DataTypeRegistry};
