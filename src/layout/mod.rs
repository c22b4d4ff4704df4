// Thu Aug 06 2026 - Alex

pub mod bitpack;
pub mod path;
pub mod size;
pub mod table;
pub mod walker;

pub use bitpack::BitPackState;
pub use size::{has_sizeof, has_sizeof_of, replace_sizeof, SizeSource, SizeofResolver};
pub use table::{LayoutEntry, LayoutTable, LayoutValue};
pub use walker::LayoutWalker;
