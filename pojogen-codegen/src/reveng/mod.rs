//! Reverse engineering: turning introspected tables into mapping metadata.
//!
//! Tables are selected through an ordered list of [`SchemaSelection`]s and
//! bound into a [`Metadata`](pojogen_mapping::Metadata) graph one entity per
//! table. The list order decides both the entity order and which table wins
//! when names collide across schemas.

mod binder;
mod selection;
mod strategy;
mod table;

pub use binder::bind_tables;
pub use selection::{SchemaSelection, SelectedTable, like_matches, select_tables};
pub use strategy::{DefaultStrategy, RevengStrategy, SelectionStrategy};
pub use table::{ColumnDescriptor, ForeignKeyDescriptor, TableDescriptor, TableKey, TableSet};
