//! Text building primitives shared by renderers.
//!
//! - [`CodeBuilder`] - Fluent API for building indented source text
//! - [`Indent`] - Indentation configuration

mod code_builder;
mod indent;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
