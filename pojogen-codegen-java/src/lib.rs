//! Java renderers for pojogen.
//!
//! - [`PojoRenderer`] - one `.java` source per entity and component class
//! - [`HbmXmlRenderer`] - one `.hbm.xml` mapping document per entity

mod hbm;
mod pojo;
mod xml;

pub use hbm::HbmXmlRenderer;
pub use pojo::PojoRenderer;
