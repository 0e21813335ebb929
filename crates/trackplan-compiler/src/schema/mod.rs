//! Schema source parsing, typed model, and validation.

pub mod model;
pub mod parser;
pub mod validate;

pub use model::{EventDef, EventsFile, GroupFile, PropertyDef, SchemaBundle};
pub use validate::SchemaValidator;
