//! Synthetic delimited-text table generation.
//!
//! A request names an ordered list of fields, each bound to a generator in
//! a [`GeneratorRegistry`]. The [`TableEngine`] resolves one value per field
//! per row and encodes the result as CSV or TSV.

pub mod command;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod output;
pub mod params;

pub use engine::TableEngine;
pub use errors::GenerationError;
pub use generators::{GeneratedValue, Generator, GeneratorContext, GeneratorInfo, GeneratorRegistry};
pub use model::{
    AUTOINCREMENT, CsvOptions, DEFAULT_ROW_COUNT, DEFAULT_ROW_COUNT_MODE, Delimiter,
    FieldDescriptor, Grid, RowCountMode, decode_fields,
};
pub use params::ParamBag;

use schemars::schema::RootSchema;
use schemars::schema_for;

/// Emit the JSON Schema for a list of field descriptors.
pub fn fields_json_schema() -> RootSchema {
    schema_for!(Vec<FieldDescriptor>)
}
