//! The `csv` generator: builds a whole table from a parameter bag.

use rand::RngCore;

use crate::engine::TableEngine;
use crate::errors::GenerationError;
use crate::generators::{
    GeneratedValue, Generator, GeneratorContext, GeneratorInfo, GeneratorRegistry,
};
use crate::model::{CsvOptions, DEFAULT_ROW_COUNT_MODE, decode_fields};
use crate::params::{ParamBag, ParamKind, ParamSpec, validate_params};

pub const CSV_COMMAND_ID: &str = "csv";

const CSV_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("rowcount", ParamKind::Int, false)
        .with_default("100")
        .describe("Number of rows, counting the header line"),
    ParamSpec::new("fields", ParamKind::StringArray, true)
        .describe("Fields containing key name and function to run in json format"),
    ParamSpec::new("delimiter", ParamKind::String, false)
        .with_default(",")
        .describe("Separator in between row values"),
];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(CsvCommand));
}

impl CsvOptions {
    /// Build a request from the `csv` command parameters.
    ///
    /// Every entry of `fields` must decode as a JSON field descriptor.
    pub fn from_params(params: &ParamBag) -> Result<Self, GenerationError> {
        let params = validate_params(params, CSV_PARAMS, CSV_COMMAND_ID)?;
        let row_count = params.get_i64("rowcount").ok_or_else(|| {
            GenerationError::InvalidParams(format!("{CSV_COMMAND_ID}: rowcount must be an int"))
        })?;
        let fields = decode_fields(params.get_strings("fields"))?;
        let delimiter = params.get_str("delimiter").unwrap_or_default();

        Ok(Self {
            delimiter: delimiter.to_string(),
            row_count,
            fields,
            row_count_mode: DEFAULT_ROW_COUNT_MODE,
            seed: None,
        })
    }
}

struct CsvCommand;

impl Generator for CsvCommand {
    fn id(&self) -> &'static str {
        CSV_COMMAND_ID
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "CSV",
            category: "file",
            description: "Generates array of rows in csv format",
            example: "id,first_name,last_name\n1,Markus,Moen\n2,Osborne,Hilll",
            output: "bytes",
            params: CSV_PARAMS,
        }
    }

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let options = CsvOptions::from_params(params)?;
        let bytes = TableEngine::new(ctx.registry).generate_csv_with_rng(&options, rng)?;
        Ok(GeneratedValue::Bytes(bytes))
    }
}
