use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::errors::GenerationError;
use crate::generators::{GeneratorContext, GeneratorRegistry};
use crate::model::{AUTOINCREMENT, CsvOptions, FieldDescriptor, Grid, RowCountMode};
use crate::output::csv::encode_grid;

const MAX_RESERVED_ROWS: usize = 1024;

/// Builds tables from field descriptors against a generator registry.
#[derive(Debug, Clone, Copy)]
pub struct TableEngine<'a> {
    registry: &'a GeneratorRegistry,
}

impl<'a> TableEngine<'a> {
    pub fn new(registry: &'a GeneratorRegistry) -> Self {
        Self { registry }
    }

    /// Validate the request and build the full grid, header first.
    ///
    /// All-or-nothing: the first unknown function or generator error aborts
    /// the request and no rows are returned.
    pub fn generate_grid(&self, options: &CsvOptions) -> Result<Grid, GenerationError> {
        options.validate()?;
        self.build_grid(options, &mut seeded_rng(options.seed))
    }

    /// Validate, build, and encode the table as delimited text.
    pub fn generate_csv(&self, options: &CsvOptions) -> Result<Vec<u8>, GenerationError> {
        self.generate_csv_with_rng(options, &mut seeded_rng(options.seed))
    }

    /// Same as [`TableEngine::generate_csv`], drawing values from `rng`
    /// instead of a generator seeded from `options.seed`.
    pub fn generate_csv_with_rng(
        &self,
        options: &CsvOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<u8>, GenerationError> {
        let delimiter = options.validate()?;
        let grid = self.build_grid(options, rng)?;
        let bytes = encode_grid(&grid, delimiter)?;
        debug!(
            bytes = bytes.len(),
            delimiter = ?delimiter,
            "table encoded"
        );
        Ok(bytes)
    }

    fn build_grid(
        &self,
        options: &CsvOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Grid, GenerationError> {
        let start = Instant::now();
        let result = build_rows(
            self.registry,
            &options.fields,
            options.row_count,
            options.row_count_mode,
            rng,
        );

        match &result {
            Ok(grid) => info!(
                fields = options.fields.len(),
                rows = grid.len().saturating_sub(1),
                seed = options.seed,
                duration_ms = start.elapsed().as_millis() as u64,
                "grid generated"
            ),
            Err(err) => warn!(error = %err, "generation failed"),
        }
        result
    }
}

fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    }
}

fn build_rows(
    registry: &GeneratorRegistry,
    fields: &[FieldDescriptor],
    row_count: i64,
    mode: RowCountMode,
    rng: &mut dyn RngCore,
) -> Result<Grid, GenerationError> {
    let body_rows = mode.body_rows(row_count);
    // The row count is caller-controlled; reserve a bounded prefix only.
    let reserve = usize::try_from(body_rows)
        .unwrap_or(usize::MAX)
        .min(MAX_RESERVED_ROWS);
    let mut grid = Vec::with_capacity(reserve + 1);
    grid.push(fields.iter().map(|field| field.name.clone()).collect());

    // Row indexes start at 1; every autoincrement field in a row shares it.
    for row_index in 1..=body_rows {
        let mut row = Vec::with_capacity(fields.len());
        for field in fields {
            row.push(resolve_cell(registry, field, row_index, rng)?);
        }
        grid.push(row);
    }

    Ok(grid)
}

fn resolve_cell(
    registry: &GeneratorRegistry,
    field: &FieldDescriptor,
    row_index: u64,
    rng: &mut dyn RngCore,
) -> Result<String, GenerationError> {
    if field.function == AUTOINCREMENT {
        return Ok(row_index.to_string());
    }

    let generator = registry
        .generator(&field.function)
        .ok_or_else(|| GenerationError::UnknownFunction(field.function.clone()))?;
    let ctx = GeneratorContext {
        registry,
        row_index,
    };
    let value = generator.generate(&ctx, &field.params, rng).map_err(|err| {
        debug!(
            field = %field.name,
            function = %field.function,
            row = row_index,
            error = %err,
            "generator rejected cell"
        );
        err
    })?;
    Ok(value.to_string())
}
