use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::params::ParamBag;

/// Reserved function name that emits the current row index.
pub const AUTOINCREMENT: &str = "autoincrement";

/// Row count applied when a request does not name one.
pub const DEFAULT_ROW_COUNT: i64 = 100;

/// Row-count reading used unless a caller opts into `DataRows`.
pub const DEFAULT_ROW_COUNT_MODE: RowCountMode = RowCountMode::IncludesHeader;

/// One output column: header label, generator name, and generator params.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    /// Header label for the column.
    pub name: String,
    /// Registry generator id, or `autoincrement`.
    pub function: String,
    /// Generator-specific parameters, passed through untouched.
    #[serde(default)]
    #[schemars(with = "Option<BTreeMap<String, serde_json::Value>>")]
    pub params: ParamBag,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function: function.into(),
            params: ParamBag::new(),
        }
    }

    pub fn with_params(mut self, params: ParamBag) -> Self {
        self.params = params;
        self
    }

    /// Decode one field from its JSON text.
    pub fn from_json(text: &str) -> Result<Self, GenerationError> {
        serde_json::from_str(text).map_err(|err| GenerationError::FieldDecode(err.to_string()))
    }
}

/// Decode a list of JSON-encoded fields; the first failure discards the rest.
pub fn decode_fields<S: AsRef<str>>(texts: &[S]) -> Result<Vec<FieldDescriptor>, GenerationError> {
    texts
        .iter()
        .map(|text| FieldDescriptor::from_json(text.as_ref()))
        .collect()
}

/// Column separator of the encoded table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Normalize a user-supplied delimiter: empty means comma, `tab` in any
    /// case means tab, anything other than `,` or a tab is rejected.
    pub fn parse(value: &str) -> Result<Self, GenerationError> {
        if value.is_empty() || value == "," {
            return Ok(Self::Comma);
        }
        if value == "\t" || value.eq_ignore_ascii_case("tab") {
            return Ok(Self::Tab);
        }
        Err(GenerationError::InvalidDelimiter(value.to_string()))
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
        }
    }
}

/// How the requested row count maps to body rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowCountMode {
    /// The count includes the header line: `N` yields `N - 1` body rows.
    #[default]
    IncludesHeader,
    /// The count is the number of body rows.
    DataRows,
}

impl RowCountMode {
    /// Number of body rows produced for a validated, positive row count.
    pub fn body_rows(self, row_count: i64) -> u64 {
        let row_count = row_count.max(0) as u64;
        match self {
            Self::IncludesHeader => row_count.saturating_sub(1),
            Self::DataRows => row_count,
        }
    }
}

/// One table generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvOptions {
    #[serde(default)]
    pub delimiter: String,
    #[serde(default = "default_row_count")]
    pub row_count: i64,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub row_count_mode: RowCountMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_row_count() -> i64 {
    DEFAULT_ROW_COUNT
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
            row_count: DEFAULT_ROW_COUNT,
            fields: Vec::new(),
            row_count_mode: DEFAULT_ROW_COUNT_MODE,
            seed: None,
        }
    }
}

impl CsvOptions {
    pub fn new(fields: Vec<FieldDescriptor>, row_count: i64) -> Self {
        Self {
            fields,
            row_count,
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_row_count_mode(mut self, mode: RowCountMode) -> Self {
        self.row_count_mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the request in order: delimiter, fields, row count.
    pub fn validate(&self) -> Result<Delimiter, GenerationError> {
        let delimiter = Delimiter::parse(&self.delimiter)?;
        if self.fields.is_empty() {
            return Err(GenerationError::MissingFields);
        }
        if self.row_count <= 0 {
            return Err(GenerationError::MissingRowCount);
        }
        Ok(delimiter)
    }
}

/// Header row followed by body rows.
pub type Grid = Vec<Vec<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_normalization() {
        assert_eq!(Delimiter::parse("").ok(), Some(Delimiter::Comma));
        assert_eq!(Delimiter::parse(",").ok(), Some(Delimiter::Comma));
        assert_eq!(Delimiter::parse("\t").ok(), Some(Delimiter::Tab));
        for alias in ["tab", "TAB", "Tab"] {
            assert_eq!(Delimiter::parse(alias).ok(), Some(Delimiter::Tab));
        }
        for bad in ["comma", "|", ";", ", "] {
            assert!(matches!(
                Delimiter::parse(bad),
                Err(GenerationError::InvalidDelimiter(_))
            ));
        }
    }

    #[test]
    fn validation_order_checks_delimiter_first() {
        let options = CsvOptions::new(Vec::new(), 0).with_delimiter("|");
        assert!(matches!(
            options.validate(),
            Err(GenerationError::InvalidDelimiter(_))
        ));

        let options = CsvOptions::new(Vec::new(), 0);
        assert!(matches!(options.validate(), Err(GenerationError::MissingFields)));
    }

    #[test]
    fn body_rows_per_mode() {
        assert_eq!(RowCountMode::IncludesHeader.body_rows(1), 0);
        assert_eq!(RowCountMode::IncludesHeader.body_rows(3), 2);
        assert_eq!(RowCountMode::DataRows.body_rows(3), 3);
    }

    #[test]
    fn field_params_default_to_empty() {
        let field = FieldDescriptor::from_json(r#"{"name":"id","function":"autoincrement"}"#)
            .expect("decode field");
        assert_eq!(field, FieldDescriptor::new("id", AUTOINCREMENT));
    }

    #[test]
    fn malformed_field_is_a_decode_error() {
        let result = decode_fields(&[r#"{"name":"id","function":"uuid"}"#, "{not json"]);
        assert!(matches!(result, Err(GenerationError::FieldDecode(_))));
    }
}
