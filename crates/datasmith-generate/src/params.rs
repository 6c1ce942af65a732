use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::GenerationError;

/// String-keyed multi-value parameter map handed to a generator untouched.
///
/// Decodes from a JSON object whose values are strings, numbers, booleans,
/// or arrays of those. Scalars become one-element lists; non-string values
/// keep their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamBag(BTreeMap<String, Vec<String>>);

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(key.into(), values.into_iter().map(Into::into).collect());
    }

    pub fn with<I, S>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(key, values);
        self
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

impl<'de> Deserialize<'de> for ParamBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
        let mut values = BTreeMap::new();
        for (key, value) in raw.unwrap_or_default() {
            let entries = match value {
                Value::Null => Vec::new(),
                Value::Array(items) => items.iter().map(value_text).collect(),
                other => vec![value_text(&other)],
            };
            values.insert(key, entries);
        }
        Ok(Self(values))
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Int,
    Float,
    String,
    StringArray,
    Date,
}

impl ParamKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::StringArray => "[]string",
            Self::Date => "date",
        }
    }
}

/// Declared parameter of a generator.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn new(key: &'static str, kind: ParamKind, required: bool) -> Self {
        Self {
            key,
            kind,
            required,
            default: None,
            description: "",
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Parameters checked against a generator's declared specs.
pub struct ParamMap<'a> {
    bag: &'a ParamBag,
    specs: &'a [ParamSpec],
    ctx: &'a str,
}

pub fn validate_params<'a>(
    bag: &'a ParamBag,
    specs: &'a [ParamSpec],
    ctx: &'a str,
) -> Result<ParamMap<'a>, GenerationError> {
    for (key, values) in bag.iter() {
        let Some(spec) = specs.iter().find(|spec| spec.key == key) else {
            return Err(GenerationError::InvalidParams(format!(
                "{ctx}: unknown param '{key}'"
            )));
        };
        validate_kind(ctx, spec, values)?;
    }

    for spec in specs {
        if spec.required && spec.default.is_none() && bag.get(spec.key).is_none() {
            return Err(GenerationError::InvalidParams(format!(
                "{ctx}: missing required param '{}'",
                spec.key
            )));
        }
    }

    Ok(ParamMap { bag, specs, ctx })
}

impl<'a> ParamMap<'a> {
    fn raw(&self, key: &str) -> Option<&'a str> {
        if let Some(values) = self.bag.get(key) {
            return values.first().map(String::as_str);
        }
        self.specs
            .iter()
            .find(|spec| spec.key == key)
            .and_then(|spec| spec.default)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.raw(key).and_then(|value| value.trim().parse().ok())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.raw(key).and_then(|value| value.trim().parse().ok())
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.raw(key)
    }

    pub fn get_date(&self, key: &str) -> Option<NaiveDate> {
        self.raw(key).and_then(parse_date_value)
    }

    pub fn get_strings(&self, key: &str) -> &'a [String] {
        self.bag.get(key).unwrap_or(&[])
    }

    pub fn require_str(&self, key: &str) -> Result<&'a str, GenerationError> {
        self.get_str(key).ok_or_else(|| {
            GenerationError::InvalidParams(format!(
                "{}: missing required param '{key}'",
                self.ctx
            ))
        })
    }
}

fn validate_kind(ctx: &str, spec: &ParamSpec, values: &[String]) -> Result<(), GenerationError> {
    if spec.kind != ParamKind::StringArray && values.len() > 1 {
        return Err(GenerationError::InvalidParams(format!(
            "{ctx}: param '{}' expects a single value",
            spec.key
        )));
    }

    let valid = values.iter().all(|value| match spec.kind {
        ParamKind::Int => value.trim().parse::<i64>().is_ok(),
        ParamKind::Float => value.trim().parse::<f64>().is_ok(),
        ParamKind::String | ParamKind::StringArray => true,
        ParamKind::Date => parse_date_value(value).is_some(),
    });

    if valid {
        Ok(())
    } else {
        Err(GenerationError::InvalidParams(format!(
            "{ctx}: invalid value for param '{}', expected {}",
            spec.key,
            spec.kind.as_str()
        )))
    }
}

pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPECS: &[ParamSpec] = &[
        ParamSpec::new("min", ParamKind::Int, false).with_default("0"),
        ParamSpec::new("max", ParamKind::Int, true),
        ParamSpec::new("words", ParamKind::StringArray, false),
    ];

    #[test]
    fn bag_decodes_scalars_and_arrays() {
        let bag: ParamBag =
            serde_json::from_value(json!({"max": 10, "words": ["a", "b"], "flag": true}))
                .expect("decode bag");
        assert_eq!(bag.get("max"), Some(&["10".to_string()][..]));
        assert_eq!(bag.get("words").map(<[String]>::len), Some(2));
        assert_eq!(bag.get("flag"), Some(&["true".to_string()][..]));
    }

    #[test]
    fn null_bag_is_empty() {
        let bag: ParamBag = serde_json::from_value(Value::Null).expect("decode null");
        assert!(bag.is_empty());
    }

    #[test]
    fn defaults_fill_missing_values() {
        let bag = ParamBag::new().with("max", ["5"]);
        let params = validate_params(&bag, SPECS, "test").expect("valid params");
        assert_eq!(params.get_i64("min"), Some(0));
        assert_eq!(params.get_i64("max"), Some(5));
        assert!(params.get_strings("words").is_empty());
    }

    #[test]
    fn rejects_unknown_and_missing_params() {
        let bag = ParamBag::new().with("max", ["5"]).with("step", ["1"]);
        assert!(matches!(
            validate_params(&bag, SPECS, "test"),
            Err(GenerationError::InvalidParams(_))
        ));

        let empty = ParamBag::new();
        assert!(matches!(
            validate_params(&empty, SPECS, "test"),
            Err(GenerationError::InvalidParams(_))
        ));
    }

    #[test]
    fn rejects_wrong_kind() {
        let bag = ParamBag::new().with("max", ["ten"]);
        assert!(validate_params(&bag, SPECS, "test").is_err());
    }
}
