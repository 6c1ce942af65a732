use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::RngCore;
use serde::Serialize;
use tracing::warn;

use crate::errors::GenerationError;
use crate::model::AUTOINCREMENT;
use crate::params::{ParamBag, ParamSpec};

pub mod faker;
pub mod primitives;

/// Value produced by a generator for one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Bytes(Vec<u8>),
    List(Vec<GeneratedValue>),
    Map(BTreeMap<String, GeneratedValue>),
}

/// The single text form used for every cell, whatever the variant.
impl fmt::Display for GeneratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratedValue::Null => Ok(()),
            GeneratedValue::Bool(value) => write!(f, "{value}"),
            GeneratedValue::Int(value) => write!(f, "{value}"),
            GeneratedValue::Float(value) => write!(f, "{value}"),
            GeneratedValue::Text(value) | GeneratedValue::Uuid(value) => f.write_str(value),
            GeneratedValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            GeneratedValue::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
            GeneratedValue::Timestamp(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S")),
            GeneratedValue::Bytes(value) => f.write_str(&String::from_utf8_lossy(value)),
            GeneratedValue::List(values) => {
                f.write_str("[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            GeneratedValue::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Descriptive metadata shown by `list` and `describe`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeneratorInfo {
    pub display: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub example: &'static str,
    pub output: &'static str,
    pub params: &'static [ParamSpec],
}

/// Per-cell context handed to a generator.
pub struct GeneratorContext<'a> {
    pub registry: &'a GeneratorRegistry,
    pub row_index: u64,
}

pub trait Generator: Send + Sync {
    fn id(&self) -> &'static str;

    fn info(&self) -> GeneratorInfo;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError>;
}

/// Name-to-generator lookup, filled once and read-only afterwards.
pub struct GeneratorRegistry {
    generators: BTreeMap<&'static str, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Registry holding the full built-in catalog.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        primitives::register(&mut registry);
        faker::register(&mut registry);
        crate::command::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            generators: BTreeMap::new(),
        }
    }

    pub fn register_generator(&mut self, generator: Box<dyn Generator>) {
        let id = generator.id();
        if id == AUTOINCREMENT {
            warn!(generator = id, "reserved generator id ignored");
            return;
        }
        self.generators.insert(id, generator);
    }

    pub fn generator(&self, id: &str) -> Option<&dyn Generator> {
        self.generators.get(id).map(|generator| generator.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.generators.contains_key(id)
    }

    pub fn generator_ids(&self) -> Vec<&'static str> {
        self.generators.keys().copied().collect()
    }

    pub fn generators(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.values().map(|generator| generator.as_ref())
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.generator_ids())
            .finish()
    }
}
