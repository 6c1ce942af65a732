use chrono::NaiveDate;
use rand::distr::{Distribution, Uniform};
use rand::{Rng, RngCore};
use rand_regex::Regex as RandRegex;

use crate::errors::GenerationError;
use crate::generators::{
    GeneratedValue, Generator, GeneratorContext, GeneratorInfo, GeneratorRegistry,
};
use crate::params::{ParamBag, ParamKind, ParamSpec, validate_params};

const DEFAULT_INT_MIN: i64 = 0;
const DEFAULT_INT_MAX: i64 = 10000;
const DEFAULT_FLOAT_MIN: f64 = 0.0;
const DEFAULT_FLOAT_MAX: f64 = 10000.0;
const DEFAULT_TEXT_LEN: i64 = 12;
const DEFAULT_MAX_REPEAT: u32 = 32;
const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER_LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

const NO_PARAMS: &[ParamSpec] = &[];
const INT_RANGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Int, false)
        .with_default("0")
        .describe("Minimum integer value"),
    ParamSpec::new("max", ParamKind::Int, false)
        .with_default("10000")
        .describe("Maximum integer value"),
];
const FLOAT_RANGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Float, false)
        .with_default("0")
        .describe("Minimum float value"),
    ParamSpec::new("max", ParamKind::Float, false)
        .with_default("10000")
        .describe("Maximum float value"),
];
const TEMPLATE_PARAMS: &[ParamSpec] = &[ParamSpec::new("str", ParamKind::String, true)
    .describe("Template whose placeholders are replaced")];
const LITERAL_PARAMS: &[ParamSpec] = &[ParamSpec::new("value", ParamKind::String, false)
    .with_default("")
    .describe("Value emitted for every row")];
const RANDOM_STRING_PARAMS: &[ParamSpec] = &[ParamSpec::new(
    "strings",
    ParamKind::StringArray,
    true,
)
.describe("Candidate values")];
const TEXT_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min_len", ParamKind::Int, false)
        .with_default("12")
        .describe("Minimum length"),
    ParamSpec::new("max_len", ParamKind::Int, false)
        .with_default("12")
        .describe("Maximum length"),
    ParamSpec::new("charset", ParamKind::String, false).describe("Characters to draw from"),
];
const DATE_RANGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Date, false)
        .with_default("1970-01-01")
        .describe("Earliest date (YYYY-MM-DD)"),
    ParamSpec::new("max", ParamKind::Date, false)
        .with_default("2030-12-31")
        .describe("Latest date (YYYY-MM-DD)"),
];
const REGEX_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("str", ParamKind::String, true).describe("Regular expression to match"),
    ParamSpec::new("max_repeat", ParamKind::Int, false)
        .with_default("32")
        .describe("Upper bound for unbounded repetition"),
];

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(BoolGenerator));
    registry.register_generator(Box::new(IntRangeGenerator));
    registry.register_generator(Box::new(FloatRangeGenerator));
    registry.register_generator(Box::new(DigitGenerator));
    registry.register_generator(Box::new(LetterGenerator));
    registry.register_generator(Box::new(NumerifyGenerator));
    registry.register_generator(Box::new(LexifyGenerator));
    registry.register_generator(Box::new(LiteralGenerator));
    registry.register_generator(Box::new(RandomStringGenerator));
    registry.register_generator(Box::new(TextGenerator));
    registry.register_generator(Box::new(UuidGenerator));
    registry.register_generator(Box::new(DateRangeGenerator));
    registry.register_generator(Box::new(RegexGenerator));
}

struct BoolGenerator;

impl Generator for BoolGenerator {
    fn id(&self) -> &'static str {
        "bool"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Boolean",
            category: "misc",
            description: "Random true or false value",
            example: "true",
            output: "bool",
            params: NO_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        validate_params(params, NO_PARAMS, self.id())?;
        Ok(GeneratedValue::Bool(rng.random_bool(0.5)))
    }
}

struct IntRangeGenerator;

impl Generator for IntRangeGenerator {
    fn id(&self) -> &'static str {
        "number"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Number",
            category: "number",
            description: "Integer drawn uniformly between min and max, inclusive",
            example: "4213",
            output: "int",
            params: INT_RANGE_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, INT_RANGE_PARAMS, self.id())?;
        let min = params.get_i64("min").unwrap_or(DEFAULT_INT_MIN);
        let max = params.get_i64("max").unwrap_or(DEFAULT_INT_MAX);
        if min > max {
            return Err(GenerationError::InvalidParams(format!(
                "{} min must be <= max",
                self.id()
            )));
        }
        Ok(GeneratedValue::Int(rng.random_range(min..=max)))
    }
}

struct FloatRangeGenerator;

impl Generator for FloatRangeGenerator {
    fn id(&self) -> &'static str {
        "float"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Float",
            category: "number",
            description: "Float drawn uniformly between min and max",
            example: "812.4471",
            output: "float",
            params: FLOAT_RANGE_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, FLOAT_RANGE_PARAMS, self.id())?;
        let min = params.get_f64("min").unwrap_or(DEFAULT_FLOAT_MIN);
        let max = params.get_f64("max").unwrap_or(DEFAULT_FLOAT_MAX);
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(GenerationError::InvalidParams(format!(
                "{} min must be <= max",
                self.id()
            )));
        }
        if min == max {
            return Ok(GeneratedValue::Float(min));
        }
        let range = Uniform::new_inclusive(min, max).map_err(|err| {
            GenerationError::InvalidParams(format!("{}: {err} for [{min}, {max}]", self.id()))
        })?;
        Ok(GeneratedValue::Float(range.sample(rng)))
    }
}

struct DigitGenerator;

impl Generator for DigitGenerator {
    fn id(&self) -> &'static str {
        "digit"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Digit",
            category: "string",
            description: "Single decimal digit",
            example: "7",
            output: "string",
            params: NO_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        validate_params(params, NO_PARAMS, self.id())?;
        Ok(GeneratedValue::Text(random_digit(rng).to_string()))
    }
}

struct LetterGenerator;

impl Generator for LetterGenerator {
    fn id(&self) -> &'static str {
        "letter"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Letter",
            category: "string",
            description: "Single ASCII letter",
            example: "g",
            output: "string",
            params: NO_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        validate_params(params, NO_PARAMS, self.id())?;
        Ok(GeneratedValue::Text(pick_byte(LETTERS, rng).to_string()))
    }
}

struct NumerifyGenerator;

impl Generator for NumerifyGenerator {
    fn id(&self) -> &'static str {
        "numerify"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Numerify",
            category: "string",
            description: "Replaces every # in str with a random digit",
            example: "ticket-4920",
            output: "string",
            params: TEMPLATE_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, TEMPLATE_PARAMS, self.id())?;
        let template = params.require_str("str")?;
        let value = template
            .chars()
            .map(|ch| if ch == '#' { random_digit(rng) } else { ch })
            .collect();
        Ok(GeneratedValue::Text(value))
    }
}

struct LexifyGenerator;

impl Generator for LexifyGenerator {
    fn id(&self) -> &'static str {
        "lexify"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Lexify",
            category: "string",
            description: "Replaces every ? in str with a random lowercase letter",
            example: "code-qzk",
            output: "string",
            params: TEMPLATE_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, TEMPLATE_PARAMS, self.id())?;
        let template = params.require_str("str")?;
        let value = template
            .chars()
            .map(|ch| {
                if ch == '?' {
                    pick_byte(LOWER_LETTERS, rng)
                } else {
                    ch
                }
            })
            .collect();
        Ok(GeneratedValue::Text(value))
    }
}

struct LiteralGenerator;

impl Generator for LiteralGenerator {
    fn id(&self) -> &'static str {
        "literal"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Literal",
            category: "misc",
            description: "Emits the same value on every row",
            example: "active",
            output: "string",
            params: LITERAL_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        _rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, LITERAL_PARAMS, self.id())?;
        let value = params.get_str("value").unwrap_or_default();
        Ok(GeneratedValue::Text(value.to_string()))
    }
}

struct RandomStringGenerator;

impl Generator for RandomStringGenerator {
    fn id(&self) -> &'static str {
        "randomstring"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Random String",
            category: "misc",
            description: "Picks one of the given strings",
            example: "red",
            output: "string",
            params: RANDOM_STRING_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, RANDOM_STRING_PARAMS, self.id())?;
        let choices = params.get_strings("strings");
        if choices.is_empty() {
            return Err(GenerationError::InvalidParams(format!(
                "{}: strings must not be empty",
                self.id()
            )));
        }
        let idx = rng.random_range(0..choices.len());
        Ok(GeneratedValue::Text(choices[idx].clone()))
    }
}

struct TextGenerator;

impl Generator for TextGenerator {
    fn id(&self) -> &'static str {
        "text"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Text",
            category: "string",
            description: "Random characters from a charset, length between min_len and max_len",
            example: "aZ3kQ90bLm1x",
            output: "string",
            params: TEXT_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, TEXT_PARAMS, self.id())?;
        let min_len = params.get_i64("min_len").unwrap_or(DEFAULT_TEXT_LEN);
        let max_len = params.get_i64("max_len").unwrap_or(DEFAULT_TEXT_LEN);
        if min_len < 0 || max_len < 0 {
            return Err(GenerationError::InvalidParams(format!(
                "{}: min_len and max_len must be >= 0",
                self.id()
            )));
        }
        if min_len > max_len {
            return Err(GenerationError::InvalidParams(format!(
                "{}: min_len must be <= max_len",
                self.id()
            )));
        }

        let chars: Vec<char> = params
            .get_str("charset")
            .unwrap_or(DEFAULT_CHARSET)
            .chars()
            .collect();
        if chars.is_empty() {
            return Err(GenerationError::InvalidParams(format!(
                "{}: charset must not be empty",
                self.id()
            )));
        }

        let len = rng.random_range(min_len..=max_len) as usize;
        let mut value = String::new();
        for _ in 0..len {
            value.push(chars[rng.random_range(0..chars.len())]);
        }
        Ok(GeneratedValue::Text(value))
    }
}

struct UuidGenerator;

impl Generator for UuidGenerator {
    fn id(&self) -> &'static str {
        "uuid"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "UUID",
            category: "misc",
            description: "Random version 4 UUID",
            example: "590c1440-9888-45b0-bd51-a817ee07c3f2",
            output: "string",
            params: NO_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        validate_params(params, NO_PARAMS, self.id())?;
        let mut bytes = [0_u8; 16];
        rng.fill_bytes(&mut bytes);
        Ok(GeneratedValue::Uuid(
            uuid::Builder::from_random_bytes(bytes)
                .into_uuid()
                .to_string(),
        ))
    }
}

struct DateRangeGenerator;

impl Generator for DateRangeGenerator {
    fn id(&self) -> &'static str {
        "date"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Date",
            category: "time",
            description: "Calendar date between min and max, inclusive",
            example: "2014-06-21",
            output: "date",
            params: DATE_RANGE_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, DATE_RANGE_PARAMS, self.id())?;
        let (Some(min), Some(max)) = (params.get_date("min"), params.get_date("max")) else {
            return Err(GenerationError::InvalidParams(format!(
                "{}: min and max must be dates",
                self.id()
            )));
        };
        if min > max {
            return Err(GenerationError::InvalidParams(format!(
                "{} min must be <= max",
                self.id()
            )));
        }
        let span = (max - min).num_days();
        let offset = rng.random_range(0..=span);
        Ok(GeneratedValue::Date(offset_date(min, offset)))
    }
}

struct RegexGenerator;

impl Generator for RegexGenerator {
    fn id(&self) -> &'static str {
        "regex"
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: "Regex",
            category: "string",
            description: "Random string matching the given regular expression",
            example: "ABC-0192",
            output: "string",
            params: REGEX_PARAMS,
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, REGEX_PARAMS, self.id())?;
        let pattern = params.require_str("str")?;
        let max_repeat = params
            .get_i64("max_repeat")
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(DEFAULT_MAX_REPEAT);
        let regex = RandRegex::compile(pattern, max_repeat).map_err(|err| {
            GenerationError::InvalidParams(format!("invalid regex pattern for regex: {err}"))
        })?;
        let value: String = rng.sample(regex);
        Ok(GeneratedValue::Text(value))
    }
}

fn random_digit(rng: &mut dyn RngCore) -> char {
    char::from(b'0' + rng.random_range(0..10_u8))
}

fn pick_byte(set: &[u8], rng: &mut dyn RngCore) -> char {
    char::from(set[rng.random_range(0..set.len())])
}

fn offset_date(base: NaiveDate, days: i64) -> NaiveDate {
    base.checked_add_signed(chrono::Duration::days(days))
        .unwrap_or(base)
}
