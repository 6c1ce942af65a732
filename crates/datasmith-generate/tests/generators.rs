use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use datasmith_generate::errors::GenerationError;
use datasmith_generate::{
    AUTOINCREMENT, CsvOptions, FieldDescriptor, GeneratedValue, GeneratorContext,
    GeneratorRegistry, ParamBag, TableEngine,
};

fn params(value: serde_json::Value) -> ParamBag {
    serde_json::from_value(value).expect("decode params")
}

fn run(
    registry: &GeneratorRegistry,
    id: &str,
    bag: &ParamBag,
) -> Result<GeneratedValue, GenerationError> {
    let generator = registry.generator(id).expect("generator exists");
    let ctx = GeneratorContext {
        registry,
        row_index: 1,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    generator.generate(&ctx, bag, &mut rng)
}

#[test]
fn generator_ids_are_sorted_and_unique() {
    let registry = GeneratorRegistry::new();
    let ids = registry.generator_ids();
    assert!(!ids.is_empty());

    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(ids, sorted);
}

#[test]
fn catalog_covers_core_generators() {
    let registry = GeneratorRegistry::new();
    for id in [
        "bool", "csv", "date", "email", "firstname", "literal", "name", "number", "regex",
        "uuid",
    ] {
        assert!(registry.contains(id), "missing generator '{id}'");
    }
    assert!(!registry.contains(AUTOINCREMENT));
}

#[test]
fn every_generator_describes_itself() {
    let registry = GeneratorRegistry::new();
    for generator in registry.generators() {
        let info = generator.info();
        assert!(!info.display.is_empty(), "{} has no display name", generator.id());
        assert!(!info.category.is_empty(), "{} has no category", generator.id());
        assert!(!info.description.is_empty(), "{} has no description", generator.id());
    }
}

#[test]
fn every_parameterless_call_succeeds_or_reports_params() {
    let registry = GeneratorRegistry::new();
    for id in registry.generator_ids() {
        match run(&registry, id, &ParamBag::new()) {
            Ok(_) => {}
            Err(GenerationError::InvalidParams(message)) => {
                assert!(message.contains("missing required param"), "{id}: {message}");
            }
            Err(other) => panic!("{id} failed unexpectedly: {other}"),
        }
    }
}

#[test]
fn number_respects_bounds() {
    let registry = GeneratorRegistry::new();
    let bag = params(json!({"min": 5, "max": 7}));
    for _ in 0..20 {
        let value = run(&registry, "number", &bag).expect("number");
        let GeneratedValue::Int(value) = value else {
            panic!("number should produce an int");
        };
        assert!((5..=7).contains(&value));
    }
}

#[test]
fn number_rejects_inverted_bounds() {
    let registry = GeneratorRegistry::new();
    let result = run(&registry, "number", &params(json!({"min": 10, "max": 1})));
    assert!(matches!(result, Err(GenerationError::InvalidParams(_))));
}

#[test]
fn float_respects_bounds() {
    let registry = GeneratorRegistry::new();
    let bag = params(json!({"min": "-2.5", "max": "2.5"}));
    for _ in 0..20 {
        let GeneratedValue::Float(value) = run(&registry, "float", &bag).expect("float") else {
            panic!("float should produce a float");
        };
        assert!((-2.5..=2.5).contains(&value));
    }
}

#[test]
fn float_rejects_a_span_that_overflows() {
    let registry = GeneratorRegistry::new();
    let bag = params(json!({"min": "-1e308", "max": "1e308"}));
    let result = run(&registry, "float", &bag);
    assert!(matches!(result, Err(GenerationError::InvalidParams(_))));

    let engine = TableEngine::new(&registry);
    let options = CsvOptions::new(vec![FieldDescriptor::new("f", "float").with_params(bag)], 2);
    assert!(matches!(
        engine.generate_csv(&options),
        Err(GenerationError::InvalidParams(message)) if message.starts_with("float")
    ));
}

#[test]
fn unknown_params_are_rejected() {
    let registry = GeneratorRegistry::new();
    let result = run(&registry, "uuid", &params(json!({"version": 7})));
    assert!(matches!(result, Err(GenerationError::InvalidParams(_))));
}

#[test]
fn date_stays_inside_range() {
    let registry = GeneratorRegistry::new();
    let bag = params(json!({"min": "2024-01-01", "max": "2024-01-03"}));
    let value = run(&registry, "date", &bag).expect("date");
    let GeneratedValue::Date(date) = value else {
        panic!("date should produce a date");
    };
    let min = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();
    let max = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap_or_default();
    assert!(date >= min && date <= max);
}

#[test]
fn regex_output_matches_pattern() {
    let registry = GeneratorRegistry::new();
    let value = run(&registry, "regex", &params(json!({"str": "[A-Z]{3}-[0-9]{4}"})))
        .expect("regex");
    let pattern = regex::Regex::new("^[A-Z]{3}-[0-9]{4}$").expect("compile");
    assert!(pattern.is_match(&value.to_string()));
}

#[test]
fn regex_rejects_invalid_pattern() {
    let registry = GeneratorRegistry::new();
    let result = run(&registry, "regex", &params(json!({"str": "(unclosed"})));
    assert!(matches!(result, Err(GenerationError::InvalidParams(_))));
}

#[test]
fn numerify_and_lexify_fill_placeholders() {
    let registry = GeneratorRegistry::new();
    let digits = run(&registry, "numerify", &params(json!({"str": "id-###"}))).expect("numerify");
    let digits = digits.to_string();
    assert!(digits.starts_with("id-"));
    assert!(digits[3..].chars().all(|ch| ch.is_ascii_digit()));

    let letters = run(&registry, "lexify", &params(json!({"str": "??-x"}))).expect("lexify");
    let letters = letters.to_string();
    assert!(letters[..2].chars().all(|ch| ch.is_ascii_lowercase()));
    assert!(letters.ends_with("-x"));
}

#[test]
fn randomstring_picks_from_choices() {
    let registry = GeneratorRegistry::new();
    let bag = params(json!({"strings": ["red", "green", "blue"]}));
    let value = run(&registry, "randomstring", &bag).expect("randomstring").to_string();
    assert!(["red", "green", "blue"].contains(&value.as_str()));
}

#[test]
fn uuid_is_version_four() {
    let registry = GeneratorRegistry::new();
    let value = run(&registry, "uuid", &ParamBag::new()).expect("uuid").to_string();
    let parsed = uuid::Uuid::parse_str(&value).expect("valid uuid");
    assert_eq!(parsed.get_version_num(), 4);
}

#[test]
fn text_honors_length_and_charset() {
    let registry = GeneratorRegistry::new();
    let bag = params(json!({"min_len": 4, "max_len": 4, "charset": "ab"}));
    let value = run(&registry, "text", &bag).expect("text").to_string();
    assert_eq!(value.len(), 4);
    assert!(value.chars().all(|ch| ch == 'a' || ch == 'b'));
}

#[test]
fn password_rejects_zero_length() {
    let registry = GeneratorRegistry::new();
    let result = run(&registry, "password", &params(json!({"min_len": 0})));
    assert!(matches!(result, Err(GenerationError::InvalidParams(_))));
}

#[test]
fn values_render_uniformly() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap_or_default();
    let mut map = BTreeMap::new();
    map.insert("b".to_string(), GeneratedValue::Int(2));
    map.insert("a".to_string(), GeneratedValue::Bool(true));

    let cases = [
        (GeneratedValue::Null, ""),
        (GeneratedValue::Bool(false), "false"),
        (GeneratedValue::Int(-12), "-12"),
        (GeneratedValue::Float(2.5), "2.5"),
        (GeneratedValue::Float(3.0), "3"),
        (GeneratedValue::Text("plain".to_string()), "plain"),
        (GeneratedValue::Date(date), "2024-02-29"),
        (GeneratedValue::Bytes(b"a,b".to_vec()), "a,b"),
        (
            GeneratedValue::List(vec![GeneratedValue::Int(1), GeneratedValue::Int(2)]),
            "[1 2]",
        ),
        (GeneratedValue::Map(map), "{a:true b:2}"),
    ];

    for (value, expected) in cases {
        assert_eq!(value.to_string(), expected);
    }
}
