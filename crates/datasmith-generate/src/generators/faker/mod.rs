//! Generators backed by the `fake` crate (English locale).

use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StateName, StreetName, ZipCode};
use fake::faker::company::en::{CompanyName, Profession};
use fake::faker::internet::en::{DomainSuffix, IPv4, Password, SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::RngCore;

use crate::errors::GenerationError;
use crate::generators::{
    GeneratedValue, Generator, GeneratorContext, GeneratorInfo, GeneratorRegistry,
};
use crate::params::{ParamBag, ParamKind, ParamSpec, validate_params};

const NO_PARAMS: &[ParamSpec] = &[];
const SENTENCE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min_words", ParamKind::Int, false)
        .with_default("4")
        .describe("Minimum number of words"),
    ParamSpec::new("max_words", ParamKind::Int, false)
        .with_default("10")
        .describe("Maximum number of words"),
];
const PASSWORD_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min_len", ParamKind::Int, false)
        .with_default("8")
        .describe("Minimum password length"),
    ParamSpec::new("max_len", ParamKind::Int, false)
        .with_default("16")
        .describe("Maximum password length"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FakerKind {
    FirstName,
    LastName,
    Name,
    Email,
    Username,
    Phone,
    City,
    State,
    Country,
    Street,
    Zip,
    Company,
    JobTitle,
    Ipv4,
    Url,
    Word,
    Sentence,
    Password,
}

struct FakerEntry {
    id: &'static str,
    kind: FakerKind,
    display: &'static str,
    category: &'static str,
    description: &'static str,
    example: &'static str,
}

const fn entry(
    id: &'static str,
    kind: FakerKind,
    display: &'static str,
    category: &'static str,
    description: &'static str,
    example: &'static str,
) -> FakerEntry {
    FakerEntry {
        id,
        kind,
        display,
        category,
        description,
        example,
    }
}

const ENTRIES: &[FakerEntry] = &[
    entry("firstname", FakerKind::FirstName, "First Name", "person", "Given name", "Markus"),
    entry("lastname", FakerKind::LastName, "Last Name", "person", "Family name", "Moen"),
    entry("name", FakerKind::Name, "Name", "person", "First and last name", "Markus Moen"),
    entry("email", FakerKind::Email, "Email", "internet", "Email address on a safe domain", "markus@example.com"),
    entry("username", FakerKind::Username, "Username", "internet", "Login handle", "markus_moen"),
    entry("phone", FakerKind::Phone, "Phone", "person", "Phone number", "(555) 613-2087"),
    entry("city", FakerKind::City, "City", "address", "City name", "Marcelside"),
    entry("state", FakerKind::State, "State", "address", "State name", "Oregon"),
    entry("country", FakerKind::Country, "Country", "address", "Country name", "Norway"),
    entry("street", FakerKind::Street, "Street", "address", "Street name", "Hilll Lane"),
    entry("zip", FakerKind::Zip, "Zip", "address", "Postal code", "49034"),
    entry("company", FakerKind::Company, "Company", "company", "Company name", "Moen and Sons"),
    entry("jobtitle", FakerKind::JobTitle, "Job Title", "company", "Profession", "Engineer"),
    entry("ipv4", FakerKind::Ipv4, "IPv4 Address", "internet", "Dotted-quad IPv4 address", "222.83.191.222"),
    entry("url", FakerKind::Url, "URL", "internet", "Web address", "https://www.velit.com"),
    entry("word", FakerKind::Word, "Word", "lorem", "Lorem ipsum word", "quia"),
    entry("sentence", FakerKind::Sentence, "Sentence", "lorem", "Lorem ipsum sentence", "Quia aut et voluptas."),
    entry("password", FakerKind::Password, "Password", "internet", "Random password", "Dc0VYXjkWABx"),
];

pub fn register(registry: &mut GeneratorRegistry) {
    for entry in ENTRIES {
        registry.register_generator(Box::new(FakerGenerator { entry }));
    }
}

struct FakerGenerator {
    entry: &'static FakerEntry,
}

impl FakerGenerator {
    fn param_specs(&self) -> &'static [ParamSpec] {
        match self.entry.kind {
            FakerKind::Sentence => SENTENCE_PARAMS,
            FakerKind::Password => PASSWORD_PARAMS,
            _ => NO_PARAMS,
        }
    }
}

impl Generator for FakerGenerator {
    fn id(&self) -> &'static str {
        self.entry.id
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            display: self.entry.display,
            category: self.entry.category,
            description: self.entry.description,
            example: self.entry.example,
            output: "string",
            params: self.param_specs(),
        }
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        params: &ParamBag,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let params = validate_params(params, self.param_specs(), self.entry.id)?;
        let value: String = match self.entry.kind {
            FakerKind::FirstName => FirstName().fake_with_rng(rng),
            FakerKind::LastName => LastName().fake_with_rng(rng),
            FakerKind::Name => Name().fake_with_rng(rng),
            FakerKind::Email => SafeEmail().fake_with_rng(rng),
            FakerKind::Username => Username().fake_with_rng(rng),
            FakerKind::Phone => PhoneNumber().fake_with_rng(rng),
            FakerKind::City => CityName().fake_with_rng(rng),
            FakerKind::State => StateName().fake_with_rng(rng),
            FakerKind::Country => CountryName().fake_with_rng(rng),
            FakerKind::Street => StreetName().fake_with_rng(rng),
            FakerKind::Zip => ZipCode().fake_with_rng(rng),
            FakerKind::Company => CompanyName().fake_with_rng(rng),
            FakerKind::JobTitle => Profession().fake_with_rng(rng),
            FakerKind::Ipv4 => IPv4().fake_with_rng(rng),
            FakerKind::Url => {
                let host: String = Word().fake_with_rng(rng);
                let suffix: String = DomainSuffix().fake_with_rng(rng);
                format!("https://www.{}.{suffix}", host.to_lowercase())
            }
            FakerKind::Word => Word().fake_with_rng(rng),
            FakerKind::Sentence => {
                let (min, max) = bounded_range(
                    self.entry.id,
                    params.get_i64("min_words"),
                    params.get_i64("max_words"),
                )?;
                Sentence(min..max + 1).fake_with_rng(rng)
            }
            FakerKind::Password => {
                let (min, max) = bounded_range(
                    self.entry.id,
                    params.get_i64("min_len"),
                    params.get_i64("max_len"),
                )?;
                Password(min..max + 1).fake_with_rng(rng)
            }
        };
        Ok(GeneratedValue::Text(value))
    }
}

fn bounded_range(
    ctx: &str,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<(usize, usize), GenerationError> {
    let (Some(min), Some(max)) = (min, max) else {
        return Err(GenerationError::InvalidParams(format!(
            "{ctx}: bounds must be integers"
        )));
    };
    if min < 1 || max < min {
        return Err(GenerationError::InvalidParams(format!(
            "{ctx}: bounds must satisfy 1 <= min <= max"
        )));
    }
    Ok((min as usize, max as usize))
}
