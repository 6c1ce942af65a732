use datasmith_generate::{AUTOINCREMENT, CsvOptions, FieldDescriptor, GeneratorRegistry, ParamBag, TableEngine};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let rows: i64 = match args.next() {
        Some(value) => value.parse()?,
        None => 11,
    };

    let fields = vec![
        FieldDescriptor::new("id", AUTOINCREMENT),
        FieldDescriptor::new("first_name", "firstname"),
        FieldDescriptor::new("last_name", "lastname"),
        FieldDescriptor::new("password", "password")
            .with_params(ParamBag::new().with("min_len", ["12"]).with("max_len", ["12"])),
    ];

    let registry = GeneratorRegistry::new();
    let bytes = TableEngine::new(&registry).generate_csv(&CsvOptions::new(fields, rows))?;
    print!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
