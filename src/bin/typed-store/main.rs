//! Command-line inspector for typed-store databases.

mod logging;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use typed_store::{
    BackendError, Config, FjallBackend, LoggingConfig, StoreConfig, TypedStore, config,
};

/// CLI-specific errors.
#[derive(Error, Debug)]
enum AppError {
    /// Library error (wraps all typed_store errors)
    #[error(transparent)]
    Library(#[from] typed_store::Error),

    #[error(transparent)]
    Logging(#[from] logging::LoggingError),

    #[error("Cannot parse '{value}' as {kind}")]
    InvalidValue { value: String, kind: &'static str },

    #[error("Expected exactly one value for kind '{0}'")]
    SingleValue(&'static str),

    #[error("Key '{0}' not found")]
    KeyNotFound(String),
}

/// Value kinds addressable from the command line.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Kind {
    Bool,
    Int,
    Long,
    Float,
    Double,
    #[default]
    String,
    /// Any JSON value, stored through the object accessors.
    Json,
    /// Set of strings (`get`/`set` only).
    StringSet,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Json => "json",
            Kind::StringSet => "string-set",
        }
    }
}

#[derive(Parser)]
#[command(name = "typed-store")]
#[command(about = "Inspect and edit a typed-store database")]
struct Cli {
    /// TOML configuration file; --path/--namespace override its [store] table.
    #[arg(short, long, env = "TYPED_STORE_CONFIG")]
    config: Option<PathBuf>,

    /// Database directory.
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Namespace within the database.
    #[arg(short, long)]
    namespace: Option<String>,

    /// Log filter, e.g. "debug" or "typed_store=trace".
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored keys
    Keys,
    /// Print the value at KEY
    Get {
        key: String,
        #[arg(short, long, value_enum, default_value_t)]
        kind: Kind,
    },
    /// Store a value at KEY (several values for string-set)
    Set {
        key: String,
        #[arg(required = true)]
        values: Vec<String>,
        #[arg(short, long, value_enum, default_value_t)]
        kind: Kind,
    },
    /// Print the list at KEY, one element per line
    GetList {
        key: String,
        #[arg(short, long, value_enum, default_value_t)]
        kind: Kind,
    },
    /// Store VALUES as a list at KEY
    SetList {
        key: String,
        values: Vec<String>,
        #[arg(short, long, value_enum, default_value_t)]
        kind: Kind,
    },
    /// Delete KEY
    Remove { key: String },
    /// Delete every key in the namespace
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprint!("{}", format_error(&err));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), AppError> {
    let (store_config, mut logging_config) = load_config(&cli)?;
    if let Some(level) = &cli.log_level {
        logging_config.level = level.clone();
    }
    logging::init(&logging_config)?;

    tracing::debug!(
        path = %store_config.path.display(),
        namespace = %store_config.namespace,
        "opening store"
    );
    let mut store = TypedStore::open(&store_config)?;

    match cli.command {
        Commands::Keys => {
            for key in store.keys()? {
                println!("{}", key);
            }
        }
        Commands::Get { key, kind } => {
            if !store.contains(&key)? {
                return Err(AppError::KeyNotFound(key));
            }
            print_value(&store, &key, kind)?;
        }
        Commands::Set { key, values, kind } => set_value(&mut store, &key, values, kind)?,
        Commands::GetList { key, kind } => {
            for line in list_lines(&store, &key, kind)? {
                println!("{}", line);
            }
        }
        Commands::SetList { key, values, kind } => set_list(&mut store, &key, &values, kind)?,
        Commands::Remove { key } => store.remove(&key)?,
        Commands::Clear => store.clear()?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<(StoreConfig, LoggingConfig), AppError> {
    let (mut store, logging) = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path).map_err(typed_store::Error::from)?;
            (config.store, config.logging)
        }
        None => (
            StoreConfig::new(".typed-store", config::DEFAULT_NAMESPACE),
            LoggingConfig::default(),
        ),
    };
    if let Some(path) = &cli.path {
        store.path = path.clone();
    }
    if let Some(namespace) = &cli.namespace {
        store.namespace = namespace.clone();
    }
    Ok((store, logging))
}

type Store = TypedStore<FjallBackend>;

fn print_value(store: &Store, key: &str, kind: Kind) -> Result<(), AppError> {
    // Defaults are unreachable here since the key is known to exist
    match kind {
        Kind::Bool => println!("{}", store.get_bool(key, false)?),
        Kind::Int => println!("{}", store.get_i32(key, 0)?),
        Kind::Long => println!("{}", store.get_i64(key, 0)?),
        Kind::Float => println!("{}", store.get_f32(key, 0.0)?),
        Kind::Double => println!("{}", store.get_f64(key, 0.0)?),
        Kind::String => println!("{}", store.get_string_or(key, "")?),
        Kind::Json => {
            let value = store.get_object::<serde_json::Value>(key)?;
            println!("{}", value);
        }
        Kind::StringSet => {
            for member in store.get_string_set_or(key, BTreeSet::new())? {
                println!("{}", member);
            }
        }
    }
    Ok(())
}

fn set_value(store: &mut Store, key: &str, values: Vec<String>, kind: Kind) -> Result<(), AppError> {
    if let Kind::StringSet = kind {
        let set: BTreeSet<String> = values.into_iter().collect();
        store.store_string_set(key, &set)?;
        return Ok(());
    }

    let [value] = values.as_slice() else {
        return Err(AppError::SingleValue(kind.name()));
    };
    match kind {
        Kind::Bool => store.store_bool(key, parse_arg(value, kind)?)?,
        Kind::Int => store.store_i32(key, parse_arg(value, kind)?)?,
        Kind::Long => store.store_i64(key, parse_arg(value, kind)?)?,
        Kind::Float => store.store_f32(key, parse_arg(value, kind)?)?,
        Kind::Double => store.store_f64(key, parse_arg(value, kind)?)?,
        Kind::String => store.store_string(key, value)?,
        Kind::Json => store.store_object(key, &parse_json(value)?)?,
        Kind::StringSet => {}
    }
    Ok(())
}

fn list_lines(store: &Store, key: &str, kind: Kind) -> Result<Vec<String>, AppError> {
    let lines = match kind {
        Kind::Bool => to_lines(store.get_list_bool(key)?),
        Kind::Int => to_lines(store.get_list_i32(key)?),
        Kind::Long => to_lines(store.get_list_i64(key)?),
        Kind::Float => to_lines(store.get_list_f32(key)?),
        Kind::Double => to_lines(store.get_list_f64(key)?),
        Kind::String | Kind::StringSet => store.get_list_string(key)?,
        Kind::Json => to_lines(store.get_list_object::<serde_json::Value>(key)?),
    };
    Ok(lines)
}

fn set_list(store: &mut Store, key: &str, values: &[String], kind: Kind) -> Result<(), AppError> {
    match kind {
        Kind::Bool => store.store_list_bool(key, &parse_all(values, kind)?)?,
        Kind::Int => store.store_list_i32(key, &parse_all(values, kind)?)?,
        Kind::Long => store.store_list_i64(key, &parse_all(values, kind)?)?,
        Kind::Float => store.store_list_f32(key, &parse_all(values, kind)?)?,
        Kind::Double => store.store_list_f64(key, &parse_all(values, kind)?)?,
        Kind::String | Kind::StringSet => store.store_list_string(key, values)?,
        Kind::Json => {
            let objects = values
                .iter()
                .map(|v| parse_json(v))
                .collect::<Result<Vec<_>, _>>()?;
            store.store_list_object(key, &objects)?;
        }
    }
    Ok(())
}

fn to_lines<T: ToString>(values: Vec<T>) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn parse_arg<T: FromStr>(value: &str, kind: Kind) -> Result<T, AppError> {
    value.parse().map_err(|_| AppError::InvalidValue {
        value: value.to_string(),
        kind: kind.name(),
    })
}

fn parse_all<T: FromStr>(values: &[String], kind: Kind) -> Result<Vec<T>, AppError> {
    values.iter().map(|v| parse_arg(v, kind)).collect()
}

fn parse_json(value: &str) -> Result<serde_json::Value, AppError> {
    serde_json::from_str(value).map_err(|_| AppError::InvalidValue {
        value: value.to_string(),
        kind: Kind::Json.name(),
    })
}

/// Render `err` for stderr, followed by a hint when one applies.
fn format_error(err: &AppError) -> String {
    use std::fmt::Write;
    use std::io::IsTerminal;

    let colored = std::io::stderr().is_terminal();
    let label = |code: &str, text: &str| {
        if colored {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    };

    let mut out = format!("{} {err}\n", label("1;31", "error:"));
    if let Some(hint) = error_hint(err) {
        let _ = writeln!(out, "{} {hint}", label("33", "hint:"));
    }
    out
}

fn error_hint(err: &AppError) -> Option<&'static str> {
    match err {
        AppError::Library(typed_store::Error::TypeMismatch { .. }) => {
            Some("Pass --kind matching the stored value, e.g. --kind int")
        }
        AppError::Library(typed_store::Error::Codec(_)) => {
            Some("The stored text does not parse as the requested kind; try --kind string")
        }
        AppError::Library(typed_store::Error::Backend(BackendError::InvalidNamespace { .. })) => {
            Some("Namespaces may only contain ASCII letters, digits, '_' and '-'")
        }
        AppError::KeyNotFound(_) => Some("Run 'typed-store keys' to list stored keys"),
        _ => None,
    }
}
