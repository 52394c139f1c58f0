use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use unikv::config::{Config, ConfigError, LogFormat, LoggingConfig};
use unikv::{KvDatabase, Value, ValueKind};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Kv(#[from] unikv::Error),

    #[error("Invalid value: {0:#}")]
    InvalidValue(#[from] anyhow::Error),

    #[error("Invalid log filter: {0}")]
    Logging(String),
}

/// Storage type of a value given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// UTF-8 text.
    #[default]
    Text,
    /// Raw bytes, written and printed as hex.
    Blob,
}

impl ValueType {
    fn kind(self) -> ValueKind {
        match self {
            Self::Bool => ValueKind::Bool,
            Self::I8 => ValueKind::I8,
            Self::I16 => ValueKind::I16,
            Self::I32 => ValueKind::I32,
            Self::I64 => ValueKind::I64,
            Self::U8 => ValueKind::U8,
            Self::U16 => ValueKind::U16,
            Self::U32 => ValueKind::U32,
            Self::U64 => ValueKind::U64,
            Self::F32 => ValueKind::F32,
            Self::F64 => ValueKind::F64,
            Self::Text => ValueKind::Text,
            Self::Blob => ValueKind::Blob,
        }
    }
}

#[derive(Parser)]
#[command(name = "unikv")]
#[command(about = "Typed key-value access over LMDB, MDBX, RocksDB, fjall, SQLite and PostgreSQL")]
struct Cli {
    /// Configuration file selecting the storage engine
    #[arg(short, long, global = true, default_value = "unikv.toml", env = "UNIKV_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a value under a key
    Set {
        key: String,

        value: String,

        /// How to interpret the value
        #[arg(short = 't', long = "type", value_enum, default_value_t)]
        value_type: ValueType,
    },

    /// Print the value stored under a key
    Get {
        key: String,

        /// Type to read the stored value as
        #[arg(short = 't', long = "type", value_enum, default_value_t)]
        value_type: ValueType,
    },

    /// Remove a key
    Remove { key: String },

    /// Remove every key
    Clear,

    /// Delete the whole database
    Wipe,
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;
    init_logging(&config.logging)?;

    if matches!(cli.command, Commands::Wipe) {
        config.database.wipe()?;
        return Ok(());
    }

    let db = KvDatabase::open(&config.database)?;
    match cli.command {
        Commands::Set {
            key,
            value,
            value_type,
        } => {
            let value = parse_value(value_type, &value)
                .with_context(|| format!("cannot read {value:?} as {}", value_type.kind()))?;
            db.set(&key, value)?;
        }
        Commands::Get { key, value_type } => {
            let value = db.get_value(&key, value_type.kind())?;
            println!("{value}");
        }
        Commands::Remove { key } => db.remove(&key)?,
        Commands::Clear => db.clear()?,
        Commands::Wipe => {}
    }

    Ok(())
}

/// Parse a command-line argument as a value of the given type.
fn parse_value(value_type: ValueType, input: &str) -> anyhow::Result<Value> {
    let value = match value_type {
        ValueType::Bool => Value::Bool(input.parse()?),
        ValueType::I8 => Value::I8(input.parse()?),
        ValueType::I16 => Value::I16(input.parse()?),
        ValueType::I32 => Value::I32(input.parse()?),
        ValueType::I64 => Value::I64(input.parse()?),
        ValueType::U8 => Value::U8(input.parse()?),
        ValueType::U16 => Value::U16(input.parse()?),
        ValueType::U32 => Value::U32(input.parse()?),
        ValueType::U64 => Value::U64(input.parse()?),
        ValueType::F32 => Value::F32(input.parse()?),
        ValueType::F64 => Value::F64(input.parse()?),
        ValueType::Text => Value::Text(input.to_owned()),
        ValueType::Blob => Value::Blob(hex::decode(input)?),
    };
    Ok(value)
}

/// Install a stderr subscriber. `RUST_LOG` overrides the configured level.
fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| AppError::Logging(e.to_string()))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(io::stderr().is_terminal())
                    .with_writer(io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init(),
    }
    Ok(())
}
