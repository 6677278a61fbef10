//! AtlasDict CLI Client
//!
//! Command-line interface for querying DICT servers.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::process::ExitCode;

use atlasdict::{
    ClientConfig, Database, Definition, DictError, MatchingStrategy, Matches, Session,
    DEFAULT_PORT,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// AtlasDict CLI
#[derive(Parser, Debug)]
#[command(name = "dict-cli")]
#[command(about = "CLI for DICT (RFC 2229) dictionary servers")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(short, long, default_value = "dict.org")]
    server: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "10000")]
    timeout_ms: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the definitions of a word
    Define {
        /// The word to define
        word: String,

        /// Database to search (`*` = all, `!` = first with a hit)
        #[arg(short, long, default_value = Database::ALL)]
        database: String,
    },

    /// List headwords matching a word
    Match {
        /// The word to match
        word: String,

        /// Database to search (`*` = all, `!` = first with a hit)
        #[arg(short, long, default_value = Database::ALL)]
        database: String,

        /// Matching strategy (`.` = server default)
        #[arg(short = 'S', long, default_value = MatchingStrategy::DEFAULT)]
        strategy: String,
    },

    /// List the server's databases
    Databases,

    /// List the server's matching strategies
    Strategies,

    /// Show information about one database
    Info {
        /// The database name
        database: String,
    },
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

fn main() -> ExitCode {
    // Initialize tracing/logging (stderr, so stdout stays parseable)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,atlasdict=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<String, DictError> {
    let config = ClientConfig::builder()
        .host(&args.server)
        .port(args.port)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    tracing::info!("Connecting to {}:{}", config.host, config.port);
    let session = Session::open_with_config(&config)?;
    tracing::debug!("Greeting: {}", session.banner());

    let result = execute(&session, &args.command, args.format);
    session.close();
    result
}

fn execute(session: &Session, command: &Commands, format: OutputFormat) -> Result<String, DictError> {
    let output = match command {
        Commands::Define { word, database } => {
            let definitions = session.define(word, database)?;
            render(definitions.as_slice(), format, format_definitions)?
        }
        Commands::Match {
            word,
            database,
            strategy,
        } => {
            let matches = session.match_words(word, strategy, database)?;
            render(&matches, format, format_matches)?
        }
        Commands::Databases => {
            let databases = session.list_databases()?;
            render(&databases, format, format_databases)?
        }
        Commands::Strategies => {
            let strategies = session.list_strategies()?;
            render(strategies.as_slice(), format, format_strategies)?
        }
        Commands::Info { database } => {
            let info = session.database_info(database)?;
            render(&info, format, |text: &String| text.clone())?
        }
    };
    Ok(output)
}

// =============================================================================
// Output formatting
// =============================================================================

fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    text: impl Fn(&T) -> String,
) -> Result<String, DictError> {
    match format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(value)
                .map_err(|e| DictError::Serialization(e.to_string()))?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn format_definitions(definitions: &[Definition]) -> String {
    if definitions.is_empty() {
        return "No definitions found.\n".to_string();
    }

    let mut output = String::new();
    for definition in definitions {
        let _ = writeln!(
            output,
            "From {} [{}]:",
            definition.source_database(),
            definition.headword()
        );
        for line in definition.body() {
            let _ = writeln!(output, "  {}", line);
        }
        output.push('\n');
    }
    output
}

fn format_matches(matches: &Matches) -> String {
    if matches.is_empty() {
        return "No matches found.\n".to_string();
    }

    let mut output = String::new();
    for word in matches {
        let _ = writeln!(output, "{}", word);
    }
    output
}

fn format_databases(databases: &BTreeMap<String, Database>) -> String {
    if databases.is_empty() {
        return "No databases present.\n".to_string();
    }

    let width = databases.keys().map(String::len).max().unwrap_or(0);
    let mut output = String::new();
    for database in databases.values() {
        let _ = writeln!(
            output,
            "{:<width$}  {}",
            database.name(),
            database.description(),
            width = width
        );
    }
    output
}

fn format_strategies(strategies: &[MatchingStrategy]) -> String {
    if strategies.is_empty() {
        return "No strategies available.\n".to_string();
    }

    let width = strategies.iter().map(|s| s.name().len()).max().unwrap_or(0);
    let mut output = String::new();
    for strategy in strategies {
        let _ = writeln!(
            output,
            "{:<width$}  {}",
            strategy.name(),
            strategy.description(),
            width = width
        );
    }
    output
}
