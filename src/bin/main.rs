use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tower_lsp_server::ls_types::{Position, Range};

use razor_tokens::analysis::semantic::{
    DeltaOutcome, LEGEND_TYPES, NoEmbeddedRanges, TokenArray, decode, delta, minimal_edits,
    modifier_names,
};
use razor_tokens::config::{self, SemanticTokensConfig, defaults};
use razor_tokens::{
    DocumentSource, RazorDocument, SemanticError, SemanticResult, SemanticTokensService,
    SemanticTokensSettings,
};

/// Inspect Razor semantic tokens from the command line
#[derive(Parser)]
#[command(name = "razor-tokens")]
#[command(version)]
#[command(about = "Inspect Razor semantic tokens: classify, encode and diff")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify and encode a serialized document (text plus syntax tree, JSON)
    Dump {
        document: PathBuf,

        /// Restrict output to a range, written `line:col-line:col`
        #[arg(long, value_parser = parse_range)]
        range: Option<Range>,
    },
    /// Print the edit script between two encoded token arrays (JSON integer arrays)
    Diff {
        old: PathBuf,
        new: PathBuf,

        /// Use the generalized diff instead of one prefix/suffix replacement
        #[arg(long)]
        minimal: bool,
    },
    /// Settings file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the default settings
    Init {
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigFormat {
    Toml,
    Json,
}

fn parse_position(text: &str) -> Result<Position, String> {
    let (line, character) = text
        .split_once(':')
        .ok_or_else(|| format!("expected line:col, got '{text}'"))?;
    let line = line.trim().parse().map_err(|e| format!("bad line '{line}': {e}"))?;
    let character = character
        .trim()
        .parse()
        .map_err(|e| format!("bad column '{character}': {e}"))?;
    Ok(Position::new(line, character))
}

fn parse_range(text: &str) -> Result<Range, String> {
    let (start, end) = text
        .split_once('-')
        .ok_or_else(|| format!("expected line:col-line:col, got '{text}'"))?;
    Ok(Range::new(parse_position(start)?, parse_position(end)?))
}

fn load_settings(path: Option<&Path>) -> SemanticResult<SemanticTokensSettings> {
    let file = match path {
        Some(path) => Some(config::parse_toml(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    config::resolve(file, None)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> SemanticResult<T> {
    let body = std::fs::read_to_string(path)?;
    serde_json::from_str(&body)
        .map_err(|e| SemanticError::invalid_argument(format!("{}: {}", path.display(), e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> SemanticResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| SemanticError::internal(e.to_string()))
}

async fn dump(
    settings: SemanticTokensSettings,
    path: &Path,
    range: Option<Range>,
) -> SemanticResult<()> {
    let document = RazorDocument::try_from(read_json::<DocumentSource>(path)?)?;
    let service = SemanticTokensService::new(NoEmbeddedRanges, settings)?;
    let cancel = CancellationToken::new();

    let tokens = match range {
        Some(range) => service.range(&document, range, &cancel).await?,
        None => service.full(&document, &cancel).await?,
    };
    let Some(tokens) = tokens else {
        println!("embedded ranges not synchronized");
        return Ok(());
    };

    let array = TokenArray::from_semantic_tokens(&tokens.data);
    for range in decode(&array) {
        let name = LEGEND_TYPES
            .get(range.token_type as usize)
            .map_or("<unknown>", |token_type| token_type.as_str());
        let modifiers = modifier_names(range.modifier);
        let start = range.start();
        println!(
            "{}:{}-{} {} {:?} {:?}",
            start.line,
            start.character,
            range.end().character,
            name,
            modifiers,
            document.text().slice(
                document.text().offset_clamped(start),
                document.text().offset_clamped(range.end()),
            ),
        );
    }
    if let Some(result_id) = tokens.result_id {
        println!("result_id: {result_id}");
    }
    println!("{}", to_json(&array.as_slice())?);
    Ok(())
}

fn diff(settings: &SemanticTokensSettings, old: &Path, new: &Path, minimal: bool) -> SemanticResult<()> {
    let old: Vec<u32> = read_json(old)?;
    let new: Vec<u32> = read_json(new)?;

    let script = if minimal {
        to_json(&minimal_edits(&old, &new, settings.max_diff_distance))?
    } else {
        match delta::diff(Some(old.as_slice()), &new) {
            DeltaOutcome::Edits(edits) => to_json(&edits)?,
            DeltaOutcome::Full => to_json(&serde_json::json!({ "full": new }))?,
        }
    };
    println!("{script}");
    Ok(())
}

fn config_init(format: ConfigFormat) -> SemanticResult<()> {
    let config: SemanticTokensConfig = defaults::default_config();
    let body = match format {
        ConfigFormat::Toml => {
            toml::to_string_pretty(&config).map_err(|e| SemanticError::internal(e.to_string()))?
        }
        ConfigFormat::Json => to_json(&config)?,
    };
    println!("{body}");
    Ok(())
}

async fn run(cli: Cli) -> SemanticResult<()> {
    match cli.command {
        Commands::Config {
            command: ConfigCommands::Init { format },
        } => config_init(format),
        Commands::Dump { document, range } => {
            let settings = load_settings(cli.config.as_deref())?;
            dump(settings, &document, range).await
        }
        Commands::Diff { old, new, minimal } => {
            let settings = load_settings(cli.config.as_deref())?;
            diff(&settings, &old, &new, minimal)
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
