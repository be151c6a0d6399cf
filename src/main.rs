//! restyler 命令行入口

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use restyler::config::{ConfigManager, RestyleConfig};
use restyler::core::{extract_body, restore_html, sanitize_html};
use restyler::env::{self, EnvVar};
use restyler::error::{RestyleError, RestyleResult};
use restyler::parsers::html::decode_html;
use restyler::parsers::{rewrite_links_in_html, AttributeAllowList, RestoreMode};
use restyler::request::{handle, process_batch, BatchItem, Operation, TransformRequest, TransformResponse};

const DEFAULT_ENCODING: &str = "utf-8";

#[derive(Parser, Debug)]
#[command(name = "restyler", version)]
#[command(about = "Sanitize HTML for translation, restore styling afterwards and localize links")]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Strip attributes outside the allow-list
    Sanitize {
        /// Input file, `-` or absent for stdin
        input: Option<PathBuf>,
        /// Attribute to keep; replaces the configured allow-list when given
        #[arg(short, long = "keep")]
        keep: Vec<String>,
        /// Input charset label
        #[arg(short, long)]
        encoding: Option<String>,
    },
    /// Print the original and the attribute-free <body> as JSON
    ExtractBody {
        input: Option<PathBuf>,
        #[arg(short, long)]
        encoding: Option<String>,
    },
    /// Put translated text back into the styled original
    Restore {
        #[arg(long)]
        original: PathBuf,
        #[arg(long)]
        translated: PathBuf,
        /// flat, recursive or replace
        #[arg(short, long)]
        mode: Option<RestoreMode>,
    },
    /// Unwrap redirect links, add locale prefixes and mark external links
    RewriteLinks {
        input: Option<PathBuf>,
        #[arg(short, long)]
        lang: String,
        #[arg(long)]
        site_domain: Option<String>,
    },
    /// Process one JSON request envelope
    Handle {
        #[arg(long)]
        op: Operation,
        input: Option<PathBuf>,
    },
    /// Process JSON lines of the form {"op": ..., ...fields}
    Batch { input: Option<PathBuf> },
    /// Write an example TOML configuration
    InitConfig { path: PathBuf },
    /// Print the supported environment variables
    EnvDocs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

fn setup_logging(cli_level: Option<&str>) {
    let level = match cli_level {
        Some(level) => env::core::LogLevel::parse(level).unwrap_or_else(|e| {
            eprintln!("Warning: {}", e);
            "info".to_string()
        }),
        None => env::core::LogLevel::get_or_default("info".to_string()),
    };

    let filter = match level.as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    };

    let no_color = env::core::NoColor::get_or_default(false);

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .init();
}

fn load_config(path: Option<&Path>) -> RestyleResult<RestyleConfig> {
    let manager = match path {
        Some(path) => ConfigManager::from_path(&path.to_string_lossy())
            .map_err(|e| e.with_context(path.display()))?,
        None => ConfigManager::new()?,
    };

    if let Some(source) = manager.source() {
        tracing::debug!("配置来源: {}", source);
    }

    Ok(manager.into_config())
}

fn run(cli: Cli) -> RestyleResult<()> {
    if let Commands::InitConfig { path } = &cli.command {
        ConfigManager::generate_example_config(&path.to_string_lossy())?;
        eprintln!("Example configuration written to {}", path.display());
        return Ok(());
    }
    if let Commands::EnvDocs = &cli.command {
        print!("{}", env::generate_env_docs());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Sanitize {
            input,
            keep,
            encoding,
        } => {
            let html = read_html(input.as_deref(), encoding.as_deref())?;
            let allow_list = if keep.is_empty() {
                config.allow_list()
            } else {
                AttributeAllowList::new(&keep)
            };
            write_output(&sanitize_html(&html, &allow_list))
        }
        Commands::ExtractBody { input, encoding } => {
            let html = read_html(input.as_deref(), encoding.as_deref())?;
            let extracted = extract_body(&html)?;
            write_output(&serde_json::to_string_pretty(&extracted)?)
        }
        Commands::Restore {
            original,
            translated,
            mode,
        } => {
            let original = read_html(Some(original.as_path()), None)?;
            let translated = read_html(Some(translated.as_path()), None)?;
            let mode = mode.unwrap_or(config.restore_mode);
            write_output(&restore_html(&original, &translated, mode))
        }
        Commands::RewriteLinks {
            input,
            lang,
            site_domain,
        } => {
            let html = read_html(input.as_deref(), None)?;
            let rewriter = config.link_rewriter(site_domain.as_deref())?;
            write_output(&rewrite_links_in_html(&html, Some(&lang), &rewriter))
        }
        Commands::Handle { op, input } => {
            let raw = read_html(input.as_deref(), None)?;
            let request: TransformRequest = serde_json::from_str(&raw)?;
            match handle(op, &request, &config) {
                Ok(response) => write_output(&serde_json::to_string(&response)?),
                Err(e) => {
                    write_output(&serde_json::to_string(&TransformResponse::failure(&e))?)?;
                    Err(e)
                }
            }
        }
        Commands::Batch { input } => {
            let raw = read_html(input.as_deref(), None)?;
            let responses = run_batch(&raw, &config);

            let mut out = String::new();
            for response in &responses {
                out.push_str(&serde_json::to_string(response)?);
                out.push('\n');
            }
            io::stdout().lock().write_all(out.as_bytes())?;
            Ok(())
        }
        Commands::InitConfig { .. } | Commands::EnvDocs => Ok(()),
    }
}

/// 逐行解析批量请求；无法解析的行得到失败响应，不影响其他行
fn run_batch(raw: &str, config: &RestyleConfig) -> Vec<TransformResponse> {
    let parsed: Vec<Result<BatchItem, RestyleError>> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(RestyleError::from))
        .collect();

    let items: Vec<BatchItem> = parsed
        .iter()
        .filter_map(|item| item.as_ref().ok().cloned())
        .collect();
    let mut processed = process_batch(&items, config).into_iter();

    parsed
        .iter()
        .map(|item| match item {
            Ok(_) => processed.next().unwrap_or_default(),
            Err(e) => TransformResponse::failure(e),
        })
        .collect()
}

fn read_html(path: Option<&Path>, encoding: Option<&str>) -> RestyleResult<String> {
    let data = match path {
        Some(path) if path != Path::new("-") => fs::read(path).map_err(|e| {
            tracing::error!("读取文件失败 {}: {}", path.display(), e);
            e
        })?,
        _ => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };

    Ok(decode_html(&data, encoding.unwrap_or(DEFAULT_ENCODING)))
}

fn write_output(output: &str) -> RestyleResult<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
