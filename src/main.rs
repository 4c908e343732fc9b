use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};
use std::process::ExitCode;

use badger::codec::Codec;
use badger::color::{color, color_enabled};
use badger::config::Settings;
use badger::datapath::data_path;
use badger::dotenv::{load_dotenv, DotenvOptions};
use badger::file::loader::{load_data_file, load_from_stdin};

/// Badger - look up values in JSON, YAML and TOML files with data paths
#[derive(Parser)]
#[command(name = "badger")]
#[command(version)]
#[command(about = "Look up values in structured data files", long_about = None)]
struct Cli {
    /// Data file to read (omit or use "-" to read from stdin)
    file: Option<String>,

    /// Data path to look up, e.g. "animal/0/name" or "?maybe/here"
    path: Option<String>,

    /// Codec for the input (default: inferred from the file extension, yaml for stdin)
    #[arg(short, long)]
    codec: Option<String>,

    /// Codec for the output (default: from settings, usually yaml)
    #[arg(short, long)]
    output: Option<String>,

    /// Load environment variables from a .env file first
    #[arg(short, long)]
    env: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log debugging information to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Prints scalars bare and everything else through the output codec.
fn render(value: &Value, codec: Codec, indent: usize) -> Result<String> {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(_) | Value::Bool(_) | Value::Null => value.to_string(),
        _ if codec == Codec::Json => {
            let spaces = " ".repeat(indent);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(spaces.as_bytes());
            let mut buffer = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            value.serialize(&mut serializer)?;
            String::from_utf8(buffer).context("JSON output is not valid UTF-8")?
        }
        _ => codec.encode_pretty(value)?,
    };
    Ok(text.trim_end_matches('\n').to_string())
}

fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    if let Some(env) = &cli.env {
        let options = DotenvOptions {
            path: Some(env.into()),
            ..DotenvOptions::default()
        };
        load_dotenv(&options)?;
    }

    let input_codec = cli.codec.as_deref().map(Codec::from_name).transpose()?;
    let data = match cli.file.as_deref() {
        Some(file) if file != "-" => load_data_file(file, input_codec)?,
        _ => load_from_stdin(input_codec.unwrap_or(Codec::Yaml))?,
    };

    let output_codec = match &cli.output {
        Some(name) => Codec::from_name(name)?,
        None => settings.output_codec()?,
    };

    let found = match cli.path.as_deref() {
        Some(path) => data_path(&data, path)?,
        None => Some(&data),
    };

    if let Some(value) = found {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", render(value, output_codec, settings.indent)?)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load();
    let use_color = settings.color && !cli.no_color && color_enabled();

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = format!("{:#}", err);
            let message = match color("red") {
                Ok(red) => red.enabled(use_color).paint(&message),
                Err(_) => message,
            };
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
