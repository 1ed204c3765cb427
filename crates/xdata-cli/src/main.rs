use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xdata_core::record::apply_xdata;
use xdata_core::{DEFAULT_PRESSURE_HPA, DecodeOptions, SkydewSlotMode, decode_with};

#[derive(Parser, Debug)]
#[command(name = "xdata")]
#[command(version)]
#[command(
    about = "Decoder for radiosonde XDATA auxiliary-instrument payloads.",
    long_about = None,
    after_help = "Examples:\n  xdata decode 0501034F02C978A06300\n  xdata decode '0501034F02CA08B06700#800261FCA6F80012F6F40A75' --pressure 35.2 --pretty\n  xdata records telemetry.jsonl -o decoded.jsonl"
)]
struct Cli {
    /// Log decoder diagnostics (rejected segments, ignored codes) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one XDATA payload and print the result as JSON.
    Decode {
        /// Hex payload, optionally several segments joined by '#'
        payload: String,

        /// Ambient pressure in hPa
        #[arg(long, default_value_t = DEFAULT_PRESSURE_HPA)]
        pressure: f64,

        /// Ambient temperature in °C
        #[arg(long)]
        temperature: Option<f64>,

        #[command(flatten)]
        options: DecodeArgs,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,
    },
    /// Merge decoded XDATA into every record of a JSON-lines telemetry file.
    #[command(
        after_help = "Examples:\n  xdata records telemetry.jsonl -o decoded.jsonl\n  xdata records 'archive/*.jsonl' --stdout"
    )]
    Records {
        /// Path (or glob matching one file) of JSON-lines telemetry records
        input: PathBuf,

        /// Output path (JSON lines)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON lines to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        #[command(flatten)]
        options: DecodeArgs,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(clap::Args, Debug)]
struct DecodeArgs {
    /// How SKYDEW parameter frames populate their slots
    #[arg(long, value_enum, default_value_t = SlotMode::Fallthrough)]
    skydew_slots: SlotMode,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SlotMode {
    /// Set the selected slot and every slot after it
    Fallthrough,
    /// Set only the selected slot
    Strict,
}

impl From<&DecodeArgs> for DecodeOptions {
    fn from(args: &DecodeArgs) -> Self {
        DecodeOptions {
            skydew_slots: match args.skydew_slots {
                SlotMode::Fallthrough => SkydewSlotMode::Fallthrough,
                SlotMode::Strict => SkydewSlotMode::Strict,
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Decode {
            payload,
            pressure,
            temperature,
            options,
            pretty,
            compact: _,
        } => cmd_decode(
            &payload,
            pressure,
            temperature,
            &DecodeOptions::from(&options),
            pretty,
        ),
        Commands::Records {
            input,
            output,
            stdout,
            options,
            quiet,
        } => cmd_records(input, output, stdout, &DecodeOptions::from(&options), quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_decode(
    payload: &str,
    pressure: f64,
    temperature: Option<f64>,
    options: &DecodeOptions,
    pretty: bool,
) -> Result<(), CliError> {
    if !pressure.is_finite() {
        return Err(CliError::new(
            format!("invalid pressure: {}", pressure),
            Some(format!(
                "pass a pressure in hPa, or omit it to assume {} hPa",
                DEFAULT_PRESSURE_HPA
            )),
        ));
    }

    let result = decode_with(
        payload,
        pressure,
        temperature.unwrap_or(f64::NAN),
        options,
    );
    debug!(instruments = %result.instrument_label(), fields = result.fields.len(), "decoded payload");

    let json = if pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    let json = json.context("JSON serialization failed")?;
    println!("{}", json);
    Ok(())
}

fn cmd_records(
    input: PathBuf,
    output: Option<PathBuf>,
    stdout: bool,
    options: &DecodeOptions,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    if !resolved_input.is_file() {
        return Err(CliError::new(
            format!("input file not found: {}", resolved_input.display()),
            Some("pass a JSON-lines file of telemetry records".to_string()),
        ));
    }
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let output = if stdout {
        None
    } else {
        Some(output.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };

    if let Some(output_path) = output.as_ref() {
        let output_dir = output_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(fs::canonicalize)
            .unwrap_or_else(|| fs::canonicalize("."))
            .ok();
        if let (Some(dir), Some(name)) = (output_dir, output_path.file_name()) {
            if dir.join(name) == input_abs {
                return Err(CliError::new(
                    format!("output path must differ from input: {}", output_path.display()),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    let file = fs::File::open(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;
    let (lines, summary) = decode_records(BufReader::new(file), options, &resolved_input)?;
    info!(
        records = summary.records,
        with_xdata = summary.with_xdata,
        "records decoded"
    );
    let mut body = lines.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    let Some(output) = output else {
        io::stdout()
            .write_all(body.as_bytes())
            .context("Failed to write to stdout")?;
        return Ok(());
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&output, body)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !quiet {
        eprintln!(
            "OK: {} records written ({} with XDATA) -> {}",
            summary.records,
            summary.with_xdata,
            output.display()
        );
    }
    Ok(())
}

#[derive(Debug, Default)]
struct RecordsSummary {
    records: usize,
    with_xdata: usize,
}

fn decode_records<R: BufRead>(
    reader: R,
    options: &DecodeOptions,
    source: &std::path::Path,
) -> Result<(Vec<String>, RecordsSummary), CliError> {
    let mut lines = Vec::new();
    let mut summary = RecordsSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line =
            line.with_context(|| format!("Failed to read {} line {}", source.display(), line_no))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut record: Value = serde_json::from_str(&line).map_err(|err| {
            CliError::new(
                format!("invalid JSON at {}:{}: {}", source.display(), line_no, err),
                Some("each line must hold one JSON telemetry record".to_string()),
            )
        })?;
        let applied = apply_xdata(&mut record, options).map_err(|err| {
            CliError::new(
                format!("{}:{}: {}", source.display(), line_no, err),
                Some("each line must hold one JSON object".to_string()),
            )
        })?;
        summary.records += 1;
        if applied.is_some() {
            summary.with_xdata += 1;
        }
        lines.push(serde_json::to_string(&record).context("JSON serialization failed")?);
    }

    Ok((lines, summary))
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single records file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
