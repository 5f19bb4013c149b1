use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use meterlink_core::{METER_PORT, Report};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("METERLINK_BUILD_COMMIT"),
    " ",
    env!("METERLINK_BUILD_DATE"),
    ")"
);
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("METERLINK_BUILD_COMMIT_FULL"),
    "\nbuilt:  ",
    env!("METERLINK_BUILD_DATE")
);
const EXAMPLES: &str = "Examples:\n  meterlink payload decode 0000803f00000040 --stdout\n  meterlink payload decode 0000803f --port 1 -o report.json\n  meterlink payload decode --input uplinks.txt -o report.json";

#[derive(Parser, Debug)]
#[command(name = "meterlink")]
#[command(version = VERSION, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for energy-meter LoRaWAN uplinks (PLAIN binary32 payloads).",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on uplink payloads.
    Payload {
        #[command(subcommand)]
        command: PayloadCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PayloadCommands {
    /// Decode a hex payload or an uplink file into a versioned JSON report.
    #[command(alias = "decoder")]
    #[command(after_help = EXAMPLES)]
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Payload as hex digits (e.g. 0000803f)
    #[arg(required_unless_present = "input", conflicts_with = "input")]
    payload: Option<String>,

    /// Port the payload was received on
    #[arg(short = 'p', long, default_value_t = METER_PORT)]
    port: u32,

    /// Uplink file, one `<port> <hex>` or `<hex>` per line (glob allowed)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Exit with a non-zero code if any uplink decoded to no fields
    #[arg(long)]
    strict: bool,

    /// List decoded fields after decoding
    #[arg(long)]
    list_fields: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Payload { command } => match command {
            PayloadCommands::Decode(args) => cmd_payload_decode(args),
        },
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
        // Keep the context chain; the root cause is what users act on.
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_payload_decode(args: DecodeArgs) -> Result<(), CliError> {
    let mut rep = match (&args.payload, &args.input) {
        (Some(hex), _) => decode_argument(hex, args.port)?,
        (None, Some(input)) => decode_input_file(input, args.report.as_ref())?,
        (None, None) => {
            return Err(CliError::new(
                "missing payload",
                Some("pass hex digits or use -i/--input".to_string()),
            ));
        }
    };
    rep.generated_at = meterlink_core::now_rfc3339();

    let json = serialize_report(&rep, args.pretty, args.compact)?;

    if args.stdout {
        println!("{}", json);
        if args.list_fields && !args.quiet {
            print_fields(&rep);
        }
        return check_strict(&rep, args.strict);
    }

    let report = args
        .report
        .expect("report required when not using stdout");
    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if args.list_fields && !args.quiet {
        print_fields(&rep);
    }
    if !args.quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    check_strict(&rep, args.strict)
}

fn decode_argument(hex: &str, port: u32) -> Result<Report, CliError> {
    let payload = meterlink_core::parse_hex_payload(hex).map_err(|err| {
        CliError::new(
            format!("invalid payload '{}': {}", hex, err),
            Some("expected hex digits, e.g. 0000803f".to_string()),
        )
    })?;
    Ok(meterlink_core::decode_single(&payload, port, "argument"))
}

fn decode_input_file(input: &PathBuf, report: Option<&PathBuf>) -> Result<Report, CliError> {
    let resolved_input = resolve_input_path(input)?;
    validate_input_file(&resolved_input)?;

    if let Some(report_path) = report {
        ensure_distinct_output(&resolved_input, report_path)?;
    }

    meterlink_core::decode_uplink_file(&resolved_input)
        .with_context(|| format!("Failed to decode uplinks: {}", resolved_input.display()))
        .map_err(|err| {
            CliError::new(
                format!("{:#}", err),
                Some("each line must be '<port> <hex>' or '<hex>'".to_string()),
            )
        })
}

fn ensure_distinct_output(input: &PathBuf, report_path: &PathBuf) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = report_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose();

    // A missing output directory is created later and cannot hold the input.
    let Ok(Some(report_dir)) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn check_strict(rep: &Report, strict: bool) -> Result<(), CliError> {
    if strict && rep.uplinks.iter().any(|uplink| uplink.fields.is_empty()) {
        return Err(CliError::new(
            "no fields decoded",
            Some("use --list-fields to inspect".to_string()),
        ));
    }
    Ok(())
}

fn print_fields(rep: &Report) {
    eprintln!("Decoded fields:");
    for uplink in &rep.uplinks {
        if uplink.fields.is_empty() {
            eprintln!(
                "  line {} (none, port {}, {} bytes)",
                uplink.line, uplink.port, uplink.bytes
            );
            continue;
        }
        for (field, value) in uplink.fields.iter() {
            eprintln!("  line {} {} {}", uplink.line, field, value);
        }
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a text file with one uplink per line".to_string()),
        ));
    }
    let meta = fs::metadata(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a text file with one uplink per line".to_string()),
        ));
    }
    Ok(())
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
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single uplink file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
