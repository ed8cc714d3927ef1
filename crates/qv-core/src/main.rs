//! Q-value triage CLI.
//!
//! Reads per-hypothesis posterior error probabilities and reports:
//! - ranked cumulative-mean q-values (`rank`)
//! - the inclusion set for a target FDR (`select`)
//! - inclusion-set size across thresholds (`curve`)
//!
//! Payloads go to stdout; logs and errors go to stderr.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use qv_common::{
    format_error_human, Error, ErrorCategory, OutputFormat, StructuredError, SCHEMA_VERSION,
};
use qv_config::{
    list_presets, load_settings, validate_flag_overrides, FdrSettings, LoadOptions,
    LoadedSettings, PresetName,
};
use qv_core::exit_codes::ExitCode;
use qv_core::fdr::{
    check_target, compute_q_values, enforce_monotone, inclusion_curve, is_monotone,
    select_inclusion_set,
};
use qv_core::input::{read_hypotheses, InputFormat, InputSource};
use qv_core::log_event;
use qv_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use qv_core::output::{Report, ReportKind};
use qv_math::Direction;

/// Q-value triage - rank hypotheses by posterior error probability and
/// select an FDR-bounded inclusion set
#[derive(Parser)]
#[command(name = "qv-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Settings file (fdr.json); overrides QV_CONFIG and discovered files
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Named settings preset (strict, standard, exploratory)
    #[arg(long, global = true)]
    preset: Option<PresetName>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq, -qqq)
    #[arg(short, long, global = true, action = clap::ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,

    /// Log format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank hypotheses and compute q-values
    Rank(RankArgs),

    /// Rank hypotheses and select the inclusion set for a target FDR
    Select(SelectArgs),

    /// Inclusion-set size and expected false discoveries per threshold
    Curve(CurveArgs),

    /// Settings management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct InputArgs {
    /// Input file; omit or pass '-' to read stdin
    input: Option<PathBuf>,

    /// Input encoding
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    input_format: InputFormat,

    /// Report monotone q-values (tail running minimum)
    #[arg(long)]
    monotone: bool,

    /// Rate cutoff for records given as Beta(alpha, beta) posteriors
    #[arg(long)]
    cutoff: Option<f64>,

    /// Side of the cutoff that counts as a discovery
    #[arg(long)]
    direction: Option<Direction>,

    /// Show at most this many ranked rows
    #[arg(long)]
    max_rows: Option<usize>,
}

#[derive(Args, Debug)]
struct RankArgs {
    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args, Debug)]
struct SelectArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Target false discovery rate, in (0, 1]
    #[arg(long)]
    target_fdr: Option<f64>,
}

#[derive(Args, Debug)]
struct CurveArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Comma-separated q-value thresholds
    #[arg(long, value_delimiter = ',')]
    thresholds: Option<Vec<f64>>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show effective settings and where they came from
    Show,

    /// Validate a settings file
    Validate {
        /// Settings file; defaults to the resolved one
        path: Option<PathBuf>,
    },

    /// Print the JSON schema of the settings file
    Schema,

    /// List built-in presets
    Presets,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() {
                ExitCode::ArgsError.as_i32()
            } else {
                ExitCode::Clean.as_i32()
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let log_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    let log_config = LogConfig::from_env(log_level, cli.global.log_format)
        .with_color(!cli.global.no_color);
    init_logging(&log_config);

    let exit_code = match &cli.command {
        Commands::Rank(args) => run_controller(&cli.global, ReportKind::Rank, &args.input, None, None),
        Commands::Select(args) => run_controller(
            &cli.global,
            ReportKind::Select,
            &args.input,
            args.target_fdr,
            None,
        ),
        Commands::Curve(args) => run_controller(
            &cli.global,
            ReportKind::Curve,
            &args.input,
            None,
            args.thresholds.clone(),
        ),
        Commands::Config(args) => run_config(&cli.global, args),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Controller commands
// ============================================================================

fn run_controller(
    global: &GlobalOpts,
    kind: ReportKind,
    args: &InputArgs,
    target_fdr: Option<f64>,
    thresholds: Option<Vec<f64>>,
) -> ExitCode {
    let ctx = LogContext::new(generate_run_id());
    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_STARTED,
        Stage::Init,
        "starting q-value run",
        command = kind.to_string()
    );

    let result = execute(global, &ctx, kind, args, target_fdr, thresholds);
    let code = match result {
        Ok(code) => code,
        Err(err) => report_error(global, &ctx, &err),
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Report,
        "run finished",
        exit_code = code.as_i32() as i64
    );
    code
}

fn execute(
    global: &GlobalOpts,
    ctx: &LogContext,
    kind: ReportKind,
    args: &InputArgs,
    target_fdr: Option<f64>,
    thresholds: Option<Vec<f64>>,
) -> Result<ExitCode, Error> {
    let loaded = load(global, ctx)?;
    let settings = apply_overrides(loaded.settings.clone(), args, target_fdr, thresholds);
    // Reject bad flag values before touching the input.
    if kind == ReportKind::Select {
        check_target(settings.target_fdr)?;
    }
    validate_flag_overrides(&settings)?;

    let source = InputSource::from_arg(args.input.as_deref());
    let hypotheses = read_hypotheses(&source, args.input_format, &settings.posterior)?;
    log_event!(
        ctx,
        INFO,
        event_names::INPUT_LOADED,
        Stage::Load,
        "loaded hypotheses",
        source = source.to_string(),
        records = hypotheses.len() as u64
    );

    let mut ranked = compute_q_values(&hypotheses)?;
    if settings.monotone_q_values {
        let was_monotone = is_monotone(&ranked);
        enforce_monotone(&mut ranked);
        log_event!(
            ctx,
            DEBUG,
            event_names::RANK_MONOTONE_APPLIED,
            Stage::Rank,
            "applied tail running minimum",
            was_monotone = was_monotone
        );
    }
    log_event!(
        ctx,
        INFO,
        event_names::RANK_FINISHED,
        Stage::Rank,
        "ranked hypotheses",
        candidates = ranked.len() as u64
    );

    let candidates = ranked.len();
    let report = Report::new(
        kind,
        ctx.run_id.clone(),
        source.to_string(),
        loaded.snapshot,
        settings.monotone_q_values,
        candidates,
    );

    let (report, exit) = match kind {
        ReportKind::Rank => (report.with_ranked(ranked, settings.max_rows), ExitCode::Clean),
        ReportKind::Select => {
            let selection = select_inclusion_set(&ranked, settings.target_fdr)?;
            log_event!(
                ctx,
                INFO,
                event_names::SELECT_FINISHED,
                Stage::Select,
                "selected inclusion set",
                target_fdr = settings.target_fdr,
                size = selection.size as u64
            );
            let exit = if selection.is_empty() {
                ExitCode::EmptySelection
            } else {
                ExitCode::Clean
            };
            (
                report
                    .with_ranked(ranked, settings.max_rows)
                    .with_selection(selection),
                exit,
            )
        }
        ReportKind::Curve => {
            let curve = inclusion_curve(&ranked, &settings.curve_thresholds)?;
            log_event!(
                ctx,
                INFO,
                event_names::CURVE_FINISHED,
                Stage::Select,
                "evaluated inclusion curve",
                points = curve.len() as u64
            );
            (report.with_curve(curve), ExitCode::Clean)
        }
    };

    emit(&report.render(global.format)?);
    log_event!(
        ctx,
        DEBUG,
        event_names::REPORT_WRITTEN,
        Stage::Report,
        "wrote report",
        format = global.format.to_string()
    );
    Ok(exit)
}

/// Load settings from --config / --preset / discovered files.
fn load(global: &GlobalOpts, ctx: &LogContext) -> Result<LoadedSettings, Error> {
    let options = LoadOptions {
        path: global.config.clone(),
        preset: global.preset,
    };
    let loaded = load_settings(&options)?;
    log_event!(
        ctx,
        DEBUG,
        event_names::CONFIG_LOADED,
        Stage::Init,
        "resolved settings",
        source = loaded.source.to_string(),
        settings_id = loaded.snapshot.short_id().to_string()
    );
    Ok(loaded)
}

/// Command-line flags win over settings.
fn apply_overrides(
    mut settings: FdrSettings,
    args: &InputArgs,
    target_fdr: Option<f64>,
    thresholds: Option<Vec<f64>>,
) -> FdrSettings {
    if args.monotone {
        settings.monotone_q_values = true;
    }
    if let Some(cutoff) = args.cutoff {
        settings.posterior.cutoff = Some(cutoff);
    }
    if let Some(direction) = args.direction {
        settings.posterior.direction = direction;
    }
    if args.max_rows.is_some() {
        settings.max_rows = args.max_rows;
    }
    if let Some(target) = target_fdr {
        settings.target_fdr = target;
    }
    if let Some(thresholds) = thresholds {
        settings.curve_thresholds = thresholds;
    }
    settings
}

// ============================================================================
// Config commands
// ============================================================================

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> ExitCode {
    let ctx = LogContext::new(generate_run_id());
    let result = match &args.command {
        ConfigCommands::Show => config_show(global, &ctx),
        ConfigCommands::Validate { path } => config_validate(global, &ctx, path.clone()),
        ConfigCommands::Schema => config_schema(),
        ConfigCommands::Presets => config_presets(global),
    };
    match result {
        Ok(code) => code,
        Err(err) => report_error(global, &ctx, &err),
    }
}

fn config_show(global: &GlobalOpts, ctx: &LogContext) -> Result<ExitCode, Error> {
    let loaded = load(global, ctx)?;
    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "source": loaded.source.to_string(),
        "path": loaded.path.as_ref().map(|p| p.display().to_string()),
        "snapshot": &loaded.snapshot,
        "settings": &loaded.settings,
    });

    match global.format {
        OutputFormat::Json => emit(&serde_json::to_string_pretty(&response)?),
        OutputFormat::Jsonl => emit(&serde_json::to_string(&response)?),
        OutputFormat::Summary => emit(&format!(
            "settings from {}: target_fdr={} monotone={} ({})",
            loaded.source,
            loaded.settings.target_fdr,
            loaded.settings.monotone_q_values,
            loaded.snapshot.short_id()
        )),
        OutputFormat::Md | OutputFormat::Tsv => {
            let s = &loaded.settings;
            let mut out = format!("source\t{}\n", loaded.source);
            if let Some(path) = &loaded.path {
                out.push_str(&format!("path\t{}\n", path.display()));
            }
            out.push_str(&format!("target_fdr\t{}\n", s.target_fdr));
            out.push_str(&format!("monotone_q_values\t{}\n", s.monotone_q_values));
            if let Some(cutoff) = s.posterior.cutoff {
                out.push_str(&format!("posterior.cutoff\t{}\n", cutoff));
            }
            out.push_str(&format!("posterior.direction\t{}\n", s.posterior.direction));
            let thresholds: Vec<String> =
                s.curve_thresholds.iter().map(|t| t.to_string()).collect();
            out.push_str(&format!("curve_thresholds\t{}\n", thresholds.join(",")));
            emit(&out);
        }
    }
    Ok(ExitCode::Clean)
}

fn config_validate(
    global: &GlobalOpts,
    ctx: &LogContext,
    path: Option<PathBuf>,
) -> Result<ExitCode, Error> {
    let options = LoadOptions {
        path: path.or_else(|| global.config.clone()),
        preset: global.preset,
    };
    let loaded = load_settings(&options)?;
    log_event!(
        ctx,
        INFO,
        event_names::CONFIG_LOADED,
        Stage::Init,
        "settings are valid",
        source = loaded.source.to_string()
    );

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "status": "valid",
        "source": loaded.source.to_string(),
        "path": loaded.path.as_ref().map(|p| p.display().to_string()),
        "settings_hash": &loaded.snapshot.settings_hash,
    });
    match global.format {
        OutputFormat::Json => emit(&serde_json::to_string_pretty(&response)?),
        OutputFormat::Jsonl => emit(&serde_json::to_string(&response)?),
        _ => emit(&format!("valid ({})", loaded.source)),
    }
    Ok(ExitCode::Clean)
}

fn config_schema() -> Result<ExitCode, Error> {
    emit(&serde_json::to_string_pretty(&FdrSettings::json_schema())?);
    Ok(ExitCode::Clean)
}

fn config_presets(global: &GlobalOpts) -> Result<ExitCode, Error> {
    let presets = list_presets();
    match global.format {
        OutputFormat::Json => emit(&serde_json::to_string_pretty(&presets)?),
        OutputFormat::Jsonl => {
            let lines = presets
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<Vec<_>, _>>()?;
            emit(&lines.join("\n"));
        }
        _ => {
            let lines: Vec<String> = presets
                .iter()
                .map(|p| format!("{}\t{}\t{}", p.name, p.target_fdr, p.description))
                .collect();
            emit(&lines.join("\n"));
        }
    }
    Ok(ExitCode::Clean)
}

// ============================================================================
// Output helpers
// ============================================================================

/// Write a payload to stdout, newline-terminated.
fn emit(payload: &str) {
    if payload.is_empty() {
        return;
    }
    if payload.ends_with('\n') {
        print!("{}", payload);
    } else {
        println!("{}", payload);
    }
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "qv_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });

    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            emit(&version_info.to_string());
        }
        _ => {
            println!("qv-core {}", env!("CARGO_PKG_VERSION"));
            println!("schema version: {}", SCHEMA_VERSION);
        }
    }
}

/// Print an error to stderr and map it to an exit code.
///
/// Machine formats get a structured JSON error; the rest get the human
/// headline/reason/fix block.
fn report_error(global: &GlobalOpts, ctx: &LogContext, err: &Error) -> ExitCode {
    let code = ExitCode::for_error(err);
    match err.category() {
        ErrorCategory::Config => log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_ERROR,
            Stage::Init,
            "settings rejected",
            error_code = err.code() as u64
        ),
        ErrorCategory::Args => log_event!(
            ctx,
            DEBUG,
            event_names::ARGS_ERROR,
            Stage::Init,
            "argument rejected",
            error_code = err.code() as u64
        ),
        ErrorCategory::Input | ErrorCategory::Fdr => log_event!(
            ctx,
            DEBUG,
            event_names::INPUT_ERROR,
            Stage::Load,
            "input rejected",
            error_code = err.code() as u64
        ),
        ErrorCategory::Io => log_event!(
            ctx,
            DEBUG,
            event_names::INTERNAL_ERROR,
            Stage::Report,
            "command failed",
            error_code = err.code() as u64
        ),
    }

    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let structured = StructuredError::from(err)
                .with_context("run_id", &ctx.run_id)
                .with_context("exit_code", code.code_name());
            eprintln!("{}", structured.to_json());
        }
        _ => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(err, use_color));
        }
    }
    code
}
