//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use smartcheck_catalog::{Catalog, CatalogItem, CatalogQuestion};
use smartcheck_core::{
    PipelineInput, PlanSummary, build_area_trade_matrix, build_context, pending_questions,
    plan_fingerprint, run_pipeline,
};
use smartcheck_shared::{
    AppConfig, AreaType, OutputFormat, PlannedChecklist, PlannerSettings, ProjectType, TradeType,
    init_config, init_config_at, load_config, load_config_from,
};

use crate::render;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SmartCheck: plan quality-control checklists from estimate scope.
#[derive(Parser)]
#[command(
    name = "smartcheck",
    version,
    about = "Derive project risk from estimate scope and plan phase-based QC checklists.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.smartcheck/smartcheck.toml).
    #[arg(long, global = true, env = "SMARTCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum FormatArg {
    Json,
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

/// Project inputs shared by the planning subcommands.
#[derive(Args, Debug, Default)]
pub(crate) struct InputArgs {
    /// JSON array of scope records.
    #[arg(long)]
    pub scope: Option<PathBuf>,

    /// JSON object of scoping answers keyed by question code.
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// JSON array of checklist templates.
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Project type (e.g. bath_remodel). Defaults to the configured type.
    #[arg(short, long)]
    pub project_type: Option<String>,
}

/// Output options shared by every result-producing subcommand.
#[derive(Args, Debug, Default)]
pub(crate) struct OutputArgs {
    /// Output format. Defaults to the configured format.
    #[arg(short, long)]
    pub format: Option<FormatArg>,

    /// Write the result to a file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Derive flags, detected areas and the risk score.
    Context {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build the area × trade matrix.
    Matrix {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Plan recommended checklists.
    Plan {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,

        /// Skip checklists synthesized from the area/trade catalog.
        #[arg(long)]
        no_area_trade: bool,

        /// Override the medium risk score threshold (0-100).
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        medium_threshold: Option<u8>,

        /// Plan every checklist as disabled.
        #[arg(long)]
        disabled: bool,
    },

    /// List catalog questions not yet answered for the project's areas.
    Questions {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Query the built-in area/trade catalog.
    Catalog {
        /// Area type (kitchen, bath, bedroom, living, hall, exterior, other).
        /// Without it, every template is listed.
        #[arg(long)]
        area: Option<String>,

        /// Trades (comma-separated or repeated).
        #[arg(long, value_delimiter = ',')]
        trade: Vec<String>,

        /// Restrict to templates applicable to this project type.
        #[arg(short, long)]
        project_type: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so results on
/// stdout stay machine-readable.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "smartcheck=info",
        1 => "smartcheck=debug",
        _ => "smartcheck=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    let config = || resolve_config(config_path.as_deref());

    match cli.command {
        Command::Context { input, output } => cmd_context(&config()?, &input, &output),
        Command::Matrix { input, output } => cmd_matrix(&config()?, &input, &output),
        Command::Plan {
            input,
            output,
            no_area_trade,
            medium_threshold,
            disabled,
        } => {
            let config = config()?;
            let mut settings = PlannerSettings::from(&config);
            if no_area_trade {
                settings.include_area_trade_checklists = false;
            }
            if let Some(threshold) = medium_threshold {
                settings.medium_risk_score_threshold = threshold;
            }
            if disabled {
                settings.enabled_by_default = false;
            }
            cmd_plan(&config, &settings, &input, &output)
        }
        Command::Questions { input, output } => cmd_questions(&config()?, &input, &output),
        Command::Catalog {
            area,
            trade,
            project_type,
            output,
        } => cmd_catalog(
            &config()?,
            area.as_deref(),
            &trade,
            project_type.as_deref(),
            &output,
        ),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path.as_deref()),
            ConfigAction::Show => cmd_config_show(&config()?),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn read_json(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).wrap_err_with(|| format!("invalid JSON in {}", path.display()))
}

fn project_type(config: &AppConfig, raw: Option<&str>) -> ProjectType {
    raw.map(ProjectType::parse)
        .unwrap_or(config.defaults.project_type)
}

fn load_input(config: &AppConfig, args: &InputArgs) -> Result<PipelineInput> {
    let input = PipelineInput::from_json(
        project_type(config, args.project_type.as_deref()),
        &read_json(args.scope.as_deref())?,
        &read_json(args.answers.as_deref())?,
        &read_json(args.templates.as_deref())?,
    )?;
    info!(
        project_type = %input.project_type,
        records = input.scope_records.len(),
        answers = input.answers.len(),
        templates = input.templates.len(),
        "inputs loaded"
    );
    Ok(input)
}

fn format(config: &AppConfig, output: &OutputArgs) -> OutputFormat {
    output
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.defaults.output_format)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn emit(content: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, format!("{content}\n"))
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "result written");
        }
        None => println!("{content}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_context(config: &AppConfig, input: &InputArgs, output: &OutputArgs) -> Result<()> {
    let input = load_input(config, input)?;
    let context = build_context(input.project_type, &input.scope_records, &input.answers);

    let content = match format(config, output) {
        OutputFormat::Json => to_json(&context)?,
        OutputFormat::Text => render::context(&context),
    };
    emit(&content, output.out.as_deref())
}

fn cmd_matrix(config: &AppConfig, input: &InputArgs, output: &OutputArgs) -> Result<()> {
    let input = load_input(config, input)?;
    let matrix = build_area_trade_matrix(&input.scope_records);

    let content = match format(config, output) {
        OutputFormat::Json => to_json(&matrix)?,
        OutputFormat::Text => render::matrix(&matrix),
    };
    emit(&content, output.out.as_deref())
}

/// JSON document printed by `plan`.
#[derive(Serialize)]
struct PlanEnvelope<'a> {
    generated_at: DateTime<Utc>,
    project_type: ProjectType,
    risk_score: u8,
    fingerprint: String,
    summary: PlanSummary,
    checklists: &'a [PlannedChecklist],
}

fn cmd_plan(
    config: &AppConfig,
    settings: &PlannerSettings,
    input: &InputArgs,
    output: &OutputArgs,
) -> Result<()> {
    let input = load_input(config, input)?;
    let result = run_pipeline(&input, &Catalog::builtin(), settings);

    let fingerprint = plan_fingerprint(&result.checklists)?;
    let summary = PlanSummary::from_plan(&result.checklists);

    let content = match format(config, output) {
        OutputFormat::Json => to_json(&PlanEnvelope {
            generated_at: Utc::now(),
            project_type: input.project_type,
            risk_score: result.context.risk_score,
            fingerprint,
            summary,
            checklists: &result.checklists,
        })?,
        OutputFormat::Text => {
            render::plan(&result.context, &result.checklists, &summary, &fingerprint)
        }
    };
    emit(&content, output.out.as_deref())
}

fn cmd_questions(config: &AppConfig, input: &InputArgs, output: &OutputArgs) -> Result<()> {
    let input = load_input(config, input)?;
    let matrix = build_area_trade_matrix(&input.scope_records);
    let pending = pending_questions(&Catalog::builtin(), &matrix, input.project_type, &input.answers);

    let content = match format(config, output) {
        OutputFormat::Json => to_json(&pending)?,
        OutputFormat::Text => render::questions(&pending),
    };
    emit(&content, output.out.as_deref())
}

fn parse_trades(raw: &[String]) -> Result<Vec<TradeType>> {
    raw.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<TradeType>().map_err(|e| eyre!(e)))
        .collect()
}

/// JSON document printed by `catalog` for an area query.
#[derive(Serialize)]
struct CatalogQuery<'a> {
    area: AreaType,
    trades: &'a [TradeType],
    project_type: Option<ProjectType>,
    templates: Vec<&'static str>,
    questions: Vec<&'static CatalogQuestion>,
    items: Vec<&'static CatalogItem>,
}

fn cmd_catalog(
    config: &AppConfig,
    area: Option<&str>,
    trades: &[String],
    project_type: Option<&str>,
    output: &OutputArgs,
) -> Result<()> {
    let catalog = Catalog::builtin();
    let format = format(config, output);

    let Some(area) = area else {
        let content = match format {
            OutputFormat::Json => to_json(&catalog.templates())?,
            OutputFormat::Text => render::catalog_templates(catalog.templates()),
        };
        return emit(&content, output.out.as_deref());
    };

    let area: AreaType = area.parse().map_err(|e: String| eyre!(e))?;
    let trades = parse_trades(trades)?;
    if trades.is_empty() {
        return Err(eyre!("at least one --trade is required with --area"));
    }
    let project_type = project_type.map(ProjectType::parse);

    let query = CatalogQuery {
        area,
        trades: &trades,
        project_type,
        templates: catalog
            .find_area_trade_templates(area, &trades, project_type)
            .into_iter()
            .map(|t| t.id)
            .collect(),
        questions: catalog.get_area_trade_questions(area, &trades, project_type),
        items: catalog.get_area_trade_checklist_items(area, &trades, project_type),
    };

    let content = match format {
        OutputFormat::Json => to_json(&query)?,
        OutputFormat::Text => {
            render::catalog_query(&query.templates, &query.questions, &query.items)
        }
    };
    emit(&content, output.out.as_deref())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => {
            init_config_at(path)?;
            path.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plan_flags_parse() {
        let cli = Cli::try_parse_from([
            "smartcheck",
            "plan",
            "--scope",
            "scope.json",
            "--project-type",
            "bath_remodel",
            "--format",
            "text",
            "--medium-threshold",
            "70",
            "--no-area-trade",
        ])
        .expect("parse");

        match cli.command {
            Command::Plan {
                input,
                output,
                no_area_trade,
                medium_threshold,
                disabled,
            } => {
                assert_eq!(input.scope.as_deref(), Some(Path::new("scope.json")));
                assert_eq!(input.project_type.as_deref(), Some("bath_remodel"));
                assert_eq!(output.format, Some(FormatArg::Text));
                assert_eq!(medium_threshold, Some(70));
                assert!(no_area_trade);
                assert!(!disabled);
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn medium_threshold_is_range_checked() {
        let result = Cli::try_parse_from(["smartcheck", "plan", "--medium-threshold", "150"]);
        assert!(result.is_err());
    }

    #[test]
    fn catalog_trades_split_on_commas() {
        let cli = Cli::try_parse_from([
            "smartcheck",
            "catalog",
            "--area",
            "bath",
            "--trade",
            "waterproofing,tile",
            "--trade",
            "plumbing",
        ])
        .expect("parse");

        match cli.command {
            Command::Catalog { area, trade, .. } => {
                assert_eq!(area.as_deref(), Some("bath"));
                let trades = parse_trades(&trade).expect("trades");
                assert_eq!(
                    trades,
                    vec![TradeType::Waterproofing, TradeType::Tile, TradeType::Plumbing]
                );
            }
            _ => panic!("expected catalog"),
        }
    }

    #[test]
    fn unknown_trade_is_an_error() {
        assert!(parse_trades(&["masonry".to_string()]).is_err());
    }

    #[test]
    fn project_type_falls_back_to_config() {
        let mut config = AppConfig::default();
        config.defaults.project_type = ProjectType::KitchenRemodel;
        assert_eq!(project_type(&config, None), ProjectType::KitchenRemodel);
        assert_eq!(project_type(&config, Some("Bath Remodel")), ProjectType::BathRemodel);
    }

    #[test]
    fn config_init_writes_to_override_path() {
        let cli = Cli::try_parse_from(["smartcheck", "--config", "custom.toml", "config", "init"])
            .expect("parse");
        assert_eq!(cli.config.as_deref(), Some(Path::new("custom.toml")));

        let path = std::env::temp_dir().join(format!("smartcheck-init-{}.toml", std::process::id()));
        cmd_config_init(Some(&path)).expect("init");
        let config = resolve_config(Some(&path)).expect("load written config");
        assert!(config.planner.include_area_trade_checklists);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_input_file_reads_as_null() {
        assert_eq!(read_json(None).expect("null"), Value::Null);
        assert!(read_json(Some(Path::new("/nonexistent/scope.json"))).is_err());
    }
}
