//! The command line interface for exploring a dataset.
use crate::log;
use crate::output::{
    OutputFormat, with_output, write_map_csv, write_map_json, write_render_csv, write_render_json,
};
use crate::region::RegionKey;
use crate::render::InflationMode;
use crate::session::Session;
use crate::settings::Settings;
use crate::view_mode::ViewModeState;
use ::log::info;
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for exploring a dataset.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options for the render command
#[derive(Args, Default)]
pub struct RenderOpts {
    /// Regions to select (e.g. `agg`, `prov:Limburg`, `mun:Gent`). Defaults to the aggregate.
    #[arg(short, long = "select", value_name = "KEY")]
    pub selected: Vec<String>,
    /// How to lay out the chart. Defaults to the value in the settings file.
    #[arg(long, value_enum)]
    pub view: Option<ViewModeState>,
    /// Which values to chart. Defaults to the value in the settings file.
    #[arg(long, value_enum)]
    pub inflation: Option<InflationMode>,
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
    /// File to write to, instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Options for the map command
#[derive(Args, Default)]
pub struct MapOpts {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
    /// File to write to, instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the chart data for a selection of regions.
    Render {
        /// Path to the dataset directory.
        data_dir: PathBuf,
        /// Other render options
        #[command(flatten)]
        opts: RenderOpts,
    },
    /// Classify every municipality for the choropleth map.
    Map {
        /// Path to the dataset directory.
        data_dir: PathBuf,
        /// Other map options
        #[command(flatten)]
        opts: MapOpts,
    },
    /// List every region which can be selected.
    List {
        /// Path to the dataset directory.
        data_dir: PathBuf,
    },
    /// Validate a dataset.
    Validate {
        /// Path to the dataset directory.
        data_dir: PathBuf,
    },
    /// Manage program settings.
    Settings {
        /// The subcommands for managing program settings.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Render { data_dir, opts } => handle_render_command(&data_dir, &opts, None),
            Self::Map { data_dir, opts } => handle_map_command(&data_dir, &opts, None),
            Self::List { data_dir } => handle_list_command(&data_dir, None),
            Self::Validate { data_dir } => handle_validate_command(&data_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        // Output program help
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Load program settings (if not provided) and initialise the logger
fn init(settings: Option<Settings>) -> Result<Settings> {
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    log::init(&settings.log_level).context("Failed to initialise logging.")?;

    Ok(settings)
}

/// Load the dataset in `data_dir` into a new session
fn load_session(data_dir: &Path) -> Result<Session> {
    Session::load(data_dir).context("Failed to load dataset.")
}

/// Handle the `render` command.
pub fn handle_render_command(
    data_dir: &Path,
    opts: &RenderOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = init(settings)?;
    let mut session = load_session(data_dir)?;

    if !opts.selected.is_empty() {
        let keys = opts
            .selected
            .iter()
            .map(|key| key.parse::<RegionKey>())
            .collect::<Result<Vec<_>>>()
            .context("Invalid region selection.")?;
        session.select_only(keys);
    }
    session.set_view_mode(opts.view.unwrap_or(settings.view_mode));
    session.set_inflation_mode(opts.inflation.unwrap_or(settings.inflation_mode));
    info!("{}", session.selection_summary());

    let model = session.render();
    info!(
        "Rendering {} series as {}",
        model.series.len(),
        model.view_mode
    );

    with_output(opts.output.as_deref(), |writer| match opts.format {
        OutputFormat::Json => write_render_json(writer, &model),
        OutputFormat::Csv => write_render_csv(writer, &model),
    })
}

/// Handle the `map` command.
pub fn handle_map_command(
    data_dir: &Path,
    opts: &MapOpts,
    settings: Option<Settings>,
) -> Result<()> {
    init(settings)?;
    let session = load_session(data_dir)?;

    let styles = session.map_styles();
    info!(
        "Classified {} municipalities by their {} values",
        styles.len(),
        session.config().map_year()
    );

    with_output(opts.output.as_deref(), |writer| match opts.format {
        OutputFormat::Json => write_map_json(writer, &styles),
        OutputFormat::Csv => write_map_csv(writer, &styles),
    })
}

/// Handle the `list` command.
pub fn handle_list_command(data_dir: &Path, settings: Option<Settings>) -> Result<()> {
    init(settings)?;
    let session = load_session(data_dir)?;

    for key in session.available_keys() {
        println!("{key}");
    }

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(data_dir: &Path, settings: Option<Settings>) -> Result<()> {
    init(settings)?;
    load_session(data_dir)?;
    info!("Dataset validation successful!");

    Ok(())
}
