mod reports;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use encumbrance_core::settings::registry;
use encumbrance_core::{
    EncumbranceConfig, EncumbranceHost, EncumbranceModule, EncumbranceRule, HostEvent, SettingKey,
    SettingValue, ThresholdTable, UnitSystem, World,
};
use reports::{ActorRow, RunSummary, ThresholdView, TriggerPath};

const LOG_TARGET: &str = "encumbrance-report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TriggerMode {
    /// Derived-data path: full block, container-aware
    Derived,
    /// Update path: persisted value and statuses for characters
    Update,
    /// Run both paths
    Both,
}

impl TriggerMode {
    const fn runs_derived(self) -> bool {
        matches!(self, Self::Derived | Self::Both)
    }

    const fn runs_update(self) -> bool {
        matches!(self, Self::Update | Self::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Units {
    Imperial,
    Metric,
}

impl From<Units> for UnitSystem {
    fn from(units: Units) -> Self {
        match units {
            Units::Imperial => Self::Imperial,
            Units::Metric => Self::Metric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    None,
    Normal,
    Variant,
}

impl From<RuleArg> for EncumbranceRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::None => Self::None,
            RuleArg::Normal => Self::Normal,
            RuleArg::Variant => Self::Variant,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "encumbrance-report", version = "0.1.0")]
#[command(about = "Variant encumbrance reports for world snapshots")]
struct Args {
    /// World snapshot (JSON) to evaluate
    #[arg(long, required_unless_present = "list_settings")]
    world: Option<PathBuf>,

    /// Which trigger path to run
    #[arg(long, value_enum, default_value_t = TriggerMode::Both)]
    path: TriggerMode,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Units for the threshold table
    #[arg(long, value_enum, default_value_t = Units::Imperial)]
    units: Units,

    /// Override the world's encumbrance rule mode
    #[arg(long, value_enum)]
    rule: Option<RuleArg>,

    /// Override the count-unequipped-items setting
    #[arg(long)]
    count_unequipped: Option<bool>,

    /// Override the encumbered threshold (lbs)
    #[arg(long)]
    encumbered: Option<f64>,

    /// Override the heavily encumbered threshold (lbs)
    #[arg(long)]
    heavily_encumbered: Option<f64>,

    /// Override the maximum threshold (lbs)
    #[arg(long)]
    maximum: Option<f64>,

    /// Report a changed setting key and show the host's response
    #[arg(long, value_name = "KEY")]
    changed_setting: Option<String>,

    /// List the registered settings and exit
    #[arg(long)]
    list_settings: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    if maybe_list_settings(&args)? {
        return Ok(());
    }

    if args.report == "console" && args.output.is_none() {
        announce_banner();
    }

    let Some(path) = args.world.as_deref() else {
        bail!("--world is required unless --list-settings is given");
    };
    let mut world = load_world(path)?;
    apply_overrides(&mut world, &args);

    let summary = build_summary(world, &args)?;
    write_report(&args, &summary)
}

fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn announce_banner() {
    println!("{}", "⚖️  Custom Variant Encumbrance".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn maybe_list_settings(args: &Args) -> Result<bool> {
    if !args.list_settings {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Registered settings:")?;
    for descriptor in registry() {
        let default = match descriptor.default {
            SettingValue::Bool(flag) => flag.to_string(),
            SettingValue::Number(number) => number.to_string(),
            SettingValue::Other(value) => value.to_string(),
        };
        writeln!(
            output_target.writer(),
            "  {:36} {:8} - {}",
            descriptor.key,
            default,
            descriptor.hint
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn load_world(path: &Path) -> Result<World> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let world =
        World::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))?;
    for key in world.settings.unknown_keys() {
        log::warn!(target: LOG_TARGET, "ignoring unknown setting {key}");
    }
    Ok(world)
}

fn apply_overrides(world: &mut World, args: &Args) {
    if let Some(rule) = args.rule {
        world.rule = rule.into();
    }
    if let Some(flag) = args.count_unequipped {
        world
            .settings
            .set(SettingKey::CountUnequippedItems, SettingValue::Bool(flag));
    }
    let thresholds = [
        (SettingKey::EncumberedThreshold, args.encumbered),
        (SettingKey::HeavilyEncumberedThreshold, args.heavily_encumbered),
        (SettingKey::MaximumThreshold, args.maximum),
    ];
    for (key, value) in thresholds {
        if let Some(value) = value {
            log::debug!(target: LOG_TARGET, "overriding {} with {value}", key.key());
            world.settings.set(key, SettingValue::Number(value));
        }
    }
}

fn build_summary(world: World, args: &Args) -> Result<RunSummary> {
    let settings = world.settings.clone();
    let rule = world.rule;
    let mut module = EncumbranceModule::from_settings(world, &settings, rule)
        .context("invalid encumbrance settings")?;

    module.sync_thresholds();
    let units = UnitSystem::from(args.units);
    let thresholds = module
        .host_mut()
        .threshold_table()
        .map(|table| threshold_view(table, units));

    let mut rows = Vec::new();
    if args.path.runs_derived() {
        rows.extend(run_derived_path(
            module.host().clone(),
            *module.config(),
            rule,
        ));
    }
    if args.path.runs_update() {
        rows.extend(run_update_path(&mut module)?);
    }

    let mut notices = Vec::new();
    if let Some(key) = &args.changed_setting {
        let event = HostEvent::SettingUpdated { key: key.clone() };
        match module.handle(&event)? {
            Some(notice) => notices.push(format!("{key}: {}", notice.message())),
            None => log::warn!(target: LOG_TARGET, "{key} is not an encumbrance setting"),
        }
    }

    Ok(RunSummary {
        rule,
        count_unequipped: module.config().count_unequipped,
        thresholds,
        rows,
        notices,
    })
}

fn threshold_view(table: &ThresholdTable, units: UnitSystem) -> ThresholdView {
    let (encumbered, heavily_encumbered, maximum) = table.in_units(units);
    ThresholdView {
        units,
        encumbered,
        heavily_encumbered,
        maximum,
    }
}

/// Prepare every actor on a copy of the world, the way the host does when
/// it rebuilds derived data.
fn run_derived_path(
    world: World,
    config: EncumbranceConfig,
    rule: EncumbranceRule,
) -> Vec<ActorRow> {
    let mut module = EncumbranceModule::new(world, config, rule);
    for id in module.host().actor_ids() {
        module.prepare_derived_data(&id);
    }
    let world = module.into_host();

    world
        .actors
        .iter()
        .map(|actor| {
            let host_values = config.count_unequipped || !actor.kind.tracks_encumbrance();
            let data = &actor.encumbrance;
            ActorRow {
                path: TriggerPath::Derived,
                actor_id: actor.id.to_string(),
                name: actor.name.clone(),
                value: data.value.clone(),
                max: (!host_values).then_some(data.max),
                pct: (!host_values).then_some(data.pct),
                statuses: data.statuses.iter().map(|s| s.as_str().to_string()).collect(),
                host_values,
                sheet_refreshed: world.refreshed.contains(&actor.id),
            }
        })
        .collect()
}

fn run_update_path(module: &mut EncumbranceModule<World>) -> Result<Vec<ActorRow>> {
    let mut rows = Vec::new();
    for id in module.host().actor_ids() {
        let Some(name) = module
            .host()
            .actor(&id)
            .filter(|actor| actor.kind.is_character())
            .map(|actor| actor.name.clone())
        else {
            continue;
        };
        let refreshed_before = module.host().refreshed.len();
        let Some(update) = module.recompute_actor(&id)? else {
            continue;
        };
        rows.push(ActorRow {
            path: TriggerPath::Update,
            actor_id: id.to_string(),
            name,
            value: update.value,
            max: None,
            pct: None,
            statuses: update.statuses.iter().map(|s| s.as_str().to_string()).collect(),
            host_values: false,
            sheet_refreshed: module.host().refreshed.len() > refreshed_before,
        });
    }
    Ok(rows)
}

fn write_report(args: &Args, summary: &RunSummary) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, summary)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, summary)?,
        _ => {
            if summary.rows.is_empty() {
                writeln!(&mut output_target, "No actors evaluated.")?;
            }
            reports::generate_console_report(&mut output_target, summary)?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
