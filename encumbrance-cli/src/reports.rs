use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use encumbrance_core::{EncumbranceRule, UnitSystem};

/// Which trigger produced a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerPath {
    Derived,
    Update,
}

impl TriggerPath {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Derived => "derived",
            Self::Update => "update",
        }
    }
}

/// Encumbrance as written by one trigger path for one actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorRow {
    pub path: TriggerPath,
    pub actor_id: String,
    pub name: String,
    pub value: String,
    /// Only the derived path writes capacity and percentage.
    pub max: Option<f64>,
    pub pct: Option<f64>,
    pub statuses: Vec<String>,
    /// The host's own values were left in place.
    pub host_values: bool,
    pub sheet_refreshed: bool,
}

/// Thresholds in display units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdView {
    pub units: UnitSystem,
    pub encumbered: f64,
    pub heavily_encumbered: f64,
    pub maximum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub rule: EncumbranceRule,
    pub count_unequipped: bool,
    /// `None` when the world has no threshold table.
    pub thresholds: Option<ThresholdView>,
    pub rows: Vec<ActorRow>,
    pub notices: Vec<String>,
}

pub fn generate_console_report(out: &mut dyn Write, summary: &RunSummary) -> Result<()> {
    writeln!(out, "{}", "⚖️  Encumbrance Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;
    writeln!(out, "Rules: {:?}", summary.rule)?;
    writeln!(out, "Count unequipped items: {}", summary.count_unequipped)?;
    match summary.thresholds {
        Some(view) => writeln!(
            out,
            "Thresholds ({}): {} / {} / {}",
            view.units.label(),
            view.encumbered,
            view.heavily_encumbered,
            view.maximum
        )?,
        None => writeln!(out, "{}", "Thresholds unavailable".yellow())?,
    }
    writeln!(out)?;

    for row in &summary.rows {
        let status = if row.statuses.is_empty() {
            "✅".green()
        } else if row.statuses.iter().any(|s| s == "exceedingCarryingCapacity") {
            "⛔".red()
        } else {
            "⚠️ ".yellow()
        };
        writeln!(
            out,
            "{} [{}] {} ({})",
            status,
            row.path.label(),
            row.name.bold(),
            row.actor_id
        )?;
        if row.host_values {
            writeln!(out, "   Host values kept")?;
        }
        writeln!(out, "   Carried: {}", row.value)?;
        if let (Some(max), Some(pct)) = (row.max, row.pct) {
            writeln!(out, "   Capacity: {max} ({pct:.1}%)")?;
        }
        if !row.statuses.is_empty() {
            writeln!(out, "   Statuses: {}", row.statuses.join(", ").yellow())?;
        }
        if row.sheet_refreshed {
            writeln!(out, "   Sheet refreshed")?;
        }
    }

    for notice in &summary.notices {
        writeln!(out, "🔁 {}", notice.bright_yellow())?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, summary: &RunSummary) -> Result<()> {
    let json_output = serde_json::to_string_pretty(summary)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, summary: &RunSummary) -> Result<()> {
    writeln!(out, "# Encumbrance Report\n")?;
    writeln!(out, "## Settings\n")?;
    writeln!(out, "- **Rules**: {:?}", summary.rule)?;
    writeln!(out, "- **Count unequipped items**: {}", summary.count_unequipped)?;
    if let Some(view) = summary.thresholds {
        writeln!(
            out,
            "- **Thresholds ({})**: {} / {} / {}",
            view.units.label(),
            view.encumbered,
            view.heavily_encumbered,
            view.maximum
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Actors\n")?;
    writeln!(out, "| Path | Actor | Carried | Max | % | Statuses |")?;
    writeln!(out, "|------|-------|---------|-----|---|----------|")?;
    for row in &summary.rows {
        let max = row.max.map_or_else(|| "-".to_string(), |m| m.to_string());
        let pct = row.pct.map_or_else(|| "-".to_string(), |p| format!("{p:.1}"));
        let statuses = if row.statuses.is_empty() {
            "-".to_string()
        } else {
            row.statuses.join(", ")
        };
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} |",
            row.path.label(),
            row.name,
            row.value,
            max,
            pct,
            statuses
        )?;
    }

    if !summary.notices.is_empty() {
        writeln!(out, "\n## Notices\n")?;
        for notice in &summary.notices {
            writeln!(out, "- {notice}")?;
        }
    }
    Ok(())
}
