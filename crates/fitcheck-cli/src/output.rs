//! Output formatting for fittings, skill listings, sheets and readiness reports.

use std::fmt::Write;

use clap::ValueEnum;
use fitcheck_lib::{ParsedFitting, ReadinessReport, SkillListing, SkillSheet, SlotCategory};

use crate::terminal::ColorPalette;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Text,
    /// Pretty-printed JSON, shaped for web front ends.
    Json,
}

/// Render a parsed fitting grouped by slot category.
pub fn format_fitting_text(fit: &ParsedFitting) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}, {}]", fit.ship_name, fit.fit_name);
    for category in SlotCategory::ALL {
        let modules: Vec<_> = fit.modules(category).collect();
        if modules.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{} slots ({}):", category.label(), modules.len());
        for (index, item) in modules.iter().enumerate() {
            let _ = writeln!(out, "  {index:>2}  {} ({})", item.name, item.type_id);
        }
    }
    if !fit.drone_bay.is_empty() {
        let _ = writeln!(out, "drone bay:");
        for stack in fit.drone_bay.values() {
            let _ = writeln!(out, "  {} x{}", stack.name, stack.quantity);
        }
    }
    out
}

/// Render a skill listing as a table.
pub fn format_skill_listing_text(skills: &[SkillListing]) -> String {
    if skills.is_empty() {
        return "No skills required.\n".to_string();
    }
    let width = skills
        .iter()
        .map(|s| s.type_name.len())
        .max()
        .unwrap_or(0)
        .max("Skill".len());

    let mut out = String::new();
    let _ = writeln!(out, "Required skills ({}):", skills.len());
    let _ = writeln!(out, "{:<width$}  {:>8}  {:>5}", "Skill", "Type ID", "Level");
    for skill in skills {
        let _ = writeln!(
            out,
            "{:<width$}  {:>8}  {:>5}",
            skill.type_name, skill.type_id, skill.level
        );
    }
    out
}

/// Render each pilot's standing against the sheet's required skills.
pub fn format_sheet_text(sheet: &SkillSheet, palette: &ColorPalette) -> String {
    let mut out = String::new();
    for character in sheet.characters.values() {
        let missing: Vec<String> = sheet
            .skills
            .iter()
            .filter_map(|req| {
                let trained = character
                    .skill
                    .get(&req.type_id)
                    .map(|s| s.level)
                    .unwrap_or(0);
                (trained < req.level)
                    .then(|| format!("{} {}/{}", req.type_name, trained, req.level))
            })
            .collect();

        let _ = write!(
            out,
            "{}{}{} {}({}){} ",
            palette.white_bold,
            character.name,
            palette.reset,
            palette.gray,
            character.id,
            palette.reset
        );
        if missing.is_empty() {
            let _ = writeln!(out, "{}ready{}", palette.green, palette.reset);
        } else {
            let _ = writeln!(
                out,
                "{}missing {}{}",
                palette.red,
                missing.len(),
                palette.reset
            );
            for line in missing {
                let _ = writeln!(out, "  {line}");
            }
        }
    }
    out
}

/// Render the readiness report as a pilot × fit grid followed by totals.
///
/// Each cell shows ship/fit readiness as two marks: `S` or `-`, then `F` or `-`.
pub fn format_report_text(report: &ReadinessReport, palette: &ColorPalette) -> String {
    let name_width = report
        .chars
        .keys()
        .map(|n| n.len())
        .max()
        .unwrap_or(0)
        .max("Pilot".len());

    let mut out = String::new();
    let _ = write!(out, "{:<name_width$}", "Pilot");
    for fit in &report.fittings {
        let _ = write!(out, "  {fit}");
    }
    out.push('\n');

    for (pilot, fits) in &report.chars {
        let _ = write!(out, "{:<name_width$}", pilot);
        for fit in &report.fittings {
            let cell = fits
                .get(fit)
                .map(|flags| {
                    let color = if flags.fit {
                        palette.green
                    } else if flags.ship {
                        palette.gray
                    } else {
                        palette.red
                    };
                    format!(
                        "{color}{}{}{}",
                        if flags.ship { 'S' } else { '-' },
                        if flags.fit { 'F' } else { '-' },
                        palette.reset
                    )
                })
                .unwrap_or_else(|| "??".to_string());
            let pad = fit.len().saturating_sub(2);
            let _ = write!(out, "  {cell}{:pad$}", "");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\nTotals ({} pilots):", report.totals.chars);
    for fit in &report.fittings {
        if let Some(total) = report.totals.fits.get(fit) {
            let _ = writeln!(
                out,
                "  {fit}: ship {}, fit {}",
                total.ship, total.fit
            );
        }
    }
    out
}
