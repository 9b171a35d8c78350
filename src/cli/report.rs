//! Run summary printing.
//!
//! One line per unit, language pairs aligned, then a totals line:
//!
//! ```text
//! ✓ en -> fr  locales/fr.json  translated 3, copied 1
//! ✓ en -> de  locales/de.json  up to date
//! ✘ en -> ja  locales/ja.json  batch 1 failed: rate limited by provider
//! ```

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::orchestrator::{RunReport, UnitOutcome, UnitReport};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Pending mark for dry runs.
pub const PENDING_MARK: &str = "\u{2022}"; // •

pub fn print(report: &RunReport, verbose: bool) {
    print_to(report, verbose, &mut io::stdout().lock());
}

pub fn print_to<W: Write>(report: &RunReport, verbose: bool, writer: &mut W) {
    let pair_width = report
        .units
        .iter()
        .map(|u| pair_label(u).width())
        .max()
        .unwrap_or(0);
    let path_width = report
        .units
        .iter()
        .map(|u| u.target_path.display().to_string().width())
        .max()
        .unwrap_or(0);

    for unit in &report.units {
        print_unit(unit, pair_width, path_width, verbose, writer);
    }

    print_summary(report, writer);
}

fn pair_label(unit: &UnitReport) -> String {
    format!("{} -> {}", unit.source_lang, unit.target_lang)
}

/// Pad to a display width; `format!` padding counts chars, not columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn print_unit<W: Write>(
    unit: &UnitReport,
    pair_width: usize,
    path_width: usize,
    verbose: bool,
    writer: &mut W,
) {
    let pair = pad(&pair_label(unit), pair_width);
    let path = pad(&unit.target_path.display().to_string(), path_width);

    let (mark, detail) = match &unit.outcome {
        UnitOutcome::Translated { translated, copied } => (
            SUCCESS_MARK.green(),
            format!("translated {}, copied {}", translated, copied).normal(),
        ),
        UnitOutcome::UpToDate => (SUCCESS_MARK.green(), "up to date".dimmed()),
        UnitOutcome::Pending { translate, copy } => (
            PENDING_MARK.cyan(),
            format!("would translate {}, copy {}", translate, copy).normal(),
        ),
        UnitOutcome::Failed(err) => (FAILURE_MARK.red(), err.to_string().red()),
    };

    let _ = writeln!(writer, "{} {}  {}  {}", mark, pair.bold(), path, detail);

    let show_keys = verbose || matches!(unit.outcome, UnitOutcome::Pending { .. });
    if show_keys {
        for key in &unit.missing_keys {
            let _ = writeln!(writer, "    {} {}", "+".green(), key);
        }
    }
}

fn print_summary<W: Write>(report: &RunReport, writer: &mut W) {
    let total = report.units.len();
    let failed = report.failed_count();
    let written = report.written_count();
    let units = if total == 1 { "unit" } else { "units" };

    let msg = if failed == 0 {
        format!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("{} {} done, {} keys written", total, units, written).green()
        )
    } else {
        format!(
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} of {} {} failed, {} keys written",
                failed, total, units, written
            )
            .red()
        )
    };
    let _ = writeln!(writer, "{}", msg);
}
