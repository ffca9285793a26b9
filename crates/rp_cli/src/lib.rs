//! Plan rendering for the rotation planner CLI.
//!
//! Text report, playtime overview and CSV export. Everything here is pure
//! rendering over a [`MatchContext`]; the binary in `main.rs` only does
//! argument parsing and snapshot IO.

use anyhow::{Context, Result};
use rp_core::{MatchContext, MatchSettings, Period, PeriodSummary};
use std::io::Write;

/// Builds a fresh plan for `init`.
pub fn new_context(minutes: u32, on_field: usize, with_starter: bool) -> Result<MatchContext> {
    let settings = MatchSettings::new(minutes, on_field)?;
    let ctx = if with_starter {
        MatchContext::with_starter_roster(settings)?
    } else {
        MatchContext::new(settings)?
    };
    Ok(ctx)
}

fn position_of<'a>(ctx: &'a MatchContext, name: &str, period: Period) -> &'a str {
    ctx.roster().player(name).map(|p| p.position_in(period)).unwrap_or("?")
}

fn push_name_list(out: &mut String, ctx: &MatchContext, period: Period, names: &[String]) {
    for name in names {
        out.push_str(&format!("- {} ({})\n", name, position_of(ctx, name, period)));
    }
}

/// Period-by-period text report: substitutions, the field, and the bench.
pub fn render_match_report(ctx: &MatchContext) -> String {
    let mut out = String::new();
    for summary in ctx.summarize() {
        out.push_str(&format!("Period {}\n", summary.period));
        out.push_str(&"-".repeat(40));
        out.push('\n');

        if !summary.came_on.is_empty() {
            out.push_str("In:\n");
            push_name_list(&mut out, ctx, summary.period, &summary.came_on);
        }
        if !summary.went_off.is_empty() {
            out.push_str("Out:\n");
            push_name_list(&mut out, ctx, summary.period, &summary.went_off);
        }
        out.push_str(&format!("On the pitch ({}):\n", summary.formation));
        push_name_list(&mut out, ctx, summary.period, &summary.on_field);
        out.push_str("On the bench:\n");
        push_name_list(&mut out, ctx, summary.period, &summary.bench);
        for warning in &summary.warnings {
            out.push_str(&format!("Note: {warning}\n"));
        }
        out.push('\n');
    }
    out
}

/// Playtime table plus how much of the field the plan has filled.
pub fn render_overview(ctx: &MatchContext) -> String {
    let roster = ctx.roster();
    let mut out = format!(
        "Squad: {} players, {} available\n",
        roster.len(),
        roster.available_count()
    );
    out.push_str(&format!(
        "{:<12} {:<18} {:>6} {:>7} {:>6}\n",
        "Name", "Position", "Total", "Target", "Diff"
    ));
    for player in roster.players() {
        let name = if player.available {
            player.name.clone()
        } else {
            format!("{} *", player.name)
        };
        out.push_str(&format!(
            "{:<12} {:<18} {:>6} {:>7} {:>+6}\n",
            name,
            player.active_position,
            player.metrics.total_minutes,
            player.metrics.target_minutes,
            player.metrics.difference
        ));
    }
    if roster.available_count() < roster.len() {
        out.push_str("* unavailable\n");
    }

    let totals = ctx.plan_totals();
    out.push_str(&format!(
        "\nAssigned {} of {} player-minutes\n",
        totals.used_minutes, totals.capacity_minutes
    ));
    if totals.used_minutes < totals.capacity_minutes {
        out.push_str(&format!(
            "Note: {} player-minutes still open\n",
            totals.capacity_minutes - totals.used_minutes
        ));
    } else if totals.used_minutes > totals.capacity_minutes {
        out.push_str(&format!(
            "Note: {} player-minutes over capacity\n",
            totals.used_minutes - totals.capacity_minutes
        ));
    }
    let counts: Vec<String> = ctx
        .periods()
        .iter()
        .map(|p| format!("{}: {}", p, roster.on_field_count(*p)))
        .collect();
    out.push_str(&format!("On the field per period: {}\n", counts.join(", ")));
    out
}

fn join_or_dash(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Writes the plan as CSV, one row per period.
pub fn write_plan_csv<W: Write>(ctx: &MatchContext, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "Period", "Formation", "In", "Out", "Keeper", "Defense", "Midfield", "Attack", "Other",
        "Bench",
    ])
    .context("Failed to write CSV header")?;

    for summary in ctx.summarize() {
        let PeriodSummary {
            period,
            formation,
            came_on,
            went_off,
            keeper,
            defense,
            midfield,
            attack,
            other,
            bench,
            ..
        } = summary;
        wtr.write_record([
            period.to_string(),
            formation,
            join_or_dash(&came_on),
            join_or_dash(&went_off),
            join_or_dash(&keeper),
            join_or_dash(&defense),
            join_or_dash(&midfield),
            join_or_dash(&attack),
            join_or_dash(&other),
            join_or_dash(&bench),
        ])
        .with_context(|| format!("Failed to write CSV row for period {period}"))?;
    }

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn plan_csv_string(ctx: &MatchContext) -> Result<String> {
    let mut buffer = Vec::new();
    write_plan_csv(ctx, &mut buffer)?;
    String::from_utf8(buffer).context("CSV output was not valid UTF-8")
}
