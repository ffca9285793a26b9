//! Rotation planner CLI
//!
//! Edits and prints substitution plans stored as snapshot files.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use rp_core::{DenyReason, MatchContext, SnapshotManager, ToggleDecision};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "rp_cli")]
#[command(about = "Plan substitutions and playing time for a match", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum FieldState {
    On,
    Off,
}

#[cfg(feature = "cli")]
impl FieldState {
    fn as_bool(self) -> bool {
        matches!(self, FieldState::On)
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Create a new plan snapshot
    Init {
        /// Output snapshot path
        #[arg(long)]
        out: PathBuf,

        /// Match duration in minutes
        #[arg(long, default_value_t = 80)]
        minutes: u32,

        /// Players on the field at once
        #[arg(long, default_value_t = 9)]
        on_field: usize,

        /// Start with an empty roster instead of the usual squad
        #[arg(long, default_value = "false")]
        empty: bool,
    },

    /// Print the playtime overview for a plan
    Show {
        /// Snapshot path
        snapshot: PathBuf,
    },

    /// Put a player on or take them off for a period
    Toggle {
        /// Snapshot path
        snapshot: PathBuf,

        /// Player name
        #[arg(long)]
        player: String,

        /// Period label, e.g. "15-25"
        #[arg(long)]
        period: String,

        /// Desired state
        #[arg(long, value_enum)]
        state: FieldState,
    },

    /// Change match duration or field size
    Config {
        /// Snapshot path
        snapshot: PathBuf,

        /// New match duration in minutes
        #[arg(long)]
        minutes: Option<u32>,

        /// New field size
        #[arg(long)]
        on_field: Option<usize>,
    },

    /// Print the period-by-period match report
    Report {
        /// Snapshot path
        snapshot: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export the plan as CSV
    Export {
        /// Snapshot path
        snapshot: PathBuf,

        /// Output CSV path
        #[arg(long)]
        out: PathBuf,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            out,
            minutes,
            on_field,
            empty,
        } => {
            let ctx = rp_cli::new_context(minutes, on_field, !empty)?;
            SnapshotManager::save_context(&out, &ctx)?;
            println!("✅ New plan saved to {}", out.display());
            println!(
                "   {} minutes, {} on the field, {} players",
                minutes,
                on_field,
                ctx.roster().len()
            );
            print_periods(&ctx);
        }

        Commands::Show { snapshot } => {
            let info = SnapshotManager::info(&snapshot)?;
            println!("📄 {}", snapshot.display());
            println!("   {}", info.get_display_text());
            let ctx = SnapshotManager::load_context(&snapshot)?;
            println!();
            print!("{}", rp_cli::render_overview(&ctx));
        }

        Commands::Toggle {
            snapshot,
            player,
            period,
            state,
        } => {
            let mut ctx = SnapshotManager::load_context(&snapshot)?;
            let outcome = ctx.toggle(&player, &period, state.as_bool())?;
            match outcome.decision {
                ToggleDecision::Allowed => {
                    let propagation = outcome.propagation.unwrap_or_default();
                    SnapshotManager::save_context(&snapshot, &ctx)?;
                    println!(
                        "✅ {player} {} in {period}, carried into {} later periods",
                        if state.as_bool() { "on" } else { "off" },
                        propagation.applied.len()
                    );
                    if let Some(stopped) = propagation.stopped_at {
                        println!("   Stopped at {stopped}: that period is already full");
                    }
                    if let Some(position) = outcome.active_position {
                        println!("   Covering {position}");
                    }
                }
                ToggleDecision::Denied(reason) => {
                    let why = match reason {
                        DenyReason::CapacityExceeded => "the period already has a full field",
                        DenyReason::PlayerUnavailable => "the player is marked unavailable",
                    };
                    println!("❌ Denied: {why}. The plan was not changed.");
                }
            }
        }

        Commands::Config {
            snapshot,
            minutes,
            on_field,
        } => {
            let mut ctx = SnapshotManager::load_context(&snapshot)?;
            ctx.configure(minutes, on_field)?;
            SnapshotManager::save_context(&snapshot, &ctx)?;
            if let Some(minutes) = minutes {
                println!("✅ Duration set to {minutes} minutes, assignments cleared");
            }
            if let Some(on_field) = on_field {
                println!("✅ Field size set to {on_field}");
            }
            print_periods(&ctx);
        }

        Commands::Report { snapshot, out } => {
            let ctx = SnapshotManager::load_context(&snapshot)?;
            let report = rp_cli::render_match_report(&ctx);
            match out {
                Some(path) => {
                    std::fs::write(&path, report)?;
                    println!("📄 Report saved to {}", path.display());
                }
                None => print!("{report}"),
            }
        }

        Commands::Export { snapshot, out } => {
            let ctx = SnapshotManager::load_context(&snapshot)?;
            let csv = rp_cli::plan_csv_string(&ctx)?;
            std::fs::write(&out, csv)?;
            println!("📄 CSV saved to {}", out.display());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_periods(ctx: &MatchContext) {
    let labels: Vec<String> = ctx.periods().iter().map(|p| p.to_string()).collect();
    println!("   Periods: {}", labels.join(", "));
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("rp_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
