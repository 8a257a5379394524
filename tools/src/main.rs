//! session-runner: headless/interactive driver for one InvestLab session.
//!
//! Usage:
//!   session-runner --seed 42 --db session.db --out-dir ./results
//!   session-runner --auto keep --json

use anyhow::Result;
use investlab_core::{
    command::ParticipantCommand,
    config::ExperimentConfig,
    engine::SessionEngine,
    error::SessionError,
    profile::{Condition, Gender},
    report::{build_report, ResultsReport},
    rng::OutcomeRng,
    round::Decision,
    session::Stage,
    store::SessionStore,
    view::StageView,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Decision policy for unattended runs.
enum AutoPolicy {
    Keep,
    Sell,
    Random(OutcomeRng),
}

impl AutoPolicy {
    fn parse(s: &str, seed: u64) -> Result<Self> {
        match s {
            "keep" => Ok(Self::Keep),
            "sell" => Ok(Self::Sell),
            // Separate stream from the engine's so decisions don't
            // correlate with outcomes.
            "random" => Ok(Self::Random(OutcomeRng::new(seed ^ 0x5EED_DEC1_5104_5EED))),
            _ => anyhow::bail!("unknown --auto policy '{s}' (keep|sell|random)"),
        }
    }

    fn decide(&mut self) -> Decision {
        match self {
            Self::Keep => Decision::Keep,
            Self::Sell => Decision::Sell,
            Self::Random(rng) => {
                if rng.chance(0.5) {
                    Decision::Keep
                } else {
                    Decision::Sell
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let db = string_arg(&args, "--db", ":memory:");
    let out_dir = string_arg(&args, "--out-dir", ".");
    let json = args.iter().any(|a| a == "--json");

    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => ExperimentConfig::load(Path::new(&w[1]))?,
        None => ExperimentConfig::default(),
    };

    let mut auto = args
        .windows(2)
        .find(|w| w[0] == "--auto")
        .map(|w| AutoPolicy::parse(&w[1], seed))
        .transpose()?;

    let store = if db == ":memory:" {
        SessionStore::in_memory()?
    } else {
        SessionStore::open(&db)?
    };
    store.migrate()?;

    let mut engine = SessionEngine::create(store, config, seed)?;
    println!("InvestLab — session-runner");
    println!("  session: {}", engine.state.session_id);
    println!("  seed:    {seed}");
    println!("  db:      {db}");
    println!();

    while engine.state.stage != Stage::Results {
        drive_stage(&mut engine, auto.as_mut())?;
    }

    let report = build_report(&engine.state);
    print_summary(&engine, &report);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let path = report.export(Path::new(&out_dir))?;
    println!("  artifact: {}", path.display());
    Ok(())
}

/// Render the current stage, collect one input, apply it. A refused
/// command prints the reason and leaves the stage to be re-presented.
fn drive_stage(engine: &mut SessionEngine, auto: Option<&mut AutoPolicy>) -> Result<()> {
    let view = engine.stage_view()?;
    let command = match view {
        StageView::Consent { study_title } => {
            println!("— {study_title} —");
            match auto {
                Some(_) => ParticipantCommand::GiveConsent { accepted: true },
                None => {
                    let answer = prompt("J'ai lu et je comprends les conditions de l'étude [y/n]:")?;
                    ParticipantCommand::GiveConsent {
                        accepted: matches!(answer.to_lowercase().as_str(), "y" | "yes" | "oui"),
                    }
                }
            }
        }

        StageView::Demographics { age_min, age_max, genders } => match auto {
            Some(_) => ParticipantCommand::SubmitProfile {
                age:    30,
                gender: Gender::PreferNotToSay,
            },
            None => {
                let age_input = prompt(&format!("Âge [{age_min}-{age_max}]:"))?;
                let gender_input = prompt(&format!("Genre {genders:?}:"))?;
                let gender = match gender_input.parse::<Gender>() {
                    Ok(g) => g,
                    Err(e) => {
                        println!("  ! {e}");
                        return Ok(());
                    }
                };
                // A non-numeric age falls through to the stage guard.
                let age = age_input.parse::<u8>().unwrap_or(0);
                ParticipantCommand::SubmitProfile { age, gender }
            }
        },

        StageView::ConditionSelect { conditions } => match auto {
            Some(_) => ParticipantCommand::SelectCondition {
                condition: Condition::Sequential,
            },
            None => {
                let input = prompt(&format!("Choisissez votre condition {conditions:?}:"))?;
                match input.parse::<Condition>() {
                    Ok(condition) => ParticipantCommand::SelectCondition { condition },
                    Err(e) => {
                        println!("  ! {e}");
                        return Ok(());
                    }
                }
            }
        },

        StageView::Round { round_index, outcome, endowment, decisions } => {
            println!("— Tour {round_index} —");
            println!("  Résultat du dé : {}", outcome.label());
            println!("  Dotation actuelle : {endowment} ECU");
            match auto {
                Some(policy) => ParticipantCommand::SubmitDecision {
                    decision: policy.decide(),
                },
                None => {
                    let input = prompt(&format!("Votre décision {decisions:?}:"))?;
                    match input.parse::<Decision>() {
                        Ok(decision) => ParticipantCommand::SubmitDecision { decision },
                        Err(e) => {
                            println!("  ! {e}");
                            return Ok(());
                        }
                    }
                }
            }
        }

        StageView::Results { .. } => return Ok(()),
    };

    match engine.apply(command) {
        Ok(events) => {
            log::debug!("applied input, {} event(s) emitted", events.len());
            Ok(())
        }
        Err(SessionError::StageRefused { reason, .. }) => {
            println!("  ! {reason}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(engine: &SessionEngine, report: &ResultsReport) {
    println!();
    println!("=== SESSION SUMMARY ===");
    println!("  session:   {}", engine.state.session_id);
    println!(
        "  condition: {}",
        report
            .condition
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".into())
    );
    println!();
    println!("  Round  Outcome  Decision  Gain/Loss");
    for row in &report.rows {
        println!(
            "  {:<6} {:<8} {:<9} {:+}",
            row.round_index,
            row.outcome.to_string(),
            row.decision.to_string(),
            row.delta
        );
    }
    println!();
    println!("  final endowment: {} ECU", report.final_endowment);
}

fn prompt(label: &str) -> Result<String> {
    print!("{label} ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        anyhow::bail!("stdin closed before the session completed");
    }
    Ok(line.trim().to_string())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg(args: &[String], flag: &str, default: &str) -> String {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .unwrap_or_else(|| default.to_string())
}
