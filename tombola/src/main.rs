mod config;

use std::{cmp::Ordering, env, num::ParseIntError, process, str::FromStr};

use config::{AppConfig, ConfigError, Environment};
use pool_ledger::{PoolController, SpinError, SpinOutcome};
use thiserror::Error;

const DEFAULT_HISTORY_DAYS: u32 = 7;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("tombola failed: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let mut args = env::args().skip(1);
    let environment = Environment::from_str(&args.next().ok_or(AppError::Usage)?)?;
    let command = Command::parse(args)?;

    let config = AppConfig::load(environment)?;
    let controller = PoolController::bootstrap(config.pool.clone())?;

    match command {
        Command::Spin { names } => print_outcome(&controller.spin(&names)?),
        Command::Record { winner, names } => {
            print_outcome(&controller.record_winner(&winner, &names)?)
        }
        Command::Add { name } => {
            let participant = controller.add_participant(&name)?;
            println!("added {} (id={})", participant.name, participant.id);
        }
        Command::Remove { name } => {
            controller.remove_participant(&name)?;
            println!("removed {name}");
        }
        Command::List => print_participants(&controller),
        Command::History { days } => print_history(&controller, days),
        Command::Reset => {
            let touched = controller.reset_stats()?;
            println!("reset stats for {touched} participants");
        }
    }
    Ok(())
}

enum Command {
    Spin { names: Vec<String> },
    Record { winner: String, names: Vec<String> },
    Add { name: String },
    Remove { name: String },
    List,
    History { days: u32 },
    Reset,
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, AppError> {
        let verb = args.next().ok_or(AppError::Usage)?;
        match verb.as_str() {
            "spin" => Ok(Command::Spin {
                names: args.collect(),
            }),
            "record" => {
                let winner = args.next().ok_or(AppError::Usage)?;
                Ok(Command::Record {
                    winner,
                    names: args.collect(),
                })
            }
            "add" => Ok(Command::Add {
                name: args.next().ok_or(AppError::Usage)?,
            }),
            "remove" => Ok(Command::Remove {
                name: args.next().ok_or(AppError::Usage)?,
            }),
            "list" => Ok(Command::List),
            "history" => {
                let days = match args.next() {
                    Some(raw) => raw
                        .parse()
                        .map_err(|source| AppError::InvalidDays { raw, source })?,
                    None => DEFAULT_HISTORY_DAYS,
                };
                Ok(Command::History { days })
            }
            "reset" => Ok(Command::Reset),
            other => Err(AppError::UnknownCommand {
                value: other.to_string(),
            }),
        }
    }
}

fn print_outcome(outcome: &SpinOutcome) {
    println!(
        "winner: {} (p={:.2}%) at {}",
        outcome.winner,
        outcome.winner_probability * 100.0,
        outcome.spin_time.to_rfc3339()
    );
    for member in &outcome.participants {
        println!(
            "  {:<20} p={:>6.2}%  wins={}",
            member.name,
            member.probability * 100.0,
            member.times_selected
        );
    }
}

fn print_participants(controller: &PoolController) {
    let mut participants = controller.list_active();
    if participants.is_empty() {
        println!("no active participants");
        return;
    }
    participants.sort_by(|a, b| {
        b.probability_weight
            .partial_cmp(&a.probability_weight)
            .unwrap_or(Ordering::Equal)
    });
    for participant in participants {
        let last = participant
            .last_selected_at
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "#{:<4} {:<20} weight={:.2} wins={} last={}",
            participant.id,
            participant.name,
            participant.probability_weight,
            participant.times_selected,
            last
        );
    }
}

fn print_history(controller: &PoolController, days: u32) {
    let records = controller.recent_history(days);
    if records.is_empty() {
        println!("no selections in the last {days} days");
        return;
    }
    for record in records {
        let name = controller
            .participant_name(record.participant_id)
            .unwrap_or_else(|| format!("#{}", record.participant_id));
        println!(
            "{}  {:<20} pool={} p={:.2}%",
            record.selected_at.to_rfc3339(),
            name,
            record.total_participants,
            record.probability_at_selection * 100.0
        );
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error(
        "usage: tombola <dev|prod> <spin NAME...|record WINNER NAME...|add NAME|remove NAME|list|history [DAYS]|reset>"
    )]
    Usage,
    #[error("unknown command {value:?}")]
    UnknownCommand { value: String },
    #[error("history days {raw:?} is not a valid number: {source}")]
    InvalidDays { raw: String, source: ParseIntError },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spin(#[from] SpinError),
}
