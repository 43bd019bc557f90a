//! Sports day command line.
//!
//! Loads one sport as JSON, runs a single engine operation on it and prints
//! the result as JSON on stdout.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Error, bail};
use config::CliConfig;
use log::{info, warn};
use pico_args::Arguments;
use sports_day::{
    Shuffler, Sport, SportType,
    competition::{assign_blocks, generate_blocks, generate_playoff_for_sport},
    schedule::CourtScheduler,
};

const HELP: &str = "\
Generate blocks, playoffs and court timetables for a sports day

USAGE:
  sd_cli <COMMAND> --input FILE [OPTIONS]

COMMANDS:
  blocks       Draw league blocks and their round-robin matches; prints the sport
  playoff      Seed the playoff from block standings; prints the outcome
  schedule     Place matches on courts and times; prints the time slots

OPTIONS:
  --input      FILE        Sport document (JSON)
  --blocks     N           Number of blocks  [default: league settings or 2]
  --seed       N           Shuffle seed  [default: env SD_SEED or random]

FLAGS:
  --no-shuffle             Keep the previous timetable's order when scheduling
  -h, --help               Print help information

ENVIRONMENT:
  SD_START_TIME            First match start for sports without settings  [default: 09:00]
  SD_END_TIME              End of the day  [default: 17:00]
  SD_MATCH_DURATION        Minutes per match  [default: 15]
  SD_BREAK_DURATION        Minutes between rounds  [default: 5]
  SD_COURT_COUNT           Courts, 1 or 2  [default: 1]
  SD_SEED                  Shuffle seed
  RUST_LOG                 Log level (e.g. info, debug)
";

const DEFAULT_BLOCK_COUNT: usize = 2;

enum Command {
    Blocks { block_count: Option<usize> },
    Playoff,
    Schedule { shuffle: bool },
}

struct Args {
    command: Command,
    input: PathBuf,
    seed: Option<u64>,
}

fn parse_args(mut pargs: Arguments) -> Result<Args, Error> {
    let Some(name) = pargs.subcommand()? else {
        bail!("Missing command\n\n{HELP}");
    };

    let command = match name.as_str() {
        "blocks" => Command::Blocks {
            block_count: pargs.opt_value_from_str("--blocks")?,
        },
        "playoff" => Command::Playoff,
        "schedule" => Command::Schedule {
            shuffle: !pargs.contains("--no-shuffle"),
        },
        other => bail!("Unknown command '{other}'\n\n{HELP}"),
    };

    let args = Args {
        command,
        input: pargs
            .value_from_str("--input")
            .context("--input FILE is required")?,
        seed: pargs.opt_value_from_str("--seed")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        warn!("Ignoring unused arguments: {remaining:?}");
    }

    Ok(args)
}

fn load_sport(path: &Path) -> Result<Sport, Error> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid sport document {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    env_logger::builder().format_target(false).init();

    let args = parse_args(pargs)?;
    let config = CliConfig::from_env()?;
    config.validate()?;

    let mut sport = load_sport(&args.input)?;
    let mut shuffler = args
        .seed
        .or(config.seed)
        .map(Shuffler::with_seed)
        .unwrap_or_default();

    info!("Loaded {} ({}, {} teams)", sport.name, sport.sport_type, sport.teams.len());

    match args.command {
        Command::Blocks { block_count } => {
            if sport.sport_type != SportType::League {
                bail!("{} is a {} sport; blocks only apply to leagues", sport.name, sport.sport_type);
            }
            let block_count = block_count
                .or(sport.league_settings.as_ref().map(|s| s.block_count))
                .unwrap_or(DEFAULT_BLOCK_COUNT);
            let blocks = generate_blocks(&sport.teams, block_count, &mut shuffler);
            assign_blocks(&mut sport, blocks);
            print_json(&sport)
        }
        Command::Playoff => {
            let outcome = generate_playoff_for_sport(&sport);
            print_json(&outcome)?;
            if !outcome.success {
                bail!(outcome.message);
            }
            Ok(())
        }
        Command::Schedule { shuffle } => {
            let settings = sport
                .schedule_settings
                .take()
                .unwrap_or_else(|| config.schedule.to_settings());
            let slots = CourtScheduler::new(&settings)?
                .with_shuffler(shuffler)
                .generate(&sport, shuffle)
                .with_context(|| format!("Failed to schedule {}", sport.name))?;
            print_json(&slots)
        }
    }
}
