use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hanoi_astar::{solve, solve_between, Path, State};

#[derive(Parser, Debug)]
#[command(name = "hanoi")]
#[command(about = "Find the shortest Tower of Hanoi solution with best-first search")]
struct Args {
    /// Number of disks; asked for on stdin when omitted
    #[arg(allow_negative_numbers = true)]
    disks: Option<i64>,

    /// Print every state along the path
    #[arg(short, long)]
    steps: bool,

    /// Start from a random position this many moves away from rod 0
    #[arg(long, value_name = "MOVES")]
    scramble: Option<usize>,

    /// Seed for --scramble
    #[arg(long, requires = "scramble")]
    seed: Option<u64>,

    /// Log search progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let (disks, prompted) = match args.disks {
        Some(disks) => (disk_count(disks)?, false),
        None => (prompt_disk_count()?, true),
    };

    let outcome = match args.scramble {
        None => solve(disks)?,
        Some(moves) => {
            let start = State::stacked(disks, 0);
            let initial = match args.seed {
                Some(seed) => start.scramble(moves, &mut StdRng::seed_from_u64(seed)),
                None => start.scramble(moves, &mut rand::thread_rng()),
            };
            info!(moves, "scrambled starting position");
            solve_between(&initial, &State::stacked(disks, 2))?
        }
    };

    let Some(path) = outcome.path else {
        bail!("No solution found");
    };
    let stats = outcome.stats;
    println!("The optimal path is {} steps long", path.moves());
    println!(
        "Expanded {} states, generated {}, frontier peak {}",
        stats.expanded, stats.generated, stats.frontier_high_water
    );

    let show_steps = args.steps
        || (prompted && wants_steps(&prompt("Do you want to see steps taken in optimal path (Y/N)? ")?));
    if show_steps {
        print_steps(&path)?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn disk_count(value: i64) -> Result<u32> {
    if value <= 0 {
        bail!("Number of disks must be greater than 0");
    }
    u32::try_from(value).with_context(|| format!("{value} disks is too many"))
}

fn prompt(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim().to_string())
}

fn prompt_disk_count() -> Result<u32> {
    let answer = prompt("Enter number of disks (must be greater than 0): ")?;
    let value: i64 = answer
        .parse()
        .with_context(|| format!("'{answer}' is not a number of disks"))?;
    disk_count(value)
}

fn wants_steps(answer: &str) -> bool {
    matches!(answer.chars().next(), Some('y' | 'Y'))
}

fn print_steps(path: &Path) -> Result<()> {
    let stdout = io::stdout();
    let styled = stdout.is_tty();
    let mut out = stdout.lock();

    let mut previous: Option<&State> = None;
    for (step, state) in path.states().iter().enumerate() {
        let header = match previous {
            None => format!("Step {step}: start"),
            Some(prev) => {
                let mv = prev
                    .move_between(state)
                    .context("path contains a step that is not a single move")?;
                format!("Step {step}: {mv}")
            }
        };
        if styled {
            writeln!(out, "{}", header.bold())?;
        } else {
            writeln!(out, "{header}")?;
        }
        writeln!(out, "{state}")?;
        previous = Some(state);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_count_must_be_positive() {
        assert_eq!(disk_count(4).unwrap(), 4);
        assert!(disk_count(0).is_err());
        assert!(disk_count(-3).is_err());
        assert!(disk_count(i64::MAX).is_err());
    }

    #[test]
    fn steps_answer_checks_first_letter() {
        assert!(wants_steps("y"));
        assert!(wants_steps("Yes"));
        assert!(!wants_steps("n"));
        assert!(!wants_steps(""));
    }

    #[test]
    fn args_accept_negative_disk_counts() {
        let args = Args::try_parse_from(["hanoi", "-2"]).unwrap();
        assert_eq!(args.disks, Some(-2));
        assert!(disk_count(args.disks.unwrap()).is_err());
    }

    #[test]
    fn seed_requires_scramble() {
        assert!(Args::try_parse_from(["hanoi", "3", "--seed", "1"]).is_err());
        let args = Args::try_parse_from(["hanoi", "3", "--scramble", "5", "--seed", "1", "-s"]).unwrap();
        assert_eq!(args.scramble, Some(5));
        assert!(args.steps);
    }
}
