//! Magic square search CLI.
//!
//! Modes:
//! - finite (default): run at most `--iterations` generations
//! - `--infinite`: run until a solution is found
//! - `--interactive`: ask for the mode and budget on stdin

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;

use magic_square_ga::evolution::{
    EvolutionConfig, EvolutionRunner, GenerationObserver, GenerationReport,
};
use magic_square_ga::{MagicSquare, SIZE};

/// Accepted range for the interactive iteration prompt.
const INTERACTIVE_MIN_ITERATIONS: usize = 1_000;
const INTERACTIVE_MAX_ITERATIONS: usize = 100_000;

#[derive(Parser, Debug)]
#[command(name = "magic-square")]
#[command(version)]
#[command(about = "Search for a magic square with a genetic algorithm")]
struct Cli {
    /// Maximum number of generations
    #[arg(short = 'n', long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    iterations: u64,

    /// Run until a solution is found
    #[arg(long, alias = "inf")]
    infinite: bool,

    /// Ask for the run mode and iteration count
    #[arg(short, long)]
    interactive: bool,

    /// Population size (must be even)
    #[arg(long)]
    population: Option<usize>,

    /// Use the 50 000-square population preset
    #[arg(long)]
    large: bool,

    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Only print the final result
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    Finite(usize),
    Infinite,
}

/// Reads one trimmed line, failing on end of input.
fn read_answer<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("unexpected end of input");
    }
    Ok(line.trim().to_string())
}

/// Asks for the run mode, then for the iteration count in finite mode.
///
/// Both questions repeat until a valid answer is given.
fn prompt_run_mode<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<RunMode> {
    let infinite = loop {
        writeln!(output, "Run in infinite loop? [y/n]")?;
        output.flush()?;
        match read_answer(input)?.as_str() {
            "y" => break true,
            "n" => break false,
            _ => continue,
        }
    };
    if infinite {
        return Ok(RunMode::Infinite);
    }

    loop {
        writeln!(output, "Amount of iterations? [1 000 - 100 000]")?;
        output.flush()?;
        if let Ok(n) = read_answer(input)?.parse::<usize>() {
            if (INTERACTIVE_MIN_ITERATIONS..=INTERACTIVE_MAX_ITERATIONS).contains(&n) {
                return Ok(RunMode::Finite(n));
            }
        }
    }
}

fn build_config(cli: &Cli, mode: RunMode) -> EvolutionConfig {
    let mut config = if cli.large {
        EvolutionConfig::large()
    } else {
        EvolutionConfig::standard()
    };
    if let Some(n) = cli.population {
        config = config.with_population_size(n);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    match mode {
        RunMode::Finite(n) => config.with_max_iterations(n),
        RunMode::Infinite => config.unbounded(),
    }
}

/// Prints each generation's best square and its fitness preview.
struct ConsolePrinter<W: Write> {
    out: W,
    quiet: bool,
}

impl<W: Write> ConsolePrinter<W> {
    fn write_report(&mut self, report: &GenerationReport<'_, SIZE>) -> io::Result<()> {
        writeln!(self.out, "Best solution:")?;
        writeln!(self.out, "{}", report.best)?;
        for fitness in report.preview {
            writeln!(self.out, "{fitness}")?;
        }
        Ok(())
    }

    fn write_solution(&mut self, square: &MagicSquare) -> io::Result<()> {
        writeln!(self.out, "Right solution:")?;
        writeln!(self.out, "{square}")?;
        self.out.flush()
    }
}

impl<W: Write> GenerationObserver<SIZE> for ConsolePrinter<W> {
    fn on_generation(&mut self, report: &GenerationReport<'_, SIZE>) {
        if self.quiet {
            return;
        }
        if let Err(e) = self.write_report(report) {
            log::warn!("failed to print generation {}: {e}", report.generation);
        }
    }

    fn on_solved(&mut self, generation: usize, square: &MagicSquare) {
        log::debug!("solution found in generation {generation}");
        if let Err(e) = self.write_solution(square) {
            log::warn!("failed to print solution: {e}");
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mode = if cli.interactive {
        prompt_run_mode(&mut io::stdin().lock(), &mut io::stdout())?
    } else if cli.infinite {
        RunMode::Infinite
    } else {
        let n = usize::try_from(cli.iterations).context("iteration count too large")?;
        RunMode::Finite(n)
    };

    let config = build_config(&cli, mode);
    config.validate().context("invalid configuration")?;

    let mut printer = ConsolePrinter {
        out: io::stdout().lock(),
        quiet: cli.quiet,
    };
    let result = EvolutionRunner::run_with_observer::<SIZE, _>(&config, &mut printer)?;

    if !result.is_solved() {
        println!(
            "No solution after {} generations. Best fitness {}:",
            result.generations, result.best_fitness
        );
        println!("{}", result.best);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("magic-square").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.iterations, 10_000);
        assert!(!cli.infinite);
        assert!(!cli.interactive);

        let config = build_config(&cli, RunMode::Finite(10_000));
        assert_eq!(config, EvolutionConfig::standard());
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["-n", "250", "--population", "400", "--seed", "9", "-q"]);
        assert_eq!(cli.iterations, 250);
        assert!(cli.quiet);

        let config = build_config(&cli, RunMode::Finite(250));
        assert_eq!(config.max_iterations, Some(250));
        assert_eq!(config.population_size, 400);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_infinite_alias() {
        let cli = parse(&["--inf", "--large"]);
        assert!(cli.infinite);
        let config = build_config(&cli, RunMode::Infinite);
        assert_eq!(config.max_iterations, None);
        assert_eq!(config.population_size, 50_000);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(Cli::try_parse_from(["magic-square", "-n", "0"]).is_err());
    }

    #[test]
    fn test_prompt_infinite() {
        let mut input = Cursor::new("maybe\ny\n");
        let mut output = Vec::new();
        let mode = prompt_run_mode(&mut input, &mut output).unwrap();
        assert_eq!(mode, RunMode::Infinite);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Run in infinite loop?").count(), 2);
    }

    #[test]
    fn test_prompt_finite_retries_until_in_range() {
        let mut input = Cursor::new("n\n500\nabc\n200000\n2500\n");
        let mut output = Vec::new();
        let mode = prompt_run_mode(&mut input, &mut output).unwrap();
        assert_eq!(mode, RunMode::Finite(2500));
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Amount of iterations?").count(), 4);
    }

    #[test]
    fn test_prompt_eof_is_error() {
        let mut input = Cursor::new("n\n");
        let mut output = Vec::new();
        assert!(prompt_run_mode(&mut input, &mut output).is_err());
    }

    #[test]
    fn test_printer_output() {
        let square = MagicSquare::from_rows([
            [17, 24, 1, 8, 15],
            [23, 5, 7, 14, 16],
            [4, 6, 13, 20, 22],
            [10, 12, 19, 21, 3],
            [11, 18, 25, 2, 9],
        ])
        .unwrap();
        let mut printer = ConsolePrinter {
            out: Vec::new(),
            quiet: false,
        };
        printer.on_generation(&GenerationReport {
            generation: 1,
            best: &square,
            best_fitness: 0,
            preview: &[0, 4, 6],
            mutation_probability: 0.1,
            unchanged_count: 0,
        });
        printer.on_solved(2, &square);

        let text = String::from_utf8(printer.out).unwrap();
        assert!(text.starts_with("Best solution:\n17 24  1  8 15\n"));
        assert!(text.contains("\n0\n4\n6\n"));
        assert!(text.contains("Right solution:\n17 24  1  8 15\n"));
    }

    #[test]
    fn test_quiet_printer_skips_generations() {
        let square = MagicSquare::from_rows([
            [17, 24, 1, 8, 15],
            [23, 5, 7, 14, 16],
            [4, 6, 13, 20, 22],
            [10, 12, 19, 21, 3],
            [11, 18, 25, 2, 9],
        ])
        .unwrap();
        let mut printer = ConsolePrinter {
            out: Vec::new(),
            quiet: true,
        };
        printer.on_generation(&GenerationReport {
            generation: 1,
            best: &square,
            best_fitness: 0,
            preview: &[0],
            mutation_probability: 0.1,
            unchanged_count: 0,
        });
        assert!(printer.out.is_empty());
    }
}
