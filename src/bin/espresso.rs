//! Espresso logic minimizer - command line interface
//!
//! Reads a PLA description, runs the selected operation and prints the
//! resulting PLA.

use clap::{Parser, ValueEnum};
use espresso_native::espresso::Espresso;
use espresso_native::{
    CheckOutcome, Cover, CoverType, EspressoConfig, Minimizable, PLAReader, PLAWriter, Strategy,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

const VERSION: &str = concat!("espresso-native ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, ValueEnum)]
enum Command {
    /// Run the heuristic minimization algorithm (default)
    Espresso,
    /// Exact minimization (guaranteed minimum cube count)
    Exact,
    /// One EXPAND + IRREDUNDANT pass
    Simplify,
    /// Verify that the ON, don't-care and OFF sets partition the space
    Check,
    /// Echo the PLA without modification
    Echo,
    /// Print statistics about the PLA
    Stats,
}

#[derive(Debug, Clone, ValueEnum)]
enum StrategyArg {
    /// Full iteration with LAST_GASP
    Default,
    /// Single EXPAND/IRREDUNDANT pass
    Fast,
    /// Iterate SUPER_GASP until no improvement
    Strong,
}

impl From<StrategyArg> for Strategy {
    fn from(val: StrategyArg) -> Self {
        match val {
            StrategyArg::Default => Strategy::Default,
            StrategyArg::Fast => Strategy::Fast,
            StrategyArg::Strong => Strategy::Strong,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputType {
    /// ON-set only
    F,
    /// ON-set and don't-care set
    Fd,
    /// ON-set and OFF-set
    Fr,
    /// ON-set, don't-care set, and OFF-set
    Fdr,
}

impl From<OutputType> for CoverType {
    fn from(val: OutputType) -> Self {
        match val {
            OutputType::F => CoverType::F,
            OutputType::Fd => CoverType::FD,
            OutputType::Fr => CoverType::FR,
            OutputType::Fdr => CoverType::FDR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "espresso")]
#[command(about = "Espresso heuristic logic minimizer", long_about = None)]
#[command(version = VERSION)]
struct Args {
    /// Input PLA file (required)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Subcommand to execute
    #[arg(short = 'D', long = "do", value_enum, default_value = "espresso")]
    command: Command,

    /// Minimization strategy
    #[arg(short = 'e', long = "strategy", value_enum, default_value = "default")]
    strategy: StrategyArg,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value = "f")]
    output_format: OutputType,

    /// Wall-clock budget in seconds; the best cover so far is printed on
    /// expiry
    #[arg(short = 't', long = "timeout")]
    timeout: Option<u64>,

    /// Provide execution summary
    #[arg(short = 's', long = "summary")]
    summary: bool,

    /// Suppress printing of the solution
    #[arg(short = 'x', long = "no-output")]
    no_output: bool,

    /// Output file (writes to stdout if not specified)
    #[arg(short = 'O', long = "out-file")]
    output_file: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = EspressoConfig {
        strategy: args.strategy.clone().into(),
        deadline: args.timeout.map(Duration::from_secs),
        ..Default::default()
    };

    if args.summary {
        eprintln!("{}", VERSION);
        eprintln!();
    }

    let cover = match Cover::from_pla_file(&args.input) {
        Ok(cover) => cover,
        Err(e) => {
            eprintln!("Error reading PLA file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    if args.summary {
        eprintln!("Input PLA: {:?}", cover);
        eprintln!();
    }

    let result = match args.command {
        Command::Espresso => run_minimize(&cover, &config, false),
        Command::Exact => run_minimize(&cover, &config, true),
        Command::Simplify => {
            // A fast-strategy run is exactly one EXPAND + IRREDUNDANT.
            let config = EspressoConfig {
                strategy: Strategy::Fast,
                ..config
            };
            run_minimize(&cover, &config, false)
        }
        Command::Check => {
            run_check(&cover, &config);
            return;
        }
        Command::Echo => cover.clone(),
        Command::Stats => {
            print_stats(&cover);
            return;
        }
    };

    if args.summary {
        eprintln!(
            "Result: {} cubes over {} inputs, {} outputs",
            result.num_cubes(),
            result.num_inputs(),
            result.num_outputs()
        );
    }

    if args.no_output {
        return;
    }
    let pla_type: CoverType = args.output_format.into();
    let outcome = match &args.output_file {
        Some(path) => result.to_pla_file(path, pla_type).map_err(Into::into),
        None => result
            .to_pla_string(pla_type)
            .map(|text| print!("{}", text))
            .map_err(std::io::Error::from),
    };
    if let Err(e) = outcome {
        eprintln!("Error writing PLA: {}", e);
        process::exit(1);
    }
}

fn run_minimize(cover: &Cover, config: &EspressoConfig, exact: bool) -> Cover {
    let result = if exact {
        cover.minimize_exact_with_config(config)
    } else {
        cover.minimize_with_config(config)
    };
    match result {
        Ok(minimized) => minimized,
        Err(e) => {
            eprintln!("Minimization failed: {}", e);
            process::exit(1);
        }
    }
}

fn run_check(cover: &Cover, config: &EspressoConfig) {
    let (f, d, r) = match cover.engine_covers() {
        Ok(covers) => covers,
        Err(e) => {
            eprintln!("Check failed: {}", e);
            process::exit(1);
        }
    };
    let esp = match Espresso::new(cover.num_inputs(), cover.num_outputs(), config) {
        Ok(esp) => esp,
        Err(e) => {
            eprintln!("Check failed: {}", e);
            process::exit(1);
        }
    };
    match esp.check(&f, &d, &r) {
        Ok(CheckOutcome::Ok) => println!("ON, DC and OFF sets partition the space"),
        Ok(CheckOutcome::CoverageGap(cube)) => {
            println!("Coverage gap: {} lies in no set", cube);
            process::exit(1);
        }
        Ok(CheckOutcome::OffsetConflict(cube)) => {
            println!("Conflict: {} lies in both ON and OFF sets", cube);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Check failed: {}", e);
            process::exit(1);
        }
    }
}

fn print_stats(cover: &Cover) {
    println!("inputs:  {}", cover.num_inputs());
    println!("outputs: {}", cover.num_outputs());
    println!("cubes:   {}", cover.num_cubes());
    for (i, label) in cover.input_labels().iter().enumerate() {
        println!("  input {}: {}", i, label);
    }
    for (i, label) in cover.output_labels().iter().enumerate() {
        println!("  output {}: {}", i, label);
    }
}
