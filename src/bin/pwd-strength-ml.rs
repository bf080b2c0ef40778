//! Terminal front end for the password strength classifier.
//!
//! Reads passwords from stdin, one per line, and prints the predicted
//! strength with its color cue. Passwords are never taken from argv so
//! they do not end up in shell history.
//!
//! Usage: `echo 'Tr0ub4dor&3xQ!' | pwd-strength-ml --model assets/model.json`

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pwd_strength_ml::{
    Analyzer, Denylist, OverrideRules, PredictError, PredictionResult, StartupError,
    StrengthLabel, TrainedModel,
};
use secrecy::SecretString;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pwd-strength-ml")]
#[command(about = "Classify password strength with a pre-trained linear model")]
struct Args {
    /// Path to the model artifact (default: $PWD_MODEL_PATH or ./assets/model.json)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Denylist file, one token per line (default: $PWD_DENYLIST_PATH or built-in list)
    #[arg(short, long)]
    denylist: Option<PathBuf>,

    /// Apply the length / exact-match / strong-policy overrides
    #[arg(short, long)]
    rules: bool,

    /// Also print the character composition
    #[arg(short, long)]
    features: bool,

    /// Exit with failure if any password is rated below this label
    /// (very_weak, weak, strong)
    #[arg(long, value_name = "LABEL")]
    fail_below: Option<StrengthLabel>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum RunError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

fn build_analyzer(args: &Args) -> Result<Analyzer, StartupError> {
    let model = match &args.model {
        Some(path) => TrainedModel::from_path(path)?,
        None => TrainedModel::load()?,
    };
    let denylist = match &args.denylist {
        Some(path) => Denylist::from_path(path)?,
        None => Denylist::from_env()?,
    };

    let analyzer = Analyzer::new(model, denylist);
    Ok(if args.rules {
        analyzer.with_rules(OverrideRules::default())
    } else {
        analyzer
    })
}

fn render(out: &mut impl Write, result: &PredictionResult, color: bool) -> io::Result<()> {
    let cue = result.label.color();
    if color {
        write!(out, "{}{}\x1b[0m", cue.ansi(), result.label)?;
    } else {
        write!(out, "{}", result.label)?;
    }
    write!(out, " ({}, {})", cue.name(), cue.hex())?;
    for (label, p) in result.iter() {
        write!(out, " {}={:.3}", label, p)?;
    }
    writeln!(out)
}

/// Classifies every input line. Returns `true` if all passwords met
/// `--fail-below`.
fn run(
    analyzer: &Analyzer,
    args: &Args,
    input: impl BufRead,
    out: &mut impl Write,
    color: bool,
) -> Result<bool, RunError> {
    let mut all_passed = true;

    for line in input.lines() {
        let password = SecretString::new(line?.into());
        let result = analyzer.analyze(&password)?;

        render(out, &result, color)?;
        if args.features {
            let c = analyzer.extract(&password).composition();
            writeln!(
                out,
                "  length={} upper={} lower={} digits={} special={} variety={}",
                c.length,
                c.upper,
                c.lower,
                c.digits,
                c.special,
                c.variety()
            )?;
        }

        if args.fail_below.is_some_and(|min| result.label < min) {
            all_passed = false;
        }
    }

    Ok(all_passed)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let analyzer = match build_analyzer(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let color = !args.no_color && io::stdout().is_terminal();
    let mut out = io::stdout().lock();

    match run(&analyzer, &args, io::stdin().lock(), &mut out, color) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
