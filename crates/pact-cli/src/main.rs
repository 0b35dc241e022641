//! Contract transformer CLI.
//!
//! Provides the `pact` binary. `transform` rewrites the contracts in a unit
//! and prints the result as source or as its JSON tree; `run` transforms a
//! unit and then calls one of its functions with the interpreter.
//!
//! Units are read in their JSON interchange form (see `pact_core::ast`).

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pact_check::contracts::{ActiveEnvironment, ContractOptions, Settings};
use pact_check::interpreter::Value;
use pact_check::{transform_program, Interpreter, TransformSummary};
use pact_core::{print_program, Program};

/// Design-by-contract transformer.
#[derive(Parser)]
#[command(name = "pact", about = "Design-by-contract source transformer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Transform a unit and print the result.
    Transform {
        #[command(flatten)]
        transform: TransformArgs,

        /// Output format.
        #[arg(long, value_enum, default_value = "source")]
        emit: Emit,

        /// Write the result here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the transformation summary as JSON to stderr.
        #[arg(long)]
        summary: bool,
    },
    /// Transform a unit, then call one of its top-level functions.
    Run {
        #[command(flatten)]
        transform: TransformArgs,

        /// Name of the function to call.
        #[arg(short, long)]
        function: String,

        /// Arguments as a JSON array.
        #[arg(short, long, default_value = "[]")]
        args: String,
    },
}

/// Input and contract settings shared by every subcommand.
#[derive(Args)]
struct TransformArgs {
    /// Path to the unit's JSON tree.
    #[arg(short, long)]
    input: PathBuf,

    /// Path to a JSON file of contract options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Active environment (default: $NODE_ENV, then "development").
    #[arg(short, long)]
    env: Option<String>,

    /// Remove every contract instead of generating guards.
    #[arg(long)]
    strip: bool,

    /// Keep only the active environment's labeled blocks.
    #[arg(long)]
    env_strip: bool,

    /// Environment label to keep, overriding the active environment's.
    #[arg(long)]
    strip_unless: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Emit {
    Source,
    Json,
}

/// Exit codes: 0 = success, 1 = contract rejected, 2 = runtime error,
/// 3 = I/O or decode error.
mod exit {
    pub const REJECTED: i32 = 1;
    pub const RUNTIME: i32 = 2;
    pub const IO: i32 = 3;
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Transform {
            transform,
            emit,
            output,
            summary,
        } => run_transform(&transform, emit, output.as_deref(), summary),
        Commands::Run {
            transform,
            function,
            args,
        } => run_function(&transform, &function, &args),
    };
    if let Err(code) = result {
        process::exit(code);
    }
}

/// Execute the transform subcommand.
fn run_transform(
    args: &TransformArgs,
    emit: Emit,
    output: Option<&Path>,
    print_summary: bool,
) -> Result<(), i32> {
    let (program, summary) = load_and_transform(args)?;

    let text = match emit {
        Emit::Source => print_program(&program),
        Emit::Json => program.to_json_pretty().map_err(|e| {
            eprintln!("Error: failed to encode tree: {}", e);
            exit::IO
        })?,
    };
    match output {
        Some(path) => fs::write(path, text).map_err(|e| {
            eprintln!("Error: failed to write '{}': {}", path.display(), e);
            exit::IO
        })?,
        None => print!("{}", text),
    }

    if print_summary {
        let json = serde_json::to_string_pretty(&summary).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialize summary: {}\"}}", e)
        });
        eprintln!("{}", json);
    }
    Ok(())
}

/// Execute the run subcommand.
fn run_function(args: &TransformArgs, function: &str, call_args: &str) -> Result<(), i32> {
    let call_args: serde_json::Value = serde_json::from_str(call_args).map_err(|e| {
        eprintln!("Error: --args is not valid JSON: {}", e);
        exit::IO
    })?;
    let call_args = match call_args {
        serde_json::Value::Array(items) => items.iter().map(Value::from_json).collect(),
        _ => {
            eprintln!("Error: --args must be a JSON array");
            return Err(exit::IO);
        }
    };

    let (program, _) = load_and_transform(args)?;

    let mut interpreter = Interpreter::default();
    let result = interpreter
        .load(&program)
        .and_then(|()| interpreter.call_global(function, call_args));
    for line in interpreter.output() {
        println!("{}", line);
    }
    match result {
        Ok(value) => {
            let json = serde_json::to_string_pretty(&value.to_json()).unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize result: {}\"}}", e)
            });
            println!("{}", json);
            Ok(())
        }
        Err(e) => {
            eprintln!("Runtime error: {}", e);
            Err(exit::RUNTIME)
        }
    }
}

/// Reads the unit and options, then transforms the unit.
fn load_and_transform(args: &TransformArgs) -> Result<(Program, TransformSummary), i32> {
    let settings = resolve_settings(args)?;

    let text = fs::read_to_string(&args.input).map_err(|e| {
        eprintln!("Error: failed to read '{}': {}", args.input.display(), e);
        exit::IO
    })?;
    let mut program = Program::from_json(&text).map_err(|e| {
        eprintln!("Error: failed to decode '{}': {}", args.input.display(), e);
        exit::IO
    })?;

    match transform_program(&mut program, &settings) {
        Ok(summary) => Ok((program, summary)),
        Err(e) => {
            match e.function() {
                Some(name) => eprintln!("Contract error in function '{}': {}", name, e),
                None => eprintln!("Contract error: {}", e),
            }
            Err(exit::REJECTED)
        }
    }
}

/// Merges the options file with command-line flags.
fn resolve_settings(args: &TransformArgs) -> Result<Settings, i32> {
    let mut options = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| {
                eprintln!("Error: failed to read '{}': {}", path.display(), e);
                exit::IO
            })?;
            ContractOptions::from_json(&text).map_err(|e| {
                eprintln!("Error: invalid options in '{}': {}", path.display(), e);
                exit::IO
            })?
        }
        None => ContractOptions::default(),
    };
    options.strip |= args.strip;
    options.env_strip |= args.env_strip;
    if let Some(label) = &args.strip_unless {
        options.strip_unless = Some(label.clone());
    }

    let environment = match &args.env {
        Some(name) => ActiveEnvironment::new(name.clone()),
        None => ActiveEnvironment::from_process(),
    };
    debug!(environment = environment.name(), "resolved active environment");
    Ok(Settings::resolve(&options, environment))
}
