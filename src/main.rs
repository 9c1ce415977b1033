//! The command-line interface for the `qshade` shader tools.

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use qshade::{ConstValue, DataTable, Diagnostic, LiteralType, ShaderProcessor};
use std::{fs, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// main command
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// check correctness of the source file
    Check(CommonArgs),
    /// output the token stream to stdout
    Tokens(CommonArgs),
    /// parse the source and convert it back to code from the syntax tree
    Parse(CommonArgs),
    /// output the syntax tree to stdout
    Dump(DumpArgs),
    /// substitute placeholders and consts, register uniforms and output the result
    Process(ProcessArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// glsl source file
    input: PathBuf,
}

#[derive(Args)]
struct DumpArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// output json instead of the debug representation
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ProcessArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// a value definition, e.g. `-D radius=2.5` or `-D tint=1,0,0.5`
    #[arg(short = 'D', long = "define", value_parser = parse_definition)]
    defines: Vec<(String, ConstValue)>,
    /// a json file with an object of values, e.g. `{ "radius": 2.5, "tint": [1, 0, 0.5] }`
    #[arg(long)]
    data: Option<PathBuf>,
    /// the literal type of a `$name$` placeholder, e.g. `--const count=int`
    #[arg(long = "const", value_parser = parse_placeholder)]
    consts: Vec<(String, LiteralType)>,
    /// only substitute placeholders
    #[arg(long)]
    no_processing: bool,
    /// print the registered uniforms to stderr
    #[arg(long)]
    uniforms: bool,
    /// on failure, log the error and output the unprocessed source
    #[arg(long)]
    lenient: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not read `{}`: {1}", .0.display())]
    Read(PathBuf, std::io::Error),
    #[error("invalid argument `{0}`, expected `name=value`")]
    Definition(String),
    #[error("invalid data file `{}`: {1}", .0.display())]
    Data(PathBuf, serde_json::Error),
    #[error("{0}")]
    Literal(#[from] qshade::LiteralError),
    #[error("{0}")]
    Shader(#[from] qshade::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

fn split_definition(arg: &str) -> Result<(&str, &str), CliError> {
    arg.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| CliError::Definition(arg.to_string()))
}

fn parse_definition(arg: &str) -> Result<(String, ConstValue), CliError> {
    let (name, value) = split_definition(arg)?;
    Ok((name.to_string(), value.parse()?))
}

fn parse_placeholder(arg: &str) -> Result<(String, LiteralType), CliError> {
    let (name, ty) = split_definition(arg)?;
    Ok((name.to_string(), ty.parse()?))
}

fn read(path: &PathBuf) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| CliError::Read(path.clone(), e))
}

fn compile(args: &CommonArgs, source: &str) -> Result<Vec<glsl_parse::syntax::Node>, CliError> {
    glsl_parse::compile(source).map_err(|e| {
        let diagnostic = Diagnostic::from(e)
            .with_source(source.to_string())
            .with_file(&args.input);
        CliError::Shader(diagnostic.into())
    })
}

fn data_table(args: &ProcessArgs) -> Result<DataTable, CliError> {
    let mut data = match &args.data {
        Some(path) => {
            let text = read(path)?;
            serde_json::from_str::<DataTable>(&text).map_err(|e| CliError::Data(path.clone(), e))?
        }
        None => DataTable::new(),
    };
    data.extend(args.defines.iter().cloned());
    Ok(data)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Check(args) => {
            let source = read(&args.input)?;
            compile(args, &source)?;
            println!("{} -- OK", args.input.display());
        }
        Command::Tokens(args) => {
            let source = read(&args.input)?;
            let lexed = glsl_parse::tokenize(&source);
            for token in &lexed.tokens {
                let range = token.span.range();
                println!("{:>5}..{:<5} {token}", range.start, range.end);
            }
            if !lexed.is_complete() {
                compile(args, &source)?;
            }
        }
        Command::Parse(args) => {
            let source = read(&args.input)?;
            let nodes = compile(args, &source)?;
            println!("{}", glsl_parse::reconstruct(&nodes));
        }
        Command::Dump(args) => {
            let source = read(&args.common.input)?;
            let nodes = compile(&args.common, &source)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else {
                println!("{nodes:#?}");
            }
        }
        Command::Process(args) => {
            let source = read(&args.common.input)?;
            let mut processor = ShaderProcessor {
                enable_processing: !args.no_processing,
                data: data_table(args)?,
                consts: args.consts.iter().cloned().collect(),
                ..Default::default()
            };

            let output = if args.lenient {
                processor.process(&source)
            } else {
                processor.try_process(&source).map_err(|e| {
                    qshade::Error::from(Diagnostic::from(e).with_file(&args.common.input))
                })?
            };
            println!("{output}");

            if args.uniforms {
                for (key, binding) in processor.uniforms.iter().sorted_by_key(|(key, _)| *key) {
                    eprintln!("{key}: {} {}", binding.ty, binding.source_name);
                }
            }
        }
    };
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
