use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::LevelFilter;
use windcraft::{CompileOptions, Result, WindcraftError, compile, init_logger};

#[derive(Parser, Debug)]
#[command(name = "windcraft", version, about = "Utility-first CSS compiler")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace, off); overrides WINDCRAFT_LOG
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate CSS for the candidates found in the given files
    Build {
        /// Entry stylesheet
        #[arg(short, long)]
        input: PathBuf,

        /// Files to read candidates from
        #[arg(short, long = "candidates", num_args = 1..)]
        candidates: Vec<PathBuf>,

        /// Strip insignificant whitespace
        #[arg(short, long)]
        minify: bool,

        /// Write CSS here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logger(cli.log.as_deref(), cli.log_level)?;

    match cli.command {
        Command::Build {
            input,
            candidates,
            minify,
            output,
        } => build(&input, &candidates, minify, output.as_deref()),
    }
}

fn build(input: &Path, sources: &[PathBuf], minify: bool, output: Option<&Path>) -> Result<()> {
    if sources.is_empty() {
        return Err(WindcraftError::NoCandidates);
    }

    let css = fs::read_to_string(input)?;
    let base = input
        .parent()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default();

    let compiler = futures::executor::block_on(compile(
        &css,
        &base,
        CompileOptions::new().minify(minify),
    ))?;

    let mut text = String::new();
    for source in sources {
        text.push_str(&fs::read_to_string(source)?);
        text.push('\n');
    }
    let generated = compiler.build(windcraft::candidates(&text));
    log::info!("generated {} bytes of CSS", generated.len());

    for glob in compiler.globs() {
        log::debug!("source glob {} in {}", glob.pattern, glob.origin);
    }

    match output {
        Some(path) => fs::write(path, generated)?,
        None => print!("{generated}"),
    }
    Ok(())
}
