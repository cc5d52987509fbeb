//! convolab - apply a catalog kernel to an image from the command line

use clap::Parser;
use convolab_core::PixelBuffer;
use convolab_filter::KernelCatalog;
use convolab_io::{FileSource, ImageSource, IoError, Pattern, load_or_placeholder, write_image};
use convolab_session::{
    DEFAULT_KERNEL, DEFAULT_STRENGTH, FilterSession, SessionConfig, SessionError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image file to filter (a placeholder is used if it cannot be read)
    #[arg(short, long, conflicts_with = "pattern")]
    input: Option<PathBuf>,

    /// Built-in pattern to filter instead of a file
    #[arg(short, long, default_value = "checkerboard")]
    pattern: Pattern,

    /// Kernel name from the catalog
    #[arg(short, long, default_value = DEFAULT_KERNEL)]
    kernel: String,

    /// Strength multiplier (>= 0)
    #[arg(short, long, default_value_t = DEFAULT_STRENGTH)]
    strength: f64,

    /// Convolve rows in parallel
    #[arg(long)]
    parallel: bool,

    /// Where to write the filtered PNG
    #[arg(short, long, default_value = "filtered.png")]
    output: PathBuf,

    /// List the available kernels and exit
    #[arg(long)]
    list: bool,

    /// Print the selected kernel matrix and exit
    #[arg(long)]
    show: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("cannot write '{path}': {source}")]
    Write { path: PathBuf, source: IoError },

    #[error("filter produced no output")]
    NoOutput,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let catalog = KernelCatalog::builtin();

    if args.list {
        for info in catalog.list() {
            println!("{:<14} {}", info.name, info.display_name);
            println!("{:<14} {}", "", info.description);
        }
        return Ok(());
    }

    let config = SessionConfig {
        kernel: args.kernel.clone(),
        strength: args.strength,
        parallel: args.parallel,
    };
    let mut session = FilterSession::with_config(KernelCatalog::builtin_shared(), config)?;

    if args.show {
        let kernel = session.kernel();
        println!("{}\n\n{}", kernel.display_name(), kernel);
        return Ok(());
    }

    let source = load_source(args);
    log::info!(
        "filtering {}x{} image with {} (strength {})",
        source.width(),
        source.height(),
        session.kernel().display_name(),
        session.strength()
    );
    session.load(source)?;

    let output = session.output().ok_or(CliError::NoOutput)?;
    write_image(output, &args.output).map_err(|source| CliError::Write {
        path: args.output.clone(),
        source,
    })?;
    log::info!("wrote {}", args.output.display());
    Ok(())
}

fn load_source(args: &Args) -> PixelBuffer {
    let source: Box<dyn ImageSource> = match &args.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(args.pattern),
    };
    log::debug!("loading {}", source.describe());
    load_or_placeholder(source.as_ref())
}
