use clap::{Parser, Subcommand};
use reframe::config::{self, AppInfo, RunOptions};
use reframe::imaging::RustBackend;
use reframe::output;
use reframe::pipeline::{self, CancelToken, RunRequest};
use reframe::plan::Profile;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Release builds report the package version; anything else reports the
/// commit it was built from.
fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        // Leaked once at startup — trivial, called exactly once
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "reframe")]
#[command(about = "Batch photo resizer producing web and reel derivative sets")]
#[command(long_about = "\
Batch photo resizer producing web and reel derivative sets

Point it at a folder of photographs and it fills one or more output folders
with resized, re-encoded derivatives:

  reframe sizes            four fixed sizes per photo, WebP quality 90
                           (2048x1365, 1024x683, 768x512, 600x400);
                           --nested writes each photo's set into a numbered
                           subfolder instead of flat label-prefixed names
  reframe web              one full-resolution WebP per photo into a
                           '<name>-website' folder, plus a 1080x1920 JPEG
                           reel thumbnail per photo into '<name>-reel'

Sources are read from --source (default: images). Output folders are
created under --dest from the slugified run name; the name is prompted for
when --name is omitted. Portrait photos keep their long axis: a labeled
2048x1365 derivative of a portrait source is cropped to 1365x2048.

A failed derivative never aborts the run — every source and outcome is
listed in the final summary.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory of photographs
    #[arg(long, default_value = "images", global = true)]
    source: PathBuf,

    /// Base directory under which output folders are created
    #[arg(long, default_value = ".", global = true)]
    dest: PathBuf,

    /// Output folder name (prompted for interactively when omitted)
    #[arg(long, global = true)]
    name: Option<String>,

    /// Maximum parallel workers (defaults to CPU cores; clamps down only)
    #[arg(long, global = true)]
    jobs: Option<usize>,

    /// Stop dispatching new work after this many seconds
    #[arg(long, value_name = "SECS", global = true)]
    deadline: Option<u64>,

    /// Print the run summary as JSON instead of the table
    #[arg(long, global = true)]
    json: bool,

    /// Suppress the banner and per-file progress
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Produce the four fixed derivative sizes per source
    Sizes {
        /// Write each source's files into a numbered subfolder
        #[arg(long)]
        nested: bool,
    },
    /// Produce full-resolution website re-encodes plus reel thumbnails
    Web,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let info = AppInfo::from_build();
    let show_progress = !cli.quiet && !cli.json;
    if show_progress {
        output::print_banner(&info);
    }

    let folder_name = match cli.name {
        Some(name) => name,
        None => prompt_folder_name()?,
    };

    let options = RunOptions {
        jobs: cli.jobs,
        deadline: cli.deadline.map(Duration::from_secs),
    };
    init_thread_pool(&options);
    let cancel = match options.deadline {
        Some(timeout) => CancelToken::with_deadline(timeout),
        None => CancelToken::new(),
    };

    let profile = match cli.command {
        Command::Sizes { nested } => Profile::MultiSize { nested },
        Command::Web => Profile::FullPlusReel,
    };
    let request = RunRequest {
        source_dir: cli.source,
        dest_base: cli.dest,
        folder_name,
        profile,
    };

    let (progress, printer) = if show_progress {
        let (tx, rx) = std::sync::mpsc::channel();
        let printer = std::thread::spawn(move || {
            for event in rx {
                output::print_run_event(&event);
            }
        });
        (Some(tx), Some(printer))
    } else {
        (None, None)
    };

    let backend = RustBackend::new();
    let summary = pipeline::run(&backend, &request, &cancel, progress)?;

    if let Some(printer) = printer {
        printer.join().expect("printer thread panicked");
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        output::print_summary(&summary);
    }

    Ok(())
}

/// Initialize the rayon thread pool from run options.
///
/// Caps at the number of available CPU cores — user can constrain down,
/// not up.
fn init_thread_pool(options: &RunOptions) {
    let threads = config::effective_threads(options);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Ask for the output folder name on stdin, retrying on empty input.
fn prompt_folder_name() -> std::io::Result<String> {
    let stdin = std::io::stdin();
    loop {
        print!("Enter the name of the output folder: ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no folder name given",
            ));
        }
        let name = line.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }
}
