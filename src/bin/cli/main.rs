//! CLI tool for patching fused LÖVE executables.

mod exit_codes;
mod output;

use clap::{ArgAction, CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::{Path, PathBuf};

use exit_codes::ExitCode;
use lovepatch::edit::DEFAULT_TARGET;
use lovepatch::patch::DEFAULT_EXTRACT_DIR;
use lovepatch::write::{DEFAULT_LEVEL, WriteOptions};
use lovepatch::{PatchOptions, Patcher};
use output::{HumanFormatter, JsonFormatter, OutputFormatter};

/// Inject a Lua debugger bootstrap into a fused LÖVE game
#[derive(Parser)]
#[command(name = "lovepatch")]
#[command(author, version, about = "Inject a Lua debugger bootstrap into a fused LÖVE game", long_about = None)]
pub struct Cli {
    /// Fused executable or .love archive to patch
    #[arg(required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Directory (next to the input) to unpack the patched game into
    #[arg(long, env = "LOVEPATCH_EXTRACT_DIR", default_value = DEFAULT_EXTRACT_DIR)]
    extract_dir: String,

    /// Entry name to inject into, matched as a whole path component
    #[arg(long, default_value = DEFAULT_TARGET,
          value_parser = clap::builder::NonEmptyStringValueParser::new())]
    target: String,

    /// Deflate level for the rebuilt archive (0 = store)
    #[arg(long, short = 'l', default_value_t = DEFAULT_LEVEL,
          value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,

    /// Do not unpack the game tree
    #[arg(long)]
    no_extract: bool,

    /// Do not write .vscode/launch.json
    #[arg(long)]
    no_launch_config: bool,

    /// Do not save the executable stub on its own
    #[arg(long)]
    no_launcher: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Only print errors
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,

    /// More log output (repeat for more)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl Cli {
    fn patch_options(&self) -> lovepatch::Result<PatchOptions> {
        Ok(PatchOptions::new()
            .target(&self.target)
            .extract_dir_name(&self.extract_dir)
            .write_options(WriteOptions::new().level(self.level)?)
            .extract(!self.no_extract)
            .launch_config(!self.no_launch_config)
            .launcher(!self.no_launcher))
    }

    fn formatter(&self) -> Box<dyn OutputFormatter> {
        match self.format {
            OutputFormat::Human => Box::new(HumanFormatter),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    // RUST_LOG, when set, overrides the flags.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn patch(cli: &Cli, input: &Path) -> ExitCode {
    let formatter = cli.formatter();

    let result = cli
        .patch_options()
        .and_then(|options| Patcher::new(options).patch_path(input));

    match result {
        Ok(report) => {
            if !cli.quiet || cli.format == OutputFormat::Json {
                print!("{}", formatter.format_report(&report));
                if cli.format == OutputFormat::Json {
                    println!();
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e));
            exit_codes::error_to_exit_code(&e)
        }
    }
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures.
            let code = if e.use_stderr() {
                exit_codes::BAD_ARGS
            } else {
                exit_codes::SUCCESS
            };
            e.print().ok();
            std::process::exit(code);
        }
    };

    init_logging(cli.quiet, cli.verbose);

    let exit_code = match (&cli.completions, &cli.input) {
        (Some(shell), _) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
        (None, Some(input)) => patch(&cli, input),
        (None, None) => ExitCode::BadArgs,
    };

    std::process::exit(exit_code.code());
}
