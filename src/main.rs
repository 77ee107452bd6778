mod config;
mod errors;
mod generators;
mod notes;
mod session;
mod settings;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::errors::AppError;
use crate::generators::{CharacterClass, GenerationRequest, generate, parse_length};
use crate::session::Session;
use crate::settings::Settings;

/// Random Alphanumeric Sequence Producer, Understandably Typical In Nature.
#[derive(Parser, Debug)]
#[command(name = "rasputin", version, args_conflicts_with_subcommands = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one sequence (the default)
    Generate(GenerateArgs),
    /// Toggle classes and generate with single-key shortcuts
    Interactive,
    /// List the characters of every class
    Notes {
        /// Emit the HTML fragment instead of plain text
        #[arg(long)]
        html: bool,
    },
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Include lowercase letters
    #[arg(short = 'l', long)]
    lowercase: bool,

    /// Include uppercase letters
    #[arg(short = 'u', long)]
    uppercase: bool,

    /// Include digits
    #[arg(short = 'n', long)]
    numeric: bool,

    /// Include special characters
    #[arg(short = 's', long)]
    special: bool,

    /// Sequence length (1-512)
    #[arg(short = 'L', long, value_parser = parse_length)]
    length: Option<usize>,

    /// Also copy the sequence to the clipboard
    #[arg(long)]
    copy: bool,
}

impl GenerateArgs {
    fn selected(&self) -> Vec<CharacterClass> {
        [
            (self.lowercase, CharacterClass::Lowercase),
            (self.uppercase, CharacterClass::Uppercase),
            (self.numeric, CharacterClass::Numeric),
            (self.special, CharacterClass::Special),
        ]
        .into_iter()
        .filter_map(|(on, class)| on.then_some(class))
        .collect()
    }

    fn request(&self, config: &Config) -> Result<GenerationRequest, AppError> {
        let selected = self.selected();
        let classes = if selected.is_empty() {
            config.classes()?
        } else {
            selected
        };

        Ok(GenerationRequest::new(classes, self.length.unwrap_or(config.length)))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rasputin: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config);

    match &config.source {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => debug!("no config file, using defaults"),
    }

    match cli.command {
        Some(Command::Generate(args)) => run_generate(&args, &config),
        None => run_generate(&cli.generate, &config),
        Some(Command::Interactive) => {
            let mut session = Session::new(Settings::from_config(&config)?);
            session.run(io::stdin().lock(), &mut io::stdout().lock())?;
            info!(settings = %session.settings(), "final selection, not saved");
            Ok(())
        }
        Some(Command::Notes { html }) => {
            let rendered = if html {
                notes::render_html_all()
            } else {
                notes::render_text()
            };
            io::stdout().write_all(rendered.as_bytes())?;
            Ok(())
        }
    }
}

fn run_generate(args: &GenerateArgs, config: &Config) -> Result<(), AppError> {
    let request = args.request(config)?;
    let sequence = generate(&request)?;

    writeln!(io::stdout(), "{}", sequence)?;

    if args.copy {
        match copy_to_clipboard(sequence) {
            Ok(()) => info!("copied sequence to clipboard"),
            Err(e) => warn!(error = %e, "could not copy sequence to clipboard"),
        }
    }

    Ok(())
}

fn copy_to_clipboard(sequence: String) -> Result<(), AppError> {
    let mut ctx = copypasta_ext::try_context()
        .ok_or_else(|| AppError::Clipboard(String::from("no clipboard available")))?;

    ctx.set_contents(sequence)
        .map_err(|e| AppError::Clipboard(e.to_string()))
}

fn init_tracing(verbose: u8, config: &Config) {
    let level = match verbose {
        0 => config.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
