use clap::{Parser, Subcommand};
use negapost::config::{self, AdjustmentsConfig, AppConfig, ConfigError};
use negapost::controls::{Control, ControlState};
use negapost::imaging::RustBackend;
use negapost::session::{Session, SessionError};
use negapost::{loader, output, tune};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Starting adjustments. Each flag overrides the config file value.
#[derive(clap::Args, Clone, Default)]
struct AdjustArgs {
    /// Exposure gain (1.0 = unchanged)
    #[arg(long, allow_hyphen_values = true)]
    exposure: Option<String>,
    /// Contrast around mid-gray (0.0 = unchanged, typically -1.0 to 1.0)
    #[arg(long, allow_hyphen_values = true)]
    contrast: Option<String>,
    /// Orange-mask correction strength (color mode)
    #[arg(long, allow_hyphen_values = true)]
    mask: Option<String>,
    /// Red channel multiplier (color mode)
    #[arg(long, allow_hyphen_values = true)]
    red: Option<String>,
    /// Green channel multiplier (color mode)
    #[arg(long, allow_hyphen_values = true)]
    green: Option<String>,
    /// Blue channel multiplier (color mode)
    #[arg(long, allow_hyphen_values = true)]
    blue: Option<String>,
    /// Output mode: color or bw
    #[arg(long)]
    mode: Option<String>,
}

impl AdjustArgs {
    /// Config values first, then any flag that was given.
    fn controls(&self, base: &AdjustmentsConfig) -> ControlState {
        let mut controls = ControlState::from_adjustments(base);
        let flags = [
            (Control::Exposure, &self.exposure),
            (Control::Contrast, &self.contrast),
            (Control::OrangeMask, &self.mask),
            (Control::ChannelR, &self.red),
            (Control::ChannelG, &self.green),
            (Control::ChannelB, &self.blue),
            (Control::Mode, &self.mode),
        ];
        for (control, value) in flags {
            if let Some(raw) = value {
                controls.set(control, raw.as_str());
            }
        }
        controls
    }
}

#[derive(Parser)]
#[command(name = "negapost")]
#[command(about = "Invert and color-correct scanned film negatives")]
#[command(long_about = "\
Invert and color-correct scanned film negatives

Every render starts from the original scan:

  invert → orange mask → channel multipliers → exposure → contrast → mode → clamp

Orange-mask removal and channel multipliers apply in color mode only.
Black-and-white mode averages the three channels after contrast.

Supported input:  jpg, jpeg, png, tif, tiff, webp (50 MiB, 10000x10000 max)
Supported output: picked from the extension, default negapost-memory.png

Run 'negapost gen-config' to generate a documented negapost.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./negapost.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a negative and export the positive
    Convert {
        /// Negative to convert
        input: PathBuf,
        /// Output file (format from extension)
        #[arg(short = 'o', long = "output")]
        out: Option<PathBuf>,
        #[command(flatten)]
        adjust: AdjustArgs,
    },
    /// Validate a negative without converting it
    Check {
        /// Negative to validate
        input: PathBuf,
    },
    /// Adjust a negative interactively, one command per line on stdin
    Tune {
        /// Negative to adjust
        input: PathBuf,
        /// Default export path
        #[arg(short = 'o', long = "output")]
        out: Option<PathBuf>,
        #[command(flatten)]
        adjust: AdjustArgs,
    },
    /// Print a stock negapost.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let backend = RustBackend::new();

    match cli.command {
        Command::Convert { input, out, adjust } => {
            let app_config = load_app_config(cli.config.as_deref())?;
            let controls = adjust.controls(&app_config.adjustments);
            let Some(session) = open_session(&input, &app_config, controls, &backend)? else {
                return Ok(ExitCode::FAILURE);
            };
            output::print_params(session.params());
            let out = out.unwrap_or_else(|| PathBuf::from(&app_config.output.filename));
            session.export(&out, &backend)?;
            println!("{}", output::format_export(&out, session.rendered()));
        }
        Command::Check { input } => {
            let app_config = load_app_config(cli.config.as_deref())?;
            match loader::load_negative(&input, &app_config.limits, &backend) {
                Ok(loaded) => {
                    output::print_source_info(&loaded.info, &app_config.limits);
                    println!("Ready to convert");
                }
                Err(e) => {
                    eprintln!("{}", output::format_load_error(&e));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Tune { input, out, adjust } => {
            let app_config = load_app_config(cli.config.as_deref())?;
            let controls = adjust.controls(&app_config.adjustments);
            let Some(mut session) = open_session(&input, &app_config, controls, &backend)? else {
                return Ok(ExitCode::FAILURE);
            };
            output::print_source_info(session.source(), &app_config.limits);
            for line in output::format_tune_help() {
                println!("{}", line);
            }
            let out = out.unwrap_or_else(|| PathBuf::from(&app_config.output.filename));
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            tune::run_tune(&mut session, stdin.lock(), &mut stdout.lock(), &backend, &out)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// `--config` when given, otherwise `./negapost.toml` if it exists.
fn load_app_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Open a session, turning load failures into a user notice.
///
/// `Ok(None)` means the notice was already printed.
fn open_session(
    input: &Path,
    app_config: &AppConfig,
    controls: ControlState,
    backend: &RustBackend,
) -> Result<Option<Session>, SessionError> {
    match Session::open(input, &app_config.limits, controls, backend) {
        Ok(session) => Ok(Some(session)),
        Err(SessionError::Load(e)) => {
            eprintln!("{}", output::format_load_error(&e));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Log to stderr. `-v` flags win over `RUST_LOG`; with neither, only errors show.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        1 => EnvFilter::new("negapost=info"),
        2 => EnvFilter::new("negapost=debug"),
        _ => EnvFilter::new("negapost=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
