use std::{
    error::Error,
    fmt::Write as _,
    fs,
    io::{self, Read},
    process,
};

use clap::{command, Parser, Subcommand, ValueHint};
use log::{debug, error, info, LevelFilter};

use areena_rtmp::protocol::{auth, descriptor, Descriptor, StreamLocation};

/// Profile to display when not built in release mode.
#[cfg(debug_assertions)]
const BUILD_PROFILE: &str = "debug";
/// Profile to display when not built release mode.
#[cfg(not(debug_assertions))]
const BUILD_PROFILE: &str = "release";

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Command line arguments as parsed by `clap`.
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Suppresses all output except warnings and errors.
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging
    ///
    /// Specify twice for trace logging.
    #[arg(short, long, action = clap::ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,
}

/// Offline helpers for the Areena session protocol.
#[derive(Clone, Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Print the answer to an authentication challenge
    Respond {
        /// `randomAuth` value sent by the server
        #[arg(allow_negative_numbers = true)]
        challenge: i64,
    },

    /// Print the descriptor request for a clip
    Request {
        /// Clip ID as found on the Areena web page
        clip_id: String,

        /// Request a live stream instead of a recording
        #[arg(long, default_value_t = false)]
        live: bool,
    },

    /// Resolve a descriptor document into stream parameters
    Resolve {
        /// Descriptor document; reads standard input when omitted
        #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
        file: Option<String>,

        /// Server the player is connected to, to detect redirects
        #[arg(long, value_hint = ValueHint::Hostname)]
        host: Option<String>,
    },
}

/// Initializes the logger facade.
///
/// The logging level is determined as follows, in order of precedence from
/// highest to lowest:
/// 1. Command line arguments
/// 2. `RUST_LOG` environment variable
/// 3. Hard coded default
///
/// # Panics
///
/// Panics when a logger facade is already initialized.
fn init_logger(config: &Args) {
    let mut logger = env_logger::Builder::from_env(
        // Note: if you change the default logging level here, then you should
        // probably also change the verbosity levels below.
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    if config.quiet || config.verbose > 0 {
        let level = match config.verbose {
            0 => {
                // Quiet and verbose are mutually exclusive, and `verbose` is 0
                // by default. So this arm means: quiet mode.
                LevelFilter::Warn
            }
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        // Filter log messages of external crates.
        logger.filter_module(module_path!(), level);
        logger.filter_module("areena_rtmp", level);
    }

    logger.init();
}

/// Reads the descriptor document from `file`, or standard input.
fn read_document(file: Option<&str>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut document = String::new();
            io::stdin().read_to_string(&mut document)?;
            Ok(document)
        }
    }
}

/// Formats bytes as space separated hex pairs.
fn hex(bytes: &[u8]) -> Result<String, std::fmt::Error> {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write!(out, "{byte:02x}")?;
    }
    Ok(out)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command {
        Command::Respond { challenge } => {
            println!("{}", auth::response(challenge));
        }

        Command::Request { clip_id, live } => {
            let message = descriptor::request_message(&clip_id, live);
            let body = message.encode()?;
            println!("path: {}", descriptor::request_path(&clip_id, live));
            println!("body: {}", hex(&body)?);
        }

        Command::Resolve { file, host } => {
            let document = read_document(file.as_deref())?;
            let descriptor = Descriptor::from_document(&document)?;
            let location = StreamLocation::parse(&descriptor.url)?;

            println!("url: {location}");
            println!("server: {}", location.server);
            println!("app: {}", location.app);
            println!("playpath: {}", location.playpath);
            match descriptor.tv_pay_only {
                Some(tv_pay_only) => println!("tvpayOnly: {tv_pay_only}"),
                None => println!("tvpayOnly: unknown"),
            }
            if let Some(host) = host {
                println!("redirected: {}", location.server != host);
            }
        }
    }

    Ok(())
}

/// Main entry point of the application.
fn main() {
    // `clap` handles our command line arguments and help text.
    let args = Args::parse();
    init_logger(&args);

    // Dump command line arguments before we do anything more.
    // This aids in debugging of whatever comes next.
    debug!("Command {:#?}", args);

    let cmd = command!();
    let name = cmd.get_name().to_string();
    let version = cmd.get_version().unwrap_or("UNKNOWN").to_string();

    info!("starting {name}/{version}; {BUILD_PROFILE}");

    if let Err(e) = run(args) {
        error!("{e}");
        process::exit(1);
    }
}
