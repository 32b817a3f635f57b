use balanced_trees::benchmark::{self, DeletionConfig, TimingConfig};
use balanced_trees::{Error, Result};
use log::{error, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;
use std::process;

const USAGE: &str = "\
usage: balanced-trees [-v] [timings] [count] [seed] [prefix]
       balanced-trees [-v] deletion [start] [end] [delete_count] [seed] [prefix]";

fn run(args: &[String]) -> Result<Vec<PathBuf>> {
    match args.split_first() {
        None => benchmark::run_timings(&TimingConfig::default()),
        Some((command, rest)) => match command.as_str() {
            "timings" => benchmark::run_timings(&TimingConfig::from_args(rest)?),
            "deletion" => benchmark::run_deletion(&DeletionConfig::from_args(rest)?),
            _ => Err(Error::InvalidArgument(format!("unknown command: {}", command))),
        },
    }
}

fn main() {
    let (flags, args): (Vec<String>, Vec<String>) = env::args()
        .skip(1)
        .partition(|arg| arg == "-v" || arg == "--verbose");
    let level = if flags.is_empty() {
        LevelFilter::Info
    } else {
        LevelFilter::Debug
    };
    let logger = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    if let Err(err) = logger {
        eprintln!("unable to initialize logger: {}", err);
    }

    match run(&args) {
        Ok(paths) => {
            for path in paths {
                println!("{}", path.display());
            }
        },
        Err(err) => {
            error!("{}", err);
            if let Error::InvalidArgument(_) = err {
                eprintln!("{}", USAGE);
            }
            process::exit(1);
        },
    }
}
