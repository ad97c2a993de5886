#![allow(dead_code)]

use std::error;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};

use clap::Parser;
use log::error;
use scheduler::Scheduler;

#[derive(Debug)]
enum Schem2PngError {
    CannotOpenQueueFile { path: String, source: io::Error },
    CannotStartNetServer { port: u16, source: io::Error },
}

impl error::Error for Schem2PngError {}
impl fmt::Display for Schem2PngError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CannotOpenQueueFile { path, source } => {
                write!(f, "cannot open queue file {}: {}", path, source)
            }
            Self::CannotStartNetServer { port, source } => {
                write!(f, "cannot start json-net-api on port {}: {}", port, source)
            }
        }
    }
}

/// Renders Minecraft schematics to PNG images, either from a text job queue
/// (file or stdin) or from a JSON-over-TCP service, or both at once.
#[derive(Parser, Debug)]
#[command(name = "schem2png")]
struct Opts {
    /// Path to a text queue file; "-" or "--" reads the queue from stdin. Omit
    /// entirely when only `-net` is wanted.
    queue_file: Option<String>,

    /// Worker pool size.
    #[arg(long = "threads", default_value_t = 4)]
    threads: usize,

    /// Starts the JSON-over-TCP server on this port and keeps the process
    /// alive indefinitely.
    #[arg(long = "net")]
    net: Option<u16>,
}

/// Rewrites the original single-dash argv (`-threads N`, `-net PORT`, a bare
/// `--` meaning stdin) into the double-dash form clap's derive API expects,
/// so the documented invocation surface of §6 keeps working under clap.
/// `--` is remapped to `-` since clap itself reserves a bare `--` as its own
/// "end of options" marker and would otherwise swallow it.
fn normalize_args(args: Vec<String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| match arg.as_str() {
            "-threads" => "--threads".to_owned(),
            "-net" => "--net".to_owned(),
            "--" => "-".to_owned(),
            _ => arg,
        })
        .collect()
}

fn run() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let opts = Opts::parse_from(normalize_args(std::env::args().collect()));
    let network_mode = opts.net.is_some();
    let scheduler = Scheduler::new(network_mode);

    if let Some(port) = opts.net {
        netserver::start(port, scheduler.clone()).map_err(|source| Schem2PngError::CannotStartNetServer { port, source })?;
    }

    let handles = scheduler.spawn_workers(opts.threads);

    if let Some(queue_file) = &opts.queue_file {
        if queue_file == "-" {
            textqueue::run(BufReader::new(io::stdin().lock()), &scheduler);
        } else {
            let file = File::open(queue_file).map_err(|source| Schem2PngError::CannotOpenQueueFile {
                path: queue_file.clone(),
                source,
            })?;
            textqueue::run(BufReader::new(file), &scheduler);
        }
    }

    if !network_mode {
        scheduler.stop();
    }

    for handle in handles {
        if let Err(e) = handle.join() {
            error!("worker thread panicked: {:?}", e);
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    match run() {
        Err(e) => Err(e.to_string().into()),
        Ok(_) => Ok(()),
    }
}
