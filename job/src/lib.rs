#![allow(dead_code)]

//! The render job model: input source, output sink, crop window, tile
//! geometry, rotation count, markers, and the `ErrorSink` capability each
//! job carries so its failures reach the right destination regardless of
//! which front-end created it.
//!
//! Grounded on `SchematicToPng.h`'s `cQueueItem` (fields) and
//! `InputStream.h`'s abstract `Error`/`GetLine` interface, generalized into
//! a capability trait per SPEC_FULL.md's Design Notes.

use std::error;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use markers::Marker;

mod pipeline;

pub use pipeline::process;

#[derive(Debug)]
pub enum JobError {
    Io(String),
    Decompress(String),
    Nbt(String),
    MissingField(&'static str),
    WrongType(&'static str),
    EmptyCrop { dx: i32, dy: i32, dz: i32 },
}

impl error::Error for JobError {}
impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "{}", msg),
            Self::Decompress(msg) => write!(f, "failed to decompress schematic data: {}", msg),
            Self::Nbt(msg) => write!(f, "failed to parse NBT data: {}", msg),
            Self::MissingField(name) => write!(f, "schematic is missing required field \"{}\"", name),
            Self::WrongType(name) => write!(f, "schematic field \"{}\" has the wrong tag type", name),
            Self::EmptyCrop { dx, dy, dz } => write!(
                f,
                "the specified dimensions result in an empty area ({}, {}, {})",
                dx, dy, dz
            ),
        }
    }
}

/// Capability a job uses to report a failure to whoever is waiting on it;
/// implemented differently per front-end (stderr for batch mode, a JSON
/// reply for the network front-end).
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

/// The batch-mode sink: every reported error goes to stderr, matching
/// `cIosInputStream::Error`.
pub struct StderrErrorSink {
    pub context: String,
}

impl StderrErrorSink {
    pub fn new(context: impl Into<String>) -> Self {
        StderrErrorSink {
            context: context.into(),
        }
    }
}

impl ErrorSink for StderrErrorSink {
    fn report(&self, message: &str) {
        eprintln!("{}: {}", self.context, message);
    }
}

/// Where a job reads its (gzip-compressed) schematic bytes from.
pub enum InputSource {
    File(PathBuf),
    /// Already-gzipped bytes handed over by the network front-end after
    /// base64-decoding the request.
    GzippedBytes(Vec<u8>),
}

/// The outcome a job's pipeline hands back to whoever is waiting on it
/// through a `Channel` output sink.
pub enum JobOutcome {
    Rendered(Vec<u8>),
    Failed,
}

/// Where a job writes its rendered PNG bytes.
pub enum OutputSink {
    File(PathBuf),
    /// The network front-end waits for completion on the other end of this
    /// channel so it can reply to the originating request.
    Channel(Sender<JobOutcome>),
}

/// A crop window into the schematic's voxel grid. `None` on any bound means
/// "full extent on that face", the Rust encoding of the original's `-1`
/// sentinel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crop {
    pub start_x: Option<i32>,
    pub end_x: Option<i32>,
    pub start_y: Option<i32>,
    pub end_y: Option<i32>,
    pub start_z: Option<i32>,
    pub end_z: Option<i32>,
}

impl Crop {
    pub const fn full() -> Self {
        Crop {
            start_x: None,
            end_x: None,
            start_y: None,
            end_y: None,
            start_z: None,
            end_z: None,
        }
    }
}

/// A single render job: everything the pipeline needs to turn a schematic
/// into PNG bytes, plus where to send the result and where to report
/// failure.
pub struct Job {
    pub input: InputSource,
    pub output: OutputSink,
    pub crop: Crop,
    pub horz_size: i32,
    pub vert_size: i32,
    pub num_ccw_rotations: u32,
    pub markers: Vec<Marker>,
    pub error_sink: Box<dyn ErrorSink>,
}

impl Job {
    pub fn new(input: InputSource, output: OutputSink, error_sink: Box<dyn ErrorSink>) -> Self {
        Job {
            input,
            output,
            crop: Crop::full(),
            horz_size: 4,
            vert_size: 5,
            num_ccw_rotations: 0,
            markers: Vec::new(),
            error_sink,
        }
    }
}
