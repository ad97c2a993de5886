#![allow(dead_code)]

//! The stdin/file text queue front-end: a job-header/property-line state
//! machine that parses a newline-delimited stream into [`JobSpec`]s and
//! feeds a [`scheduler::Scheduler`].
//!
//! Grounded on `SchematicToPng.cpp`'s `ProcessQueueStream`/
//! `ProcessPropertyLine`/`AddMarker`.

use std::io::BufRead;
use std::path::Path;

use job::{Crop, InputSource, Job, OutputSink, StderrErrorSink};
use log::warn;
use markers::Marker;
use scheduler::Scheduler;

const EOT: &str = "\x04";

/// A parsed job header plus its property overrides, before it's bound to
/// concrete I/O sinks.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub input_file_name: String,
    pub output_file_name: String,
    pub crop: Crop,
    pub horz_size: i32,
    pub vert_size: i32,
    pub num_ccw_rotations: u32,
    pub markers: Vec<Marker>,
}

impl JobSpec {
    fn new(input_file_name: String) -> Self {
        let output_file_name = change_extension(&input_file_name, "png");
        JobSpec {
            input_file_name,
            output_file_name,
            crop: Crop::full(),
            horz_size: 4,
            vert_size: 5,
            num_ccw_rotations: 0,
            markers: Vec::new(),
        }
    }
}

/// Replaces (or appends) a file name's extension, matching `cFile::ChangeFileExt`.
fn change_extension(file_name: &str, new_ext: &str) -> String {
    let path = Path::new(file_name);
    match path.extension() {
        Some(_) => path.with_extension(new_ext).to_string_lossy().into_owned(),
        None => format!("{}.{}", file_name, new_ext),
    }
}

/// Parses a newline-delimited queue stream, invoking `on_job` once for each
/// completed job, in the order jobs are completed (header-to-header
/// transition, a lone EOT line, or end of stream).
pub fn parse_stream<R: BufRead>(reader: R, mut on_job: impl FnMut(JobSpec)) {
    let mut current: Option<JobSpec> = None;

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let first_byte = line.as_bytes()[0];
        if first_byte <= b' ' {
            if line == EOT {
                if let Some(job) = current.take() {
                    on_job(job);
                }
                continue;
            }
            match &mut current {
                Some(job) => apply_property_line(job, &line[1..]),
                None => warn!("defining properties without a preceding input file"),
            }
        } else {
            if let Some(job) = current.take() {
                on_job(job);
            }
            current = Some(JobSpec::new(line));
        }
    }

    if let Some(job) = current.take() {
        on_job(job);
    }
}

/// Parses a queue stream and pushes each completed job onto `scheduler`,
/// bound to file-based I/O and a stderr error sink.
pub fn run<R: BufRead>(reader: R, scheduler: &Scheduler) {
    parse_stream(reader, |spec| {
        let input = InputSource::File(spec.input_file_name.clone().into());
        let output = OutputSink::File(spec.output_file_name.clone().into());
        let error_sink = Box::new(StderrErrorSink::new(spec.input_file_name.clone()));

        let mut job = Job::new(input, output, error_sink);
        job.crop = spec.crop;
        job.horz_size = spec.horz_size;
        job.vert_size = spec.vert_size;
        job.num_ccw_rotations = spec.num_ccw_rotations;
        job.markers = spec.markers;

        scheduler.push(job);
    });
}

fn apply_property_line(job: &mut JobSpec, property_line: &str) {
    let trimmed_start = property_line.trim_start_matches(|c: char| c == ' ' || c == '\t');
    let sep_idx = trimmed_start.find(|c: char| c == ' ' || c == '\t' || c == '=' || c == ':');
    let (name, rest) = match sep_idx {
        Some(idx) => (&trimmed_start[..idx], &trimmed_start[idx + 1..]),
        None => {
            warn!("invalid property specification in line \"{}\"", property_line);
            return;
        }
    };
    if name.is_empty() {
        warn!("invalid property name in line \"{}\"", property_line);
        return;
    }
    let mut value = rest;
    if let Some(c) = value.bytes().next() {
        if c <= b' ' {
            value = &value[1..];
        }
    }

    match name.to_ascii_lowercase().as_str() {
        "outputfile" | "outfile" => job.output_file_name = value.to_owned(),
        "startx" => job.crop.start_x = parse_bound(value),
        "endx" => job.crop.end_x = parse_bound(value),
        "starty" => job.crop.start_y = parse_bound(value),
        "endy" => job.crop.end_y = parse_bound(value),
        "startz" => job.crop.start_z = parse_bound(value),
        "endz" => job.crop.end_z = parse_bound(value),
        "horzsize" => {
            if let Ok(v) = value.trim().parse() {
                job.horz_size = v;
            }
        }
        "vertsize" => {
            if let Ok(v) = value.trim().parse() {
                job.vert_size = v;
            }
        }
        "numccwrotations" => {
            if let Ok(v) = value.trim().parse::<i64>() {
                job.num_ccw_rotations = v.rem_euclid(4) as u32;
            }
        }
        "numcwrotations" => {
            if let Ok(v) = value.trim().parse::<i64>() {
                job.num_ccw_rotations = ((4 - (v.rem_euclid(4))) % 4) as u32;
            }
        }
        "marker" => add_marker(job, value),
        other => warn!("unknown property name: \"{}\"", other),
    }
}

/// `-1` means "full extent", encoded as `None`.
fn parse_bound(value: &str) -> Option<i32> {
    match value.trim().parse::<i32>() {
        Ok(-1) => None,
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

/// Parses `"x, y, z, shape [, color]"` and appends the marker to the job.
/// Unknown shapes or unparseable colors are reported and skipped rather
/// than aborting the rest of the stream.
fn add_marker(job: &mut JobSpec, marker_value: &str) {
    let parts: Vec<&str> = marker_value
        .split(|c: char| c == ',' || c == ';')
        .map(str::trim)
        .collect();
    if parts.len() < 4 {
        warn!("invalid marker specification: \"{}\"", marker_value);
        return;
    }

    let (x, y, z) = match (parts[0].parse(), parts[1].parse(), parts[2].parse()) {
        (Ok(x), Ok(y), Ok(z)) => (x, y, z),
        _ => {
            warn!("invalid marker coords in \"{}\"", marker_value);
            return;
        }
    };

    let shape_name = parts[3];
    if markers::get_shape_for_name(shape_name).is_none() {
        warn!("unknown marker shape in \"{}\"", marker_value);
        return;
    }

    let color = if parts.len() >= 5 {
        match markers::parse_hex_color(parts[4]) {
            Some(c) => Some(c),
            None => {
                warn!(
                    "invalid marker color specification in \"{}\"; using default marker color",
                    marker_value
                );
                None
            }
        }
    } else {
        None
    };

    job.markers.push(Marker::new(x, y, z, shape_name, color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn two_headers_produce_two_independent_jobs() {
        let input = "a.schematic\n  outfile = a.png\n  horzsize = 4\n  vertsize = 5\nb.schematic\n  outfile = b.png\n";
        let mut jobs = Vec::new();
        parse_stream(Cursor::new(input), |job| jobs.push(job));

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].input_file_name, "a.schematic");
        assert_eq!(jobs[0].output_file_name, "a.png");
        assert_eq!(jobs[0].horz_size, 4);
        assert_eq!(jobs[0].vert_size, 5);

        assert_eq!(jobs[1].input_file_name, "b.schematic");
        assert_eq!(jobs[1].output_file_name, "b.png");
        // Continuation lines must not leak across job boundaries.
        assert_eq!(jobs[1].horz_size, 4);
        assert_eq!(jobs[1].vert_size, 5);
    }

    #[test]
    fn eot_flushes_current_job_immediately() {
        let input = "a.schematic\n  outfile=a.png\n\x04\nb.schematic\n";
        let mut jobs = Vec::new();
        parse_stream(Cursor::new(input), |job| jobs.push(job));
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].input_file_name, "a.schematic");
        assert_eq!(jobs[1].input_file_name, "b.schematic");
    }

    #[test]
    fn default_output_file_name_replaces_extension() {
        assert_eq!(change_extension("a.schematic", "png"), "a.png");
        assert_eq!(change_extension("noext", "png"), "noext.png");
    }

    #[test]
    fn numcwrotations_converts_to_ccw() {
        let input = "a.schematic\n  numcwrotations=1\n";
        let mut jobs = Vec::new();
        parse_stream(Cursor::new(input), |job| jobs.push(job));
        assert_eq!(jobs[0].num_ccw_rotations, 3);
    }

    #[test]
    fn crop_bound_of_minus_one_means_full_extent() {
        let input = "a.schematic\n  startx=-1\n  endx=5\n";
        let mut jobs = Vec::new();
        parse_stream(Cursor::new(input), |job| jobs.push(job));
        assert_eq!(jobs[0].crop.start_x, None);
        assert_eq!(jobs[0].crop.end_x, Some(5));
    }

    #[test]
    fn marker_property_is_parsed() {
        let input = "a.schematic\n  marker = 1, 2, 3, Cube, ff0000\n";
        let mut jobs = Vec::new();
        parse_stream(Cursor::new(input), |job| jobs.push(job));
        assert_eq!(jobs[0].markers.len(), 1);
        let m = &jobs[0].markers[0];
        assert_eq!((m.x, m.y, m.z), (1, 2, 3));
        assert_eq!(m.color, Some(0xff0000));
    }

    #[test]
    fn unknown_marker_shape_is_skipped_not_fatal() {
        let input = "a.schematic\n  marker = 1, 2, 3, NotAShape\n  outfile=a.png\n";
        let mut jobs = Vec::new();
        parse_stream(Cursor::new(input), |job| jobs.push(job));
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].markers.is_empty());
        assert_eq!(jobs[0].output_file_name, "a.png");
    }
}
