//! Ties the leaf crates together into the decode → build → rotate → render
//! → write pipeline a worker runs for a single [`crate::Job`].
//!
//! Grounded on `SchematicToPng.cpp`'s `cThread::ProcessItem` and
//! `JsonNet.cpp`'s `ProcessRenderSchematic` (the two call sites this logic
//! was duplicated between in the original source).

use std::fs;
use std::io::Read;

use blockimage::BlockImage;
use flate2::read::GzDecoder;
use log::debug;

use crate::{Crop, Job, JobError, JobOutcome, OutputSink};

/// Runs a job's full pipeline to completion. Every failure is reported
/// through the job's `ErrorSink` and, for a `Channel` output, signaled as
/// `JobOutcome::Failed`; this function never panics on bad input.
pub fn process(job: Job) {
    match run(&job) {
        Ok(png_bytes) => match job.output {
            OutputSink::File(path) => {
                if let Err(e) = fs::write(&path, &png_bytes) {
                    job.error_sink
                        .report(&format!("cannot write output file {}: {}", path.display(), e));
                } else {
                    debug!("wrote {} bytes to {}", png_bytes.len(), path.display());
                }
            }
            OutputSink::Channel(tx) => {
                let _ = tx.send(JobOutcome::Rendered(png_bytes));
            }
        },
        Err(e) => {
            job.error_sink.report(&e.to_string());
            if let OutputSink::Channel(tx) = &job.output {
                let _ = tx.send(JobOutcome::Failed);
            }
        }
    }
}

fn run(job: &Job) -> Result<Vec<u8>, JobError> {
    let gzipped = read_input(&job.input)?;
    let inflated = inflate(&gzipped)?;
    let root = nbt::decode(&inflated).map_err(|e| JobError::Nbt(e.to_string()))?;

    let width = required_short(&root, "Width")?;
    let height = required_short(&root, "Height")?;
    let length = required_short(&root, "Length")?;

    let (start_x, end_x, start_y, end_y, start_z, end_z) = resolve_crop(&job.crop, width, height, length)?;

    let blocks = required_byte_array(&root, "Blocks")?;
    let metas = required_byte_array(&root, "Data")?;

    let size_x = end_x - start_x + 1;
    let size_y = end_y - start_y + 1;
    let size_z = end_z - start_z + 1;

    let mut image = BlockImage::new(size_x, size_y, size_z);
    for y in 0..size_y {
        for z in 0..size_z {
            for x in 0..size_x {
                let idx = ((start_x + x) + (start_z + z) * width + (start_y + y) * width * length) as usize;
                let block_type = blocks[idx];
                let block_meta = metas[idx] & 0x0f;
                image.set(x, y, z, block_type, block_meta);
            }
        }
    }

    image.rotate_ccw_by(job.num_ccw_rotations);

    let rendered = render::render(&image, job.horz_size, job.vert_size, &job.markers);
    rendered
        .encode_png()
        .map_err(|e| JobError::Io(format!("failed to encode PNG: {}", e)))
}

fn read_input(input: &crate::InputSource) -> Result<Vec<u8>, JobError> {
    match input {
        crate::InputSource::File(path) => {
            fs::read(path).map_err(|e| JobError::Io(format!("cannot read file {}: {}", path.display(), e)))
        }
        crate::InputSource::GzippedBytes(bytes) => Ok(bytes.clone()),
    }
}

fn inflate(gzipped: &[u8]) -> Result<Vec<u8>, JobError> {
    let mut decoder = GzDecoder::new(gzipped);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| JobError::Decompress(e.to_string()))?;
    Ok(out)
}

fn required_short(root: &nbt::Tag, name: &'static str) -> Result<i32, JobError> {
    root.find_child(name)
        .ok_or(JobError::MissingField(name))?
        .get_short()
        .map(|v| v as i32)
        .ok_or(JobError::WrongType(name))
}

fn required_byte_array<'a>(root: &'a nbt::Tag, name: &'static str) -> Result<&'a [u8], JobError> {
    root.find_child(name)
        .ok_or(JobError::MissingField(name))?
        .get_byte_array()
        .ok_or(JobError::WrongType(name))
}

/// Clamps a job's crop window into the schematic's actual extent, per
/// `cThread::ProcessItem`'s `StartX`/`EndX`/... resolution. Returns an error
/// if the resulting volume on any axis is empty.
fn resolve_crop(crop: &Crop, width: i32, height: i32, length: i32) -> Result<(i32, i32, i32, i32, i32, i32), JobError> {
    let start_x = crop.start_x.unwrap_or(0).max(0).min(width);
    let end_x = crop.end_x.unwrap_or(width - 1).max(0).min(width - 1);
    let start_y = crop.start_y.unwrap_or(0).max(0).min(height);
    let end_y = crop.end_y.unwrap_or(height - 1).max(0).min(height - 1);
    let start_z = crop.start_z.unwrap_or(0).max(0).min(length);
    let end_z = crop.end_z.unwrap_or(length - 1).max(0).min(length - 1);

    if end_x - start_x < 0 || end_y - start_y < 0 || end_z - start_z < 0 {
        return Err(JobError::EmptyCrop {
            dx: end_x - start_x,
            dy: end_y - start_y,
            dz: end_z - start_z,
        });
    }

    Ok((start_x, end_x, start_y, end_y, start_z, end_z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::mpsc;

    use crate::{ErrorSink, InputSource, Job, JobOutcome, OutputSink};

    struct NullSink;
    impl ErrorSink for NullSink {
        fn report(&self, _message: &str) {}
    }

    fn push_string(buf: &mut Vec<u8>, s: &str) {
        buf.extend_from_slice(&(s.len() as i16).to_be_bytes());
        buf.extend_from_slice(s.as_bytes());
    }

    fn nbt_fixture(sx: i16, sy: i16, sz: i16, blocks: &[u8], data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.push(nbt::TAG_COMPOUND);
        push_string(&mut buf, "Schematic");

        buf.push(nbt::TAG_SHORT);
        push_string(&mut buf, "Height");
        buf.extend_from_slice(&sy.to_be_bytes());

        buf.push(nbt::TAG_SHORT);
        push_string(&mut buf, "Length");
        buf.extend_from_slice(&sz.to_be_bytes());

        buf.push(nbt::TAG_SHORT);
        push_string(&mut buf, "Width");
        buf.extend_from_slice(&sx.to_be_bytes());

        buf.push(nbt::TAG_BYTE_ARRAY);
        push_string(&mut buf, "Blocks");
        buf.extend_from_slice(&(blocks.len() as i32).to_be_bytes());
        buf.extend_from_slice(blocks);

        buf.push(nbt::TAG_BYTE_ARRAY);
        push_string(&mut buf, "Data");
        buf.extend_from_slice(&(data.len() as i32).to_be_bytes());
        buf.extend_from_slice(data);

        buf.push(nbt::TAG_END);
        buf
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn single_block_job_renders_expected_size() {
        let nbt_bytes = nbt_fixture(1, 1, 1, &[1], &[0]);
        let gzipped = gzip(&nbt_bytes);

        let (tx, rx) = mpsc::channel();
        let job = Job {
            input: InputSource::GzippedBytes(gzipped),
            output: OutputSink::Channel(tx),
            crop: Crop::full(),
            horz_size: 4,
            vert_size: 5,
            num_ccw_rotations: 0,
            markers: Vec::new(),
            error_sink: Box::new(NullSink),
        };

        process(job);
        match rx.recv().unwrap() {
            JobOutcome::Rendered(png) => {
                let decoded = image::load_from_memory(&png).unwrap();
                assert_eq!((decoded.width(), decoded.height()), (10, 10));
            }
            JobOutcome::Failed => panic!("expected a successful render"),
        }
    }

    #[test]
    fn empty_crop_is_reported_as_a_failure() {
        let nbt_bytes = nbt_fixture(2, 2, 2, &[1; 8], &[0; 8]);
        let gzipped = gzip(&nbt_bytes);

        let (tx, rx) = mpsc::channel();
        let mut crop = Crop::full();
        crop.start_x = Some(1);
        crop.end_x = Some(0);
        let job = Job {
            input: InputSource::GzippedBytes(gzipped),
            output: OutputSink::Channel(tx),
            crop,
            horz_size: 4,
            vert_size: 5,
            num_ccw_rotations: 0,
            markers: Vec::new(),
            error_sink: Box::new(NullSink),
        };

        process(job);
        assert!(matches!(rx.recv().unwrap(), JobOutcome::Failed));
    }

    #[test]
    fn full_extent_crop_matches_omitted_crop() {
        let nbt_bytes = nbt_fixture(2, 1, 1, &[1, 1], &[0, 0]);

        let render_with = |crop: Crop| {
            let gzipped = gzip(&nbt_bytes);
            let (tx, rx) = mpsc::channel();
            let job = Job {
                input: InputSource::GzippedBytes(gzipped),
                output: OutputSink::Channel(tx),
                crop,
                horz_size: 4,
                vert_size: 5,
                num_ccw_rotations: 0,
                markers: Vec::new(),
                error_sink: Box::new(NullSink),
            };
            process(job);
            match rx.recv().unwrap() {
                JobOutcome::Rendered(png) => png,
                JobOutcome::Failed => panic!("expected a successful render"),
            }
        };

        let omitted = render_with(Crop::full());
        let mut explicit = Crop::full();
        explicit.start_x = Some(0);
        explicit.end_x = Some(1);
        explicit.start_y = Some(0);
        explicit.end_y = Some(0);
        explicit.start_z = Some(0);
        explicit.end_z = Some(0);
        let with_bounds = render_with(explicit);

        assert_eq!(omitted, with_bounds);
    }
}
