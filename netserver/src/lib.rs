#![allow(dead_code)]

//! The JSON-over-TCP front-end: a listener thread that accepts connections
//! and hands each one to its own connection thread, speaking ETB-framed
//! (`0x17`) JSON messages and routing `RenderSchematic` commands through the
//! shared [`scheduler::Scheduler`].
//!
//! Grounded on `JsonNet.cpp`'s `cJsonNetServer`/`cJsonNetConnection`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use job::{ErrorSink, InputSource, Job, JobOutcome, OutputSink};
use log::{debug, warn};
use scheduler::Scheduler;
use serde_json::{json, Value};

/// Byte separating JSON messages on the wire in both directions.
const ETB: u8 = 0x17;

/// Binds `port` and spawns a detached listener thread that accepts
/// connections and hands each to its own connection thread. Returns once
/// the socket is bound; the accept loop itself runs in the background for
/// the lifetime of the process, matching `cJsonNet::Start`.
pub fn start(port: u16, scheduler: Scheduler) -> std::io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    thread::Builder::new()
        .name("netserver-listener".to_owned())
        .spawn(move || accept_loop(listener, scheduler))
        .expect("failed to spawn listener thread");
    debug!("port {} is open for incoming json-net-api connections", port);
    Ok(())
}

fn accept_loop(listener: TcpListener, scheduler: Scheduler) {
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                warn!("error accepting connection: {}", e);
                continue;
            }
        };
        let scheduler = scheduler.clone();
        thread::spawn(move || handle_connection(stream, scheduler));
    }
}

fn peer_identification(stream: &TcpStream) -> String {
    stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown address>".to_owned())
}

struct Connection {
    client_ip_port: String,
    identification: String,
    current_cmd_id: Value,
}

fn handle_connection(mut stream: TcpStream, scheduler: Scheduler) {
    let client_ip_port = peer_identification(&stream);
    let mut conn = Connection {
        identification: client_ip_port.clone(),
        client_ip_port,
        current_cmd_id: Value::Null,
    };

    if send_response(&mut stream, &json!({ "MCSchematicToPng": 2 })).is_err() {
        return;
    }

    let mut pending = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let num_received = match stream.read(&mut buf) {
            Ok(0) => {
                debug!("socket {} closed", conn.identification);
                return;
            }
            Ok(n) => n,
            Err(e) => {
                warn!("socket {} received an error: {}. Closing connection.", conn.identification, e);
                return;
            }
        };

        let mut start = 0;
        for i in 0..num_received {
            if buf[i] == ETB {
                pending.extend_from_slice(&buf[start..i]);
                if !process_req(&mut conn, &pending, &mut stream, &scheduler) {
                    warn!("failed to process request on socket {}, closing the socket", conn.identification);
                    return;
                }
                pending.clear();
                start = i + 1;
            }
        }
        pending.extend_from_slice(&buf[start..num_received]);
    }
}

/// Parses a single ETB-delimited message and dispatches it. Returns `false`
/// only for envelope-level failures (malformed JSON, unrecognized `Cmd`),
/// which close the connection; per-command logical errors send an error
/// reply and return `true`.
fn process_req(conn: &mut Connection, raw: &[u8], stream: &mut TcpStream, scheduler: &Scheduler) -> bool {
    let req: Value = match serde_json::from_slice(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("error while parsing json on socket {}: {}", conn.identification, e);
            return false;
        }
    };

    let cmd = req.get("Cmd").and_then(Value::as_str).unwrap_or("");
    conn.current_cmd_id = req.get("CmdID").cloned().unwrap_or(Value::Null);

    match cmd {
        "RenderSchematic" => process_render_schematic(conn, &req, stream, scheduler),
        "SetName" => {
            let name = req.get("Name").and_then(Value::as_str).unwrap_or("");
            if !name.is_empty() {
                conn.identification = format!("{} ({})", name, conn.client_ip_port);
            }
            true
        }
        _ => {
            warn!("error in json on socket {}: missing or invalid cmd (\"{}\")", conn.identification, cmd);
            false
        }
    }
}

struct CapturingErrorSink(Arc<Mutex<Option<String>>>);

impl ErrorSink for CapturingErrorSink {
    fn report(&self, message: &str) {
        *self.0.lock().unwrap() = Some(message.to_owned());
    }
}

fn process_render_schematic(conn: &mut Connection, req: &Value, stream: &mut TcpStream, scheduler: &Scheduler) -> bool {
    let block_data = req.get("BlockData").and_then(Value::as_str).unwrap_or("");
    let gzipped = match BASE64.decode(block_data) {
        Ok(bytes) => bytes,
        Err(_) => {
            let _ = send_simple_error(stream, conn, "Failed to decode base64 block data.");
            return true;
        }
    };

    let markers = match parse_markers(req.get("Markers")) {
        Ok(markers) => markers,
        Err(message) => {
            let _ = send_simple_error(stream, conn, &message);
            return true;
        }
    };

    let start_x = req.get("StartX").and_then(Value::as_i64).map(|v| v as i32);
    let end_x = req.get("EndX").and_then(Value::as_i64).map(|v| v as i32);
    let start_y = req.get("StartY").and_then(Value::as_i64).map(|v| v as i32);
    let end_y = req.get("EndY").and_then(Value::as_i64).map(|v| v as i32);
    let start_z = req.get("StartZ").and_then(Value::as_i64).map(|v| v as i32);
    let end_z = req.get("EndZ").and_then(Value::as_i64).map(|v| v as i32);

    let horz_size = req.get("HorzSize").and_then(Value::as_i64).map(|v| v as i32).unwrap_or(4);
    let vert_size = req.get("VertSize").and_then(Value::as_i64).map(|v| v as i32).unwrap_or(5);
    let num_cw_rotations = req.get("NumCWRotations").and_then(Value::as_i64).unwrap_or(0);
    let num_ccw_rotations = ((4 - (num_cw_rotations.rem_euclid(4))) % 4) as u32;

    let (tx, rx) = mpsc::channel();
    let captured = Arc::new(Mutex::new(None));

    let mut job = Job::new(
        InputSource::GzippedBytes(gzipped),
        OutputSink::Channel(tx),
        Box::new(CapturingErrorSink(captured.clone())),
    );
    job.crop.start_x = start_x;
    job.crop.end_x = end_x;
    job.crop.start_y = start_y;
    job.crop.end_y = end_y;
    job.crop.start_z = start_z;
    job.crop.end_z = end_z;
    job.horz_size = horz_size;
    job.vert_size = vert_size;
    job.num_ccw_rotations = num_ccw_rotations;
    job.markers = markers;

    scheduler.push(job);

    match rx.recv() {
        Ok(JobOutcome::Rendered(png_bytes)) => {
            let resp = json!({
                "Status": "ok",
                "CmdID": conn.current_cmd_id.clone(),
                "PngData": BASE64.encode(&png_bytes),
            });
            let _ = send_response(stream, &resp);
        }
        Ok(JobOutcome::Failed) | Err(_) => {
            let message = captured
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| "failed to render schematic".to_owned());
            let _ = send_simple_error(stream, conn, &message);
        }
    }

    true
}

/// Parses the `Markers` array, if present. An unknown shape name or an
/// unparseable color aborts the whole command with an error message, but
/// does not abort the connection (the caller sends that message back as a
/// `SendSimpleError`-equivalent reply).
fn parse_markers(markers: Option<&Value>) -> Result<Vec<markers::Marker>, String> {
    let entries = match markers {
        Some(Value::Array(entries)) => entries,
        _ => return Ok(Vec::new()),
    };

    let mut result = Vec::with_capacity(entries.len());
    for marker in entries {
        let shape_str = marker.get("Shape").and_then(Value::as_str).unwrap_or("");
        if markers::get_shape_for_name(shape_str).is_none() {
            return Err(format!("Unknown marker shape: \"{}\".", shape_str));
        }

        let color = match marker.get("Color").and_then(Value::as_str) {
            Some(text) => match markers::parse_hex_color(text) {
                Some(c) => Some(c),
                None => return Err(format!("Invalid marker color specification: \"{}\".", text)),
            },
            None => None,
        };

        let x = marker.get("X").and_then(Value::as_i64).unwrap_or(0) as i32;
        let y = marker.get("Y").and_then(Value::as_i64).unwrap_or(0) as i32;
        let z = marker.get("Z").and_then(Value::as_i64).unwrap_or(0) as i32;
        result.push(markers::Marker::new(x, y, z, shape_str, color));
    }
    Ok(result)
}

fn send_simple_error(stream: &mut TcpStream, conn: &Connection, error: &str) -> std::io::Result<()> {
    let resp = json!({
        "CmdID": conn.current_cmd_id.clone(),
        "Status": "error",
        "ErrorText": error,
    });
    send_response(stream, &resp)
}

fn send_response(stream: &mut TcpStream, response: &Value) -> std::io::Result<()> {
    let bytes = serde_json::to_vec(response).expect("Value serialization cannot fail");
    stream.write_all(&bytes)?;
    stream.write_all(&[ETB])?;
    stream.flush()
}
