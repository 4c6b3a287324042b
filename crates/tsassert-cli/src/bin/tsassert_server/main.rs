//! `tsassert-server`: the long-lived host-facing process (spec §6
//! "Host-side lifecycle"). Speaks length-prefixed framed JSON on
//! stdin/stdout: each message is preceded by a `Content-Length: N\r\n\r\n`
//! header naming the byte length of the JSON body that follows, the
//! same framing the teacher's `tsz-server` uses for its default
//! tsserver-compatible protocol.
//!
//! One `ProjectSession` is opened for the lifetime of the process and
//! every request is dispatched through `tsassert_session::handle_request`
//! (§5: "within one session Transform calls are serialised" — this loop
//! is single-threaded, so that holds trivially).

use std::io::{BufRead, BufReader, Read as IoRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tsassert_session::{handle_request, ProjectSession, Request};

#[derive(Parser, Debug)]
#[command(name = "tsassert-server", version, about = "Framed-JSON host protocol server for tsassert")]
struct ServerArgs {
    /// Path to a tsassert.json config file. Defaults to the current directory when omitted.
    #[arg(short = 'p', long = "project")]
    project: Option<PathBuf>,
}

fn read_framed_message(reader: &mut BufReader<std::io::Stdin>) -> Result<Option<String>> {
    let mut header_line = String::new();
    let bytes_read = reader.read_line(&mut header_line)?;
    if bytes_read == 0 {
        return Ok(None);
    }

    let header = header_line.trim();
    if header.is_empty() {
        return read_framed_message(reader);
    }

    let content_length = header
        .strip_prefix("Content-Length:")
        .with_context(|| format!("expected a Content-Length header, got: {header}"))?
        .trim()
        .parse::<usize>()
        .with_context(|| format!("invalid Content-Length: {header}"))?;

    let mut blank_line = String::new();
    reader.read_line(&mut blank_line)?;

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;
    String::from_utf8(body).map(Some).context("invalid UTF-8 in message body")
}

fn write_framed_message(stdout: &mut std::io::Stdout, message: &str) -> Result<()> {
    write!(stdout, "Content-Length: {}\r\n\r\n{}", message.len(), message)?;
    stdout.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    tsassert_cli::tracing_config::init_tracing();

    let args = ServerArgs::parse();
    let mut session = ProjectSession::open(args.project.as_deref()).context("failed to open project session")?;

    info!("tsassert-server ready");

    let mut stdin = BufReader::new(std::io::stdin());
    let mut stdout = std::io::stdout();

    loop {
        let message = match read_framed_message(&mut stdin)? {
            Some(msg) => msg,
            None => break,
        };
        if message.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&message) {
            Ok(req) => req,
            Err(e) => {
                let body = serde_json::json!({ "error": { "code": "parse", "message": format!("invalid request: {e}") } });
                write_framed_message(&mut stdout, &serde_json::to_string(&body)?)?;
                continue;
            }
        };

        let is_close = matches!(request.command, tsassert_session::Command::Close);
        let response = handle_request(&mut session, &request);
        write_framed_message(&mut stdout, &serde_json::to_string(&response)?)?;

        if is_close {
            break;
        }
    }

    Ok(())
}
