#![forbid(unsafe_code)]

use super::framing::{
    TransportMode, detect_mode_from_first_line, parse_request, read_content_length_frame,
    write_frame,
};
use crate::McpServer;
use std::io::{BufRead, BufReader, Write};
use tracing::debug;

pub(crate) fn run_stdio(server: &mut McpServer) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();
    serve(server, &mut reader, &mut stdout)
}

/// Serves requests until EOF. The framing is detected once from the first
/// non-empty line and kept for the rest of the session.
pub(crate) fn serve<R: BufRead, W: Write>(
    server: &mut McpServer,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mode: Option<TransportMode> = None;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let current = match mode {
            Some(current) => current,
            None => {
                let Some(detected) = detect_mode_from_first_line(&line) else {
                    continue;
                };
                debug!(mode = ?detected, "stdio framing detected");
                mode = Some(detected);
                detected
            }
        };

        let body = match current {
            TransportMode::NewlineJson => line.trim().as_bytes().to_vec(),
            TransportMode::ContentLength => match read_content_length_frame(reader, line)? {
                Some(body) => body,
                None => break,
            },
        };

        let resp = match parse_request(&body) {
            Ok(request) => server.handle(request),
            Err(resp) => Some(resp),
        };
        if let Some(resp) = resp {
            write_frame(writer, current, &resp)?;
        }
    }

    debug!("stdio closed");
    Ok(())
}
