//! Span input and partition output in JSON
//!
//! Input is a JSON array of `[z, y, x0, x1]` arrays. Output is the
//! [`PartitionResult`] object pretty-printed with a 4-space indent.

use crate::types::{PartitionError, PartitionResult, Result, Span};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{Read, Write};
use tracing::{debug, error};

const INDENT: &[u8] = b"    ";

/// Read the whole stream and parse it as a span list
pub fn read_spans<R: Read>(mut reader: R) -> Result<Vec<Span>> {
    let mut input = Vec::new();
    reader
        .read_to_end(&mut input)
        .map_err(PartitionError::StreamRead)?;
    debug!(bytes = input.len(), "read span input");

    parse_spans(&input)
}

/// Parse a JSON array of 4-integer arrays. Either every span parses or
/// none are returned.
pub fn parse_spans(input: &[u8]) -> Result<Vec<Span>> {
    let spans: Vec<Span> = serde_json::from_slice(input).map_err(PartitionError::InputFormat)?;
    debug!(spans = spans.len(), "parsed spans");
    Ok(spans)
}

/// Encode a partition result as indented JSON (no trailing newline)
pub fn encode_result(result: &PartitionResult) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    result
        .serialize(&mut serializer)
        .map_err(PartitionError::OutputEncoding)?;

    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the encoded result followed by a newline.
///
/// An encoding failure is reported but not returned; an empty line is
/// written in place of the result. Only write failures are errors.
pub fn write_result<W: Write>(mut writer: W, result: &PartitionResult) -> Result<()> {
    let json = match encode_result(result) {
        Ok(json) => json,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            String::new()
        }
    };

    writeln!(writer, "{json}").map_err(PartitionError::StreamWrite)?;
    writer.flush().map_err(PartitionError::StreamWrite)
}
