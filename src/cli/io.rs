//! JSON I/O handling for CLI
//!
//! - Input: a single JSON value on one stdin line
//! - Output: `{"status":"ok","data":...}` on stdout
//! - UTF-8 only

use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde_json::json;

use super::errors::{CliError, CliResult};

/// Read one non-empty line from stdin
pub fn read_request() -> CliResult<String> {
    read_line_from(&mut io::stdin().lock())
}

fn read_line_from<R: BufRead>(reader: &mut R) -> CliResult<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(line.trim().to_string())
}

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    write_response_to(&mut stdout, data)
}

fn write_response_to<W: Write, T: Serialize>(writer: &mut W, data: &T) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });

    serde_json::to_writer(&mut *writer, &response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_line() {
        let mut input = Cursor::new("{\"op\": \"count\"}\n{\"op\": \"clarify\"}\n");
        assert_eq!(read_line_from(&mut input).unwrap(), "{\"op\": \"count\"}");
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut input = Cursor::new("   \n");
        let err = read_line_from(&mut input).unwrap_err();
        assert_eq!(err.code_str(), "QA_CLI_IO_ERROR");
    }

    #[test]
    fn test_response_envelope() {
        let mut out = Vec::new();
        write_response_to(&mut out, &json!({"answer": 2})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\"data\":{\"answer\":2},\"status\":\"ok\"}\n");
    }
}
