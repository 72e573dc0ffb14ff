//! Line loop - reads commands from any buffered source and renders results.

use crate::session::{Outcome, Session, SessionError};
use std::io::{BufRead, Write};
use tracing::debug;

/// Output options for [`run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellOptions {
    /// One JSON object per result instead of text
    pub json: bool,

    /// Print `> ` before each line (never in JSON mode)
    pub prompt: bool,
}

/// Feeds `input` to the session line by line until `exit` or end of input.
///
/// Lines are raw bytes; invalid UTF-8 is replaced rather than rejected, so
/// the line reaches the parser and fails there like any unknown command.
/// Only a failing reader or writer ends the loop with an error.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    out: &mut W,
    options: ShellOptions,
) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    loop {
        if options.prompt && !options.json {
            write!(out, "> ")?;
            out.flush()?;
        }

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            debug!("end of input");
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);

        match session.execute_line(&line) {
            Ok(None) => continue,
            Ok(Some(Outcome::Exit)) => return Ok(()),
            Ok(Some(outcome)) => render(out, options.json, Ok(&outcome))?,
            Err(e) => {
                debug!(error = ?e, "command failed");
                render(out, options.json, Err(&e))?;
            }
        }
    }
}

/// Writes one result as text or as a JSON object.
pub fn render<W: Write>(
    out: &mut W,
    json: bool,
    result: Result<&Outcome, &SessionError>,
) -> anyhow::Result<()> {
    match (json, result) {
        (true, Ok(outcome)) => writeln!(out, "{}", serde_json::to_string(outcome)?)?,
        (true, Err(e)) => {
            let value = serde_json::json!({ "outcome": "error", "error": e.to_string() });
            writeln!(out, "{}", value)?
        }
        (false, Ok(outcome)) => writeln!(out, "{}", outcome.to_string().trim_end())?,
        (false, Err(e)) => writeln!(out, "{}", e)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionConfig;
    use tempfile::TempDir;

    fn session() -> (Session, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = SessionConfig {
            capacity: 4,
            seed: 7,
            data_dir: dir.path().to_path_buf(),
        };
        (Session::new(&config).unwrap(), dir)
    }

    fn transcript(input: &[u8], options: ShellOptions) -> (String, Session, TempDir) {
        let (mut s, dir) = session();
        let mut out = Vec::new();
        run(&mut s, input, &mut out, options).unwrap();
        (String::from_utf8(out).unwrap(), s, dir)
    }

    #[test]
    fn test_invalid_utf8_line_keeps_running() {
        let input = b"create A 1 1\n\xff\xfe\nlist\nexit\ncreate B 1 1\n";
        let (text, s, _dir) = transcript(input, ShellOptions::default());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Created Matrix (A,1,1)");
        assert!(lines[1].starts_with("Not a command in this application"));
        assert_eq!(lines[2], "[0] A (1,1)");
        assert_eq!(lines.len(), 3);

        // exit stopped the loop before B
        assert!(s.registry().find_by_name("B").is_none());
    }

    #[test]
    fn test_end_of_input_without_newline() {
        let (text, s, _dir) = transcript(b"create A 2 2", ShellOptions::default());
        assert_eq!(text, "Created Matrix (A,2,2)\n");
        assert_eq!(s.registry().len(), 1);
    }

    #[test]
    fn test_prompt_and_blank_lines() {
        let options = ShellOptions { json: false, prompt: true };
        let (text, _s, _dir) = transcript(b"\n   \nexit\n", options);
        assert_eq!(text, "> > > ");
    }

    #[test]
    fn test_json_mode_reports_errors_inline() {
        let options = ShellOptions { json: true, prompt: true };
        let (text, _s, _dir) = transcript(b"display nope\ncreate A 1 1\n", options);

        let values: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["outcome"], "error");
        assert_eq!(values[1]["outcome"], "created");
    }
}
