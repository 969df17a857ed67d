//! Filesystem utilities for code generation

use crate::error::{CodegenError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Join lines with `\n` and append one trailing newline
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    text
}

/// Write generated lines to `path`, or echo them to stdout when no path is given
///
/// The target is overwritten unconditionally. Parent directories are not
/// created: a missing directory is reported as an error.
pub fn save_lines<S: AsRef<str>>(lines: &[S], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => write_file(path, join_lines(lines)),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_lines(lines, &mut handle).map_err(|e| CodegenError::io("<stdout>", e))
        }
    }
}

/// Write joined lines to any writer and flush it
pub fn write_lines<S: AsRef<str>, W: Write>(lines: &[S], out: &mut W) -> io::Result<()> {
    out.write_all(join_lines(lines).as_bytes())?;
    out.flush()
}

/// Overwrite `path` with `contents`
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let contents = contents.as_ref();
    fs::write(path, contents).map_err(|e| CodegenError::io(path, e))?;
    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Read a UTF-8 text file
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))
}
