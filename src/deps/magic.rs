//! Script detection from file content.
//!
//! Only the `#!` line is examined; the interpreter is its first word, so
//! `#!/usr/bin/env python` names `/usr/bin/env`.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Longest `#!` line we are willing to look at.
const MAX_SHEBANG: usize = 512;

/// Extract the interpreter from the first line of `content`.
pub fn script_interpreter(content: &[u8]) -> Option<PathBuf> {
    let rest = content.strip_prefix(b"#!")?;
    let end = rest
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(rest.len())
        .min(MAX_SHEBANG);
    let line = std::str::from_utf8(&rest[..end]).ok()?;
    let interpreter = line.split_whitespace().next()?;
    interpreter
        .starts_with('/')
        .then(|| PathBuf::from(interpreter))
}

/// Read the `#!` line of a file on disk.
///
/// Unreadable files are not scripts; this never fails.
pub fn read_interpreter(path: &Path) -> Option<PathBuf> {
    let file = File::open(path).ok()?;
    let mut first = Vec::new();
    BufReader::new(file)
        .take(MAX_SHEBANG as u64 + 2)
        .read_until(b'\n', &mut first)
        .ok()?;
    script_interpreter(&first)
}
