//! Keep exactly one license preamble at the top of every C++ source file.

use crate::codegen::fs_utils::{read_file, write_file};
use crate::error::{CodegenError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// License header placed at the top of every LabStor source file
pub const LABSTOR_PREAMBLE: &str = "/*
 * Copyright (C) 2022  SCS Lab <scslab@iit.edu>,
 * Luke Logan <llogan@hawk.iit.edu>,
 * Jaime Cernuda Garcia <jcernudagarcia@hawk.iit.edu>
 * Jay Lofstead <gflofst@sandia.gov>,
 * Anthony Kougkas <akougkas@iit.edu>,
 * Xian-He Sun <sun@iit.edu>
 *
 * This file is part of LabStor
 *
 * LabStor is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU General Public
 * License along with this program.  If not, see
 * <http://www.gnu.org/licenses/>.
 */

";

fn created_by_banner() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//\n// Created by [^\n]*\n//\n").expect("valid regex"))
}

/// Options for a preamble pass
#[derive(Debug, Clone)]
pub struct PreambleOptions {
    pub preamble: String,
    /// File extensions (without the dot) that get a preamble
    pub extensions: Vec<String>,
    /// Skip directories whose name starts with `.`
    pub skip_hidden: bool,
}

impl Default for PreambleOptions {
    fn default() -> Self {
        Self {
            preamble: LABSTOR_PREAMBLE.to_string(),
            extensions: vec!["cc".to_string(), "h".to_string()],
            skip_hidden: true,
        }
    }
}

/// Outcome of a preamble pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreambleReport {
    pub scanned: usize,
    pub rewritten: usize,
}

/// Return `text` with every copy of `preamble` and any IDE "Created by" banner
/// removed, and exactly one `preamble` at the top
pub fn apply_preamble(text: &str, preamble: &str) -> String {
    let without = if preamble.is_empty() {
        text.to_string()
    } else {
        text.replace(preamble, "")
    };
    let body = created_by_banner().replace_all(without.trim(), "");
    format!("{}{}\n", preamble, body.trim())
}

/// Apply the preamble to every matching file under `root`
pub fn inject_preamble(root: &Path, options: &PreambleOptions) -> Result<PreambleReport> {
    if !root.is_dir() {
        return Err(CodegenError::Config(format!(
            "preamble root is not a directory: {}",
            root.display()
        )));
    }

    let mut report = PreambleReport::default();
    visit(root, options, &mut report)?;
    tracing::info!(
        "Preamble pass over {}: {} files scanned, {} rewritten",
        root.display(),
        report.scanned,
        report.rewritten
    );
    Ok(report)
}

fn visit(dir: &Path, options: &PreambleOptions, report: &mut PreambleReport) -> Result<()> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| CodegenError::io(dir, e))? {
        let entry = entry.map_err(|e| CodegenError::io(dir, e))?;
        let path = entry.path();
        // file_type() does not follow symlinks; linked entries are never visited
        let file_type = entry.file_type().map_err(|e| CodegenError::io(&path, e))?;
        entries.push((path, file_type));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, file_type) in entries {
        if file_type.is_symlink() {
            tracing::debug!("Skipping symlink {}", path.display());
        } else if file_type.is_dir() {
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if !(options.skip_hidden && hidden) {
                visit(&path, options, report)?;
            }
        } else if file_type.is_file() && has_extension(&path, &options.extensions) {
            report.scanned += 1;
            let text = read_file(&path)?;
            let updated = apply_preamble(&text, &options.preamble);
            if updated != text {
                write_file(&path, &updated)?;
                report.rewritten += 1;
            }
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: &str = "/* license */\n\n";

    #[test]
    fn test_apply_adds_preamble() {
        assert_eq!(apply_preamble("int x;\n", SHORT), "/* license */\n\nint x;\n");
    }

    #[test]
    fn test_apply_removes_duplicates_and_banner() {
        let text = "/* license */\n\n/* license */\n\n//\n// Created by someone on 8/1/21.\n//\n\n#ifndef X_H\n#endif\n";
        assert_eq!(apply_preamble(text, SHORT), "/* license */\n\n#ifndef X_H\n#endif\n");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let text = "//\n// Created by a on b.\n//\n\n#include <x.h>\n";
        let once = apply_preamble(text, LABSTOR_PREAMBLE);
        let twice = apply_preamble(&once, LABSTOR_PREAMBLE);
        assert_eq!(once, twice);
        assert_eq!(once.matches("Copyright (C) 2022").count(), 1);
    }

    #[test]
    fn test_has_extension() {
        let exts = vec!["cc".to_string(), "h".to_string()];
        assert!(has_extension(Path::new("a/b.h"), &exts));
        assert!(has_extension(Path::new("a/b.cc"), &exts));
        assert!(!has_extension(Path::new("a/b.cpp"), &exts));
        assert!(!has_extension(Path::new("a/Makefile"), &exts));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_cycle_terminates() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("a.h"), "int a;\n").unwrap();
        fs::write(dir.path().join("b.cc"), "int b;\n").unwrap();
        symlink(dir.path(), sub.join("loop")).unwrap();
        symlink(dir.path().join("b.cc"), sub.join("b_link.cc")).unwrap();

        let options = PreambleOptions {
            preamble: SHORT.to_string(),
            ..PreambleOptions::default()
        };
        let report = inject_preamble(dir.path(), &options).unwrap();
        assert_eq!(report, PreambleReport { scanned: 2, rewritten: 2 });
        assert_eq!(fs::read_to_string(sub.join("a.h")).unwrap(), "/* license */\n\nint a;\n");

        let again = inject_preamble(dir.path(), &options).unwrap();
        assert_eq!(again, PreambleReport { scanned: 2, rewritten: 0 });
    }
}
