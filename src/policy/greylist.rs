//! Greylisted configure probes.
//!
//! Some programs are found by nearly every configure script whether the
//! build needs them or not. A found path matching a greylist entry is
//! ignored unless a file next to `config.log` shows the build really
//! asked for it.

use super::config_log::LogLines;
use super::exceptions::compile_prefix_pattern;
use crate::config::{CorroborationConfig, GreylistEntryConfig, MacroTable};
use crate::error::{BuildReqsError, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The built-in greylist, before macro expansion.
pub fn default_entries() -> Vec<GreylistEntryConfig> {
    fn entry(path: &str, corroborate: &[(&str, &str)]) -> GreylistEntryConfig {
        GreylistEntryConfig {
            path: path.to_string(),
            corroborate: corroborate
                .iter()
                .map(|(file, pattern)| CorroborationConfig {
                    file: file.to_string(),
                    pattern: pattern.to_string(),
                })
                .collect(),
        }
    }

    vec![
        entry("%(prefix)s/X11R6/bin/makedepend", &[]),
        entry(
            "%(bindir)s/g77",
            &[
                ("configure.ac", r"\s*AC_PROG_F77"),
                ("configure.in", r"\s*AC_PROG_F77"),
            ],
        ),
        entry(
            "%(bindir)s/bison",
            &[
                ("configure.ac", r"\s*(AC_PROG_YACC|AC_PROC_YACC)"),
                ("configure.in", r"\s*(AC_PROG_YACC|YACC=)"),
            ],
        ),
    ]
}

#[derive(Debug)]
struct Corroboration {
    file: String,
    pattern: Regex,
}

#[derive(Debug)]
struct GreylistEntry {
    path: String,
    corroborate: Vec<Corroboration>,
}

/// A compiled greylist.
#[derive(Debug, Default)]
pub struct Greylist {
    entries: Vec<GreylistEntry>,
}

impl Greylist {
    /// Expand macros and compile every entry.
    ///
    /// Paths are compared literally after expansion; only corroboration
    /// patterns are regular expressions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGreylist` for an empty path or a corroboration file
    /// that is empty or absolute, `InvalidPattern` for a corroboration
    /// pattern that does not compile, and `UnresolvedMacro` for unknown
    /// macros.
    pub fn compile(entries: &[GreylistEntryConfig], macros: &MacroTable) -> Result<Self> {
        let mut compiled = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.path.trim().is_empty() {
                return Err(BuildReqsError::InvalidGreylist {
                    entry: entry.path.clone(),
                    message: "path is empty".to_string(),
                });
            }
            let path = macros.expand(&entry.path)?;

            let mut corroborate = Vec::with_capacity(entry.corroborate.len());
            for pair in &entry.corroborate {
                if pair.file.is_empty() || Path::new(&pair.file).is_absolute() {
                    return Err(BuildReqsError::InvalidGreylist {
                        entry: entry.path.clone(),
                        message: format!(
                            "corroboration file '{}' must be relative to config.log",
                            pair.file
                        ),
                    });
                }
                corroborate.push(Corroboration {
                    file: pair.file.clone(),
                    pattern: compile_prefix_pattern(&macros.expand(&pair.pattern)?)?,
                });
            }

            compiled.push(GreylistEntry { path, corroborate });
        }
        Ok(Self { entries: compiled })
    }

    /// The built-in greylist.
    pub fn builtin(macros: &MacroTable) -> Result<Self> {
        Self::compile(&default_entries(), macros)
    }

    /// Whether `found` should be ignored for a log in `log_dir`.
    ///
    /// Only the first matching entry applies. A missing sibling file is no
    /// evidence.
    pub fn suppresses(&self, found: &str, log_dir: &Path) -> Result<bool> {
        let Some(entry) = self.entries.iter().find(|e| e.path == found) else {
            return Ok(false);
        };

        for pair in &entry.corroborate {
            let sibling = log_dir.join(&pair.file);
            let file = match File::open(&sibling) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if any_line_matches(BufReader::new(file), &pair.pattern)? {
                tracing::debug!(
                    path = found,
                    evidence = %sibling.display(),
                    "Greylisted path corroborated"
                );
                return Ok(false);
            }
        }

        tracing::debug!(path = found, entry = %entry.path, "Greylisted path suppressed");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read lines from `reader` until `pattern` matches one.
fn any_line_matches<R: BufRead>(reader: R, pattern: &Regex) -> Result<bool> {
    for line in LogLines::new(reader) {
        if pattern.is_match(&line?) {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn builtin() -> Greylist {
        Greylist::builtin(&MacroTable::with_defaults()).unwrap()
    }

    #[test]
    fn builtin_expands_macros() {
        let greylist = builtin();
        assert_eq!(greylist.len(), 3);
        let temp = TempDir::new().unwrap();
        assert!(greylist.suppresses("/usr/X11R6/bin/makedepend", temp.path()).unwrap());
    }

    #[test]
    fn unlisted_paths_pass() {
        let temp = TempDir::new().unwrap();
        assert!(!builtin().suppresses("/usr/bin/gcc", temp.path()).unwrap());
    }

    #[test]
    fn suspect_must_match_whole_path() {
        let temp = TempDir::new().unwrap();
        assert!(!builtin().suppresses("/usr/bin/bison2", temp.path()).unwrap());
    }

    #[test]
    fn uncorroborated_suspect_is_suppressed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("configure.ac"), "AC_INIT([foo])\nAC_PROG_CC\n").unwrap();
        assert!(builtin().suppresses("/usr/bin/bison", temp.path()).unwrap());
    }

    #[test]
    fn corroborated_suspect_is_kept() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("configure.ac"), "AC_INIT([foo])\n  AC_PROG_YACC\n").unwrap();
        assert!(!builtin().suppresses("/usr/bin/bison", temp.path()).unwrap());
    }

    #[test]
    fn later_corroboration_file_counts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("configure.in"), "YACC=bison\n").unwrap();
        assert!(!builtin().suppresses("/usr/bin/bison", temp.path()).unwrap());
    }

    #[test]
    fn pattern_matches_from_line_start() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("configure.ac"), "dnl AC_PROG_F77\n").unwrap();
        assert!(builtin().suppresses("/usr/bin/g77", temp.path()).unwrap());
    }

    #[test]
    fn paths_are_matched_literally() {
        let entries = vec![
            GreylistEntryConfig {
                path: "%(bindir)s/g++".to_string(),
                corroborate: vec![],
            },
            GreylistEntryConfig {
                path: "%(bindir)s/python2.7".to_string(),
                corroborate: vec![],
            },
        ];
        let greylist = Greylist::compile(&entries, &MacroTable::with_defaults()).unwrap();
        let temp = TempDir::new().unwrap();
        assert!(greylist.suppresses("/usr/bin/g++", temp.path()).unwrap());
        assert!(greylist.suppresses("/usr/bin/python2.7", temp.path()).unwrap());
        assert!(!greylist.suppresses("/usr/bin/python2x7", temp.path()).unwrap());
    }

    #[test]
    fn invalid_corroboration_pattern_is_rejected() {
        let entries = vec![GreylistEntryConfig {
            path: "/usr/bin/flex".to_string(),
            corroborate: vec![CorroborationConfig {
                file: "configure.ac".to_string(),
                pattern: "AC_PROG_LEX[".to_string(),
            }],
        }];
        let err = Greylist::compile(&entries, &MacroTable::new()).unwrap_err();
        assert!(matches!(err, BuildReqsError::InvalidPattern { .. }));
    }

    #[test]
    fn empty_path_is_rejected() {
        let entries = vec![GreylistEntryConfig {
            path: " ".to_string(),
            corroborate: vec![],
        }];
        let err = Greylist::compile(&entries, &MacroTable::new()).unwrap_err();
        assert!(matches!(err, BuildReqsError::InvalidGreylist { .. }));
    }

    #[test]
    fn absolute_corroboration_file_is_rejected() {
        let entries = vec![GreylistEntryConfig {
            path: "/usr/bin/flex".to_string(),
            corroborate: vec![CorroborationConfig {
                file: "/etc/passwd".to_string(),
                pattern: "root".to_string(),
            }],
        }];
        let err = Greylist::compile(&entries, &MacroTable::new()).unwrap_err();
        assert!(matches!(err, BuildReqsError::InvalidGreylist { .. }));
    }
}
