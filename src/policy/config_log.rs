//! config.log enforcement.
//!
//! Autoconf records every program it finds as `checking ...: found
//! /usr/bin/foo`. A program configure found is very likely used by the
//! build, so the component owning it belongs in the build requirements
//! unless something already declared pulls it in.

use super::class::Severity;
use super::greylist::Greylist;
use crate::config::{ConfigLogSettings, MacroTable};
use crate::database::ComponentDatabase;
use crate::deps::PackageComponent;
use crate::error::{BuildReqsError, Result};
use crate::output::Finding;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// Name used for config.log findings.
pub const CONFIG_LOG_POLICY: &str = "EnforceConfigLogBuildRequirements";

/// A line recording a program configure found.
static FOUND_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^ ]+: found (/([^ ]+)?bin/[^ ]+)$").unwrap());

/// Lines of a text stream, decoded lossily and without line terminators.
///
/// Logs are streamed rather than loaded whole; bytes that are not UTF-8
/// never abort a scan.
pub struct LogLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                    if self.buf.ends_with(b"\r") {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// The found path recorded on `line`, if any.
pub fn found_path(line: &str) -> Option<&str> {
    FOUND_LINE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Every `config.log` under `build_dir`, in path order.
pub fn discover_logs(build_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in WalkDir::new(build_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| BuildReqsError::Other(e.into()))?;
        if entry.file_type().is_file() && entry.file_name() == "config.log" {
            logs.push(entry.into_path());
        }
    }
    tracing::debug!(dir = %build_dir.display(), logs = logs.len(), "Discovered config logs");
    Ok(logs)
}

/// One found path and the components that should cover it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSuggestion {
    pub path: String,
    pub components: BTreeSet<String>,
}

/// Outcome of the config.log enforcer.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigLogReport {
    pub policy: String,
    pub severity: Severity,
    pub logs: Vec<PathBuf>,
    pub suggestions: Vec<PathSuggestion>,
    /// Every suggested component, coalesced.
    pub missing: BTreeSet<String>,
}

impl ConfigLogReport {
    fn new(severity: Severity) -> Self {
        Self {
            policy: CONFIG_LOG_POLICY.to_string(),
            severity,
            logs: Vec::new(),
            suggestions: Vec::new(),
            missing: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    /// Per-path findings followed by the coalesced suggestion.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings: Vec<Finding> = self
            .suggestions
            .iter()
            .map(|s| {
                let names: Vec<&str> = s.components.iter().map(String::as_str).collect();
                Finding::new(
                    self.policy.clone(),
                    self.severity,
                    format!("path {} suggests buildRequires: {}", s.path, names.join(", ")),
                )
                .with_path(PathBuf::from(&s.path))
            })
            .collect();

        if !self.missing.is_empty() {
            let names: Vec<&str> = self.missing.iter().map(String::as_str).collect();
            findings.push(Finding::new(
                self.policy.clone(),
                self.severity,
                format!("Probably add to buildRequires: {}", names.join(", ")),
            ));
        }
        findings
    }
}

/// Scans configure logs for programs the build used.
pub struct ConfigLogScanner {
    path_exceptions: BTreeSet<String>,
    component_exceptions: BTreeSet<String>,
    greylist: Greylist,
    severity: Severity,
}

impl ConfigLogScanner {
    /// Build a scanner.
    ///
    /// Exceptions containing `/` name found paths; all others name
    /// components. The package's own components are always excepted.
    pub fn new(
        settings: &ConfigLogSettings,
        macros: &MacroTable,
        own_components: &BTreeSet<String>,
        severity: Severity,
    ) -> Result<Self> {
        let mut path_exceptions = BTreeSet::new();
        let mut component_exceptions = own_components.clone();
        for raw in &settings.exceptions {
            let exception = macros.expand(raw)?;
            if exception.contains('/') {
                path_exceptions.insert(exception);
            } else {
                component_exceptions.insert(exception);
            }
        }

        let greylist = match &settings.greylist {
            Some(entries) => Greylist::compile(entries, macros)?,
            None => Greylist::builtin(macros)?,
        };

        Ok(Self {
            path_exceptions,
            component_exceptions,
            greylist,
            severity,
        })
    }

    /// Found paths recorded in a log stream, minus path exceptions.
    pub fn scan_reader<R: BufRead>(&self, reader: R) -> Result<BTreeSet<String>> {
        let mut found = BTreeSet::new();
        for line in LogLines::new(reader) {
            let line = line?;
            if let Some(path) = found_path(&line) {
                if !self.path_exceptions.contains(path) {
                    found.insert(path.to_string());
                }
            }
        }
        Ok(found)
    }

    /// Scan one log and drop greylisted paths lacking corroboration.
    ///
    /// # Errors
    ///
    /// Returns `InputNotFound` if the log does not exist.
    pub fn scan_log(&self, log: &Path) -> Result<BTreeSet<String>> {
        let file = File::open(log).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => BuildReqsError::InputNotFound {
                path: log.to_path_buf(),
            },
            _ => BuildReqsError::Io(e),
        })?;
        let found = self.scan_reader(BufReader::new(file))?;

        let log_dir = log.parent().unwrap_or_else(|| Path::new("."));
        let mut kept = BTreeSet::new();
        for path in found {
            if !self.greylist.suppresses(&path, log_dir)? {
                kept.insert(path);
            }
        }

        tracing::debug!(log = %log.display(), found = kept.len(), "Scanned config log");
        Ok(kept)
    }

    /// Scan every log and report owners of found paths that nothing
    /// declared covers.
    ///
    /// Coverage is the declared components plus everything they pull in
    /// transitively.
    pub fn check(
        &self,
        logs: &[PathBuf],
        db: &dyn ComponentDatabase,
        declared: &[&PackageComponent],
    ) -> Result<ConfigLogReport> {
        let mut report = ConfigLogReport::new(self.severity);
        report.logs = logs.to_vec();

        let mut found = BTreeSet::new();
        for log in logs {
            found.extend(self.scan_log(log)?);
        }
        if found.is_empty() {
            return Ok(report);
        }

        let mut requires = Vec::with_capacity(declared.len());
        for component in declared {
            let mut needs = db.requires_of(&component.name)?;
            needs.union(&component.requires);
            requires.push(needs);
        }
        let closure = db.transitive_provides_closure(&requires)?;
        let mut covered: BTreeSet<String> = declared.iter().map(|c| c.name.clone()).collect();
        covered.extend(closure.components);

        for path in found {
            let owners: BTreeSet<String> = db
                .owners_of_path(Path::new(&path))?
                .into_iter()
                .filter(|owner| !self.component_exceptions.contains(owner))
                .filter(|owner| !covered.contains(owner))
                .collect();
            if owners.is_empty() {
                continue;
            }
            report.missing.extend(owners.iter().cloned());
            report.suggestions.push(PathSuggestion {
                path,
                components: owners,
            });
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDatabase;
    use crate::deps::Capability;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn scanner(exceptions: &[&str], own: &[&str]) -> ConfigLogScanner {
        let settings = ConfigLogSettings {
            exceptions: exceptions.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let own = own.iter().map(|s| s.to_string()).collect();
        ConfigLogScanner::new(&settings, &MacroTable::with_defaults(), &own, Severity::Warning)
            .unwrap()
    }

    fn cap(s: &str) -> Capability {
        s.parse().unwrap()
    }

    #[test]
    fn recognizes_found_lines() {
        assert_eq!(
            found_path("configure:1234: found /usr/bin/gcc"),
            Some("/usr/bin/gcc")
        );
        assert_eq!(found_path("configure:99: found /bin/sh"), Some("/bin/sh"));
        assert_eq!(found_path("configure:99: found /usr/lib/foo"), None);
        assert_eq!(found_path("checking for gcc... gcc"), None);
        assert_eq!(found_path("configure:1: found /usr/bin/gcc extra"), None);
    }

    #[test]
    fn log_lines_strip_terminators_and_survive_bad_bytes() {
        let data = b"one\r\ntwo\xff\nthree".to_vec();
        let lines: Vec<String> = LogLines::new(Cursor::new(data))
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "one");
        assert!(lines[1].starts_with("two"));
        assert_eq!(lines[2], "three");
    }

    #[test]
    fn path_exceptions_drop_found_paths() {
        let log = "configure:1: found /usr/bin/gcc\nconfigure:2: found /usr/bin/m4\n";
        let found = scanner(&["%(bindir)s/m4"], &[])
            .scan_reader(Cursor::new(log))
            .unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["/usr/bin/gcc"]);
    }

    #[test]
    fn missing_log_is_input_not_found() {
        let temp = TempDir::new().unwrap();
        let err = scanner(&[], &[])
            .scan_log(&temp.path().join("config.log"))
            .unwrap_err();
        assert!(matches!(err, BuildReqsError::InputNotFound { .. }));
    }

    #[test]
    fn greylist_uses_log_directory() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("config.log");
        fs::write(&log, "configure:5: found /usr/bin/bison\n").unwrap();
        assert!(scanner(&[], &[]).scan_log(&log).unwrap().is_empty());

        fs::write(temp.path().join("configure.ac"), "AC_PROC_YACC\n").unwrap();
        assert!(scanner(&[], &[]).scan_log(&log).unwrap().contains("/usr/bin/bison"));
    }

    #[test]
    fn discovers_nested_logs() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("sub/dir")).unwrap();
        fs::write(temp.path().join("config.log"), "").unwrap();
        fs::write(temp.path().join("sub/dir/config.log"), "").unwrap();
        fs::write(temp.path().join("sub/config.status"), "").unwrap();
        let logs = discover_logs(temp.path()).unwrap();
        assert_eq!(logs.len(), 2);
    }

    #[test]
    fn owners_covered_transitively_are_quiet() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("config.log");
        fs::write(
            &log,
            "configure:1: found /usr/bin/gcc\nconfigure:2: found /usr/bin/m4\n",
        )
        .unwrap();

        let db = MemoryDatabase::from_components(vec![
            PackageComponent::new("gcc:runtime").owning("/usr/bin/gcc"),
            PackageComponent::new("m4:runtime")
                .owning("/usr/bin/m4")
                .providing(cap("interpreter: /usr/bin/m4")),
        ]);
        let autoconf =
            PackageComponent::new("autoconf:runtime").requiring(cap("interpreter: /usr/bin/m4"));

        let report = scanner(&[], &[])
            .check(&[log], &db, &[&autoconf])
            .unwrap();
        assert_eq!(report.missing.into_iter().collect::<Vec<_>>(), vec!["gcc:runtime"]);
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].path, "/usr/bin/gcc");
    }

    #[test]
    fn installed_requirements_of_declared_names_count() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("config.log");
        fs::write(&log, "configure:1: found /usr/bin/m4\n").unwrap();

        let db = MemoryDatabase::from_components(vec![
            PackageComponent::new("autoconf:runtime").requiring(cap("interpreter: /usr/bin/m4")),
            PackageComponent::new("m4:runtime")
                .owning("/usr/bin/m4")
                .providing(cap("interpreter: /usr/bin/m4")),
        ]);
        let autoconf = PackageComponent::new("autoconf:runtime");

        let report = scanner(&[], &[])
            .check(&[log], &db, &[&autoconf])
            .unwrap();
        assert!(report.missing.is_empty());
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn own_components_are_never_suggested() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("config.log");
        fs::write(&log, "configure:1: found /usr/bin/foo-config\n").unwrap();
        let db = MemoryDatabase::from_components(vec![
            PackageComponent::new("foo:devel").owning("/usr/bin/foo-config")
        ]);

        let report = scanner(&[], &["foo:devel"]).check(&[log], &db, &[]).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn findings_list_paths_then_summary() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("config.log");
        fs::write(&log, "configure:1: found /usr/bin/gcc\n").unwrap();
        let db = MemoryDatabase::from_components(vec![
            PackageComponent::new("gcc:runtime").owning("/usr/bin/gcc")
        ]);

        let report = scanner(&[], &[]).check(&[log], &db, &[]).unwrap();
        let messages: Vec<String> = report.findings().into_iter().map(|f| f.message).collect();
        assert_eq!(
            messages,
            vec![
                "path /usr/bin/gcc suggests buildRequires: gcc:runtime",
                "Probably add to buildRequires: gcc:runtime",
            ]
        );
    }
}
