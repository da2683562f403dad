//! RPM-style file manifests.
//!
//! Some build systems describe what the filesystem cannot hold by itself
//! (setuid bits on files built by an unprivileged user, ownership, device
//! nodes) in an RPM `%files` manifest:
//!
//! ```text
//! %attr(04755, root, root) /usr/bin/ping
//! %attr(0640, root, mail) /var/spool/mail
//! %attr(0660, root, disk) %dev(b, 8, 0) /dev/sda
//! %dir /usr/share/foo
//! ```
//!
//! Each line is turned into the packaging actions it implies. `%dir` and
//! `%defattr` carry nothing packaging needs and are skipped, as are bare
//! paths.

use crate::error::{BuildReqsError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Mode bits that are not collected from the filesystem.
const SETID_BITS: u32 = 0o6000;

/// Kind of device node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Block,
    Char,
}

/// A packaging action a manifest line asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ManifestAction {
    /// Keep setuid/setgid bits on a path.
    SetModes { path: PathBuf, mode: u32 },
    /// Non-root ownership for a path.
    Ownership {
        path: PathBuf,
        owner: String,
        group: String,
    },
    /// Create a device node.
    MakeDevice {
        path: PathBuf,
        kind: DeviceKind,
        major: u32,
        minor: u32,
        owner: String,
        group: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mode: Option<u32>,
    },
}

/// Read and parse a manifest file.
///
/// # Errors
///
/// Returns `InputNotFound` if the file does not exist and
/// `ManifestParseError` for the first malformed line.
pub fn load_manifest(path: &Path) -> Result<Vec<ManifestAction>> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BuildReqsError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => BuildReqsError::Io(e),
    })?;
    let actions = parse_manifest(&content, path)?;
    tracing::debug!(path = %path.display(), actions = actions.len(), "Parsed manifest");
    Ok(actions)
}

/// Parse manifest text. `path` is only used in error messages.
pub fn parse_manifest(content: &str, path: &Path) -> Result<Vec<ManifestAction>> {
    let mut actions = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let fail = |message: String| BuildReqsError::ManifestParseError {
            path: path.to_path_buf(),
            line: index + 1,
            message,
        };

        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("%dir") || line.starts_with("%defattr(") || !line.starts_with('%') {
            continue;
        }
        let Some(rest) = line.strip_prefix("%attr(") else {
            return Err(fail(format!("unsupported directive '{}'", line)));
        };

        let (attr, rest) = rest
            .split_once(')')
            .ok_or_else(|| fail("unterminated %attr(".to_string()))?;
        let (mode, owner, group) = parse_attr(attr).map_err(fail)?;
        let rest = rest.trim();

        if let Some(dev) = rest.strip_prefix("%dev(") {
            let (dev_fields, target) = dev
                .split_once(')')
                .ok_or_else(|| fail("unterminated %dev(".to_string()))?;
            let (kind, major, minor) = parse_dev(dev_fields).map_err(fail)?;
            let target = target.trim();
            if target.is_empty() {
                return Err(fail("device has no path".to_string()));
            }
            actions.push(ManifestAction::MakeDevice {
                path: PathBuf::from(target),
                kind,
                major,
                minor,
                owner,
                group,
                mode,
            });
            continue;
        }

        if rest.starts_with("%dir") {
            continue;
        }
        if rest.is_empty() {
            return Err(fail("%attr has no path".to_string()));
        }

        let target = PathBuf::from(rest);
        if let Some(mode) = mode.filter(|m| m & SETID_BITS != 0) {
            actions.push(ManifestAction::SetModes {
                path: target.clone(),
                mode,
            });
        }
        if owner != "root" || group != "root" {
            actions.push(ManifestAction::Ownership {
                path: target,
                owner,
                group,
            });
        }
    }
    Ok(actions)
}

/// `perms, owner, group`; `-` means the default.
fn parse_attr(attr: &str) -> std::result::Result<(Option<u32>, String, String), String> {
    let fields: Vec<&str> = attr.split(',').map(str::trim).collect();
    let [perms, owner, group] = fields[..] else {
        return Err(format!("expected 3 %attr fields, found {}", fields.len()));
    };
    let mode = match perms {
        "-" => None,
        _ => Some(
            u32::from_str_radix(perms, 8).map_err(|_| format!("invalid mode '{}'", perms))?,
        ),
    };
    let name = |field: &str| match field {
        "-" | "" => "root".to_string(),
        other => other.to_string(),
    };
    Ok((mode, name(owner), name(group)))
}

/// `type, major, minor`.
fn parse_dev(fields: &str) -> std::result::Result<(DeviceKind, u32, u32), String> {
    let fields: Vec<&str> = fields.split(',').map(str::trim).collect();
    let [kind, major, minor] = fields[..] else {
        return Err(format!("expected 3 %dev fields, found {}", fields.len()));
    };
    let kind = match kind {
        "b" => DeviceKind::Block,
        "c" => DeviceKind::Char,
        other => return Err(format!("unknown device type '{}'", other)),
    };
    let number = |field: &str| {
        field
            .parse::<u32>()
            .map_err(|_| format!("invalid device number '{}'", field))
    };
    Ok((kind, number(major)?, number(minor)?))
}
