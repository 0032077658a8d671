use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::ui::prelude::*;

pub const LSB_RELEASE_PATH: &str = "/etc/lsb-release";

/// Files that only exist when booted from the installation medium.
pub const LIVE_MARKERS: &[&str] = &["/bootmnt/manjaro", "/run/miso/bootmnt/manjaro"];

const VENDOR_PREFIX: &str = "DISTRIB_";

/// Shown when the distribution-info file lacks a field.
const MISSING_FIELD: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Bits64,
    Bits32,
}

impl Arch {
    /// Classify the machine field reported by `uname`.
    ///
    /// Any reported machine type counts as 64-bit; only an empty one does not.
    pub fn from_machine(machine: &str) -> Self {
        if machine.trim().is_empty() {
            Self::Bits32
        } else {
            Self::Bits64
        }
    }

    pub fn detect() -> Self {
        match nix::sys::utsname::uname() {
            Ok(uts) => Self::from_machine(&uts.machine().to_string_lossy()),
            Err(e) => {
                emit(
                    Level::Warn,
                    "distro.uname.error",
                    &format!("Failed to query machine type: {}", e),
                    None,
                );
                Self::Bits32
            }
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits64 => write!(f, "64-bit"),
            Self::Bits32 => write!(f, "32-bit"),
        }
    }
}

/// What the header bar says about the running system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub codename: String,
    pub release: String,
    pub arch: Arch,
    pub live: bool,
}

impl SystemInfo {
    /// Gather system information from the standard locations.
    pub fn detect() -> Self {
        let lsb = read_distrib_info(Path::new(LSB_RELEASE_PATH));
        let markers: Vec<&Path> = LIVE_MARKERS.iter().map(Path::new).collect();
        Self::from_parts(&lsb, Arch::detect(), is_live(&markers))
    }

    pub fn from_parts(lsb: &BTreeMap<String, String>, arch: Arch, live: bool) -> Self {
        let field = |key: &str| {
            lsb.get(key)
                .cloned()
                .unwrap_or_else(|| MISSING_FIELD.to_string())
        };

        Self {
            codename: field("CODENAME"),
            release: field("RELEASE"),
            arch,
            live,
        }
    }

    /// Header bar subtitle, e.g. `Stable 17.0 64-bit`.
    pub fn subtitle(&self) -> String {
        format!("{} {} {}", self.codename, self.release, self.arch)
    }
}

/// Whether any of the live medium markers exists.
pub fn is_live(markers: &[&Path]) -> bool {
    markers.iter().any(|marker| marker.exists())
}

/// Read a distribution-info file into a variable → value map.
///
/// An unreadable file is reported and treated as empty.
pub fn read_distrib_info(path: &Path) -> BTreeMap<String, String> {
    match fs::read_to_string(path) {
        Ok(content) => parse_distrib_info(&content),
        Err(e) => {
            emit(
                Level::Error,
                "distro.lsb.read_error",
                &format!("Failed to read {}: {}", path.display(), e),
                None,
            );
            BTreeMap::new()
        }
    }
}

/// Parse `VAR=value` lines, dropping the `DISTRIB_` prefix and one level of quoting.
pub fn parse_distrib_info(content: &str) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();

    for line in content.lines() {
        let Some((var, value)) = line.trim_end().split_once('=') else {
            continue;
        };

        let var = var.strip_prefix(VENDOR_PREFIX).unwrap_or(var);
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        if !value.is_empty() {
            vars.insert(var.to_string(), value.to_string());
        }
    }

    vars
}
