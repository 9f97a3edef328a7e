//! Version tag classification.
//!
//! Tags are matched against `v?MAJOR(.MINOR)?(.PATCH)?(-SUFFIX)?`. Anything
//! else is classified as [`ReleaseType::Unknown`] with no version components;
//! a malformed tag is never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::ReleaseType;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-(.+))?$").expect("version pattern compiles")
});

/// Version components parsed from a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub major: Option<u64>,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    pub release_type: ReleaseType,
}

impl VersionInfo {
    /// The classification for tags that are not versions.
    pub const UNKNOWN: VersionInfo = VersionInfo {
        major: None,
        minor: None,
        patch: None,
        release_type: ReleaseType::Unknown,
    };
}

/// Classify a release tag.
///
/// A suffix always wins (`pre-release`), then the most specific numeric
/// component present decides between `major`, `minor` and `patch`.
pub fn classify(tag: &str) -> VersionInfo {
    let Some(caps) = VERSION_PATTERN.captures(tag) else {
        return VersionInfo::UNKNOWN;
    };

    // Components too large for u64 are treated as a non-version tag.
    let component = |i: usize| caps.get(i).map(|m| m.as_str().parse::<u64>());
    let major = match component(1) {
        Some(Ok(major)) => major,
        _ => return VersionInfo::UNKNOWN,
    };
    let (minor, patch) = match (component(2).transpose(), component(3).transpose()) {
        (Ok(minor), Ok(patch)) => (minor, patch),
        _ => return VersionInfo::UNKNOWN,
    };
    let has_suffix = caps.get(4).is_some();

    let release_type = if has_suffix {
        ReleaseType::PreRelease
    } else {
        match (minor, patch) {
            (None, None) => ReleaseType::Major,
            (Some(_), None) => ReleaseType::Minor,
            _ => ReleaseType::Patch,
        }
    };

    VersionInfo {
        major: Some(major),
        minor,
        patch,
        release_type,
    }
}
