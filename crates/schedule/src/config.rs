use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::anchor::AnchorTime;
use crate::pattern::{Pattern, ServiceId};

/// Schedule validation errors. All are fatal at load time; evaluation
/// itself never fails once a config has been constructed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("no default pattern: exactly one pattern must have `service_numbers: null`")]
    MissingDefault,

    #[error("multiple default patterns: `{first}` and `{second}` both have `service_numbers: null`")]
    MultipleDefaults { first: String, second: String },

    #[error("pattern `{pattern}` has no anchor times")]
    EmptyAnchors { pattern: String },

    #[error("pattern `{pattern}`: anchor {hours} is not on the 10-minute grid")]
    OffGridAnchor { pattern: String, hours: f64 },
}

// ── Raw YAML shape ────────────────────────────────────────────
//
// patterns:
//   first:
//     interval: [0.0, 4.5, 10.0, 15.5, 23.5]
//     service_numbers: [b001, b002]
//   default:
//     interval: [0.0, 12.0]
//     service_numbers: null

#[derive(Debug, Deserialize)]
struct RawSchedule {
    /// IndexMap keeps declaration order: resolution is first-match.
    patterns: IndexMap<String, RawPattern>,
}

#[derive(Debug, Deserialize)]
struct RawPattern {
    interval: Vec<f64>,
    service_numbers: Option<Vec<ServiceId>>,
}

/// Immutable, validated schedule configuration.
///
/// Loaded once at startup and shared read-only for the process lifetime;
/// evaluation only ever borrows it.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Declaration order, default pattern included.
    patterns: Vec<Pattern>,
    default_idx: usize,
}

impl ScheduleConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        info!(
            path = %path.display(),
            patterns = config.patterns.len(),
            "loaded schedule config"
        );
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let raw: RawSchedule = serde_yaml::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSchedule) -> Result<Self, ConfigError> {
        let mut patterns: Vec<Pattern> = Vec::with_capacity(raw.patterns.len());
        let mut default_idx = None;

        for (name, raw_pattern) in raw.patterns {
            let mut anchors = Vec::with_capacity(raw_pattern.interval.len());
            for hours in raw_pattern.interval {
                let anchor = AnchorTime::from_hours(hours).ok_or_else(|| {
                    ConfigError::OffGridAnchor {
                        pattern: name.clone(),
                        hours,
                    }
                })?;
                anchors.push(anchor);
            }
            // Normalize exactly once, here: ascending and unique.
            anchors.sort_unstable();
            anchors.dedup();
            if anchors.is_empty() {
                return Err(ConfigError::EmptyAnchors { pattern: name });
            }

            let services = raw_pattern
                .service_numbers
                .map(|ids| ids.into_iter().collect::<BTreeSet<_>>());

            if services.is_none() {
                match default_idx {
                    Some(idx) => {
                        let first: &Pattern = &patterns[idx];
                        return Err(ConfigError::MultipleDefaults {
                            first: first.name.clone(),
                            second: name,
                        });
                    }
                    None => default_idx = Some(patterns.len()),
                }
            }

            patterns.push(Pattern {
                name,
                anchors,
                services,
            });
        }

        let default_idx = default_idx.ok_or(ConfigError::MissingDefault)?;
        Ok(Self {
            patterns,
            default_idx,
        })
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn default_pattern(&self) -> &Pattern {
        &self.patterns[self.default_idx]
    }

    /// Map a service to its governing pattern: the first declared
    /// non-default pattern listing it, else the default.
    ///
    /// Declaration order keeps the result stable when two patterns claim
    /// the same service. Never fails; validation guarantees a default.
    pub fn resolve(&self, service: &ServiceId) -> &Pattern {
        self.patterns
            .iter()
            .filter(|pattern| !pattern.is_default())
            .find(|pattern| pattern.claims(service))
            .unwrap_or_else(|| self.default_pattern())
    }
}
