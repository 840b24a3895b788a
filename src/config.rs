//! Discovery settings, with overrides read from the environment.
//!
//! `FLOWER_MAX_GENERATIONS` caps the number of generations before
//! discovery gives up; `FLOWER_PARALLEL` turns the rayon-backed cross
//! enumeration on or off.

use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_MAX_GENERATIONS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Generations to run before reporting non-convergence.
    pub max_generations: usize,
    /// Breed pairs and run gene tests on the rayon thread pool.
    pub parallel: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_generations: DEFAULT_MAX_GENERATIONS,
            parallel: true,
        }
    }
}

impl DiscoveryConfig {
    /// Defaults overridden by `FLOWER_MAX_GENERATIONS` and
    /// `FLOWER_PARALLEL`. Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like `from_env`, reading settings through `lookup` instead of the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_generations: setting(&lookup, "FLOWER_MAX_GENERATIONS", |s| {
                usize::from_str(s).ok().filter(|&n| n > 0)
            })
            .unwrap_or(defaults.max_generations),
            parallel: setting(&lookup, "FLOWER_PARALLEL", parse_flag)
                .unwrap_or(defaults.parallel),
        }
    }
}

fn setting<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let value = lookup(name)?;
    let parsed = parse(value.trim());
    if parsed.is_none() {
        warn!(variable = name, value = %value, "ignoring invalid setting");
    }
    parsed
}

/// Reads an on/off switch such as `1`, `true`, `no` or `off`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
