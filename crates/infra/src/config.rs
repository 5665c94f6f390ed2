//! Store configuration and environment loading.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::event_table::DEFAULT_TABLE_CAPACITY;

/// Default file name, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "causal.cdb";

/// How the in-memory table is populated at open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Ids 1, 2, 3, ... until the first missing one.
    #[default]
    ContiguousPrefix,
    /// Every row in write order, up to capacity.
    FullScan,
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prefix" | "contiguous" | "contiguous-prefix" => Ok(Self::ContiguousPrefix),
            "full" | "full-scan" | "scan" => Ok(Self::FullScan),
            other => Err(format!("unknown load policy '{other}' (expected prefix or full)")),
        }
    }
}

/// Configuration for an [`EventStore`](crate::EventStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Event file location.
    pub path: PathBuf,
    /// Maximum number of events mirrored in memory.
    pub table_capacity: usize,
    /// Table population strategy.
    pub load_policy: LoadPolicy,
    /// Whether to `sync_data` after every append.
    pub sync_on_write: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DB_PATH),
            table_capacity: DEFAULT_TABLE_CAPACITY,
            load_policy: LoadPolicy::default(),
            sync_on_write: true,
        }
    }
}

/// Optional values layered over a [`StoreConfig`], typically command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOverrides {
    pub path: Option<PathBuf>,
    pub table_capacity: Option<usize>,
    pub load_policy: Option<LoadPolicy>,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_table_capacity(mut self, capacity: usize) -> Self {
        self.table_capacity = capacity;
        self
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    pub fn with_sync_on_write(mut self, sync: bool) -> Self {
        self.sync_on_write = sync;
        self
    }

    /// Replace every field that `overrides` sets; unset fields are kept.
    pub fn with_overrides(mut self, overrides: StoreOverrides) -> Self {
        if let Some(path) = overrides.path {
            self.path = path;
        }
        if let Some(capacity) = overrides.table_capacity {
            self.table_capacity = capacity;
        }
        if let Some(policy) = overrides.load_policy {
            self.load_policy = policy;
        }
        self
    }

    /// Read `CAUSALDB_PATH`, `CAUSALDB_TABLE_CAPACITY`, `CAUSALDB_LOAD_POLICY` and
    /// `CAUSALDB_SYNC` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    /// Unparseable values keep the default and log a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("CAUSALDB_PATH").filter(|p| !p.trim().is_empty()) {
            config.path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("CAUSALDB_TABLE_CAPACITY") {
            match raw.trim().parse::<usize>() {
                Ok(capacity) => config.table_capacity = capacity,
                Err(e) => warn!(value = %raw, error = %e, "invalid CAUSALDB_TABLE_CAPACITY; using default"),
            }
        }

        if let Some(raw) = lookup("CAUSALDB_LOAD_POLICY") {
            match raw.parse::<LoadPolicy>() {
                Ok(policy) => config.load_policy = policy,
                Err(e) => warn!(error = %e, "invalid CAUSALDB_LOAD_POLICY; using default"),
            }
        }

        if let Some(raw) = lookup("CAUSALDB_SYNC") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.sync_on_write = true,
                "0" | "false" | "no" | "off" => config.sync_on_write = false,
                _ => warn!(value = %raw, "invalid CAUSALDB_SYNC; using default"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_replace_only_set_fields() {
        let base = StoreConfig::from_lookup(lookup_from(&[
            ("CAUSALDB_PATH", "/env/causal.cdb"),
            ("CAUSALDB_TABLE_CAPACITY", "50"),
            ("CAUSALDB_SYNC", "0"),
        ]));

        let config = base.clone().with_overrides(StoreOverrides {
            table_capacity: Some(5),
            load_policy: Some(LoadPolicy::FullScan),
            ..StoreOverrides::default()
        });
        assert_eq!(config.path, PathBuf::from("/env/causal.cdb"));
        assert_eq!(config.table_capacity, 5);
        assert_eq!(config.load_policy, LoadPolicy::FullScan);
        assert!(!config.sync_on_write);

        assert_eq!(base.clone().with_overrides(StoreOverrides::default()), base);
    }

    #[test]
    fn defaults_point_at_causal_cdb() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from("causal.cdb"));
        assert_eq!(config.table_capacity, 1000);
        assert_eq!(config.load_policy, LoadPolicy::ContiguousPrefix);
        assert!(config.sync_on_write);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("CAUSALDB_PATH", "/tmp/events.cdb"),
            ("CAUSALDB_TABLE_CAPACITY", "5"),
            ("CAUSALDB_LOAD_POLICY", "full"),
            ("CAUSALDB_SYNC", "off"),
        ]));

        assert_eq!(config.path, PathBuf::from("/tmp/events.cdb"));
        assert_eq!(config.table_capacity, 5);
        assert_eq!(config.load_policy, LoadPolicy::FullScan);
        assert!(!config.sync_on_write);
    }

    #[test]
    fn invalid_env_values_fall_back() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("CAUSALDB_TABLE_CAPACITY", "lots"),
            ("CAUSALDB_LOAD_POLICY", "sideways"),
            ("CAUSALDB_SYNC", "maybe"),
        ]));

        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn load_policy_parses_aliases() {
        assert_eq!("Prefix".parse::<LoadPolicy>().unwrap(), LoadPolicy::ContiguousPrefix);
        assert_eq!("full-scan".parse::<LoadPolicy>().unwrap(), LoadPolicy::FullScan);
        assert!("".parse::<LoadPolicy>().is_err());
    }
}
