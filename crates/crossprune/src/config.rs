//! Effective settings, layered: built-in defaults, then a TOML file, then
//! environment variables. CLI flags are applied last by the binary.

use crate::classify::{ExclusionPolicy, PartialAccessPolicy};
use crate::error::{CrossPruneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Tag applied to reclaimable torrents.
    pub label: String,
    pub exclude_tags: BTreeSet<String>,
    pub exclude_categories: BTreeSet<String>,
    pub include_categories: BTreeSet<String>,
    pub min_age_days: u32,
    pub dry_run: bool,
    pub partial_access: PartialAccessPolicy,
    /// Cron expression; unset means a single run.
    pub schedule: Option<String>,
    pub run_on_start: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            username: "admin".to_string(),
            password: String::new(),
            label: "cross-seed-only".to_string(),
            exclude_tags: split_set("pinned,keep"),
            exclude_categories: BTreeSet::new(),
            include_categories: BTreeSet::new(),
            min_age_days: 0,
            dry_run: true,
            partial_access: PartialAccessPolicy::Reclaim,
            schedule: None,
            run_on_start: true,
            log_file: None,
        }
    }
}

impl Settings {
    /// Defaults, then `config_override` (or the XDG config file if present),
    /// then the process environment.
    pub fn load(config_override: Option<&Path>) -> Result<Self> {
        let config_path = match config_override {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        let mut settings = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        settings.apply_env();
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CrossPruneError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CrossPruneError::Config(format!("Failed to parse config TOML: {}", e)))
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overrides fields from `lookup`. Empty or unparseable values keep the
    /// current setting.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("QB_HOST") {
            self.host = v;
        }
        if let Some(port) = var("QB_PORT").and_then(|v| v.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(v) = var("QB_USERNAME") {
            self.username = v;
        }
        if let Some(v) = var("QB_PASSWORD") {
            self.password = v;
        }
        if let Some(v) = var("TAG_REMOVABLE") {
            self.label = v.trim().to_string();
        }
        if let Some(v) = var("EXCLUDE_TAGS") {
            self.exclude_tags = split_set(&v);
        }
        if let Some(v) = var("EXCLUDE_CATEGORIES") {
            self.exclude_categories = split_set(&v);
        }
        if let Some(v) = var("INCLUDE_CATEGORIES") {
            self.include_categories = split_set(&v);
        }
        if let Some(days) = var("MIN_AGE_DAYS").and_then(|v| v.trim().parse().ok()) {
            self.min_age_days = days;
        }
        if let Some(dry_run) = var("DRY_RUN").as_deref().and_then(parse_bool) {
            self.dry_run = dry_run;
        }
        if let Some(policy) =
            var("PARTIAL_ACCESS").and_then(|v| PartialAccessPolicy::from_str(&v).ok())
        {
            self.partial_access = policy;
        }
        if let Some(v) = var("SCHEDULE") {
            self.schedule = Some(v.trim().to_string());
        }
        if let Some(run_on_start) = var("RUN_ON_START").as_deref().and_then(parse_bool) {
            self.run_on_start = run_on_start;
        }
        if let Some(v) = var("LOG_FILE") {
            self.log_file = Some(PathBuf::from(v));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(CrossPruneError::Config("Label cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(CrossPruneError::Config("Port cannot be 0".to_string()));
        }
        Ok(())
    }

    /// Base URL of the WebUI. A host that already carries a scheme keeps it.
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}:{}", host, self.port)
        } else {
            format!("http://{}:{}", host, self.port)
        }
    }

    pub fn exclusion_policy(&self) -> ExclusionPolicy {
        ExclusionPolicy {
            exclude_tags: self.exclude_tags.iter().cloned().collect(),
            exclude_categories: self.exclude_categories.iter().cloned().collect(),
            include_categories: self.include_categories.iter().cloned().collect(),
            min_age: None,
        }
        .with_min_age_days(self.min_age_days)
    }

    /// Copy safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.password.is_empty() {
            copy.password = "********".to_string();
        }
        copy
    }
}

fn default_config_path() -> Option<PathBuf> {
    BaseDirectories::with_prefix("crossprune")
        .ok()
        .and_then(|xdg| xdg.find_config_file("crossprune.toml"))
}

/// Comma-separated values, trimmed, empties dropped.
pub fn split_set(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
