//! Transformation policy: the per-run configuration that drives
//! classification.
//!
//! A policy is plain data. It is built once, then threaded by reference
//! through the driver and classifier; nothing mutates it during a run.
//!
//! Policies can be written in TOML:
//!
//! ```toml
//! keep_sync = ["search"]
//! exclude_methods = ["delete_all"]
//! async_methods = ["search", "upsert", "query"]
//! transport_marker = "aio"
//!
//! [class_replace_map]
//! QdrantRemote = "AsyncQdrantRemote"
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TransformError, TransformResult};

/// Substring marking a constructor field as bound only for the
/// non-blocking transport.
pub const DEFAULT_TRANSPORT_MARKER: &str = "aio";

/// Per-run transformation policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformationPolicy {
    /// Methods that stay blocking even when listed in `async_methods`.
    pub keep_sync: BTreeSet<String>,
    /// Methods dropped from the generated surface.
    pub exclude_methods: BTreeSet<String>,
    /// Methods eligible for conversion to the suspending convention.
    pub async_methods: BTreeSet<String>,
    /// Blocking type names and their non-blocking counterparts.
    pub class_replace_map: BTreeMap<String, String>,
    /// Substring that marks a constructor attribute as a non-blocking
    /// transport binding. Plain and annotated assignments to such
    /// attributes are removed from the constructor. Must not be empty.
    pub transport_marker: String,
}

impl Default for TransformationPolicy {
    fn default() -> Self {
        Self {
            keep_sync: BTreeSet::new(),
            exclude_methods: BTreeSet::new(),
            async_methods: BTreeSet::new(),
            class_replace_map: BTreeMap::new(),
            transport_marker: DEFAULT_TRANSPORT_MARKER.to_string(),
        }
    }
}

impl TransformationPolicy {
    /// An empty policy: converts nothing, excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keep_sync<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_sync.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_exclude_methods<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_methods.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_async_methods<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.async_methods.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_class_rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.class_replace_map.insert(from.into(), to.into());
        self
    }

    pub fn with_transport_marker(mut self, marker: impl Into<String>) -> Self {
        self.transport_marker = marker.into();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_methods.contains(name)
    }

    /// A method stays blocking when pinned by `keep_sync` or not listed in
    /// `async_methods`. `keep_sync` wins over `async_methods`.
    pub fn is_kept_sync(&self, name: &str) -> bool {
        self.keep_sync.contains(name) || !self.async_methods.contains(name)
    }

    /// Whether a call to `name` must suspend in converted code.
    pub fn is_suspending_target(&self, name: &str) -> bool {
        !self.is_kept_sync(name)
    }

    /// Non-blocking counterpart of a blocking type name, if one is mapped.
    pub fn renamed_class(&self, name: &str) -> Option<&str> {
        self.class_replace_map.get(name).map(String::as_str)
    }

    /// Whether an attribute name marks a non-blocking transport binding.
    pub fn is_transport_binding(&self, attr: &str) -> bool {
        attr.contains(self.transport_marker.as_str())
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Check the policy for values no run can use.
    pub fn validate(&self) -> TransformResult<()> {
        if self.transport_marker.is_empty() {
            return Err(TransformError::ConfigurationError(
                "transport_marker must not be empty".into(),
            ));
        }
        let sets = [
            ("keep_sync", &self.keep_sync),
            ("exclude_methods", &self.exclude_methods),
            ("async_methods", &self.async_methods),
        ];
        for (field, names) in sets {
            if names.iter().any(String::is_empty) {
                return Err(TransformError::ConfigurationError(format!(
                    "{} contains an empty method name",
                    field
                )));
            }
        }
        for (from, to) in &self.class_replace_map {
            if from.is_empty() || to.is_empty() {
                return Err(TransformError::ConfigurationError(format!(
                    "class_replace_map entry '{}' -> '{}' has an empty side",
                    from, to
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a policy from TOML text. Omitted fields default
    /// to empty.
    pub fn from_toml_str(contents: &str) -> TransformResult<Self> {
        let policy: Self =
            toml::from_str(contents).map_err(|e| TransformError::ConfigurationError(e.to_string()))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load a policy from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> TransformResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let policy = Self::from_toml_str(&contents)?;
        debug!(
            path = %path.display(),
            keep_sync = policy.keep_sync.len(),
            exclude = policy.exclude_methods.len(),
            convert = policy.async_methods.len(),
            "Loaded transformation policy"
        );
        Ok(policy)
    }
}
