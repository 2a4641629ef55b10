//! Client settings.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CollectorError, Result};
use crate::types::{RetrieveOptions, WaitOptions, DEFAULT_PAGE_SIZE, DEFAULT_WAIT_BUDGET_SECS};

/// Tunables for retrieval paging and change polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorSettings {
    /// Max objects per retrieval page
    pub page_size: u32,
    /// Long-poll wait budget in seconds
    pub wait_budget_secs: u32,
    /// Max object updates per poll; zero or negative means unbounded
    pub max_updates_per_poll: i64,
    /// Ask the remote side for partial update sets on standing filters
    pub partial_updates: bool,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            wait_budget_secs: DEFAULT_WAIT_BUDGET_SECS,
            max_updates_per_poll: -1,
            partial_updates: false,
        }
    }
}

impl CollectorSettings {
    /// Load settings from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CollectorError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let settings: Self = serde_yaml::from_str(&content)
            .map_err(|e| CollectorError::InvalidConfig(format!("cannot parse {}: {}", path.display(), e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(CollectorError::InvalidConfig(
                "page_size must be positive".to_string(),
            ));
        }
        if self.wait_budget_secs == 0 {
            return Err(CollectorError::InvalidConfig(
                "wait_budget_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Retrieval options derived from these settings.
    pub fn retrieve_options(&self) -> RetrieveOptions {
        RetrieveOptions {
            max_objects: self.page_size,
        }
    }

    /// Wait options derived from these settings.
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_wait_budget(self.wait_budget_secs)
            .with_update_limit(self.max_updates_per_poll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = CollectorSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.page_size, 500);
        assert_eq!(settings.wait_budget_secs, 85);
        assert_eq!(settings.wait_options().max_object_updates, None);
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
page_size: 100
wait_budget_secs: 30
max_updates_per_poll: 25
partial_updates: true
"#;
        let settings: CollectorSettings = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(settings.page_size, 100);
        assert_eq!(settings.wait_budget_secs, 30);
        assert_eq!(settings.wait_options().max_object_updates, Some(25));
        assert!(settings.partial_updates);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let settings = CollectorSettings {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CollectorError::InvalidConfig(_))
        ));
    }
}
