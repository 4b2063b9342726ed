use std::path::PathBuf;

/// Startup settings taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// `ARMY_STORE_FILE`: JSON snapshot the content store is loaded from and written to.
    pub store_file: Option<PathBuf>,
    /// `ARMY_SEED_CATALOG`: install the demo units into an empty store.
    pub seed_catalog: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            store_file: None,
            seed_catalog: true,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_file = lookup("ARMY_STORE_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let seed_catalog = match lookup("ARMY_SEED_CATALOG") {
            Some(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"),
            None => true,
        };
        ServiceConfig {
            store_file,
            seed_catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> ServiceConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(config(&[]), ServiceConfig::default());
    }

    #[test]
    fn reads_store_file_and_seed_flag() {
        let cfg = config(&[
            ("ARMY_STORE_FILE", "/tmp/armies.json"),
            ("ARMY_SEED_CATALOG", "false"),
        ]);
        assert_eq!(cfg.store_file, Some(PathBuf::from("/tmp/armies.json")));
        assert!(!cfg.seed_catalog);
        assert!(config(&[("ARMY_SEED_CATALOG", "yes")]).seed_catalog);
        assert_eq!(config(&[("ARMY_STORE_FILE", " ")]).store_file, None);
    }
}
