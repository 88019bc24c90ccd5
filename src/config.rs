use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::scoring::DEFAULT_TOP_K;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub max_candidates: usize,
    pub top_k: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_candidates: 20,
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub timeout_ms: u64,
    pub temperature: f64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            timeout_ms: 8000,
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub data_path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/community.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub engine: EngineSection,
    pub llm: LlmSection,
    pub store: StoreSection,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::from_toml(&contents)?
            }
            _ => EngineConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_parse::<usize>("PEER_MATCH_MAX_CANDIDATES") {
            self.engine.max_candidates = value;
        }
        if let Some(value) = env_parse::<usize>("PEER_MATCH_TOP_K") {
            self.engine.top_k = value;
        }
        if let Some(value) = env_parse::<u64>("PEER_MATCH_LLM_TIMEOUT_MS") {
            self.llm.timeout_ms = value;
        }
        if let Ok(path) = env::var("PEER_MATCH_DATA_PATH") {
            if !path.trim().is_empty() {
                self.store.data_path = PathBuf::from(path);
            }
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.trim().parse::<T>().ok())
}

fn default_config_path() -> Option<PathBuf> {
    env::var("PEER_MATCH_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/peer-match.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml("[engine]\nmax_candidates = 5\n").unwrap();
        assert_eq!(config.engine.max_candidates, 5);
        assert_eq!(config.engine.top_k, 10);
        assert_eq!(config.llm.timeout_ms, 8000);
        assert_eq!(config.store.data_path, PathBuf::from("data/community.json"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml("[engine\nmax_candidates = ").unwrap_err();
        assert!(err.starts_with("failed to parse config"));
    }
}
