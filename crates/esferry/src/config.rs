//! Configuration types for esferry.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main transfer configuration: one source, one sink, shared options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferConfig {
    /// Source cluster and index.
    pub source: SourceConfig,
    /// Destination: a remote index or a local JSONL directory.
    pub sink: SinkConfig,
    /// Transfer options.
    #[serde(default)]
    pub options: TransferOptions,
}

/// Source cluster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Cluster addresses, comma-separated (e.g. "http://es1:9200,http://es2:9200").
    pub hosts: String,
    /// Index to read from.
    pub index: String,
    /// Optional request body with the query to match (default: match-all).
    #[serde(default)]
    pub query: Option<serde_json::Value>,
}

/// Sink configuration, selected by the `type` tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SinkConfig {
    /// Write into an index on a destination cluster.
    #[serde(rename = "index")]
    Index(IndexSinkConfig),
    /// Write chunked JSONL files into a local directory.
    #[serde(rename = "jsonl")]
    Jsonl(JsonlSinkConfig),
}

/// Destination index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSinkConfig {
    /// Destination cluster addresses, comma-separated.
    pub hosts: String,
    /// Index to write to (created from the source schema if absent).
    pub index: String,
}

/// JSONL dump configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonlSinkConfig {
    /// Directory for the dump files (created if absent).
    #[serde(default = "default_dump_dir")]
    pub dir: PathBuf,
    /// Maximum documents per dump file.
    #[serde(default = "default_docs_per_file")]
    pub docs_per_file: usize,
}

/// Transfer options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOptions {
    /// Documents fetched per page request.
    #[serde(default = "default_docs_per_request")]
    pub docs_per_request: usize,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            docs_per_request: default_docs_per_request(),
        }
    }
}

fn default_dump_dir() -> PathBuf {
    PathBuf::from("./dumps")
}

fn default_docs_per_file() -> usize {
    100
}

fn default_docs_per_request() -> usize {
    10_000
}

impl TransferConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.source.index.is_empty() {
            return Err(Error::Config("source index cannot be empty".to_string()));
        }
        if self.options.docs_per_request == 0 {
            return Err(Error::Config(
                "docs_per_request must be greater than 0".to_string(),
            ));
        }
        if let Some(query) = &self.source.query {
            if !query.is_object() {
                return Err(Error::Config("query must be a JSON object".to_string()));
            }
        }
        match &self.sink {
            SinkConfig::Index(sink) => {
                if sink.index.is_empty() {
                    return Err(Error::Config(
                        "destination index cannot be empty".to_string(),
                    ));
                }
            }
            SinkConfig::Jsonl(sink) => {
                if sink.docs_per_file == 0 {
                    return Err(Error::Config(
                        "docs_per_file must be greater than 0".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(sink: SinkConfig) -> TransferConfig {
        TransferConfig {
            source: SourceConfig {
                hosts: "http://localhost:9200".to_string(),
                index: "products".to_string(),
                query: None,
            },
            sink,
            options: TransferOptions::default(),
        }
    }

    #[test]
    fn test_options_defaults() {
        let options = TransferOptions::default();
        assert_eq!(options.docs_per_request, 10_000);
    }

    #[test]
    fn test_jsonl_sink_defaults() {
        let yaml = "type: jsonl\n";
        let sink: SinkConfig = serde_yaml::from_str(yaml).unwrap();
        match sink {
            SinkConfig::Jsonl(cfg) => {
                assert_eq!(cfg.dir, PathBuf::from("./dumps"));
                assert_eq!(cfg.docs_per_file, 100);
            }
            SinkConfig::Index(_) => panic!("expected jsonl sink"),
        }
    }

    #[test]
    fn test_config_yaml_parse() {
        let yaml = r#"
source:
  hosts: http://localhost:9200
  index: products
sink:
  type: index
  hosts: http://localhost:9201
  index: products-copy
options:
  docs_per_request: 500
"#;
        let config: TransferConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.source.index, "products");
        assert_eq!(config.options.docs_per_request, 500);
        assert!(matches!(config.sink, SinkConfig::Index(_)));
    }

    #[test]
    fn test_config_yaml_parse_query() {
        let yaml = r#"
source:
  hosts: http://localhost:9200
  index: products
  query:
    query:
      term:
        status: active
sink:
  type: jsonl
  dir: ./out
"#;
        let config: TransferConfig = serde_yaml::from_str(yaml).unwrap();
        let query = config.source.query.expect("query should parse");
        assert_eq!(query["query"]["term"]["status"], "active");
    }

    #[test]
    fn test_validate_empty_source_index() {
        let mut config = base_config(SinkConfig::Jsonl(JsonlSinkConfig {
            dir: PathBuf::from("./dumps"),
            docs_per_file: 100,
        }));
        config.source.index = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = base_config(SinkConfig::Jsonl(JsonlSinkConfig {
            dir: PathBuf::from("./dumps"),
            docs_per_file: 100,
        }));
        config.options.docs_per_request = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_chunk_size() {
        let config = base_config(SinkConfig::Jsonl(JsonlSinkConfig {
            dir: PathBuf::from("./dumps"),
            docs_per_file: 0,
        }));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_non_object_query() {
        let mut config = base_config(SinkConfig::Jsonl(JsonlSinkConfig {
            dir: PathBuf::from("./dumps"),
            docs_per_file: 100,
        }));
        config.source.query = Some(serde_json::json!("match_all"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_destination_index() {
        let config = base_config(SinkConfig::Index(IndexSinkConfig {
            hosts: "http://localhost:9201".to_string(),
            index: String::new(),
        }));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        let config = base_config(SinkConfig::Index(IndexSinkConfig {
            hosts: "http://localhost:9201".to_string(),
            index: "products-copy".to_string(),
        }));
        assert!(config.validate().is_ok());
    }
}
