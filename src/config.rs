// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Runtime configuration, read from an optional JSON file. Every field has a default, so an empty
//! object (or no file at all) is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::apply::ApplyOptions;
use crate::model::TableSizing;
use crate::queue::QueueConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub apply: ApplyConfig,
    pub layout: LayoutConfig,
    pub session: SessionConfig,
    pub transcript: TranscriptConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Streaming generation endpoint; the local heuristic extractor is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub concurrency: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { endpoint: None, concurrency: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplyConfig {
    pub gap: f64,
    pub empty_canvas_top: f64,
    pub empty_canvas_left: f64,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        let options = ApplyOptions::default();
        Self {
            gap: options.gap,
            empty_canvas_top: options.empty_canvas_top,
            empty_canvas_left: options.empty_canvas_left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub table_sizing: TableSizing,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptConfig {
    pub min_words: usize,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self { min_words: 3 }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.to_owned(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.concurrency == 0 {
            return Err(ConfigError::Invalid("generation.concurrency must be at least 1".into()));
        }
        let apply = &self.apply;
        for (name, value) in [
            ("apply.gap", apply.gap),
            ("apply.emptyCanvasTop", apply.empty_canvas_top),
            ("apply.emptyCanvasLeft", apply.empty_canvas_left),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be a finite number")));
            }
        }
        if let Some(endpoint) = &self.generation.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "generation.endpoint must be an http(s) URL, got '{endpoint}'"
                )));
            }
        }
        Ok(())
    }

    pub fn apply_options(&self) -> ApplyOptions {
        ApplyOptions {
            gap: self.apply.gap,
            empty_canvas_top: self.apply.empty_canvas_top,
            empty_canvas_left: self.apply.empty_canvas_left,
            table_sizing: self.layout.table_sizing,
        }
    }

    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            concurrency: self.generation.concurrency,
            min_words: self.transcript.min_words,
            apply: self.apply_options(),
        }
    }
}
