// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML-backed message catalog

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use teller_core::localize::Localizer;
use thiserror::Error;

/// Errors loading a message catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    messages: HashMap<String, String>,
}

/// Message catalog loaded from a `[messages]` TOML table.
///
/// Keys are status message keys (`ERR-20701`, `WAR-10101`, `99999`),
/// values are templates with positional `{0}`, `{1}`, ... slots.
#[derive(Debug, Clone)]
pub struct TomlCatalog {
    messages: HashMap<String, String>,
}

impl TomlCatalog {
    /// Load a catalog file
    pub fn load(path: &Path) -> Result<TomlCatalog, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        TomlCatalog::parse(&text)
    }

    /// Parse catalog TOML text
    pub fn parse(text: &str) -> Result<TomlCatalog, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Ok(TomlCatalog {
            messages: file.messages,
        })
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Localizer for TomlCatalog {
    fn template(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
