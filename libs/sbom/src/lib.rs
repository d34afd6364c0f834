//! CycloneDX merge for the workspace SBOM.
//!
//! Every `*.cdx.json` below a root is read in sorted path order and its
//! `components` are folded into one list. A component is identified by its
//! `bom-ref`, else its `purl`, else its `(name, version)` pair; the first
//! occurrence of an identity wins.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// File suffix of CycloneDX JSON documents.
pub const CDX_SUFFIX: &str = ".cdx.json";

pub const BOM_FORMAT: &str = "CycloneDX";
pub const SPEC_VERSION: &str = "1.3";
pub const SERIAL_NUMBER: &str = "urn:uuid:00000000-0000-0000-0000-000000000000";
pub const WORKSPACE_COMPONENT: &str = "zaevrynth-workspace";

#[derive(Debug, Error)]
pub enum SbomError {
    #[error("failed to encode SBOM: {0}")]
    Encode(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ComponentKey {
    /// A truthy `bom-ref` or `purl`. Both share one namespace.
    Reference(String),
    /// `(name, version)` as JSON text, `null` when absent.
    NameVersion(String, String),
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn reference_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn component_key(component: &Map<String, Value>) -> ComponentKey {
    for field in ["bom-ref", "purl"] {
        if let Some(value) = component.get(field).filter(|v| is_truthy(v)) {
            return ComponentKey::Reference(reference_text(value));
        }
    }
    let text = |field: &str| component.get(field).unwrap_or(&Value::Null).to_string();
    ComponentKey::NameVersion(text("name"), text("version"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataComponent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub component: MetadataComponent,
}

/// Merged CycloneDX document. Field order is the output key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sbom {
    pub bom_format: &'static str,
    pub spec_version: &'static str,
    pub serial_number: &'static str,
    pub version: u32,
    pub metadata: Metadata,
    pub components: Vec<Value>,
}

impl Sbom {
    pub fn new(components: Vec<Value>) -> Self {
        Self {
            bom_format: BOM_FORMAT,
            spec_version: SPEC_VERSION,
            serial_number: SERIAL_NUMBER,
            version: 1,
            metadata: Metadata {
                component: MetadataComponent {
                    kind: "application",
                    name: WORKSPACE_COMPONENT,
                },
            },
            components,
        }
    }

    /// Two-space indented JSON with a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String, SbomError> {
        let mut text =
            serde_json::to_string_pretty(self).map_err(|e| SbomError::Encode(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> Result<(), SbomError> {
        out.write_all(self.to_pretty_string()?.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Accumulates components across documents, first occurrence wins.
#[derive(Debug, Default)]
pub struct Merger {
    seen: HashSet<ComponentKey>,
    components: Vec<Value>,
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the `components` of one parsed document in. Returns how many
    /// components were new.
    pub fn add_document(&mut self, document: &Value) -> usize {
        let Some(components) = document.get("components").and_then(Value::as_array) else {
            return 0;
        };
        let mut added = 0;
        for component in components {
            let Some(fields) = component.as_object() else {
                continue;
            };
            if self.seen.insert(component_key(fields)) {
                self.components.push(component.clone());
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn finish(self) -> Sbom {
        Sbom::new(self.components)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// All `*.cdx.json` regular files below `root`, hidden entries excluded,
/// sorted by full path. Entries that cannot be walked are logged and skipped.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "Skipping unwalkable entry");
                continue;
            }
        };
        let is_cdx = entry.file_name().to_string_lossy().ends_with(CDX_SUFFIX);
        if entry.file_type().is_file() && is_cdx {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    paths
}

/// Merge every document under `root`. Unreadable or malformed documents are
/// logged and skipped.
pub fn merge_tree(root: &Path) -> Sbom {
    let mut merger = Merger::new();
    for path in discover(root) {
        let document = match fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()))
        {
            Ok(document) => document,
            Err(message) => {
                warn!(path = %path.display(), error = %message, "Skipping unreadable SBOM");
                continue;
            }
        };
        let added = merger.add_document(&document);
        debug!(path = %path.display(), added, "Merged SBOM");
    }
    merger.finish()
}
