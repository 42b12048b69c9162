// Wed Jan 15 2026 - Alex

use crate::inspect::{ExportedType, LoadFault};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON type table embedded in a module's manifest section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeManifest {
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub types: Vec<ExportedType>,
    #[serde(default)]
    pub requires: Vec<String>,
}

impl TypeManifest {
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<Self, LoadFault> {
        // sections are padded to their alignment with NULs
        let end = bytes
            .iter()
            .rposition(|b| *b != 0 && !b.is_ascii_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);

        if end == 0 {
            return Ok(Self::default());
        }

        serde_json::from_slice(&bytes[..end])
            .map_err(|e| LoadFault::malformed(path, format!("invalid type manifest: {}", e)))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}
