//! In-memory host document.
//!
//! Models the slice of a font document that a scrawl touches: the unit
//! size, masters (for vertical metrics and the pixel-ratio parameter), and
//! layers with their user-data dictionaries and background images. The
//! document is persisted as MessagePack.

use crate::config::PEN_RATIO_PARAMETER;
use crate::id::LayerId;
use crate::model::LayerMetrics;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-layer schemaless key-value storage owned by the host.
pub trait UserData {
    /// The layer exists and can hold user data.
    fn has_layer(&self, layer: LayerId) -> bool;

    fn user_value(&self, layer: LayerId, key: &str) -> Option<&Value>;

    /// Store `value` under `key`. Unknown layers are ignored.
    fn set_user_value(&mut self, layer: LayerId, key: &str, value: Value);

    /// Remove `key`; a no-op if it is absent.
    fn remove_user_value(&mut self, layer: LayerId, key: &str);
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document has never been saved to a path")]
    Unsaved,
    #[error("document I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode document: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("failed to decode document: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

// ─── Model ───────────────────────────────────────────────────────────────

/// A style variant of the font (e.g. Regular, Bold).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Master {
    pub id: String,
    pub descender: Option<f64>,
    /// String-valued custom parameters, e.g. `ScrawlPenRatio`.
    #[serde(default)]
    pub custom_parameters: BTreeMap<String, String>,
}

impl Master {
    pub fn new(id: &str, descender: f64) -> Self {
        Self {
            id: id.to_string(),
            descender: Some(descender),
            custom_parameters: BTreeMap::new(),
        }
    }
}

/// A reference image placed behind a layer's outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub path: PathBuf,
    /// Bottom-left corner, in outline units.
    pub position: (f64, f64),
    /// Outline units per image pixel, horizontally and vertically.
    pub scale: (f64, f64),
}

/// One editable layer of a glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub glyph: String,
    pub master_id: String,
    pub width: f64,
    /// The layer already has real vector content.
    #[serde(default)]
    pub has_outlines: bool,
    #[serde(default)]
    pub user_data: BTreeMap<String, Value>,
    #[serde(default)]
    pub background_image: Option<BackgroundImage>,
}

impl Layer {
    pub fn new(id: &str, glyph: &str, master_id: &str, width: f64) -> Self {
        Self {
            id: LayerId::intern(id),
            glyph: glyph.to_string(),
            master_id: master_id.to_string(),
            width,
            has_outlines: false,
            user_data: BTreeMap::new(),
            background_image: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Where the document was last read from or written to.
    #[serde(skip)]
    pub path: Option<PathBuf>,
    pub unit_size: f64,
    pub masters: Vec<Master>,
    pub layers: Vec<Layer>,
}

impl Document {
    pub fn new(unit_size: f64) -> Self {
        Self {
            unit_size,
            ..Self::default()
        }
    }

    pub fn add_master(&mut self, master: Master) -> &mut Self {
        self.masters.push(master);
        self
    }

    pub fn add_layer(&mut self, layer: Layer) -> &mut Self {
        self.layers.push(layer);
        self
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    pub fn master(&self, id: &str) -> Option<&Master> {
        self.masters.iter().find(|m| m.id == id)
    }

    fn master_of(&self, layer: &Layer) -> Option<&Master> {
        self.master(&layer.master_id)
    }

    /// Metrics for placing a default canvas on `id`.
    ///
    /// Returns `None` for an unknown layer. A missing master leaves the
    /// descender unresolved.
    pub fn metrics(&self, id: LayerId) -> Option<LayerMetrics> {
        let layer = self.layer(id)?;
        let descender = self.master_of(layer).and_then(|m| m.descender);
        if descender.is_none() {
            log::debug!(
                "no vertical metrics for layer {id} (master {:?})",
                layer.master_id
            );
        }
        Some(LayerMetrics {
            advance_width: layer.width,
            unit_size: self.unit_size,
            descender,
        })
    }

    /// Vertical pixel ratio from the layer master's `ScrawlPenRatio`.
    /// Absent, non-numeric, or non-positive values yield 1.
    pub fn pixel_ratio(&self, id: LayerId) -> f64 {
        let raw = self
            .layer(id)
            .and_then(|layer| self.master_of(layer))
            .and_then(|m| m.custom_parameters.get(PEN_RATIO_PARAMETER));
        match raw.map(|s| s.trim().parse::<f64>()) {
            Some(Ok(ratio)) if ratio.is_finite() && ratio > 0.0 => ratio,
            Some(_) => {
                log::debug!("ignoring {PEN_RATIO_PARAMETER} {raw:?} on layer {id}");
                1.0
            }
            None => 1.0,
        }
    }

    pub fn has_outlines(&self, id: LayerId) -> bool {
        self.layer(id).is_some_and(|l| l.has_outlines)
    }

    /// Register a background image on a layer. Returns `false` for unknown layers.
    pub fn set_background_image(&mut self, id: LayerId, image: BackgroundImage) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.background_image = Some(image);
                true
            }
            None => false,
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Read a MessagePack document and remember its path.
    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let bytes = fs::read(path)?;
        let mut doc: Document = rmp_serde::from_slice(&bytes)?;
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Write to `path` and remember it as the document's location.
    pub fn write(&mut self, path: &Path) -> Result<(), DocumentError> {
        let bytes = rmp_serde::to_vec_named(self)?;
        fs::write(path, bytes)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Write back to the remembered path.
    pub fn save(&self) -> Result<(), DocumentError> {
        let path = self.path.as_deref().ok_or(DocumentError::Unsaved)?;
        fs::write(path, rmp_serde::to_vec_named(self)?)?;
        Ok(())
    }
}

impl UserData for Document {
    fn has_layer(&self, layer: LayerId) -> bool {
        self.layer(layer).is_some()
    }

    fn user_value(&self, layer: LayerId, key: &str) -> Option<&Value> {
        self.layer(layer)?.user_data.get(key)
    }

    fn set_user_value(&mut self, layer: LayerId, key: &str, value: Value) {
        match self.layer_mut(layer) {
            Some(l) => {
                l.user_data.insert(key.to_string(), value);
            }
            None => log::warn!("cannot store {key:?}: unknown layer {layer}"),
        }
    }

    fn remove_user_value(&mut self, layer: LayerId, key: &str) {
        if let Some(l) = self.layer_mut(layer) {
            l.user_data.remove(key);
        }
    }
}
