//! Context-menu commands: "Delete Scrawl" and "Save Scrawl To Background Image".

use crate::host::Host;
use scrawl_core::{
    BackgroundImage, CanvasRecord, CanvasStore, CodecError, Document, LayerId, encode_png,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("document has never been saved; save it before exporting")]
    UnsavedDocument,
    #[error("unknown layer {0}")]
    UnknownLayer(LayerId),
    #[error("layer {0} has no readable scrawl")]
    NoScrawl(LayerId),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("failed to write background image: {0}")]
    Io(#[from] std::io::Error),
}

/// Delete the scrawl on every selected layer, then refresh the view.
/// Returns the layers that were cleared.
pub fn delete_scrawl(host: &mut dyn Host) -> Vec<LayerId> {
    let layers = host.selected_layers();
    for &layer in &layers {
        CanvasStore::delete(host.document_mut(), layer);
    }
    host.request_redraw();
    layers
}

/// Deterministic image path beside the document:
/// `<dir>/<document stem>-<glyph>-<layer id>.png`.
pub fn background_image_path(document_path: &Path, glyph: &str, layer: LayerId) -> PathBuf {
    let stem = document_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scrawl".to_string());
    let name = format!(
        "{}-{}-{}.png",
        sanitize(&stem),
        sanitize(glyph),
        sanitize(layer.as_str())
    );
    document_path.with_file_name(name)
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write `record` as a PNG beside the document and register it as the
/// layer's background image, placed at the record's origin with one image
/// pixel covering `pixel_size × pixel_size * pixel_ratio` outline units.
///
/// Nothing is written unless the document has a path and the bitmap
/// encodes.
pub fn export_to_background(
    doc: &mut Document,
    layer: LayerId,
    record: &CanvasRecord,
) -> Result<PathBuf, ExportError> {
    let document_path = doc.path.clone().ok_or(ExportError::UnsavedDocument)?;
    let glyph = doc
        .layer(layer)
        .map(|l| l.glyph.clone())
        .ok_or(ExportError::UnknownLayer(layer))?;
    let png = encode_png(&record.bitmap)?;

    let path = background_image_path(&document_path, &glyph, layer);
    fs::write(&path, png)?;
    log::info!("wrote background image {}", path.display());

    doc.set_background_image(
        layer,
        BackgroundImage {
            path: path.clone(),
            position: record.rect.origin(),
            scale: (record.pixel_size, record.pixel_height()),
        },
    );
    Ok(path)
}

/// Export the scrawl stored on `layer`.
pub fn export_layer(doc: &mut Document, layer: LayerId) -> Result<PathBuf, ExportError> {
    if doc.layer(layer).is_none() {
        return Err(ExportError::UnknownLayer(layer));
    }
    let record = CanvasStore::load(&*doc, layer, doc.pixel_ratio(layer))
        .ok_or(ExportError::NoScrawl(layer))?;
    export_to_background(doc, layer, &record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_path_is_deterministic_and_safe() {
        let path = background_image_path(
            Path::new("/fonts/My Font.glyphs"),
            "a.ss01/alt",
            LayerId::intern("ABC-123"),
        );
        assert_eq!(path, PathBuf::from("/fonts/My_Font-a.ss01_alt-ABC-123.png"));
    }
}
