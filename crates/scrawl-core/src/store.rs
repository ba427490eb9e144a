//! Canvas Store: a layer's scrawl ↔ four namespaced user-data fields.
//!
//! | Key | Value |
//! |-----|-------|
//! | `<plugin>.data` | grayscale PNG bytes |
//! | `<plugin>.rect` | `[x, y, width, height]` |
//! | `<plugin>.unit` | pixel size |
//! | `<plugin>.size` | pen size |
//!
//! The record is all-or-nothing: a missing, mistyped, or undecodable field
//! makes the whole record absent. Saves encode first and only then write
//! every field, so a failed encode leaves the previous record untouched.
//! A record that could not be loaded back (unknown layer, non-positive
//! sizes, invalid rect) is refused before anything is written.

use crate::codec::{CodecError, decode_png, encode_png};
use crate::config::{PLUGIN_ID, ScrawlConfig};
use crate::document::UserData;
use crate::geometry::{bitmap_dimensions, deduce_default_rect};
use crate::id::LayerId;
use crate::model::{CanvasRecord, LayerMetrics, Placement, Rect};
use crate::value::Value;
use thiserror::Error;

const FIELD_DATA: &str = "data";
const FIELD_RECT: &str = "rect";
const FIELD_UNIT: &str = "unit";
const FIELD_SIZE: &str = "size";
const FIELDS: [&str; 4] = [FIELD_DATA, FIELD_RECT, FIELD_UNIT, FIELD_SIZE];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("layer {0} is not in the document")]
    UnknownLayer(LayerId),
    #[error("refusing to save invalid placement {0:?}")]
    InvalidPlacement(Placement),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Fully-qualified user-data key for a record field.
pub fn key(field: &str) -> String {
    format!("{PLUGIN_ID}.{field}")
}

/// Stateless loader/saver for canvas records. Performs no caching.
pub struct CanvasStore;

impl CanvasStore {
    /// Load the record attached to `layer`, or `None` if it is absent or
    /// any part of it fails to decode.
    pub fn load<S: UserData + ?Sized>(
        store: &S,
        layer: LayerId,
        pixel_ratio: f64,
    ) -> Option<CanvasRecord> {
        let field = |name: &str| store.user_value(layer, &key(name));

        let (Some(data), Some(rect), Some(unit), Some(size)) = (
            field(FIELD_DATA),
            field(FIELD_RECT),
            field(FIELD_UNIT),
            field(FIELD_SIZE),
        ) else {
            log::trace!("no complete scrawl on layer {layer}");
            return None;
        };

        let (Some(rect), Some(pixel_size), Some(pen_size)) =
            (parse_rect(rect), positive(unit), positive(size))
        else {
            log::warn!("discarding scrawl on layer {layer}: malformed placement fields");
            return None;
        };

        let Some(bytes) = data.as_data() else {
            log::warn!("discarding scrawl on layer {layer}: image field is not binary data");
            return None;
        };
        let bitmap = match decode_png(bytes) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                log::warn!("discarding scrawl on layer {layer}: {e}");
                return None;
            }
        };

        let expected = bitmap_dimensions(&rect, pixel_size, pixel_ratio);
        if bitmap.dimensions() != expected {
            log::warn!(
                "discarding scrawl on layer {layer}: bitmap is {:?}, placement needs {expected:?}",
                bitmap.dimensions()
            );
            return None;
        }

        Some(CanvasRecord {
            bitmap,
            rect,
            pixel_size,
            pixel_ratio,
            pen_size,
        })
    }

    /// Placement for a fresh canvas on `layer`: each stored placement field
    /// that is individually valid, otherwise the deduced rect and the
    /// configured defaults.
    pub fn load_placement<S: UserData + ?Sized>(
        store: &S,
        layer: LayerId,
        metrics: &LayerMetrics,
        config: &ScrawlConfig,
    ) -> Placement {
        let field = |name: &str| store.user_value(layer, &key(name));
        let pixel_size = field(FIELD_UNIT)
            .and_then(positive)
            .unwrap_or(config.pixel_size);
        Placement {
            rect: field(FIELD_RECT)
                .and_then(parse_rect)
                .unwrap_or_else(|| deduce_default_rect(metrics)),
            pixel_size,
            pen_size: field(FIELD_SIZE)
                .and_then(positive)
                .unwrap_or(config.pen_pixels * pixel_size),
        }
    }

    /// Persist `record` on `layer`, replacing all four fields together.
    pub fn save<S: UserData + ?Sized>(
        store: &mut S,
        layer: LayerId,
        record: &CanvasRecord,
    ) -> Result<(), StoreError> {
        if !store.has_layer(layer) {
            return Err(StoreError::UnknownLayer(layer));
        }
        let placement = record.placement();
        if !placement.is_valid() {
            return Err(StoreError::InvalidPlacement(placement));
        }
        let png = encode_png(&record.bitmap)?;
        log::debug!("saving {} bytes of scrawl on layer {layer}", png.len());

        let Rect {
            x,
            y,
            width,
            height,
        } = record.rect;
        store.set_user_value(layer, &key(FIELD_DATA), Value::Data(png));
        store.set_user_value(
            layer,
            &key(FIELD_RECT),
            Value::List(vec![
                Value::Float(x),
                Value::Float(y),
                Value::Float(width),
                Value::Float(height),
            ]),
        );
        store.set_user_value(layer, &key(FIELD_UNIT), Value::Float(record.pixel_size));
        store.set_user_value(layer, &key(FIELD_SIZE), Value::Float(record.pen_size));
        Ok(())
    }

    /// Remove every field of the record. Idempotent.
    pub fn delete<S: UserData + ?Sized>(store: &mut S, layer: LayerId) {
        for field in FIELDS {
            store.remove_user_value(layer, &key(field));
        }
        log::debug!("deleted scrawl on layer {layer}");
    }

    /// All four fields are present (without decoding them).
    pub fn has_record<S: UserData + ?Sized>(store: &S, layer: LayerId) -> bool {
        FIELDS
            .iter()
            .all(|field| store.user_value(layer, &key(field)).is_some())
    }
}

fn positive(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_rect(value: &Value) -> Option<Rect> {
    let [x, y, w, h] = value.as_list()? else {
        return None;
    };
    let rect = Rect::new(x.as_f64()?, y.as_f64()?, w.as_f64()?, h.as_f64()?);
    rect.is_valid().then_some(rect)
}
