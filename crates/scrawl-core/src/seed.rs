//! Random test data: scatter single-pixel dots over a layer's canvas.

use crate::config::ScrawlConfig;
use crate::document::Document;
use crate::id::LayerId;
use crate::model::{CanvasRecord, PixelPoint};
use crate::raster::{Ink, PaintOp};
use crate::store::{CanvasStore, StoreError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stamp `count` one-pixel dots at random pixel centres of `record`.
pub fn scatter_dots<R: Rng>(record: &mut CanvasRecord, count: usize, rng: &mut R) -> usize {
    let (w, h) = record.bitmap.dimensions();
    let mut painted = 0;
    for _ in 0..count {
        let center = PixelPoint::new(
            f64::from(rng.gen_range(0..w)) + 0.5,
            f64::from(rng.gen_range(0..h)) + 0.5,
        );
        let op = PaintOp::Dot {
            center,
            diameter: 1.0,
        };
        if record.bitmap.apply(&op, Ink::Black) {
            painted += 1;
        }
    }
    painted
}

/// Add `count` random dots to the scrawl on `layer` and save it.
///
/// Starts from the stored record, or from a blank canvas at the stored or
/// deduced placement. Returns `Ok(None)` for an unknown layer, and an
/// error when the configured sizes cannot make a valid canvas.
pub fn seed_layer(
    doc: &mut Document,
    layer: LayerId,
    count: usize,
    seed: u64,
    config: &ScrawlConfig,
) -> Result<Option<usize>, StoreError> {
    let Some(metrics) = doc.metrics(layer) else {
        return Ok(None);
    };
    let ratio = doc.pixel_ratio(layer);
    let mut record = match CanvasStore::load(&*doc, layer, ratio) {
        Some(record) => record,
        None => {
            let placement = CanvasStore::load_placement(&*doc, layer, &metrics, config);
            if !placement.is_valid() {
                return Err(StoreError::InvalidPlacement(placement));
            }
            CanvasRecord::blank(placement, ratio)
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let painted = scatter_dots(&mut record, count, &mut rng);
    CanvasStore::save(doc, layer, &record)?;
    Ok(Some(painted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Layer, Master};

    fn doc() -> Document {
        let mut doc = Document::new(1000.0);
        doc.add_master(Master::new("m", -200.0))
            .add_layer(Layer::new("seed-a", "a", "m", 500.0));
        doc
    }

    #[test]
    fn seeding_creates_a_record() {
        let mut doc = doc();
        let id = LayerId::intern("seed-a");
        let painted = seed_layer(&mut doc, id, 50, 7, &ScrawlConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(painted, 50);
        let record = CanvasStore::load(&doc, id, 1.0).unwrap();
        assert!(!record.bitmap.is_blank());
        assert_eq!(record.bitmap.dimensions(), (150, 140));
    }

    #[test]
    fn seeding_is_deterministic() {
        let mut a = doc();
        let mut b = doc();
        let id = LayerId::intern("seed-a");
        let config = ScrawlConfig::default();
        seed_layer(&mut a, id, 20, 42, &config).unwrap();
        seed_layer(&mut b, id, 20, 42, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_pixel_size_config_stores_nothing() {
        let mut doc = doc();
        let id = LayerId::intern("seed-a");
        let config = ScrawlConfig {
            pixel_size: 0.0,
            ..ScrawlConfig::default()
        };
        let result = seed_layer(&mut doc, id, 10, 1, &config);
        assert!(matches!(result, Err(StoreError::InvalidPlacement(_))));
        assert!(!CanvasStore::has_record(&doc, id));
    }

    #[test]
    fn unknown_layer_is_skipped() {
        let mut doc = doc();
        let result = seed_layer(&mut doc, LayerId::intern("nope"), 5, 1, &ScrawlConfig::default());
        assert!(matches!(result, Ok(None)));
    }
}
