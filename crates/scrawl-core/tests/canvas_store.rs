//! Integration tests: Canvas Store over a persisted document (scrawl-core).
//!
//! Saves records through the store, writes the document to disk as
//! MessagePack, reads it back, and checks that the record survives.

use pretty_assertions::assert_eq;
use scrawl_core::store::key;
use scrawl_core::*;

fn make_doc() -> Document {
    let mut doc = Document::new(1000.0);
    let mut narrow = Master::new("narrow", -200.0);
    narrow
        .custom_parameters
        .insert(PEN_RATIO_PARAMETER.to_string(), "2".to_string());
    doc.add_master(Master::new("regular", -200.0))
        .add_master(narrow)
        .add_layer(Layer::new("it-a", "a", "regular", 600.0))
        .add_layer(Layer::new("it-b", "b", "narrow", 600.0));
    doc
}

fn scrawl(doc: &Document, layer: LayerId) -> CanvasRecord {
    let config = ScrawlConfig::default();
    let metrics = doc.metrics(layer).unwrap();
    let placement = CanvasStore::load_placement(doc, layer, &metrics, &config);
    let mut record = CanvasRecord::blank(placement, doc.pixel_ratio(layer));
    record.bitmap.apply(
        &PaintOp::Line {
            from: PixelPoint::new(20.0, 20.0),
            to: PixelPoint::new(120.0, 30.0),
            width: 4.0,
        },
        Ink::Black,
    );
    record
}

// ─── Persistence ────────────────────────────────────────────────────────

#[test]
fn record_survives_document_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("font.scrawl");
    let mut doc = make_doc();
    let id = LayerId::intern("it-a");

    let record = scrawl(&doc, id);
    CanvasStore::save(&mut doc, id, &record).unwrap();
    doc.write(&path).unwrap();

    let reread = Document::read(&path).unwrap();
    assert_eq!(reread.path.as_deref(), Some(path.as_path()));
    assert_eq!(CanvasStore::load(&reread, id, 1.0), Some(record));
}

#[test]
fn stored_fields_use_namespaced_keys() {
    let mut doc = make_doc();
    let id = LayerId::intern("it-a");
    let record = scrawl(&doc, id);
    CanvasStore::save(&mut doc, id, &record).unwrap();

    let keys: Vec<&str> = doc
        .layer(id)
        .unwrap()
        .user_data
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "de.kutilek.scrawl.data",
            "de.kutilek.scrawl.rect",
            "de.kutilek.scrawl.size",
            "de.kutilek.scrawl.unit",
        ]
    );
    assert_eq!(
        doc.user_value(id, &key("unit")),
        Some(&Value::Float(10.0))
    );
    assert_eq!(
        doc.user_value(id, &key("size")),
        Some(&Value::Float(20.0))
    );
}

#[test]
fn stored_image_is_plain_grayscale_png() {
    let mut doc = make_doc();
    let id = LayerId::intern("it-a");
    let record = scrawl(&doc, id);
    CanvasStore::save(&mut doc, id, &record).unwrap();

    let bytes = doc.user_value(id, &key("data")).unwrap().as_data().unwrap();
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    let decoded = decode_png(bytes).unwrap();
    assert_eq!(decoded, record.bitmap);
}

// ─── Pixel ratio ────────────────────────────────────────────────────────

#[test]
fn pixel_ratio_halves_rows() {
    let mut doc = make_doc();
    let id = LayerId::intern("it-b");
    let record = scrawl(&doc, id);
    assert_eq!(record.bitmap.dimensions(), (160, 70));

    CanvasStore::save(&mut doc, id, &record).unwrap();
    assert_eq!(CanvasStore::load(&doc, id, 2.0), Some(record));
    assert_eq!(CanvasStore::load(&doc, id, 1.0), None);
}

// ─── Independence ───────────────────────────────────────────────────────

#[test]
fn layers_are_independent() {
    let mut doc = make_doc();
    let a = LayerId::intern("it-a");
    let b = LayerId::intern("it-b");
    let (record_a, record_b) = (scrawl(&doc, a), scrawl(&doc, b));
    CanvasStore::save(&mut doc, a, &record_a).unwrap();
    CanvasStore::save(&mut doc, b, &record_b).unwrap();

    CanvasStore::delete(&mut doc, a);
    assert!(!CanvasStore::has_record(&doc, a));
    assert!(CanvasStore::load(&doc, b, 2.0).is_some());
}

#[test]
fn overwrite_replaces_every_field() {
    let mut doc = make_doc();
    let id = LayerId::intern("it-a");
    let record = scrawl(&doc, id);
    CanvasStore::save(&mut doc, id, &record).unwrap();

    let placement = Placement {
        rect: Rect::new(0.0, 0.0, 300.0, 200.0),
        pixel_size: 20.0,
        pen_size: 60.0,
    };
    let smaller = CanvasRecord::blank(placement, 1.0);
    CanvasStore::save(&mut doc, id, &smaller).unwrap();

    let loaded = CanvasStore::load(&doc, id, 1.0).unwrap();
    assert_eq!(loaded.bitmap.dimensions(), (15, 10));
    assert_eq!(loaded.placement(), placement);
}
