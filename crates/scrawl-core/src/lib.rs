pub mod codec;
pub mod config;
pub mod document;
pub mod geometry;
pub mod id;
pub mod model;
pub mod raster;
pub mod seed;
pub mod store;
pub mod value;

pub use codec::{CodecError, decode_png, encode_png};
pub use config::{ConfigError, PEN_RATIO_PARAMETER, PLUGIN_ID, ScrawlConfig};
pub use document::{BackgroundImage, Document, DocumentError, Layer, Master, UserData};
pub use geometry::{bitmap_dimensions, deduce_default_rect, to_pixel};
pub use id::LayerId;
pub use model::*;
pub use raster::{Ink, PaintOp};
pub use store::{CanvasStore, StoreError};
pub use value::Value;
