//! Confetti sprite generation library.
//!
//! Main features:
//!  - Circle, square and triangle sprites rendered for a palette of colors
//!  - Signed difference path rasterization with optional anti-aliasing
//!  - Alpha fade out curve used at the end of confetti life
//!  - PNG export of individual sprites and sprite atlases
//!
mod color;
#[cfg(feature = "serde")]
mod config;
mod easing;
mod geometry;
mod image;
mod paint;
mod path;
mod rasterize;
mod shape;
mod sprites;
mod utils;

pub use color::{ARGB, ColorError};
#[cfg(feature = "serde")]
pub use config::{ConfigError, SpriteConfig};
pub use easing::{FadeOut, Interpolator, fade_out_curve};
pub use geometry::{
    Arc, ArcFlattenIter, EPSILON, Line, MAX_ARC_LINES, PI, Point, Scalar, scalar_fmt,
};
pub use image::{Image, ImageIter, ImageMut, ImageOwned, ImageRef, Shape, Size};
pub use paint::{FillStyle, fill_path};
pub use path::{
    DEFAULT_FLATNESS, FillRule, MIN_FLATNESS, Path, PathBuilder, Segment, SegmentFlattenIter,
    SubPath,
};
pub use shape::{
    Bitmap, ShapeKind, SpriteError, SpriteRenderer, create_circle_bitmap, create_square_bitmap,
    create_triangle_bitmap, generate_confetti_bitmaps,
};
pub use sprites::ConfettiSprites;
use utils::clamp;
