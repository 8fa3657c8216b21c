//! Confetti sprite shapes and their rasterization
use crate::{
    ARGB, DEFAULT_FLATNESS, FillRule, FillStyle, ImageOwned, MIN_FLATNESS, PI, Path, Scalar,
    Size, fill_path,
};
use std::fmt;

/// Rasterized sprite, `size x size` non-premultiplied pixels
pub type Bitmap = ImageOwned<ARGB>;

/// Shape of a confetti sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
}

impl ShapeKind {
    /// All shapes in the order they are generated for each color
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Triangle];

    /// Position of the shape within a group of sprites generated for one color
    pub fn index(self) -> usize {
        match self {
            ShapeKind::Circle => 0,
            ShapeKind::Square => 1,
            ShapeKind::Triangle => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
        }
    }

    /// Outline of the shape on a `size x size` canvas
    pub fn outline(self, size: Scalar) -> Path {
        let mut builder = Path::builder();
        match self {
            ShapeKind::Circle => {
                let radius = size / 2.0;
                builder.move_to((radius, radius)).circle(radius);
            }
            ShapeKind::Square => {
                builder
                    .move_to((0.0, 0.0))
                    .line_to((size, 0.0))
                    .line_to((size, size))
                    .line_to((0.0, size))
                    .close();
            }
            ShapeKind::Triangle => {
                // vertices are fixed, this is not an equilateral triangle
                let point = (PI / 12.0).tan() * size;
                builder
                    .move_to((0.0, 0.0))
                    .line_to((size, point))
                    .line_to((point, size))
                    .close();
            }
        }
        builder.build()
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders confetti sprites
///
/// Renderer holds only immutable options, every draw builds its own fill style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRenderer {
    antialias: bool,
    flatness: Scalar,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self {
            antialias: false,
            flatness: DEFAULT_FLATNESS,
        }
    }
}

impl SpriteRenderer {
    /// Create renderer, flatness below `MIN_FLATNESS` (or NaN) is raised to it
    pub fn new(antialias: bool, flatness: Scalar) -> Self {
        Self {
            antialias,
            flatness: if flatness >= MIN_FLATNESS {
                flatness
            } else {
                MIN_FLATNESS
            },
        }
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn flatness(&self) -> Scalar {
        self.flatness
    }

    /// Render single sprite of the provided shape and color
    pub fn render(&self, kind: ShapeKind, color: ARGB, size: usize) -> Result<Bitmap, SpriteError> {
        let mut bitmap = allocate(size)?;
        let style = FillStyle::new(color)
            .with_fill_rule(FillRule::NonZero)
            .with_antialias(self.antialias)
            .with_flatness(self.flatness);
        fill_path(&kind.outline(size as Scalar), style, &mut bitmap);
        tracing::trace!(%kind, %color, size, "[render]");
        Ok(bitmap)
    }

    pub fn circle(&self, color: ARGB, size: usize) -> Result<Bitmap, SpriteError> {
        self.render(ShapeKind::Circle, color, size)
    }

    pub fn square(&self, color: ARGB, size: usize) -> Result<Bitmap, SpriteError> {
        self.render(ShapeKind::Square, color, size)
    }

    pub fn triangle(&self, color: ARGB, size: usize) -> Result<Bitmap, SpriteError> {
        self.render(ShapeKind::Triangle, color, size)
    }

    /// Render circle, square and triangle for each color in order
    ///
    /// Sprites of the color at index `i` are located at `3i`, `3i + 1` and `3i + 2`.
    pub fn generate(&self, colors: &[ARGB], size: usize) -> Result<Vec<Bitmap>, SpriteError> {
        let _span = tracing::debug_span!("[generate]", colors = colors.len(), size).entered();
        let mut bitmaps = Vec::with_capacity(colors.len() * ShapeKind::ALL.len());
        for color in colors {
            for kind in ShapeKind::ALL {
                bitmaps.push(self.render(kind, *color, size)?);
            }
        }
        Ok(bitmaps)
    }
}

/// Allocate transparent `size x size` bitmap
///
/// Size is checked against the largest buffer a render needs, which is the
/// rasterizer accumulation buffer of `(size + 2) x size` scalars.
fn allocate(size: usize) -> Result<Bitmap, SpriteError> {
    let bytes = size
        .checked_add(2)
        .and_then(|width| Size { width, height: size }.area())
        .and_then(|area| area.checked_mul(size_of::<Scalar>()));
    match bytes {
        Some(bytes) if size > 0 && bytes <= isize::MAX as usize => {
            Ok(Bitmap::new_default(Size::square(size)))
        }
        _ => Err(SpriteError::InvalidDimension { size }),
    }
}

/// Create bitmap with a filled circle tangent to all edges of the canvas
pub fn create_circle_bitmap(color: ARGB, size: usize) -> Result<Bitmap, SpriteError> {
    SpriteRenderer::default().circle(color, size)
}

/// Create bitmap completely filled with the color
pub fn create_square_bitmap(color: ARGB, size: usize) -> Result<Bitmap, SpriteError> {
    SpriteRenderer::default().square(color, size)
}

/// Create bitmap with a triangle `(0, 0) -> (size, p) -> (p, size)`, where `p = tan(15°) * size`
pub fn create_triangle_bitmap(color: ARGB, size: usize) -> Result<Bitmap, SpriteError> {
    SpriteRenderer::default().triangle(color, size)
}

/// Generate circle, square and triangle bitmaps for each color
pub fn generate_confetti_bitmaps(colors: &[ARGB], size: usize) -> Result<Vec<Bitmap>, SpriteError> {
    SpriteRenderer::default().generate(colors, size)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteError {
    /// Sprite size is zero or too large to be allocated
    InvalidDimension { size: usize },
}

impl fmt::Display for SpriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpriteError::InvalidDimension { size } => {
                write!(f, "Invalid sprite size {}, expected positive pixel size", size)
            }
        }
    }
}

impl std::error::Error for SpriteError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Image, assert_approx_eq};

    const RED: ARGB = ARGB::new(255, 0, 0, 255);
    const GREEN: ARGB = ARGB::new(0, 255, 0, 255);

    #[test]
    fn test_generate_order() -> Result<(), SpriteError> {
        let size = 20;
        let bitmaps = generate_confetti_bitmaps(&[RED, GREEN], size)?;
        assert_eq!(bitmaps.len(), 6);
        let expected = [
            create_circle_bitmap(RED, size)?,
            create_square_bitmap(RED, size)?,
            create_triangle_bitmap(RED, size)?,
            create_circle_bitmap(GREEN, size)?,
            create_square_bitmap(GREEN, size)?,
            create_triangle_bitmap(GREEN, size)?,
        ];
        for (bitmap, expected) in bitmaps.iter().zip(expected.iter()) {
            assert_eq!(bitmap, expected);
        }
        // shapes differ from each other
        assert_ne!(bitmaps[0], bitmaps[1]);
        assert_ne!(bitmaps[1], bitmaps[2]);
        assert_ne!(bitmaps[0], bitmaps[2]);
        Ok(())
    }

    #[test]
    fn test_generate_empty() -> Result<(), SpriteError> {
        assert!(generate_confetti_bitmaps(&[], 16)?.is_empty());
        // nothing is allocated so size is never checked
        assert!(generate_confetti_bitmaps(&[], 0)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_generate_deterministic() -> Result<(), SpriteError> {
        let colors = [RED, GREEN, RED, ARGB::from_argb(0x80336699)];
        let renderer = SpriteRenderer::new(true, DEFAULT_FLATNESS);
        assert_eq!(renderer.generate(&colors, 33)?, renderer.generate(&colors, 33)?);
        assert_eq!(
            generate_confetti_bitmaps(&colors, 17)?,
            generate_confetti_bitmaps(&colors, 17)?
        );
        Ok(())
    }

    #[test]
    fn test_dimensions() -> Result<(), SpriteError> {
        for size in [1, 2, 3, 7, 16, 31, 64] {
            for bitmap in generate_confetti_bitmaps(&[RED], size)? {
                assert_eq!(bitmap.width(), size);
                assert_eq!(bitmap.height(), size);
            }
        }
        Ok(())
    }

    #[test]
    fn test_invalid_dimension() {
        assert_eq!(
            create_circle_bitmap(RED, 0),
            Err(SpriteError::InvalidDimension { size: 0 })
        );
        assert_eq!(
            generate_confetti_bitmaps(&[RED], 0),
            Err(SpriteError::InvalidDimension { size: 0 })
        );
        assert_eq!(
            create_square_bitmap(RED, usize::MAX),
            Err(SpriteError::InvalidDimension { size: usize::MAX })
        );
        // pixel buffer fits, scalar accumulation buffer does not
        let size = 5usize << (usize::BITS / 2 - 4);
        assert_eq!(
            create_square_bitmap(RED, size),
            Err(SpriteError::InvalidDimension { size })
        );
    }

    #[test]
    fn test_small_sizes() -> Result<(), SpriteError> {
        for size in 1..=8 {
            let triangle = create_triangle_bitmap(RED, size)?;
            assert_eq!(triangle.get(0, 0), Some(&RED), "triangle size {}", size);
            let circle = create_circle_bitmap(GREEN, size)?;
            assert_eq!(circle.get(size / 2, size / 2), Some(&GREEN), "circle size {}", size);
            let square = create_square_bitmap(RED, size)?;
            assert!(square.iter().all(|c| *c == RED));
        }
        Ok(())
    }

    #[test]
    fn test_flatness_floor() -> Result<(), SpriteError> {
        for flatness in [0.0, -1.0, 1e-15, Scalar::NAN] {
            let renderer = SpriteRenderer::new(false, flatness);
            assert_eq!(renderer.flatness(), MIN_FLATNESS);
            let bitmap = renderer.circle(RED, 16)?;
            assert_eq!(bitmap.get(8, 8), Some(&RED));
        }
        assert_eq!(SpriteRenderer::new(true, 0.5).flatness(), 0.5);
        Ok(())
    }

    #[test]
    fn test_square() -> Result<(), SpriteError> {
        for renderer in [SpriteRenderer::default(), SpriteRenderer::new(true, DEFAULT_FLATNESS)] {
            let bitmap = renderer.square(GREEN, 25)?;
            assert!(bitmap.iter().all(|c| *c == GREEN));
        }
        Ok(())
    }

    #[test]
    fn test_circle() -> Result<(), SpriteError> {
        let size = 50;
        for renderer in [SpriteRenderer::default(), SpriteRenderer::new(true, DEFAULT_FLATNESS)] {
            let bitmap = renderer.circle(RED, size)?;
            assert_eq!(bitmap.get(size / 2, size / 2), Some(&RED));
            for (row, col) in [(0, 0), (size - 1, 0), (0, size - 1), (size - 1, size - 1)] {
                assert_eq!(bitmap.get(row, col), Some(&ARGB::TRANSPARENT));
            }
            // touches the middle of every edge
            for (row, col) in [(0, size / 2), (size / 2, 0), (size - 1, size / 2), (size / 2, size - 1)] {
                assert!(bitmap.get(row, col).unwrap().alpha() > 0);
            }
        }

        let bitmap = create_circle_bitmap(RED, 100)?;
        let filled = bitmap.iter().filter(|c| c.alpha() > 0).count() as Scalar;
        assert_approx_eq!(filled, PI * 50.0 * 50.0, 100.0);
        Ok(())
    }

    #[test]
    fn test_triangle() -> Result<(), SpriteError> {
        let size = 100;
        let point = (PI / 12.0).tan() * size as Scalar;
        assert_approx_eq!(point, 26.795, 1e-3);

        let bitmap = create_triangle_bitmap(RED, size)?;
        assert_eq!(bitmap.get(0, 0), Some(&RED));
        assert_eq!(bitmap.get(size - 1, size - 1), Some(&ARGB::TRANSPARENT));
        assert_eq!(bitmap.get(size - 5, size - 5), Some(&ARGB::TRANSPARENT));
        // near the two far vertices
        assert_eq!(bitmap.get(27, 97), Some(&RED));
        assert_eq!(bitmap.get(97, 27), Some(&RED));
        // outside of the sides adjacent to the origin
        assert_eq!(bitmap.get(0, 50), Some(&ARGB::TRANSPARENT));
        assert_eq!(bitmap.get(50, 0), Some(&ARGB::TRANSPARENT));

        // area of the triangle: (size^2 - point^2) / 2
        let filled = bitmap.iter().filter(|c| c.alpha() > 0).count() as Scalar;
        let area = 0.5 * ((size * size) as Scalar - point * point);
        assert_approx_eq!(filled, area, 100.0);
        Ok(())
    }

    #[test]
    fn test_outline() {
        assert_eq!(
            ShapeKind::Square.outline(100.0).to_string(),
            "M0,0 L100,0 L100,100 L0,100 Z"
        );
        assert_eq!(
            ShapeKind::Triangle.outline(100.0).to_string(),
            "M0,0 L100,26.795 L26.795,100 Z"
        );
        assert_eq!(
            ShapeKind::Circle.outline(20.0).to_string(),
            "M20,10 A10,10 0 0 1 0,10 A10,10 0 0 1 20,10 Z"
        );
    }

    #[test]
    fn test_transparent_color() -> Result<(), SpriteError> {
        let bitmap = create_square_bitmap(ARGB::TRANSPARENT, 8)?;
        assert!(bitmap.iter().all(|c| *c == ARGB::TRANSPARENT));
        Ok(())
    }

    #[test]
    fn test_shape_kind() {
        for (index, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), index);
        }
        assert_eq!(ShapeKind::Triangle.to_string(), "triangle");
    }
}
