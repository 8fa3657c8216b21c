use crate::{ARGB, Bitmap, ImageMut, ShapeKind, Size, SpriteError, SpriteRenderer};

/// Confetti sprites generated for a palette
///
/// Sprites are stored the same way `SpriteRenderer::generate` returns them:
/// three consecutive sprites (circle, square, triangle) per color.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiSprites {
    colors: Vec<ARGB>,
    size: usize,
    bitmaps: Vec<Bitmap>,
}

impl ConfettiSprites {
    /// Render sprites for all colors
    pub fn new(renderer: &SpriteRenderer, colors: &[ARGB], size: usize) -> Result<Self, SpriteError> {
        let bitmaps = renderer.generate(colors, size)?;
        Ok(Self {
            colors: colors.to_vec(),
            size,
            bitmaps,
        })
    }

    /// Palette used to generate sprites
    pub fn colors(&self) -> &[ARGB] {
        &self.colors
    }

    pub fn colors_count(&self) -> usize {
        self.colors.len()
    }

    /// Width and height of every sprite
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    /// Sprite of the shape generated for the color at `color_index`
    pub fn get(&self, color_index: usize, kind: ShapeKind) -> Option<&Bitmap> {
        self.bitmaps
            .get(color_index * ShapeKind::ALL.len() + kind.index())
    }

    /// Pick sprite by an arbitrary (usually random) number
    ///
    /// Number is wrapped around the amount of sprites, `None` only if there are no sprites.
    pub fn sample(&self, n: usize) -> Option<&Bitmap> {
        if self.bitmaps.is_empty() {
            return None;
        }
        self.bitmaps.get(n % self.bitmaps.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bitmap> {
        self.bitmaps.iter()
    }

    pub fn into_vec(self) -> Vec<Bitmap> {
        self.bitmaps
    }

    /// Compose all sprites into a single image
    ///
    /// Each row of the atlas contains sprites of one color, each column one shape kind.
    /// Returns `None` if the atlas dimensions do not fit into memory.
    pub fn atlas(&self) -> Option<Bitmap> {
        let columns = ShapeKind::ALL.len();
        let size = Size {
            width: self.size.checked_mul(columns)?,
            height: self.size.checked_mul(self.colors.len())?,
        };
        let bytes = size.area()?.checked_mul(size_of::<ARGB>())?;
        if bytes > isize::MAX as usize {
            return None;
        }
        let mut atlas = Bitmap::new_default(size);
        for (index, bitmap) in self.bitmaps.iter().enumerate() {
            let (row, col) = (index / columns, index % columns);
            atlas.blit(row * self.size, col * self.size, bitmap);
        }
        Some(atlas)
    }
}

impl<'a> IntoIterator for &'a ConfettiSprites {
    type Item = &'a Bitmap;
    type IntoIter = std::slice::Iter<'a, Bitmap>;

    fn into_iter(self) -> Self::IntoIter {
        self.bitmaps.iter()
    }
}
