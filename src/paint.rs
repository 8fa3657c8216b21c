use crate::{ARGB, DEFAULT_FLATNESS, FillRule, Image, ImageMut, ImageOwned, Path, Scalar};

/// Style of a single fill operation
///
/// Style is an immutable value built for each draw call, nothing is carried
/// over from one draw to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: ARGB,
    pub fill_rule: FillRule,
    /// Scale color alpha by pixel coverage instead of sampling pixel centres
    pub antialias: bool,
    /// Maximum distance between curves and their line approximation
    pub flatness: Scalar,
}

impl FillStyle {
    pub fn new(color: ARGB) -> Self {
        Self {
            color,
            fill_rule: FillRule::default(),
            antialias: false,
            flatness: DEFAULT_FLATNESS,
        }
    }

    pub fn with_antialias(self, antialias: bool) -> Self {
        Self { antialias, ..self }
    }

    pub fn with_fill_rule(self, fill_rule: FillRule) -> Self {
        Self { fill_rule, ..self }
    }

    pub fn with_flatness(self, flatness: Scalar) -> Self {
        Self { flatness, ..self }
    }

    /// Color of a pixel with provided coverage
    ///
    /// Without anti-aliasing coverage is either `0.0` or `1.0` (see `Path::mask_aliased`),
    /// anything from a half up paints the full color.
    pub fn color_at(&self, coverage: Scalar) -> ARGB {
        if self.antialias {
            self.color.with_coverage(coverage)
        } else if coverage >= 0.5 {
            self.color
        } else {
            self.color.with_coverage(0.0)
        }
    }
}

/// Fill path with the style, compositing it on top of the image content
pub fn fill_path(path: &Path, style: FillStyle, mut img: impl ImageMut<Pixel = ARGB>) {
    let shape = img.shape();
    let mut mask = ImageOwned::<Scalar>::new_default(shape.size());
    if style.antialias {
        path.mask(style.flatness, style.fill_rule, &mut mask);
    } else {
        path.mask_aliased(style.flatness, style.fill_rule, &mut mask);
    }

    let data = img.data_mut();
    for (index, coverage) in mask.iter().enumerate() {
        if *coverage <= 0.0 {
            continue;
        }
        let src = style.color_at(*coverage);
        if src.alpha() == 0 {
            continue;
        }
        let Some((row, col)) = shape.nth(index) else {
            break;
        };
        let dst = &mut data[shape.offset(row, col)];
        *dst = dst.blend_over(src);
    }
}
