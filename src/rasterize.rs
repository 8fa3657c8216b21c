//! Signed difference coverage rasterizer
//!
//! Every line of a closed outline adds to the accumulation buffer the difference
//! of covered area between adjacent pixels of a row. Prefix sum over a row turns
//! those differences into the winding-weighted coverage of each pixel, which is
//! then mapped to `[0, 1]` according to the fill rule.
//!
//! Aliased masks use the same buffer, but a line only records a whole winding
//! step in the row wherever it crosses the row centre, so each pixel ends up
//! either fully inside or outside depending on its centre.
use crate::{EPSILON, FillRule, Image, ImageMut, ImageOwned, Line, Point, Scalar, Size};
use std::cmp::min;

/// Rasterize closed outline given as a sequence of lines into a coverage mask.
///
/// Mask is overwritten with values in `[0, 1]`, everything outside of it is cropped.
pub(crate) fn signed_difference_mask(
    lines: impl IntoIterator<Item = Line>,
    fill_rule: FillRule,
    mask: impl ImageMut<Pixel = Scalar>,
) {
    let Size { width, height } = mask.size();
    // two extra columns, lines touching right border write one pixel past it
    let mut acc = ImageOwned::<Scalar>::new_default(Size {
        width: width + 2,
        height,
    });
    let mut count = 0usize;
    for line in lines {
        signed_difference_line(&mut acc, width as Scalar, line);
        count += 1;
    }
    tracing::trace!(lines = count, width, height, "[mask]");
    signed_difference_to_mask(&acc, fill_rule, mask);
}

/// Rasterize closed outline into a mask that contains only `0.0` and `1.0`
///
/// Pixel is inside if its centre is inside of the outline according to the fill rule.
pub(crate) fn centre_sample_mask(
    lines: impl IntoIterator<Item = Line>,
    fill_rule: FillRule,
    mask: impl ImageMut<Pixel = Scalar>,
) {
    let Size { width, height } = mask.size();
    let mut acc = ImageOwned::<Scalar>::new_default(Size {
        width: width + 2,
        height,
    });
    let mut count = 0usize;
    for line in lines {
        centre_sample_line(&mut acc, width, line);
        count += 1;
    }
    tracing::trace!(lines = count, width, height, "[mask aliased]");
    signed_difference_to_mask(&acc, fill_rule, mask);
}

/// Record winding change in every row where the line crosses the row centre
///
/// Change is stored in the first column with the centre right of the crossing,
/// crossings left of the image land in the first column.
fn centre_sample_line(acc: &mut ImageOwned<Scalar>, width: usize, line: Line) {
    let Line([p0, p1]) = line;
    let (dir, p0, p1) = if p0.y() < p1.y() {
        (1.0, p0, p1)
    } else if p0.y() > p1.y() {
        (-1.0, p1, p0)
    } else {
        return;
    };
    let shape = acc.shape();
    let data = acc.data_mut();
    let dxdy = (p1.x() - p0.x()) / (p1.y() - p0.y());
    // rows with the centre in `[p0.y, p1.y)`
    let row_start = (p0.y() - 0.5).ceil().max(0.0) as usize;
    let row_end = min(shape.height, (p1.y() - 0.5).ceil().max(0.0) as usize);
    for row in row_start..row_end {
        let x = p0.x() + (row as Scalar + 0.5 - p0.y()) * dxdy;
        let col = (x - 0.5).ceil().clamp(0.0, width as Scalar) as usize;
        data[shape.offset(row, col)] += dir;
    }
}

/// Update accumulation buffer with the signed difference of the line
///
/// `width` is a width of the visible area, accumulation buffer must be at
/// least two pixels wider.
pub(crate) fn signed_difference_line(acc: &mut ImageOwned<Scalar>, width: Scalar, line: Line) {
    // right of the visible area line only affects invisible columns
    let line = match split_at_x(line, width) {
        (Some(line), _) => line,
        (None, _) => return,
    };
    // left of the visible area line is projected on `x == 0.0`, which makes
    // its whole signed coverage land in the first column
    let (left, line) = split_at_x(line, 0.0);
    if let Some(Line([p0, p1])) = left {
        signed_difference_accumulate(acc, Line::new((0.0, p0.y()), (0.0, p1.y())));
    }
    if let Some(line) = line {
        signed_difference_accumulate(acc, line);
    }
}

/// Split line into parts that are left (`x < at`) and right of the vertical line
fn split_at_x(line: Line, at: Scalar) -> (Option<Line>, Option<Line>) {
    let Line([p0, p1]) = line;
    match (p0.x() < at, p1.x() < at) {
        (true, true) => (Some(line), None),
        (false, false) => (None, Some(line)),
        (p0_left, _) => {
            let t = (at - p0.x()) / (p1.x() - p0.x());
            let mid = Point::new(at, (1.0 - t) * p0.y() + t * p1.y());
            if p0_left {
                (Some(Line([p0, mid])), Some(Line([mid, p1])))
            } else {
                (Some(Line([mid, p1])), Some(Line([p0, mid])))
            }
        }
    }
}

/// Accumulate signed difference of the line with `x` in `[0, acc.width() - 2]`
fn signed_difference_accumulate(acc: &mut ImageOwned<Scalar>, line: Line) {
    let Line([p0, p1]) = line;
    if (p0.y() - p1.y()).abs() < EPSILON {
        // horizontal line does not introduce any signed converage
        return;
    }
    let shape = acc.shape();
    let data = acc.data_mut();

    // always iterate from the point with the smallest y coordinate
    let (dir, p0, p1) = if p0.y() < p1.y() {
        (1.0, p0, p1)
    } else {
        (-1.0, p1, p0)
    };
    let dxdy = (p1.x() - p0.x()) / (p1.y() - p0.y());
    // start from the first visible row and adjust x accordingly
    let row_start = p0.y().max(0.0) as usize;
    let row_end = min(shape.height, p1.y().ceil().max(0.0) as usize);
    let mut x_next = if p0.y() < 0.0 {
        p0.x() - p0.y() * dxdy
    } else {
        p0.x()
    };
    for row in row_start..row_end {
        let x = x_next;
        let mut add = |col: i64, value: Scalar| data[shape.offset(row, col as usize)] += value;
        // signed height of the line inside of the current row
        let dy = ((row + 1) as Scalar).min(p1.y()) - (row as Scalar).max(p0.y());
        let d = dir * dy;
        x_next = x + dxdy * dy;

        let (x0, x1) = if x < x_next { (x, x_next) } else { (x_next, x) };
        let x0_floor = x0.floor().max(0.0);
        let x0i = x0_floor as i64;
        let x1_ceil = x1.ceil();
        let x1i = x1_ceil as i64;
        if x1i <= x0i + 1 {
            // line stays within one pixel, coverage is split between it and the next one
            let xmf = 0.5 * (x + x_next) - x0_floor;
            add(x0i, d * (1.0 - xmf));
            add(x0i + 1, d * xmf);
        } else {
            let s = (x1 - x0).recip();
            let x0f = x0 - x0_floor;
            let x1f = x1 - x1_ceil + 1.0;
            // area of the triangle in the first and the last pixels
            let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
            let am = 0.5 * s * x1f * x1f;
            add(x0i, d * a0);
            if x1i == x0i + 2 {
                add(x0i + 1, d * (1.0 - a0 - am));
            } else {
                let a1 = s * (1.5 - x0f);
                add(x0i + 1, d * (a1 - a0));
                for col in x0i + 2..x1i - 1 {
                    add(col, d * s);
                }
                let a2 = a1 + (x1i - x0i - 3) as Scalar * s;
                add(x1i - 1, d * (1.0 - a2 - am));
            }
            add(x1i, d * am);
        }
    }
}

/// Convert accumulated signed differences into coverage mask
///
/// Also used for aliased masks, where accumulated values are whole winding numbers.
fn signed_difference_to_mask(
    acc: &ImageOwned<Scalar>,
    fill_rule: FillRule,
    mut mask: impl ImageMut<Pixel = Scalar>,
) {
    let shape = mask.shape();
    let acc_shape = acc.shape();
    let acc_data = acc.data();
    let data = mask.data_mut();
    for row in 0..shape.height {
        let mut winding = 0.0;
        for col in 0..shape.width {
            winding += acc_data[acc_shape.offset(row, col)];
            data[shape.offset(row, col)] = match fill_rule {
                FillRule::NonZero => {
                    let value = winding.abs();
                    if value > 1.0 {
                        1.0
                    } else if value < 1e-6 {
                        0.0
                    } else {
                        value
                    }
                }
                FillRule::EvenOdd => ((winding + 1.0).rem_euclid(2.0) - 1.0).abs(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    fn acc_new(width: usize, height: usize) -> ImageOwned<Scalar> {
        ImageOwned::new_default(Size {
            width: width + 2,
            height,
        })
    }

    fn at(acc: &ImageOwned<Scalar>, row: usize, col: usize) -> Scalar {
        *acc.get(row, col).unwrap()
    }

    #[test]
    fn test_signed_difference_line() {
        let mut acc = acc_new(5, 2);

        // line convers many columns but just one row
        signed_difference_line(&mut acc, 5.0, Line::new((0.5, 1.0), (3.5, 0.0)));
        // covered areas per-pixel
        let a0 = (0.5 * (1.0 / 6.0)) / 2.0;
        let a1 = ((1.0 / 6.0) + (3.0 / 6.0)) / 2.0;
        let a2 = ((3.0 / 6.0) + (5.0 / 6.0)) / 2.0;
        assert_approx_eq!(at(&acc, 0, 0), -a0);
        assert_approx_eq!(at(&acc, 0, 1), a0 - a1);
        assert_approx_eq!(at(&acc, 0, 2), a1 - a2);
        assert_approx_eq!(at(&acc, 0, 3), a0 - a1);
        assert_approx_eq!(at(&acc, 0, 4), -a0);
        // total difference
        let a: Scalar = acc.iter().sum();
        assert_approx_eq!(a, -1.0);
        acc.clear();

        // out of bound line (intersects x = 0.0)
        signed_difference_line(&mut acc, 5.0, Line::new((-1.0, 0.0), (1.0, 1.0)));
        assert_approx_eq!(at(&acc, 0, 0), 3.0 / 4.0);
        assert_approx_eq!(at(&acc, 0, 1), 1.0 / 4.0);
        acc.clear();

        // multiple rows diag
        signed_difference_line(&mut acc, 5.0, Line::new((0.0, -0.5), (2.0, 1.5)));
        assert_approx_eq!(at(&acc, 0, 0), 1.0 / 8.0);
        assert_approx_eq!(at(&acc, 0, 1), 1.0 - 2.0 / 8.0);
        assert_approx_eq!(at(&acc, 0, 2), 1.0 / 8.0);
        assert_approx_eq!(at(&acc, 1, 1), 1.0 / 8.0);
        assert_approx_eq!(at(&acc, 1, 2), 0.5 - 1.0 / 8.0);
        acc.clear();

        // single pixel covered
        signed_difference_line(&mut acc, 5.0, Line::new((0.1, 0.1), (0.9, 0.9)));
        assert_approx_eq!(at(&acc, 0, 0), 0.4);
        assert_approx_eq!(at(&acc, 0, 1), 0.8 - 0.4);
        acc.clear();

        // multiple rows vertical
        signed_difference_line(&mut acc, 5.0, Line::new((0.5, 0.5), (0.5, 1.75)));
        assert_approx_eq!(at(&acc, 0, 0), 1.0 / 4.0);
        assert_approx_eq!(at(&acc, 0, 1), 1.0 / 4.0);
        assert_approx_eq!(at(&acc, 1, 0), 3.0 / 8.0);
        assert_approx_eq!(at(&acc, 1, 1), 3.0 / 8.0);
    }

    #[test]
    fn test_right_border() {
        let mut acc = acc_new(3, 1);
        // vertical line on the right border touches only invisible columns
        signed_difference_line(&mut acc, 3.0, Line::new((3.0, 0.0), (3.0, 1.0)));
        assert!(acc.iter().all(|v| v.abs() < EPSILON));

        // line crossing the right border is cut at it
        signed_difference_line(&mut acc, 3.0, Line::new((2.0, 0.0), (4.0, 1.0)));
        let visible: Scalar = (0..3).map(|col| at(&acc, 0, col)).sum();
        assert_approx_eq!(visible, 0.5 * 0.5, 1e-9);
    }

    #[test]
    fn test_split_at_x() {
        let line = Line::new((-1.0, 0.0), (1.0, 2.0));
        let (left, right) = split_at_x(line, 0.0);
        let left = left.unwrap();
        let right = right.unwrap();
        assert!(left.start().is_close_to(Point::new(-1.0, 0.0)));
        assert!(left.end().is_close_to(Point::new(0.0, 1.0)));
        assert!(right.start().is_close_to(Point::new(0.0, 1.0)));
        assert!(right.end().is_close_to(Point::new(1.0, 2.0)));

        // direction of the line is preserved
        let (left, right) = split_at_x(line.reverse(), 0.0);
        assert!(left.unwrap().end().is_close_to(Point::new(-1.0, 0.0)));
        assert!(right.unwrap().start().is_close_to(Point::new(1.0, 2.0)));

        assert_eq!(split_at_x(line, 5.0), (Some(line), None));
        assert_eq!(split_at_x(line, -5.0), (None, Some(line)));
    }

    #[test]
    fn test_mask_rect() {
        // rectangle partially outside of the mask on every side
        let lines = [
            Line::new((-1.0, -1.0), (3.5, -1.0)),
            Line::new((3.5, -1.0), (3.5, 2.5)),
            Line::new((3.5, 2.5), (-1.0, 2.5)),
            Line::new((-1.0, 2.5), (-1.0, -1.0)),
        ];
        let mut mask = ImageOwned::new_default(Size::square(3));
        signed_difference_mask(lines, FillRule::NonZero, &mut mask);
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == 2 { 0.5 } else { 1.0 };
                assert_approx_eq!(*mask.get(row, col).unwrap(), expected, 1e-9);
            }
        }
    }

    #[test]
    fn test_centre_sample_line() {
        let mut acc = acc_new(4, 3);
        // crosses centres of rows 0 and 1 only, row 2 centre is at 2.5
        centre_sample_line(&mut acc, 4, Line::new((1.0, 0.0), (3.0, 2.0)));
        assert_approx_eq!(at(&acc, 0, 1), 1.0);
        assert_approx_eq!(at(&acc, 1, 2), 1.0);
        assert_approx_eq!(acc.iter().sum::<Scalar>(), 2.0);
        acc.clear();

        // crossings outside of the image are moved to its borders
        centre_sample_line(&mut acc, 4, Line::new((-3.0, 3.0), (-3.0, 0.0)));
        centre_sample_line(&mut acc, 4, Line::new((9.0, 0.0), (9.0, 3.0)));
        for row in 0..3 {
            assert_approx_eq!(at(&acc, row, 0), -1.0);
            assert_approx_eq!(at(&acc, row, 4), 1.0);
        }
        acc.clear();

        // horizontal line does not change winding
        centre_sample_line(&mut acc, 4, Line::new((0.0, 0.5), (4.0, 0.5)));
        assert!(acc.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_centre_sample_mask() {
        // covers less than a half of the pixel but contains its centre
        let size = 1.0;
        let point = (crate::PI / 12.0).tan() * size;
        let triangle = [
            Line::new((0.0, 0.0), (size, point)),
            Line::new((size, point), (point, size)),
            Line::new((point, size), (0.0, 0.0)),
        ];
        let mut mask = ImageOwned::new_default(Size::square(1));
        signed_difference_mask(triangle, FillRule::NonZero, &mut mask);
        assert!(*mask.get(0, 0).unwrap() < 0.5);
        centre_sample_mask(triangle, FillRule::NonZero, &mut mask);
        assert_approx_eq!(*mask.get(0, 0).unwrap(), 1.0);

        // pixel is painted when the rectangle contains its centre
        let rect = [
            Line::new((0.6, 0.0), (2.6, 0.0)),
            Line::new((2.6, 0.0), (2.6, 3.0)),
            Line::new((2.6, 3.0), (0.6, 3.0)),
            Line::new((0.6, 3.0), (0.6, 0.0)),
        ];
        let mut mask = ImageOwned::new_default(Size::square(3));
        centre_sample_mask(rect, FillRule::NonZero, &mut mask);
        for row in 0..3 {
            assert_approx_eq!(*mask.get(row, 0).unwrap(), 0.0);
            assert_approx_eq!(*mask.get(row, 1).unwrap(), 1.0);
            assert_approx_eq!(*mask.get(row, 2).unwrap(), 1.0);
        }
    }
}
