use crate::{
    Arc, ArcFlattenIter, ImageMut, Line, PI, Point, Scalar,
    geometry::scalar_fmt,
    rasterize::{centre_sample_mask, signed_difference_mask},
};
use std::fmt;

/// flatness of 0.05px gives good accuracy tradeoff
pub const DEFAULT_FLATNESS: Scalar = 0.05;

/// Smaller flatness values are raised to this one
pub const MIN_FLATNESS: Scalar = 1e-3;

/// Rule used to decide which points are inside of a self-intersecting path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillRule {
    /// Point is inside if winding number is not zero (platform default)
    #[default]
    NonZero,
    /// Point is inside if winding number is odd
    EvenOdd,
}

/// Path segment
#[derive(Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    Arc(Arc),
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Line(line) => fmt::Debug::fmt(line, f),
            Segment::Arc(arc) => fmt::Debug::fmt(arc, f),
        }
    }
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(line) => line.start(),
            Segment::Arc(arc) => arc.start(),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(line) => line.end(),
            Segment::Arc(arc) => arc.end(),
        }
    }

    pub fn reverse(&self) -> Self {
        match self {
            Segment::Line(line) => line.reverse().into(),
            Segment::Arc(arc) => arc.reverse().into(),
        }
    }

    /// Approximate segment with lines
    pub fn flatten(&self, flatness: Scalar) -> SegmentFlattenIter {
        match self {
            Segment::Line(line) => SegmentFlattenIter::Line(Some(*line)),
            Segment::Arc(arc) => SegmentFlattenIter::Arc(arc.flatten(flatness)),
        }
    }
}

impl From<Line> for Segment {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Arc> for Segment {
    fn from(arc: Arc) -> Self {
        Self::Arc(arc)
    }
}

pub enum SegmentFlattenIter {
    Line(Option<Line>),
    Arc(ArcFlattenIter),
}

impl Iterator for SegmentFlattenIter {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Line(line) => line.take(),
            Self::Arc(arc) => arc.next(),
        }
    }
}

/// Non-empty collections of segments where end of each segments conisides with the start of the next one.
#[derive(Clone, PartialEq)]
pub struct SubPath {
    /// List of segments representing SubPath
    segments: Vec<Segment>,
    /// Whether SubPath contains an implicit line segment connecting start and the end of it.
    closed: bool,
}

impl fmt::Debug for SubPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments.iter() {
            writeln!(f, "{:?}", segment)?;
        }
        if self.closed {
            writeln!(f, "Close")?;
        } else {
            writeln!(f, "End")?
        }
        Ok(())
    }
}

impl SubPath {
    pub fn new(segments: Vec<Segment>, closed: bool) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments, closed })
        }
    }

    pub fn closed(&self) -> bool {
        self.closed
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn start(&self) -> Point {
        self.segments[0].start()
    }

    pub fn end(&self) -> Point {
        self.segments[self.segments.len() - 1].end()
    }

    /// Convert subpath into a sequence of lines
    ///
    /// If `close` is set or subpath is closed, line from the end to the start is appended.
    pub fn flatten(&self, flatness: Scalar, close: bool) -> impl Iterator<Item = Line> + '_ {
        let (start, end) = (self.start(), self.end());
        let closing = ((close || self.closed) && !end.is_close_to(start)).then(|| Line([end, start]));
        self.segments
            .iter()
            .flat_map(move |segment| segment.flatten(flatness))
            .chain(closing)
    }
}

/// Collection of the SubPath treated as a signle unit
#[derive(Clone, PartialEq)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subpaths.is_empty() {
            write!(f, "Empty")?;
        } else {
            for subpath in self.subpaths.iter() {
                fmt::Debug::fmt(subpath, f)?
            }
        }
        Ok(())
    }
}

impl Path {
    /// Create path from the list of subpaths
    pub fn new(subpaths: Vec<SubPath>) -> Self {
        Self { subpaths }
    }

    pub fn empty() -> Self {
        Self {
            subpaths: Default::default(),
        }
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    /// Convenience method to create `PathBuilder`
    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    pub fn segments_count(&self) -> usize {
        self.subpaths
            .iter()
            .fold(0usize, |acc, subpath| acc + subpath.segments().len())
    }

    /// Convert path to an iterator over line segments
    pub fn flatten(&self, flatness: Scalar, close: bool) -> impl Iterator<Item = Line> + '_ {
        self.subpaths
            .iter()
            .flat_map(move |subpath| subpath.flatten(flatness, close))
    }

    /// Rasterize coverage mask of the path into a provided image.
    ///
    /// Everything that is outside of the image is cropped. Previous content of
    /// the image is overwritten.
    pub fn mask(&self, flatness: Scalar, fill_rule: FillRule, img: impl ImageMut<Pixel = Scalar>) {
        signed_difference_mask(self.flatten(flatness, true), fill_rule, img)
    }

    /// Rasterize aliased mask of the path into a provided image.
    ///
    /// Pixel is set to `1.0` if its centre is inside of the path and to `0.0` otherwise.
    pub fn mask_aliased(
        &self,
        flatness: Scalar,
        fill_rule: FillRule,
        img: impl ImageMut<Pixel = Scalar>,
    ) {
        centre_sample_mask(self.flatten(flatness, true), fill_rule, img)
    }
}

/// Path in the SVG path data format
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, subpath) in self.subpaths.iter().enumerate() {
            if index != 0 {
                write!(f, " ")?;
            }
            write!(f, "M{:?}", subpath.start())?;
            for segment in subpath.segments() {
                match segment {
                    Segment::Line(line) => write!(f, " L{:?}", line.end())?,
                    Segment::Arc(arc) => {
                        // svg arc can not describe a full circle, split it in halves
                        let halves = if arc.sweep().abs() > PI { 2 } else { 1 };
                        let sweep = arc.sweep() / halves as Scalar;
                        for half in 0..halves {
                            let end = arc.at((half + 1) as Scalar / halves as Scalar);
                            write!(f, " A")?;
                            scalar_fmt(f, arc.radius())?;
                            write!(f, ",")?;
                            scalar_fmt(f, arc.radius())?;
                            write!(
                                f,
                                " 0 {} {} {:?}",
                                (sweep.abs() > PI) as u8,
                                (sweep > 0.0) as u8,
                                end
                            )?;
                        }
                    }
                }
            }
            if subpath.closed() {
                write!(f, " Z")?;
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a SubPath;
    type IntoIter = <&'a Vec<SubPath> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.subpaths.iter()
    }
}

/// Path builder similar to Canvas/Cairo interface.
#[derive(Clone)]
pub struct PathBuilder {
    position: Point,
    subpath: Vec<Segment>,
    subpaths: Vec<SubPath>,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            position: Point::new(0.0, 0.0),
            subpath: Default::default(),
            subpaths: Default::default(),
        }
    }

    /// Build path
    pub fn build(&mut self) -> Path {
        let PathBuilder {
            subpath,
            mut subpaths,
            ..
        } = std::mem::take(self);
        subpaths.extend(SubPath::new(subpath, false));
        Path::new(subpaths)
    }

    /// Move current position, ending current subpath
    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        let subpath = std::mem::take(&mut self.subpath);
        self.subpaths.extend(SubPath::new(subpath, false));
        self.position = p.into();
        self
    }

    /// Close current subpath
    pub fn close(&mut self) -> &mut Self {
        let subpath = std::mem::take(&mut self.subpath);
        if let Some(seg) = subpath.first() {
            self.position = seg.start();
        }
        self.subpaths.extend(SubPath::new(subpath, true));
        self
    }

    /// Add line from the current position to the specified point
    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        let p = p.into();
        if !self.position.is_close_to(p) {
            let line = Line::new(self.position, p);
            self.position = line.end();
            self.subpath.push(line.into());
        }
        self
    }

    /// Add circle with the center at current position and provided radius.
    ///
    /// Current position is not changed after invocation.
    pub fn circle(&mut self, radius: Scalar) -> &mut Self {
        let center = self.position();
        let arc = Arc::new(center, radius, 0.0, 2.0 * PI);
        self.move_to(arc.start());
        self.subpath.push(arc.into());
        self.close().move_to(center)
    }

    /// Current possition of the builder
    pub fn position(&self) -> Point {
        self.position
    }
}
