//! Dot-grid construction.
//!
//! A [`Grid`] is an ordered list of rows, each row an ordered list of
//! [`Point`]s. Grids come either from [`build_synthetic_grid`] (always
//! rectangular) or from clustering detected dot centres with
//! [`build_grid_from_points`] (possibly irregular).

use serde::{Deserialize, Serialize};

/// Default row-band and comparison tolerance, in input coordinate units.
pub const DEFAULT_TOLERANCE: f64 = 12.0;

/// A dot centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x as f64, y as f64)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x as f64, y as f64)
    }
}

/// Detector output with a radius; the radius is ignored.
impl From<(f64, f64, f64)> for Point {
    fn from((x, y, _radius): (f64, f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One row of dots, ascending by `x`.
pub type Row = Vec<Point>;

/// Axis-aligned bounds of every point in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl GridBounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Rows of dots ordered top to bottom. Rows may differ in length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Row-major iterator over every point.
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.rows.iter().flatten()
    }

    /// Length of the shortest row, `None` for a grid with no rows.
    pub fn min_row_len(&self) -> Option<usize> {
        self.rows.iter().map(Vec::len).min()
    }

    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True when every row has the same length.
    pub fn is_rectangular(&self) -> bool {
        match self.rows.first() {
            Some(first) => self.rows.iter().all(|r| r.len() == first.len()),
            None => true,
        }
    }

    /// Bounds of all points; zeroed when the grid holds no points.
    pub fn bounds(&self) -> GridBounds {
        let mut it = self.points();
        let Some(first) = it.next() else {
            return GridBounds::default();
        };
        it.fold(
            GridBounds {
                min_x: first.x,
                max_x: first.x,
                min_y: first.y,
                max_y: first.y,
            },
            |b, p| GridBounds {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    /// Median horizontal gap between neighbouring dots in a row, `None`
    /// when no row has two dots.
    pub fn median_spacing(&self) -> Option<f64> {
        let mut gaps: Vec<f64> = self
            .rows
            .iter()
            .flat_map(|row| row.windows(2).map(|w| w[1].x - w[0].x))
            .filter(|g| *g > 0.0)
            .collect();
        if gaps.is_empty() {
            return None;
        }
        gaps.sort_by(f64::total_cmp);
        Some(gaps[gaps.len() / 2])
    }

    /// Multiplies every coordinate by `factor`.
    pub fn scaled(&self, factor: f64) -> Grid {
        self.map_points(|p| Point::new(p.x * factor, p.y * factor))
    }

    /// Translates the grid so its bounding box sits in the middle of a
    /// `width` x `height` canvas.
    pub fn centered_in(&self, width: f64, height: f64) -> Grid {
        if self.point_count() == 0 {
            return self.clone();
        }
        let b = self.bounds();
        let dx = (width - b.width()) / 2.0 - b.min_x;
        let dy = (height - b.height()) / 2.0 - b.min_y;
        self.map_points(|p| Point::new(p.x + dx, p.y + dy))
    }

    fn map_points(&self, f: impl Fn(&Point) -> Point) -> Grid {
        Grid::new(
            self.rows
                .iter()
                .map(|row| row.iter().map(&f).collect())
                .collect(),
        )
    }
}

/// Builds a `rows` x `cols` lattice where the dot at `(r, c)` sits at
/// `(c * spacing, r * spacing)`.
pub fn build_synthetic_grid(rows: usize, cols: usize, spacing: f64) -> Grid {
    Grid::new(
        (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| Point::new(c as f64 * spacing, r as f64 * spacing))
                    .collect()
            })
            .collect(),
    )
}

/// Clusters unordered dot centres into rows.
///
/// Points are visited in `(y, x)` order. Each point joins the first existing
/// row whose *first* point lies within `tolerance` on the y axis, or starts a
/// new row. Row anchors are never updated, so an outlying first point shapes
/// its whole row. Each row is finally sorted by `x`.
pub fn build_grid_from_points<I, P>(points: I, tolerance: f64) -> Grid
where
    I: IntoIterator<Item = P>,
    P: Into<Point>,
{
    let mut sorted: Vec<Point> = points.into_iter().map(Into::into).collect();
    if sorted.is_empty() {
        return Grid::empty();
    }
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Row> = Vec::new();
    for pt in sorted {
        let slot = rows
            .iter_mut()
            .find(|row| (row[0].y - pt.y).abs() <= tolerance);
        match slot {
            Some(row) => row.push(pt),
            None => rows.push(vec![pt]),
        }
    }

    for row in &mut rows {
        row.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    log::debug!(
        "clustered {} points into {} rows (tolerance {tolerance})",
        rows.iter().map(Vec::len).sum::<usize>(),
        rows.len()
    );
    Grid::new(rows)
}
