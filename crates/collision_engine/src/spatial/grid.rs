//! Uniform grid spatial partitioning
//!
//! Divides the world rectangle, centered on the origin, into square cells of
//! [`CELL_SIZE`]. Every collider is inserted into each cell its bounds touch.
//! Bounds outside the world rectangle are clamped into the border cells, so two
//! overlapping colliders always share at least one cell.

use crate::ecs::Entity;
use crate::foundation::math::Vec2;
use std::ops::RangeInclusive;

/// Side length of a grid cell in world units
pub const CELL_SIZE: f32 = 100.0;

/// Largest number of cells a grid may allocate
pub const MAX_CELLS: usize = 1 << 20;

/// Single cell of the grid
#[derive(Debug, Clone, Default)]
pub struct GridCell {
    entities: Vec<Entity>,
    tested: bool,
}

impl GridCell {
    /// Entities whose bounds overlap this cell
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Whether the cell was already tested during the current pass
    pub fn is_tested(&self) -> bool {
        self.tested
    }

    fn reset(&mut self) {
        self.entities.clear();
        self.tested = false;
    }
}

/// Uniform grid over the world rectangle
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cells: Vec<GridCell>,
    columns: usize,
    rows: usize,
    size: Vec2,
}

impl SpatialGrid {
    /// Create an empty, unbuilt grid
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            columns: 0,
            rows: 0,
            size: Vec2::zeros(),
        }
    }

    /// Columns and rows needed to cover a `width` x `height` world
    ///
    /// Returns `None` for non-finite sizes or when the grid would exceed
    /// [`MAX_CELLS`].
    pub fn dimensions_for(width: f32, height: f32) -> Option<(usize, usize)> {
        let columns = cells_along(width)?;
        let rows = cells_along(height)?;
        columns
            .checked_mul(rows)
            .filter(|&count| count <= MAX_CELLS)
            .map(|_| (columns, rows))
    }

    /// Allocate cells covering a `width` x `height` world
    ///
    /// Returns `false` without touching the cells when the grid is already
    /// built for that size. A size that cannot be gridded releases the cells
    /// and returns `false`.
    pub fn setup_grid(&mut self, width: f32, height: f32) -> bool {
        let Some((columns, rows)) = Self::dimensions_for(width, height) else {
            log::warn!("Cannot build collision grid for world {}x{}", width, height);
            if self.is_built() {
                self.clear_grid();
            }
            return false;
        };

        let size = Vec2::new(width.max(0.0), height.max(0.0));
        if self.is_built() && self.size == size {
            return false;
        }

        self.columns = columns;
        self.rows = rows;
        self.size = size;
        self.cells = vec![GridCell::default(); columns * rows];

        log::debug!(
            "Built collision grid {}x{} cells for world {}x{}",
            self.columns,
            self.rows,
            size.x,
            size.y
        );
        true
    }

    /// Clear every cell and re-insert the given colliders by their bounds
    ///
    /// Each item is `(entity, min, max)`.
    pub fn update_grid<I>(&mut self, colliders: I)
    where
        I: IntoIterator<Item = (Entity, Vec2, Vec2)>,
    {
        for cell in &mut self.cells {
            cell.reset();
        }
        if !self.is_built() {
            return;
        }

        for (entity, min, max) in colliders {
            let (columns, rows) = self.cell_range(min, max);
            for row in rows {
                for column in columns.clone() {
                    let index = self.cell_index(column, row);
                    self.cells[index].entities.push(entity);
                }
            }
        }
    }

    /// Release all cell storage
    pub fn clear_grid(&mut self) {
        self.cells = Vec::new();
        self.columns = 0;
        self.rows = 0;
        self.size = Vec2::zeros();
        log::debug!("Cleared collision grid");
    }

    /// Whether cells are allocated
    pub fn is_built(&self) -> bool {
        !self.cells.is_empty()
    }

    /// World size the grid was built for; zero when not built
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Number of columns and rows
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Mark a cell tested and return its members
    ///
    /// Returns `None` when the cell does not exist, was already tested this
    /// pass, or holds fewer than two entities.
    pub fn begin_cell_test(&mut self, index: usize) -> Option<Vec<Entity>> {
        let cell = self.cells.get_mut(index)?;
        if cell.tested {
            return None;
        }
        cell.tested = true;
        (cell.entities.len() > 1).then(|| cell.entities.clone())
    }

    /// Index of the cell at `column`, `row`
    pub fn cell_index(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    /// Inclusive column and row ranges covered by the given bounds
    fn cell_range(&self, min: Vec2, max: Vec2) -> (RangeInclusive<usize>, RangeInclusive<usize>) {
        let origin = -self.size * 0.5;
        let columns = axis_cell(min.x - origin.x, self.columns)..=axis_cell(max.x - origin.x, self.columns);
        let rows = axis_cell(min.y - origin.y, self.rows)..=axis_cell(max.y - origin.y, self.rows);
        (columns, rows)
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new()
    }
}

fn cells_along(extent: f32) -> Option<usize> {
    if !extent.is_finite() {
        return None;
    }
    let cells = (extent.max(0.0) / CELL_SIZE).ceil();
    if cells > MAX_CELLS as f32 {
        return None;
    }
    // At least one cell per axis
    Some((cells as usize).max(1))
}

fn axis_cell(offset: f32, count: usize) -> usize {
    let last = count.saturating_sub(1);
    let cell = (offset / CELL_SIZE).floor();
    if cell <= 0.0 {
        0
    } else {
        (cell as usize).min(last)
    }
}
