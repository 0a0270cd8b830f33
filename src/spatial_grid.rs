/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for collision neighbor lookups.
 * Bodies are bucketed by their planar (x, y) position into square cells as
 * wide as the collision radius, so every body closer than the radius lives
 * in the same or an adjacent cell. The lattice is unbounded, so cells are
 * kept in a map keyed by cell coordinates.
 *
 * Optimized for performance by:
 * - Reusing cell vectors between frames instead of reallocating
 * - Only visiting the 3x3 block of cells around a query position
 */

use std::collections::HashMap;

use nalgebra::Point3;

pub struct SpatialGrid {
    pub cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: HashMap::new(),
        }
    }

    // Convert world coordinates to cell coordinates
    #[inline]
    pub fn cell_of(&self, pos: &Point3<f32>) -> (i32, i32) {
        let cell_x = (pos.x / self.cell_size).floor() as i32;
        let cell_y = (pos.y / self.cell_size).floor() as i32;
        (cell_x, cell_y)
    }

    // Empty every cell but keep the allocations
    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    #[inline]
    pub fn insert(&mut self, index: usize, position: &Point3<f32>) {
        let cell = self.cell_of(position);
        self.cells.entry(cell).or_default().push(index);
    }

    // Clear, change the cell size if needed, and bucket every position
    pub fn rebuild(&mut self, cell_size: f32, positions: &[Point3<f32>]) {
        let cell_size = cell_size.max(f32::EPSILON);
        if (cell_size - self.cell_size).abs() > f32::EPSILON {
            self.cell_size = cell_size;
            self.cells.clear();
        } else {
            self.clear();
        }

        for (i, position) in positions.iter().enumerate() {
            self.insert(i, position);
        }
    }

    // Indices in the cell containing the position and its eight neighbours
    pub fn get_nearby_indices(&self, position: &Point3<f32>) -> Vec<usize> {
        let (cell_x, cell_y) = self.cell_of(position);
        let mut result = Vec::new();

        for y_offset in -1..=1 {
            for x_offset in -1..=1 {
                if let Some(cell) = self.cells.get(&(cell_x + x_offset, cell_y + y_offset)) {
                    result.extend_from_slice(cell);
                }
            }
        }

        result
    }
}
