//! # Grid navmesh
//!
//! A walkable surface made of square cells on the XZ plane. Floors mark cells walkable at their
//! height, obstacles carve their footprint back out. The mesh answers "where is the nearest
//! walkable point" queries; it does not plan paths.

use crate::colliders::Collider;
use crate::errors::{WorldError, WorldResult};
use cgmath::MetricSpace;
use log::debug;
use std::collections::HashMap;

/// Cell coordinate on the navmesh grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
}

impl GridCell {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Convert a world position to the cell containing it.
    pub fn from_world_pos(world_pos: cgmath::Vector3<f32>, cell_size: f32) -> Self {
        Self {
            x: (world_pos.x / cell_size).round() as i32,
            z: (world_pos.z / cell_size).round() as i32,
        }
    }

    /// Center of the cell at the given floor height.
    pub fn to_world_pos(self, cell_size: f32, height: f32) -> cgmath::Vector3<f32> {
        cgmath::Vector3::new(self.x as f32 * cell_size, height, self.z as f32 * cell_size)
    }
}

/// Walkable cells and their floor heights.
#[derive(Debug, Clone)]
pub struct NavMesh {
    cell_size: f32,
    cells: HashMap<GridCell, f32>,
}

impl NavMesh {
    /// Creates an empty navmesh.
    ///
    /// # Arguments
    ///
    /// * `cell_size` - Edge length of a cell in world units.
    pub fn new(cell_size: f32) -> WorldResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(WorldError::InvalidCellSize(cell_size));
        }

        Ok(Self {
            cell_size,
            cells: HashMap::new(),
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of walkable cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Marks every cell whose center lies in the rectangle as walkable at `center.y`.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the floor; its height becomes the floor height.
    /// * `width` - Extent along X.
    /// * `depth` - Extent along Z.
    pub fn add_floor(&mut self, center: cgmath::Vector3<f32>, width: f32, depth: f32) {
        let half = cgmath::Vector3::new(width * 0.5, 0.0, depth * 0.5);
        for cell in self.cells_in(center - half, center + half) {
            self.cells.insert(cell, center.y);
        }
    }

    /// Removes every cell whose center lies under the collider's footprint.
    pub fn carve(&mut self, collider: &Collider) {
        let mut removed = 0;
        for cell in self.cells_in(collider.min(), collider.max()) {
            if self.cells.remove(&cell).is_some() {
                removed += 1;
            }
        }
        debug!("Carved {} navmesh cells under {}", removed, collider.tag);
    }

    /// Whether the cell under `point` is walkable.
    pub fn is_walkable(&self, point: cgmath::Vector3<f32>) -> bool {
        self.cells
            .contains_key(&GridCell::from_world_pos(point, self.cell_size))
    }

    /// Projects `point` onto the nearest walkable position within `max_distance`.
    ///
    /// A point above a walkable cell drops straight onto its floor. Otherwise the nearest cell
    /// center is used.
    ///
    /// # Returns
    ///
    /// `None` when nothing walkable lies within `max_distance`.
    pub fn sample_position(
        &self,
        point: cgmath::Vector3<f32>,
        max_distance: f32,
    ) -> Option<cgmath::Vector3<f32>> {
        let home = GridCell::from_world_pos(point, self.cell_size);
        if let Some(&height) = self.cells.get(&home) {
            let projected = cgmath::Vector3::new(point.x, height, point.z);
            if projected.distance(point) <= max_distance {
                return Some(projected);
            }
        }

        let reach = (f64::from(max_distance) / f64::from(self.cell_size)).ceil() + 1.0;
        let window = (2.0 * reach + 1.0).powi(2);

        if window > self.cells.len() as f64 {
            // The window holds more cells than the mesh, so scan the mesh instead.
            let cells = self.cells.iter().map(|(cell, height)| (*cell, *height));
            return self.nearest_cell(point, max_distance, cells);
        }

        let reach = reach as i64;
        let (home_x, home_z) = (i64::from(home.x), i64::from(home.z));
        let cells = (home_x - reach..=home_x + reach)
            .flat_map(|x| (home_z - reach..=home_z + reach).map(move |z| (x, z)))
            .filter_map(|(x, z)| {
                Some(GridCell::new(i32::try_from(x).ok()?, i32::try_from(z).ok()?))
            })
            .filter_map(|cell| self.cells.get(&cell).map(|height| (cell, *height)));
        self.nearest_cell(point, max_distance, cells)
    }

    /// Nearest cell center within `max_distance`; ties go to the lowest cell coordinate.
    fn nearest_cell(
        &self,
        point: cgmath::Vector3<f32>,
        max_distance: f32,
        cells: impl Iterator<Item = (GridCell, f32)>,
    ) -> Option<cgmath::Vector3<f32>> {
        cells
            .map(|(cell, height)| {
                let center = cell.to_world_pos(self.cell_size, height);
                (center.distance(point), cell, center)
            })
            .filter(|(distance, _, _)| *distance <= max_distance)
            .min_by(|(a, a_cell, _), (b, b_cell, _)| {
                a.total_cmp(b)
                    .then_with(|| (a_cell.x, a_cell.z).cmp(&(b_cell.x, b_cell.z)))
            })
            .map(|(_, _, center)| center)
    }

    /// Cells whose centers lie within the XZ rectangle spanned by `min` and `max`.
    fn cells_in(
        &self,
        min: cgmath::Vector3<f32>,
        max: cgmath::Vector3<f32>,
    ) -> impl Iterator<Item = GridCell> + use<> {
        let cs = self.cell_size;
        let (x0, x1) = ((min.x / cs).ceil() as i32, (max.x / cs).floor() as i32);
        let (z0, z1) = ((min.z / cs).ceil() as i32, (max.z / cs).floor() as i32);

        (x0..=x1).flat_map(move |x| (z0..=z1).map(move |z| GridCell::new(x, z)))
    }
}
