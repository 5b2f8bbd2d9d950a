//! The mutable 3D walkability grid and its BFS distance field.

use smallvec::SmallVec;
use std::collections::VecDeque;
use strew_core::{Direction, RobotId, Vec3};

/// Distance value for cells unreachable from the door.
pub const UNREACHABLE: u32 = u32::MAX;

/// A bounded 3D grid: walkability, door, door-distance field, and the
/// robot-occupancy back-pointer index.
///
/// Storage is flat and allocated once at construction; every per-cell
/// query is index arithmetic. Coordinates outside the volume are rejected
/// silently by the mutating operations and read as "nothing there" by the
/// queries, per the engine's recover-locally error policy.
#[derive(Clone, Debug)]
pub struct Grid {
    size_x: i32,
    size_y: i32,
    size_z: i32,
    walkable: Vec<bool>,
    distance: Vec<u32>,
    robot_at: Vec<Option<RobotId>>,
    door: Vec3,
    available_cells: u32,
}

impl Grid {
    /// Maximum extent per axis. Requested dimensions are clamped here.
    pub const MAX_DIM: i32 = 20;

    /// Create a grid with every cell non-walkable and the door at the
    /// origin. Each dimension is clamped to `[0, MAX_DIM]`.
    pub fn new(size_x: i32, size_y: i32, size_z: i32) -> Self {
        let sx = size_x.clamp(0, Self::MAX_DIM);
        let sy = size_y.clamp(0, Self::MAX_DIM);
        let sz = size_z.clamp(0, Self::MAX_DIM);
        let n = (sx * sy * sz) as usize;
        Self {
            size_x: sx,
            size_y: sy,
            size_z: sz,
            walkable: vec![false; n],
            distance: vec![UNREACHABLE; n],
            robot_at: vec![None; n],
            door: Vec3::ZERO,
            available_cells: 0,
        }
    }

    /// Extent along the x axis.
    pub fn size_x(&self) -> i32 {
        self.size_x
    }

    /// Extent along the y axis.
    pub fn size_y(&self) -> i32 {
        self.size_y
    }

    /// Extent along the z axis.
    pub fn size_z(&self) -> i32 {
        self.size_z
    }

    /// Total number of cells in the volume. Also the robot-arena capacity.
    pub fn cell_count(&self) -> usize {
        (self.size_x * self.size_y * self.size_z) as usize
    }

    /// Whether a coordinate lies inside the volume.
    pub fn contains(&self, v: Vec3) -> bool {
        (0..self.size_x).contains(&v.x)
            && (0..self.size_y).contains(&v.y)
            && (0..self.size_z).contains(&v.z)
    }

    fn index(&self, v: Vec3) -> Option<usize> {
        if !self.contains(v) {
            return None;
        }
        Some(((v.x * self.size_y + v.y) * self.size_z + v.z) as usize)
    }

    /// The door cell.
    pub fn door(&self) -> Vec3 {
        self.door
    }

    /// Retarget the door. Out-of-volume coordinates are ignored.
    ///
    /// The distance field is not touched; callers decide when to
    /// [`recompute_distances`](Grid::recompute_distances).
    pub fn set_door(&mut self, v: Vec3) -> bool {
        if !self.contains(v) {
            return false;
        }
        self.door = v;
        true
    }

    /// Walkability of a cell. Out-of-volume cells are not walkable.
    pub fn is_walkable(&self, v: Vec3) -> bool {
        self.index(v).map(|i| self.walkable[i]).unwrap_or(false)
    }

    /// Set the walkability of a cell, maintaining the available-cell count.
    /// Out-of-volume coordinates are ignored.
    pub fn set_walkable(&mut self, v: Vec3, walkable: bool) -> bool {
        let Some(i) = self.index(v) else {
            return false;
        };
        match (self.walkable[i], walkable) {
            (false, true) => self.available_cells += 1,
            (true, false) => self.available_cells -= 1,
            _ => {}
        }
        self.walkable[i] = walkable;
        true
    }

    /// Number of walkable cells in the current volume.
    pub fn available_cells(&self) -> u32 {
        self.available_cells
    }

    /// BFS distance of a cell from the door, or [`UNREACHABLE`].
    pub fn distance_at(&self, v: Vec3) -> u32 {
        self.index(v).map(|i| self.distance[i]).unwrap_or(UNREACHABLE)
    }

    /// The robot occupying a cell, if the occupancy index has one.
    pub fn robot_at(&self, v: Vec3) -> Option<RobotId> {
        self.index(v).and_then(|i| self.robot_at[i])
    }

    /// Point the occupancy index at a robot. Out-of-volume is ignored.
    pub fn set_robot_at(&mut self, v: Vec3, id: RobotId) {
        if let Some(i) = self.index(v) {
            self.robot_at[i] = Some(id);
        }
    }

    /// Clear the occupancy index.
    pub fn clear_robots(&mut self) {
        self.robot_at.fill(None);
    }

    /// In-volume neighbours of a cell, in canonical direction order.
    pub fn neighbours(&self, v: Vec3) -> SmallVec<[Vec3; 6]> {
        Direction::ALL
            .into_iter()
            .map(|d| v + d.vec())
            .filter(|n| self.contains(*n))
            .collect()
    }

    /// Rebuild the distance field: a 6-connected breadth-first expansion
    /// from the door over walkable cells. Unreachable cells keep
    /// [`UNREACHABLE`]. The queue is bounded by the cell count.
    pub fn recompute_distances(&mut self) {
        self.distance.fill(UNREACHABLE);
        let Some(start) = self.index(self.door) else {
            return;
        };
        self.distance[start] = 0;

        let mut queue: VecDeque<(Vec3, u32)> = VecDeque::with_capacity(self.cell_count());
        queue.push_back((self.door, 0));

        while let Some((v, dist)) = queue.pop_front() {
            for next in self.neighbours(v) {
                let Some(i) = self.index(next) else {
                    continue;
                };
                if !self.walkable[i] || self.distance[i] != UNREACHABLE {
                    continue;
                }
                self.distance[i] = dist + 1;
                queue.push_back((next, dist + 1));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(x: i32, y: i32, z: i32) -> Grid {
        let mut grid = Grid::new(x, y, z);
        for cx in 0..x {
            for cy in 0..y {
                for cz in 0..z {
                    grid.set_walkable(Vec3::new(cx, cy, cz), true);
                }
            }
        }
        grid
    }

    #[test]
    fn dimensions_are_clamped() {
        let grid = Grid::new(25, -1, 3);
        assert_eq!(grid.size_x(), Grid::MAX_DIM);
        assert_eq!(grid.size_y(), 0);
        assert_eq!(grid.size_z(), 3);
        assert_eq!(grid.cell_count(), 0);
    }

    #[test]
    fn out_of_volume_edits_are_ignored() {
        let mut grid = Grid::new(2, 2, 2);
        assert!(!grid.set_walkable(Vec3::new(2, 0, 0), true));
        assert!(!grid.set_walkable(Vec3::new(0, -1, 0), true));
        assert!(!grid.set_door(Vec3::new(5, 5, 5)));
        assert_eq!(grid.available_cells(), 0);
        assert_eq!(grid.door(), Vec3::ZERO);
    }

    #[test]
    fn available_cells_tracks_flips() {
        let mut grid = Grid::new(2, 1, 1);
        grid.set_walkable(Vec3::ZERO, true);
        grid.set_walkable(Vec3::ZERO, true); // idempotent
        assert_eq!(grid.available_cells(), 1);
        grid.set_walkable(Vec3::ZERO, false);
        assert_eq!(grid.available_cells(), 0);
    }

    #[test]
    fn bfs_distances_along_corridor() {
        let mut grid = open_grid(1, 1, 5);
        grid.set_door(Vec3::ZERO);
        grid.recompute_distances();
        for z in 0..5 {
            assert_eq!(grid.distance_at(Vec3::new(0, 0, z)), z as u32);
        }
    }

    #[test]
    fn bfs_respects_walls() {
        // 1x1x5 corridor with the middle cell walled off: the far side is
        // unreachable even though it is walkable.
        let mut grid = open_grid(1, 1, 5);
        grid.set_walkable(Vec3::new(0, 0, 2), false);
        grid.set_door(Vec3::ZERO);
        grid.recompute_distances();
        assert_eq!(grid.distance_at(Vec3::new(0, 0, 1)), 1);
        assert_eq!(grid.distance_at(Vec3::new(0, 0, 2)), UNREACHABLE);
        assert_eq!(grid.distance_at(Vec3::new(0, 0, 3)), UNREACHABLE);
        assert_eq!(grid.distance_at(Vec3::new(0, 0, 4)), UNREACHABLE);
    }

    #[test]
    fn bfs_takes_shortest_path() {
        // 3x1x3 open plane, door in a corner: distance is Manhattan.
        let mut grid = open_grid(3, 1, 3);
        grid.set_door(Vec3::ZERO);
        grid.recompute_distances();
        assert_eq!(grid.distance_at(Vec3::new(2, 0, 2)), 4);
        assert_eq!(grid.distance_at(Vec3::new(1, 0, 1)), 2);
    }

    #[test]
    fn neighbours_clip_at_bounds() {
        let grid = open_grid(2, 2, 2);
        let corner = grid.neighbours(Vec3::ZERO);
        assert_eq!(corner.len(), 3);
        let inner = grid.neighbours(Vec3::new(1, 1, 1));
        assert_eq!(inner.len(), 3);
    }

    #[test]
    fn occupancy_index_round_trips() {
        let mut grid = open_grid(2, 2, 2);
        grid.set_robot_at(Vec3::new(1, 0, 1), RobotId(4));
        assert_eq!(grid.robot_at(Vec3::new(1, 0, 1)), Some(RobotId(4)));
        grid.clear_robots();
        assert_eq!(grid.robot_at(Vec3::new(1, 0, 1)), None);
        // Out-of-volume writes vanish.
        grid.set_robot_at(Vec3::new(9, 9, 9), RobotId(1));
        assert_eq!(grid.robot_at(Vec3::new(9, 9, 9)), None);
    }
}
