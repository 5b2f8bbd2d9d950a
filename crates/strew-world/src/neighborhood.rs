//! The fixed 3×3×3 observation buffer and its reachability test.
//!
//! Robots are strictly local observers: every decision is a function of
//! this buffer and nothing else. The buffer is a value type and lives on
//! the stack; assembling one allocates nothing.

use strew_core::{CellState, Direction, Vec3};

/// Number of slots in a 3×3×3 neighborhood.
pub const NEIGHBORHOOD_SIZE: usize = 27;

/// Linear index of the center cell (displacement `(0, 0, 0)`).
pub const CENTER: usize = 13;

/// A 3×3×3 sample of cell states around a robot.
///
/// The linear index of a relative displacement `(dx, dy, dz)`, each
/// component in `{-1, 0, 1}`, is `(dx+1)*9 + (dy+1)*3 + (dz+1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    cells: [CellState; NEIGHBORHOOD_SIZE],
}

impl Neighborhood {
    /// A neighborhood with every slot set to `state`.
    pub const fn filled(state: CellState) -> Self {
        Self {
            cells: [state; NEIGHBORHOOD_SIZE],
        }
    }

    /// Build a neighborhood by sampling a function over the 27
    /// displacements, in the ordered triple loop dx / dy / dz.
    pub fn from_fn(mut sample: impl FnMut(Vec3) -> CellState) -> Self {
        let mut cells = [CellState::Wall; NEIGHBORHOOD_SIZE];
        let mut i = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    cells[i] = sample(Vec3::new(dx, dy, dz));
                    i += 1;
                }
            }
        }
        Self { cells }
    }

    /// Linear index of a displacement, if each component is in `{-1, 0, 1}`.
    pub fn index(rel: Vec3) -> Option<usize> {
        if rel.x.abs() > 1 || rel.y.abs() > 1 || rel.z.abs() > 1 {
            return None;
        }
        Some(((rel.x + 1) * 9 + (rel.y + 1) * 3 + (rel.z + 1)) as usize)
    }

    /// State at a displacement. Displacements outside the buffer read as
    /// walls, matching how the world treats everything beyond sight.
    pub fn get(&self, rel: Vec3) -> CellState {
        match Self::index(rel) {
            Some(i) => self.cells[i],
            None => CellState::Wall,
        }
    }

    /// State one step along a direction.
    pub fn direction(&self, dir: Direction) -> CellState {
        self.get(dir.vec())
    }

    /// Overwrite the state at a displacement. Out-of-buffer is ignored.
    pub fn set(&mut self, rel: Vec3, state: CellState) {
        if let Some(i) = Self::index(rel) {
            self.cells[i] = state;
        }
    }

    /// A copy with the center slot replaced.
    pub fn with_center(&self, state: CellState) -> Self {
        let mut out = *self;
        out.cells[CENTER] = state;
        out
    }

    /// Force the top and bottom layers (`dy = 1` and `dy = -1`) to walls.
    ///
    /// Simulates the "both horizontal lids closed" scenario used by the
    /// second settlement check.
    pub fn close_lids(&mut self) {
        for dx in -1..=1 {
            for dz in -1..=1 {
                self.set(Vec3::new(dx, -1, dz), CellState::Wall);
                self.set(Vec3::new(dx, 1, dz), CellState::Wall);
            }
        }
    }

    /// Whether `from` and `to` are mutually reachable through non-wall,
    /// 6-connected cells of this buffer.
    ///
    /// False if either endpoint is a wall (or outside the buffer). A
    /// fixed-point expansion of the reach set; the relation is symmetric.
    pub fn reachable(&self, from: Vec3, to: Vec3) -> bool {
        let (Some(fi), Some(ti)) = (Self::index(from), Self::index(to)) else {
            return false;
        };
        if self.cells[fi] == CellState::Wall || self.cells[ti] == CellState::Wall {
            return false;
        }

        let mut reach = [false; NEIGHBORHOOD_SIZE];
        reach[fi] = true;
        loop {
            let mut changed = false;
            for i in 0..NEIGHBORHOOD_SIZE {
                if !reach[i] {
                    continue;
                }
                for j in Self::adjacent(i) {
                    if !reach[j] && self.cells[j] != CellState::Wall {
                        reach[j] = true;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        reach[ti]
    }

    /// 6-connected buffer slots adjacent to a linear index.
    fn adjacent(i: usize) -> impl Iterator<Item = usize> {
        let (a, b, c) = (i / 9, (i % 9) / 3, i % 3);
        [
            (a.wrapping_sub(1), b, c),
            (a + 1, b, c),
            (a, b.wrapping_sub(1), c),
            (a, b + 1, c),
            (a, b, c.wrapping_sub(1)),
            (a, b, c + 1),
        ]
        .into_iter()
        .filter(|&(x, y, z)| x < 3 && y < 3 && z < 3)
        .map(|(x, y, z)| x * 9 + y * 3 + z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_index_is_thirteen() {
        assert_eq!(Neighborhood::index(Vec3::ZERO), Some(CENTER));
        assert_eq!(Neighborhood::index(Vec3::new(-1, -1, -1)), Some(0));
        assert_eq!(Neighborhood::index(Vec3::new(1, 1, 1)), Some(26));
        assert_eq!(Neighborhood::index(Vec3::new(2, 0, 0)), None);
    }

    #[test]
    fn from_fn_writes_in_triple_loop_order() {
        let mut order = Vec::new();
        let n = Neighborhood::from_fn(|rel| {
            order.push(rel);
            CellState::Free
        });
        assert_eq!(order.len(), NEIGHBORHOOD_SIZE);
        assert_eq!(order[0], Vec3::new(-1, -1, -1));
        assert_eq!(order[13], Vec3::ZERO);
        assert_eq!(order[26], Vec3::new(1, 1, 1));
        assert_eq!(n.get(Vec3::ZERO), CellState::Free);
    }

    #[test]
    fn out_of_buffer_reads_as_wall() {
        let n = Neighborhood::filled(CellState::Free);
        assert_eq!(n.get(Vec3::new(2, 0, 0)), CellState::Wall);
    }

    #[test]
    fn reachable_in_open_buffer() {
        let n = Neighborhood::filled(CellState::Free);
        assert!(n.reachable(Vec3::new(-1, -1, -1), Vec3::new(1, 1, 1)));
        assert!(n.reachable(Vec3::ZERO, Vec3::ZERO));
    }

    #[test]
    fn wall_endpoints_are_unreachable() {
        let mut n = Neighborhood::filled(CellState::Free);
        n.set(Vec3::new(1, 0, 0), CellState::Wall);
        assert!(!n.reachable(Vec3::new(1, 0, 0), Vec3::ZERO));
        assert!(!n.reachable(Vec3::ZERO, Vec3::new(1, 0, 0)));
    }

    #[test]
    fn occupied_cells_conduct_reachability() {
        let mut n = Neighborhood::filled(CellState::Wall);
        n.set(Vec3::new(-1, 0, 0), CellState::Free);
        n.set(Vec3::ZERO, CellState::Occupied);
        n.set(Vec3::new(1, 0, 0), CellState::Free);
        assert!(n.reachable(Vec3::new(-1, 0, 0), Vec3::new(1, 0, 0)));
    }

    #[test]
    fn walling_the_center_cuts_a_corridor() {
        // Straight line through the middle: left and right connect only
        // through the center cell.
        let mut n = Neighborhood::filled(CellState::Wall);
        n.set(Vec3::new(-1, 0, 0), CellState::Free);
        n.set(Vec3::ZERO, CellState::Occupied);
        n.set(Vec3::new(1, 0, 0), CellState::Free);
        let blocked = n.with_center(CellState::Wall);
        assert!(!blocked.reachable(Vec3::new(-1, 0, 0), Vec3::new(1, 0, 0)));
        // Endpoints themselves stay reachable from themselves.
        assert!(blocked.reachable(Vec3::new(-1, 0, 0), Vec3::new(-1, 0, 0)));
    }

    #[test]
    fn diagonal_steps_do_not_conduct() {
        // Two free cells touching only at an edge are not 6-connected.
        let mut n = Neighborhood::filled(CellState::Wall);
        n.set(Vec3::new(-1, -1, 0), CellState::Free);
        n.set(Vec3::ZERO, CellState::Free);
        assert!(!n.reachable(Vec3::new(-1, -1, 0), Vec3::ZERO));
        assert!(n.reachable(Vec3::new(-1, -1, 0), Vec3::new(-1, -1, 0)));
    }

    #[test]
    fn close_lids_walls_both_layers() {
        let mut n = Neighborhood::filled(CellState::Free);
        n.close_lids();
        for dx in -1..=1 {
            for dz in -1..=1 {
                assert_eq!(n.get(Vec3::new(dx, -1, dz)), CellState::Wall);
                assert_eq!(n.get(Vec3::new(dx, 1, dz)), CellState::Wall);
            }
        }
        assert_eq!(n.get(Vec3::ZERO), CellState::Free);
        assert_eq!(n.get(Vec3::new(1, 0, 0)), CellState::Free);
    }

    #[test]
    fn reachability_is_symmetric() {
        // Exhaustive symmetry check on a mixed buffer.
        let mut n = Neighborhood::filled(CellState::Free);
        n.set(Vec3::new(0, 0, 1), CellState::Wall);
        n.set(Vec3::new(0, 1, 0), CellState::Wall);
        n.set(Vec3::new(1, 1, 1), CellState::Wall);
        n.set(Vec3::new(-1, 0, 0), CellState::Occupied);
        for a in 0..NEIGHBORHOOD_SIZE {
            for b in 0..NEIGHBORHOOD_SIZE {
                let from = Vec3::new((a / 9) as i32 - 1, ((a % 9) / 3) as i32 - 1, (a % 3) as i32 - 1);
                let to = Vec3::new((b / 9) as i32 - 1, ((b % 9) / 3) as i32 - 1, (b % 3) as i32 - 1);
                assert_eq!(n.reachable(from, to), n.reachable(to, from));
            }
        }
    }
}
