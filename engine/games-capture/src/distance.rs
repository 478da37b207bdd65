//! All-pairs maze distances.
//!
//! Distances are computed once per layout with a breadth-first search from
//! every open cell and stored in a dense table indexed by open-cell number.

use std::collections::VecDeque;

use crate::layout::Layout;
use crate::{Direction, Pos};

const UNREACHABLE: u32 = u32::MAX;

/// Precomputed shortest-path lengths between open cells of one layout.
#[derive(Debug, Clone)]
pub struct Distancer {
    width: usize,
    /// Cell index -> open-cell number (None for walls)
    open_index: Vec<Option<usize>>,
    num_open: usize,
    /// num_open * num_open table, UNREACHABLE for disconnected pairs
    table: Vec<u32>,
}

impl Distancer {
    pub fn new(layout: &Layout) -> Self {
        let width = layout.width();
        let mut open_index = vec![None; width * layout.height()];
        let open: Vec<Pos> = layout.open_cells().collect();
        for (i, pos) in open.iter().enumerate() {
            open_index[layout.index(*pos)] = Some(i);
        }

        let num_open = open.len();
        let mut table = vec![UNREACHABLE; num_open * num_open];
        let mut queue = VecDeque::new();

        for (source, &start) in open.iter().enumerate() {
            let row = &mut table[source * num_open..(source + 1) * num_open];
            row[source] = 0;
            queue.clear();
            queue.push_back(start);

            while let Some(pos) = queue.pop_front() {
                let Some(here) = open_index[layout.index(pos)] else {
                    continue;
                };
                let next_dist = row[here] + 1;
                for dir in Direction::CARDINAL {
                    let next = pos.step(dir);
                    if layout.is_wall(next) {
                        continue;
                    }
                    if let Some(there) = open_index[layout.index(next)] {
                        if row[there] == UNREACHABLE {
                            row[there] = next_dist;
                            queue.push_back(next);
                        }
                    }
                }
            }
        }

        Self {
            width,
            open_index,
            num_open,
            table,
        }
    }

    fn open_number(&self, pos: Pos) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width {
            return None;
        }
        self.open_index
            .get(pos.y as usize * self.width + pos.x as usize)
            .copied()
            .flatten()
    }

    /// Maze distance between two cells; `None` for walls or disconnected cells.
    pub fn get(&self, a: Pos, b: Pos) -> Option<u32> {
        let a = self.open_number(a)?;
        let b = self.open_number(b)?;
        let d = self.table[a * self.num_open + b];
        (d != UNREACHABLE).then_some(d)
    }

    /// Number of open cells covered by the table.
    pub fn num_cells(&self) -> usize {
        self.num_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM: &str = "\
%%%%%%
%1  2%
% %% %
%    %
%%%%%%";

    #[test]
    fn test_distance_to_self_is_zero() {
        let layout = Layout::parse(ROOM).unwrap();
        let distancer = Distancer::new(&layout);
        assert_eq!(distancer.get(Pos::new(1, 1), Pos::new(1, 1)), Some(0));
    }

    #[test]
    fn test_distance_is_symmetric_and_follows_corridors() {
        let layout = Layout::parse(ROOM).unwrap();
        let distancer = Distancer::new(&layout);

        assert_eq!(distancer.num_cells(), 10);
        assert_eq!(distancer.get(Pos::new(1, 1), Pos::new(4, 1)), Some(3));
        // (2,3) is reached around the inner wall
        assert_eq!(distancer.get(Pos::new(2, 1), Pos::new(2, 3)), Some(4));
        assert_eq!(distancer.get(Pos::new(2, 3), Pos::new(2, 1)), Some(4));
    }

    #[test]
    fn test_walls_have_no_distance() {
        let layout = Layout::parse(ROOM).unwrap();
        let distancer = Distancer::new(&layout);
        assert_eq!(distancer.get(Pos::new(0, 0), Pos::new(1, 1)), None);
        assert_eq!(distancer.get(Pos::new(1, 1), Pos::new(99, 1)), None);
        assert_eq!(distancer.get(Pos::new(-1, 1), Pos::new(1, 1)), None);
    }

    #[test]
    fn test_disconnected_cells() {
        let layout = Layout::parse(
            "\
%%%%%
%1%2%
%%%%%",
        )
        .unwrap();
        let distancer = Distancer::new(&layout);
        assert_eq!(distancer.get(Pos::new(1, 1), Pos::new(3, 1)), None);
    }
}
