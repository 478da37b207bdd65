//! Maze layouts.
//!
//! Layouts use the classic capture-the-flag text format, one row per line:
//!
//! - `%` wall
//! - `.` food
//! - `o` power capsule (treated as open floor)
//! - `1`..`9` starting cell of agent 0..8
//! - space: open floor
//!
//! The first text row is `y = 0`. The left half (`x < width / 2`) belongs to
//! the red team (even agent indices), the right half to blue.

use thiserror::Error;

use crate::Pos;

/// Errors raised while parsing a layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Layout is empty")]
    Empty,

    #[error("Row {row} has width {actual}, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown layout character {ch:?} at ({x}, {y})")]
    UnknownCharacter { ch: char, x: usize, y: usize },

    #[error("Agent {agent} has more than one starting cell")]
    DuplicateAgent { agent: usize },

    #[error("Agent starting cells are not contiguous: agent {missing} is missing")]
    MissingAgent { missing: usize },

    #[error("Layout needs at least two agents, found {found}")]
    TooFewAgents { found: usize },
}

/// Small two-versus-two maze used by tests and benchmarks.
pub const DEFAULT_LAYOUT: &str = "\
%%%%%%%%%%%%%%%%%%%%
%1 . %   .  %  .  2%
%3%% % %%%%%% % %%4%
%  . .   %%   . .  %
%%% % %% %% %% % %%%
%.     .    .     .%
%%%%%%%%%%%%%%%%%%%%";

/// Static maze description: walls, initial food, agent spawn cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    food: Vec<Pos>,
    starts: Vec<Pos>,
}

impl Layout {
    /// Parse a layout from its text form.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .collect();

        let height = rows.len();
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(LayoutError::Empty);
        }

        let mut walls = vec![false; width * height];
        let mut food = Vec::new();
        let mut starts: Vec<Option<Pos>> = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let actual = row.chars().count();
            if actual != width {
                return Err(LayoutError::Ragged {
                    row: y,
                    expected: width,
                    actual,
                });
            }

            for (x, ch) in row.chars().enumerate() {
                let pos = Pos::new(x as i32, y as i32);
                match ch {
                    '%' => walls[y * width + x] = true,
                    '.' => food.push(pos),
                    ' ' | 'o' => {}
                    '1'..='9' => {
                        let agent = (ch as usize) - ('1' as usize);
                        if starts.len() <= agent {
                            starts.resize(agent + 1, None);
                        }
                        if starts[agent].replace(pos).is_some() {
                            return Err(LayoutError::DuplicateAgent { agent });
                        }
                    }
                    _ => return Err(LayoutError::UnknownCharacter { ch, x, y }),
                }
            }
        }

        let starts = starts
            .into_iter()
            .enumerate()
            .map(|(agent, start)| start.ok_or(LayoutError::MissingAgent { missing: agent }))
            .collect::<Result<Vec<_>, _>>()?;

        if starts.len() < 2 {
            return Err(LayoutError::TooFewAgents {
                found: starts.len(),
            });
        }

        Ok(Self {
            width,
            height,
            walls,
            food,
            starts,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_agents(&self) -> usize {
        self.starts.len()
    }

    /// Spawn cell of `agent`.
    pub fn start(&self, agent: usize) -> Pos {
        self.starts[agent]
    }

    /// Initial food cells, in row-major order.
    pub fn food(&self) -> &[Pos] {
        &self.food
    }

    #[inline]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Row-major cell index. Callers must check [`Layout::in_bounds`].
    #[inline]
    pub fn index(&self, pos: Pos) -> usize {
        pos.y as usize * self.width + pos.x as usize
    }

    /// Out-of-bounds cells count as walls.
    #[inline]
    pub fn is_wall(&self, pos: Pos) -> bool {
        !self.in_bounds(pos) || self.walls[self.index(pos)]
    }

    /// True when `pos` lies on the red (left) half.
    #[inline]
    pub fn is_red_side(&self, pos: Pos) -> bool {
        (pos.x as usize) < self.width / 2
    }

    /// Every non-wall cell, row-major.
    pub fn open_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width)
                .map(move |x| Pos::new(x as i32, y as i32))
                .filter(move |pos| !self.is_wall(*pos))
        })
    }
}
