//! Two-team capture-the-flag grid game for the search engine
//!
//! Agents with even indices play for red (left half of the maze), odd indices
//! for blue (right half). On its own half an agent is a ghost; on the enemy
//! half it is a pacman that eats food and must carry it home to score. A ghost
//! that meets an enemy pacman sends it back to its spawn and the carried food
//! is forfeited.
//!
//! Agents only see opponents within [`SIGHT_RANGE`] maze-free (Manhattan)
//! steps of any teammate, which is what feature extraction relies on.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::Simulator;
//! use games_capture::{Capture, Direction, DEFAULT_LAYOUT};
//!
//! let game = Capture::from_text(DEFAULT_LAYOUT).expect("default layout parses");
//! let state = game.initial_state();
//! let moves = game.searchable_moves(&state, 0);
//! assert!(!moves.contains(&Direction::Stop));
//! ```

use std::fmt;
use std::sync::Arc;

use engine_core::{AgentIndex, Simulator};

pub mod defense;
pub mod distance;
pub mod layout;

pub use defense::{defense_evaluator, defense_weights, DefenseEvaluator, DefenseFeatures};
pub use distance::Distancer;
pub use layout::{Layout, LayoutError, DEFAULT_LAYOUT};

/// Manhattan radius within which a team sees opponents.
pub const SIGHT_RANGE: u32 = 5;

/// Total agent moves before the game ends (shared by all agents).
pub const DEFAULT_MAX_MOVES: u32 = 1200;

/// The game ends once a team has at most this much food left to collect.
pub const MIN_FOOD: usize = 2;

/// Grid cell coordinate. `y = 0` is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell in `dir` (unchanged for `Stop`).
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    #[inline]
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Agent move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
    /// Stay in place. The search never considers it.
    Stop,
}

impl Direction {
    /// The four moving directions, in legal-move order.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Stop => (0, 0),
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Stop => Direction::Stop,
        }
    }
}

/// Per-agent dynamic state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentState {
    pub position: Pos,
    /// Direction of the last move (`Stop` at spawn)
    pub direction: Direction,
    /// Food eaten on the enemy half and not yet brought home
    pub carrying: u32,
}

/// Red plays even agent indices.
#[inline]
pub fn is_red(agent: AgentIndex) -> bool {
    agent % 2 == 0
}

/// Full game state at a turn boundary.
///
/// Snapshots share the immutable layout and distance table through `Arc`,
/// so cloning only copies the dynamic parts.
#[derive(Debug, Clone)]
pub struct GameState {
    layout: Arc<Layout>,
    agents: Vec<AgentState>,
    /// Cell index -> food present
    food: Vec<bool>,
    /// Positive favours red
    score: i32,
    moves_left: u32,
}

impl GameState {
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn agent(&self, agent: AgentIndex) -> &AgentState {
        &self.agents[agent]
    }

    pub fn position(&self, agent: AgentIndex) -> Pos {
        self.agents[agent].position
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn has_food(&self, pos: Pos) -> bool {
        self.layout.in_bounds(pos) && self.food[self.layout.index(pos)]
    }

    /// True when `agent` stands on the enemy half.
    pub fn is_pacman(&self, agent: AgentIndex) -> bool {
        self.layout.is_red_side(self.position(agent)) != is_red(agent)
    }

    /// Opponents of `agent`, in index order.
    pub fn opponents(&self, agent: AgentIndex) -> impl Iterator<Item = AgentIndex> {
        let red = is_red(agent);
        (0..self.agents.len()).filter(move |&other| is_red(other) != red)
    }

    /// Food the team of `agent` still has to collect (on the enemy half).
    pub fn food_to_eat(&self, agent: AgentIndex) -> Vec<Pos> {
        let red = is_red(agent);
        self.food_cells()
            .filter(|pos| self.layout.is_red_side(*pos) != red)
            .collect()
    }

    /// Food the team of `agent` protects (on its own half).
    pub fn food_to_defend(&self, agent: AgentIndex) -> Vec<Pos> {
        let red = is_red(agent);
        self.food_cells()
            .filter(|pos| self.layout.is_red_side(*pos) == red)
            .collect()
    }

    fn food_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.layout
            .open_cells()
            .filter(|pos| self.food[self.layout.index(*pos)])
    }

    /// Game over: out of moves, or either team nearly out of food to eat.
    pub fn is_over(&self) -> bool {
        self.moves_left == 0
            || self.food_to_eat(0).len() <= MIN_FOOD
            || self.food_to_eat(1).len() <= MIN_FOOD
    }

    /// Position of `target` as seen by the team of `observer`.
    ///
    /// Teammates are always visible; opponents only within `sight_range` of
    /// some member of the observer's team.
    pub fn visible_position(
        &self,
        observer: AgentIndex,
        target: AgentIndex,
        sight_range: u32,
    ) -> Option<Pos> {
        let target_pos = self.position(target);
        if is_red(observer) == is_red(target) {
            return Some(target_pos);
        }
        let red = is_red(observer);
        self.agents
            .iter()
            .enumerate()
            .filter(|(mate, _)| is_red(*mate) == red)
            .any(|(_, mate)| mate.position.manhattan(target_pos) <= sight_range)
            .then_some(target_pos)
    }

    fn respawn(&mut self, agent: AgentIndex) {
        let start = self.layout.start(agent);
        let state = &mut self.agents[agent];
        state.position = start;
        state.direction = Direction::Stop;
        state.carrying = 0;
    }
}

/// Game rules; implements [`Simulator`] over [`GameState`] snapshots.
#[derive(Debug, Clone)]
pub struct Capture {
    layout: Arc<Layout>,
    distancer: Arc<Distancer>,
    sight_range: u32,
    max_moves: u32,
}

impl Capture {
    pub fn new(layout: Layout) -> Self {
        let distancer = Distancer::new(&layout);
        Self {
            layout: Arc::new(layout),
            distancer: Arc::new(distancer),
            sight_range: SIGHT_RANGE,
            max_moves: DEFAULT_MAX_MOVES,
        }
    }

    /// Parse a layout and build the rules for it.
    pub fn from_text(text: &str) -> Result<Self, LayoutError> {
        Ok(Self::new(Layout::parse(text)?))
    }

    /// Builder pattern: set the opponent sight range.
    pub fn with_sight_range(mut self, range: u32) -> Self {
        self.sight_range = range;
        self
    }

    /// Builder pattern: set the total move budget of a game.
    pub fn with_max_moves(mut self, moves: u32) -> Self {
        self.max_moves = moves;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn sight_range(&self) -> u32 {
        self.sight_range
    }

    /// Maze distance between two cells.
    pub fn maze_distance(&self, a: Pos, b: Pos) -> Option<u32> {
        self.distancer.get(a, b)
    }

    /// Every agent at its spawn, all layout food in place.
    pub fn initial_state(&self) -> GameState {
        let mut food = vec![false; self.layout.width() * self.layout.height()];
        for pos in self.layout.food() {
            food[self.layout.index(*pos)] = true;
        }
        let agents = (0..self.layout.num_agents())
            .map(|agent| AgentState {
                position: self.layout.start(agent),
                direction: Direction::Stop,
                carrying: 0,
            })
            .collect();

        GameState {
            layout: Arc::clone(&self.layout),
            agents,
            food,
            score: 0,
            moves_left: self.max_moves,
        }
    }

    /// Move `agent` to `pos` as if it had walked there (tests, scenario setup).
    pub fn place(&self, state: &mut GameState, agent: AgentIndex, pos: Pos) {
        state.agents[agent].position = pos;
    }

    /// Remove every food pellet except those in `keep`.
    pub fn retain_food(&self, state: &mut GameState, keep: &[Pos]) {
        for cell in state.food.iter_mut() {
            *cell = false;
        }
        for pos in keep {
            if self.layout.in_bounds(*pos) {
                state.food[self.layout.index(*pos)] = true;
            }
        }
    }
}

impl Simulator for Capture {
    type Snapshot = GameState;
    type Move = Direction;

    const NOOP: Direction = Direction::Stop;

    fn legal_moves(&self, state: &GameState, agent: AgentIndex) -> Vec<Direction> {
        let pos = state.position(agent);
        let mut moves: Vec<Direction> = Direction::CARDINAL
            .into_iter()
            .filter(|dir| !self.layout.is_wall(pos.step(*dir)))
            .collect();
        moves.push(Direction::Stop);
        moves
    }

    fn generate_successor(&self, state: &GameState, agent: AgentIndex, mv: Direction) -> GameState {
        let mut next = state.clone();
        next.moves_left = next.moves_left.saturating_sub(1);

        let target = state.position(agent).step(mv);
        if !self.layout.is_wall(target) {
            next.agents[agent].position = target;
        }
        next.agents[agent].direction = mv;

        let pos = next.position(agent);
        let sign = if is_red(agent) { 1 } else { -1 };
        if next.is_pacman(agent) {
            let cell = self.layout.index(pos);
            if next.food[cell] {
                next.food[cell] = false;
                next.agents[agent].carrying += 1;
            }
        } else if next.agents[agent].carrying > 0 {
            next.score += sign * next.agents[agent].carrying as i32;
            next.agents[agent].carrying = 0;
        }

        // Collisions: ghosts eat pacmen sharing their cell
        let opponents: Vec<AgentIndex> = next.opponents(agent).collect();
        for other in opponents {
            if next.position(other) != pos {
                continue;
            }
            if next.is_pacman(agent) && !next.is_pacman(other) {
                next.respawn(agent);
                break;
            }
            if !next.is_pacman(agent) && next.is_pacman(other) {
                next.respawn(other);
            }
        }

        next
    }

    fn anchor_distance(&self, state: &GameState, agent: AgentIndex) -> Option<u32> {
        self.distancer
            .get(state.position(agent), self.layout.start(agent))
    }
}
