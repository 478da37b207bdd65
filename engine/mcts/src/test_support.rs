//! Small simulators and evaluators for unit tests.

use engine_core::{AgentIndex, Evaluator, Simulator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Left,
    Right,
    Wait,
}

/// One agent on the number line `0..length`, anchored at 0.
///
/// Same moves as `engine_core`'s own test line, which is `cfg(test)` and so
/// not visible from here.
#[derive(Debug, Clone)]
pub struct Line {
    pub length: i32,
}

impl Line {
    pub fn new(length: i32) -> Self {
        Self { length }
    }
}

impl Simulator for Line {
    type Snapshot = i32;
    type Move = Step;

    const NOOP: Step = Step::Wait;

    fn legal_moves(&self, position: &i32, _agent: AgentIndex) -> Vec<Step> {
        let mut moves = vec![Step::Wait];
        if *position > 0 {
            moves.push(Step::Left);
        }
        if *position + 1 < self.length {
            moves.push(Step::Right);
        }
        moves
    }

    fn generate_successor(&self, position: &i32, _agent: AgentIndex, mv: Step) -> i32 {
        match mv {
            Step::Left => position - 1,
            Step::Right => position + 1,
            Step::Wait => *position,
        }
    }

    fn anchor_distance(&self, position: &i32, _agent: AgentIndex) -> Option<u32> {
        Some(position.unsigned_abs())
    }
}

/// Negative distance of the successor to a target cell.
pub struct Toward(pub i32);

impl Evaluator<Line> for Toward {
    fn evaluate(&self, sim: &Line, position: &i32, agent: AgentIndex, mv: Step) -> f32 {
        let next = sim.generate_successor(position, agent, mv);
        -((next - self.0).abs() as f32)
    }
}

/// Scores every move the same.
pub struct Flat;

impl<S: Simulator> Evaluator<S> for Flat {
    fn evaluate(&self, _sim: &S, _snapshot: &S::Snapshot, _agent: AgentIndex, _mv: S::Move) -> f32 {
        0.0
    }
}

/// Never produces a comparable score.
pub struct Broken;

impl<S: Simulator> Evaluator<S> for Broken {
    fn evaluate(&self, _sim: &S, _snapshot: &S::Snapshot, _agent: AgentIndex, _mv: S::Move) -> f32 {
        f32::NAN
    }
}
