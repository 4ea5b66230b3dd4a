//! Render state and the save/restore stack

use quill_paint::{Color, CompositeOperationState, Paint, Scissor, Transform2D};
use quill_path::{LineCap, LineJoin};

/// Everything that affects how the next fill or stroke is drawn
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub composite: CompositeOperationState,
    pub shape_anti_alias: bool,
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub miter_limit: f32,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
    pub alpha: f32,
    pub transform: Transform2D,
    pub scissor: Scissor,
}

impl Default for State {
    fn default() -> Self {
        Self {
            composite: CompositeOperationState::default(),
            shape_anti_alias: true,
            fill: Paint::color(Color::WHITE),
            stroke: Paint::color(Color::BLACK),
            stroke_width: 1.0,
            miter_limit: 10.0,
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            alpha: 1.0,
            transform: Transform2D::identity(),
            scissor: Scissor::NONE,
        }
    }
}

/// Current state plus the states saved beneath it
#[derive(Clone, Debug)]
pub struct StateStack {
    current: State,
    saved: Vec<State>,
    max_depth: usize,
}

impl StateStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            current: State::default(),
            saved: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    pub fn current(&self) -> &State {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut State {
        &mut self.current
    }

    /// Number of live states, including the current one
    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }

    /// Push a copy of the current state. Returns false at the depth limit.
    pub fn save(&mut self) -> bool {
        if self.depth() >= self.max_depth {
            return false;
        }
        self.saved.push(self.current.clone());
        true
    }

    /// Pop back to the last saved state. Returns false when nothing is saved.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }

    /// Reset the current state to defaults, keeping saved states
    pub fn reset(&mut self) {
        self.current = State::default();
    }

    /// Drop all saved states and reset
    pub fn clear(&mut self) {
        self.saved.clear();
        self.reset();
    }
}
