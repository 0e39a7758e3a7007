/// Discrete input messages, in logical canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameAction {
    Press {
        x: f64,
        y: f64,
        pointer_id: Option<i32>,
    },
    Move {
        x: f64,
        y: f64,
        pointer_id: Option<i32>,
    },
    Release {
        pointer_id: Option<i32>,
    },
    Cancel,
}
