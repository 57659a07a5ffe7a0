use serde::{Deserialize, Serialize};

/// Number of relative actions the environment accepts
pub const ACTION_COUNT: usize = 3;

/// Absolute heading of the snake on the grid
///
/// The discriminants are the heading indices used by the turn rule:
/// 0 = right, 1 = up, 2 = left, 3 = down. Rows grow downwards and
/// columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right = 0,
    Up = 1,
    Left = 2,
    Down = 3,
}

/// Grid axis a direction moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
    ];

    /// Heading index in 0..4
    pub fn index(self) -> usize {
        self as usize
    }

    fn from_index_wrapping(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Apply a relative action: `(heading + (action - 1)) mod 4`
    pub fn turn(self, action: RelativeAction) -> Self {
        let offset = action.index() + 3; // action - 1, kept non-negative
        Self::from_index_wrapping(self.index() + offset)
    }

    /// The heading pointing the other way
    pub fn opposite(self) -> Self {
        Self::from_index_wrapping(self.index() + 2)
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Returns the (row, col) delta for moving in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Down => (1, 0),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Row,
            Direction::Left | Direction::Right => Axis::Col,
        }
    }
}

/// Heading index outside 0..4
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("direction must be 0 (right), 1 (up), 2 (left) or 3 (down), got {0}")]
pub struct InvalidDirection(pub usize);

impl TryFrom<usize> for Direction {
    type Error = InvalidDirection;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(InvalidDirection(index))
    }
}

/// Turn relative to the current heading
///
/// Index 0 moves the heading index down by one, 2 moves it up by one.
/// The names follow the action-index convention of the turn rule, not the
/// on-screen rotation: with rows growing downwards, `TurnLeft` rotates the
/// heading clockwise (right becomes down, up becomes right) and `TurnRight`
/// rotates it counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeAction {
    TurnLeft = 0,
    Straight = 1,
    TurnRight = 2,
}

impl RelativeAction {
    pub const ALL: [RelativeAction; ACTION_COUNT] = [
        RelativeAction::TurnLeft,
        RelativeAction::Straight,
        RelativeAction::TurnRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Action index outside the three-element action set
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("action must be 0 (turn left), 1 (straight) or 2 (turn right), got {0}")]
pub struct InvalidAction(pub usize);

impl TryFrom<usize> for RelativeAction {
    type Error = InvalidAction;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(index).copied().ok_or(InvalidAction(index))
    }
}
