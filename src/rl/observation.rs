use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::game::{Axis, Direction, Grid, Position, cell};

/// Length of the observation vector
pub const OBSERVATION_SIZE: usize = 12;

/// Probe order of the obstacle slots
const OBSTACLE_ORDER: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Right,
    Direction::Left,
];

/// Slot order of the heading one-hot
const HEADING_ORDER: [Direction; 4] = [
    Direction::Down,
    Direction::Up,
    Direction::Right,
    Direction::Left,
];

const FOOD_OFFSET: usize = 0;
const OBSTACLE_OFFSET: usize = 4;
const HEADING_OFFSET: usize = 8;

/// Egocentric 12-element feature vector
///
/// Layout:
/// - 0..4: food is up, down, left, right of the head
/// - 4..8: obstacle next to the head, probing up, down, right, left
/// - 8..12: heading one-hot in the order down, up, right, left
///
/// Every entry is 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Observation([u8; OBSERVATION_SIZE]);

impl Observation {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Observation as an f32 tensor with shape [12]
    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        let data: Vec<f32> = self.0.iter().map(|&v| f32::from(v)).collect();
        let tensor_data = TensorData::new(data, [OBSERVATION_SIZE]);

        Tensor::<B, 1>::from_data(tensor_data, device)
    }

    /// Heading decoded from the one-hot slots
    pub fn heading(&self) -> Option<Direction> {
        HEADING_ORDER
            .iter()
            .enumerate()
            .find(|(i, _)| self.0[HEADING_OFFSET + i] == 1)
            .map(|(_, &direction)| direction)
    }

    /// Whether the neighbour in `direction` was flagged as an obstacle
    pub fn obstacle(&self, direction: Direction) -> bool {
        let slot = match direction {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Right => 2,
            Direction::Left => 3,
        };
        self.0[OBSTACLE_OFFSET + slot] == 1
    }

    /// Whether moving in `direction` brings the head closer to the food on that axis
    pub fn food_towards(&self, direction: Direction) -> bool {
        let slot = match direction {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        };
        self.0[FOOD_OFFSET + slot] == 1
    }
}

impl From<Observation> for [u8; OBSERVATION_SIZE] {
    fn from(observation: Observation) -> Self {
        observation.0
    }
}

/// Build the observation from cached positions and the engine's grid
pub fn create_observation(
    grid: &Grid,
    head: Position,
    food: Position,
    heading: Direction,
) -> Observation {
    let mut values = [0u8; OBSERVATION_SIZE];

    values[FOOD_OFFSET] = u8::from(head.row > food.row);
    values[FOOD_OFFSET + 1] = u8::from(head.row < food.row);
    values[FOOD_OFFSET + 2] = u8::from(head.col > food.col);
    values[FOOD_OFFSET + 3] = u8::from(head.col < food.col);

    for (i, probe) in OBSTACLE_ORDER.into_iter().enumerate() {
        values[OBSTACLE_OFFSET + i] = u8::from(obstacle_at(grid, head, probe, heading));
    }

    for (i, slot) in HEADING_ORDER.into_iter().enumerate() {
        values[HEADING_OFFSET + i] = u8::from(heading == slot);
    }

    Observation(values)
}

/// Obstacle test for the neighbour of `head` in direction `probe`
///
/// A neighbour past the grid edge on the probe's axis counts as a wall. When
/// the head itself lies outside the grid on the other axis the neighbour
/// is reported clear. Otherwise it is an obstacle when it holds a body
/// segment, except for the cell directly behind the head.
fn obstacle_at(grid: &Grid, head: Position, probe: Direction, heading: Direction) -> bool {
    let neighbour = head.moved_in_direction(probe);
    let (along, across) = match probe.axis() {
        Axis::Row => (grid.row_in_bounds(neighbour.row), grid.col_in_bounds(head.col)),
        Axis::Col => (grid.col_in_bounds(neighbour.col), grid.row_in_bounds(head.row)),
    };

    if !along {
        return true;
    }
    if !across {
        return false;
    }
    grid.get(neighbour) == Some(cell::BODY) && !heading.is_opposite(probe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;
    use proptest::prelude::*;

    type TestBackend = NdArray<f32>;

    fn obstacles(obs: &Observation) -> [u8; 4] {
        let slice = obs.as_slice();
        [slice[4], slice[5], slice[6], slice[7]]
    }

    #[test]
    fn test_observation_after_moving_right() {
        // 5x5, head moved from (2,2) to (2,3), food at (2,4)
        let mut grid = Grid::new(5, 5);
        grid.set(Position::new(2, 3), cell::HEAD);
        grid.set(Position::new(2, 2), cell::BODY);
        grid.set(Position::new(2, 1), cell::BODY);
        grid.set(Position::new(2, 4), cell::FOOD);

        let obs = create_observation(
            &grid,
            Position::new(2, 3),
            Position::new(2, 4),
            Direction::Right,
        );

        assert_eq!(
            obs.as_slice(),
            &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0],
        );
    }

    #[test]
    fn test_food_bits() {
        let grid = Grid::new(6, 6);
        let obs = create_observation(
            &grid,
            Position::new(4, 1),
            Position::new(2, 3),
            Direction::Up,
        );
        assert_eq!(&obs.as_slice()[..4], &[1, 0, 0, 1]);

        // Aligned on both axes
        let obs = create_observation(
            &grid,
            Position::new(3, 3),
            Position::new(3, 3),
            Direction::Up,
        );
        assert_eq!(&obs.as_slice()[..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_heading_one_hot_order() {
        let grid = Grid::new(5, 5);
        let head = Position::new(2, 2);
        let expected = [
            (Direction::Down, [1, 0, 0, 0]),
            (Direction::Up, [0, 1, 0, 0]),
            (Direction::Right, [0, 0, 1, 0]),
            (Direction::Left, [0, 0, 0, 1]),
        ];

        for (heading, one_hot) in expected {
            let obs = create_observation(&grid, head, head, heading);
            assert_eq!(&obs.as_slice()[8..], &one_hot);
            assert_eq!(obs.heading(), Some(heading));
        }
    }

    #[test]
    fn test_grid_edges_are_walls() {
        let grid = Grid::new(4, 4);
        let obs = create_observation(
            &grid,
            Position::new(0, 0),
            Position::new(3, 3),
            Direction::Up,
        );
        // up, down, right, left
        assert_eq!(obstacles(&obs), [1, 0, 0, 1]);

        let obs = create_observation(
            &grid,
            Position::new(3, 3),
            Position::new(0, 0),
            Direction::Down,
        );
        assert_eq!(obstacles(&obs), [0, 1, 1, 0]);
    }

    #[test]
    fn test_body_behind_head_is_not_an_obstacle() {
        let mut grid = Grid::new(5, 5);
        grid.set(Position::new(2, 2), cell::HEAD);
        grid.set(Position::new(2, 1), cell::BODY); // neck, behind
        grid.set(Position::new(1, 2), cell::BODY); // above
        grid.set(Position::new(3, 2), cell::FOOD); // below

        let obs = create_observation(
            &grid,
            Position::new(2, 2),
            Position::new(3, 2),
            Direction::Right,
        );
        assert_eq!(obstacles(&obs), [1, 0, 0, 0]);

        // Same body cell to the left is flagged once the heading changes
        let obs = create_observation(
            &grid,
            Position::new(2, 2),
            Position::new(3, 2),
            Direction::Up,
        );
        assert_eq!(obstacles(&obs), [1, 0, 0, 1]);
    }

    #[test]
    fn test_head_outside_grid() {
        // Head ran off the top edge of a 5x5 grid heading up
        let mut grid = Grid::new(5, 5);
        grid.set(Position::new(0, 2), cell::HEAD);
        grid.set(Position::new(0, 3), cell::BODY);
        grid.set(Position::new(0, 1), cell::BODY);

        let obs = create_observation(
            &grid,
            Position::new(-1, 2),
            Position::new(4, 4),
            Direction::Up,
        );
        // Up is past the edge; right and left fail the row check on the head
        assert_eq!(obstacles(&obs), [1, 0, 0, 0]);

        // Ran off the right edge heading right, neck just inside the edge
        let mut grid = Grid::new(5, 5);
        grid.set(Position::new(3, 4), cell::BODY);
        let obs = create_observation(
            &grid,
            Position::new(3, 5),
            Position::new(0, 0),
            Direction::Right,
        );
        assert_eq!(obstacles(&obs), [0, 0, 1, 0]);
    }

    #[test]
    fn test_decoders() {
        let mut grid = Grid::new(5, 5);
        grid.set(Position::new(2, 3), cell::BODY);
        let obs = create_observation(
            &grid,
            Position::new(2, 2),
            Position::new(0, 0),
            Direction::Up,
        );

        assert!(obs.obstacle(Direction::Right));
        assert!(!obs.obstacle(Direction::Left));
        assert!(obs.food_towards(Direction::Up));
        assert!(obs.food_towards(Direction::Left));
        assert!(!obs.food_towards(Direction::Down));
        assert!(!obs.food_towards(Direction::Right));
    }

    #[test]
    fn test_obstacle_decoder_reads_each_slot() {
        // Head in the corner (0,0): walls up and left, clear down and right
        let grid = Grid::new(3, 3);
        let obs = create_observation(&grid, Position::new(0, 0), Position::new(2, 2), Direction::Down);

        assert_eq!(&obs.as_slice()[4..8], &[1, 0, 0, 1]);
        assert!(obs.obstacle(Direction::Up));
        assert!(!obs.obstacle(Direction::Down));
        assert!(!obs.obstacle(Direction::Right));
        assert!(obs.obstacle(Direction::Left));

        // Opposite corner (2,2): walls down and right
        let obs = create_observation(&grid, Position::new(2, 2), Position::new(0, 0), Direction::Up);

        assert_eq!(&obs.as_slice()[4..8], &[0, 1, 1, 0]);
        assert!(!obs.obstacle(Direction::Up));
        assert!(obs.obstacle(Direction::Down));
        assert!(obs.obstacle(Direction::Right));
        assert!(!obs.obstacle(Direction::Left));
    }

    #[test]
    fn test_observation_tensor() {
        let device = NdArrayDevice::default();
        let grid = Grid::new(5, 5);
        let obs = create_observation(
            &grid,
            Position::new(0, 0),
            Position::new(4, 4),
            Direction::Right,
        );

        let tensor = obs.to_tensor::<TestBackend>(&device);
        assert_eq!(tensor.shape().dims, [OBSERVATION_SIZE]);

        let data = tensor.to_data();
        let values = data.as_slice::<f32>().unwrap();
        let expected: Vec<f32> = obs.as_slice().iter().map(|&v| f32::from(v)).collect();
        assert_eq!(values, expected.as_slice());
    }

    proptest! {
        #[test]
        fn observation_is_binary_with_fixed_length(
            height in 2usize..12,
            width in 2usize..12,
            seed_cells in proptest::collection::vec(0i32..4, 144),
            head_row in -1i32..13,
            head_col in -1i32..13,
            food_row in 0i32..12,
            food_col in 0i32..12,
            heading in 0usize..4,
        ) {
            let rows: Vec<Vec<i32>> = (0..height)
                .map(|r| seed_cells[r * width..(r + 1) * width].to_vec())
                .collect();
            let grid = Grid::from_rows(&rows).unwrap();
            let head = Position::new(head_row.min(height as i32), head_col.min(width as i32));
            let food = Position::new(food_row, food_col);

            let obs = create_observation(&grid, head, food, Direction::try_from(heading).unwrap());

            prop_assert_eq!(obs.as_slice().len(), OBSERVATION_SIZE);
            prop_assert!(obs.as_slice().iter().all(|&v| v <= 1));
            prop_assert_eq!(obs.as_slice()[8..].iter().filter(|&&v| v == 1).count(), 1);
        }
    }
}
