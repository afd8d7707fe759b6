use super::action::Direction;
use super::config::GRID_SIZE;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move point by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move point one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Check if the point lies within `[0, GRID_SIZE)` on both axes
    pub fn is_on_grid(&self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Point>,
}

impl Snake {
    /// Create a straight snake whose tail trails behind `head`, opposite to `direction`
    pub fn new(head: Point, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let (dx, dy) = direction.delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self { body }
    }

    /// The canonical starting body: `[(10,10), (9,10), (8,10)]`
    pub fn starting() -> Self {
        Self::new(Point::new(10, 10), Direction::Right, 3)
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(body: Vec<Point>) -> Self {
        debug_assert!(!body.is_empty(), "a snake has at least one segment");
        Self { body }
    }

    /// Get the head position
    pub fn head(&self) -> Point {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Point {
        self.body[self.body.len() - 1]
    }

    /// Check if any segment, head and tail included, occupies `pos`
    pub fn occupies(&self, pos: Point) -> bool {
        self.body.contains(&pos)
    }

    /// Add a new head; the tail stays, so the snake grows by one
    pub fn push_head(&mut self, head: Point) {
        self.body.insert(0, head);
    }

    /// Drop the tail segment
    pub fn pop_tail(&mut self) -> Option<Point> {
        if self.body.len() > 1 {
            self.body.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle status of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Ready,
    Playing,
    Paused,
    GameOver,
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// The head left the grid
    Wall,
    /// The head ran into the snake's own body
    SelfCollision,
    /// No free cell was left for food
    BoardFull,
}

/// Everything a UI needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: u32,
    pub high_score: u32,
    pub snake: Vec<Point>,
    pub food: Point,
    pub direction: Direction,
    /// Set by the step that ate food, cleared by the next one
    pub food_eaten: bool,
    pub game_over_reason: Option<GameOverReason>,
}
