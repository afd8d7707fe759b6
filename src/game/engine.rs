use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast;

use super::{
    action::Direction,
    config::GameConfig,
    events::{EVENT_CHANNEL_CAPACITY, GameEvent},
    food::spawn_food,
    schedule::TickSchedule,
    state::{GameOverReason, GameSnapshot, GameStatus, Point, Snake},
};
use crate::storage::{KeyValueStore, load_high_score, save_high_score};

/// The game engine that owns all game state.
///
/// Every command is total: calls that make no sense in the current status are
/// silently ignored. The host is expected to call [`GameEngine::tick`] once per
/// period while [`GameEngine::schedule`] reports an active schedule.
pub struct GameEngine {
    config: GameConfig,
    status: GameStatus,
    snake: Snake,
    food: Point,
    /// Direction applied by the current step
    direction: Direction,
    /// Direction requested for the next step
    pending_direction: Direction,
    score: u32,
    high_score: u32,
    food_eaten: bool,
    game_over_reason: Option<GameOverReason>,
    schedule: TickSchedule,
    store: Box<dyn KeyValueStore>,
    rng: StdRng,
    events: broadcast::Sender<GameEvent>,
}

impl GameEngine {
    /// Create an engine in the READY state, reading the high score from `store`
    pub fn new(config: GameConfig, store: Box<dyn KeyValueStore>) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    /// Same as [`GameEngine::new`] with deterministic food placement
    pub fn with_seed(config: GameConfig, store: Box<dyn KeyValueStore>, seed: u64) -> Self {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, store: Box<dyn KeyValueStore>, rng: StdRng) -> Self {
        let high_score = load_high_score(store.as_ref(), &config.high_score_key);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let mut engine = Self {
            schedule: TickSchedule::new(config.tick_interval()),
            config,
            status: GameStatus::Ready,
            snake: Snake::starting(),
            food: Point::new(5, 5),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            score: 0,
            high_score,
            food_eaten: false,
            game_over_reason: None,
            store,
            rng,
            events,
        };
        engine.init_game();
        engine
    }

    /// Reset snake, direction, score and food, and return to READY.
    /// The high score is kept. READY never ticks, so any schedule is dropped.
    pub fn init_game(&mut self) {
        self.schedule.cancel();
        self.snake = Snake::starting();
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.food_eaten = false;
        self.game_over_reason = None;
        self.generate_food();
        self.emit(GameEvent::Reset);
        self.set_status(GameStatus::Ready);
    }

    /// Place food on a random free cell.
    ///
    /// Returns false when no free cell exists, in which case the food is not
    /// moved.
    pub fn generate_food(&mut self) -> bool {
        match spawn_food(&mut self.rng, &self.snake) {
            Some(food) => {
                self.food = food;
                true
            }
            None => false,
        }
    }

    /// Request a direction for the next step.
    ///
    /// The request is dropped if it reverses the direction currently in
    /// effect. The queued direction is deliberately not consulted.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.direction.is_opposite(direction) {
            return;
        }
        self.pending_direction = direction;
    }

    /// Advance the simulation by one step. Does nothing unless PLAYING.
    pub fn tick(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }

        self.food_eaten = false;
        self.direction = self.pending_direction;

        let new_head = self.snake.head().moved_in_direction(self.direction);

        if !new_head.is_on_grid() {
            self.game_over(GameOverReason::Wall);
            return;
        }
        // the tail has not moved yet, so it counts as an obstacle
        if self.snake.occupies(new_head) {
            self.game_over(GameOverReason::SelfCollision);
            return;
        }

        self.snake.push_head(new_head);

        let grew = new_head == self.food;
        if grew {
            self.eat_food(new_head);
        } else {
            self.snake.pop_tail();
        }

        self.emit(GameEvent::Stepped {
            head: new_head,
            grew,
        });

        if grew && !self.generate_food() {
            self.game_over(GameOverReason::BoardFull);
        }
    }

    fn eat_food(&mut self, at: Point) {
        self.score += self.config.food_score;
        self.food_eaten = true;

        if self.score > self.high_score {
            self.high_score = self.score;
            save_high_score(
                self.store.as_mut(),
                &self.config.high_score_key,
                self.high_score,
            );
            log::info!("new high score: {}", self.high_score);
            self.emit(GameEvent::HighScoreRaised {
                high_score: self.high_score,
            });
        }

        self.emit(GameEvent::FoodEaten {
            at,
            score: self.score,
        });
    }

    fn game_over(&mut self, reason: GameOverReason) {
        self.schedule.cancel();
        self.game_over_reason = Some(reason);
        log::debug!("game over ({:?}) with score {}", reason, self.score);
        self.set_status(GameStatus::GameOver);
        self.emit(GameEvent::GameOver {
            reason,
            score: self.score,
        });
    }

    /// Start playing. Reinitialises first if the last game is over.
    pub fn start(&mut self) {
        if self.status == GameStatus::Playing {
            return;
        }
        if self.status == GameStatus::GameOver {
            self.init_game();
        }

        self.set_status(GameStatus::Playing);
        self.schedule.establish();
    }

    pub fn pause(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }

        self.set_status(GameStatus::Paused);
        self.schedule.cancel();
    }

    pub fn resume(&mut self) {
        if self.status != GameStatus::Paused {
            return;
        }

        self.set_status(GameStatus::Playing);
        self.schedule.establish();
    }

    /// Throw away the current game and start a fresh one, whatever the status
    pub fn restart(&mut self) {
        self.schedule.cancel();
        self.init_game();
        self.start();
    }

    /// The single pause/resume/start control
    pub fn toggle(&mut self) {
        match self.status {
            GameStatus::Playing => self.pause(),
            GameStatus::Paused => self.resume(),
            GameStatus::Ready | GameStatus::GameOver => self.start(),
        }
    }

    /// Release the tick schedule; the engine stays inspectable
    pub fn shutdown(&mut self) {
        if self.schedule.cancel() {
            log::debug!("tick schedule released on shutdown");
        }
    }

    /// Receive an event after every mutation
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            score: self.score,
            high_score: self.high_score,
            snake: self.snake.body.clone(),
            food: self.food,
            direction: self.direction,
            food_eaten: self.food_eaten,
            game_over_reason: self.game_over_reason,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn food_eaten(&self) -> bool {
        self.food_eaten
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    fn set_status(&mut self, to: GameStatus) {
        let from = self.status;
        if from == to {
            return;
        }

        self.status = to;
        log::debug!("status {:?} -> {:?}", from, to);
        self.emit(GameEvent::StatusChanged { from, to });
    }

    fn emit(&self, event: GameEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, snake: Snake, direction: Direction, food: Point) {
        self.snake = snake;
        self.direction = direction;
        self.pending_direction = direction;
        self.food = food;
    }
}
