use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GRID_SIZE, GameOverReason, GameSnapshot, GameStatus, Point};

/// Board size in terminal cells: two columns per grid cell plus the border
const BOARD_WIDTH: u16 = 2 * GRID_SIZE as u16 + 2;
const BOARD_HEIGHT: u16 = GRID_SIZE as u16 + 2;
/// Board plus one header and one footer line
const MIN_HEIGHT: u16 = BOARD_HEIGHT + 2;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame. `flash` highlights the head right after eating.
    pub fn render(&self, frame: &mut Frame, snapshot: &GameSnapshot, flash: bool) {
        let area = frame.area();
        if area.width < BOARD_WIDTH || area.height < MIN_HEIGHT {
            frame.render_widget(self.render_too_small(area), area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),            // Header
                Constraint::Length(BOARD_HEIGHT), // Game area
                Constraint::Length(1),            // Footer
            ])
            .flex(Flex::Center)
            .split(area);

        frame.render_widget(self.render_stats(snapshot), chunks[0]);

        // The board keeps its exact size, centered horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(BOARD_WIDTH)])
            .flex(Flex::Center)
            .split(chunks[1])[0];

        let panel = match snapshot.status {
            GameStatus::Playing => self.render_grid(snapshot, flash),
            GameStatus::Ready => self.render_message(
                "SNAKE",
                Color::Green,
                "Press Space to start",
                None,
            ),
            GameStatus::Paused => self.render_message(
                "PAUSED",
                Color::Yellow,
                "Press Space to resume",
                None,
            ),
            GameStatus::GameOver => self.render_message(
                "GAME OVER",
                Color::Red,
                "Space or R: play again, Q: quit",
                Some(snapshot),
            ),
        };
        frame.render_widget(panel, game_area);

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_too_small(&self, area: Rect) -> Paragraph<'static> {
        let text = vec![
            Line::from(Span::styled(
                "Terminal too small",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "need {}x{}, have {}x{}",
                BOARD_WIDTH, MIN_HEIGHT, area.width, area.height
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_grid(&self, snapshot: &GameSnapshot, flash: bool) -> Paragraph<'_> {
        let head = snapshot.snake.first().copied();
        let mut lines = Vec::new();

        for y in 0..GRID_SIZE {
            let mut spans = Vec::new();

            for x in 0..GRID_SIZE {
                let pos = Point::new(x, y);

                let cell = if Some(pos) == head {
                    let color = if flash { Color::Yellow } else { Color::Cyan };
                    Span::styled("■ ", Style::default().fg(color).add_modifier(Modifier::BOLD))
                } else if snapshot.snake.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == snapshot.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &GameSnapshot) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Length: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.snake.len().to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_message(
        &self,
        title: &'static str,
        color: Color,
        hint: &'static str,
        result: Option<&GameSnapshot>,
    ) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        if let Some(snapshot) = result {
            let cause = match snapshot.game_over_reason {
                Some(GameOverReason::Wall) => "Hit the wall",
                Some(GameOverReason::SelfCollision) => "Bit yourself",
                Some(GameOverReason::BoardFull) => "Board cleared!",
                None => "",
            };
            text.push(Line::from(Span::styled(
                cause,
                Style::default().fg(Color::Gray),
            )));
            text.push(Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            text.push(Line::from(""));
        }

        text.push(Line::from(Span::styled(hint, Style::default().fg(Color::Gray))));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameEngine};
    use crate::storage::MemoryStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_ready_screen() {
        let engine = GameEngine::with_seed(GameConfig::default(), Box::new(MemoryStore::new()), 1);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|frame| Renderer::new().render(frame, &engine.snapshot(), false))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Press Space to start"));
        assert!(text.contains("Best: 0"));
    }

    fn playing_snapshot(head: Point) -> GameSnapshot {
        GameSnapshot {
            status: GameStatus::Playing,
            score: 0,
            high_score: 0,
            snake: vec![head, head.moved_by(-1, 0), head.moved_by(-2, 0)],
            food: Point::new(0, 0),
            direction: crate::game::Direction::Right,
            food_eaten: false,
            game_over_reason: None,
        }
    }

    #[test]
    fn test_bottom_row_visible_on_80x24() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let snapshot = playing_snapshot(Point::new(10, 19));

        terminal
            .draw(|frame| Renderer::new().render(frame, &snapshot, false))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("■"), "head on the last row must be drawn");
        assert!(text.contains("Score: 0"));
        assert!(text.contains("to quit"));
    }

    #[test]
    fn test_small_terminal_gets_notice() {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        let snapshot = playing_snapshot(Point::new(10, 10));

        terminal
            .draw(|frame| Renderer::new().render(frame, &snapshot, false))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Terminal too small"));
        assert!(!text.contains("■"));
    }

    #[test]
    fn test_playing_grid_shows_snake_and_food() {
        let mut engine =
            GameEngine::with_seed(GameConfig::default(), Box::new(MemoryStore::new()), 1);
        engine.start();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();

        terminal
            .draw(|frame| Renderer::new().render(frame, &engine.snapshot(), false))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("■"));
        assert!(text.contains("□"));
        assert!(text.contains("O"));
        assert!(text.contains("Length: 3"));
    }
}
