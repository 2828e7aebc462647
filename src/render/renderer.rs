use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::ai::DecisionKind;
use crate::game::{Direction, GameSnapshot, Position};
use crate::modes::{AppController, AppState, PlayMode};

/// Food cycles through these as it is eaten
const FOOD_PALETTE: [Color; 7] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::LightRed,
];

pub fn food_color(index: u8) -> Color {
    FOOD_PALETTE[index as usize % FOOD_PALETTE.len()]
}

fn arrow(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "↑ ",
        Direction::Down => "↓ ",
        Direction::Left => "← ",
        Direction::Right => "→ ",
    }
}

pub struct Renderer {
    /// Draw the autopilot's tour on empty cells
    pub show_cycle: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self { show_cycle: false }
    }

    pub fn toggle_cycle_overlay(&mut self) {
        self.show_cycle = !self.show_cycle;
    }

    pub fn render(&self, frame: &mut Frame, controller: &AppController) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(controller), chunks[0]);

        let game_area = Layout::default()
            .direction(LayoutDirection::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match controller.app_state() {
            AppState::Playing => frame.render_widget(self.render_grid(controller), game_area),
            AppState::Menu => frame.render_widget(self.render_menu(controller), game_area),
            AppState::GameOver => {
                frame.render_widget(self.render_game_over(controller), game_area)
            }
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, controller: &AppController) -> Paragraph<'_> {
        let snapshot: GameSnapshot = controller.snapshot();
        let (width, height) = (controller.config().grid_width, controller.config().grid_height);
        let agent = controller.agent();
        let head = snapshot.body.first().copied();

        let mut lines = Vec::with_capacity(height);
        for y in 0..height {
            let mut spans = Vec::with_capacity(width);

            for x in 0..width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if snapshot.body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == snapshot.food {
                    Span::styled(
                        "O ",
                        Style::default()
                            .fg(food_color(snapshot.food_color))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if self.show_cycle {
                    let next = agent
                        .index()
                        .get(pos)
                        .and_then(|i| pos.direction_to(agent.cycle().successor(i)));
                    match next {
                        Some(direction) => {
                            Span::styled(arrow(direction), Style::default().fg(Color::DarkGray))
                        }
                        None => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                    }
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

    fn render_stats(&self, controller: &AppController) -> Paragraph<'_> {
        let state = controller.state();
        let metrics = controller.metrics();
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let plan = match controller.last_decision().map(|d| d.kind) {
            Some(DecisionKind::Shortcut) => "shortcut",
            Some(DecisionKind::Follow) => "cycle",
            None => "-",
        };

        let text = vec![Line::from(vec![
            Span::styled("Game: ", label),
            Span::styled(state.games_played.to_string(), value),
            Span::raw("   "),
            Span::styled("Wins: ", label),
            Span::styled(state.games_won.to_string(), value),
            Span::raw("   "),
            Span::styled("Length: ", label),
            Span::styled(
                state.snake.len().to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_length.to_string(), value),
            Span::raw("   "),
            Span::styled("Mode: ", label),
            Span::styled(controller.play_mode().as_str(), value),
            Span::raw("   "),
            Span::styled("Move: ", label),
            Span::styled(plan, value),
            Span::raw("   "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_menu(&self, controller: &AppController) -> Paragraph<'_> {
        let selected = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        let idle = Style::default().fg(Color::Gray);
        let (ai, manual) = match controller.play_mode() {
            PlayMode::Ai => (selected, idle),
            PlayMode::Manual => (idle, selected),
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "SETTINGS",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("AI", ai)),
            Line::from(Span::styled("MANUAL", manual)),
            Line::from(""),
            Line::from(Span::styled(
                "Up/Down to switch, Enter to resume",
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn render_game_over(&self, controller: &AppController) -> Paragraph<'_> {
        let state = controller.state();

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.snake.len().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press any arrow", Style::default().fg(Color::Green)),
                Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
                Span::styled("Enter", Style::default().fg(Color::Yellow)),
                Span::styled(" for settings or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::raw(" menu | "),
            Span::styled("C", Style::default().fg(Color::Cyan)),
            Span::raw(" cycle | "),
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
    use crate::game::{Action, GameConfig};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(renderer: &Renderer, controller: &AppController) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| renderer.render(frame, controller))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_food_palette_wraps() {
        assert_eq!(food_color(0), Color::Red);
        assert_eq!(food_color(6), Color::LightRed);
        assert_eq!(food_color(7), Color::Red);
    }

    #[test]
    fn test_header_shows_mode() {
        let controller =
            AppController::with_seed(GameConfig::default(), PlayMode::Ai, 1).unwrap();
        let screen = draw(&Renderer::new(), &controller);

        assert!(screen.contains("Mode: AI"));
        assert!(screen.contains("Length: 1"));
        assert!(screen.contains("■"));
    }

    #[test]
    fn test_menu_screen() {
        let mut controller =
            AppController::with_seed(GameConfig::default(), PlayMode::Manual, 1).unwrap();
        controller.process_action(Action::Confirm);

        let screen = draw(&Renderer::new(), &controller);
        assert!(screen.contains("SETTINGS"));
    }

    #[test]
    fn test_cycle_overlay_draws_arrows() {
        let controller =
            AppController::with_seed(GameConfig::default(), PlayMode::Ai, 1).unwrap();
        let mut renderer = Renderer::new();

        let arrows = |screen: String| screen.chars().filter(|c| "↑↓←→".contains(*c)).count();

        // only the footer legend without the overlay
        assert_eq!(arrows(draw(&renderer, &controller)), 4);

        renderer.toggle_cycle_overlay();
        // every empty cell gets an arrow: 64 cells minus head and food
        assert_eq!(arrows(draw(&renderer, &controller)), 4 + 62);
    }
}
