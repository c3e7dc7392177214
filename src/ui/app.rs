//! Arena viewer
//!
//! Renders a demo session with ratatui: the arena on the left, the boss
//! health bar, player status and the event feed on the right.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{self, Canvas as CanvasWidget, Context},
        Block, Borders, Gauge, Paragraph,
    },
    Frame,
};

use crate::collab::PlayerAttack;
use crate::render::{self as boss_render, DrawCmd, DrawList};

use super::session::Session;

/// World units visible around the boss origin
const VIEW_HALF_WIDTH: f64 = 700.0;
const VIEW_ABOVE: f64 = 450.0;
const VIEW_BELOW: f64 = 950.0;

/// Convert a boss color to a terminal color
fn term_color(color: boss_render::Color) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

/// Glyph used for a named sprite
fn sprite_glyph(name: &str) -> &'static str {
    match name {
        "spr_TentacleHole" => "o",
        "spr_FireBall" => "*",
        "spr_IceCrusher" => "#",
        "spr_FloatingEye" => "@",
        "spr_Crosshair" => "+",
        "spr_FireOrb" => "°",
        name if name.ends_with("Eye") => "0",
        name if name.starts_with("spr_Tentacle") => "|",
        _ => "?",
    }
}

/// Main UI application
pub struct App {
    session: Session,
    draw_list: DrawList,
    debug_shapes: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            draw_list: DrawList::new(),
            debug_shapes: true,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle one key press. Returns true when the viewer should quit.
    pub fn handle_input(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => self.session.step(0.0, -1.0),
            KeyCode::Down => self.session.step(0.0, 1.0),
            KeyCode::Left => self.session.step(-1.0, 0.0),
            KeyCode::Right => self.session.step(1.0, 0.0),
            KeyCode::Char('t') => self.session.attack(PlayerAttack::Tongue),
            KeyCode::Char('f') => self.session.attack(PlayerAttack::FireBreath),
            KeyCode::Char('i') => self.session.attack(PlayerAttack::IceBreath),
            KeyCode::Enter => self.session.close_dialogue(),
            KeyCode::Char('k') => self.session.skip_phase(),
            KeyCode::Char('d') => self.debug_shapes = !self.debug_shapes,
            _ => {}
        }
        Ok(false)
    }

    pub fn update(&mut self, dt: f32) -> Result<()> {
        self.session.update(dt)?;
        self.draw_list = DrawList {
            commands: Vec::new(),
            debug: self.debug_shapes,
        };
        self.session.encounter.draw(&mut self.draw_list);
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(frame.area());

        self.render_arena(frame, chunks[0]);
        self.render_sidebar(frame, chunks[1]);
    }

    fn render_arena(&self, frame: &mut Frame, area: Rect) {
        let origin = self.session.origin;
        let (ox, oy) = (origin.x as f64, origin.y as f64);
        let (r, g, b) = self.session.kind.color();
        let boss_color = Color::Rgb(r, g, b);
        let boss_glyph = self.session.kind.glyph().to_string();
        let player = self.session.encounter.host().player.position;
        let commands = &self.draw_list.commands;

        let title = format!(" {} ", self.session.kind.name());
        let widget = CanvasWidget::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .marker(Marker::Braille)
            .x_bounds([ox - VIEW_HALF_WIDTH, ox + VIEW_HALF_WIDTH])
            // World y grows downward, the canvas y upward
            .y_bounds([-(oy + VIEW_BELOW), -(oy - VIEW_ABOVE)])
            .paint(move |ctx| {
                for cmd in commands {
                    paint_command(ctx, cmd, &boss_glyph, boss_color);
                }
                ctx.print(
                    player.x as f64,
                    -(player.y as f64),
                    Span::styled("☺", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                );
            });
        frame.render_widget(widget, area);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(7),
                Constraint::Min(5),
                Constraint::Length(5),
            ])
            .split(area);

        let health = self.draw_list.commands.iter().find_map(|c| match c {
            DrawCmd::HealthBar { label, fraction } => Some((label.clone(), *fraction)),
            _ => None,
        });
        let (label, fraction) = health.unwrap_or_else(|| ("???".to_string(), 1.0));
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Boss "))
            .gauge_style(Style::default().fg(Color::Red))
            .ratio(fraction.clamp(0.0, 1.0) as f64)
            .label(label);
        frame.render_widget(gauge, chunks[0]);

        let host = self.session.encounter.host();
        let dialogue = match (host.dialogue.open, host.dialogue.opened.last()) {
            (true, Some((_, text))) => format!("text #{} (Enter)", text),
            _ => "-".to_string(),
        };
        let status = vec![
            Line::from(format!("Phase: {}", self.session.encounter.phase_name())),
            Line::from(format!("Time: {:.1}s", self.session.encounter.now())),
            Line::from(format!("Health: {:.2} / {:.2}", host.player.health, host.player.max_health)),
            Line::from(format!("Frozen: {}", host.player.frozen)),
            Line::from(format!("Dialogue: {}", dialogue)),
        ];
        let status = Paragraph::new(status)
            .block(Block::default().borders(Borders::ALL).title(" Player "));
        frame.render_widget(status, chunks[1]);

        let events: Vec<Line> = self
            .session
            .history
            .iter()
            .rev()
            .map(|l| Line::from(Span::styled(l.clone(), Style::default().fg(Color::Gray))))
            .collect();
        let events = Paragraph::new(events)
            .block(Block::default().borders(Borders::ALL).title(" Events "));
        frame.render_widget(events, chunks[2]);

        let help = Paragraph::new(vec![
            Line::from("arrows move  t tongue"),
            Line::from("f fire  i ice  Enter close"),
            Line::from("k skip phase  d shapes  q quit"),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Keys "));
        frame.render_widget(help, chunks[3]);
    }
}

fn paint_command(ctx: &mut Context<'_>, cmd: &DrawCmd, boss_glyph: &str, boss_color: Color) {
    match cmd {
        DrawCmd::Sprite { name, at, alpha } => {
            if *alpha <= 0.0 {
                return;
            }
            let (x, y) = (at.x as f64, -(at.y as f64));
            let style = if name.ends_with("Tx") {
                Style::default().fg(boss_color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let glyph = if name.ends_with("Tx") { boss_glyph.to_string() } else { sprite_glyph(name).to_string() };
            ctx.print(x, y, Span::styled(glyph, style));
        }
        DrawCmd::Rect { rect, color } => {
            ctx.draw(&canvas::Rectangle {
                x: rect.x1 as f64,
                y: -(rect.y2 as f64),
                width: rect.width() as f64,
                height: rect.height() as f64,
                color: term_color(*color),
            });
        }
        DrawCmd::Circle { circle, color } => {
            ctx.draw(&canvas::Circle {
                x: circle.center.x as f64,
                y: -(circle.center.y as f64),
                radius: circle.radius as f64,
                color: term_color(*color),
            });
        }
        DrawCmd::HealthBar { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bosses::BossKind;
    use crate::data::BossTunings;
    use crate::game::Difficulty;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let session = Session::new(BossKind::Eldritch, Difficulty::Normal, &BossTunings::default(), None)
            .expect("session should start");
        App::new(session)
    }

    #[test]
    fn test_quit_key() {
        let mut app = app();
        let quit = app.handle_input(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(quit.expect("input"));
    }

    #[test]
    fn test_update_collects_draw_commands() {
        let mut app = app();
        app.update(0.016).expect("update");
        assert!(app.draw_list.count_sprites("LovecraftTx") >= 1);
    }

    #[test]
    fn test_sprite_glyphs() {
        assert_eq!(sprite_glyph("spr_FireBall"), "*");
        assert_eq!(sprite_glyph("FireEye"), "0");
        assert_eq!(sprite_glyph("unknown"), "?");
    }
}
