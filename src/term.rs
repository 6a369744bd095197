use std::{io::{stdout, Stdout, Write}, time::Duration};

use anyhow::{bail, Context, Result};
use log::error;
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use crate::grid::{Grid, Position};
use crate::input::{InputEvent, InputSource};
use crate::render::{Color, Renderer, Size};
use crate::snake::Direction::*;

// Terminal characters are roughly twice as tall as they are wide
const COLUMNS_PER_CELL: u16 = 2;

/// Terminal state that must be undone before the process exits.
pub trait Session {
    fn setup(&mut self, title: &str) -> Result<()>;
    fn restore(&mut self) -> Result<()>;
}

/// Runs `body` inside a set-up session. The session is restored even when
/// setup fails partway or `body` errors.
pub fn with_session<S, T, F>(session: &mut S, title: &str, body: F) -> Result<T>
where
    S: Session,
    F: FnOnce(&mut S) -> Result<T>,
{
    let result = session.setup(title).and_then(|()| body(session));

    if let Err(e) = session.restore() {
        error!("failed to restore terminal: {:#}", e);
    }

    result
}

/// Draws the board into the terminal, one cell per two character columns.
pub struct TermRenderer {
    stdout: Stdout,
    grid: Grid,
    // Background of every cell, so outlines can be drawn over a fill
    backgrounds: Vec<Color>,
}

impl TermRenderer {
    pub fn new(grid: Grid) -> Result<Self> {
        let (width, height) = terminal::size().context("error reading terminal size")?;
        let needed = (grid.columns() as u16 * COLUMNS_PER_CELL, grid.rows() as u16);

        if width < needed.0 || height < needed.1 {
            bail!(
                "terminal is {}x{}, the board needs at least {}x{}",
                width,
                height,
                needed.0,
                needed.1
            );
        }

        let backgrounds = vec![Color::rgb(0, 0, 0); (grid.columns() * grid.rows()) as usize];
        Ok(TermRenderer { stdout: stdout(), grid, backgrounds })
    }

    fn cells(&self, at: Position, size: Size) -> Vec<Position> {
        let mut cells = Vec::with_capacity(size.width as usize * size.height as usize);
        for dy in 0..size.height as i32 {
            for dx in 0..size.width as i32 {
                cells.push(self.grid.wrap(Position::new(at.x + dx, at.y + dy)));
            }
        }
        cells
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.grid.columns() + pos.x) as usize
    }

    fn print_at(&mut self, pos: Position, text: &str, fg: Option<Color>, bg: Color) -> Result<()> {
        if let Some(color) = fg {
            queue!(self.stdout, style::SetForegroundColor(to_term_color(color)))?;
        }

        let col = pos.x as u16 * COLUMNS_PER_CELL;
        queue!(
            self.stdout,
            style::SetBackgroundColor(to_term_color(bg)),
            cursor::MoveTo(col, pos.y as u16),
            style::Print(text),
            style::ResetColor,
        )?;
        Ok(())
    }
}

impl Session for TermRenderer {
    fn setup(&mut self, title: &str) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, terminal::SetTitle(title))
            .context("error entering alt screen")?;
        terminal::enable_raw_mode().context("error enabling raw mode")?;
        execute!(
            self.stdout,
            cursor::Hide,
            cursor::DisableBlinking,
            terminal::Clear(ClearType::All)
        )
        .context("error hiding cursor")?;
        Ok(())
    }

    // Every step is attempted; the first failure is returned
    fn restore(&mut self) -> Result<()> {
        let raw = terminal::disable_raw_mode().context("error disabling raw mode");
        let screen = execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )
        .context("error leaving alt screen");

        raw.and(screen)
    }
}

impl Renderer for TermRenderer {
    fn clear(&mut self, color: Color) -> Result<()> {
        let size = Size { width: self.grid.columns() as u16, height: self.grid.rows() as u16 };
        self.fill_rect(Position::new(0, 0), size, color)
    }

    fn fill_rect(&mut self, at: Position, size: Size, color: Color) -> Result<()> {
        for pos in self.cells(at, size) {
            let i = self.index(pos);
            self.backgrounds[i] = color;
            self.print_at(pos, "  ", None, color)?;
        }
        Ok(())
    }

    // A terminal cell can't carry a true outline; brackets over the fill stand in for it
    fn stroke_rect(&mut self, at: Position, size: Size, color: Color) -> Result<()> {
        queue!(self.stdout, style::SetAttribute(style::Attribute::Bold))?;
        for pos in self.cells(at, size) {
            let bg = self.backgrounds[self.index(pos)];
            self.print_at(pos, "[]", Some(color), bg)?;
        }
        queue!(self.stdout, style::SetAttribute(style::Attribute::Reset))?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.stdout.flush().context("error flushing")
    }
}

/// Reads whatever key events are already queued, without waiting.
pub struct TermInput;

impl InputSource for TermInput {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = vec![];

        while poll(Duration::ZERO).context("error polling events")? {
            let ev = read().context("error reading event")?;
            events.push(translate(&ev));
        }

        Ok(events)
    }
}

fn translate(ev: &Event) -> InputEvent {
    match ev {
        Event::Key(key) if key.kind != KeyEventKind::Press => InputEvent::Other,
        Event::Key(key) if is_quit(key) => InputEvent::Quit,
        Event::Key(KeyEvent { code, .. }) => match code {
            KeyCode::Char('w') | KeyCode::Up => InputEvent::Key(Up),
            KeyCode::Char('a') | KeyCode::Left => InputEvent::Key(Left),
            KeyCode::Char('s') | KeyCode::Down => InputEvent::Key(Down),
            KeyCode::Char('d') | KeyCode::Right => InputEvent::Key(Right),
            _ => InputEvent::Other,
        },
        _ => InputEvent::Other,
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    match ev.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => ev.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn to_term_color(color: Color) -> style::Color {
    style::Color::Rgb { r: color.r, g: color.g, b: color.b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        assert_eq!(translate(&key(KeyCode::Up, KeyModifiers::NONE)), InputEvent::Key(Up));
        assert_eq!(translate(&key(KeyCode::Char('a'), KeyModifiers::NONE)), InputEvent::Key(Left));
        assert_eq!(translate(&key(KeyCode::Down, KeyModifiers::NONE)), InputEvent::Key(Down));
        assert_eq!(translate(&key(KeyCode::Char('d'), KeyModifiers::NONE)), InputEvent::Key(Right));
    }

    #[test]
    fn quit_keys() {
        assert_eq!(translate(&key(KeyCode::Esc, KeyModifiers::NONE)), InputEvent::Quit);
        assert_eq!(translate(&key(KeyCode::Char('q'), KeyModifiers::NONE)), InputEvent::Quit);
        assert_eq!(translate(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)), InputEvent::Quit);
        assert_eq!(translate(&key(KeyCode::Char('c'), KeyModifiers::NONE)), InputEvent::Other);
    }

    #[test]
    fn releases_and_other_events_are_ignored() {
        let release = Event::Key(KeyEvent::new_with_kind_and_state(
            KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Release, KeyEventState::NONE,
        ));
        assert_eq!(translate(&release), InputEvent::Other);
        assert_eq!(translate(&Event::Resize(80, 24)), InputEvent::Other);
        assert_eq!(translate(&Event::FocusLost), InputEvent::Other);
    }

    #[derive(Default)]
    struct FakeSession {
        fail_setup: bool,
        restored: bool,
    }

    impl Session for FakeSession {
        fn setup(&mut self, _title: &str) -> Result<()> {
            if self.fail_setup {
                bail!("raw mode unavailable");
            }
            Ok(())
        }

        fn restore(&mut self) -> Result<()> {
            self.restored = true;
            Ok(())
        }
    }

    #[test]
    fn failed_setup_still_restores_and_skips_the_body() {
        let mut session = FakeSession { fail_setup: true, ..FakeSession::default() };
        let mut ran = false;

        let result = with_session(&mut session, "Snake", |_| {
            ran = true;
            Ok(())
        });

        assert!(result.is_err());
        assert!(!ran);
        assert!(session.restored);
    }

    #[test]
    fn body_errors_are_returned_after_restoring() {
        let mut session = FakeSession::default();

        let result: Result<()> = with_session(&mut session, "Snake", |_| bail!("renderer gone"));

        assert_eq!(result.unwrap_err().to_string(), "renderer gone");
        assert!(session.restored);
    }

    #[test]
    fn colors_convert_to_rgb() {
        assert_eq!(
            to_term_color(Color::rgb(93, 216, 228)),
            style::Color::Rgb { r: 93, g: 216, b: 228 }
        );
    }
}
