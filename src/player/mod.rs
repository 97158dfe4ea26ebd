//! Player: the terminal host for the title sequence.
//!
//! Mounts an `Engine` on the terminal, drives its frame loop, forwards
//! resizes, keys and pointer motion, and draws the caption block once the
//! reveal is done.
//! Terminal state and the frame loop are scoped to `play`; both are released
//! on every exit path.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::config::TitleConfig;
use crate::content::{self, Caption, HeroContent};
use crate::engine::geometry::{cell_center, Viewport};
use crate::engine::Engine;
use crate::menubar::render_hints;
use crate::renderer::{Grid, Renderer};
use crate::types::{Color, NamedColor, Style, TerminalContract};

/// Rows reserved above the canvas for the hint bar.
const CANVAS_OFFSET: u16 = 1;
/// Rows reserved below the canvas for the caption block.
const CAPTION_ROWS: u16 = 2;

/// Where the headline copy comes from.
pub enum ContentSource {
    Fixed(Option<HeroContent>),
    /// Shell command run in the background; its stdout is the content JSON.
    Generator(String),
}

pub struct Player {
    config: TitleConfig,
    source: ContentSource,
}

/// Raw mode + alternate screen (+ mouse capture when asked), restored on
/// drop.
struct Session {
    stdout: io::Stdout,
    mouse: bool,
}

impl Session {
    fn open(mouse: bool) -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        let mut session = Session {
            stdout: io::stdout(),
            mouse: false,
        };
        execute!(
            session.stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;
        if mouse {
            execute!(session.stdout, event::EnableMouseCapture)?;
            session.mouse = true;
        }
        Ok(session)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.mouse {
            let _ = execute!(self.stdout, event::DisableMouseCapture);
        }
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Canvas viewport for a terminal of `cols` × `rows`, or `None` when there
/// is no room left for it.
fn canvas_viewport(cols: u16, rows: u16) -> Option<Viewport> {
    let canvas_rows = rows.checked_sub(CANVAS_OFFSET + CAPTION_ROWS)?;
    (cols > 0 && canvas_rows > 0).then(|| Viewport::from_cells(cols, canvas_rows))
}

impl Player {
    pub fn new(config: TitleConfig, source: ContentSource) -> Self {
        Player { config, source }
    }

    /// Play until the user quits.
    ///
    /// If no usable terminal surface is available the sequence does not
    /// start and this returns without drawing anything.
    pub fn play(self) -> Result<()> {
        let viewport = match terminal::size() {
            Ok((cols, rows)) => canvas_viewport(cols, rows),
            Err(e) => {
                log::error!("no terminal surface: {e}");
                return Ok(());
            }
        };
        let Some(viewport) = viewport else {
            log::error!("terminal too small for the title sequence");
            return Ok(());
        };

        let (content, pending) = match self.source {
            ContentSource::Fixed(content) => (content, None),
            ContentSource::Generator(command) => (None, Some(spawn_generator(command))),
        };
        let fps = self.config.fps;
        let mouse = self.config.backdrop.enabled && self.config.backdrop.parallax;
        let mut engine = Engine::mount(self.config, content, viewport)?;
        engine.set_loading(pending.is_some());

        let mut session = Session::open(mouse)?;
        let mut run = Run {
            engine,
            pending,
            interval: Duration::from_secs(1) / fps,
            prev: None,
        };
        run.run_loop(&mut session.stdout)
    }
}

/// Fire-and-forget content generation. The receiver yields the record, or
/// `None` if generation failed.
fn spawn_generator(command: String) -> Receiver<Option<HeroContent>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(content::generate(&command));
    });
    rx
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Time left to wait for input before the frame at `next_frame` is due, or
/// `None` once it is.
fn poll_budget(next_frame: Instant, now: Instant) -> Option<Duration> {
    (now < next_frame).then(|| next_frame - now)
}

struct Run {
    engine: Engine,
    pending: Option<Receiver<Option<HeroContent>>>,
    interval: Duration,
    prev: Option<Grid>,
}

impl Run {
    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        render_hints(stdout)?;
        let mut next_frame = Instant::now();

        loop {
            // Input is handled until the frame is due, never past it.
            while let Some(budget) = poll_budget(next_frame, Instant::now()) {
                if !event::poll(budget)? {
                    break;
                }
                if self.handle(event::read()?, stdout)? == Flow::Quit {
                    return Ok(());
                }
            }

            // Late frames are coalesced rather than replayed.
            let now = Instant::now();
            next_frame += self.interval;
            if next_frame < now {
                next_frame = now + self.interval;
            }

            self.poll_content();
            let (scene, event) = self.engine.frame();
            let contract = TerminalContract {
                width: scene.width,
                height: scene.height,
            };
            let grid = Renderer::rasterize(&scene, &contract);
            let full = self.prev.is_none();
            self.draw(stdout, &grid)?;
            self.prev = Some(grid);

            if full || event.is_some() {
                if let Some(caption) = self.engine.caption() {
                    render_caption(stdout, &caption, contract)?;
                }
            }
        }
    }

    fn handle(&mut self, event: event::Event, stdout: &mut io::Stdout) -> Result<Flow> {
        match event {
            event::Event::Key(key) => {
                use event::KeyCode::*;
                match key.code {
                    Char('q') | Esc => return Ok(Flow::Quit),
                    Char('r') => {
                        self.engine.reset();
                        self.redraw_chrome(stdout)?;
                    }
                    _ => {}
                }
            }
            event::Event::Resize(cols, rows) => match canvas_viewport(cols, rows) {
                Some(viewport) => {
                    self.engine.resize(viewport)?;
                    self.redraw_chrome(stdout)?;
                }
                None => log::warn!("ignoring resize to {cols}x{rows}"),
            },
            event::Event::Mouse(mouse) => {
                use event::MouseEventKind::*;
                if matches!(mouse.kind, Moved | Drag(_)) {
                    if let Some(row) = mouse.row.checked_sub(CANVAS_OFFSET) {
                        self.engine.point_at(cell_center(mouse.column, row));
                    }
                }
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn poll_content(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        let arrived = match rx.try_recv() {
            Ok(content) => content,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => None,
        };
        self.pending = None;
        self.engine.set_loading(false);
        if arrived.is_some() {
            self.engine.set_content(arrived);
        } else {
            log::warn!("content generation produced nothing, keeping fallback copy");
        }
    }

    /// Forget the previous frame so the next one is drawn in full.
    fn redraw_chrome(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        self.prev = None;
        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
        render_hints(stdout)
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn draw(&self, stdout: &mut io::Stdout, grid: &Grid) -> Result<()> {
        match &self.prev {
            Some(prev) if same_shape(prev, grid) => {
                for change in Renderer::diff(prev, grid) {
                    let cs = to_content_style(&change.cell.style);
                    queue!(
                        stdout,
                        cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                        style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
                    )?;
                }
            }
            _ => {
                for (y, row) in grid.iter().enumerate() {
                    queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
                    for cell in row {
                        let cs = to_content_style(&cell.style);
                        queue!(
                            stdout,
                            style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                        )?;
                    }
                }
            }
        }
        stdout.flush()?;
        Ok(())
    }
}

fn same_shape(a: &Grid, b: &Grid) -> bool {
    a.len() == b.len() && a.first().map(Vec::len) == b.first().map(Vec::len)
}

/// At most `width` characters of `text`.
fn clip(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}

fn render_caption(
    stdout: &mut io::Stdout,
    caption: &Caption,
    contract: TerminalContract,
) -> Result<()> {
    let top = contract.height + CANVAS_OFFSET;
    let centered = |text: &str| contract.width.saturating_sub(text.chars().count() as u16) / 2;

    let mut dim = style::ContentStyle::default();
    dim.attributes.set(style::Attribute::Dim);
    let mut bold = style::ContentStyle::default();
    bold.attributes.set(style::Attribute::Bold);

    let subheadline = clip(&caption.subheadline, contract.width);
    let cta = clip(&format!("[ {} ]", caption.cta_text), contract.width);
    queue!(
        stdout,
        cursor::MoveTo(centered(&subheadline), top),
        style::PrintStyledContent(style::StyledContent::new(dim, subheadline.as_str())),
        cursor::MoveTo(centered(&cta), top + 1),
        style::PrintStyledContent(style::StyledContent::new(bold, cta.as_str())),
    )?;
    stdout.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match *c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb { r, g, b },
    }
}
