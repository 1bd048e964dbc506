/// Terminal host for the sphere visualization
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info};
use neurosphere_core::{FrameLoop, FrameStats, SceneConfig, SphereRenderer};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::CellRenderer;

/// Extra spin applied by the arrow keys (radians)
const NUDGE: f32 = 0.1;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    sphere: SphereRenderer,
    cells: CellRenderer,
    frames: FrameLoop<Instant>,
    frame_time: Duration,
    paused: bool,
    stats: FrameStats,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig, target_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, target_fps, width, height))
    }

    /// Build an app for a fixed terminal size without touching the terminal
    pub fn with_size(config: SceneConfig, target_fps: u32, columns: u16, rows: u16) -> Self {
        let mut app = Self {
            sphere: SphereRenderer::new(config),
            cells: CellRenderer::new(columns as usize, rows as usize),
            frames: FrameLoop::new(),
            frame_time: Duration::from_millis(1000 / target_fps.max(1) as u64),
            paused: false,
            stats: FrameStats::default(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.resize(columns, rows);
        app
    }

    pub fn sphere(&self) -> &SphereRenderer {
        &self.sphere
    }

    pub fn cells(&self) -> &CellRenderer {
        &self.cells
    }

    pub fn is_running(&self) -> bool {
        !self.frames.is_cancelled()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        info!("terminal renderer started");

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        info!("terminal renderer stopped after {} frames", self.frames.frames());

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let frame_time = self.frame_time;
        self.frames.schedule(Instant::now);

        while self.is_running() {
            let deadline = self.frames.pending().copied().unwrap_or_else(Instant::now);

            // Handle input until the next frame is due
            let timeout = deadline.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                let event = event::read()?;
                self.handle_event(event);
                continue;
            }

            if !self.frames.begin_frame() {
                break;
            }
            let frame_start = Instant::now();

            self.step();
            self.render()?;

            self.frames.schedule(|| frame_start + frame_time);
            self.sample_fps();
        }

        Ok(())
    }

    /// React to one terminal event; resizes are applied before the next frame
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.frames.cancel();
                }
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                KeyCode::Char('a') | KeyCode::Left => {
                    self.sphere.nudge_rotation(-NUDGE);
                }
                KeyCode::Char('d') | KeyCode::Right => {
                    self.sphere.nudge_rotation(NUDGE);
                }
                _ => {}
            },
            Event::Resize(columns, rows) => self.resize(columns, rows),
            _ => {}
        }
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.cells.resize(columns as usize, rows as usize);
        let (width, height) = self.cells.logical_size();
        if self.sphere.resize(width, height, 1.0) {
            debug!("terminal resized to {columns}x{rows} cells");
        }
    }

    /// Advance the animation unless paused and rasterize it
    pub fn step(&mut self) {
        if !self.paused {
            self.sphere.update();
        }
        self.stats = self.sphere.draw(&mut self.cells);
    }

    fn sample_fps(&mut self) {
        self.frame_count += 1;
        let now = Instant::now();
        if (now - self.last_fps_sample).as_secs() >= 1 {
            self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
            self.frame_count = 0;
            self.last_fps_sample = now;
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let mut stdout = stdout();
        self.cells.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::DarkGrey),
            Print(format!(
                "NeuroSphere | FPS: {:.1} | nodes {} links {}{} | Space=Pause A/D/Arrows=Spin Q=Quit",
                self.fps,
                self.stats.nodes,
                self.stats.links,
                if self.paused { " (paused)" } else { "" },
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
