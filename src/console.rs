//! The console façade.
//!
//! [`Console`] ties a [`DisplaySurface`] to the two pieces with behaviour of
//! their own: the blocking [`LineQueue`] behind [`read_line`](Console::read_line)
//! and the [`UpdateScheduler`] behind [`set_schedule`](Console::set_schedule).
//! Everything else is forwarded to the surface.
//!
//! # Setup
//!
//! A console starts detached. Configure it, then hand it a surface with
//! [`run`](Console::run); until then, every operation that touches the
//! surface fails with [`ConsoleError::SurfaceUnavailable`].
//!
//! ```
//! use std::sync::Arc;
//! use console_pane::{
//!     BufferSurface, Console, ConsoleConfig, ConsoleError, DisplaySurface, NamedColor,
//! };
//!
//! let mut console = Console::new(ConsoleConfig::with_title("Demo"));
//! assert!(matches!(console.println("too early"), Err(ConsoleError::SurfaceUnavailable)));
//!
//! let surface = Arc::new(BufferSurface::new());
//! console.run(Arc::clone(&surface));
//! console.println("ready").unwrap();
//! console.print_colored("warning", NamedColor::Yellow).unwrap();
//!
//! assert_eq!(surface.text(), "ready\nwarning");
//! ```
//!
//! # Reading Lines
//!
//! The first read registers a key listener on the surface. On every plain
//! Enter press it snapshots the whole buffer and queues its last line. That
//! line is whatever the buffer ends with at the moment of the press, not just
//! what the user typed since the previous read: output printed after the
//! prompt on the same line becomes part of the committed line. Print prompts
//! with a trailing newline, or clear the surface between reads, to keep lines
//! apart.
//!
//! # Thread Safety
//!
//! I/O, reading and schedule control take `&self`, so a console shared
//! through an `Arc` can be read from several threads while a scheduler
//! callback writes to the surface. Each committed line goes to exactly one
//! reader.

use crate::colors::{Color, Rgb, TextStyle};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::event::ListenerId;
use crate::input::{KeyEvent, last_line_of};
use crate::line_queue::LineQueue;
use crate::matrix::Matrix;
use crate::scheduler::{TimerHandle, UpdateScheduler, run_after};
use crate::surface::DisplaySurface;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// A styled text console over a display surface.
pub struct Console<S: DisplaySurface + 'static> {
    config: ConsoleConfig,

    surface: Option<Arc<S>>,

    /// Lines committed on the surface, waiting for `read_line`
    queue: Arc<LineQueue>,

    /// The commit listener, registered on the first read
    reader: Mutex<Option<ListenerId>>,

    scheduler: Mutex<UpdateScheduler>,

    matrix: Option<Matrix>,
}

impl<S: DisplaySurface + 'static> Console<S> {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            surface: None,
            queue: Arc::new(LineQueue::new()),
            reader: Mutex::new(None),
            scheduler: Mutex::new(UpdateScheduler::new()),
            matrix: None,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Mutable access to the configuration. Changes reach the surface on the next `run`.
    pub fn config_mut(&mut self) -> &mut ConsoleConfig {
        &mut self.config
    }

    /// Attaches the surface and applies the configuration to it.
    ///
    /// Running again with another surface moves the line reader to it.
    pub fn run(&mut self, surface: Arc<S>) {
        surface.apply_config(&self.config);
        if let Some(previous) = self.surface.replace(surface) {
            if let Some(id) = self.reader.lock().take() {
                previous.remove_key_listener(id);
            }
        }
        log::debug!("console `{}` attached to surface", self.config.title);
    }

    pub fn surface(&self) -> Result<&Arc<S>> {
        self.surface.as_ref().ok_or(ConsoleError::SurfaceUnavailable)
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn print(&self, text: &str) -> Result<()> {
        self.surface()?.append_text(text);
        Ok(())
    }

    pub fn println(&self, text: &str) -> Result<()> {
        self.surface()?.append_text(&format!("{text}\n"));
        Ok(())
    }

    pub fn newline(&self) -> Result<()> {
        self.print("\n")
    }

    pub fn print_colored(&self, text: &str, color: impl Into<Color>) -> Result<()> {
        self.surface()?.append_styled(text, TextStyle::fg(color));
        Ok(())
    }

    pub fn println_colored(&self, text: &str, color: impl Into<Color>) -> Result<()> {
        self.print_colored(&format!("{text}\n"), color)
    }

    pub fn print_rgb(&self, text: &str, r: u8, g: u8, b: u8) -> Result<()> {
        self.print_colored(text, Rgb::new(r, g, b))
    }

    pub fn println_rgb(&self, text: &str, r: u8, g: u8, b: u8) -> Result<()> {
        self.println_colored(text, Rgb::new(r, g, b))
    }

    /// Replaces everything shown on the surface.
    pub fn set_text(&self, text: &str) -> Result<()> {
        self.surface()?.set_text(text);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.surface()?.clear();
        Ok(())
    }

    pub fn set_matrix(&mut self, matrix: impl Into<Matrix>) {
        self.matrix = Some(matrix.into());
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        self.matrix.as_ref()
    }

    /// Prints the stored matrix. Does nothing when none is set.
    pub fn print_matrix(&self) -> Result<()> {
        let surface = self.surface()?;
        if let Some(matrix) = &self.matrix {
            surface.append_text(&matrix.render());
        }
        Ok(())
    }

    pub fn add_key_listener(
        &self,
        listener: impl Fn(&KeyEvent) + Send + Sync + 'static,
    ) -> Result<ListenerId> {
        Ok(self.surface()?.add_key_listener(Arc::new(listener)))
    }

    pub fn remove_key_listener(&self, id: ListenerId) -> Result<bool> {
        Ok(self.surface()?.remove_key_listener(id))
    }

    /// Blocks until the next committed line.
    pub fn read_line(&self) -> Result<String> {
        self.ensure_reader()?;
        self.queue.read_line()
    }

    /// Blocks for at most `timeout` waiting for the next committed line.
    pub fn read_line_timeout(&self, timeout: Duration) -> Result<String> {
        self.ensure_reader()?;
        self.queue.read_line_timeout(timeout)
    }

    /// Takes the next committed line if one is waiting.
    pub fn try_read_line(&self) -> Result<Option<String>> {
        self.ensure_reader()?;
        Ok(self.queue.try_read_line())
    }

    /// Wakes all blocked readers with [`ConsoleError::Cancelled`].
    ///
    /// The queue stays closed; later commits are dropped.
    pub fn cancel_reads(&self) {
        self.queue.close();
    }

    pub fn line_queue(&self) -> &Arc<LineQueue> {
        &self.queue
    }

    fn ensure_reader(&self) -> Result<()> {
        let surface = self.surface()?;
        let mut reader = self.reader.lock();
        if reader.is_some() {
            return Ok(());
        }

        let queue = Arc::clone(&self.queue);
        let weak = Arc::downgrade(surface);
        let id = surface.add_key_listener(Arc::new(move |event: &KeyEvent| {
            if !event.is_commit() {
                return;
            }
            let Some(surface) = weak.upgrade() else {
                return;
            };
            let text = surface.text();
            let line = last_line_of(&text);
            log::debug!("line committed ({} chars)", line.len());
            queue.push(line.to_owned());
        }));
        log::debug!("line reader registered");
        *reader = Some(id);
        Ok(())
    }

    /// Stores the update callback and starts it, like `configure` + `start`.
    ///
    /// While a schedule is running this fails with `AlreadyRunning` and the
    /// running callback stays registered.
    pub fn set_schedule(
        &self,
        callback: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Result<()> {
        let mut scheduler = self.scheduler.lock();
        if scheduler.is_running() {
            return Err(ConsoleError::AlreadyRunning);
        }
        scheduler.set_callback(callback);
        scheduler.start()
    }

    /// Stores the callback and timing without starting.
    pub fn configure_schedule(
        &self,
        callback: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
        initial_delay: Duration,
        period: Duration,
    ) {
        self.scheduler.lock().configure(callback, initial_delay, period);
    }

    pub fn set_delay(&self, period: Duration) {
        self.scheduler.lock().set_delay(period);
    }

    pub fn set_initial_delay(&self, initial_delay: Duration) {
        self.scheduler.lock().set_initial_delay(initial_delay);
    }

    /// Receives scheduler and timer callback failures.
    pub fn on_callback_error(&self, callback: impl Fn(&ConsoleError) + Send + Sync + 'static) {
        self.scheduler.lock().set_error_callback(callback);
    }

    pub fn start(&self) -> Result<()> {
        self.scheduler.lock().start()
    }

    /// Stops the schedule, waiting for an in-flight callback to return.
    pub fn stop(&self) -> Result<()> {
        // Joined outside the lock so the callback can still reach the console
        let handle = self.scheduler.lock().take_handle()?;
        handle.stop();
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.lock().is_running()
    }

    /// Runs `callback` once after `delay`.
    pub fn set_timer(
        &self,
        callback: impl FnOnce() -> anyhow::Result<()> + Send + 'static,
        delay: Duration,
    ) -> Result<TimerHandle> {
        let on_error = self.scheduler.lock().error_callback();
        run_after(callback, delay, on_error)
    }
}

impl<S: DisplaySurface + 'static> Drop for Console<S> {
    fn drop(&mut self) {
        self.queue.close();
        if let (Some(surface), Some(id)) = (&self.surface, self.reader.get_mut().take()) {
            surface.remove_key_listener(id);
        }
    }
}

impl<S: DisplaySurface + 'static> std::fmt::Debug for Console<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("title", &self.config.title)
            .field("attached", &self.surface.is_some())
            .field("queue", &self.queue)
            .finish()
    }
}
