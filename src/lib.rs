//! # console-pane
//!
//! A styled text console for embedding in desktop applications.
//!
//! This library provides [`Console`], a thin façade over a text widget (a
//! [`DisplaySurface`]) that adds colored output, a periodic update callback,
//! blocking line input and simple matrix printing. The widget itself, with
//! its window, layout and painting, stays with the host toolkit. The console
//! only needs to append text, read the buffer back and observe key presses.
//!
//! ## Features
//!
//! - **Styled Output**: Plain, named-color, indexed and true-color appends
//! - **Blocking Line Input**: `read_line` with optional timeout and cancellation
//! - **Update Schedule**: Fixed-delay callback on a dedicated background thread
//! - **One-shot Timers**: Delayed callbacks that can be cancelled
//! - **Headless Surface**: [`BufferSurface`], a rope-backed surface for tests and tools
//! - **Matrix Printing**: Integer, character and string grids
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use console_pane::{BufferSurface, Console, ConsoleConfig, NamedColor};
//!
//! let config = ConsoleConfig::with_title("Greeter").font_size(14);
//! let mut console = Console::new(config);
//!
//! let surface = Arc::new(BufferSurface::new());
//! console.run(Arc::clone(&surface));
//!
//! console.println_colored("What is your name?", NamedColor::Cyan).unwrap();
//!
//! // Normally the user types; here the surface is driven directly
//! let typist = Arc::clone(&surface);
//! std::thread::spawn(move || {
//!     while typist.listener_count() == 0 {
//!         std::thread::sleep(Duration::from_millis(5));
//!     }
//!     typist.type_line("Ada");
//! });
//!
//! let name = console.read_line().unwrap();
//! console.println(&format!("Hello, {name}!")).unwrap();
//! assert_eq!(name, "Ada");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Host Application                         │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Console                                                        │
//! │  ├─ print / println / print_colored / print_matrix              │
//! │  ├─ read_line (lazy commit listener)                            │
//! │  └─ set_schedule / start / stop / set_timer                     │
//! └─────────────────────────────────────────────────────────────────┘
//!         │                    │                      │
//!         ▼                    ▼                      ▼
//! ┌───────────────┐   ┌──────────────────┐   ┌────────────────────────┐
//! │ DisplaySurface│   │ LineQueue        │   │ UpdateScheduler        │
//! │ ├─ text sink  │   │ ├─ Mutex+Condvar │   │ ├─ worker thread       │
//! │ └─ key source │──►│ └─ FIFO of lines │   │ └─ flume stop channel  │
//! └───────────────┘   └──────────────────┘   └────────────────────────┘
//! ```
//!
//! ### Execution Contexts
//!
//! 1. **Event dispatch**: the surface delivers key presses serially. On a
//!    plain Enter the console's listener queues the buffer's last line.
//!
//! 2. **Update worker**: one thread per running schedule. The callback never
//!    overlaps itself and the next run starts `period` after the previous
//!    one returned.
//!
//! 3. **Readers**: any number of threads blocked in `read_line`. Each line
//!    reaches exactly one of them, in commit order.
//!
//! ## Logging
//!
//! The library logs through the [`log`](https://docs.rs/log) facade and never
//! installs a logger. Callback failures are logged at `error` level and can
//! also be observed with [`Console::on_callback_error`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`console`] | The console façade ([`Console`]) |
//! | [`surface`] | Surface trait and headless surface ([`DisplaySurface`], [`BufferSurface`]) |
//! | [`line_queue`] | Blocking line queue ([`LineQueue`]) |
//! | [`scheduler`] | Update schedule and timers ([`UpdateScheduler`], [`TimerHandle`]) |
//! | [`input`] | Key events ([`KeyEvent`]) |
//! | [`event`] | Key listener registry ([`KeyListeners`]) |
//! | [`config`] | Window and font settings ([`ConsoleConfig`]) |
//! | [`colors`] | Color palette ([`ColorPalette`]) |
//! | [`matrix`] | Matrix printing ([`Matrix`]) |
//! | [`error`] | Error type ([`ConsoleError`]) |

pub mod colors;
pub mod config;
pub mod console;
pub mod error;
pub mod event;
pub mod input;
pub mod line_queue;
pub mod matrix;
pub mod scheduler;
pub mod surface;

// Re-export main types for convenience
pub use colors::{Color, ColorPalette, ColorPaletteBuilder, NamedColor, Rgb, TextStyle};
pub use config::{ConsoleConfig, FontSpec, FontStyle};
pub use console::Console;
pub use error::{ConsoleError, Result};
pub use event::{KeyListener, KeyListeners, ListenerId};
pub use input::{Key, KeyEvent, Modifiers};
pub use line_queue::LineQueue;
pub use matrix::Matrix;
pub use scheduler::{ErrorCallback, ScheduleHandle, TimerHandle, UpdateCallback, UpdateScheduler};
pub use surface::{BufferSurface, DisplaySurface, StyledSpan};
