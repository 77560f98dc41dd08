//! Headless console demo.
//!
//! Drives a [`BufferSurface`] from stdin: every input line is typed into the
//! surface key by key and committed with Enter, the console reads it back
//! with `read_line`, and an update schedule stamps a tick counter in the
//! background. On EOF (or `quit`) the final buffer is printed to stdout.
//!
//! The typist thread stands in for a toolkit's event-dispatch thread and is
//! the only thread that writes to the surface while the session runs. The
//! reader hands each echo back to it over a channel.
//!
//! Run with `RUST_LOG=debug` to see the console's lifecycle logging.

use anyhow::{Context, Result};
use console_pane::{
    BufferSurface, Console, ConsoleConfig, ConsoleError, DisplaySurface, NamedColor,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let config = ConsoleConfig::with_title("console-pane demo")
        .font_family("monospace")
        .font_size(14);
    let mut console = Console::new(config);
    let surface = Arc::new(BufferSurface::new());
    console.run(Arc::clone(&surface));

    console.on_callback_error(|error| eprintln!("update failed: {error}"));

    // Background ticks go to the log, not the surface, so they never land on
    // the line being typed
    let ticks = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&ticks);
    console.configure_schedule(
        move || {
            let tick = counter.fetch_add(1, Ordering::SeqCst) + 1;
            log::info!("tick {tick}");
            Ok(())
        },
        Duration::ZERO,
        Duration::from_millis(250),
    );
    console.start()?;

    let table: Vec<Vec<u32>> = (1..=3).map(|r| (1..=3).map(|c| r * c).collect()).collect();
    console.set_matrix(table);

    console.println_colored("Type lines; `quit` or EOF to finish.", NamedColor::Cyan)?;
    let console = Arc::new(console);

    let echoed = echo_session(&console, &surface, || std::io::stdin().lines())?;

    console.stop()?;
    console.println_colored("3x3:", NamedColor::Yellow)?;
    console.print_matrix()?;

    println!("{}", surface.text());
    println!("({echoed} lines, {} ticks)", ticks.load(Ordering::SeqCst));
    Ok(())
}

/// Types every input line into the surface and echoes it back in upper case.
///
/// Returns once the input ends or a `quit` line is read, with the number of
/// lines echoed.
fn echo_session<F, I>(
    console: &Arc<Console<BufferSurface>>,
    surface: &Arc<BufferSurface>,
    input: F,
) -> Result<usize>
where
    F: FnOnce() -> I + Send + 'static,
    I: Iterator<Item = std::io::Result<String>>,
{
    // Register the commit listener before any key can arrive
    console.try_read_line()?;

    let (echo_tx, echo_rx) = flume::unbounded::<String>();
    let typist_console = Arc::clone(console);
    let typist_surface = Arc::clone(surface);
    let typist = thread::Builder::new()
        .name("typist".into())
        .spawn(move || {
            let result = type_lines(&typist_console, &typist_surface, input(), &echo_rx);
            typist_console.cancel_reads();
            result
        })?;

    let mut echoed = 0;
    let outcome = loop {
        match console.read_line() {
            Ok(line) if line.trim() == "quit" => break Ok(()),
            Ok(line) => {
                if echo_tx.send(line.to_uppercase()).is_err() {
                    break Ok(());
                }
                echoed += 1;
            }
            Err(ConsoleError::Cancelled) => break Ok(()),
            Err(error) => break Err(error),
        }
    };

    // Disconnecting tells a typist waiting on an echo to finish
    drop(echo_tx);
    typist
        .join()
        .map_err(|_| anyhow::anyhow!("typist thread panicked"))??;
    outcome?;
    Ok(echoed)
}

/// Body of the typist thread: one commit, then that line's echo.
fn type_lines(
    console: &Console<BufferSurface>,
    surface: &BufferSurface,
    input: impl Iterator<Item = std::io::Result<String>>,
    echoes: &flume::Receiver<String>,
) -> Result<()> {
    for line in input {
        let line = line.context("reading input")?;
        surface.type_line(&line);

        // The newline is in place by now, so the echo starts a fresh line
        let Ok(echo) = echoes.recv() else {
            break;
        };
        console.print_colored("> ", NamedColor::Green)?;
        console.println(&echo)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached() -> (Arc<Console<BufferSurface>>, Arc<BufferSurface>) {
        let mut console = Console::new(ConsoleConfig::default());
        let surface = Arc::new(BufferSurface::new());
        console.run(Arc::clone(&surface));
        (Arc::new(console), surface)
    }

    #[test]
    fn test_echoes_never_interleave_with_typing() {
        let (console, surface) = attached();
        let input: Vec<std::io::Result<String>> =
            (1..=300).map(|i| Ok(format!("line{i}"))).collect();

        let echoed = echo_session(&console, &surface, move || input.into_iter()).unwrap();

        assert_eq!(echoed, 300);
        let expected: String = (1..=300).map(|i| format!("line{i}\n> LINE{i}\n")).collect();
        assert_eq!(surface.text(), expected);
    }

    #[test]
    fn test_quit_ends_session() {
        let (console, surface) = attached();
        let input: Vec<std::io::Result<String>> =
            vec![Ok("a".to_string()), Ok("quit".to_string()), Ok("b".to_string())];

        let echoed = echo_session(&console, &surface, move || input.into_iter()).unwrap();

        assert_eq!(echoed, 1);
        assert_eq!(surface.text(), "a\n> A\nquit\n");
    }
}
