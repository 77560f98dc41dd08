//! Periodic and delayed callbacks on dedicated background threads.
//!
//! [`UpdateScheduler`] runs one callback with fixed-delay semantics: the
//! callback runs, the worker waits `period`, and only then runs it again. A
//! slow callback therefore stretches the cadence instead of piling up
//! invocations.
//!
//! # Lifecycle
//!
//! ```text
//! configure ──► start ──► [initial delay] ──► callback ──► [period] ──► callback ──► …
//!                 │                                                           │
//!                 └─ AlreadyRunning if a schedule is active      stop ────────┘
//! ```
//!
//! The stop signal travels over a [flume](https://docs.rs/flume) channel that
//! the worker also uses as its sleep, so `stop` interrupts a pending delay
//! immediately. `stop` then joins the worker: an invocation in flight is
//! allowed to finish, and none begins after `stop` returns. Calling `stop`
//! from inside the callback only signals, since the worker cannot join itself.
//!
//! # Failures
//!
//! A callback that returns an error or panics ends only that invocation. The
//! failure is logged at `error` level, passed to the error callback if one is
//! set, and the schedule carries on.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//! use console_pane::UpdateScheduler;
//!
//! let ticks = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&ticks);
//!
//! let mut scheduler = UpdateScheduler::new();
//! scheduler.configure(
//!     move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     },
//!     Duration::ZERO,
//!     Duration::from_millis(10),
//! );
//! scheduler.start().unwrap();
//! std::thread::sleep(Duration::from_millis(50));
//! scheduler.stop().unwrap();
//!
//! assert!(ticks.load(Ordering::SeqCst) >= 1);
//! ```

use crate::error::{ConsoleError, Result};
use flume::{Receiver, RecvTimeoutError, Sender};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Callback run by the scheduler.
pub type UpdateCallback = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Side channel receiving callback failures.
pub type ErrorCallback = Arc<dyn Fn(&ConsoleError) + Send + Sync>;

/// Delay between invocations when none is configured.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(500);

/// Runs an update callback at a fixed delay until stopped.
pub struct UpdateScheduler {
    callback: Option<UpdateCallback>,
    initial_delay: Duration,
    period: Duration,
    error_callback: Option<ErrorCallback>,
    handle: Option<ScheduleHandle>,
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self {
            callback: None,
            initial_delay: Duration::ZERO,
            period: DEFAULT_PERIOD,
            error_callback: None,
            handle: None,
        }
    }
}

impl UpdateScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the callback and timing used by the next [`start`](Self::start).
    pub fn configure(
        &mut self,
        callback: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
        initial_delay: Duration,
        period: Duration,
    ) {
        self.set_callback(callback);
        self.initial_delay = initial_delay;
        self.period = period;
    }

    pub fn set_callback(
        &mut self,
        callback: impl Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    ) {
        self.callback = Some(Arc::new(callback));
    }

    /// Sets the delay between invocations. Applies from the next `start`.
    pub fn set_delay(&mut self, period: Duration) {
        self.period = period;
    }

    /// Sets the delay before the first invocation. Applies from the next `start`.
    pub fn set_initial_delay(&mut self, initial_delay: Duration) {
        self.initial_delay = initial_delay;
    }

    pub fn delay(&self) -> Duration {
        self.period
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Receives every callback failure in addition to the log.
    pub fn with_error_callback(
        mut self,
        callback: impl Fn(&ConsoleError) + Send + Sync + 'static,
    ) -> Self {
        self.set_error_callback(callback);
        self
    }

    pub fn set_error_callback(
        &mut self,
        callback: impl Fn(&ConsoleError) + Send + Sync + 'static,
    ) {
        self.error_callback = Some(Arc::new(callback));
    }

    pub(crate) fn error_callback(&self) -> Option<ErrorCallback> {
        self.error_callback.clone()
    }

    /// Spawns the worker thread.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(ConsoleError::AlreadyRunning);
        }
        let callback = self.callback.clone().ok_or(ConsoleError::NotConfigured)?;

        let handle = ScheduleHandle::spawn(
            callback,
            self.initial_delay,
            self.period,
            self.error_callback.clone(),
        )?;
        log::debug!(
            "update schedule started (initial delay {:?}, period {:?})",
            self.initial_delay,
            self.period
        );
        self.handle = Some(handle);
        Ok(())
    }

    /// Stops the schedule, waiting for an in-flight invocation to return.
    pub fn stop(&mut self) -> Result<()> {
        self.take_handle()?.stop();
        Ok(())
    }

    /// Detaches the active handle so it can be stopped outside a lock.
    pub(crate) fn take_handle(&mut self) -> Result<ScheduleHandle> {
        self.handle.take().ok_or(ConsoleError::NotRunning)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(ScheduleHandle::is_running)
    }

    /// Completed invocations of the current schedule, or 0 when stopped.
    pub fn invocations(&self) -> u64 {
        self.handle.as_ref().map_or(0, ScheduleHandle::invocations)
    }
}

impl std::fmt::Debug for UpdateScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateScheduler")
            .field("initial_delay", &self.initial_delay)
            .field("period", &self.period)
            .field("configured", &self.callback.is_some())
            .field("running", &self.is_running())
            .finish()
    }
}

/// One active periodic task.
///
/// Dropping the handle stops the task.
pub struct ScheduleHandle {
    stop_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    invocations: Arc<AtomicU64>,
}

impl ScheduleHandle {
    fn spawn(
        callback: UpdateCallback,
        initial_delay: Duration,
        period: Duration,
        on_error: Option<ErrorCallback>,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = flume::bounded::<()>(1);
        let running = Arc::new(AtomicBool::new(true));
        let invocations = Arc::new(AtomicU64::new(0));

        let worker_running = Arc::clone(&running);
        let worker_invocations = Arc::clone(&invocations);
        let worker = thread::Builder::new()
            .name("console-update".into())
            .spawn(move || {
                if sleep_unless_stopped(&stop_rx, initial_delay) {
                    loop {
                        invoke(&callback, on_error.as_ref());
                        worker_invocations.fetch_add(1, Ordering::SeqCst);
                        if !sleep_unless_stopped(&stop_rx, period) {
                            break;
                        }
                    }
                }
                worker_running.store(false, Ordering::SeqCst);
            })?;

        Ok(Self {
            stop_tx,
            worker: Some(worker),
            running,
            invocations,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Cancels the task and waits for the worker to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.try_send(());
        let Some(worker) = self.worker.take() else {
            return;
        };
        if worker.thread().id() == thread::current().id() {
            // Stopped from inside the callback; the worker exits after it returns
            return;
        }
        if worker.join().is_err() {
            log::error!("update worker exited abnormally");
        }
        log::debug!("update schedule stopped");
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// A one-shot delayed callback.
///
/// Dropping the handle leaves the timer armed; use [`cancel`](Self::cancel)
/// to disarm it.
pub struct TimerHandle {
    cancel_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
    fired: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Whether the callback has started.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Disarms the timer. Returns `true` if the callback never started.
    pub fn cancel(mut self) -> bool {
        let _ = self.cancel_tx.try_send(());
        if let Some(worker) = self.worker.take() {
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
        }
        !self.has_fired()
    }
}

/// Runs `callback` once after `delay` on its own thread.
///
/// A delay too large to turn into a deadline never fires; the timer then
/// waits until it is cancelled.
pub fn run_after(
    callback: impl FnOnce() -> anyhow::Result<()> + Send + 'static,
    delay: Duration,
    on_error: Option<ErrorCallback>,
) -> Result<TimerHandle> {
    let (cancel_tx, cancel_rx) = flume::bounded::<()>(1);
    let fired = Arc::new(AtomicBool::new(false));
    let worker_fired = Arc::clone(&fired);
    let deadline = Instant::now().checked_add(delay);

    let worker = thread::Builder::new()
        .name("console-timer".into())
        .spawn(move || {
            let Some(deadline) = deadline else {
                // Unrepresentable deadline: the timer can only be cancelled
                let _ = cancel_rx.recv();
                return;
            };
            match cancel_rx.recv_deadline(deadline) {
                Ok(()) => return,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // Handle dropped without cancelling
                    thread::sleep(deadline.saturating_duration_since(Instant::now()));
                }
            }
            worker_fired.store(true, Ordering::SeqCst);
            let result = catch_unwind(AssertUnwindSafe(callback));
            report(result, on_error.as_ref());
        })?;

    Ok(TimerHandle {
        cancel_tx,
        worker: Some(worker),
        fired,
    })
}

/// Sleeps for `duration`. Returns `false` if a stop arrived first.
fn sleep_unless_stopped(stop_rx: &Receiver<()>, duration: Duration) -> bool {
    matches!(stop_rx.recv_timeout(duration), Err(RecvTimeoutError::Timeout))
}

fn invoke(callback: &UpdateCallback, on_error: Option<&ErrorCallback>) {
    let result = catch_unwind(AssertUnwindSafe(|| callback()));
    report(result, on_error);
}

fn report(result: std::thread::Result<anyhow::Result<()>>, on_error: Option<&ErrorCallback>) {
    let error = match result {
        Ok(Ok(())) => return,
        Ok(Err(error)) => error,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            anyhow::anyhow!("callback panicked: {message}")
        }
    };

    let error = ConsoleError::CallbackFailure(error);
    log::error!("{error}");
    if let Some(on_error) = on_error {
        on_error(&error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn counting_scheduler(period: Duration, work: Duration) -> (UpdateScheduler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let mut scheduler = UpdateScheduler::new();
        scheduler.configure(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(work);
                Ok(())
            },
            Duration::ZERO,
            period,
        );
        (scheduler, count)
    }

    #[test]
    fn test_defaults() {
        let scheduler = UpdateScheduler::new();
        assert_eq!(scheduler.delay(), Duration::from_millis(500));
        assert_eq!(scheduler.initial_delay(), Duration::ZERO);
        assert!(!scheduler.has_callback());
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_start_without_callback() {
        let mut scheduler = UpdateScheduler::new();
        assert!(matches!(scheduler.start(), Err(ConsoleError::NotConfigured)));
    }

    #[test]
    fn test_stop_without_start() {
        let mut scheduler = UpdateScheduler::new();
        assert!(matches!(scheduler.stop(), Err(ConsoleError::NotRunning)));
    }

    #[test]
    fn test_double_start_fails() {
        let (mut scheduler, _count) = counting_scheduler(Duration::from_millis(10), Duration::ZERO);
        scheduler.start().unwrap();
        assert!(matches!(scheduler.start(), Err(ConsoleError::AlreadyRunning)));
        scheduler.stop().unwrap();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_restart_after_stop() {
        let (mut scheduler, count) = counting_scheduler(Duration::from_millis(10), Duration::ZERO);
        scheduler.start().unwrap();
        scheduler.stop().unwrap();
        scheduler.start().unwrap();
        thread::sleep(Duration::from_millis(50));
        scheduler.stop().unwrap();
        assert!(count.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_fixed_delay_not_fixed_rate() {
        let (mut scheduler, count) =
            counting_scheduler(Duration::from_millis(100), Duration::from_millis(250));
        scheduler.start().unwrap();
        thread::sleep(Duration::from_secs(1));
        scheduler.stop().unwrap();

        // Each cycle takes at least 350ms: starts land near 0, 350 and 700ms
        let runs = count.load(Ordering::SeqCst);
        assert!((3..=4).contains(&runs), "unexpected invocation count {runs}");
    }

    #[test]
    fn test_gap_between_invocations() {
        let starts = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&starts);
        let mut scheduler = UpdateScheduler::new();
        scheduler.configure(
            move || {
                recorded.lock().push(Instant::now());
                thread::sleep(Duration::from_millis(250));
                Ok(())
            },
            Duration::ZERO,
            Duration::from_millis(100),
        );
        scheduler.start().unwrap();
        thread::sleep(Duration::from_millis(800));
        scheduler.stop().unwrap();

        let starts = starts.lock();
        assert!(starts.len() >= 2);
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(350));
        }
    }

    #[test]
    fn test_initial_delay() {
        let (mut scheduler, count) = counting_scheduler(Duration::from_millis(10), Duration::ZERO);
        scheduler.set_initial_delay(Duration::from_millis(300));
        scheduler.start().unwrap();
        thread::sleep(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        scheduler.stop().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_lets_in_flight_callback_finish() {
        let finished = Arc::new(AtomicUsize::new(0));
        let started = Arc::new(AtomicUsize::new(0));
        let (s, f) = (Arc::clone(&started), Arc::clone(&finished));
        let mut scheduler = UpdateScheduler::new();
        scheduler.configure(
            move || {
                s.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(200));
                f.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            Duration::ZERO,
            Duration::ZERO,
        );
        scheduler.start().unwrap();
        thread::sleep(Duration::from_millis(50));
        scheduler.stop().unwrap();

        let started_at_stop = started.load(Ordering::SeqCst);
        assert_eq!(finished.load(Ordering::SeqCst), started_at_stop);

        thread::sleep(Duration::from_millis(300));
        assert_eq!(started.load(Ordering::SeqCst), started_at_stop);
    }

    #[test]
    fn test_errors_and_panics_do_not_stop_schedule() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reported = Arc::new(Mutex::new(Vec::new()));
        let counter = Arc::clone(&calls);
        let sink = Arc::clone(&reported);

        let mut scheduler = UpdateScheduler::new().with_error_callback(move |error| {
            sink.lock().push(error.to_string());
        });
        scheduler.configure(
            move || match counter.fetch_add(1, Ordering::SeqCst) {
                0 => anyhow::bail!("first call fails"),
                1 => panic!("second call panics"),
                _ => Ok(()),
            },
            Duration::ZERO,
            Duration::from_millis(10),
        );
        scheduler.start().unwrap();
        thread::sleep(Duration::from_millis(200));
        assert!(scheduler.is_running());
        scheduler.stop().unwrap();

        assert!(calls.load(Ordering::SeqCst) >= 3);
        let reported = reported.lock();
        assert_eq!(reported.len(), 2);
        assert!(reported[0].contains("first call fails"));
        assert!(reported[1].contains("second call panics"));
    }

    #[test]
    fn test_stop_from_inside_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let slot: Arc<Mutex<Option<ScheduleHandle>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);

        let handle = ScheduleHandle::spawn(
            Arc::new(move || -> anyhow::Result<()> {
                if counter.fetch_add(1, Ordering::SeqCst) == 2 {
                    if let Some(handle) = inner.lock().take() {
                        handle.stop();
                    }
                }
                Ok(())
            }),
            Duration::from_millis(20),
            Duration::from_millis(5),
            None,
        )
        .unwrap();
        *slot.lock() = Some(handle);

        thread::sleep(Duration::from_millis(200));
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_run_after_fires_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let timer = run_after(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            Duration::from_millis(30),
            None,
        )
        .unwrap();

        thread::sleep(Duration::from_millis(150));
        assert!(timer.has_fired());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.cancel());
    }

    #[test]
    fn test_run_after_cancel() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let timer = run_after(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            Duration::from_millis(200),
            None,
        )
        .unwrap();

        assert!(timer.cancel());
        thread::sleep(Duration::from_millis(300));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_run_after_survives_dropped_handle() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        drop(
            run_after(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
                Duration::from_millis(20),
                None,
            )
            .unwrap(),
        );

        thread::sleep(Duration::from_millis(150));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_after_unbounded_delay_waits_for_cancel() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let timer = run_after(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            Duration::MAX,
            None,
        )
        .unwrap();

        thread::sleep(Duration::from_millis(50));
        assert!(!timer.has_fired());
        assert!(timer.cancel());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
