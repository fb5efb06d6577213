//! Process-wide log dispatcher
//!
//! Producers hand entries to [`Dispatcher::post`], which appends them to the
//! active dispatcher's queue under a short lock. One worker thread swaps the
//! whole queue out, runs each entry through the level resolver, and hands
//! admitted entries to every sink in registration order.
//!
//! At most one dispatcher is active per process. The registration slot only
//! holds a weak reference: whoever built the dispatcher owns it, and when the
//! last owner lets go the dispatcher shuts itself down.

use super::{
    error::{LogxxError, Result},
    log_entry::LogEntry,
    log_level::LevelFilter,
    metrics::DispatcherMetrics,
    resolver::LevelResolver,
    sink::Sink,
};
use crate::config::{rules::RuleNode, Configuration};
use parking_lot::{const_mutex, Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};

pub const WORKER_THREAD_NAME: &str = "logxx-dispatch";

/// Registration of the active dispatcher. Producers only ever upgrade the
/// `shared` half, so they never own the `Dispatcher` and never end up
/// running its shutdown.
struct Registration {
    dispatcher: Weak<Dispatcher>,
    shared: Weak<Shared>,
}

impl Registration {
    const EMPTY: Registration = Registration {
        dispatcher: Weak::new(),
        shared: Weak::new(),
    };
}

/// The active dispatcher, if any.
static ACTIVE: Mutex<Registration> = const_mutex(Registration::EMPTY);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unstarted,
    Running,
    ShuttingDown,
    Stopped,
}

impl Lifecycle {
    fn accepts_entries(self) -> bool {
        matches!(self, Lifecycle::Running | Lifecycle::ShuttingDown)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Lifecycle::Unstarted => "unstarted",
            Lifecycle::Running => "running",
            Lifecycle::ShuttingDown => "shutting down",
            Lifecycle::Stopped => "stopped",
        })
    }
}

struct State {
    pending: VecDeque<LogEntry>,
    lifecycle: Lifecycle,
    worker: Option<thread::JoinHandle<()>>,
    worker_id: Option<ThreadId>,
    /// Thread that owns the final drain once shutdown has begun.
    finisher: Option<ThreadId>,
    /// Set when shutdown ran on the worker thread itself, which then drains
    /// the queue on its way out instead of being joined.
    drain_on_exit: bool,
}

/// Everything the worker thread needs; the worker keeps it alive on its own
/// so that it never holds a strong reference to the `Dispatcher`.
struct Shared {
    state: Mutex<State>,
    wake: Condvar,
    /// Signalled once the lifecycle reaches `Stopped`.
    stopped: Condvar,
    sinks: Mutex<Vec<Box<dyn Sink>>>,
    resolver: LevelResolver,
    metrics: DispatcherMetrics,
}

pub struct Dispatcher {
    shared: Arc<Shared>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(resolver: LevelResolver) -> Arc<Self> {
        Arc::new(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    pending: VecDeque::new(),
                    lifecycle: Lifecycle::Unstarted,
                    worker: None,
                    worker_id: None,
                    finisher: None,
                    drain_on_exit: false,
                }),
                wake: Condvar::new(),
                stopped: Condvar::new(),
                sinks: Mutex::new(Vec::new()),
                resolver,
                metrics: DispatcherMetrics::new(),
            }),
        })
    }

    /// Create a builder for Dispatcher
    ///
    /// # Example
    /// ```
    /// use logxx::prelude::*;
    ///
    /// let dispatcher = Dispatcher::builder()
    ///     .default_level(LevelFilter::Debug)
    ///     .sink(MemorySink::new())
    ///     .build();
    /// assert_eq!(dispatcher.lifecycle(), Lifecycle::Unstarted);
    /// ```
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Spawn the worker thread and become the process's active dispatcher.
    ///
    /// Fails with [`LogxxError::AlreadyRunning`] while any dispatcher,
    /// including this one, is active. A dispatcher runs at most once.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        let mut slot = ACTIVE.lock();
        if slot.dispatcher.strong_count() > 0 {
            return Err(LogxxError::AlreadyRunning);
        }

        {
            let mut state = self.shared.state.lock();
            if state.lifecycle != Lifecycle::Unstarted {
                return Err(LogxxError::invalid_lifecycle("start", state.lifecycle));
            }

            let shared = Arc::clone(&self.shared);
            let handle = thread::Builder::new()
                .name(WORKER_THREAD_NAME.to_string())
                .spawn(move || shared.run())
                .map_err(LogxxError::WorkerSpawn)?;

            state.lifecycle = Lifecycle::Running;
            state.worker_id = Some(handle.thread().id());
            state.worker = Some(handle);
        }

        *slot = Registration {
            dispatcher: Arc::downgrade(self),
            shared: Arc::downgrade(&self.shared),
        };
        Ok(())
    }

    /// Queue an entry with the active dispatcher.
    ///
    /// Never blocks beyond a short critical section. When no dispatcher is
    /// active the entry is dropped.
    pub fn post(entry: LogEntry) {
        let active = ACTIVE.lock().shared.upgrade();
        match active {
            Some(shared) => shared.push(entry),
            None => {
                DispatcherMetrics::record_dropped_inactive();
            }
        }
    }

    /// The active dispatcher, if one is running.
    ///
    /// The returned handle is an owner: if it outlives every other owner,
    /// dropping it shuts the dispatcher down on the dropping thread.
    pub fn active() -> Option<Arc<Dispatcher>> {
        ACTIVE.lock().dispatcher.upgrade()
    }

    /// Whether any dispatcher is currently active.
    pub fn is_active() -> bool {
        ACTIVE.lock().dispatcher.strong_count() > 0
    }

    /// Register a sink. Sinks receive entries in registration order.
    pub fn add_sink(&self, sink: Box<dyn Sink>) {
        self.shared.sinks.lock().push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.shared.sinks.lock().len()
    }

    /// Stop the worker and deliver everything still queued.
    ///
    /// Clears the active registration, wakes and joins the worker, then
    /// drains the remaining queue on the calling thread. Returns once every
    /// queued entry has been dispatched and the sinks flushed; a caller that
    /// arrives while another shutdown is in progress waits for it. Calling
    /// it on a dispatcher that was never started does nothing.
    pub fn shutdown(&self) -> Result<()> {
        {
            let mut slot = ACTIVE.lock();
            if std::ptr::eq(slot.dispatcher.as_ptr(), self) {
                *slot = Registration::EMPTY;
            }
        }

        let worker = {
            let mut state = self.shared.state.lock();
            match state.lifecycle {
                Lifecycle::Unstarted | Lifecycle::Stopped => return Ok(()),
                Lifecycle::ShuttingDown => {
                    let current = Some(thread::current().id());
                    // The worker and the finishing thread must not wait on themselves
                    if current != state.finisher && current != state.worker_id {
                        while state.lifecycle != Lifecycle::Stopped {
                            self.shared.stopped.wait(&mut state);
                        }
                    }
                    return Ok(());
                }
                Lifecycle::Running => {}
            }
            state.lifecycle = Lifecycle::ShuttingDown;
            state.finisher = Some(thread::current().id());
            state.worker.take()
        };
        self.shared.wake.notify_all();

        let Some(handle) = worker else {
            self.shared.drain();
            return Ok(());
        };

        if handle.thread().id() == thread::current().id() {
            // A sink dropped the last owner; the worker finishes the job itself
            self.shared.state.lock().drain_on_exit = true;
            return Ok(());
        }

        let outcome = handle.join().map_err(|payload| {
            let msg = panic_message(&*payload);
            eprintln!("[LOGXX ERROR] Dispatch worker panicked before shutdown: {}", msg);
            LogxxError::WorkerPanicked(msg)
        });

        self.shared.drain();
        outcome
    }

    /// Flush every registered sink, stopping at the first error.
    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.shared.sinks.lock();
        for sink in sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.state.lock().lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle() == Lifecycle::Running
    }

    /// Number of entries waiting for the worker.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    pub fn resolver(&self) -> &LevelResolver {
        &self.shared.resolver
    }

    /// Get the dispatcher metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use logxx::Dispatcher;
    ///
    /// let dispatcher = Dispatcher::builder().build();
    /// let metrics = dispatcher.metrics();
    /// println!("Delivered: {}", metrics.delivered());
    /// println!("Filtered: {:.2}%", metrics.filter_rate());
    /// ```
    pub fn metrics(&self) -> &DispatcherMetrics {
        &self.shared.metrics
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("lifecycle", &self.lifecycle())
            .field("pending", &self.pending())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            eprintln!("[LOGXX ERROR] Shutdown on drop failed: {}", e);
        }
    }
}

impl Shared {
    fn push(&self, entry: LogEntry) {
        let mut state = self.state.lock();
        if !state.lifecycle.accepts_entries() {
            drop(state);
            DispatcherMetrics::record_dropped_inactive();
            return;
        }
        state.pending.push_back(entry);
        drop(state);

        self.metrics.record_posted();
        self.wake.notify_one();
    }

    /// Worker loop. Exits as soon as it observes the dispatcher is no longer
    /// running, leaving any remainder to the thread calling `shutdown`.
    fn run(&self) {
        loop {
            let batch = {
                let mut state = self.state.lock();
                while state.pending.is_empty() && state.lifecycle == Lifecycle::Running {
                    self.wake.wait(&mut state);
                }
                if state.lifecycle != Lifecycle::Running {
                    break;
                }
                std::mem::take(&mut state.pending)
            };
            self.dispatch(batch);
        }

        if self.state.lock().drain_on_exit {
            self.drain();
        }
    }

    /// Dispatch until the queue is empty, then mark the dispatcher stopped
    /// and release anyone waiting in `shutdown`.
    fn drain(&self) {
        loop {
            let batch = {
                let mut state = self.state.lock();
                if state.pending.is_empty() {
                    state.lifecycle = Lifecycle::Stopped;
                    break;
                }
                std::mem::take(&mut state.pending)
            };
            self.dispatch(batch);
        }
        self.stopped.notify_all();
    }

    /// Process a batch of log entries in FIFO order
    ///
    /// **Per-Sink Panic Isolation**: each sink call is wrapped in
    /// catch_unwind, so one failing sink cannot keep the others from
    /// receiving entries or stall the queue.
    fn dispatch(&self, batch: VecDeque<LogEntry>) {
        let mut sinks = self.sinks.lock();

        for entry in batch {
            if !self.resolver.should_emit(&entry) {
                self.metrics.record_filtered();
                continue;
            }

            let mut has_error = false;
            for sink in sinks.iter_mut() {
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    sink.write(&entry)
                }));

                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        eprintln!("[LOGXX ERROR] Sink '{}' failed: {}", sink.name(), e);
                        self.metrics.record_sink_failure();
                        has_error = true;
                    }
                    Err(payload) => {
                        eprintln!(
                            "[LOGXX CRITICAL] Sink '{}' panicked: {}. \
                             Other sinks continue to function.",
                            sink.name(),
                            panic_message(&*payload)
                        );
                        self.metrics.record_sink_failure();
                        has_error = true;
                    }
                }
            }

            if !has_error {
                self.metrics.record_delivered();
            }
        }

        // Flush after each batch to ensure timely writes
        for sink in sinks.iter_mut() {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.flush()));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGXX ERROR] Sink '{}' flush failed: {}", sink.name(), e);
                }
                Err(payload) => {
                    eprintln!(
                        "[LOGXX CRITICAL] Sink '{}' panicked during flush: {}",
                        sink.name(),
                        panic_message(&*payload)
                    );
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing a Dispatcher with a fluent API
///
/// # Example
/// ```
/// use logxx::prelude::*;
///
/// let config = Configuration::from_json_str(
///     r#"{"level": "WARNING", "module": {"name": "net", "level": "DEBUG"}}"#,
/// )?;
///
/// let dispatcher = Dispatcher::builder()
///     .default_level(LevelFilter::Info)
///     .configuration(config)?
///     .build();
/// # Ok::<(), logxx::LogxxError>(())
/// ```
pub struct DispatcherBuilder {
    default_level: LevelFilter,
    rules: RuleNode,
    sinks: Vec<Box<dyn Sink>>,
}

impl DispatcherBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            default_level: LevelFilter::default(),
            rules: RuleNode::new(),
            sinks: Vec::new(),
        }
    }

    /// Threshold for call sites no rule sets a level for
    #[must_use = "builder methods return a new value"]
    pub fn default_level(mut self, level: LevelFilter) -> Self {
        self.default_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rules(mut self, rules: RuleNode) -> Self {
        self.rules = rules;
        self
    }

    /// Take rules from `config` and open the sinks its backends describe.
    pub fn configuration(mut self, config: Configuration) -> Result<Self> {
        self.sinks.extend(config.build_sinks()?);
        self.rules = config.into_rules();
        Ok(self)
    }

    /// Add a sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Build the Dispatcher; it still has to be started.
    pub fn build(self) -> Arc<Dispatcher> {
        let dispatcher = Dispatcher::new(LevelResolver::new(self.rules, self.default_level));
        for sink in self.sinks {
            dispatcher.add_sink(sink);
        }
        dispatcher
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes tests that start the process-wide dispatcher.
#[cfg(test)]
pub(crate) static TEST_LOCK: Mutex<()> = const_mutex(());
