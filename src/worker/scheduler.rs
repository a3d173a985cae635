use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::cycle::{Cycle, UploadEvent};

/// How long `stop` waits for the worker before detaching it
const JOIN_TIMEOUT: Duration = Duration::from_secs(1);
const JOIN_POLL: Duration = Duration::from_millis(10);

struct Worker {
    running: Arc<AtomicBool>,
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn is_alive(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.handle.is_finished()
    }
}

/// Runs a [`Cycle`] on a background thread at a fixed interval.
///
/// The cycle runs once as soon as the worker starts, then again after each
/// interval until stopped. Stopping never interrupts a cycle in progress.
pub struct Scheduler {
    cycle: Arc<dyn Cycle>,
    interval: Duration,
    events: Sender<UploadEvent>,
    worker: Option<Worker>,
    spawned: usize,
}

impl Scheduler {
    pub fn new(cycle: Arc<dyn Cycle>, interval: Duration, events: Sender<UploadEvent>) -> Self {
        Self {
            cycle,
            interval,
            events,
            worker: None,
            spawned: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(Worker::is_alive)
    }

    /// Number of workers launched over the scheduler's lifetime
    #[allow(dead_code)]
    pub fn workers_spawned(&self) -> usize {
        self.spawned
    }

    /// Launch the worker unless one is already running.
    ///
    /// Returns `false` when a worker was already alive.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            debug!("Capture worker already running");
            return false;
        }

        let running = Arc::new(AtomicBool::new(true));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let cycle = Arc::clone(&self.cycle);
        let events = self.events.clone();
        let interval = self.interval;
        let flag = Arc::clone(&running);

        self.spawned += 1;
        let spawned = thread::Builder::new()
            .name(format!("capture-worker-{}", self.spawned))
            .spawn(move || {
                run_cycle(cycle.as_ref(), &events);
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    if !flag.load(Ordering::SeqCst) {
                        break;
                    }
                    run_cycle(cycle.as_ref(), &events);
                }
                debug!("Capture worker exiting");
            });

        match spawned {
            Ok(handle) => {
                info!("Capturing started (every {}s)", self.interval.as_secs());
                self.worker = Some(Worker {
                    running,
                    stop_tx,
                    handle,
                });
                true
            }
            Err(e) => {
                warn!("Failed to spawn capture worker: {}", e);
                false
            }
        }
    }

    /// Signal the worker to exit and wait briefly for it.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        worker.running.store(false, Ordering::SeqCst);
        // The worker may already have exited and dropped its receiver
        let _ = worker.stop_tx.send(());

        let deadline = Instant::now() + JOIN_TIMEOUT;
        while !worker.handle.is_finished() && Instant::now() < deadline {
            thread::sleep(JOIN_POLL);
        }

        if worker.handle.is_finished() {
            if worker.handle.join().is_err() {
                warn!("Capture worker panicked");
            }
        } else {
            warn!("Capture worker still busy; it will exit after the current cycle");
        }
        info!("Capturing paused");
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_cycle(cycle: &dyn Cycle, events: &Sender<UploadEvent>) {
    if let Some(event) = cycle.run() {
        if events.send(event).is_err() {
            debug!("Event receiver dropped; upload notification discarded");
        }
    }
}
