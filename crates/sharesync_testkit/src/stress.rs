//! Stress helpers for ShareSync.
//!
//! These run ticks concurrently with host-side edits, joins and leaves, then
//! check that the engine still converges once the churn stops.

use crate::fixtures::scenarios;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Ticks run while edits were in flight.
    pub ticks: usize,
    /// Edits applied by the worker threads.
    pub edits: usize,
    /// Whether every participant matched the baseline at the end.
    pub converged: bool,
    /// Total duration.
    pub duration: Duration,
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of participants.
    pub participants: usize,
    /// Number of concurrent editing threads.
    pub threads: usize,
    /// Edits per thread.
    pub edits_per_thread: usize,
    /// Whether workers also make participants leave and rejoin.
    pub churn: bool,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            participants: 8,
            threads: 4,
            edits_per_thread: 500,
            churn: false,
        }
    }
}

/// Ticks the engine on one thread while workers edit participants.
///
/// After the workers finish, two quiet ticks are run: the first adopts any
/// remaining divergence and broadcasts it, the second must find nothing.
pub fn stress_concurrent_edits(config: &StressConfig) -> StressTestResult {
    let session = Arc::new(scenarios::converged_session(config.participants));
    let names = Arc::new(scenarios::participant_names(config.participants));
    let done = Arc::new(AtomicBool::new(false));
    let edits = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();

    let ticker = {
        let session = Arc::clone(&session);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut ticks = 0usize;
            while !done.load(Ordering::SeqCst) {
                session.engine.tick();
                ticks += 1;
                thread::yield_now();
            }
            ticks
        })
    };

    let workers: Vec<_> = (0..config.threads)
        .map(|t| {
            let session = Arc::clone(&session);
            let names = Arc::clone(&names);
            let edits = Arc::clone(&edits);
            let config = config.clone();
            thread::spawn(move || {
                for i in 0..config.edits_per_thread {
                    let name = &names[(t + i) % names.len()];
                    if config.churn && i % 50 == 49 {
                        session.provider.leave(name);
                        session.join(name);
                        continue;
                    }
                    let value = ((t * 31 + i) % 20) as i32;
                    if session
                        .provider
                        .update(name, |record| record.vitals.food = value)
                    {
                        edits.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("Worker thread panicked");
    }
    done.store(true, Ordering::SeqCst);
    let ticks = ticker.join().expect("Ticker thread panicked");

    session.engine.tick();
    let quiet = session.engine.tick();
    let converged = quiet.diverged.is_none() && session.converged();

    StressTestResult {
        ticks,
        edits: edits.load(Ordering::SeqCst),
        converged,
        duration: start.elapsed(),
    }
}
