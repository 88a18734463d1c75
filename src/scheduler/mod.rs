//! Timers and deferred work for the single-threaded panel loop.
//!
//! Two fixed-rate timers drive the pollers. Everything else is deferred
//! through a [`JobQueue`] handle, which lets a routine ask for work without
//! owning the routine that does it (the router asks for a config load, the
//! start/stop toggle asks for a follow-up status check).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::schema::PollingSettings;

/// Unit of work the loop can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Job {
    UpdateStatus,
    FetchLogs,
    LoadConfig,
}

#[derive(Debug, Default)]
struct Pending {
    /// Run on the next cycle.
    now: VecDeque<Job>,
    /// Run once the delay has elapsed, measured from when the loop picks it up.
    delayed: Vec<(Duration, Job)>,
}

/// Cloneable handle for deferring jobs.
#[derive(Debug, Clone, Default)]
pub struct JobQueue {
    inner: Rc<RefCell<Pending>>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` on the next cycle.
    pub fn push(&self, job: Job) {
        self.inner.borrow_mut().now.push_back(job);
    }

    /// Run `job` once, after `delay`.
    pub fn push_after(&self, delay: Duration, job: Job) {
        self.inner.borrow_mut().delayed.push((delay, job));
    }

    pub fn is_empty(&self) -> bool {
        let pending = self.inner.borrow();
        pending.now.is_empty() && pending.delayed.is_empty()
    }

    fn drain(&self) -> (Vec<Job>, Vec<(Duration, Job)>) {
        let mut pending = self.inner.borrow_mut();
        (
            pending.now.drain(..).collect(),
            std::mem::take(&mut pending.delayed),
        )
    }
}

#[derive(Debug, Clone)]
struct Timer {
    job: Job,
    every: Duration,
    next: Instant,
}

/// Fixed-rate timers plus one-shot jobs.
#[derive(Debug)]
pub struct Scheduler {
    timers: Vec<Timer>,
    oneshots: Vec<(Instant, Job)>,
    ready: VecDeque<Job>,
    queue: JobQueue,
}

impl Scheduler {
    /// Start the status and log timers at `start`. Both are due immediately.
    pub fn new(start: Instant, polling: &PollingSettings, queue: JobQueue) -> Self {
        Self {
            timers: vec![
                Timer {
                    job: Job::UpdateStatus,
                    every: polling.status_interval(),
                    next: start,
                },
                Timer {
                    job: Job::FetchLogs,
                    every: polling.logs_interval(),
                    next: start,
                },
            ],
            oneshots: Vec::new(),
            ready: VecDeque::new(),
            queue,
        }
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    /// Move anything pushed through the queue into the schedule. Delays
    /// count from `now`.
    pub fn collect_pending(&mut self, now: Instant) {
        let (immediate, delayed) = self.queue.drain();
        self.ready.extend(immediate);
        self.oneshots
            .extend(delayed.into_iter().map(|(delay, job)| (now + delay, job)));
    }

    /// Jobs due at `now`: deferred jobs first, then expired one-shots, then
    /// timers. A timer that fell behind fires once and re-arms from `now`.
    pub fn due(&mut self, now: Instant) -> Vec<Job> {
        self.collect_pending(now);

        let mut jobs: Vec<Job> = self.ready.drain(..).collect();

        let mut expired: Vec<(Instant, Job)> = Vec::new();
        self.oneshots.retain(|&(at, job)| {
            if at <= now {
                expired.push((at, job));
                false
            } else {
                true
            }
        });
        expired.sort_by_key(|&(at, _)| at);
        jobs.extend(expired.into_iter().map(|(_, job)| job));

        for timer in &mut self.timers {
            if timer.next <= now {
                jobs.push(timer.job);
                timer.next += timer.every;
                if timer.next <= now {
                    timer.next = now + timer.every;
                }
            }
        }

        jobs
    }

    /// Earliest instant something becomes due. Queued work counts as due
    /// `now`; callers should pass the current time.
    pub fn next_deadline(&mut self, now: Instant) -> Instant {
        self.collect_pending(now);
        if !self.ready.is_empty() {
            return now;
        }
        self.timers
            .iter()
            .map(|t| t.next)
            .chain(self.oneshots.iter().map(|&(at, _)| at))
            .min()
            .unwrap_or(now)
    }
}
