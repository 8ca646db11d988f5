//! Tick driver for processes that split their work into three phases
//!
//! A tick runs every `begin` on the caller, then every `process` (on the
//! rayon pool when parallel), then every `end` on the caller again. Each
//! phase finishes for all processes before the next one starts, so the
//! middle phase never races with code that mutates the context.

use rayon::prelude::*;
use tracing::debug;

/// A unit of per-tick work with a phase that may run off the caller
pub trait AsyncProcess<C>: Send {
    /// Called when a session starts or restarts
    fn init(&mut self, _ctx: &C) {}

    /// Called when a session ends
    fn reset(&mut self) {}

    /// Runs on the caller before `process`; may read and write the context
    fn begin(&mut self, _ctx: &mut C) {}

    /// Runs without access to the context, possibly on a worker thread
    fn process(&mut self) {}

    /// Runs on the caller after `process`; may read and write the context
    fn end(&mut self, _ctx: &mut C) {}

    /// Processes returning false are skipped for the whole tick
    fn should_process(&self) -> bool {
        true
    }
}

pub struct AsyncCore<C> {
    processes: Vec<Box<dyn AsyncProcess<C>>>,
    active: Vec<bool>,
    parallel: bool,
    ticks: u64,
}

impl<C> AsyncCore<C> {
    pub fn new(parallel: bool) -> Self {
        Self {
            processes: Vec::new(),
            active: Vec::new(),
            parallel,
            ticks: 0,
        }
    }

    pub fn add<P>(&mut self, process: P)
    where
        P: AsyncProcess<C> + 'static,
    {
        self.processes.push(Box::new(process));
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Ticks completed since the last `init`
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn init(&mut self, ctx: &C) {
        debug!(
            processes = self.processes.len(),
            parallel = self.parallel,
            "initializing async processes"
        );
        self.ticks = 0;
        for process in &mut self.processes {
            process.init(ctx);
        }
    }

    pub fn reset(&mut self) {
        for process in &mut self.processes {
            process.reset();
        }
    }

    /// Run one tick with a barrier between phases
    pub fn tick(&mut self, ctx: &mut C) {
        self.active.clear();
        self.active
            .extend(self.processes.iter().map(|p| p.should_process()));

        for (process, _) in self.running() {
            process.begin(ctx);
        }

        if self.parallel {
            self.processes
                .par_iter_mut()
                .zip(self.active.par_iter())
                .filter(|(_, active)| **active)
                .for_each(|(process, _)| process.process());
        } else {
            for (process, _) in self.running() {
                process.process();
            }
        }

        for (process, _) in self.running() {
            process.end(ctx);
        }

        self.ticks += 1;
    }

    fn running(&mut self) -> impl Iterator<Item = (&mut Box<dyn AsyncProcess<C>>, &bool)> {
        self.processes
            .iter_mut()
            .zip(self.active.iter())
            .filter(|(_, active)| **active)
    }
}
