use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::device::DeviceSink;
use crate::effects::Effect;
use crate::GlowError;

/// Suspends the scheduler between ticks.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Blocking sleep on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}

/// Cooperative stop request, observed once per tick.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a run does when the sink rejects a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteErrorPolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Drop the frame, log it and carry on with the next tick.
    SkipFrame,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub on_write_error: WriteErrorPolicy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub effect: &'static str,
    pub frames_written: u64,
    pub frames_dropped: u64,
    pub cancelled: bool,
}

/// Drives effects against a sink: compute, write, check for cancellation, pause.
#[derive(Debug)]
pub struct Scheduler<S, P = ThreadPacer, R = StdRng> {
    sink: S,
    pacer: P,
    rng: R,
    cancel: CancelToken,
    options: SchedulerOptions,
}

impl<S: DeviceSink> Scheduler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            pacer: ThreadPacer,
            rng: StdRng::from_entropy(),
            cancel: CancelToken::new(),
            options: SchedulerOptions::default(),
        }
    }
}

impl<S, P, R> Scheduler<S, P, R>
where
    S: DeviceSink,
    P: Pacer,
    R: RngCore,
{
    pub fn with_pacer<Q: Pacer>(self, pacer: Q) -> Scheduler<S, Q, R> {
        Scheduler {
            sink: self.sink,
            pacer,
            rng: self.rng,
            cancel: self.cancel,
            options: self.options,
        }
    }

    pub fn with_rng<Q: RngCore>(self, rng: Q) -> Scheduler<S, P, Q> {
        Scheduler {
            sink: self.sink,
            pacer: self.pacer,
            rng,
            cancel: self.cancel,
            options: self.options,
        }
    }

    pub fn with_options(mut self, options: SchedulerOptions) -> Self {
        self.options = options;
        self
    }

    /// Handle for stopping a running effect from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Suspend between runs, e.g. while stepping brightness.
    pub fn pause(&mut self, delay: Duration) {
        self.pacer.pause(delay);
    }

    /// Run `effect` to completion or until cancelled.
    ///
    /// Each tick's frame is written before the next one is computed.
    /// Cancellation is checked after the write and before the pause.
    pub fn run<E: Effect + ?Sized>(&mut self, effect: &mut E) -> Result<RunReport, GlowError> {
        let mut report = RunReport {
            effect: effect.name(),
            frames_written: 0,
            frames_dropped: 0,
            cancelled: false,
        };

        while let Some(tick) = effect.next_tick(&mut self.rng) {
            match self.sink.write_frame(&tick.frame) {
                Ok(()) => report.frames_written += 1,
                Err(err) => match self.options.on_write_error {
                    WriteErrorPolicy::Abort => return Err(err.into()),
                    WriteErrorPolicy::SkipFrame => {
                        warn!("dropping {} frame: {err}", report.effect);
                        report.frames_dropped += 1;
                    },
                },
            }

            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            trace!("{} tick held for {:?}", report.effect, tick.delay);
            if !tick.delay.is_zero() {
                self.pacer.pause(tick.delay);
            }
        }

        debug!(
            "{} finished: {} written, {} dropped, cancelled: {}",
            report.effect, report.frames_written, report.frames_dropped, report.cancelled
        );
        Ok(report)
    }
}
