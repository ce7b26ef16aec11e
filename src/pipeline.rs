//! Pipeline composition: several processors wired through shared channels.
//!
//! Two required topologies: a feedback ring whose last stage feeds the
//! first (the amplifier pattern), and a single processor run concurrently
//! with an interactive peer that drains its output and answers on its
//! input. Each processor runs on its own thread with a private memory copy
//! of the shared program; channels are the only shared state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use thiserror::Error;

use crate::channel::Channel;
use crate::fault::Fault;
use crate::memory::Memory;
use crate::processor::Processor;

/// Errors surfaced by a pipeline to its driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A pipeline needs at least one stage.
    #[error("pipeline needs at least one stage")]
    Empty,
    /// One stage failed; the whole composition is aborted.
    #[error("stage {stage} failed: {fault}")]
    Stage {
        /// Index of the failed stage in wiring order.
        stage: usize,
        /// The stage's latched fault.
        fault: Fault,
    },
    /// Every stage halted but the result channel held no value.
    #[error("pipeline halted without producing a result value")]
    NoOutput,
    /// A worker thread panicked instead of returning an outcome.
    #[error("processor worker panicked")]
    WorkerPanic,
}

/// Runs a feedback ring of processors over one shared program.
///
/// Stage `k` consumes from channel `k` and produces into channel
/// `k + 1 mod N`, so the last stage feeds the first. Each channel is
/// primed with its stage's phase value, and channel 0 additionally
/// receives the external `seed`. All stages run concurrently; the result
/// is the last value left on the channel feeding stage 0 once every stage
/// has halted.
///
/// # Errors
///
/// Returns [`PipelineError::Empty`] for an empty phase list,
/// [`PipelineError::Stage`] for the first stage fault observed (without
/// waiting for stages the fault leaves blocked), and
/// [`PipelineError::NoOutput`] when the feedback channel ends up empty.
pub fn run_feedback_loop(
    program: &[i64],
    phases: &[i64],
    seed: i64,
) -> Result<i64, PipelineError> {
    let channels = primed_channels(phases, seed)?;
    let stages: Vec<Processor> = (0..phases.len())
        .map(|k| {
            Processor::new(
                Memory::load(program),
                channels[k].clone(),
                channels[(k + 1) % phases.len()].clone(),
            )
        })
        .collect();

    run_stages(stages)?;
    last_value(&channels[0]).ok_or(PipelineError::NoOutput)
}

/// Runs a linear chain of processors over one shared program.
///
/// Stage `k` consumes from channel `k` and produces into channel `k + 1`;
/// there is no feedback edge. Priming matches the ring: one phase per
/// stage channel plus the external `seed` into channel 0. The result is
/// the last value on the final stage's output channel.
///
/// # Errors
///
/// Same error surface as [`run_feedback_loop`].
pub fn run_chain(program: &[i64], phases: &[i64], seed: i64) -> Result<i64, PipelineError> {
    let mut channels = primed_channels(phases, seed)?;
    channels.push(Channel::new());
    let stages: Vec<Processor> = (0..phases.len())
        .map(|k| {
            Processor::new(
                Memory::load(program),
                channels[k].clone(),
                channels[k + 1].clone(),
            )
        })
        .collect();

    run_stages(stages)?;
    last_value(&channels[phases.len()]).ok_or(PipelineError::NoOutput)
}

/// Builds one channel per stage, primes each with its phase, and seeds the
/// first.
fn primed_channels(phases: &[i64], seed: i64) -> Result<Vec<Channel>, PipelineError> {
    if phases.is_empty() {
        return Err(PipelineError::Empty);
    }
    let channels: Vec<Channel> = phases.iter().map(|_| Channel::new()).collect();
    for (channel, phase) in channels.iter().zip(phases) {
        channel.push(*phase);
    }
    channels[0].push(seed);
    Ok(channels)
}

/// Drives every stage on its own thread, collecting outcomes through a
/// completion channel as stages finish.
///
/// The first faulted stage observed aborts the composition immediately;
/// sibling stages that fault has left blocked on INPUT are abandoned
/// rather than waited for, so their outstanding pops simply become
/// garbage.
fn run_stages(stages: Vec<Processor>) -> Result<(), PipelineError> {
    let total = stages.len();
    let (done_tx, done_rx) = crossbeam_channel::unbounded();
    for (stage, mut processor) in stages.into_iter().enumerate() {
        let done = done_tx.clone();
        thread::spawn(move || {
            let outcome = processor
                .run()
                .map_err(|fault| PipelineError::Stage { stage, fault });
            let _ = done.send(outcome);
        });
    }
    drop(done_tx);

    for _ in 0..total {
        match done_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(error)) => return Err(error),
            Err(_) => return Err(PipelineError::WorkerPanic),
        }
    }
    Ok(())
}

/// Drains `channel` without blocking and keeps the most recent value.
fn last_value(channel: &Channel) -> Option<i64> {
    channel.drain().last().copied()
}

/// Handle onto a processor running on its own thread, for the
/// interactive-peer pattern.
///
/// The peer drains [`output`](Self::output), pushes responses into
/// [`input`](Self::input), and polls [`is_terminal`](Self::is_terminal)
/// alongside channel emptiness to detect completion, since channels carry
/// no close signal. [`is_halted`](Self::is_halted) distinguishes a normal
/// halt from a latched fault; [`join`](Self::join) retrieves the fault.
#[derive(Debug)]
pub struct ProcessorHandle {
    input: Channel,
    output: Channel,
    halted: Arc<AtomicBool>,
    terminal: Arc<AtomicBool>,
    worker: thread::JoinHandle<Result<Processor, Fault>>,
}

impl ProcessorHandle {
    /// Loads `program` into a fresh processor and starts it on its own
    /// thread with empty input and output channels.
    #[must_use]
    pub fn spawn(program: &[i64]) -> Self {
        let input = Channel::new();
        let output = Channel::new();
        let halted = Arc::new(AtomicBool::new(false));
        let terminal = Arc::new(AtomicBool::new(false));
        let mut processor = Processor::new(Memory::load(program), input.clone(), output.clone());

        let halted_flag = Arc::clone(&halted);
        let terminal_flag = Arc::clone(&terminal);
        let worker = thread::spawn(move || {
            let outcome = processor.run();
            if outcome.is_ok() {
                halted_flag.store(true, Ordering::Release);
            }
            terminal_flag.store(true, Ordering::Release);
            outcome.map(|()| processor)
        });

        Self {
            input,
            output,
            halted,
            terminal,
            worker,
        }
    }

    /// Channel the processor reads INPUT values from.
    #[must_use]
    pub const fn input(&self) -> &Channel {
        &self.input
    }

    /// Channel the processor pushes OUTPUT values into.
    #[must_use]
    pub const fn output(&self) -> &Channel {
        &self.output
    }

    /// True once the processor has halted normally.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Acquire)
    }

    /// True once the processor can make no further progress, whether it
    /// halted normally or latched a fault.
    ///
    /// This is the signal a polling peer stops on; it then calls
    /// [`join`](Self::join) to learn which terminal state was reached.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal.load(Ordering::Acquire)
    }

    /// Waits for the processor to finish and returns it for memory
    /// inspection.
    ///
    /// Dropping the handle instead of joining abandons the processor; a
    /// worker left blocked on INPUT with no producer simply never
    /// completes, which is the caller's deadlock to avoid by construction.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Stage`] when the processor faulted and
    /// [`PipelineError::WorkerPanic`] when the worker thread panicked.
    pub fn join(self) -> Result<Processor, PipelineError> {
        self.worker
            .join()
            .map_err(|_| PipelineError::WorkerPanic)?
            .map_err(|fault| PipelineError::Stage { stage: 0, fault })
    }
}
