//! Stack-free integer virtual machine with FIFO-channel I/O.
//!
//! One configurable processor core executes the ten-opcode instruction set
//! over a growable integer memory and talks to its environment exclusively
//! through two unbounded FIFO channels. Several processors compose into
//! concurrently running pipelines (feedback rings, linear chains, or a
//! single instance driven by an interactive peer) that exchange signals
//! through shared channels.

/// Growable zero-extended integer memory.
pub mod memory;
pub use memory::Memory;

/// Instruction decoder and addressing modes.
pub mod decoder;
pub use decoder::{AddressingMode, DecodedInstruction, Decoder};

/// Opcode assignments and parameter shapes.
pub mod opcode;
pub use opcode::{Opcode, ParamRole, MAX_PARAMS, OPCODE_TABLE};

/// Fault taxonomy for decode and execution failures.
pub mod fault;
pub use fault::{Fault, FaultClass};

/// Unbounded FIFO channel for processor I/O.
pub mod channel;
pub use channel::Channel;

/// Processor core and its execution-state machine.
pub mod processor;
pub use processor::{Processor, RunState, StepOutcome};

/// Pipeline composition over shared channels.
pub mod pipeline;
pub use pipeline::{run_chain, run_feedback_loop, PipelineError, ProcessorHandle};

/// Comma-separated program-listing parser.
pub mod program;
pub use program::ProgramError;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
