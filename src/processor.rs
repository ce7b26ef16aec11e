//! Processor core: fetch–decode–execute loop over one memory and two
//! channels.
//!
//! The program counter is advanced past the opcode word and every consumed
//! parameter before the handler runs, so jump handlers overwrite `pc`
//! rather than being overwritten by it. INPUT is the only suspension point
//! in the instruction set; OUTPUT never blocks.

#![allow(clippy::cast_possible_wrap, clippy::option_if_let_else)]

use crate::channel::Channel;
use crate::decoder::{AddressingMode, Decoder};
use crate::fault::Fault;
use crate::memory::Memory;
use crate::opcode::{Opcode, ParamRole, MAX_PARAMS};

/// Host-observable execution state of one processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Constructed but not yet driven.
    #[default]
    Ready,
    /// Actively retiring instructions.
    Running,
    /// Parked on an INPUT whose channel was empty; resumable.
    Suspended,
    /// Executed HALT; no further memory mutation occurs.
    Halted,
    /// Fault is latched and no further progress is possible.
    Failed(Fault),
}

impl RunState {
    /// Returns the latched fault, if this state is failed.
    #[must_use]
    pub const fn latched_fault(self) -> Option<Fault> {
        match self {
            Self::Failed(fault) => Some(fault),
            Self::Ready | Self::Running | Self::Suspended | Self::Halted => None,
        }
    }

    /// Returns true once the processor can make no further progress.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Halted | Self::Failed(_))
    }
}

/// Outcome of one non-blocking step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// One instruction retired.
    Retired,
    /// The step parked on an empty input channel; push a value and step
    /// again to resume at the same point.
    Suspended,
    /// The processor executed HALT.
    Halted,
}

/// Stack-free virtual machine instance.
///
/// Owns its memory exclusively; communicates with the environment only
/// through the input and output channels given at construction. Callers
/// keep their own clones of those channels to feed and drain a running
/// processor.
///
/// Cell values are plain `i64`s; arithmetic wraps on overflow rather than
/// panicking.
#[derive(Debug)]
pub struct Processor {
    memory: Memory,
    input: Channel,
    output: Channel,
    pc: i64,
    relative_base: i64,
    state: RunState,
    /// Write address of an INPUT whose value has not arrived yet.
    pending_input: Option<i64>,
}

impl Processor {
    /// Creates a processor over `memory` wired to the given channels.
    #[must_use]
    pub const fn new(memory: Memory, input: Channel, output: Channel) -> Self {
        Self {
            memory,
            input,
            output,
            pc: 0,
            relative_base: 0,
            state: RunState::Ready,
            pending_input: None,
        }
    }

    /// Returns the processor's memory for inspection.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Returns the current execution state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Returns true once HALT has executed.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        matches!(self.state, RunState::Halted)
    }

    /// Returns the current program counter.
    #[must_use]
    pub const fn pc(&self) -> i64 {
        self.pc
    }

    /// Returns the current relative base.
    #[must_use]
    pub const fn relative_base(&self) -> i64 {
        self.relative_base
    }

    /// Runs until HALT, blocking on INPUT whenever the input channel is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns the first [`Fault`] raised by decode or execution; the
    /// fault is also latched in [`RunState::Failed`] and the processor
    /// performs no further execution.
    pub fn run(&mut self) -> Result<(), Fault> {
        loop {
            match self.advance(true)? {
                StepOutcome::Halted => return Ok(()),
                StepOutcome::Retired | StepOutcome::Suspended => {}
            }
        }
    }

    /// Retires at most one instruction without blocking.
    ///
    /// An INPUT against an empty channel parks the processor in
    /// [`RunState::Suspended`] with the destination recorded; the next
    /// step resumes exactly at the point of completing that handler, so no
    /// later side effects occur before the value arrives.
    ///
    /// # Errors
    ///
    /// Returns the first [`Fault`] raised by decode or execution, latching
    /// it in [`RunState::Failed`]. Stepping a failed processor keeps
    /// returning the latched fault.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        self.advance(false)
    }

    fn advance(&mut self, blocking: bool) -> Result<StepOutcome, Fault> {
        match self.state {
            RunState::Halted => return Ok(StepOutcome::Halted),
            RunState::Failed(fault) => return Err(fault),
            RunState::Ready | RunState::Running | RunState::Suspended => {}
        }
        match self.try_advance(blocking) {
            Ok(outcome) => Ok(outcome),
            Err(fault) => {
                self.state = RunState::Failed(fault);
                Err(fault)
            }
        }
    }

    fn try_advance(&mut self, blocking: bool) -> Result<StepOutcome, Fault> {
        if let Some(dest) = self.pending_input {
            return self.finish_input(dest, blocking);
        }

        let word = self.memory.read(self.pc)?;
        let instruction = Decoder::decode(word)?;
        let roles = instruction.opcode.params();

        // Resolved operands: a value for read parameters, an effective
        // write address for write parameters.
        let mut operands = [0i64; MAX_PARAMS];
        for (slot, (offset, (role, mode))) in operands
            .iter_mut()
            .zip((1i64..).zip(roles.iter().zip(instruction.modes)))
        {
            let raw = self.memory.read(self.pc + offset)?;
            *slot = self.resolve(raw, *role, mode)?;
        }
        self.pc += 1 + roles.len() as i64;

        self.execute(instruction.opcode, operands, blocking)
    }

    fn resolve(&self, raw: i64, role: ParamRole, mode: AddressingMode) -> Result<i64, Fault> {
        match role {
            ParamRole::Read => match mode {
                AddressingMode::Position => self.memory.read(raw),
                AddressingMode::Relative => self.memory.read(self.relative_base.wrapping_add(raw)),
                AddressingMode::Immediate => Ok(raw),
            },
            ParamRole::Write => match mode {
                AddressingMode::Position => Ok(raw),
                AddressingMode::Relative => Ok(self.relative_base.wrapping_add(raw)),
                AddressingMode::Immediate => Err(Fault::InvalidWriteMode),
            },
        }
    }

    fn execute(
        &mut self,
        opcode: Opcode,
        operands: [i64; MAX_PARAMS],
        blocking: bool,
    ) -> Result<StepOutcome, Fault> {
        let [a, b, dest] = operands;
        match opcode {
            Opcode::Add => self.memory.write(dest, a.wrapping_add(b))?,
            Opcode::Mul => self.memory.write(dest, a.wrapping_mul(b))?,
            Opcode::Input => return self.finish_input(a, blocking),
            Opcode::Output => self.output.push(a),
            Opcode::JumpIfTrue => {
                if a != 0 {
                    self.pc = b;
                }
            }
            Opcode::JumpIfFalse => {
                if a == 0 {
                    self.pc = b;
                }
            }
            Opcode::LessThan => self.memory.write(dest, i64::from(a < b))?,
            Opcode::Equals => self.memory.write(dest, i64::from(a == b))?,
            Opcode::AdjustRelativeBase => {
                self.relative_base = self.relative_base.wrapping_add(a);
            }
            Opcode::Halt => {
                self.state = RunState::Halted;
                return Ok(StepOutcome::Halted);
            }
        }
        self.state = RunState::Running;
        Ok(StepOutcome::Retired)
    }

    /// Completes (or parks) an INPUT whose destination is already resolved.
    fn finish_input(&mut self, dest: i64, blocking: bool) -> Result<StepOutcome, Fault> {
        let value = if blocking {
            self.input.pop()
        } else if let Some(value) = self.input.try_pop() {
            value
        } else {
            self.pending_input = Some(dest);
            self.state = RunState::Suspended;
            return Ok(StepOutcome::Suspended);
        };
        self.memory.write(dest, value)?;
        self.pending_input = None;
        self.state = RunState::Running;
        Ok(StepOutcome::Retired)
    }
}
