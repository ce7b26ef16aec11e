use thiserror::Error;

/// Fault classes used for coarse diagnostics and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Decoder rejected an instruction word or parameter encoding.
    Decode,
    /// Memory addressing violation.
    Memory,
}

/// Stable fault taxonomy for the processor core.
///
/// Every fault is terminal for the processor that raised it: the processor
/// transitions to [`RunState::Failed`](crate::RunState::Failed) and performs
/// no further execution. Partial memory effects committed before the fault
/// are not rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// An addressing-mode digit in the instruction word is outside `0..=2`.
    #[error("instruction word {0} carries an addressing-mode digit outside 0..=2")]
    InvalidModeDigit(i64),
    /// The opcode field selects no entry in the opcode table.
    #[error("unknown opcode {0}")]
    UnknownOpcode(i64),
    /// Immediate mode was used for a write-target parameter.
    #[error("immediate mode used for a write target")]
    InvalidWriteMode,
    /// A memory access resolved to a negative effective address.
    #[error("negative memory address {0}")]
    InvalidAddress(i64),
}

impl Fault {
    /// Returns the diagnostics class for this fault.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::InvalidModeDigit(_) | Self::UnknownOpcode(_) | Self::InvalidWriteMode => {
                FaultClass::Decode
            }
            Self::InvalidAddress(_) => FaultClass::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Fault, FaultClass};

    #[test]
    fn class_mapping_matches_fault_taxonomy() {
        assert_eq!(Fault::InvalidModeDigit(302).class(), FaultClass::Decode);
        assert_eq!(Fault::UnknownOpcode(42).class(), FaultClass::Decode);
        assert_eq!(Fault::InvalidWriteMode.class(), FaultClass::Decode);
        assert_eq!(Fault::InvalidAddress(-1).class(), FaultClass::Memory);
    }

    #[test]
    fn display_carries_the_offending_value() {
        assert_eq!(Fault::UnknownOpcode(42).to_string(), "unknown opcode 42");
        assert_eq!(
            Fault::InvalidAddress(-7).to_string(),
            "negative memory address -7"
        );
    }
}
