//! Opcode table for the processor instruction set.
//!
//! One const table is the single source of truth: an opcode value not
//! present here is unknown by definition, and each entry fixes the number
//! and roles of the instruction's parameters.

/// Role of one instruction parameter.
///
/// `Read` parameters resolve to a value; `Write` parameters resolve to the
/// effective address the handler stores into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ParamRole {
    /// Parameter resolves to a value to read.
    Read,
    /// Parameter resolves to a memory location to write.
    Write,
}

/// Assigned opcodes of the instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Opcode {
    Add,
    Mul,
    Input,
    Output,
    JumpIfTrue,
    JumpIfFalse,
    LessThan,
    Equals,
    AdjustRelativeBase,
    Halt,
}

/// Maximum number of parameters any opcode consumes.
pub const MAX_PARAMS: usize = 3;

/// Single source-of-truth opcode assignment table.
///
/// Any opcode value not present here is illegal by definition.
pub const OPCODE_TABLE: &[(i64, Opcode)] = &[
    (1, Opcode::Add),
    (2, Opcode::Mul),
    (3, Opcode::Input),
    (4, Opcode::Output),
    (5, Opcode::JumpIfTrue),
    (6, Opcode::JumpIfFalse),
    (7, Opcode::LessThan),
    (8, Opcode::Equals),
    (9, Opcode::AdjustRelativeBase),
    (99, Opcode::Halt),
];

impl Opcode {
    /// Returns the assigned opcode for a raw opcode value.
    ///
    /// `None` means the value is unknown.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        OPCODE_TABLE
            .iter()
            .find_map(|(entry_code, opcode)| (*entry_code == code).then_some(*opcode))
    }

    /// Returns the raw opcode value this opcode is assigned to.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Add => 1,
            Self::Mul => 2,
            Self::Input => 3,
            Self::Output => 4,
            Self::JumpIfTrue => 5,
            Self::JumpIfFalse => 6,
            Self::LessThan => 7,
            Self::Equals => 8,
            Self::AdjustRelativeBase => 9,
            Self::Halt => 99,
        }
    }

    /// Returns the fixed parameter shape for this opcode, in operand order.
    #[must_use]
    pub const fn params(self) -> &'static [ParamRole] {
        match self {
            Self::Add | Self::Mul | Self::LessThan | Self::Equals => {
                &[ParamRole::Read, ParamRole::Read, ParamRole::Write]
            }
            Self::Input => &[ParamRole::Write],
            Self::Output | Self::AdjustRelativeBase => &[ParamRole::Read],
            Self::JumpIfTrue | Self::JumpIfFalse => &[ParamRole::Read, ParamRole::Read],
            Self::Halt => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Opcode, ParamRole, MAX_PARAMS, OPCODE_TABLE};

    #[test]
    fn table_contains_unique_opcode_values() {
        let codes: HashSet<_> = OPCODE_TABLE.iter().map(|(code, _)| *code).collect();
        assert_eq!(codes.len(), OPCODE_TABLE.len());
    }

    #[test]
    fn every_table_entry_roundtrips_through_lookup() {
        for (code, opcode) in OPCODE_TABLE {
            assert_eq!(Opcode::from_code(*code), Some(*opcode));
            assert_eq!(opcode.code(), *code);
        }
    }

    #[test]
    fn unassigned_codes_are_unknown() {
        for code in [0, 10, 42, 98, 100, -1, -99] {
            assert_eq!(Opcode::from_code(code), None, "code {code} should be unknown");
        }
    }

    #[test]
    fn parameter_shapes_match_instruction_set() {
        assert_eq!(
            Opcode::Add.params(),
            &[ParamRole::Read, ParamRole::Read, ParamRole::Write]
        );
        assert_eq!(Opcode::Input.params(), &[ParamRole::Write]);
        assert_eq!(Opcode::Output.params(), &[ParamRole::Read]);
        assert_eq!(
            Opcode::JumpIfTrue.params(),
            &[ParamRole::Read, ParamRole::Read]
        );
        assert_eq!(Opcode::AdjustRelativeBase.params(), &[ParamRole::Read]);
        assert_eq!(Opcode::Halt.params(), &[]);
    }

    #[test]
    fn no_shape_exceeds_the_fixed_parameter_bound() {
        for (_, opcode) in OPCODE_TABLE {
            assert!(opcode.params().len() <= MAX_PARAMS);
        }
    }
}
