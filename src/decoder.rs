//! Instruction decoder.
//!
//! Splits a raw instruction word into an opcode and one addressing mode per
//! potential parameter slot, validating both against the opcode table and
//! the mode-digit range.

use crate::fault::Fault;
use crate::opcode::{Opcode, MAX_PARAMS};

/// Addressing modes governing parameter interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum AddressingMode {
    /// Raw parameter is a memory address.
    #[default]
    Position,
    /// Raw parameter is the value itself. Valid only for read parameters.
    Immediate,
    /// Raw parameter is an offset from the processor's relative base.
    Relative,
}

impl AddressingMode {
    /// Converts one decimal mode digit into an addressing mode.
    ///
    /// `None` means the digit is outside the assigned `0..=2` range.
    #[must_use]
    pub const fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            0 => Some(Self::Position),
            1 => Some(Self::Immediate),
            2 => Some(Self::Relative),
            _ => None,
        }
    }
}

/// Fully decoded instruction word.
///
/// The mode list always has [`MAX_PARAMS`] entries; an opcode with fewer
/// parameters simply ignores the trailing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DecodedInstruction {
    /// The instruction's opcode.
    pub opcode: Opcode,
    /// Addressing mode per parameter slot, in operand order.
    pub modes: [AddressingMode; MAX_PARAMS],
}

/// Instruction decoder for the processor instruction set.
pub struct Decoder;

impl Decoder {
    /// Decodes a raw instruction word.
    ///
    /// The opcode is the low two decimal digits; the remaining digits are
    /// addressing-mode digits, ones-digit first, one per parameter slot.
    /// Negative words never match the opcode table.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::UnknownOpcode`] when the opcode field selects no
    /// table entry and [`Fault::InvalidModeDigit`] when a mode digit falls
    /// outside `0..=2`.
    pub fn decode(word: i64) -> Result<DecodedInstruction, Fault> {
        let code = word % 100;
        let opcode = Opcode::from_code(code).ok_or(Fault::UnknownOpcode(code))?;

        let mut modes = [AddressingMode::Position; MAX_PARAMS];
        let mut digits = word / 100;
        for slot in &mut modes {
            *slot = AddressingMode::from_digit(digits % 10).ok_or(Fault::InvalidModeDigit(word))?;
            digits /= 10;
        }

        Ok(DecodedInstruction { opcode, modes })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AddressingMode, Decoder};
    use crate::fault::Fault;
    use crate::opcode::Opcode;

    #[rstest]
    #[case(1, Opcode::Add, [AddressingMode::Position; 3])]
    #[case(2, Opcode::Mul, [AddressingMode::Position; 3])]
    #[case(3, Opcode::Input, [AddressingMode::Position; 3])]
    #[case(99, Opcode::Halt, [AddressingMode::Position; 3])]
    #[case(
        1002,
        Opcode::Mul,
        [AddressingMode::Position, AddressingMode::Immediate, AddressingMode::Position]
    )]
    #[case(
        104,
        Opcode::Output,
        [AddressingMode::Immediate, AddressingMode::Position, AddressingMode::Position]
    )]
    #[case(
        204,
        Opcode::Output,
        [AddressingMode::Relative, AddressingMode::Position, AddressingMode::Position]
    )]
    #[case(
        21108,
        Opcode::Equals,
        [AddressingMode::Immediate, AddressingMode::Immediate, AddressingMode::Relative]
    )]
    fn known_words_decode_to_expected_opcode_and_modes(
        #[case] word: i64,
        #[case] opcode: Opcode,
        #[case] modes: [AddressingMode; 3],
    ) {
        let decoded = Decoder::decode(word).expect("word should decode");
        assert_eq!(decoded.opcode, opcode);
        assert_eq!(decoded.modes, modes);
    }

    #[test]
    fn unknown_opcode_field_is_rejected() {
        assert_eq!(Decoder::decode(55), Err(Fault::UnknownOpcode(55)));
        assert_eq!(Decoder::decode(100), Err(Fault::UnknownOpcode(0)));
        assert_eq!(Decoder::decode(-1), Err(Fault::UnknownOpcode(-1)));
    }

    #[test]
    fn mode_digit_outside_assigned_range_is_rejected() {
        assert_eq!(Decoder::decode(302), Err(Fault::InvalidModeDigit(302)));
        assert_eq!(Decoder::decode(30001), Err(Fault::InvalidModeDigit(30001)));
        assert_eq!(Decoder::decode(42001), Err(Fault::InvalidModeDigit(42001)));
    }

    #[test]
    fn immediate_write_mode_is_not_a_decode_concern() {
        // The decoder validates digits, not role/mode pairings; the
        // processor rejects an immediate write target at resolution time.
        let decoded = Decoder::decode(11101).expect("word should decode");
        assert_eq!(decoded.opcode, Opcode::Add);
        assert_eq!(decoded.modes, [AddressingMode::Immediate; 3]);
    }
}
