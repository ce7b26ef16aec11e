//! Growable integer memory.
//!
//! Addressed by non-negative index, logically zero-padded beyond the loaded
//! length: reads past the end return 0 without growing the store, writes
//! past the end zero-extend it first. Capacity growth is monotonic.

use crate::fault::Fault;

/// Growable integer storage exclusively owned by one processor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    cells: Vec<i64>,
}

impl Memory {
    /// Builds a memory whose low addresses hold the given program listing.
    #[must_use]
    pub fn load(program: &[i64]) -> Self {
        Self {
            cells: program.to_vec(),
        }
    }

    /// Reads the value at `addr`.
    ///
    /// Addresses at or beyond the current length read as 0; the store is
    /// never grown by a read.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidAddress`] when `addr` is negative.
    pub fn read(&self, addr: i64) -> Result<i64, Fault> {
        let index = Self::index_of(addr)?;
        Ok(self.cells.get(index).copied().unwrap_or(0))
    }

    /// Writes `value` at `addr`, zero-extending the store up to `addr` first
    /// when it lies beyond the current length.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::InvalidAddress`] when `addr` is negative.
    pub fn write(&mut self, addr: i64, value: i64) -> Result<(), Fault> {
        let index = Self::index_of(addr)?;
        if index >= self.cells.len() {
            self.cells.resize(index + 1, 0);
        }
        self.cells[index] = value;
        Ok(())
    }

    /// Returns the current backing-store length in cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true when no cells are loaded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index_of(addr: i64) -> Result<usize, Fault> {
        usize::try_from(addr).map_err(|_| Fault::InvalidAddress(addr))
    }
}
