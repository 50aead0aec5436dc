extern crate alloc;

use {
    crate::{
        error::{Error, Result},
        tweak::BLOCK_SIZE,
    },
    alloc::vec::Vec,
    core::fmt,
    zeroize::Zeroizing,
};

/// Key lengths the engine accepts, in bytes. XTS-AES is defined for
/// the 128- and 256-bit AES variants only.
const KEY_SIZES: [usize; 2] = [16, 32];

/// How the engine treats data unit boundaries.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// The data unit number advances automatically whenever a unit
    /// completes; one instance can run across a whole stream of
    /// consecutive sectors.
    Continuous,
    /// Each init/process/finalize cycle covers exactly one data
    /// unit. Input crossing the sector boundary, or falling short of
    /// it at finalize, is a size mismatch.
    Independent,
}

/// The transform direction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Plaintext in, ciphertext out.
    Encrypt,
    /// Ciphertext in, plaintext out.
    Decrypt,
}

/// Immutable configuration for one cipher initialization.
///
/// Keys are copied in and held in zeroizing storage; callers may wipe
/// their own copies once construction returns. Construction validates
/// everything, so a `CipherParameters` value is always well formed.
#[derive(Clone)]
pub struct CipherParameters {
    mode: Mode,
    key_data: Zeroizing<Vec<u8>>,
    key_tweak: Zeroizing<Vec<u8>>,
    sector_size: usize,
    sector_index: u128,
}

impl CipherParameters {
    /// Builds a parameter set.
    ///
    /// `key_data` (K1) keys the data permutation, `key_tweak` (K2)
    /// the tweak permutation; both must be the same length, 16 or 32
    /// bytes, and should be independently chosen. `sector_size` is
    /// the data unit length in bytes, at least one block.
    /// `sector_index` is the number of the first data unit.
    pub fn new(
        mode: Mode,
        key_data: &[u8],
        key_tweak: &[u8],
        sector_size: usize,
        sector_index: u128,
    ) -> Result<Self> {
        if key_data.len() != key_tweak.len() {
            return Err(Error::Configuration(
                "data and tweak keys must be the same length",
            ));
        }
        if !KEY_SIZES.contains(&key_data.len()) {
            return Err(Error::Configuration(
                "keys must be 16 or 32 bytes each",
            ));
        }
        if sector_size < BLOCK_SIZE {
            return Err(Error::Configuration(
                "sector size must be at least one block",
            ));
        }
        Ok(Self {
            mode,
            key_data: Zeroizing::new(key_data.to_vec()),
            key_tweak: Zeroizing::new(key_tweak.to_vec()),
            sector_size,
            sector_index,
        })
    }

    /// Returns the data unit boundary mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the data unit length in bytes.
    pub fn sector_size(&self) -> usize {
        self.sector_size
    }

    /// Returns the number of the first data unit.
    pub fn sector_index(&self) -> u128 {
        self.sector_index
    }

    pub(crate) fn key_data(&self) -> &[u8] {
        &self.key_data
    }

    pub(crate) fn key_tweak(&self) -> &[u8] {
        &self.key_tweak
    }
}

impl fmt::Debug for CipherParameters {
    /// Key material is deliberately omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherParameters")
            .field("mode", &self.mode)
            .field("key_len", &self.key_data.len())
            .field("sector_size", &self.sector_size)
            .field("sector_index", &self.sector_index)
            .finish()
    }
}
