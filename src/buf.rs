use crate::tweak::{Block, BLOCK_SIZE};

/// Upper bound on bytes the engine ever withholds: one completed
/// block plus a partial block.
pub(crate) const CARRY_CAPACITY: usize = 2 * BLOCK_SIZE;

/// A fixed-capacity buffer for bytes that have been consumed from
/// input but not yet emitted.
///
/// Contents are `data[..len]`, oldest byte first. Vacated storage is
/// wiped as bytes leave the buffer, and the whole buffer is wiped on
/// drop; the bytes it holds are plaintext or ciphertext still in
/// flight.
#[derive(Clone, Debug)]
pub(crate) struct CarryBuf {
    data: [u8; CARRY_CAPACITY],
    len: usize,
}

impl CarryBuf {
    pub const fn new() -> Self {
        Self {
            data: [0; CARRY_CAPACITY],
            len: 0,
        }
    }

    /// Returns the number of buffered bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the buffered bytes, oldest first.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Appends `bytes`.
    ///
    /// The caller keeps the total at or below [`CARRY_CAPACITY`].
    pub fn extend(&mut self, bytes: &[u8]) {
        debug_assert!(self.len + bytes.len() <= CARRY_CAPACITY);
        self.data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    /// Removes and returns the oldest block.
    ///
    /// The caller ensures at least [`BLOCK_SIZE`] bytes are buffered.
    pub fn take_block(&mut self) -> Block {
        debug_assert!(self.len >= BLOCK_SIZE);
        let mut block = Block::default();
        block.copy_from_slice(&self.data[..BLOCK_SIZE]);
        self.data.copy_within(BLOCK_SIZE..self.len, 0);
        self.len -= BLOCK_SIZE;
        self.data[self.len..].fill(0);
        block
    }

    /// Resets the buffer to empty, wiping the storage.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.len = 0;
    }
}

impl Drop for CarryBuf {
    fn drop(&mut self) {
        self.data.fill(0);
    }
}
