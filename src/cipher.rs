use {
    crate::{
        block::{AesCipher, BlockCipher},
        buf::CarryBuf,
        error::{Error, Result},
        params::{CipherParameters, Direction, Mode},
        tweak::{encode_data_unit, gf_mul_alpha, xor_block, Block, BLOCK_SIZE},
    },
    zeroize::Zeroize,
};

/// XTS over AES, with the 128- or 256-bit variant picked by the key
/// length at initialization.
pub type XtsAes = XtsCipher<AesCipher>;

/// Lifecycle of a cipher instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    /// Initialized, no input consumed yet.
    Ready,
    /// At least one `process` call has been made.
    Processing,
    /// `finalize` has run; only `init` is permitted.
    Finalized,
}

/// A buffered, resumable XTS cipher.
///
/// The engine accepts input in arbitrary chunks and produces output
/// in strict input order. Because the last data unit of a stream may
/// end on a partial block, the most recently completed block of the
/// unit in flight is always withheld, together with any partial
/// block, in a small inline buffer: after `t` bytes of a unit have
/// been consumed, `t` bytes stay buffered while `t < 16`, and
/// `16 + (t % 16)` bytes afterwards. That residue is exactly what
/// ciphertext stealing needs when a unit turns out to end off a block
/// boundary, and it makes the emitted byte count a function of the
/// total bytes consumed alone, so any chunking of the same stream
/// yields the same output.
///
/// Blocks are pushed through the XEX kernel as they leave the buffer,
/// oldest first; the tweak field always belongs to the oldest block
/// not yet processed. Deferring the kernel this way is what lets
/// decryption apply the ciphertext-stealing tweak swap, which runs
/// the withheld block under the *later* tweak.
///
/// Instances are not safe for concurrent use; independent instances
/// are.
pub struct XtsCipher<C> {
    direction: Direction,
    mode: Mode,
    sector_size: usize,
    /// Keyed with K1, runs in `direction`.
    cipher_data: C,
    /// Keyed with K2, only ever encrypts.
    cipher_tweak: C,
    /// Number of the data unit in flight.
    data_unit: u128,
    /// Tweak of the oldest block not yet pushed through the kernel.
    tweak: Block,
    /// Bytes of the current unit consumed from input.
    unit_offset: usize,
    carry: CarryBuf,
    state: State,
}

impl<C: BlockCipher> XtsCipher<C> {
    /// Creates an initialized cipher.
    ///
    /// Key expansion happens here; the parameters are consumed and
    /// their key copies wiped when they drop.
    pub fn new(direction: Direction, params: CipherParameters) -> Result<Self> {
        let cipher_data = C::new_from_key(params.key_data())?;
        let cipher_tweak = C::new_from_key(params.key_tweak())?;
        let data_unit = params.sector_index();
        let mut cipher = Self {
            direction,
            mode: params.mode(),
            sector_size: params.sector_size(),
            cipher_data,
            cipher_tweak,
            data_unit,
            tweak: Block::default(),
            unit_offset: 0,
            carry: CarryBuf::new(),
            state: State::Ready,
        };
        cipher.tweak = cipher.initial_tweak(data_unit);
        Ok(cipher)
    }

    /// Re-initializes the instance, discarding all prior state.
    ///
    /// Permitted in every lifecycle state, including after an error
    /// or after [`finalize`][Self::finalize].
    pub fn init(
        &mut self,
        direction: Direction,
        params: CipherParameters,
    ) -> Result<()> {
        *self = Self::new(direction, params)?;
        Ok(())
    }

    /// Returns the transform direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the data unit boundary mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the data unit length in bytes.
    pub fn sector_size(&self) -> usize {
        self.sector_size
    }

    /// Returns the number of the data unit currently in flight.
    ///
    /// In Continuous mode this advances as units complete.
    pub fn data_unit(&self) -> u128 {
        self.data_unit
    }

    /// Returns an upper bound on the bytes emitted by any sequence
    /// of calls, `finalize` included, that consumes `input_len`
    /// further input bytes.
    pub fn output_size(&self, input_len: usize) -> usize {
        self.carry.len() + input_len
    }

    /// Consumes `input` and writes every byte that can be emitted
    /// under the withholding rule to `out`, returning the count
    /// written.
    ///
    /// `out` never needs more than `input.len() + 32` bytes; the
    /// exact requirement is checked up front and nothing is consumed
    /// if `out` is too small. In Independent mode, input reaching
    /// past the sector boundary is rejected whole.
    pub fn process(&mut self, input: &[u8], out: &mut [u8]) -> Result<usize> {
        if self.state == State::Finalized {
            return Err(Error::Lifecycle("process called after finalize"));
        }
        if self.mode == Mode::Independent
            && self.unit_offset + input.len() > self.sector_size
        {
            return Err(Error::SizeMismatch {
                expected: self.sector_size,
                got: self.unit_offset + input.len(),
            });
        }
        let needed = self.emission(input.len());
        if out.len() < needed {
            return Err(Error::OutputBufferTooSmall {
                needed,
                got: out.len(),
            });
        }
        self.state = State::Processing;

        let mut input = input;
        let mut written = 0;
        while !input.is_empty() {
            let room = self.sector_size - self.unit_offset;
            let (chunk, rest) = input.split_at(input.len().min(room));
            written += self.feed_unit(chunk, &mut out[written..]);
            input = rest;
            if self.unit_offset == self.sector_size
                && self.mode == Mode::Continuous
            {
                written += self.flush_unit_tail(&mut out[written..]);
                self.advance_unit();
            }
        }
        debug_assert_eq!(written, needed);
        Ok(written)
    }

    /// Consumes a single byte. Equivalent to a one-byte
    /// [`process`][Self::process] call.
    pub fn process_byte(&mut self, byte: u8, out: &mut [u8]) -> Result<usize> {
        self.process(&[byte], out)
    }

    /// Flushes the data unit in flight and ends the stream,
    /// returning the count written.
    ///
    /// A stream ending on a unit boundary emits nothing here. A unit
    /// ending off a block boundary gets ciphertext stealing applied
    /// to its final two blocks; one ending on a block boundary has
    /// its withheld block emitted as-is. `out` never needs more than
    /// 32 bytes. After success only [`init`][Self::init] is
    /// permitted.
    pub fn finalize(&mut self, out: &mut [u8]) -> Result<usize> {
        if self.state == State::Finalized {
            return Err(Error::Lifecycle("finalize called after finalize"));
        }
        if self.mode == Mode::Independent
            && self.unit_offset != self.sector_size
        {
            return Err(Error::SizeMismatch {
                expected: self.sector_size,
                got: self.unit_offset,
            });
        }
        let buffered = self.carry.len();
        if buffered == 0 {
            self.state = State::Finalized;
            return Ok(0);
        }
        if buffered < BLOCK_SIZE {
            return Err(Error::InsufficientData(buffered));
        }
        if out.len() < buffered {
            return Err(Error::OutputBufferTooSmall {
                needed: buffered,
                got: out.len(),
            });
        }
        let written = self.flush_unit_tail(out);
        self.state = State::Finalized;
        Ok(written)
    }

    /// Derives E_K2 of the unit number, the tweak of block 0.
    fn initial_tweak(&self, unit: u128) -> Block {
        let mut tweak = encode_data_unit(unit);
        self.cipher_tweak.encrypt_block(&mut tweak);
        tweak
    }

    /// Bytes held back after `consumed` bytes of a unit: everything
    /// while short of one block, then the latest completed block
    /// plus the partial one.
    fn residual(consumed: usize) -> usize {
        if consumed < BLOCK_SIZE {
            consumed
        } else {
            let partial = consumed % BLOCK_SIZE;
            if partial == 0 {
                BLOCK_SIZE
            } else {
                BLOCK_SIZE + partial
            }
        }
    }

    /// Exact bytes a `process` call consuming `n` input bytes will
    /// emit.
    fn emission(&self, n: usize) -> usize {
        let emitted = self.unit_offset - self.carry.len();
        let total = self.unit_offset + n;
        match self.mode {
            // Completion flushes inside finalize, so the residual
            // applies even at total == sector_size.
            Mode::Independent => total - Self::residual(total) - emitted,
            Mode::Continuous => {
                let done = total / self.sector_size * self.sector_size;
                let rem = total % self.sector_size;
                done + (rem - Self::residual(rem)) - emitted
            }
        }
    }

    /// Runs one block through the XEX kernel under `tweak`.
    fn xex(&self, tweak: &Block, block: &mut Block) {
        xor_block(block, tweak);
        match self.direction {
            Direction::Encrypt => self.cipher_data.encrypt_block(block),
            Direction::Decrypt => self.cipher_data.decrypt_block(block),
        }
        xor_block(block, tweak);
    }

    /// Processes the oldest pending block and advances the tweak.
    fn crypt_block(&mut self, block: &mut Block) {
        let tweak = self.tweak;
        self.xex(&tweak, block);
        gf_mul_alpha(&mut self.tweak);
    }

    /// Consumes bytes that all belong to the current unit, emitting
    /// every block the withholding rule releases.
    fn feed_unit(&mut self, mut input: &[u8], out: &mut [u8]) -> usize {
        self.unit_offset += input.len();
        let keep = Self::residual(self.unit_offset);
        let avail = self.carry.len() + input.len();
        debug_assert!(avail >= keep);
        let mut pending = avail - keep;
        debug_assert_eq!(pending % BLOCK_SIZE, 0);

        let mut written = 0;
        while pending > 0 {
            let mut block = if self.carry.len() >= BLOCK_SIZE {
                self.carry.take_block()
            } else if self.carry.is_empty() {
                let (head, rest) = input.split_at(BLOCK_SIZE);
                input = rest;
                let mut block = Block::default();
                block.copy_from_slice(head);
                block
            } else {
                // A block straddles the carry: top it up first.
                let (head, rest) =
                    input.split_at(BLOCK_SIZE - self.carry.len());
                self.carry.extend(head);
                input = rest;
                self.carry.take_block()
            };
            self.crypt_block(&mut block);
            out[written..written + BLOCK_SIZE].copy_from_slice(&block);
            written += BLOCK_SIZE;
            pending -= BLOCK_SIZE;
        }

        self.carry.extend(input);
        debug_assert_eq!(self.carry.len(), keep);
        written
    }

    /// Emits the withheld tail of a unit: the buffered block as-is
    /// when the unit ends on a block boundary, ciphertext stealing
    /// over the final two blocks otherwise.
    fn flush_unit_tail(&mut self, out: &mut [u8]) -> usize {
        let buffered = self.carry.len();
        debug_assert!(buffered >= BLOCK_SIZE);
        let partial = buffered - BLOCK_SIZE;

        let mut head = self.carry.take_block();
        if partial == 0 {
            self.crypt_block(&mut head);
            out[..BLOCK_SIZE].copy_from_slice(&head);
            return BLOCK_SIZE;
        }

        let tweak_prev = self.tweak;
        let mut tweak_last = tweak_prev;
        gf_mul_alpha(&mut tweak_last);

        // Encrypting, the withheld block is ciphered under its own
        // tweak and the rebuilt block under the later one; the order
        // swaps for decryption.
        let (head_tweak, rebuilt_tweak) = match self.direction {
            Direction::Encrypt => (tweak_prev, tweak_last),
            Direction::Decrypt => (tweak_last, tweak_prev),
        };

        self.xex(&head_tweak, &mut head);
        // Steal the suffix of the processed block to pad the tail
        // out to a full block.
        let mut rebuilt = head;
        rebuilt[..partial].copy_from_slice(self.carry.as_slice());
        self.carry.clear();
        self.xex(&rebuilt_tweak, &mut rebuilt);

        out[..BLOCK_SIZE].copy_from_slice(&rebuilt);
        out[BLOCK_SIZE..buffered].copy_from_slice(&head[..partial]);
        buffered
    }

    /// Moves to the next data unit.
    fn advance_unit(&mut self) {
        self.data_unit = self.data_unit.wrapping_add(1);
        self.unit_offset = 0;
        self.tweak = self.initial_tweak(self.data_unit);
    }
}

impl<C> Drop for XtsCipher<C> {
    fn drop(&mut self) {
        // The carry buffer wipes itself; the key schedules are the
        // block cipher's responsibility.
        self.tweak.zeroize();
    }
}
