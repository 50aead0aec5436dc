//! Tweak arithmetic in GF(2^128).
//!
//! Tweaks are 16-byte blocks interpreted as little-endian polynomials
//! (byte 0 is least significant), reduced by x^128 + x^7 + x^2 + x + 1
//! as IEEE P1619 specifies. Successive block tweaks within a data unit
//! are T_j = α^j · E_K2(i), where i is the data unit number and α is
//! the primitive element x.

/// The cipher block size in bytes. XTS is defined over a 128-bit
/// block cipher, so this is fixed.
pub const BLOCK_SIZE: usize = 16;

/// A single cipher block.
pub type Block = [u8; BLOCK_SIZE];

/// Reduction constant for the LSB-first representation.
const GF_FEEDBACK: u8 = 0x87;

/// Encodes a data unit number as the block fed to the tweak cipher.
pub(crate) fn encode_data_unit(index: u128) -> Block {
    index.to_le_bytes()
}

/// Multiplies a tweak by α in place, advancing it to the next block
/// position within the data unit.
pub(crate) fn gf_mul_alpha(tweak: &mut Block) {
    let mut carry = 0u8;
    for byte in tweak.iter_mut() {
        let next = *byte >> 7;
        *byte = (*byte << 1) | carry;
        carry = next;
    }
    if carry != 0 {
        tweak[0] ^= GF_FEEDBACK;
    }
}

/// XORs `src` into `dst`.
pub(crate) fn xor_block(dst: &mut Block, src: &Block) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= s;
    }
}
