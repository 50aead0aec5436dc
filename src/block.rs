use {
    crate::{
        error::{Error, Result},
        tweak::Block,
    },
    aes::{
        cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit},
        Aes128, Aes256,
    },
};

/// A 128-bit block permutation.
///
/// The XTS engine consumes the permutation through this capability
/// interface: single-block ECB encrypt and decrypt under a fixed key.
/// Key expansion happens once, in [`new_from_key`][Self::new_from_key];
/// the block calls must not allocate.
pub trait BlockCipher: Sized {
    /// Key lengths accepted by [`new_from_key`][Self::new_from_key],
    /// in bytes.
    const KEY_SIZES: &'static [usize];

    /// Expands `key` into a keyed instance.
    ///
    /// Fails with [`Error::Configuration`] if the key length is not
    /// one of [`KEY_SIZES`][Self::KEY_SIZES].
    fn new_from_key(key: &[u8]) -> Result<Self>;

    /// Encrypts one block in place.
    fn encrypt_block(&self, block: &mut Block);

    /// Decrypts one block in place.
    fn decrypt_block(&self, block: &mut Block);
}

/// AES keyed for either the 128- or 256-bit variant, selected by the
/// key length at run time.
///
/// Round keys are wiped on drop.
pub struct AesCipher(Aes);

enum Aes {
    Aes128(Aes128),
    Aes256(Aes256),
}

impl BlockCipher for AesCipher {
    const KEY_SIZES: &'static [usize] = &[16, 32];

    fn new_from_key(key: &[u8]) -> Result<Self> {
        let aes = match key.len() {
            16 => Aes::Aes128(Aes128::new_from_slice(key)?),
            32 => Aes::Aes256(Aes256::new_from_slice(key)?),
            _ => {
                return Err(Error::Configuration(
                    "AES keys must be 16 or 32 bytes",
                ))
            }
        };
        Ok(AesCipher(aes))
    }

    fn encrypt_block(&self, block: &mut Block) {
        let block = GenericArray::from_mut_slice(block);
        match &self.0 {
            Aes::Aes128(aes) => aes.encrypt_block(block),
            Aes::Aes256(aes) => aes.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut Block) {
        let block = GenericArray::from_mut_slice(block);
        match &self.0 {
            Aes::Aes128(aes) => aes.decrypt_block(block),
            Aes::Aes256(aes) => aes.decrypt_block(block),
        }
    }
}
