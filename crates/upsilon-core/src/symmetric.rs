//! The symmetric (stream cipher) capability.
//!
//! Encryption and decryption are the same keystream operation. Nothing here
//! authenticates ciphertext or tracks (key, IV) reuse; both are the
//! caller's job.

use cipher::typenum::Unsigned;
use cipher::{Iv, IvSizeUser, Key, KeyIvInit, KeySizeUser, StreamCipher, StreamCipherSeek};

use crate::error::{CryptoError, Result};
use crate::tag::SymmetricAlgorithm;

/// Key and IV sizes of a cipher, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymmetricProperties {
    pub algorithm: SymmetricAlgorithm,
    pub key_size: usize,
    pub iv_size: usize,
}

/// A keyed stream cipher positioned somewhere in its keystream.
pub trait SymmetricCipher: Send {
    fn algorithm(&self) -> SymmetricAlgorithm;

    /// XOR the keystream into `buf` and advance by `buf.len()`.
    fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Move to an absolute keystream byte offset.
    fn seek(&mut self, pos: u64) -> Result<()>;

    /// Current keystream byte offset.
    fn pos(&self) -> u64;

    fn decrypt_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        self.encrypt_in_place(buf)
    }

    /// Encrypt `input` into `output`, processing as many bytes as both
    /// buffers allow. Returns the number processed.
    fn encrypt_into(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let n = input.len().min(output.len());
        output[..n].copy_from_slice(&input[..n]);
        self.encrypt_in_place(&mut output[..n])?;
        Ok(n)
    }

    fn decrypt_into(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        self.encrypt_into(input, output)
    }

    fn encrypt(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut buf = input.to_vec();
        self.encrypt_in_place(&mut buf)?;
        Ok(buf)
    }

    fn decrypt(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.encrypt(input)
    }
}

/// A RustCrypto stream cipher behind [`SymmetricCipher`].
pub struct Keystream<C> {
    inner: C,
    algorithm: SymmetricAlgorithm,
    pos: u64,
}

impl<C> Keystream<C>
where
    C: KeyIvInit + StreamCipher + StreamCipherSeek + Send,
{
    pub fn new(algorithm: SymmetricAlgorithm, key: &Key<C>, iv: &Iv<C>) -> Self {
        Self {
            inner: C::new(key, iv),
            algorithm,
            pos: 0,
        }
    }

    /// Construct from slices, checking both lengths.
    pub fn from_slices(algorithm: SymmetricAlgorithm, key: &[u8], iv: &[u8]) -> Result<Self> {
        check_len("key", C::KeySize::USIZE, key.len())?;
        check_len("iv", C::IvSize::USIZE, iv.len())?;
        Ok(Self::new(
            algorithm,
            Key::<C>::from_slice(key),
            Iv::<C>::from_slice(iv),
        ))
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(CryptoError::InvalidKeyLength {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

impl<C> SymmetricCipher for Keystream<C>
where
    C: KeyIvInit + StreamCipher + StreamCipherSeek + Send,
{
    fn algorithm(&self) -> SymmetricAlgorithm {
        self.algorithm
    }

    fn encrypt_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        let end = self
            .pos
            .checked_add(buf.len() as u64)
            .ok_or(CryptoError::KeystreamExhausted)?;
        self.inner
            .try_apply_keystream(buf)
            .map_err(|_| CryptoError::KeystreamExhausted)?;
        self.pos = end;
        Ok(())
    }

    fn seek(&mut self, pos: u64) -> Result<()> {
        self.inner
            .try_seek(pos)
            .map_err(|_| CryptoError::KeystreamExhausted)?;
        self.pos = pos;
        Ok(())
    }

    fn pos(&self) -> u64 {
        self.pos
    }
}

/// A stream cipher selectable at compile time.
pub trait KnownSymmetric: Default + Copy + Send + Sync + 'static {
    const TAG: SymmetricAlgorithm;
    type Cipher: KeyIvInit + StreamCipher + StreamCipherSeek + Send + 'static;

    fn properties() -> SymmetricProperties {
        SymmetricProperties {
            algorithm: Self::TAG,
            key_size: <Self::Cipher as KeySizeUser>::KeySize::USIZE,
            iv_size: <Self::Cipher as IvSizeUser>::IvSize::USIZE,
        }
    }
}

/// Static lookup with type-checked key and IV lengths.
pub fn cipher<A: KnownSymmetric>(
    key: &Key<A::Cipher>,
    iv: &Iv<A::Cipher>,
) -> Keystream<A::Cipher> {
    Keystream::new(A::TAG, key, iv)
}

macro_rules! stream_cipher {
    ($( $(#[$meta:meta])* $name:ident => $cipher:ty, $tag:ident; )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $name;

            impl KnownSymmetric for $name {
                const TAG: SymmetricAlgorithm = SymmetricAlgorithm::$tag;
                type Cipher = $cipher;
            }
        )*
    };
}

stream_cipher! {
    /// AES-128 in big-endian 128-bit counter mode.
    Aes128Ctr => ctr::Ctr128BE<aes::Aes128>, AES128_CTR;
    /// AES-256 in big-endian 128-bit counter mode.
    Aes256Ctr => ctr::Ctr128BE<aes::Aes256>, AES256_CTR;
    ChaCha20R8 => chacha20::ChaCha8, CHACHA20_8;
    ChaCha20R12 => chacha20::ChaCha12, CHACHA20_12;
    /// IETF ChaCha20: 96-bit nonce, 32-bit block counter.
    ChaCha20R20 => chacha20::ChaCha20, CHACHA20_20;
    XChaCha20R8 => chacha20::XChaCha8, XCHACHA20_8;
    XChaCha20R12 => chacha20::XChaCha12, XCHACHA20_12;
    /// XChaCha20: 192-bit nonce.
    XChaCha20R20 => chacha20::XChaCha20, XCHACHA20_20;
}
