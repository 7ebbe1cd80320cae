//! Payload cryptography: the symmetric block cipher and the RSA public
//! key buffer exchanged during the handshake.

use std::fmt;

use blowfish::Blowfish;
use blowfish::cipher::generic_array::GenericArray;
use blowfish::cipher::{BlockDecrypt, BlockEncrypt};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::ProtocolError;

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 8;

/// Accepted symmetric key lengths (the full Blowfish key schedule).
pub const MIN_KEY_LEN: usize = 4;
pub const MAX_KEY_LEN: usize = 72;

/// Modulus size of handshake keys.
pub const RSA_KEY_BITS: usize = 512;

/// Width of the modulus and exponent fields in a key buffer.
pub const RSA_FIELD_LEN: usize = 128;

/// Total length of a serialized RSA public key buffer.
pub const RSA_KEY_BUFFER_LEN: usize = 4 + 2 * RSA_FIELD_LEN;

// ---------------------------------------------------------------------------
// SymmetricKey
// ---------------------------------------------------------------------------

/// A Blowfish key. ECB over big-endian blocks, zero padded to the block
/// size. Key bytes are wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: Vec<u8>,
}

impl SymmetricKey {
    pub fn new(bytes: Vec<u8>) -> Result<Self, ProtocolError> {
        if !(MIN_KEY_LEN..=MAX_KEY_LEN).contains(&bytes.len()) {
            let len = bytes.len();
            let mut bytes = bytes;
            bytes.zeroize();
            return Err(ProtocolError::InvalidKeyLength(len));
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encrypts `data`, zero padding the last block.
    pub fn encrypt(&self, data: &[u8]) -> Vec<u8> {
        let cipher = self.cipher();
        let mut out = data.to_vec();
        let padded = out.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        out.resize(padded, 0);

        for block in out.chunks_exact_mut(BLOCK_SIZE) {
            cipher.encrypt_block(GenericArray::from_mut_slice(block));
        }
        out
    }

    /// Decrypts whole blocks. Padding is left in place for the value
    /// decoder to skip.
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        if data.len() % BLOCK_SIZE != 0 {
            return Err(ProtocolError::BlockLength(data.len()));
        }

        let cipher = self.cipher();
        let mut out = data.to_vec();
        for block in out.chunks_exact_mut(BLOCK_SIZE) {
            cipher.decrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(out)
    }

    // `KeyInit` caps keys at 56 bytes; the schedule itself cycles the key
    // over all 18 subkeys, which is what peers with longer keys expect.
    fn cipher(&self) -> Blowfish {
        let mut cipher = Blowfish::bc_init_state();
        cipher.bc_expand_key(&self.bytes);
        cipher
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetricKey({} bytes)", self.bytes.len())
    }
}

// ---------------------------------------------------------------------------
// RSA key buffer
// ---------------------------------------------------------------------------

/// Serializes a public key as `u32 LE bits | modulus BE | exponent BE`,
/// each number left-padded to 128 bytes.
pub fn public_key_to_buffer(key: &RsaPublicKey) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::with_capacity(RSA_KEY_BUFFER_LEN);
    buf.extend_from_slice(&(RSA_KEY_BITS as u32).to_le_bytes());
    write_field(&mut buf, key.n())?;
    write_field(&mut buf, key.e())?;
    Ok(buf)
}

/// Parses a key buffer. The leading bit-count field is not checked; only
/// the layout length is.
pub fn public_key_from_buffer(buf: &[u8]) -> Result<RsaPublicKey, ProtocolError> {
    if buf.len() < RSA_KEY_BUFFER_LEN {
        return Err(ProtocolError::MalformedKeyBuffer { len: buf.len() });
    }

    let modulus = &buf[4..4 + RSA_FIELD_LEN];
    let exponent = &buf[4 + RSA_FIELD_LEN..RSA_KEY_BUFFER_LEN];
    let key = RsaPublicKey::new(
        BigUint::from_bytes_be(modulus),
        BigUint::from_bytes_be(exponent),
    )?;
    Ok(key)
}

fn write_field(buf: &mut Vec<u8>, value: &BigUint) -> Result<(), ProtocolError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > RSA_FIELD_LEN {
        return Err(ProtocolError::MalformedKeyBuffer { len: bytes.len() });
    }
    buf.resize(buf.len() + RSA_FIELD_LEN - bytes.len(), 0);
    buf.extend_from_slice(&bytes);
    Ok(())
}
