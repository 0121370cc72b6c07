use sha2::{Digest, Sha256};

#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(data);
    h.finalize().into()
}

/// SHA-256 applied twice.
#[inline]
pub fn hash256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// First four bytes of `hash256(data)` read as a little-endian `u32`.
#[inline]
pub fn checksum(data: &[u8]) -> u32 {
    let digest = hash256(data);
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}
