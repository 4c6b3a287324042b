//! Same FNV-1a content hash as `tsassert-model`, kept as an independent
//! copy rather than a shared dependency: the IR's hash space is its
//! own (an `IrHash` and a `TypeHash` are never compared), and this
//! keeps the two crates decoupled from a shared hashing utility crate
//! neither other workspace member needs.

use crate::ir::IrHash;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

pub fn hash_str(s: &str) -> IrHash {
    let mut h = FNV_OFFSET;
    for byte in s.as_bytes() {
        h ^= *byte as u64;
        h = h.wrapping_mul(FNV_PRIME);
    }
    IrHash(h)
}
