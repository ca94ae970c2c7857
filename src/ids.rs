// src/ids.rs
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// 15 bytes encode to exactly 20 url-safe characters, about the length of a
/// hosted document-store auto id.
pub const DEFAULT_ID_BYTES: usize = 15;

/// Opaque document id from the OS RNG.
pub fn new_id() -> String {
    let mut rng = OsRng;
    generate_id(&mut rng, DEFAULT_ID_BYTES)
}

pub fn generate_id<R: RngCore>(rng: &mut R, nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rng.fill_bytes(&mut buf);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&buf)
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
