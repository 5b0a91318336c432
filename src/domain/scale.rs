//! Bit-depth rescaling of raw peripheral blocks
//!
//! The capture peripheral delivers 12-bit samples left-packed into 2-byte
//! little-endian slots. Each input sample is replaced in place by a zero
//! byte followed by the sample magnitude scaled down to 8 bits, so the
//! output stays byte-for-byte the same length as the input. Downstream
//! players consume the file as 16-bit PCM; do not change this packing
//! without confirming what the collector expects.

/// Rescale one raw block. Output length equals input length
/// (a trailing odd byte, if any, is dropped).
pub fn scale_block(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for pair in input.chunks_exact(2) {
        let value = (((pair[1] & 0x0f) as u32) << 8) | pair[0] as u32;
        out.push(0);
        out.push((value * 256 / 2048) as u8);
    }
    out
}
