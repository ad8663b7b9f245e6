//! Block fill verification.

/// Returns true if every byte of `block` equals `target`.
///
/// Stops at the first differing byte. An empty block matches vacuously.
#[inline]
pub fn block_matches(block: &[u8], target: u8) -> bool {
    block.iter().all(|&b| b == target)
}

/// Offset of the first byte in `block` that differs from `target`.
pub fn first_mismatch(block: &[u8], target: u8) -> Option<usize> {
    block.iter().position(|&b| b != target)
}
