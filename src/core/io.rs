//! Positioned block reads over any random-access byte source.

use std::io::{self, Cursor, Read};

/// A source of raw block data, typically a disk or image file.
///
/// The sampler only ever reads through this trait, so the same logic
/// runs against block devices, image files and in-memory images.
pub trait BlockSource {
    /// Reads up to `buffer.len()` bytes starting at `offset`.
    ///
    /// Returns the number of bytes read, which may be less than the buffer
    /// length at the end of the source. Returns 0 at or past the end.
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> io::Result<usize>;

    /// Returns the total size of the source in bytes.
    fn size(&self) -> u64;

    /// Number of whole blocks of `block_size` bytes. A trailing partial block is not counted.
    fn block_count(&self, block_size: usize) -> u64 {
        if block_size == 0 {
            return 0;
        }
        self.size() / block_size as u64
    }
}

impl<T: AsRef<[u8]>> BlockSource for Cursor<T> {
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> io::Result<usize> {
        self.set_position(offset);
        self.read(buffer)
    }

    fn size(&self) -> u64 {
        self.get_ref().as_ref().len() as u64
    }
}

/// Reads block `index` into `buffer`, whose length is the block size.
///
/// Keeps reading until the buffer is full or the source reports end of
/// data, so a short count always means the block could not be read whole.
/// Interrupted reads are retried.
///
/// # Arguments
///
/// * `source` - Device or image to read from
/// * `index` - Block number; the byte offset is `index * buffer.len()`
/// * `buffer` - Destination, exactly one block long
///
/// # Returns
///
/// The number of bytes read, which is less than `buffer.len()` only when
/// the source ran out of data. Fails if the offset overflows `u64` or the
/// source reports an I/O error.
///
/// # Example
///
/// ```ignore
/// let mut buffer = vec![0u8; 4096];
/// let n = read_block(&mut reader, 7, &mut buffer)?;
/// let whole = n == buffer.len();
/// ```
pub fn read_block<S: BlockSource + ?Sized>(
    source: &mut S,
    index: u64,
    buffer: &mut [u8],
) -> io::Result<usize> {
    let offset = index.checked_mul(buffer.len() as u64).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("block {index} lies beyond the addressable range"),
        )
    })?;

    let mut filled = 0usize;
    while filled < buffer.len() {
        match source.read_chunk(offset + filled as u64, &mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
