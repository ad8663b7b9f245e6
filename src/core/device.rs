use super::error::{Result, SampleError};
use super::io::BlockSource;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Read-only access to a block device or disk image.
///
/// The device is opened once per scan and closed when the reader is
/// dropped. Nothing here ever writes to the device.
///
/// # Example
///
/// ```ignore
/// let mut reader = DiskReader::open("/dev/sdb")?;
/// let mut buffer = vec![0u8; 4096];
/// let n = reader.read_chunk(0, &mut buffer)?;
/// ```
pub struct DiskReader {
    file: File,
    path: PathBuf,
    size: u64,
}

impl DiskReader {
    /// Opens `path` for reading and measures its length.
    ///
    /// On Linux the kernel is told to expect random access.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the block device or image file to sample
    ///
    /// # Returns
    ///
    /// A `Result` containing the `DiskReader` on success, or
    /// `SampleError::DeviceOpen` if:
    /// - The file/device does not exist
    /// - Permission is denied
    /// - The device size cannot be determined
    ///
    /// # Example
    ///
    /// ```ignore
    /// let reader = DiskReader::open("/dev/sdb")?;
    /// let blocks = reader.block_count(4096);
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open_error = |source: io::Error| SampleError::DeviceOpen {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .write(false)
            .open(path)
            .map_err(open_error)?;

        #[cfg(target_os = "linux")]
        {
            use rustix::fs::{Advice, fadvise};

            // Sampled reads jump across the whole device; readahead is wasted.
            let _ = fadvise(&file, 0, None, Advice::Random);
        }

        let size = file.seek(SeekFrom::End(0)).map_err(open_error)?;
        file.seek(SeekFrom::Start(0)).map_err(open_error)?;

        tracing::debug!("Opened {} ({} bytes)", path.display(), size);

        Ok(Self {
            file,
            path: path.to_path_buf(),
            size,
        })
    }

    /// Path the reader was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BlockSource for DiskReader {
    fn read_chunk(&mut self, offset: u64, buffer: &mut [u8]) -> io::Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read(buffer)
    }

    #[inline]
    fn size(&self) -> u64 {
        self.size
    }
}
