//! File-backed shared memory for an external viewer process

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::{MmapMut, MmapOptions};
use papyrus_core::PanelSize;

use super::{region_len, SharedMemory};

/// Writable mapping of a file, typically under `/dev/shm`
pub struct FileRegion {
    mmap: MmapMut,
    path: PathBuf,
}

impl FileRegion {
    /// Create (or reuse) the file at `path` sized for `size` and map it
    pub fn create(path: impl AsRef<Path>, size: PanelSize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let len = region_len(size);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;
        if (file.metadata()?.len() as usize) < len {
            file.set_len(len as u64)?;
        }

        // SAFETY: the mapping is owned by this value and only accessed as
        // plain bytes; the viewer process reads it concurrently, which can
        // tear pixels but never violates memory safety on our side.
        #[allow(unsafe_code)]
        let mmap = unsafe { MmapOptions::new().len(len).map_mut(&file)? };

        Ok(Self { mmap, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush the mapping to the backing file
    pub fn flush(&self) -> io::Result<()> {
        self.mmap.flush()
    }
}

impl SharedMemory for FileRegion {
    fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.mmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedDisplay;
    use embassy_futures::block_on;
    use papyrus_core::{DisplayBackend, Frame, RefreshMode};

    #[test]
    fn test_file_region_visible_to_readers() {
        let path = std::env::temp_dir().join(format!("papyrus-sim-{}", std::process::id()));
        let size = PanelSize::new(4, 2);

        let region = FileRegion::create(&path, size).unwrap();
        let mut sim = SimulatedDisplay::new(region, size).unwrap();
        block_on(sim.reset_and_init()).unwrap();
        let buffer = [0x09u8; 8];
        let frame = Frame::new(0, 0, 4, 2);
        block_on(sim.show_image(&[frame], frame, &buffer, RefreshMode::Fast)).unwrap();
        let region = sim.into_inner();
        region.flush().unwrap();

        let on_disk = std::fs::read(region.path()).unwrap();
        assert_eq!(on_disk.len(), region_len(size));
        assert_eq!(&on_disk[..4], &1u32.to_le_bytes());
        assert!(on_disk[12..20].iter().all(|&p| p == 0x09));

        drop(region);
        let _ = std::fs::remove_file(&path);
    }
}
