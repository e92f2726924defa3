//! Shared-memory pixel buffer
//!
//! A memfd sized for the bordered extent, mapped read/write and registered
//! with `wl_shm` as a single ARGB8888 buffer. The buffer is allocated once
//! and never resized.

use std::ffi::CStr;
use std::fs::File;
use std::os::fd::AsFd;

use memmap2::{MmapMut, MmapOptions};
use nix::sys::memfd::{memfd_create, MemFdCreateFlag};
use tracing::debug;
use wayland_client::{
    protocol::{wl_buffer, wl_shm, wl_shm_pool},
    Dispatch, QueueHandle,
};

use crate::domain::{BorderedRect, OverlayError, PixelCanvas};

const MEMFD_NAME: &CStr = c"border-overlay";

/// Owned shared pixel buffer.
///
/// Dropping it destroys the `wl_buffer`, then unmaps the region, then
/// closes the descriptor.
pub struct SharedPixelBuffer {
    extent: BorderedRect,
    buffer: wl_buffer::WlBuffer,
    // Declared before `file` so the mapping goes away first
    mmap: MmapMut,
    file: File,
}

impl SharedPixelBuffer {
    /// Allocate and register a buffer for `extent`
    pub fn allocate<D>(
        shm: &wl_shm::WlShm,
        extent: BorderedRect,
        qh: &QueueHandle<D>,
    ) -> Result<Self, OverlayError>
    where
        D: Dispatch<wl_shm_pool::WlShmPool, ()> + Dispatch<wl_buffer::WlBuffer, ()> + 'static,
    {
        let len = extent.byte_len();
        let pool_len = i32::try_from(len).map_err(|_| {
            OverlayError::AllocationFailed(format!("{} bytes exceeds the wl_shm pool limit", len))
        })?;

        let (file, mmap) = map_region(len)?;

        let pool = shm.create_pool(file.as_fd(), pool_len, qh, ());
        let buffer = pool.create_buffer(
            0,
            extent.width(),
            extent.height(),
            extent.stride(),
            wl_shm::Format::Argb8888,
            qh,
            (),
        );
        // The buffer keeps the pool's memory alive
        pool.destroy();

        debug!(
            width = extent.width(),
            height = extent.height(),
            stride = extent.stride(),
            bytes = len,
            "Allocated shared pixel buffer"
        );

        Ok(Self {
            extent,
            buffer,
            mmap,
            file,
        })
    }

    pub fn wl_buffer(&self) -> &wl_buffer::WlBuffer {
        &self.buffer
    }

    /// Size of the shared region in bytes
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// The mapped region as `width * height` pixel cells
    pub fn canvas(&mut self) -> Result<PixelCanvas<'_>, OverlayError> {
        let (width, height) = (self.extent.width() as usize, self.extent.height() as usize);
        PixelCanvas::new(&mut self.mmap[..], width, height).ok_or_else(|| {
            OverlayError::AllocationFailed("mapping is smaller than the buffer extent".into())
        })
    }
}

impl Drop for SharedPixelBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
        debug!(fd = ?self.file.as_fd(), "Releasing shared pixel buffer");
    }
}

/// Create, size and map an anonymous close-on-exec region.
///
/// Anything acquired before a failing step is released when its owner drops.
fn map_region(len: usize) -> Result<(File, MmapMut), OverlayError> {
    let fd = memfd_create(MEMFD_NAME, MemFdCreateFlag::MFD_CLOEXEC)
        .map_err(|e| OverlayError::AllocationFailed(format!("memfd_create: {}", e)))?;
    let file = File::from(fd);

    file.set_len(len as u64)
        .map_err(|e| OverlayError::AllocationFailed(format!("ftruncate: {}", e)))?;

    // SAFETY: the memfd is private to this process and the compositor, which
    // only reads it; it is never truncated after this point.
    let mmap = unsafe { MmapOptions::new().len(len).map_mut(&file) }
        .map_err(|e| OverlayError::AllocationFailed(format!("mmap: {}", e)))?;

    Ok((file, mmap))
}
