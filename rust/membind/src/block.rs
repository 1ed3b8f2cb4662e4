//! Raw memory blocks: aligned heap allocation with an explicit lifecycle.

use std::alloc;
use std::ptr::NonNull;

use crate::error::{Error, Result};

/// Lifecycle state of a [`RawBlock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockState {
    /// The block owns live memory.
    Allocated,
    /// The block has been released; only state inspection remains legal.
    Deallocated,
}

/// A single contiguous, address-stable heap allocation with explicit
/// alignment and a caller-driven lifecycle.
///
/// A block is allocated exactly once and deallocated exactly once. After
/// [`RawBlock::deallocate`] every operation except state inspection fails
/// with `UseAfterFree`, and a second `deallocate` fails with `DoubleFree`.
/// Dropping a still-allocated block releases it, so early returns and
/// propagated errors cannot leak the allocation; the explicit
/// `deallocate` call remains the state-checked way to retire a block.
///
/// The raw layer checks bounds and lifecycle only. It does not track
/// initialization and does not require aligned offsets; typed,
/// initialization-checked access is the job of
/// [`TypedView`](crate::view::TypedView).
pub struct RawBlock {
    /// Start of the allocated region.
    ptr: NonNull<u8>,
    /// Size of the region in bytes.
    byte_count: usize,
    /// Alignment the allocation was made with.
    alignment: usize,
    state: BlockState,
}

impl RawBlock {
    /// Allocates `byte_count` bytes aligned to `alignment`.
    ///
    /// The contents of the returned block are unspecified (not zeroed);
    /// use [`RawBlock::allocate_zeroed`] when a cleared block is needed.
    ///
    /// # Errors
    ///
    /// * `InvalidAlignment` — `alignment` is not a power of two.
    /// * `InvalidSize` — `byte_count` is zero or exceeds the allocator's
    ///   layout limit.
    /// * `AllocationFailed` — the system allocator returned null.
    pub fn allocate(byte_count: usize, alignment: usize) -> Result<RawBlock> {
        let layout = Self::alloc_layout(byte_count, alignment)?;
        let ptr = unsafe { alloc::alloc(layout) };
        Self::from_raw_alloc(ptr, byte_count, alignment)
    }

    /// Allocates a zero-filled block. Same contract as
    /// [`RawBlock::allocate`] otherwise.
    pub fn allocate_zeroed(byte_count: usize, alignment: usize) -> Result<RawBlock> {
        let layout = Self::alloc_layout(byte_count, alignment)?;
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        Self::from_raw_alloc(ptr, byte_count, alignment)
    }

    fn alloc_layout(byte_count: usize, alignment: usize) -> Result<alloc::Layout> {
        if !alignment.is_power_of_two() {
            return Err(Error::invalid_alignment(alignment));
        }
        if byte_count == 0 {
            return Err(Error::invalid_size(0));
        }
        alloc::Layout::from_size_align(byte_count, alignment)
            .map_err(|_| Error::invalid_size(byte_count))
    }

    fn from_raw_alloc(ptr: *mut u8, byte_count: usize, alignment: usize) -> Result<RawBlock> {
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(Error::allocation_failed(byte_count));
        };
        debug_assert!((ptr.as_ptr() as usize).is_multiple_of(alignment));
        log::trace!("allocated block of {byte_count} bytes, alignment {alignment}");
        Ok(RawBlock {
            ptr,
            byte_count,
            alignment,
            state: BlockState::Allocated,
        })
    }

    /// Size of the block in bytes.
    #[inline]
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    /// Alignment the block was allocated with.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Current lifecycle state. Legal to query even after deallocation.
    #[inline]
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Whether the block still owns live memory.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.state == BlockState::Allocated
    }

    /// Start address of the region.
    ///
    /// The address is unique only while the block is live; after
    /// deallocation it is a dangling value kept for diagnostics.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Writes `bytes` at `offset` within the block.
    ///
    /// The raw layer permits unaligned offsets.
    ///
    /// # Errors
    ///
    /// `UseAfterFree` if the block is deallocated; `OutOfBounds` if
    /// `offset + bytes.len()` exceeds the block size. A failed store
    /// leaves the block contents untouched.
    pub fn store_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        self.range_mut(offset, bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Reads `len` bytes starting at `offset`.
    ///
    /// Raw memory carries no initialization tracking: reading a range
    /// that was never stored is legal here and returns whatever the
    /// allocator handed out.
    ///
    /// # Errors
    ///
    /// `UseAfterFree` if the block is deallocated; `OutOfBounds` if the
    /// range exceeds the block size.
    pub fn load_bytes(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.range(offset, len)
    }

    /// Writes `value`'s raw representation at `offset`.
    ///
    /// Unaligned offsets are permitted; same checks as
    /// [`RawBlock::store_bytes`].
    pub fn store<T: bytemuck::NoUninit>(&mut self, offset: usize, value: T) -> Result<()> {
        self.store_bytes(offset, bytemuck::bytes_of(&value))
    }

    /// Reads a `T` from `offset`, tolerating unaligned offsets.
    ///
    /// Same checks as [`RawBlock::load_bytes`].
    pub fn load<T: bytemuck::AnyBitPattern>(&self, offset: usize) -> Result<T> {
        let bytes = self.range(offset, std::mem::size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// The block's entire contents as a byte slice.
    ///
    /// # Errors
    ///
    /// `UseAfterFree` if the block is deallocated.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        self.range(0, self.byte_count)
    }

    /// The block's entire contents as a mutable byte slice.
    ///
    /// # Errors
    ///
    /// `UseAfterFree` if the block is deallocated.
    pub fn as_bytes_mut(&mut self) -> Result<&mut [u8]> {
        self.range_mut(0, self.byte_count)
    }

    /// Releases the block's memory. The sole valid terminal transition.
    ///
    /// # Errors
    ///
    /// `DoubleFree` if the block was already deallocated; the terminal
    /// state is left unchanged.
    pub fn deallocate(&mut self) -> Result<()> {
        match self.state {
            BlockState::Deallocated => Err(Error::double_free()),
            BlockState::Allocated => {
                unsafe { self.release() };
                Ok(())
            }
        }
    }

    /// # Safety
    ///
    /// The block must be in the `Allocated` state.
    unsafe fn release(&mut self) {
        debug_assert_eq!(self.state, BlockState::Allocated);
        // The size/alignment pair was validated when the block was
        // allocated, so the layout is reconstructible without re-checking.
        let layout =
            unsafe { alloc::Layout::from_size_align_unchecked(self.byte_count, self.alignment) };
        unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) };
        self.state = BlockState::Deallocated;
        log::trace!("deallocated block of {} bytes", self.byte_count);
    }

    fn check_live(&self) -> Result<()> {
        match self.state {
            BlockState::Allocated => Ok(()),
            BlockState::Deallocated => Err(Error::use_after_free()),
        }
    }

    fn check_bounds(&self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.byte_count => Ok(()),
            _ => Err(Error::out_of_bounds(offset, len, self.byte_count)),
        }
    }

    fn range(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.check_live()?;
        self.check_bounds(offset, len)?;
        // SAFETY: the block is live and the range is in bounds.
        Ok(unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().add(offset), len) })
    }

    fn range_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        self.check_live()?;
        self.check_bounds(offset, len)?;
        // SAFETY: the block is live, the range is in bounds, and `&mut
        // self` guarantees exclusive access.
        Ok(unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(offset), len) })
    }
}

impl Drop for RawBlock {
    /// Releases a still-allocated block so that every exit path of the
    /// owning scope frees exactly once.
    fn drop(&mut self) {
        if self.state == BlockState::Allocated {
            unsafe { self.release() };
        }
    }
}

impl std::fmt::Debug for RawBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawBlock")
            .field("ptr", &self.ptr)
            .field("byte_count", &self.byte_count)
            .field("alignment", &self.alignment)
            .field("state", &self.state)
            .finish()
    }
}
