//! Typed views: binding raw memory to an element type and count, with
//! per-slot initialization tracking.

use std::marker::PhantomData;

use bytemuck::{AnyBitPattern, NoUninit};

use crate::block::RawBlock;
use crate::error::{Error, Result};
use crate::layout::TypeLayout;

/// Per-slot initialization tracking for a typed view.
///
/// Most views are entirely uninitialized or entirely initialized, so the
/// mask stores those two cases without a buffer and only degrades to a
/// byte per slot (nonzero = initialized) once individual slots diverge.
#[derive(Debug, Clone)]
enum InitMask {
    /// No slot holds a live value.
    Uninit(usize),
    /// Every slot holds a live value.
    Init(usize),
    /// Mixed: the byte at position `i` is nonzero when slot `i` is
    /// initialized.
    Bytes(Vec<u8>),
}

impl InitMask {
    fn new(len: usize) -> InitMask {
        InitMask::Uninit(len)
    }

    fn len(&self) -> usize {
        match self {
            Self::Uninit(len) | Self::Init(len) => *len,
            Self::Bytes(mask) => mask.len(),
        }
    }

    fn is_init(&self, index: usize) -> bool {
        match self {
            Self::Uninit(_) => false,
            Self::Init(_) => true,
            Self::Bytes(mask) => mask[index] != 0,
        }
    }

    fn set(&mut self, index: usize) {
        match self {
            Self::Init(_) => {}
            Self::Uninit(len) => {
                let mut mask = vec![0u8; *len];
                mask[index] = 1;
                *self = Self::Bytes(mask);
            }
            Self::Bytes(mask) => mask[index] = 1,
        }
    }

    fn clear(&mut self, index: usize) {
        match self {
            Self::Uninit(_) => {}
            Self::Init(len) => {
                let mut mask = vec![1u8; *len];
                mask[index] = 0;
                *self = Self::Bytes(mask);
            }
            Self::Bytes(mask) => mask[index] = 0,
        }
    }

    /// Marks slots `[0, count)` initialized.
    fn set_first(&mut self, count: usize) {
        debug_assert!(count <= self.len());
        if count == self.len() {
            *self = Self::Init(count);
            return;
        }
        match self {
            Self::Init(_) => {}
            Self::Uninit(len) => {
                let mut mask = vec![0u8; *len];
                mask[..count].fill(1);
                *self = Self::Bytes(mask);
            }
            Self::Bytes(mask) => mask[..count].fill(1),
        }
    }

    fn clear_all(&mut self) {
        *self = Self::Uninit(self.len());
    }

    fn count_init(&self) -> usize {
        match self {
            Self::Uninit(_) => 0,
            Self::Init(len) => *len,
            Self::Bytes(mask) => mask.iter().filter(|&&b| b != 0).count(),
        }
    }
}

/// A typed interpretation of a [`RawBlock`]'s bytes as `count` elements of
/// `T`, with per-slot initialization tracking.
///
/// The view borrows its backing block mutably, so a block carries at most
/// one live typed interpretation at a time and a view can never outlive
/// the block it was bound to. Binding copies nothing; stores and loads go
/// straight to the block's bytes at stride offsets.
///
/// A slot may be loaded only after it has been stored (or covered by
/// [`TypedView::initialize`]); loading anything else fails with
/// `UninitializedRead`. Overwriting a slot is always legal — the toolkit
/// does not model destructors inside `T`.
#[derive(Debug)]
pub struct TypedView<'a, T> {
    block: &'a mut RawBlock,
    layout: TypeLayout,
    count: usize,
    mask: InitMask,
    _element: PhantomData<T>,
}

impl<'a, T: NoUninit + AnyBitPattern> TypedView<'a, T> {
    /// Binds `count` elements of `T` onto `block` using `T`'s natural
    /// layout.
    ///
    /// # Errors
    ///
    /// `UseAfterFree` if the block is deallocated; `SizeMismatch` if
    /// `count * stride` exceeds the block's byte count.
    pub fn bind(block: &'a mut RawBlock, count: usize) -> Result<TypedView<'a, T>> {
        Self::bind_with_layout(block, TypeLayout::of::<T>(), count)
    }

    /// Binds with an explicit element layout, for foreign strides.
    ///
    /// In addition to the [`TypedView::bind`] checks, the layout's size
    /// must cover `T`'s representation, otherwise a store would spill
    /// into the neighboring slot.
    pub fn bind_with_layout(
        block: &'a mut RawBlock,
        layout: TypeLayout,
        count: usize,
    ) -> Result<TypedView<'a, T>> {
        if !block.is_allocated() {
            return Err(Error::use_after_free());
        }
        if layout.size() < std::mem::size_of::<T>() {
            return Err(Error::size_mismatch(std::mem::size_of::<T>(), layout.size()));
        }
        let required = layout.required_bytes(count)?;
        if required > block.byte_count() {
            return Err(Error::size_mismatch(required, block.byte_count()));
        }
        Ok(TypedView {
            block,
            layout,
            count,
            mask: InitMask::new(count),
            _element: PhantomData,
        })
    }

    /// Number of elements the view is bound to.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// The element layout the view was bound with.
    #[inline]
    pub fn layout(&self) -> TypeLayout {
        self.layout
    }

    /// Byte offset of slot `index` from the start of the block.
    ///
    /// Pure stride arithmetic with no bounds check: advancing past the
    /// end is legal, dereferencing past the end is not ([`TypedView::store`]
    /// and [`TypedView::load`] enforce the bounds).
    #[inline]
    pub fn offset_of(&self, index: usize) -> usize {
        index * self.layout.stride()
    }

    /// Writes `value` into slot `index` and marks it initialized.
    ///
    /// Overwrites any previous value.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `index >= count`.
    pub fn store(&mut self, index: usize, value: T) -> Result<()> {
        self.check_index(index)?;
        let offset = self.offset_of(index);
        self.block.store_bytes(offset, bytemuck::bytes_of(&value))?;
        self.mask.set(index);
        Ok(())
    }

    /// Loads the value in slot `index`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `index >= count`; `UninitializedRead` if the slot
    /// was never stored (or has been deinitialized).
    pub fn load(&self, index: usize) -> Result<T> {
        self.check_index(index)?;
        if !self.mask.is_init(index) {
            return Err(Error::uninitialized_read(index));
        }
        let bytes = self
            .block
            .load_bytes(self.offset_of(index), std::mem::size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Writes `value` into slots `[0, count)` and marks them initialized.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `count` exceeds the view's bound count.
    pub fn initialize(&mut self, value: T, count: usize) -> Result<()> {
        if count > self.count {
            return Err(Error::out_of_range(count, self.count));
        }
        let bytes = bytemuck::bytes_of(&value);
        for index in 0..count {
            self.block.store_bytes(self.offset_of(index), bytes)?;
        }
        self.mask.set_first(count);
        Ok(())
    }

    /// Clears the initialization bit of slot `index`. The bytes are left
    /// in place; only the tracking state is retired.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `index >= count`.
    pub fn deinitialize(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.mask.clear(index);
        Ok(())
    }

    /// Marks every slot initialized without writing anything.
    ///
    /// This is the raw-to-typed handoff: when the slots were populated
    /// through the raw layer (which tracks nothing), the caller asserts
    /// that every slot already holds a valid `T` representation. With the
    /// `AnyBitPattern` bound on `T` any byte content is a valid value, so
    /// the assertion cannot be unsound — only semantically wrong.
    pub fn assume_init_all(&mut self) {
        self.mask.set_first(self.count);
    }

    /// Clears every slot's initialization bit. Idempotent; the backing
    /// block's allocation state is untouched.
    pub fn deinitialize_all(&mut self) {
        self.mask.clear_all();
    }

    /// Whether slot `index` currently holds a live value. Out-of-range
    /// indices report `false`.
    pub fn is_initialized(&self, index: usize) -> bool {
        index < self.count && self.mask.is_init(index)
    }

    /// Number of slots currently initialized.
    pub fn initialized_count(&self) -> usize {
        self.mask.count_init()
    }

    /// The bound region's bytes (`count * stride` of them), for
    /// inspection and checksumming.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        self.block.load_bytes(0, self.count * self.layout.stride())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.count {
            return Err(Error::out_of_range(index, self.count));
        }
        Ok(())
    }
}
