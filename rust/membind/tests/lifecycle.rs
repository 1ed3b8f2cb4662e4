//! End-to-end lifecycle scenarios: raw cycles, typed cycles, punning,
//! and digesting a composite value's bytes.

use membind::{BlockState, ErrorKind, RawBlock, TypeLayout, TypedView, checksum, inspect};

/// A 4-byte counter followed by a 1-byte flag, padded out to an 8-byte
/// stride under its natural alignment.
#[derive(Clone, Copy, bytemuck::NoUninit)]
#[repr(C)]
struct Header {
    count: u32,
    flag: bool,
    _pad: [u8; 3],
}

impl Header {
    fn layout() -> TypeLayout {
        TypeLayout::new(5, 4, 8).unwrap()
    }
}

#[test]
fn raw_cycle() {
    let mut block = RawBlock::allocate(16, 8).unwrap();
    block.store_bytes(0, &0x1122_3344_5566_7788u64.to_le_bytes()).unwrap();
    assert_eq!(
        block.load_bytes(0, 8).unwrap(),
        &0x1122_3344_5566_7788u64.to_le_bytes()
    );
    block.deallocate().unwrap();
    assert_eq!(block.state(), BlockState::Deallocated);
}

#[test]
fn typed_cycle() {
    // 16 bytes, stride 8, alignment 8, count 2.
    let mut block = RawBlock::allocate(16, 8).unwrap();
    {
        let mut view = TypedView::<u64>::bind(&mut block, 2).unwrap();
        view.store(0, 42).unwrap();
        view.store(1, 6).unwrap();
        assert_eq!(view.load(0).unwrap(), 42);
        assert_eq!(view.load(1).unwrap(), 6);
        view.deinitialize_all();
        assert_eq!(view.initialized_count(), 0);
    }
    block.deallocate().unwrap();
}

#[test]
fn punning_cycle() {
    // Store native-endian bytes through the raw layer, then bind the
    // same memory as typed elements.
    let mut block = RawBlock::allocate(16, 8).unwrap();
    block.store_bytes(0, &42u64.to_ne_bytes()).unwrap();
    block.store_bytes(8, &6u64.to_ne_bytes()).unwrap();

    let mut view = TypedView::<u64>::bind(&mut block, 2).unwrap();
    // The raw layer tracked nothing, so the typed layer still treats the
    // slots as uninitialized until the caller vouches for them.
    assert!(matches!(
        view.load(0).unwrap_err().kind(),
        ErrorKind::UninitializedRead { index: 0 }
    ));
    view.assume_init_all();
    assert_eq!(view.load(0).unwrap(), 42);
    assert_eq!(view.load(1).unwrap(), 6);
    assert_eq!(view.offset_of(1), 8);
}

#[test]
fn composite_digest_is_reproducible() {
    let value = Header {
        count: 25,
        flag: true,
        _pad: [0; 3],
    };
    let layout = Header::layout();

    let bytes = inspect::bytes_of_sized(&value, &layout);
    assert_eq!(bytes.len(), layout.size());
    let mut expected = value.count.to_ne_bytes().to_vec();
    expected.push(value.flag as u8);
    assert_eq!(bytes, &expected[..]);

    let digest = checksum::compute(bytes);
    assert_eq!(digest, !26u32);
    assert_eq!(digest, checksum::compute(inspect::bytes_of_sized(&value, &layout)));
    checksum::validate_buffer(bytes, digest, Some("header")).unwrap();
}

#[test]
fn bind_rejects_oversized_count() {
    // An 8-byte block cannot carry two elements of stride 8.
    let mut block = RawBlock::allocate(8, 8).unwrap();
    let err = TypedView::<u64>::bind(&mut block, 2).unwrap_err();
    assert!(matches!(
        err.kind(),
        ErrorKind::SizeMismatch {
            required: 16,
            available: 8
        }
    ));
    // The exact fit binds.
    assert!(TypedView::<u64>::bind(&mut block, 1).is_ok());
}

#[test]
fn allocate_rejects_invalid_arguments() {
    assert!(matches!(
        RawBlock::allocate(0, 8).unwrap_err().kind(),
        ErrorKind::InvalidSize { size: 0 }
    ));
    assert!(matches!(
        RawBlock::allocate(16, 3).unwrap_err().kind(),
        ErrorKind::InvalidAlignment { alignment: 3 }
    ));
}

#[test]
fn allocate_deallocate_over_valid_pairs() {
    for byte_count in [1, 7, 16, 255, 4096] {
        for alignment in [1, 2, 4, 8, 64, 256] {
            let mut block = RawBlock::allocate(byte_count, alignment).unwrap();
            block.deallocate().unwrap();
        }
    }
}

#[test]
fn checksum_deterministic_over_random_input() {
    fastrand::seed(7);
    for _ in 0..32 {
        let len = fastrand::usize(0..512);
        let buf: Vec<u8> = (0..len).map(|_| fastrand::u8(..)).collect();
        assert_eq!(checksum::compute(&buf), checksum::compute(&buf));

        if !buf.is_empty() {
            // Any single-byte change shifts the sum, so the digest moves.
            let mut altered = buf.clone();
            altered[0] = altered[0].wrapping_add(1);
            assert_ne!(checksum::compute(&buf), checksum::compute(&altered));
        }
    }
}

#[test]
fn view_bytes_feed_the_checksum() {
    let mut block = RawBlock::allocate_zeroed(16, 8).unwrap();
    let mut view = TypedView::<u64>::bind(&mut block, 2).unwrap();
    view.store(0, 42).unwrap();
    view.store(1, 6).unwrap();
    let digest = checksum::compute(view.as_bytes().unwrap());
    assert_eq!(digest, !(42u32 + 6));
}

#[test]
fn error_paths_propagate_through_scopes() {
    // Early exit via `?` still releases the block through Drop.
    fn inner() -> membind::Result<u64> {
        let mut block = RawBlock::allocate(8, 8)?;
        let mut view = TypedView::<u64>::bind(&mut block, 1)?;
        view.store(0, 1)?;
        view.load(1)?; // OutOfRange: propagates, block dropped cleanly
        Ok(0)
    }
    let err = inner().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::OutOfRange { index: 1, count: 1 }));
}
