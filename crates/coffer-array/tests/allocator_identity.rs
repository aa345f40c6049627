use coffer_array::{AllocError, DynArray};
use coffer_core::Propagation;
use coffer_test_utils::fixtures::{QuotaAlloc, TrackingAlloc};

#[test]
fn growth_failure_leaves_the_array_unchanged() {
    let mut array = DynArray::with_capacity_in(4, QuotaAlloc::new(1)).unwrap();
    for i in 0..4u32 {
        array.push(i).unwrap();
    }
    let block = array.data();

    let err = array.push(4).unwrap_err();
    assert!(matches!(err, AllocError::Exhausted { .. }));
    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), 4);
    assert_eq!(array.data(), block);
    assert_eq!(array.as_slice(), &[0, 1, 2, 3]);
    assert_eq!(array.allocator().requests(), 2);

    let err = array.reserve(100).unwrap_err();
    assert!(matches!(err, AllocError::Exhausted { .. }));
    assert_eq!(array.capacity(), 4);
}

#[test]
fn copy_failure_reports_without_damaging_the_source() {
    let mut array = DynArray::with_capacity_in(3, QuotaAlloc::new(1)).unwrap();
    for i in 0..3u8 {
        array.push(i).unwrap();
    }
    // The fork draws on the same budget, which is already spent.
    let err = array.try_clone().unwrap_err();
    assert!(matches!(err, AllocError::Exhausted { .. }));
    assert_eq!(array.as_slice(), &[0, 1, 2]);
}

#[test]
fn ledger_balances_across_the_container_lifecycle() {
    let alloc = TrackingAlloc::new();
    {
        let mut array = DynArray::new_in(alloc.clone());
        for i in 0..100u64 {
            array.push(i).unwrap();
        }
        // Every reallocation released the block it replaced.
        assert_eq!(alloc.live_blocks(), 1);
        assert_eq!(alloc.live_bytes(), array.capacity() * 8);

        array.shrink_to_fit().unwrap();
        assert_eq!(alloc.live_bytes(), 800);

        let copy = array.try_clone().unwrap();
        assert_eq!(alloc.live_blocks(), 2);
        drop(copy);
        assert_eq!(alloc.live_blocks(), 1);
    }
    assert_eq!(alloc.live_blocks(), 0);
    assert_eq!(alloc.allocated(), alloc.released());
}

#[test]
fn zero_sized_elements_never_touch_the_strategy() {
    let alloc = TrackingAlloc::new();
    let mut array = DynArray::new_in(alloc.clone());
    for _ in 0..50 {
        array.push(()).unwrap();
    }
    array.pop();
    array.clear();
    array.shrink_to_fit().unwrap();
    assert_eq!(alloc.allocated(), 0);
}

#[test]
fn copies_fork_onto_the_same_ledger() {
    let alloc = TrackingAlloc::new();
    let array = DynArray::from_slice_in(&[1, 2, 3], alloc.clone()).unwrap();
    let copy = array.try_clone().unwrap();
    assert!(copy.allocator().shares_ledger(array.allocator()));
    assert_eq!(alloc.live_blocks(), 2);
}

#[test]
fn copy_assignment_adopts_the_source_allocator_when_flagged() {
    let policy = Propagation {
        on_copy_assign: true,
        on_swap: false,
    };
    let source_alloc = TrackingAlloc::with_policy(policy);
    let dest_alloc = TrackingAlloc::with_policy(policy);
    let source = DynArray::from_slice_in(&[1u32, 2, 3, 4], source_alloc.clone()).unwrap();
    let mut dest = DynArray::from_slice_in(&[9u32; 8], dest_alloc.clone()).unwrap();
    assert_eq!(dest_alloc.live_blocks(), 1);

    dest.try_clone_from(&source).unwrap();
    assert_eq!(dest.as_slice(), &[1, 2, 3, 4]);
    // The outgoing instance released its own block before the adopted
    // one supplied the replacement.
    assert_eq!(dest_alloc.live_blocks(), 0);
    assert_eq!(source_alloc.live_blocks(), 2);
    assert!(dest.allocator().shares_ledger(&source_alloc));
}

#[test]
fn copy_assignment_keeps_the_allocator_by_default() {
    let source_alloc = TrackingAlloc::new();
    let dest_alloc = TrackingAlloc::new();
    let source = DynArray::from_slice_in(&[1u32, 2], source_alloc.clone()).unwrap();
    let mut dest = DynArray::new_in(dest_alloc.clone());

    dest.try_clone_from(&source).unwrap();
    assert_eq!(dest.as_slice(), &[1, 2]);
    assert!(dest.allocator().shares_ledger(&dest_alloc));
    assert_eq!(dest_alloc.live_blocks(), 1);
    assert_eq!(source_alloc.live_blocks(), 1);
}

#[test]
fn swap_exchanges_allocators_when_flagged() {
    let policy = Propagation {
        on_copy_assign: false,
        on_swap: true,
    };
    let alloc_a = TrackingAlloc::with_policy(policy);
    let alloc_b = TrackingAlloc::with_policy(policy);
    let mut a = DynArray::from_slice_in(&[1u8], alloc_a.clone()).unwrap();
    let mut b = DynArray::from_slice_in(&[2u8, 3], alloc_b.clone()).unwrap();

    a.swap(&mut b);
    assert_eq!(a.as_slice(), &[2, 3]);
    assert!(a.allocator().shares_ledger(&alloc_b));
    assert!(b.allocator().shares_ledger(&alloc_a));

    // Blocks and allocators travelled together, so teardown balances.
    drop(a);
    drop(b);
    assert_eq!(alloc_a.live_blocks(), 0);
    assert_eq!(alloc_b.live_blocks(), 0);
}

#[test]
fn swap_within_one_ledger_needs_no_propagation() {
    let alloc = TrackingAlloc::new();
    let mut a = DynArray::from_slice_in(&[1u8], alloc.clone()).unwrap();
    let mut b = DynArray::from_slice_in(&[2u8, 3], alloc.clone()).unwrap();
    a.swap(&mut b);
    assert_eq!(a.as_slice(), &[2, 3]);
    assert_eq!(b.as_slice(), &[1]);
    assert_eq!(alloc.live_blocks(), 2);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "non-interchangeable")]
fn swap_without_propagation_rejects_foreign_allocators() {
    let mut a = DynArray::from_slice_in(&[1u8], TrackingAlloc::new()).unwrap();
    let mut b = DynArray::from_slice_in(&[2u8], TrackingAlloc::new()).unwrap();
    a.swap(&mut b);
}

#[test]
fn quota_is_shared_across_forks() {
    let alloc = QuotaAlloc::new(4);
    let array = DynArray::from_slice_in(&[7u16; 10], alloc.clone()).unwrap();
    let first = array.try_clone().unwrap();
    let second = array.try_clone().unwrap();
    let third = array.try_clone().unwrap();
    assert!(array.try_clone().is_err());
    assert_eq!(alloc.requests(), 5);
    assert_eq!((first.len(), second.len(), third.len()), (10, 10, 10));
}

#[test]
fn arrays_transfer_across_threads() {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        let mut array = DynArray::new();
        for i in 0..32u64 {
            array.push(i * 3).unwrap();
        }
        tx.send(array).unwrap();
    });
    let received = rx.recv().unwrap();
    assert_eq!(received.len(), 32);
    assert_eq!(received[31], 93);
}

#[test]
fn shared_reads_split_across_scoped_threads() {
    let array = DynArray::from_iter_exact(0..1024u32).unwrap();
    let total = std::thread::scope(|scope| {
        let front = scope.spawn(|| array.as_slice()[..512].iter().sum::<u32>());
        let back = scope.spawn(|| array.as_slice()[512..].iter().sum::<u32>());
        front.join().unwrap() + back.join().unwrap()
    });
    assert_eq!(total, (0..1024u32).sum::<u32>());
}
