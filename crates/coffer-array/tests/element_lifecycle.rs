use std::panic::{catch_unwind, AssertUnwindSafe};

use coffer_array::DynArray;
use coffer_test_utils::{CloneFuse, DropTally};

#[test]
fn every_constructed_element_is_destroyed_exactly_once() {
    let tally = DropTally::new();
    {
        let mut array = DynArray::new();
        for id in 0..100 {
            array.push(tally.make(id)).unwrap();
        }
        assert_eq!(tally.live(), 100);
    }
    assert_eq!(tally.created(), 100);
    assert_eq!(tally.dropped(), 100);
    assert_eq!(tally.live(), 0);
}

#[test]
fn growth_moves_elements_without_reconstructing_them() {
    let tally = DropTally::new();
    let mut array = DynArray::new();
    for id in 0..64 {
        array.push(tally.make(id)).unwrap();
    }
    // Reallocations carried elements bitwise: no clone, no drop.
    assert_eq!(tally.created(), 64);
    assert_eq!(tally.dropped(), 0);
    drop(array);
    assert_eq!(tally.live(), 0);
}

#[test]
fn clear_and_truncate_destroy_the_right_elements() {
    let tally = DropTally::new();
    let mut array = DynArray::new();
    for id in 0..10 {
        array.push(tally.make(id)).unwrap();
    }
    array.truncate(4);
    assert_eq!(tally.dropped(), 6);
    assert_eq!(array.len(), 4);
    assert_eq!(array.back().unwrap().id, 3);
    array.clear();
    assert_eq!(tally.dropped(), 10);
    assert!(array.is_empty());
    assert!(!array.data().is_null());
}

#[test]
fn pop_hands_ownership_to_the_caller() {
    let tally = DropTally::new();
    let mut array = DynArray::new();
    array.push(tally.make(1)).unwrap();
    array.push(tally.make(2)).unwrap();
    let popped = array.pop().unwrap();
    assert_eq!(popped.id, 2);
    assert_eq!(tally.live(), 2);
    drop(popped);
    assert_eq!(tally.live(), 1);
}

#[test]
fn overwriting_through_index_destroys_the_old_value() {
    let tally = DropTally::new();
    let mut array = DynArray::new();
    array.push(tally.make(1)).unwrap();
    array[0] = tally.make(2);
    assert_eq!(tally.dropped(), 1);
    assert_eq!(array[0].id, 2);
}

#[test]
fn into_iter_destroys_whatever_was_not_consumed() {
    let tally = DropTally::new();
    let mut array = DynArray::new();
    for id in 0..8 {
        array.push(tally.make(id)).unwrap();
    }
    let mut it = array.into_iter();
    let first = it.next().unwrap();
    let last = it.next_back().unwrap();
    assert_eq!((first.id, last.id), (0, 7));
    assert_eq!(tally.live(), 8);
    drop(it);
    assert_eq!(tally.live(), 2);
}

#[test]
fn clone_duplicates_every_element() {
    let tally = DropTally::new();
    let mut array = DynArray::new();
    for id in 0..5 {
        array.push(tally.make(id)).unwrap();
    }
    let copy = array.clone();
    assert_eq!(tally.created(), 10);
    assert_eq!(copy.as_slice(), array.as_slice());
    drop(array);
    assert_eq!(tally.live(), 5);
    drop(copy);
    assert_eq!(tally.live(), 0);
}

#[test]
fn panicking_clone_unwinds_without_leaking_the_partial_copy() {
    let tally = DropTally::new();
    let fuse = CloneFuse::new(3);
    let mut array = DynArray::new();
    for id in 0..6 {
        array.push(fuse.make(tally.make(id))).unwrap();
    }

    let outcome = catch_unwind(AssertUnwindSafe(|| array.try_clone()));
    assert!(outcome.is_err());
    // Three clones succeeded before the panic; all three were destroyed
    // while the partial copy unwound, and the source is untouched.
    assert_eq!(fuse.clones(), 4);
    assert_eq!(tally.created(), 9);
    assert_eq!(tally.dropped(), 3);
    assert_eq!(array.len(), 6);
    assert_eq!(array[5].payload.id, 5);

    drop(array);
    assert_eq!(tally.live(), 0);
}

#[test]
fn panicking_fill_constructor_unwinds_without_leaking() {
    let tally = DropTally::new();
    let fuse = CloneFuse::new(2);
    let seed = fuse.make(tally.make(7));

    let outcome = catch_unwind(AssertUnwindSafe(|| DynArray::from_fill(5, seed)));
    assert!(outcome.is_err());
    // Two clones landed in the partial array, then the third panicked.
    // The partial array and the moved-in seed both unwound cleanly.
    assert_eq!(tally.live(), 0);
}

#[test]
fn panicking_assignment_leaves_a_valid_prefix() {
    let tally = DropTally::new();
    let fuse = CloneFuse::new(2);
    let source: Vec<_> = (0..4).map(|id| fuse.make(tally.make(id))).collect();

    let mut array = DynArray::new();
    array.push(fuse.make(tally.make(99))).unwrap();
    // `make` wraps without cloning, so the fuse budget is untouched so
    // far. Assignment clones source elements 0 and 1, then panics on 2.
    let outcome = catch_unwind(AssertUnwindSafe(|| array.assign_from_slice(&source)));
    assert!(outcome.is_err());

    // The old contents were destroyed up front; the array now holds the
    // prefix that was cloned before the panic and remains fully usable.
    assert_eq!(array.len(), 2);
    assert_eq!(array[0].payload.id, 0);
    assert_eq!(array[1].payload.id, 1);
    array.push(fuse.make(tally.make(100))).unwrap();
    assert_eq!(array.len(), 3);

    drop(array);
    drop(source);
    assert_eq!(tally.live(), 0);
}

#[test]
fn take_transfers_elements_without_touching_them() {
    let tally = DropTally::new();
    let mut array = DynArray::new();
    for id in 0..12 {
        array.push(tally.make(id)).unwrap();
    }
    let taken = array.take();
    assert_eq!(tally.created(), 12);
    assert_eq!(tally.dropped(), 0);
    assert_eq!(taken.len(), 12);
    assert!(array.is_empty());
    drop(taken);
    assert_eq!(tally.live(), 0);
}

#[test]
fn swap_moves_no_elements() {
    let tally = DropTally::new();
    let mut a = DynArray::new();
    let mut b = DynArray::new();
    a.push(tally.make(1)).unwrap();
    b.push(tally.make(2)).unwrap();
    b.push(tally.make(3)).unwrap();
    a.swap(&mut b);
    assert_eq!(tally.created(), 3);
    assert_eq!(tally.dropped(), 0);
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].id, 1);
}
