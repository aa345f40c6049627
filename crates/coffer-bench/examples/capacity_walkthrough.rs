//! Guided tour of the DynArray capacity lifecycle.
//!
//! Demonstrates: construction → push-driven growth → introspection →
//! reserve/shrink → cursors → allocator ledger accounting.

use coffer_alloc::ArrayAlloc;
use coffer_array::DynArray;
use coffer_test_utils::fixtures::TrackingAlloc;

fn main() {
    println!("=== Coffer DynArray walkthrough ===\n");

    // --- Construction and introspection ---
    let mut numbers: DynArray<u64> = DynArray::new();
    println!("Fresh array:");
    println!("  len       = {}", numbers.len());
    println!("  capacity  = {}", numbers.capacity());
    println!("  empty     = {}", numbers.is_empty());
    println!("  data      = {:?}", numbers.data());
    println!("  max_len   = {}", numbers.max_len());

    // --- Push-driven growth ---
    println!("\nPushing 0..10, watching capacity double:");
    for value in 0..10u64 {
        numbers.push(value).unwrap();
        println!(
            "  push({value}): len={:>2}, capacity={:>2}",
            numbers.len(),
            numbers.capacity()
        );
    }

    println!("\nAfter growth:");
    println!("  front     = {}", numbers.front().unwrap());
    println!("  back      = {}", numbers.back().unwrap());
    println!("  element 4 = {}", numbers[4]);
    println!("  at(40)    = {:?}", numbers.at(40));
    println!("  data      = {:?}", numbers.data());

    // --- Reserve and shrink ---
    println!("\nReserving room for 100:");
    numbers.reserve(100).unwrap();
    println!("  len={}, capacity={}", numbers.len(), numbers.capacity());

    println!("Truncating to 3 and shrinking:");
    numbers.truncate(3);
    numbers.shrink_to_fit().unwrap();
    println!("  len={}, capacity={}", numbers.len(), numbers.capacity());
    println!("  contents = {:?}", numbers.as_slice());

    // --- Cursors ---
    let begin = numbers.cursor();
    let end = numbers.cursor_end();
    println!("\nCursor bounds:");
    println!("  begin = {:?}", begin.as_ptr());
    println!("  end   = {:?}", end.as_ptr());
    println!("  begin < end: {}", begin < end);

    let total: u64 = numbers.iter().sum();
    println!("  iter sum = {total}");

    // --- Allocator ledger accounting ---
    println!("\nGrowing through a tracking allocator:");
    let ledger = TrackingAlloc::new();
    let mut tracked: DynArray<u64, TrackingAlloc> = DynArray::new_in(ledger.fork_for_copy());
    for value in 0..100u64 {
        tracked.push(value).unwrap();
    }
    println!(
        "  after 100 pushes: live_blocks={}, live_bytes={}, allocated={}, released={}",
        ledger.live_blocks(),
        ledger.live_bytes(),
        ledger.allocated(),
        ledger.released()
    );

    let copy = tracked.try_clone().unwrap();
    println!(
        "  after clone:      live_blocks={}, live_bytes={}",
        ledger.live_blocks(),
        ledger.live_bytes()
    );
    drop(copy);
    drop(tracked);
    println!(
        "  after teardown:   live_blocks={}, allocated={}, released={}",
        ledger.live_blocks(),
        ledger.allocated(),
        ledger.released()
    );

    println!("\nDone.");
}
