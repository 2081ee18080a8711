//! Quick benchmark for state dump and copy cost

use std::time::Instant;

use titubate::{State, StateValue};

fn build_state(entries: usize) -> State {
    let mut state = State::new();
    for i in 0..entries {
        match i % 4 {
            0 => state.set(format!("int{}", i), i as i32),
            1 => state.set(format!("long{}", i), i as i64 * 1_000_000_000),
            2 => state.set(format!("text{}", i), format!("value-{}", i)),
            _ => state.set(
                format!("list{}", i),
                StateValue::List(vec![StateValue::from("a"), StateValue::Null]),
            ),
        }
    }
    state
}

fn main() {
    println!("State Dump Performance Test");
    println!("===========================\n");

    for entries in [1, 16, 256] {
        let state = build_state(entries);
        let iterations: u32 = 10_000;

        // Warm up
        let _ = state.dump();

        let start = Instant::now();
        for _ in 0..iterations {
            let _ = state.dump();
        }
        let dump_elapsed = start.elapsed();

        let start = Instant::now();
        for _ in 0..iterations {
            let _ = State::copy(&state);
        }
        let copy_elapsed = start.elapsed();

        println!("Entries: {}", entries);
        println!("  dump per op: {:?}", dump_elapsed / iterations);
        println!("  copy per op: {:?}\n", copy_elapsed / iterations);
    }
}
