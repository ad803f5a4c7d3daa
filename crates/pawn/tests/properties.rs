//! Integration test: allocator and array invariants under random workloads.
//!
//! Mixed arrays of different element types share one arena; the arena
//! never hands out overlapping or misaligned storage, and every array
//! keeps `len <= capacity` with bounded appends.

use pawn::prelude::*;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Step {
    PushByte(u8),
    PushWord(u64),
    GrowBytes(usize),
    GrowWords(usize),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        any::<u8>().prop_map(Step::PushByte),
        any::<u64>().prop_map(Step::PushWord),
        (1usize..8).prop_map(Step::GrowBytes),
        (1usize..4).prop_map(Step::GrowWords),
    ]
}

proptest! {
    #[test]
    fn shared_arena_keeps_arrays_intact(steps in proptest::collection::vec(arb_step(), 1..80)) {
        let config = ArenaConfig::new(1024 * 1024);
        let mut arena = LinearAllocator::from_config(SystemAllocator::global(), &config).unwrap();
        let frame = arena.scope();
        let mut bytes = Array::<u8>::new(&*frame, 1);
        let mut words = Array::<u64>::new(&*frame, 1);
        let mut byte_model = Vec::new();
        let mut word_model = Vec::new();

        for step in steps {
            match step {
                Step::PushByte(b) => {
                    let full = bytes.is_full();
                    prop_assert_eq!(bytes.append(b), !full);
                    if !full {
                        byte_model.push(b);
                    }
                }
                Step::PushWord(w) => {
                    let full = words.is_full();
                    prop_assert_eq!(words.append(w), !full);
                    if !full {
                        word_model.push(w);
                    }
                }
                Step::GrowBytes(n) => {
                    let cap = bytes.capacity() + n;
                    prop_assert_eq!(bytes.resize(cap), cap);
                }
                Step::GrowWords(n) => {
                    let cap = words.capacity() + n;
                    prop_assert_eq!(words.resize(cap), cap);
                }
            }
            prop_assert!(bytes.len() <= bytes.capacity());
            prop_assert!(words.len() <= words.capacity());
            prop_assert_eq!(bytes.as_slice(), byte_model.as_slice());
            prop_assert_eq!(words.as_slice(), word_model.as_slice());
            prop_assert_eq!(words.as_slice().as_ptr() as usize % 8, 0);
            prop_assert!(frame.occupied() <= frame.capacity());
        }
    }

    #[test]
    fn full_array_rejects_without_change(cap in 1usize..16, extra in any::<i32>()) {
        let system = SystemAllocator::new();
        let mut a = ScopedArray::<i32>::new(&system, cap);
        for i in 0..cap as i32 {
            prop_assert!(a.append(i));
        }
        let before: Vec<i32> = a.as_slice().to_vec();
        prop_assert!(!a.append(extra));
        prop_assert_eq!(a.len(), cap);
        prop_assert_eq!(a.capacity(), cap);
        prop_assert_eq!(a.as_slice(), before.as_slice());
    }
}
