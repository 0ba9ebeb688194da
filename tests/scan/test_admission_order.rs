//! Admission outcome must not depend on the order candidates arrive in
//!
//! Holds when each overlap cluster is pairwise overlapping and its members
//! are ranked consistently (no level/bandwidth cycles).

use rustyscan::scan::{admit, AcceptedPeak, RawCandidate};
use rustyscan::{Spectrum, SYMBOL_RATE_PER_KHZ};

const THRESHOLD2: i32 = 1000;

fn candidate(spectrum: &Spectrum, rise: usize, fall: usize, level: i32, snr: i32) -> RawCandidate {
    RawCandidate::from_span(spectrum, rise, fall, level, snr, fall - rise)
}

fn fixture() -> Vec<RawCandidate> {
    let spectrum = Spectrum::new(1_000_000, 100, vec![0; 1000]).unwrap();
    let c = |rise, fall, level| candidate(&spectrum, rise, fall, level, level + 5000);
    vec![
        // Comparable levels: the widest wins
        c(100, 110, -2000),
        c(95, 125, -2300),
        c(105, 140, -2100),
        // A strong narrow peak inside two weaker wide ones
        c(300, 320, -2000),
        c(310, 315, 0),
        c(305, 318, -1900),
        // Isolated
        c(500, 540, -3000),
        // Never admitted
        candidate(&spectrum, 700, 720, -2000, 500),
    ]
}

fn admit_all(order: &[RawCandidate]) -> Vec<(usize, usize)> {
    let mut accepted: Vec<AcceptedPeak> = Vec::new();
    for candidate in order {
        admit(&mut accepted, candidate, THRESHOLD2, SYMBOL_RATE_PER_KHZ);
    }
    let mut spans: Vec<_> = accepted.iter().map(|p| (p.rise_idx, p.fall_idx)).collect();
    spans.sort_unstable();
    spans
}

/// Visit every permutation of `items` (Heap's algorithm)
fn for_each_permutation<T, F: FnMut(&[T])>(items: &mut [T], visit: &mut F) {
    let n = items.len();
    let mut counters = vec![0usize; n];
    visit(items);

    let mut i = 1;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            visit(items);
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}

#[test]
fn test_every_order_gives_same_peaks() {
    let mut candidates = fixture();
    let expected = vec![(105, 140), (310, 315), (500, 540)];

    let mut orders = 0;
    for_each_permutation(&mut candidates, &mut |order: &[RawCandidate]| {
        assert_eq!(admit_all(order), expected, "order: {:?}", order);
        orders += 1;
    });
    assert_eq!(orders, 40_320);
}

#[test]
fn test_reverse_ladder_order() {
    // Wide windows first is what a top-down scan would produce
    let mut candidates = fixture();
    candidates.sort_by_key(|c| std::cmp::Reverse(c.window));
    assert_eq!(admit_all(&candidates), vec![(105, 140), (310, 315), (500, 540)]);
}
