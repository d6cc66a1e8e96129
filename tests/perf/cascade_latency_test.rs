use std::time::Instant;

use crate::model::Predecessor;
use crate::reconstructor::{OrderReconstructor, SecondRootPolicy};

const CHAIN_LEN: u32 = 10_000;

fn median_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    samples[samples.len() / 2]
}

#[test]
fn reversed_delivery_cascades_without_recursion() {
    let mut samples = Vec::with_capacity(5);

    for _ in 0..5 {
        let mut engine = OrderReconstructor::new(SecondRootPolicy::NewChain);
        let mut signals: Vec<u32> = Vec::with_capacity(CHAIN_LEN as usize);

        let start = Instant::now();
        for node in (1..CHAIN_LEN).rev() {
            engine.attach(node, Predecessor::Node(node - 1), &mut signals);
        }
        assert!(signals.is_empty());
        assert_eq!(engine.pending_len(), (CHAIN_LEN - 1) as usize);

        let linked = engine.attach(0, Predecessor::Root, &mut signals);
        samples.push(start.elapsed().as_secs_f64() * 1000.0);

        assert_eq!(linked, CHAIN_LEN as usize);
        assert_eq!(engine.pending_len(), 0);
        assert!(signals.iter().copied().eq(0..CHAIN_LEN));
    }

    let median = median_ms(&mut samples);
    assert!(
        median <= 250.0,
        "median reversed cascade too slow: {median:.3}ms (budget 250.0ms); samples={samples:?}",
    );
}
