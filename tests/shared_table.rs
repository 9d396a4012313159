use std::sync::Arc;
use std::thread;

use statfeed::core::lookup::WeightTable;
use statfeed::{Conventions, EngineConfig, StatFeed};

#[test]
fn engines_share_one_table_across_threads() {
    let cfg = EngineConfig::new(32, 16, 64);
    let table = Arc::new(WeightTable::for_config(&cfg).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|k| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let mut sf = StatFeed::with_table(cfg, Conventions::default(), table).unwrap();
                sf.set_bins_in_use(4.0 + k as f32);
                sf.set_exponent(1.5);
                (0..256)
                    .map(|i| sf.evaluate(((i * 37 % 200) as f32 / 100.0) - 1.0))
                    .collect::<Vec<f32>>()
            })
        })
        .collect();

    for h in handles {
        let out = h.join().unwrap();
        assert!(out.iter().all(|v| (-0.5..=0.5).contains(v)));
    }
    assert_eq!(Arc::strong_count(&table), 1);
}

#[test]
fn shared_and_owned_tables_produce_identical_streams() {
    let cfg = EngineConfig::new(20, 10, 40);
    let mut owned = StatFeed::new(cfg).unwrap();
    let mut shared =
        StatFeed::with_table(cfg, Conventions::default(), Arc::new(WeightTable::for_config(&cfg).unwrap()))
            .unwrap();
    owned.set_bins_in_use(9.0);
    shared.set_bins_in_use(9.0);
    owned.set_exponent(0.4);
    shared.set_exponent(0.4);
    for i in 0..500 {
        let d = ((i * 13 % 101) as f32 / 50.0) - 1.0;
        assert_eq!(owned.evaluate(d), shared.evaluate(d));
    }
}
