//! Property tests for recall-trigger: cooldown spacing and reproducibility.

use chrono::Duration;
use proptest::prelude::*;

use recall_core::config::{GraphConfig, TriggerConfig};
use recall_core::models::EntityCandidate;
use recall_graph::{GraphStore, UpsertBatch};
use recall_trigger::{FireEvent, GraphDelta, Observation, TriggerEvaluator, UrgentSignal};
use test_fixtures::t0;

/// (seconds since previous step, entity picks, urgent?, decay instead of upsert?)
type Step = (i64, Vec<u8>, bool, bool);

fn step_strategy() -> impl Strategy<Value = Step> {
    (
        0_i64..40,
        prop::collection::vec(0_u8..30, 0..5),
        prop::bool::weighted(0.15),
        prop::bool::weighted(0.1),
    )
}

fn replay(steps: &[Step], config: TriggerConfig) -> Vec<FireEvent> {
    let mut store = GraphStore::new(GraphConfig::default());
    let mut eval = TriggerEvaluator::new(config);
    let mut now = t0();
    let mut fires = Vec::new();
    let signal = UrgentSignal::Severity { level: 3 };

    for (gap, picks, urgent, decay) in steps {
        now += Duration::seconds(*gap);
        let delta = if *decay {
            GraphDelta::from_decay(&store.decay(now).unwrap())
        } else {
            let entities = picks
                .iter()
                .map(|p| EntityCandidate::new("block_id", format!("blk_{p}")))
                .collect();
            GraphDelta::from_upsert(&store.upsert(UpsertBatch::new(entities, vec![], now)).unwrap())
        };
        let snap = store.snapshot();
        if let Some(fire) = eval.observe(Observation {
            snapshot: &snap,
            delta: &delta,
            now,
            signal: urgent.then_some(&signal),
        }) {
            fires.push(fire);
        }
    }
    fires
}

// =============================================================================
// Never two fires inside the cooldown window
// =============================================================================
proptest! {
    #[test]
    fn fires_respect_cooldown(
        steps in prop::collection::vec(step_strategy(), 1..120),
        cooldown in 0_u64..120,
        threshold in 0.5_f64..5.0,
    ) {
        let config = TriggerConfig {
            cooldown_secs: cooldown,
            novelty_threshold: threshold,
            max_wait_secs: 200,
            ..TriggerConfig::default()
        };
        let fires = replay(&steps, config);
        for pair in fires.windows(2) {
            let gap = pair[1].at - pair[0].at;
            prop_assert!(
                gap >= Duration::seconds(cooldown as i64),
                "fires {:?} and {:?} only {}s apart", pair[0].at, pair[1].at, gap.num_seconds()
            );
            prop_assert!(pair[1].version > pair[0].version);
        }
    }
}

// =============================================================================
// Same input, same fires
// =============================================================================
proptest! {
    #[test]
    fn fires_are_reproducible(steps in prop::collection::vec(step_strategy(), 1..80)) {
        let a = replay(&steps, TriggerConfig::default());
        let b = replay(&steps, TriggerConfig::default());
        prop_assert_eq!(a, b);
    }
}

// =============================================================================
// Every fire carries seeds within the cap
// =============================================================================
proptest! {
    #[test]
    fn fires_carry_bounded_seeds(steps in prop::collection::vec(step_strategy(), 1..80), max_seeds in 1_usize..6) {
        let config = TriggerConfig { max_seeds, ..TriggerConfig::default() };
        for fire in replay(&steps, config) {
            prop_assert!(!fire.seeds.is_empty());
            prop_assert!(fire.seeds.len() <= max_seeds);
        }
    }
}
