//! Property tests over arbitrary seeds and inputs

use proptest::prelude::*;

use endless_runner::consts::*;
use endless_runner::sim::{
    BlockKind, GameSession, TickInput, TrackCursor, TrackRng, TrackWindow, generate_next, tick,
};
use endless_runner::{Tuning, is_axis_aligned};

fn generate(seed: u32, count: usize) -> Vec<endless_runner::sim::Block> {
    let mut rng = TrackRng::new(seed);
    let mut cursor = TrackCursor::default();
    (0..count)
        .map(|_| {
            let (block, next) = generate_next(&cursor, &mut rng);
            cursor = next;
            block
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn turns_only_on_multiples_of_twenty(seed in any::<u32>()) {
        for block in generate(seed, 200) {
            let expect_turn = block.index > 0 && block.index % 20 == 0;
            prop_assert_eq!(block.kind.is_turn(), expect_turn, "block {}", block.index);
            prop_assert!(is_axis_aligned(block.yaw));
        }
    }

    #[test]
    fn obstacles_follow_placement_rule(seed in any::<u32>()) {
        for block in generate(seed, 200) {
            let i = block.index;
            let expected = i >= 5 && i % 4 == 1 && i % 20 != 1 && block.kind == BlockKind::Normal;
            prop_assert_eq!(block.obstacle.is_some(), expected, "block {}", i);
            if let Some(obstacle) = block.obstacle {
                prop_assert!(!obstacle.hit);
            }
        }
    }

    #[test]
    fn coins_only_in_cycle_slots(seed in any::<u32>()) {
        for block in generate(seed, 100) {
            let slot = block.index % 10;
            let expected = if (2..=6).contains(&slot) { COINS_PER_BLOCK } else { 0 };
            prop_assert_eq!(block.coins.len(), expected);
            prop_assert!(block.coins.iter().all(|c| !c.collected));
        }
    }

    #[test]
    fn consecutive_blocks_are_one_block_apart(seed in any::<u32>()) {
        let blocks = generate(seed, 120);
        for pair in blocks.windows(2) {
            let step = (pair[1].center - pair[0].center).length();
            prop_assert!((step - BLOCK_SIZE).abs() < 1e-3, "step {} at {}", step, pair[1].index);
        }
    }

    #[test]
    fn window_stays_bounded(seed in any::<u32>(), advance in prop::collection::vec(0u64..4, 1..80)) {
        let mut window = TrackWindow::new(seed);
        window.seed_initial(INITIAL_BLOCKS);
        let mut target = 0u64;
        for step in advance {
            prop_assert!(window.len() <= MAX_LIVE_BLOCKS);
            target += step;
            let pos = match window.get(target) {
                Some(block) => block.center,
                None => break,
            };
            let player_block = window.ensure_generated_ahead(pos);
            window.evict_stale(player_block);

            let Some(player_block) = player_block else { continue };
            let first = window.first_index().unwrap_or(0);
            let last = window.last_index().unwrap_or(0);
            prop_assert!(last + 1 >= player_block + BLOCKS_AHEAD);
            prop_assert!(window.len() <= MAX_LIVE_BLOCKS, "{} live blocks", window.len());
            prop_assert!(first + BLOCKS_BEHIND >= player_block, "block {} kept behind {}", first, player_block);
            prop_assert_eq!(last - first + 1, window.len() as u64);
        }
    }

    #[test]
    fn same_inputs_same_session(
        seed in any::<u32>(),
        inputs in prop::collection::vec((any::<bool>(), any::<bool>(), -5.0f32..5.0), 1..200),
    ) {
        let tuning = Tuning { seed, ..Tuning::default() };
        let mut a = GameSession::new(tuning.clone());
        let mut b = GameSession::new(tuning);
        for (jump, slide, pointer_dx) in inputs {
            let input = TickInput { jump, slide, pointer_dx, ..Default::default() };
            let ea = tick(&mut a, &input, SIM_DT);
            let eb = tick(&mut b, &input, SIM_DT);
            prop_assert_eq!(ea, eb);
        }
        prop_assert_eq!(&a.player, &b.player);
        prop_assert_eq!(a.coins, b.coins);
        prop_assert_eq!(a.hp, b.hp);
    }
}
