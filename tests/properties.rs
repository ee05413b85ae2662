//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL inputs:
//! - Overlap: flags are reset every pass, non-ladder tiles never set them
//! - Mask: sweeping twice for the same state changes nothing
//! - Ladder lock: climbing snaps x to the column centre
//! - Simulation: any input sequence keeps state, body, gravity and
//!   timer consistent, and replays identically

use glam::Vec2;
use proptest::prelude::*;

use ladders::domain::entity::{Character, InputSnapshot, PlayerState};
use ladders::domain::grid::TileGrid;
use ladders::domain::mask::{self, ladder_top_edges};
use ladders::domain::overlap;
use ladders::domain::player;
use ladders::domain::tile::{Tile, TileKind};
use ladders::sim::level;
use ladders::sim::step::step;
use ladders::sim::world::{MaskTiming, SimOptions, World};

fn input() -> impl Strategy<Value = InputSnapshot> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(left, right, up, down, jump)| InputSnapshot { left, right, up, down, jump },
    )
}

fn state() -> impl Strategy<Value = PlayerState> {
    prop::sample::select(PlayerState::ALL.to_vec())
}

fn solid_kind() -> impl Strategy<Value = TileKind> {
    prop::sample::select(vec![TileKind::Empty, TileKind::Floor, TileKind::Brick])
}

fn embedded_world(mask_timing: MaskTiming) -> World {
    World::from_level(&level::embedded(), SimOptions { mask_timing, dt: 1.0 / 60.0 })
}

// ============================================================
// Overlap Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_no_candidates_clears_both_flags(
        x in 0.0f32..256.0,
        y in 0.0f32..224.0,
        was_tile in any::<bool>(),
        was_top in any::<bool>(),
    ) {
        let mut c = Character::new(Vec2::new(x, y));
        c.on_ladder_tile = was_tile;
        c.on_ladder_top = was_top;

        let flags = overlap::detect(&mut c, &[]);
        prop_assert!(!flags.on_ladder_tile && !flags.on_ladder_top);
        prop_assert!(!c.on_ladder_tile && !c.on_ladder_top);
    }

    #[test]
    fn prop_non_ladder_tiles_never_set_flags(
        x in 0.0f32..256.0,
        y in 0.0f32..224.0,
        kinds in prop::collection::vec((0usize..16, 0usize..14, solid_kind()), 0..12),
    ) {
        let mut c = Character::new(Vec2::new(x, y));
        c.on_ladder_tile = true;
        c.on_ladder_top = true;

        let candidates: Vec<Tile> = kinds.into_iter().map(|(tx, ty, k)| Tile::new(tx, ty, k)).collect();
        let flags = overlap::detect(&mut c, &candidates);
        prop_assert_eq!(flags, overlap::LadderFlags::default());
    }

    #[test]
    fn prop_cap_hit_implies_ladder_hit(
        x in 0.0f32..256.0,
        feet in 0.0f32..224.0,
        tx in 0usize..16,
        ty in 0usize..14,
    ) {
        let c = Character::new(Vec2::new(x, feet - 16.0));
        let hit = overlap::classify(&c, &Tile::new(tx, ty, TileKind::LadderTop));
        prop_assert!(!hit.on_ladder_top || hit.on_ladder_tile);
    }
}

// ============================================================
// Mask Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_mask_is_idempotent(first in state(), second in state()) {
        let mut grid = TileGrid::from_rows(&level::embedded().rows);
        mask::apply(&mut grid, first);
        mask::apply(&mut grid, second);

        prop_assert_eq!(mask::apply(&mut grid, second), 0);
        let expected = ladder_top_edges(second);
        for tile in grid.iter().filter(|t| t.kind == TileKind::LadderTop) {
            prop_assert_eq!(tile.collides, expected);
        }
    }

    #[test]
    fn prop_mask_never_touches_other_tiles(s in state()) {
        let mut grid = TileGrid::from_rows(&level::embedded().rows);
        mask::apply(&mut grid, s);
        for tile in grid.iter().filter(|t| t.kind != TileKind::LadderTop) {
            prop_assert_eq!(tile.collides.any(), tile.kind.is_solid());
        }
    }
}

// ============================================================
// Ladder Lock Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_ladder_states_lock_to_column_centre(
        column in 0u32..32,
        offset in 0.0f32..15.99,
        on_ladder in prop::sample::select(vec![PlayerState::Climbing, PlayerState::OnLadder]),
        inp in input(),
    ) {
        let mut c = Character::new(Vec2::new(column as f32 * 16.0 + offset, 40.0));
        c.state = on_ladder;

        player::update_velocity(&mut c, &inp);
        prop_assert_eq!(c.position.x, column as f32 * 16.0 + 8.0);
        prop_assert_eq!(c.velocity.x, 0.0);
    }

    #[test]
    fn prop_facing_follows_horizontal_input(s in state(), inp in input()) {
        let mut c = Character::new(Vec2::new(40.0, 40.0));
        c.state = s;
        let before = c.facing;

        player::update_velocity(&mut c, &inp);
        match (inp.left, inp.right) {
            (true, _) => prop_assert_eq!(c.facing, ladders::domain::entity::Facing::Left),
            (false, true) => prop_assert_eq!(c.facing, ladders::domain::entity::Facing::Right),
            (false, false) => prop_assert_eq!(c.facing, before),
        }
    }
}

// ============================================================
// Simulation Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_entry_bundle_holds_after_every_tick(
        inputs in prop::collection::vec(input(), 1..240),
        immediate in any::<bool>(),
    ) {
        let timing = if immediate { MaskTiming::Immediate } else { MaskTiming::Lagged };
        let mut w = embedded_world(timing);

        for inp in inputs {
            step(&mut w, inp);
            let p = &w.player;
            prop_assert_eq!(p.body, p.state.body());
            prop_assert_eq!(p.gravity, !p.state.is_on_ladder());
            prop_assert_eq!(p.jump_timer.is_some(), p.state == PlayerState::Jumping);
            prop_assert!(p.position.is_finite() && p.velocity.is_finite());

            if timing == MaskTiming::Immediate {
                let expected = ladder_top_edges(p.state);
                for tile in w.grid.iter().filter(|t| t.kind == TileKind::LadderTop) {
                    prop_assert_eq!(tile.collides, expected);
                }
            }
        }
    }

    #[test]
    fn prop_same_inputs_replay_identically(inputs in prop::collection::vec(input(), 1..180)) {
        let mut a = embedded_world(MaskTiming::Lagged);
        let mut b = embedded_world(MaskTiming::Lagged);

        for inp in inputs {
            let ea = step(&mut a, inp);
            let eb = step(&mut b, inp);
            prop_assert_eq!(ea, eb);
            prop_assert_eq!(a.player.position, b.player.position);
            prop_assert_eq!(a.player.velocity, b.player.velocity);
            prop_assert_eq!(a.player.state, b.player.state);
            prop_assert_eq!(a.player.facing, b.player.facing);
        }
    }
}
