//! Property tests for the movement rules.

use escape_core::components::{Body, Evader, EvaderState, Guard};
use escape_core::config::RunConfig;
use escape_core::systems::{
    guard_step, line_of_sight_step, random_delta, resolve_encounter, smart_distribution,
    BiasParams, Encounter, StepOutcome,
};
use escape_core::Position;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn position_within(border: i32) -> impl Strategy<Value = Position> {
    (-border..=border, -border..=border).prop_map(|(x, y)| Position::new(x, y))
}

proptest! {
    #[test]
    fn random_step_never_stands_still(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..50 {
            let delta = random_delta(&mut rng);
            prop_assert_ne!(delta, Position::ORIGIN);
            prop_assert_eq!(delta.ring(), 1);
        }
    }

    #[test]
    fn smart_distribution_sums_to_one(
        (border, pos) in (2u32..12).prop_flat_map(|b| (Just(b), position_within(b as i32))),
        increment in 0.0f64..0.2,
        decrement in 0.0f64..0.2,
    ) {
        prop_assume!(pos != Position::ORIGIN);
        let dist = smart_distribution(pos, border, BiasParams { increment, decrement }).unwrap();
        prop_assert!((dist.total() - 1.0).abs() < 1e-9);
        prop_assert!(dist.cells().iter().all(|&(_, w)| w >= 0.0));
        let bias = dist.marginals();
        prop_assert!((bias.x.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        prop_assert!((bias.y.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn perimeter_guard_stays_on_its_square(
        seed in any::<u64>(),
        radius in 1u32..8,
        steps in 0usize..200,
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut guard = Guard::perimeter("perimeter", Position::ORIGIN, radius, &mut rng);
        prop_assert_eq!(guard.location().ring(), radius);
        for _ in 0..steps {
            guard_step(&mut guard, &mut rng).unwrap();
            prop_assert_eq!(guard.location().ring(), radius);
        }
    }

    #[test]
    fn trail_guard_stays_on_its_trail(seed in any::<u64>(), steps in 0usize..200) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let trail = RunConfig::default().guards.trail;
        let mut guard = Guard::trail("trail", trail.clone(), 4, &mut rng).unwrap();
        for _ in 0..steps {
            guard_step(&mut guard, &mut rng).unwrap();
            let index = guard.trail_index().unwrap();
            prop_assert!(index < trail.len());
            prop_assert_eq!(guard.location(), trail[index]);
        }
    }

    #[test]
    fn fully_watched_escapee_is_cornered_in_place(
        seed in any::<u64>(),
        pos in position_within(6),
        side in -1i32..=1,
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut evader = Evader::new(pos, 8, false);
        // Two guards on opposite sides watch every neighbouring cell
        let watchers = if side == 0 {
            vec![pos]
        } else {
            vec![pos + Position::new(side, 0), pos + Position::new(-side, 0)]
        };
        prop_assert_eq!(
            line_of_sight_step(&mut evader, &watchers, &mut rng),
            StepOutcome::Cornered
        );
        prop_assert_eq!(evader.state(), EvaderState::Caught);
        prop_assert_eq!(evader.location(), pos);
    }

    #[test]
    fn weapon_outcome_follows_probability(seed in any::<u64>(), pos in position_within(4)) {
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut evader = Evader::new(pos, 4, true);
        prop_assert_eq!(resolve_encounter(&mut evader, 0.0, &mut rng), Encounter::Survived);
        prop_assert_eq!(evader.location(), Position::ORIGIN);
        prop_assert!(evader.is_running());

        let mut evader = Evader::new(pos, 4, true);
        prop_assert_eq!(resolve_encounter(&mut evader, 1.0, &mut rng), Encounter::Captured);
        prop_assert_eq!(evader.state(), EvaderState::Caught);
    }

    #[test]
    fn set_location_is_exact_and_leaves_flag(
        start in position_within(3),
        target in position_within(50),
        border in 0u32..5,
        crossed in any::<bool>(),
    ) {
        let mut body = Body::new(start, Some(border));
        if crossed {
            body.move_by(Position::new(border as i32 + 10, 0));
        }
        let flag = body.is_out_of_bounds();

        body.set_location(target);
        prop_assert_eq!(body.loc_x(), target.x);
        prop_assert_eq!(body.loc_y(), target.y);
        prop_assert_eq!(body.is_out_of_bounds(), flag);
    }
}
