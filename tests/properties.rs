//! Property tests for the simulation invariants

use glam::Vec2;
use proptest::prelude::*;

use sky_raid::Tuning;
use sky_raid::consts::{MAX_LIVES, MAX_WEAPON_LEVEL, MIN_WEAPON_LEVEL, SIM_DT_MS};
use sky_raid::sim::spawn::spawn_enemy;
use sky_raid::sim::{
    BulletOwner, BulletPool, EnemyKind, GameState, PhaseCommand, PowerupKind, Progression,
    TickInput, enemy_health, enemy_weights, tick, weighted_index,
};

fn input_from_bits(bits: u8) -> TickInput {
    TickInput {
        left: bits & 1 != 0,
        right: bits & 2 != 0,
        up: bits & 4 != 0,
        down: bits & 8 != 0,
        fire: bits & 16 != 0,
        pause: false,
    }
}

proptest! {
    #[test]
    fn weighted_index_lands_in_its_bucket(
        weights in prop::collection::vec(0u32..100, 1..8),
        roll in any::<u32>(),
    ) {
        let total: u32 = weights.iter().sum();
        prop_assume!(total > 0);
        let r = roll % total;
        let i = weighted_index(&weights, r);
        let before: u32 = weights[..i].iter().sum();
        prop_assert!(weights[i] > 0);
        prop_assert!(before <= r && r < before + weights[i]);
    }

    #[test]
    fn enemy_weights_stay_in_range(level in 1u32..1000) {
        let [scout, weaver, gunship] = enemy_weights(level);
        prop_assert!((20..=70).contains(&scout));
        prop_assert!((25..=40).contains(&weaver));
        prop_assert!((5..=40).contains(&gunship));
    }

    #[test]
    fn health_scales_and_points_do_not(level in 1u32..200, x in 40.0f32..760.0) {
        let mut state = GameState::new(3, Tuning::default());
        state.apply(PhaseCommand::Start);
        state.progress.level = level;
        for kind in EnemyKind::ALL {
            prop_assert_eq!(enemy_health(kind, level), kind.base_health() + level / 2);
            let id = spawn_enemy(&mut state, kind, x);
            let enemy = state.enemy(id).unwrap();
            prop_assert_eq!(enemy.health, kind.base_health() + level / 2);
            prop_assert_eq!(enemy.points, kind.points());
        }
    }

    #[test]
    fn pool_never_exceeds_capacity(
        capacity in 1usize..64,
        ops in prop::collection::vec(any::<Option<u8>>(), 0..300),
    ) {
        let mut pool = BulletPool::new(BulletOwner::Enemy, capacity);
        for op in ops {
            match op {
                None => {
                    let before = pool.active_count();
                    let slot = pool.acquire(Vec2::ZERO, Vec2::Y);
                    prop_assert_eq!(slot.is_none(), before == capacity);
                }
                Some(i) => pool.release(i as usize),
            }
            prop_assert!(pool.active_count() <= capacity);
        }
    }

    #[test]
    fn progression_stays_in_range(ops in prop::collection::vec(0u8..7, 0..300)) {
        let tuning = Tuning::default();
        let mut progress = Progression::new(&tuning);
        let mut now = 0;
        for op in ops {
            now += 700;
            match op {
                0..=3 => progress.apply_powerup(PowerupKind::ALL[op as usize], now, &tuning),
                4 => {
                    progress.damage_player();
                }
                5 => {
                    progress.register_kill(100);
                }
                _ => progress.expire_timers(now),
            }
            prop_assert!(progress.lives <= MAX_LIVES);
            prop_assert!((MIN_WEAPON_LEVEL..=MAX_WEAPON_LEVEL).contains(&progress.weapon_level));
            prop_assert!(matches!(progress.score_multiplier, 1 | 2));
            prop_assert_eq!(progress.score_multiplier == 2, progress.multiplier_expires_at.is_some());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn ticking_preserves_invariants(
        seed in any::<u64>(),
        inputs in prop::collection::vec(any::<u8>(), 20..120),
    ) {
        let tuning = Tuning::default();
        let mut state = GameState::new(seed, tuning.clone());
        state.apply(PhaseCommand::Start);
        for bits in inputs {
            let input = input_from_bits(bits);
            for _ in 0..25 {
                tick(&mut state, &input, SIM_DT_MS);
            }
            let p = &state.progress;
            prop_assert!(p.lives <= MAX_LIVES);
            prop_assert!((MIN_WEAPON_LEVEL..=MAX_WEAPON_LEVEL).contains(&p.weapon_level));
            prop_assert!(matches!(p.score_multiplier, 1 | 2));
            prop_assert!(state.bullets.player.active_count() <= tuning.player_bullet_capacity);
            prop_assert!(state.bullets.enemy.active_count() <= tuning.enemy_bullet_capacity);
            prop_assert!(state.spawner.interval_ms >= tuning.spawn_interval_floor_ms);
            prop_assert!(state.enemies.iter().all(|e| e.active));
            let r = state.player.radius;
            prop_assert!(state.player.pos.x >= r && state.player.pos.x <= tuning.playfield_width - r);
            prop_assert!(state.player.pos.y >= r && state.player.pos.y <= tuning.playfield_height - r);
        }
    }

    #[test]
    fn same_seed_same_run(seed in any::<u64>(), bits in any::<u8>()) {
        let input = input_from_bits(bits);
        let mut a = GameState::new(seed, Tuning::default());
        let mut b = GameState::new(seed, Tuning::default());
        a.apply(PhaseCommand::Start);
        b.apply(PhaseCommand::Start);
        for _ in 0..1500 {
            tick(&mut a, &input, SIM_DT_MS);
            tick(&mut b, &input, SIM_DT_MS);
        }
        prop_assert_eq!(&a.progress, &b.progress);
        prop_assert_eq!(&a.enemies, &b.enemies);
        prop_assert_eq!(a.now(), b.now());
    }
}
