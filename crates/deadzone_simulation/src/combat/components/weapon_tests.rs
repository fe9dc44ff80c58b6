//! Tests for WeaponStats / WeaponState components.

#[cfg(test)]
mod tests {
    use super::super::weapon::*;
    use crate::config::{ProjectileConfig, WeaponConfig};

    fn rifle() -> WeaponStats {
        WeaponStats::default()
    }

    #[test]
    fn test_new_weapon_is_ready() {
        let stats = rifle();
        let state = WeaponState::new(&stats);

        assert_eq!(state.current_ammo(), 30);
        assert!(state.check_fire(&stats).is_ok());
    }

    #[test]
    fn test_fire_rate_enforced() {
        let stats = rifle();
        let mut state = WeaponState::new(&stats);

        assert!(state.try_fire(&stats).is_ok());
        state.tick(&stats, 0.1); // < 0.15
        assert_eq!(state.try_fire(&stats), Err(FireBlocked::Cooldown));
        assert_eq!(state.current_ammo(), 29);

        state.tick(&stats, 0.06);
        assert!(state.try_fire(&stats).is_ok());
        assert_eq!(state.current_ammo(), 28);
    }

    #[test]
    fn test_ammo_invariant_and_empty_magazine() {
        let stats = WeaponStats {
            max_ammo: 3,
            ..rifle()
        };
        let mut state = WeaponState::new(&stats);

        for _ in 0..10 {
            let _ = state.try_fire(&stats);
            state.tick(&stats, stats.fire_rate);
            assert!(state.current_ammo() <= stats.max_ammo);
        }

        assert_eq!(state.current_ammo(), 0);
        assert_eq!(state.try_fire(&stats), Err(FireBlocked::NoAmmo));

        assert!(state.reload(&stats));
        assert_eq!(state.current_ammo(), 3);
    }

    #[test]
    fn test_reload_full_magazine_is_noop() {
        let stats = rifle();
        let mut state = WeaponState::new(&stats);
        let before = state;

        assert!(!state.reload(&stats));
        assert_eq!(state, before);
    }

    #[test]
    fn test_no_projectile_template_never_fires() {
        let weapon = WeaponConfig {
            has_projectile: false,
            ..WeaponConfig::default()
        };
        let stats = WeaponStats::from_config(&weapon, &ProjectileConfig::default());
        let mut state = WeaponState::new(&stats);

        assert_eq!(state.try_fire(&stats), Err(FireBlocked::NoProjectile));
        assert_eq!(state.current_ammo(), 30);
    }

    #[test]
    fn test_spread_capped_at_three_times_base() {
        let stats = WeaponStats {
            fire_rate: 0.0,
            ..rifle()
        };
        let mut state = WeaponState::new(&stats);

        for _ in 0..20 {
            state.try_fire(&stats).unwrap();
            assert!(state.spread() <= stats.recoil_spread * 3.0 + f32::EPSILON);
        }
        assert!((state.spread() - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_recoil_two_stage_decay() {
        let stats = rifle();
        let mut state = WeaponState::new(&stats);
        state.try_fire(&stats).unwrap();

        assert_eq!(state.target_recoil(), 2.0);
        assert_eq!(state.current_recoil(), 0.0);

        // current догоняет target (5/с), target падает к 0 (2.5/с)
        state.tick(&stats, 0.1);
        assert!((state.current_recoil() - 0.5).abs() < 1e-5);
        assert!((state.target_recoil() - 1.75).abs() < 1e-5);

        for _ in 0..100 {
            state.tick(&stats, 0.05);
        }
        assert_eq!(state.target_recoil(), 0.0);
        assert_eq!(state.current_recoil(), 0.0);
        assert_eq!(state.spread(), 0.0);
    }

    #[test]
    fn test_tick_reports_recoil_while_settling() {
        let stats = rifle();
        let mut state = WeaponState::new(&stats);

        // В покое камере отдавать нечего
        assert_eq!(state.tick(&stats, 0.02), None);

        state.try_fire(&stats).unwrap();
        let first = state.tick(&stats, 0.02).unwrap();
        assert!((first - 0.1).abs() < 1e-5);

        // current растёт, пока не встретит падающий target
        let mut peak = first;
        for _ in 0..10 {
            peak = peak.max(state.tick(&stats, 0.02).unwrap());
        }
        assert!(peak > first);

        let mut frames = 0;
        while state.tick(&stats, 0.02).is_some() {
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(state.current_recoil(), 0.0);
        assert_eq!(state.tick(&stats, 0.02), None);
    }
}
