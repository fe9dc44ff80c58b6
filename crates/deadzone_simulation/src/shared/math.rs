//! Скалярная математика для таймеров и сглаживания

use std::f32::consts::{PI, TAU};

/// Сдвинуть `from` к `to` не больше чем на `max_delta`
pub fn move_toward(from: f32, to: f32, max_delta: f32) -> f32 {
    let diff = to - from;
    if diff.abs() <= max_delta {
        to
    } else {
        from + diff.signum() * max_delta
    }
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Угол в диапазон [-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid может вернуть TAU из-за округления
    if wrapped < -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Интерполяция углов по кратчайшей дуге
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + wrap_angle(to - from) * t
}

/// Коэффициент экспоненциального сглаживания за кадр (rate × dt, не больше 1)
pub fn smoothing_factor(rate: f32, delta: f32) -> f32 {
    (rate * delta).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_toward() {
        assert_eq!(move_toward(0.0, 10.0, 3.0), 3.0);
        assert_eq!(move_toward(0.0, 2.0, 3.0), 2.0); // Не перескакиваем
        assert_eq!(move_toward(5.0, 0.0, 1.5), 3.5);
        assert_eq!(move_toward(-1.0, 0.0, 5.0), 0.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert_eq!(wrap_angle(0.5), 0.5);
    }

    #[test]
    fn test_lerp_angle_takes_short_arc() {
        // 170° → -170°: через 180°, а не через 0°
        let from = 170f32.to_radians();
        let to = -170f32.to_radians();
        let mid = wrap_angle(lerp_angle(from, to, 0.5));
        assert!((mid.abs() - PI).abs() < 1e-4, "mid = {}", mid);
    }

    #[test]
    fn test_smoothing_factor_clamped() {
        assert_eq!(smoothing_factor(10.0, 0.5), 1.0);
        assert!((smoothing_factor(10.0, 0.01) - 0.1).abs() < 1e-6);
    }
}
