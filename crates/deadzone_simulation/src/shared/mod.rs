//! Shared domain: cross-cutting helpers
//!
//! Содержит математику, используемую в нескольких доменах:
//! - move_toward / lerp для таймеров, recoil, spread, velocity
//! - работа с углами (wrap yaw, кратчайшая интерполяция)

pub mod math;

pub use math::*;
