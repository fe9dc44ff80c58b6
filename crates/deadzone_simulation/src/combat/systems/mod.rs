//! Combat systems (weapon, projectile flight, dynamic bodies, pickups)

pub mod dynamic_body;
pub mod pickup;
pub mod projectile;
pub mod weapon;

#[cfg(test)]
mod weapon_tests;

// Re-export all systems
pub use dynamic_body::*;
pub use pickup::*;
pub use projectile::*;
pub use weapon::*;
