//! Combat components

pub mod projectile;
pub mod weapon;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod weapon_tests;

// Re-export all components
pub use projectile::*;
pub use weapon::*;
