//! The static weapon table.
//!
//! Weapon stats are server-side constants: the client names a weapon,
//! the server decides what it does. `damage` is informational (damage
//! claims arrive in `hit` messages and are clamped separately); the
//! fire interval is the basis of the only anti-cheat check the engine
//! performs.

use std::time::Duration;

/// Stats for one weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weapon {
    /// Canonical name, echoed back in `bullet` broadcasts.
    pub name: &'static str,
    /// Nominal damage per shot.
    pub damage: i32,
    /// Minimum interval between shots.
    pub fire_interval: Duration,
}

/// Name of the fallback weapon for unknown or missing names.
pub const DEFAULT_WEAPON: &str = "ak47";

const ARSENAL: [Weapon; 4] = [
    Weapon { name: "ak47", damage: 25, fire_interval: Duration::from_millis(100) },
    Weapon { name: "m4a1", damage: 22, fire_interval: Duration::from_millis(80) },
    Weapon { name: "awp", damage: 100, fire_interval: Duration::from_millis(1500) },
    Weapon { name: "deagle", damage: 50, fire_interval: Duration::from_millis(300) },
];

/// Looks up a weapon by name, falling back to [`DEFAULT_WEAPON`] for
/// anything the table doesn't know.
pub fn lookup_weapon(name: Option<&str>) -> &'static Weapon {
    let wanted = name.unwrap_or(DEFAULT_WEAPON);
    ARSENAL
        .iter()
        .find(|w| w.name == wanted)
        .unwrap_or(&ARSENAL[0])
}
