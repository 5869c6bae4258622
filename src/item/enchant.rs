use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Pre-registry enchantment names and their namespaced keys.
static LEGACY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("PROTECTION_ENVIRONMENTAL", "protection"),
        ("PROTECTION_FIRE", "fire_protection"),
        ("PROTECTION_FALL", "feather_falling"),
        ("PROTECTION_EXPLOSIONS", "blast_protection"),
        ("PROTECTION_PROJECTILE", "projectile_protection"),
        ("OXYGEN", "respiration"),
        ("WATER_WORKER", "aqua_affinity"),
        ("DAMAGE_ALL", "sharpness"),
        ("DAMAGE_UNDEAD", "smite"),
        ("DAMAGE_ARTHROPODS", "bane_of_arthropods"),
        ("LOOT_BONUS_MOBS", "looting"),
        ("SWEEPING_EDGE", "sweeping_edge"),
        ("DIG_SPEED", "efficiency"),
        ("DURABILITY", "unbreaking"),
        ("LOOT_BONUS_BLOCKS", "fortune"),
        ("ARROW_DAMAGE", "power"),
        ("ARROW_KNOCKBACK", "punch"),
        ("ARROW_FIRE", "flame"),
        ("ARROW_INFINITE", "infinity"),
        ("LUCK", "luck_of_the_sea"),
    ])
});

/// Canonical key for an enchantment token: namespace stripped, legacy names
/// mapped, lower-cased. Unknown names pass through normalized.
pub fn normalize_enchantment(token: &str) -> String {
    let token = token.trim();
    let bare = match token.split_once(':') {
        Some((_, key)) => key,
        None => token,
    };
    match LEGACY_NAMES.get(bare.to_ascii_uppercase().as_str()) {
        Some(key) => (*key).to_string(),
        None => bare.to_ascii_lowercase(),
    }
}
