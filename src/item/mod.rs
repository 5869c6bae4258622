//! Item stacks as seen by the match engine.

pub mod enchant;
pub mod potion;
pub mod tags;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use enchant::normalize_enchantment;
pub use potion::{BasePotionData, PotionAccess, PotionContents, PotionData};
pub use tags::{Compound, Tag, TagReader};

/// Material name of an empty slot.
pub const AIR: &str = "AIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemMeta {
    pub display_name: Option<String>,
    pub lore: Vec<String>,
    pub custom_model_data: Option<i32>,
    /// Applied enchantments, keyed by normalized id.
    pub enchants: BTreeMap<String, u32>,
    /// Stored enchantments; present only on enchanted books.
    pub stored_enchants: Option<BTreeMap<String, u32>>,
    pub base_potion: Option<PotionData>,
}

impl ItemMeta {
    pub fn has_lore(&self) -> bool {
        !self.lore.is_empty()
    }

    /// Stored enchantments when this meta carries them, applied otherwise.
    pub fn enchantments(&self) -> &BTreeMap<String, u32> {
        self.stored_enchants.as_ref().unwrap_or(&self.enchants)
    }

    pub fn is_enchanted(&self) -> bool {
        !self.enchantments().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: String,
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ItemMeta>,
    #[serde(default, skip_serializing_if = "Compound::is_empty")]
    pub tags: Compound,
}

fn default_amount() -> u32 {
    1
}

impl ItemStack {
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            damage: 0,
            meta: None,
            tags: Compound::new(),
        }
    }

    pub fn with_meta(mut self, meta: ItemMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    pub fn meta_mut(&mut self) -> &mut ItemMeta {
        self.meta.get_or_insert_with(ItemMeta::default)
    }

    /// Absent stacks, air and zero-sized stacks all count as empty.
    pub fn is_empty(&self) -> bool {
        self.amount == 0 || self.material == AIR
    }

    /// Same item apart from the count.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.material == other.material
            && self.damage == other.damage
            && self.meta == other.meta
            && self.tags == other.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_enchants_take_priority() {
        let mut meta = ItemMeta::default();
        meta.enchants.insert("sharpness".into(), 2);
        assert_eq!(meta.enchantments().get("sharpness"), Some(&2));

        meta.stored_enchants = Some(BTreeMap::from([("mending".to_string(), 1)]));
        assert!(meta.enchantments().get("sharpness").is_none());
        assert!(meta.is_enchanted());
    }

    #[test]
    fn similarity_ignores_amount() {
        let a = ItemStack::new("DIRT", 3);
        let b = ItemStack::new("DIRT", 60);
        assert!(a.is_similar(&b));
        assert!(!a.is_similar(&b.clone().with_damage(1)));
    }

    #[test]
    fn deserialize_defaults() {
        let stack: ItemStack = serde_json::from_str(r#"{"material":"DIRT"}"#).unwrap();
        assert_eq!(stack.amount, 1);
        assert!(stack.meta.is_none());
        assert!(!stack.is_empty());
    }
}
