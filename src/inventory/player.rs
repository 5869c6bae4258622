use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::LoadError,
    inventory::{DEFAULT_MAX_STACK, Inventory},
    item::ItemStack,
};

/// Main storage: hotbar 0..9 followed by 27 backpack slots.
pub const STORAGE_SLOTS: usize = 36;
pub const HOTBAR_SIZE: usize = 9;
/// Boots, leggings, chestplate, helmet.
pub const ARMOR_SLOTS: [usize; 4] = [36, 37, 38, 39];
pub const OFF_HAND_SLOT: usize = 40;
pub const PLAYER_INVENTORY_SIZE: usize = 41;

/// On-disk form: only occupied slots are listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySnapshot {
    pub held_slot: usize,
    pub slots: BTreeMap<usize, ItemStack>,
    pub stack_limits: HashMap<String, u32>,
}

#[derive(Debug, Clone)]
pub struct PlayerInventory {
    slots: Vec<Option<ItemStack>>,
    held_slot: usize,
    stack_limits: HashMap<String, u32>,
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self {
            slots: vec![None; PLAYER_INVENTORY_SIZE],
            held_slot: 0,
            stack_limits: HashMap::new(),
        }
    }
}

impl From<InventorySnapshot> for PlayerInventory {
    fn from(snapshot: InventorySnapshot) -> Self {
        let mut inventory = Self::default();
        for (material, limit) in snapshot.stack_limits {
            inventory.set_stack_limit(material, limit);
        }
        inventory.set_held_slot(snapshot.held_slot);
        for (slot, stack) in snapshot.slots {
            if slot >= PLAYER_INVENTORY_SIZE {
                warn!("ignoring snapshot slot {slot}: outside the player inventory");
                continue;
            }
            inventory.set(slot, stack);
        }
        inventory
    }
}

impl PlayerInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let snapshot: InventorySnapshot = serde_json::from_str(text)?;
        Ok(snapshot.into())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            held_slot: self.held_slot,
            slots: self
                .slots
                .iter()
                .enumerate()
                .filter_map(|(slot, stack)| stack.clone().map(|s| (slot, s)))
                .collect(),
            stack_limits: self.stack_limits.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Selects the hotbar slot; out-of-range values are ignored.
    pub fn set_held_slot(&mut self, slot: usize) {
        if slot < HOTBAR_SIZE {
            self.held_slot = slot;
        } else {
            warn!("held slot {slot} is not a hotbar slot");
        }
    }

    /// Places `stack` in `slot`, dropping empty stacks.
    pub fn set(&mut self, slot: usize, stack: ItemStack) {
        if let Some(cell) = self.slots.get_mut(slot) {
            *cell = (!stack.is_empty()).then_some(stack);
        }
    }

    pub fn set_stack_limit(&mut self, material: impl Into<String>, limit: u32) {
        self.stack_limits.insert(material.into(), limit.max(1));
    }

    /// Total count of `material` across all slots.
    pub fn count(&self, material: &str) -> u64 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.material == material)
            .map(|s| u64::from(s.amount))
            .sum()
    }
}

impl Inventory for PlayerInventory {
    fn size(&self) -> usize {
        PLAYER_INVENTORY_SIZE
    }

    fn item(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot)?.as_ref()
    }

    fn held_slot(&self) -> usize {
        self.held_slot
    }

    fn armor_slots(&self) -> Vec<usize> {
        ARMOR_SLOTS.to_vec()
    }

    fn off_hand_slot(&self) -> usize {
        OFF_HAND_SLOT
    }

    fn set_amount(&mut self, slot: usize, amount: u32) {
        if amount == 0 {
            self.clear(slot);
        } else if let Some(Some(stack)) = self.slots.get_mut(slot) {
            stack.amount = amount;
        }
    }

    fn clear(&mut self, slot: usize) {
        if let Some(cell) = self.slots.get_mut(slot) {
            *cell = None;
        }
    }

    fn add_item(&mut self, stack: ItemStack) -> u32 {
        let limit = self.max_stack_size(&stack.material);
        let mut remaining = stack.amount;

        for cell in self.slots[..STORAGE_SLOTS].iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if cell.is_similar(&stack) && cell.amount < limit {
                let moved = remaining.min(limit - cell.amount);
                cell.amount += moved;
                remaining -= moved;
            }
        }

        for cell in self.slots[..STORAGE_SLOTS].iter_mut() {
            if remaining == 0 {
                break;
            }
            if cell.is_none() {
                let moved = remaining.min(limit);
                let mut placed = stack.clone();
                placed.amount = moved;
                *cell = Some(placed);
                remaining -= moved;
            }
        }

        remaining
    }

    fn max_stack_size(&self, material: &str) -> u32 {
        self.stack_limits
            .get(material)
            .copied()
            .unwrap_or(DEFAULT_MAX_STACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_merges_then_fills_empty() {
        let mut inv = PlayerInventory::new();
        inv.set(0, ItemStack::new("DIRT", 60));
        assert_eq!(inv.add_item(ItemStack::new("DIRT", 10)), 0);
        assert_eq!(inv.item(0).unwrap().amount, 64);
        assert_eq!(inv.item(1).unwrap().amount, 6);
    }

    #[test]
    fn add_skips_armor_and_off_hand() {
        let mut inv = PlayerInventory::new();
        for slot in 0..STORAGE_SLOTS {
            inv.set(slot, ItemStack::new("STONE", 64));
        }
        assert_eq!(inv.add_item(ItemStack::new("DIRT", 5)), 5);
        assert!(inv.item(OFF_HAND_SLOT).is_none());
    }

    #[test]
    fn stack_limit_respected() {
        let mut inv = PlayerInventory::new();
        inv.set_stack_limit("ENDER_PEARL", 16);
        assert_eq!(inv.add_item(ItemStack::new("ENDER_PEARL", 20)), 0);
        assert_eq!(inv.item(0).unwrap().amount, 16);
        assert_eq!(inv.item(1).unwrap().amount, 4);
    }

    #[test]
    fn set_amount_zero_clears() {
        let mut inv = PlayerInventory::new();
        inv.set(3, ItemStack::new("DIRT", 4));
        inv.set_amount(3, 0);
        assert!(inv.item(3).is_none());
    }

    #[test]
    fn snapshot_zero_stack_limit_is_raised() {
        let mut inv = PlayerInventory::from_json(r#"{"stack_limits":{"EGG":0}}"#).unwrap();
        assert_eq!(inv.max_stack_size("EGG"), 1);
        assert_eq!(inv.add_item(ItemStack::new("EGG", 3)), 0);
        assert_eq!(inv.item(2).unwrap().amount, 1);
        assert!(inv.item(3).is_none());
    }

    #[test]
    fn snapshot_json() {
        let inv = PlayerInventory::from_json(concat!(
            r#"{"held_slot":2,"slots":{"2":{"material":"DIAMOND","amount":3},"#,
            r#""40":{"material":"SHIELD"},"99":{"material":"DIRT"}}}"#,
        ))
        .unwrap();
        assert_eq!(inv.held_slot(), 2);
        assert_eq!(inv.item(2).unwrap().amount, 3);
        assert_eq!(inv.item(OFF_HAND_SLOT).unwrap().material, "SHIELD");
        assert_eq!(inv.count("DIRT"), 0);
        assert_eq!(inv.snapshot().slots.len(), 2);
    }
}
