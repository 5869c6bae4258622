//! Slot-addressed item containers.

mod player;

pub use player::{
    ARMOR_SLOTS, HOTBAR_SIZE, InventorySnapshot, OFF_HAND_SLOT, PLAYER_INVENTORY_SIZE,
    PlayerInventory, STORAGE_SLOTS,
};

use crate::item::ItemStack;

/// Default maximum stack size for materials the container knows nothing about.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// A player's inventory as exposed by the host.
pub trait Inventory {
    fn size(&self) -> usize;

    /// Stack in `slot`, or `None` for empty and out-of-range slots.
    fn item(&self, slot: usize) -> Option<&ItemStack>;

    fn held_slot(&self) -> usize;
    fn armor_slots(&self) -> Vec<usize>;
    fn off_hand_slot(&self) -> usize;

    fn set_amount(&mut self, slot: usize, amount: u32);
    fn clear(&mut self, slot: usize);

    /// Inserts `stack`, merging into similar stacks first. Returns the count
    /// that did not fit.
    fn add_item(&mut self, stack: ItemStack) -> u32;

    fn max_stack_size(&self, _material: &str) -> u32 {
        DEFAULT_MAX_STACK
    }
}
