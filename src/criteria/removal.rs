use std::collections::HashSet;

use log::debug;

use crate::{
    criteria::{Aggregate, Criteria, MatchResult},
    inventory::Inventory,
};

impl Criteria {
    /// Debits the matched slots and returns the aggregate to report.
    ///
    /// With an amount, nothing is taken unless the match covers it, and the
    /// reported aggregate becomes the amount. Without one, every matched
    /// stack is cleared.
    pub fn remove_matched(&self, result: &MatchResult, inventory: &mut dyn Inventory) -> Aggregate {
        let total = match result.aggregate {
            Aggregate::Count(n) => n,
            Aggregate::Unbounded => return Aggregate::Unbounded,
        };

        let (mut remaining, reported) = match self.amount {
            Some(target) => {
                let target = target.count();
                if total < u64::from(target) {
                    return result.aggregate;
                }
                (u64::from(target), Aggregate::Count(u64::from(target)))
            }
            None => (total, result.aggregate),
        };

        let matched: HashSet<usize> = result.matched.iter().copied().collect();
        for slot in debit_order(inventory) {
            if remaining == 0 {
                break;
            }
            if !matched.contains(&slot) {
                continue;
            }
            let Some(amount) = inventory.item(slot).map(|s| u64::from(s.amount)) else {
                continue;
            };
            if amount > remaining {
                // amount - remaining < amount, which came from a u32
                inventory.set_amount(slot, (amount - remaining) as u32);
                remaining = 0;
            } else {
                remaining -= amount;
                inventory.clear(slot);
            }
            debug!("debited slot {slot}");
        }
        reported
    }
}

/// Armour, then off-hand, then every other slot ascending.
fn debit_order(inventory: &dyn Inventory) -> Vec<usize> {
    let mut order = inventory.armor_slots();
    order.push(inventory.off_hand_slot());
    let first: HashSet<usize> = order.iter().copied().collect();
    order.extend((0..inventory.size()).filter(|slot| !first.contains(slot)));
    order
}
