use log::debug;

use crate::{
    criteria::{AmountTarget, Criteria, EnchantLevel},
    inventory::Inventory,
    item::{
        AIR, ItemStack, PotionAccess, PotionData, Tag,
        tags::{CUSTOM_DATA, Compound},
    },
    request::{
        CheckItem, MSG_GIVE_DISABLED, RESULT_ERROR, RESULT_YES, RequestHandler,
        translate_color_codes,
    },
    substitute::Placeholders,
};

/// `give_<criteria>`: builds the described item and adds it to the
/// inventory.
pub struct Give;

impl RequestHandler for Give {
    const PREFIX: &'static str = "give_";

    fn handle(
        checkitem: &CheckItem,
        placeholders: &dyn Placeholders,
        inventory: &mut dyn Inventory,
        args: &str,
    ) -> String {
        let config = checkitem.config();
        if !config.give_enabled {
            return MSG_GIVE_DISABLED.to_string();
        }

        let args = checkitem.resolve(placeholders, &translate_color_codes(args));
        let criteria = checkitem.parser(placeholders).parse(&args);
        let potions = checkitem.potions.as_ref();
        let Some(item) = build_item(&criteria, potions, config.use_components) else {
            return RESULT_ERROR.to_string();
        };

        match criteria.amount {
            Some(target) => {
                let left = distribute(inventory, &item, target);
                if left > 0 {
                    debug!("give {}: {left} did not fit", item.material);
                }
            }
            None => {
                inventory.add_item(item);
            }
        }
        RESULT_YES.to_string()
    }
}

/// The stack a criteria set describes, or `None` without a usable material.
pub fn build_item(
    criteria: &Criteria,
    potions: &dyn PotionAccess,
    use_components: bool,
) -> Option<ItemStack> {
    let material = criteria
        .material
        .as_deref()
        .filter(|m| !m.is_empty() && *m != AIR)?;

    let mut item = ItemStack::new(material, 1);
    if let Some(damage) = criteria.durability {
        item.damage = damage;
    }

    let meta = item.meta_mut();
    meta.custom_model_data = criteria.custom_model_data;
    meta.display_name = criteria.name_equals.clone();
    if let Some(lore) = &criteria.lore_equals {
        meta.lore = lore.split('|').map(str::to_string).collect();
    }
    if let Some(enchantments) = &criteria.enchantments {
        for (id, level) in enchantments {
            let level = match level {
                EnchantLevel::Any => 1,
                EnchantLevel::Exact(n) => *n,
            };
            meta.enchants.insert(id.clone(), level);
        }
    }

    if let Some(potion_type) = &criteria.potion_type {
        let data = PotionData {
            potion_type: potion_type.clone(),
            extended: criteria.potion_extended.unwrap_or(false),
            upgraded: criteria.potion_upgraded.unwrap_or(false),
        };
        if !potions.write(&mut item, &data) {
            debug!("{material} cannot carry potion data");
        }
    }

    if criteria.wants_tags() {
        let root: &mut Compound = if use_components {
            item.tags.compound_mut(CUSTOM_DATA)
        } else {
            &mut item.tags
        };
        for (path, value) in criteria.nbt_strings.iter().flatten() {
            root.set_path(path, Tag::String(value.clone()));
        }
        for (path, value) in criteria.nbt_ints.iter().flatten() {
            root.set_path(path, Tag::Int(*value));
        }
    }

    Some(item)
}

/// Adds `target` copies of `prototype` in max-size stacks, stopping at the
/// first stack that does not fully fit. Returns what was not placed.
fn distribute(inventory: &mut dyn Inventory, prototype: &ItemStack, target: AmountTarget) -> u32 {
    let max_stack = inventory.max_stack_size(&prototype.material).max(1);
    let mut remaining = target.count();
    while remaining > 0 {
        let give = remaining.min(max_stack);
        let mut stack = prototype.clone();
        stack.amount = give;
        remaining -= give;
        let leftover = inventory.add_item(stack);
        if leftover > 0 {
            return remaining + leftover;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        criteria::parse,
        inventory::PlayerInventory,
        item::{BasePotionData, tags::path_string},
        substitute::NoPlaceholders,
    };

    fn item(raw: &str) -> Option<ItemStack> {
        build_item(&parse(raw, &NoPlaceholders), &BasePotionData, false)
    }

    #[test]
    fn build_requires_material() {
        assert!(item("amt:3").is_none());
        assert!(item("mat:AIR").is_none());
    }

    #[test]
    fn build_sets_meta() {
        let stack = item(concat!(
            "mat:DIAMOND_SWORD,nameequals:Blade,loreequals:a|b,",
            "enchantments:sharpness;unbreaking=3,data:5",
        ))
        .unwrap();
        let meta = stack.meta.as_ref().unwrap();
        assert_eq!(meta.display_name.as_deref(), Some("Blade"));
        assert_eq!(meta.lore, vec!["a", "b"]);
        assert_eq!(meta.enchants.get("sharpness"), Some(&1));
        assert_eq!(meta.enchants.get("unbreaking"), Some(&3));
        assert_eq!(stack.damage, 5);
    }

    #[test]
    fn namecontains_does_not_name() {
        let stack = item("mat:STICK,namecontains:x").unwrap();
        assert!(stack.meta.unwrap().display_name.is_none());
    }

    #[test]
    fn build_writes_tags() {
        let stack = item("mat:STICK,nbtstrings:owner..name=steve").unwrap();
        assert_eq!(path_string(&stack.tags, "owner..name"), Some("steve"));

        let criteria = parse("mat:STICK,nbtstrings:owner=steve", &NoPlaceholders);
        let stack = build_item(&criteria, &BasePotionData, true).unwrap();
        assert_eq!(path_string(&stack.tags, "minecraft:custom_data..owner"), Some("steve"));
    }

    #[test]
    fn build_potion() {
        let stack = item("mat:POTION,potiontype:swiftness,potionupgraded:true").unwrap();
        let data = stack.meta.unwrap().base_potion.unwrap();
        assert_eq!(data.potion_type, "SWIFTNESS");
        assert!(data.upgraded && !data.extended);
    }

    #[test]
    fn distribute_in_max_stacks() {
        let mut inv = PlayerInventory::new();
        let left = distribute(&mut inv, &ItemStack::new("DIRT", 1), AmountTarget::Exact(130));
        assert_eq!(left, 0);
        assert_eq!(inv.item(0).unwrap().amount, 64);
        assert_eq!(inv.item(1).unwrap().amount, 64);
        assert_eq!(inv.item(2).unwrap().amount, 2);
    }

    #[test]
    fn distribute_stops_when_full() {
        let mut inv = PlayerInventory::new();
        for slot in 0..35 {
            inv.set(slot, ItemStack::new("STONE", 64));
        }
        let left = distribute(&mut inv, &ItemStack::new("DIRT", 1), AmountTarget::Exact(130));
        assert_eq!(left, 66);
        assert_eq!(inv.count("DIRT"), 64);
    }

    #[test]
    fn invalid_amount_gives_nothing() {
        let mut inv = PlayerInventory::new();
        assert_eq!(distribute(&mut inv, &ItemStack::new("DIRT", 1), AmountTarget::Invalid), 0);
        assert_eq!(inv.count("DIRT"), 0);
    }
}
