use crate::{
    criteria::{Aggregate, AmountTarget, Criteria, MatchResult},
    inventory::Inventory,
    item::{
        AIR, ItemMeta, ItemStack, PotionAccess,
        tags::{CUSTOM_DATA, TagReader, path_int, path_string},
    },
};

/// Host capabilities the predicates read through.
#[derive(Clone, Copy)]
pub struct MatchEnv<'a> {
    pub potions: &'a dyn PotionAccess,
    /// Custom tags live under `minecraft:custom_data` instead of the root.
    pub use_components: bool,
}

/// One slot offered to the match engine.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'s> {
    pub slot: usize,
    pub stack: Option<&'s ItemStack>,
}

impl Criteria {
    /// Slots to inspect: the hands when asked for, else `inslot`, else all.
    pub fn candidate_slots(&self, inventory: &dyn Inventory) -> Vec<usize> {
        match (self.main_hand, self.off_hand) {
            (true, true) => vec![inventory.held_slot(), inventory.off_hand_slot()],
            (true, false) => vec![inventory.held_slot()],
            (false, true) => vec![inventory.off_hand_slot()],
            (false, false) => match self.slot {
                Some(slot) => vec![slot],
                None => (0..inventory.size()).collect(),
            },
        }
    }

    pub fn candidates<'s>(&self, inventory: &'s dyn Inventory) -> Vec<Candidate<'s>> {
        self.candidate_slots(inventory)
            .into_iter()
            .map(|slot| Candidate {
                slot,
                stack: inventory.item(slot),
            })
            .collect()
    }

    /// Sums the quantities of matching candidates.
    pub fn resolve<'s, I>(&self, candidates: I, env: &MatchEnv<'_>) -> MatchResult
    where
        I: IntoIterator<Item = Candidate<'s>>,
    {
        let wants_air = self.material.as_deref() == Some(AIR);
        let mut matched = Vec::new();
        let mut total: u64 = 0;

        for Candidate { slot, stack } in candidates {
            let Some(stack) = stack.filter(|s| !s.is_empty()) else {
                if wants_air {
                    return MatchResult {
                        matched: Vec::new(),
                        aggregate: Aggregate::Unbounded,
                    };
                }
                continue;
            };
            if self.matches(stack, env) {
                total = total.saturating_add(u64::from(stack.amount));
                matched.push(slot);
            }
        }

        MatchResult {
            matched,
            aggregate: Aggregate::Count(total),
        }
    }

    /// Whether `result` satisfies the requested amount.
    pub fn decide(&self, result: &MatchResult) -> bool {
        match self.amount {
            Some(AmountTarget::Invalid) => false,
            Some(AmountTarget::Exact(0)) if self.remove => false,
            Some(AmountTarget::Exact(target)) if self.strict => result.aggregate.equals(target),
            Some(AmountTarget::Exact(target)) => result.aggregate.at_least(target),
            None => result.aggregate.at_least(1),
        }
    }

    /// Checks that fail before any slot is inspected, so nothing is removed.
    pub fn rejected_up_front(&self) -> bool {
        match self.amount {
            Some(AmountTarget::Invalid) => true,
            Some(AmountTarget::Exact(0)) => self.remove,
            _ => false,
        }
    }

    /// Every active predicate, in order, against one non-empty stack.
    pub fn matches(&self, stack: &ItemStack, env: &MatchEnv<'_>) -> bool {
        let meta = stack.meta.as_ref();
        self.matches_material(stack)
            && self.matches_meta(meta)
            && self.matches_enchantments(meta)
            && self.matches_potion(stack, env.potions)
            && (!self.enchanted || meta.is_some_and(ItemMeta::is_enchanted))
            && self.matches_tags(stack, env.use_components)
            && (!self.strict || self.material.is_none() || self.matches_strict(stack))
    }

    fn matches_material(&self, stack: &ItemStack) -> bool {
        if self.material.as_ref().is_some_and(|m| *m != stack.material) {
            return false;
        }
        if self.durability.is_some_and(|d| d != stack.damage) {
            return false;
        }
        match &self.material_contains {
            Some(needle) => stack.material.contains(needle.as_str()),
            None => true,
        }
    }

    fn matches_meta(&self, meta: Option<&ItemMeta>) -> bool {
        let Some(meta) = meta else {
            return !(self.wants_name() || self.wants_lore() || self.custom_model_data.is_some());
        };

        if self.custom_model_data.is_some() && meta.custom_model_data != self.custom_model_data {
            return false;
        }
        if let Some(needle) = &self.lore_contains {
            if !meta.lore.iter().any(|line| line.contains(needle.as_str())) {
                return false;
            }
        }
        if let Some(expected) = &self.lore_equals {
            if !meta.has_lore() || meta.lore.join("|") != *expected {
                return false;
            }
        }

        let name = meta.display_name.as_deref();
        if let Some(needle) = &self.name_contains {
            if !name.is_some_and(|n| n.contains(needle.as_str())) {
                return false;
            }
        }
        if let Some(prefix) = &self.name_starts_with {
            if !name.is_some_and(|n| n.starts_with(prefix.as_str())) {
                return false;
            }
        }
        if let Some(expected) = &self.name_equals {
            if name != Some(expected.as_str()) {
                return false;
            }
        }
        true
    }

    fn matches_enchantments(&self, meta: Option<&ItemMeta>) -> bool {
        let Some(required) = &self.enchantments else {
            return true;
        };
        let Some(present) = meta.map(ItemMeta::enchantments) else {
            return false;
        };
        if present.is_empty() {
            return false;
        }
        required
            .iter()
            .all(|(id, level)| present.get(id).is_some_and(|have| level.accepts(*have)))
    }

    fn matches_potion(&self, stack: &ItemStack, potions: &dyn PotionAccess) -> bool {
        if !self.wants_potion() {
            return true;
        }
        let Some(data) = potions.read(stack) else {
            return false;
        };
        self.potion_type.as_ref().is_none_or(|t| *t == data.potion_type)
            && self.potion_extended.is_none_or(|e| e == data.extended)
            && self.potion_upgraded.is_none_or(|u| u == data.upgraded)
    }

    fn matches_tags(&self, stack: &ItemStack, use_components: bool) -> bool {
        if !self.wants_tags() {
            return true;
        }
        let root: &dyn TagReader = if use_components {
            match stack.tags.compound(CUSTOM_DATA) {
                Some(root) => root,
                None => return false,
            }
        } else {
            &stack.tags
        };

        let strings_ok = self.nbt_strings.as_ref().is_none_or(|wanted| {
            wanted
                .iter()
                .all(|(path, value)| path_string(root, path) == Some(value.as_str()))
        });
        let ints_ok = self.nbt_ints.as_ref().is_none_or(|wanted| {
            wanted
                .iter()
                .all(|(path, value)| path_int(root, path) == Some(*value))
        });
        strings_ok && ints_ok
    }

    /// Rejects stacks carrying a name, lore, damage or enchantments that no
    /// active predicate accounts for. Custom data, potions and tags are not
    /// inspected.
    fn matches_strict(&self, stack: &ItemStack) -> bool {
        if stack.damage != 0 && self.durability.is_none() {
            return false;
        }
        let Some(meta) = &stack.meta else {
            return true;
        };
        if meta.display_name.is_some() && !self.wants_name() {
            return false;
        }
        if meta.has_lore() && !self.wants_lore() {
            return false;
        }
        if !meta.enchants.is_empty() && self.enchantments.is_none() && !self.enchanted {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        criteria::{EnchantLevel, parse},
        item::{BasePotionData, PotionData, Tag},
        substitute::NoPlaceholders,
    };

    fn env() -> MatchEnv<'static> {
        MatchEnv {
            potions: &BasePotionData,
            use_components: false,
        }
    }

    fn criteria(raw: &str) -> Criteria {
        parse(raw, &NoPlaceholders)
    }

    fn offer(stacks: &[Option<ItemStack>]) -> Vec<Candidate<'_>> {
        stacks
            .iter()
            .enumerate()
            .map(|(slot, stack)| Candidate {
                slot,
                stack: stack.as_ref(),
            })
            .collect()
    }

    fn named(material: &str, name: &str) -> ItemStack {
        ItemStack::new(material, 1).with_meta(ItemMeta {
            display_name: Some(name.into()),
            ..ItemMeta::default()
        })
    }

    fn enchanted(material: &str, id: &str, level: u32) -> ItemStack {
        let mut meta = ItemMeta::default();
        meta.enchants.insert(id.into(), level);
        ItemStack::new(material, 1).with_meta(meta)
    }

    #[test]
    fn aggregate_sums_matches() {
        let c = criteria("mat:DIRT");
        let stacks = [
            Some(ItemStack::new("DIRT", 3)),
            None,
            Some(ItemStack::new("STONE", 9)),
            Some(ItemStack::new("DIRT", 4)),
        ];
        let result = c.resolve(offer(&stacks), &env());
        assert_eq!(result.aggregate, Aggregate::Count(7));
        assert_eq!(result.matched, vec![0, 3]);
        assert!(c.decide(&result));
    }

    #[test]
    fn amount_threshold() {
        let stacks = [Some(ItemStack::new("DIRT", 3)), Some(ItemStack::new("DIRT", 4))];
        let result = criteria("mat:DIRT,amt:7").resolve(offer(&stacks), &env());
        assert!(criteria("mat:DIRT,amt:7").decide(&result));
        assert!(!criteria("mat:DIRT,amt:8").decide(&result));
        assert!(criteria("mat:DIRT,amt:7,strict").decide(&result));
        assert!(!criteria("mat:DIRT,amt:6,strict").decide(&result));
    }

    #[test]
    fn invalid_amount_always_false() {
        let c = criteria("mat:DIRT,amt:x");
        let stacks = [Some(ItemStack::new("DIRT", 64))];
        assert!(!c.decide(&c.resolve(offer(&stacks), &env())));
        assert!(c.rejected_up_front());
    }

    #[test]
    fn air_is_unbounded() {
        let stacks = [Some(ItemStack::new("DIRT", 1)), None];
        let c = criteria("mat:AIR");
        let result = c.resolve(offer(&stacks), &env());
        assert_eq!(result.aggregate, Aggregate::Unbounded);
        assert!(c.decide(&result));
        assert!(criteria("mat:AIR,amt:1000000").decide(&result));
        assert!(!criteria("mat:AIR,amt:5,strict").decide(&result));
    }

    #[test]
    fn air_without_empty_slot() {
        let stacks = [Some(ItemStack::new("DIRT", 1))];
        let c = criteria("mat:AIR");
        assert_eq!(c.resolve(offer(&stacks), &env()).aggregate, Aggregate::Count(0));
    }

    #[test]
    fn strict_rejects_extra_attributes() {
        let plain = ItemStack::new("DIAMOND", 1);
        let fancy = named("DIAMOND", "Shiny");
        let sharp = enchanted("DIAMOND", "sharpness", 1);

        let strict = criteria("mat:DIAMOND,strict");
        assert!(strict.matches(&plain, &env()));
        assert!(!strict.matches(&fancy, &env()));
        assert!(!strict.matches(&sharp, &env()));
        assert!(!strict.matches(&plain.clone().with_damage(3), &env()));

        let loose = criteria("mat:DIAMOND");
        assert!(loose.matches(&fancy, &env()));
        assert!(loose.matches(&sharp, &env()));
    }

    #[test]
    fn strict_accepts_covered_attributes() {
        let fancy = named("DIAMOND", "Shiny");
        assert!(criteria("mat:DIAMOND,strict,namecontains:Shi").matches(&fancy, &env()));
        let sharp = enchanted("DIAMOND", "sharpness", 1);
        assert!(criteria("mat:DIAMOND,strict,enchanted").matches(&sharp, &env()));
    }

    #[test]
    fn strict_without_material_is_lenient() {
        assert!(criteria("strict").matches(&named("DIAMOND", "Shiny"), &env()));
    }

    #[test]
    fn name_predicates_need_meta() {
        let plain = ItemStack::new("DIAMOND_SWORD", 1);
        assert!(!criteria("namecontains:Sword").matches(&plain, &env()));

        let sword = named("DIAMOND_SWORD", "Great Sword");
        assert!(criteria("namecontains:Sword").matches(&sword, &env()));
        assert!(criteria("namestartswith:Great").matches(&sword, &env()));
        assert!(criteria("nameequals:Great Sword").matches(&sword, &env()));
        assert!(!criteria("nameequals:Great").matches(&sword, &env()));
    }

    #[test]
    fn lore_predicates() {
        let stack = ItemStack::new("PAPER", 1).with_meta(ItemMeta {
            lore: vec!["Line one".into(), "Line two".into()],
            ..ItemMeta::default()
        });
        assert!(criteria("lorecontains:two").matches(&stack, &env()));
        assert!(criteria("loreequals:Line one|Line two").matches(&stack, &env()));
        assert!(!criteria("loreequals:Line one").matches(&stack, &env()));
    }

    #[test]
    fn material_substring_and_custom_data() {
        let stack = ItemStack::new("DIAMOND_SWORD", 1).with_meta(ItemMeta {
            custom_model_data: Some(7),
            ..ItemMeta::default()
        });
        assert!(criteria("matcontains:SWORD").matches(&stack, &env()));
        assert!(criteria("custommodeldata:7").matches(&stack, &env()));
        assert!(!criteria("custommodeldata:8").matches(&stack, &env()));
    }

    #[test]
    fn enchantment_superset() {
        let mut meta = ItemMeta::default();
        meta.enchants =
            BTreeMap::from([("sharpness".to_string(), 5), ("unbreaking".to_string(), 3)]);
        let sword = ItemStack::new("DIAMOND_SWORD", 1).with_meta(meta);

        assert!(criteria("enchantments:sharpness=5").matches(&sword, &env()));
        assert!(criteria("enchantments:sharpness;unbreaking=3").matches(&sword, &env()));
        assert!(!criteria("enchantments:sharpness=4").matches(&sword, &env()));
        assert!(!criteria("enchantments:mending").matches(&sword, &env()));
        let plain = ItemStack::new("DIAMOND_SWORD", 1);
        assert!(!criteria("enchantments:sharpness").matches(&plain, &env()));
    }

    #[test]
    fn stored_enchantments_on_books() {
        let book = ItemStack::new("ENCHANTED_BOOK", 1).with_meta(ItemMeta {
            stored_enchants: Some(BTreeMap::from([("mending".to_string(), 1)])),
            ..ItemMeta::default()
        });
        let c = criteria("enchantments:mending");
        assert_eq!(
            c.enchantments.as_ref().and_then(|e| e.get("mending")),
            Some(&EnchantLevel::Any)
        );
        assert!(c.matches(&book, &env()));
        assert!(criteria("enchanted").matches(&book, &env()));
    }

    #[test]
    fn potion_predicates() {
        let potion = ItemStack::new("POTION", 1).with_meta(ItemMeta {
            base_potion: Some(PotionData {
                potion_type: "SWIFTNESS".into(),
                extended: true,
                upgraded: false,
            }),
            ..ItemMeta::default()
        });
        assert!(criteria("potiontype:swiftness,potionextended:true").matches(&potion, &env()));
        assert!(!criteria("potionupgraded:true").matches(&potion, &env()));
        assert!(!criteria("potiontype:swiftness").matches(&ItemStack::new("POTION", 1), &env()));
    }

    #[test]
    fn nested_tags() {
        let mut stack = ItemStack::new("STICK", 1);
        stack.tags.set_path("owner", Tag::String("steve".into()));
        stack.tags.set_path("stats..kills", Tag::Int(3));

        assert!(criteria("nbtstrings:owner=steve,nbtints:stats..kills=3").matches(&stack, &env()));
        assert!(!criteria("nbtints:stats..kills=4").matches(&stack, &env()));
        assert!(!criteria("nbtstrings:nope..owner=steve").matches(&stack, &env()));
    }

    #[test]
    fn component_tags_rooted_at_custom_data() {
        let mut stack = ItemStack::new("STICK", 1);
        stack.tags.set_path("minecraft:custom_data..owner", Tag::String("steve".into()));
        let components = MatchEnv {
            potions: &BasePotionData,
            use_components: true,
        };
        let c = criteria("nbtstrings:owner=steve");
        assert!(c.matches(&stack, &components));
        assert!(!c.matches(&stack, &env()));
        assert!(!c.matches(&ItemStack::new("STICK", 1), &components));
    }

    #[test]
    fn removal_with_zero_target_is_false() {
        let c = criteria("mat:DIRT,amt:0").removing();
        assert!(c.rejected_up_front());
        let stacks = [Some(ItemStack::new("DIRT", 1))];
        assert!(!c.decide(&c.resolve(offer(&stacks), &env())));
    }
}
