use std::collections::BTreeMap;

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    criteria::{AmountTarget, Criteria, EnchantLevel, split::split_unescaped},
    expr,
    item::normalize_enchantment,
    substitute::{DEFAULT_MAX_PASSES, Placeholders, brace_tokens_to_percent, resolve_all},
};

static EQUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\{cmi_equationint_(.*)\}$").expect("valid equation pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Durability,
    CustomModelData,
    Material,
    AmountExpr,
    Amount,
    NameStartsWith,
    NameContains,
    NameEquals,
    LoreContains,
    LoreEquals,
    MaterialContains,
    Enchantments,
    PotionType,
    PotionExtended,
    PotionUpgraded,
    NbtStrings,
    NbtInts,
    InSlot,
}

/// Checked in order; the first matching prefix claims the field.
const PREFIXES: &[(&str, Field)] = &[
    ("data:", Field::Durability),
    ("custommodeldata:", Field::CustomModelData),
    ("mat:", Field::Material),
    ("amtexpr:", Field::AmountExpr),
    ("amt:", Field::Amount),
    ("namestartswith:", Field::NameStartsWith),
    ("namecontains:", Field::NameContains),
    ("nameequals:", Field::NameEquals),
    ("lorecontains:", Field::LoreContains),
    ("loreequals:", Field::LoreEquals),
    ("matcontains:", Field::MaterialContains),
    ("enchantments:", Field::Enchantments),
    ("potiontype:", Field::PotionType),
    ("potionextended:", Field::PotionExtended),
    ("potionupgraded:", Field::PotionUpgraded),
    ("nbtstrings:", Field::NbtStrings),
    ("nbtints:", Field::NbtInts),
    ("inslot:", Field::InSlot),
];

fn classify(field: &str) -> Option<(Field, &str)> {
    PREFIXES
        .iter()
        .find_map(|(prefix, kind)| field.strip_prefix(prefix).map(|value| (*kind, value)))
}

/// Turns criteria strings into [`Criteria`], expanding placeholders through
/// the host as it goes. Malformed fields are skipped, never reported.
pub struct CriteriaParser<'a, P: Placeholders + ?Sized> {
    placeholders: &'a P,
    max_passes: usize,
}

impl<'a, P: Placeholders + ?Sized> CriteriaParser<'a, P> {
    pub fn new(placeholders: &'a P) -> Self {
        Self {
            placeholders,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    fn resolve(&self, text: &str) -> String {
        resolve_all(self.placeholders, text, self.max_passes)
    }

    pub fn parse(&self, raw: &str) -> Criteria {
        let mut criteria = Criteria::default();
        let input = self.resolve(&raw.replace("__", " "));
        if input.is_empty() {
            return criteria;
        }
        for field in split_unescaped(&input, ',') {
            if !field.is_empty() {
                self.apply(&mut criteria, &field);
            }
        }
        criteria
    }

    fn apply(&self, criteria: &mut Criteria, field: &str) {
        if let Some((kind, value)) = classify(field) {
            self.apply_prefixed(criteria, kind, value);
            return;
        }

        match field {
            "inhand" => {
                criteria.main_hand = true;
                criteria.off_hand = true;
            }
            "inhand:main" => criteria.main_hand = true,
            "inhand:off" => criteria.off_hand = true,
            "strict" => criteria.strict = true,
            "enchanted" => criteria.enchanted = true,
            _ => trace!("ignoring criteria field: {field}"),
        }
    }

    fn apply_prefixed(&self, criteria: &mut Criteria, kind: Field, raw: &str) {
        if kind == Field::AmountExpr {
            criteria.amount = Some(self.amount_expression(raw));
            return;
        }

        let value = self.resolve(raw);
        match kind {
            Field::Durability => match value.trim().parse::<i32>() {
                Ok(damage) => criteria.durability = Some(damage),
                Err(_) => trace!("ignoring durability: {value}"),
            },
            Field::CustomModelData => match value.trim().parse::<i32>() {
                Ok(id) if id >= 0 => criteria.custom_model_data = Some(id),
                _ => trace!("ignoring custom model data: {value}"),
            },
            Field::Material => criteria.material = Some(value.to_ascii_uppercase()),
            Field::Amount => {
                criteria.amount = Some(match value.trim().parse::<u32>() {
                    Ok(n) => AmountTarget::Exact(n),
                    Err(_) => AmountTarget::Invalid,
                })
            }
            Field::NameStartsWith => criteria.name_starts_with = Some(value),
            Field::NameContains => criteria.name_contains = Some(value),
            Field::NameEquals => criteria.name_equals = Some(value),
            Field::LoreContains => criteria.lore_contains = Some(value),
            Field::LoreEquals => criteria.lore_equals = Some(value),
            Field::MaterialContains => criteria.material_contains = Some(value),
            Field::Enchantments => criteria.enchantments = Some(self.enchantments(&value)),
            Field::PotionType => criteria.potion_type = Some(value.to_ascii_uppercase()),
            Field::PotionExtended => {
                criteria.potion_extended = Some(value.eq_ignore_ascii_case("true"))
            }
            Field::PotionUpgraded => {
                criteria.potion_upgraded = Some(value.eq_ignore_ascii_case("true"))
            }
            Field::NbtStrings => criteria.nbt_strings = Some(self.pairs(&value, Some)),
            Field::NbtInts => {
                criteria.nbt_ints = Some(self.pairs(&value, |v| v.trim().parse().ok()))
            }
            Field::InSlot => criteria.slot = value.trim().parse::<usize>().ok(),
            Field::AmountExpr => {}
        }
    }

    fn amount_expression(&self, raw: &str) -> AmountTarget {
        let resolved = self.resolve(raw.trim());
        let body = match EQUATION.captures(&resolved) {
            Some(caps) => caps[1].to_string(),
            None => resolved.clone(),
        };
        let body = self.resolve(&brace_tokens_to_percent(&body));
        match expr::evaluate(&body) {
            Ok(n) => AmountTarget::Exact(n),
            Err(e) => {
                debug!("amount expression {resolved:?} rejected: {e}");
                AmountTarget::Invalid
            }
        }
    }

    fn enchantments(&self, body: &str) -> BTreeMap<String, EnchantLevel> {
        let mut out = BTreeMap::new();
        for segment in split_unescaped(body, ';') {
            if segment.is_empty() {
                continue;
            }
            let (id, level) = match segment.split_once('=') {
                Some((id, level)) => (id, Some(level)),
                None => (segment.as_str(), None),
            };
            let id = normalize_enchantment(&self.resolve(id));
            if id.is_empty() {
                continue;
            }
            let level = level
                .and_then(|l| self.resolve(l).trim().parse::<u32>().ok())
                .map_or(EnchantLevel::Any, EnchantLevel::Exact);
            out.insert(id, level);
        }
        out
    }

    /// `key=value;key=value` bodies. Segments without `=`, or whose value
    /// `convert` rejects, are dropped.
    fn pairs<T>(&self, body: &str, convert: impl Fn(String) -> Option<T>) -> BTreeMap<String, T> {
        split_unescaped(body, ';')
            .iter()
            .filter_map(|segment| segment.split_once('='))
            .filter_map(|(key, value)| {
                let value = convert(self.resolve(value))?;
                Some((self.resolve(key), value))
            })
            .collect()
    }
}

/// Parses with the default substitution pass limit.
pub fn parse<P: Placeholders + ?Sized>(raw: &str, placeholders: &P) -> Criteria {
    CriteriaParser::new(placeholders).parse(raw)
}
