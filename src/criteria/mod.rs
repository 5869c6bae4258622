//! Criteria strings: `mat:DIAMOND,amt:5,namecontains:Sword,strict`.

pub mod evaluate;
pub mod parse;
pub mod removal;
pub mod split;

use std::{collections::BTreeMap, fmt};

pub use evaluate::{Candidate, MatchEnv};
pub use parse::{CriteriaParser, parse};

/// Requested quantity. `Invalid` means an amount was asked for but could not
/// be computed, which always fails the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountTarget {
    Exact(u32),
    Invalid,
}

impl AmountTarget {
    /// Target used when removing or issuing; `Invalid` moves nothing.
    pub fn count(self) -> u32 {
        match self {
            AmountTarget::Exact(n) => n,
            AmountTarget::Invalid => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnchantLevel {
    Any,
    Exact(u32),
}

impl EnchantLevel {
    pub fn accepts(self, level: u32) -> bool {
        match self {
            EnchantLevel::Any => true,
            EnchantLevel::Exact(want) => want == level,
        }
    }
}

/// Parsed predicate set. Each `Some`/`true` field is an active predicate;
/// absent fields never compare.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub material: Option<String>,
    pub durability: Option<i32>,
    pub custom_model_data: Option<i32>,
    pub amount: Option<AmountTarget>,
    pub name_contains: Option<String>,
    pub name_starts_with: Option<String>,
    pub name_equals: Option<String>,
    pub lore_contains: Option<String>,
    pub lore_equals: Option<String>,
    pub material_contains: Option<String>,
    pub enchantments: Option<BTreeMap<String, EnchantLevel>>,
    pub enchanted: bool,
    pub potion_type: Option<String>,
    pub potion_extended: Option<bool>,
    pub potion_upgraded: Option<bool>,
    pub nbt_strings: Option<BTreeMap<String, String>>,
    pub nbt_ints: Option<BTreeMap<String, i32>>,
    pub main_hand: bool,
    pub off_hand: bool,
    pub slot: Option<usize>,
    pub strict: bool,
    pub remove: bool,
}

impl Criteria {
    /// The same predicates, with matched stacks debited on evaluation.
    pub fn removing(mut self) -> Self {
        self.remove = true;
        self
    }

    pub fn wants_name(&self) -> bool {
        self.name_contains.is_some()
            || self.name_starts_with.is_some()
            || self.name_equals.is_some()
    }

    pub fn wants_lore(&self) -> bool {
        self.lore_contains.is_some() || self.lore_equals.is_some()
    }

    pub fn wants_potion(&self) -> bool {
        self.potion_type.is_some()
            || self.potion_extended.is_some()
            || self.potion_upgraded.is_some()
    }

    pub fn wants_tags(&self) -> bool {
        self.nbt_strings.is_some() || self.nbt_ints.is_some()
    }
}

/// Sum of matched quantities. `Unbounded` is what an `AIR` query reports
/// once an empty slot is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count(u64),
    Unbounded,
}

impl Aggregate {
    pub fn at_least(self, target: u32) -> bool {
        match self {
            Aggregate::Count(n) => n >= u64::from(target),
            Aggregate::Unbounded => true,
        }
    }

    pub fn equals(self, target: u32) -> bool {
        match self {
            Aggregate::Count(n) => n == u64::from(target),
            Aggregate::Unbounded => false,
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregate::Count(n) => write!(f, "{n}"),
            // hosts render "unlimited" as the largest 32-bit int
            Aggregate::Unbounded => write!(f, "{}", i32::MAX),
        }
    }
}

/// Slots that satisfied the criteria, in encounter order, and their total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: Vec<usize>,
    pub aggregate: Aggregate,
}

impl MatchResult {
    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }
}
