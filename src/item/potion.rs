//! Potion data access, which differs between host generations.

use serde::{Deserialize, Serialize};

use crate::item::{
    ItemStack,
    tags::{PATH_SEPARATOR, Tag, TagReader, path_string},
};

const POTION_MATERIALS: [&str; 4] = ["POTION", "SPLASH_POTION", "LINGERING_POTION", "TIPPED_ARROW"];

/// Component carrying potion contents on component-based hosts.
pub const POTION_CONTENTS: &str = "minecraft:potion_contents";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotionData {
    #[serde(rename = "type")]
    pub potion_type: String,
    #[serde(default)]
    pub extended: bool,
    #[serde(default)]
    pub upgraded: bool,
}

pub fn is_potion_material(material: &str) -> bool {
    POTION_MATERIALS.contains(&material)
}

/// Reads and writes `(type, extended, upgraded)` on a stack.
pub trait PotionAccess: Send + Sync {
    fn read(&self, stack: &ItemStack) -> Option<PotionData>;

    /// Returns false when the stack cannot carry potion data.
    fn write(&self, stack: &mut ItemStack, data: &PotionData) -> bool;
}

/// Hosts exposing base potion data on the item meta.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePotionData;

impl PotionAccess for BasePotionData {
    fn read(&self, stack: &ItemStack) -> Option<PotionData> {
        stack.meta.as_ref()?.base_potion.clone()
    }

    fn write(&self, stack: &mut ItemStack, data: &PotionData) -> bool {
        if !is_potion_material(&stack.material) {
            return false;
        }
        stack.meta_mut().base_potion = Some(data.clone());
        true
    }
}

/// Hosts storing the potion as a namespaced id such as
/// `minecraft:long_swiftness` in the potion contents component.
#[derive(Debug, Clone, Copy, Default)]
pub struct PotionContents;

impl PotionContents {
    fn path() -> String {
        format!("{POTION_CONTENTS}{PATH_SEPARATOR}potion")
    }
}

impl PotionAccess for PotionContents {
    fn read(&self, stack: &ItemStack) -> Option<PotionData> {
        let id = path_string(&stack.tags as &dyn TagReader, &Self::path())?;
        let id = id.strip_prefix("minecraft:").unwrap_or(id);
        let (extended, upgraded, base) = if let Some(base) = id.strip_prefix("long_") {
            (true, false, base)
        } else if let Some(base) = id.strip_prefix("strong_") {
            (false, true, base)
        } else {
            (false, false, id)
        };
        Some(PotionData {
            potion_type: base.to_ascii_uppercase(),
            extended,
            upgraded,
        })
    }

    fn write(&self, stack: &mut ItemStack, data: &PotionData) -> bool {
        if !is_potion_material(&stack.material) {
            return false;
        }
        let modifier = if data.extended {
            "long_"
        } else if data.upgraded {
            "strong_"
        } else {
            ""
        };
        let id = format!("minecraft:{modifier}{}", data.potion_type.to_ascii_lowercase());
        stack.tags.set_path(&Self::path(), Tag::String(id));
        true
    }
}
