//! Item checks for placeholder strings such as
//! `%checkitem_mat:DIAMOND,amt:5%`: match criteria against a player's
//! inventory, count, remove or give items.

pub mod cache;
pub mod config;
pub mod criteria;
pub mod error;
pub mod expr;
pub mod inventory;
pub mod item;
pub mod request;
pub mod substitute;


pub use config::Config;
pub use criteria::{Aggregate, AmountTarget, Criteria, EnchantLevel, MatchResult};
pub use error::{EvalError, LoadError};
pub use inventory::{Inventory, PlayerInventory};
pub use item::{ItemMeta, ItemStack};
pub use request::CheckItem;
pub use substitute::{MapPlaceholders, NoPlaceholders, Placeholders};
