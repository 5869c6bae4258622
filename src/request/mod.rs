//! Placeholder entry point: `%checkitem_<args>%`.

pub mod amount;
pub mod check;
pub mod give;

use std::sync::Arc;

use crate::{
    cache::BoundedCache,
    config::Config,
    criteria::{Criteria, CriteriaParser, MatchEnv, MatchResult},
    inventory::Inventory,
    item::{BasePotionData, PotionAccess, PotionContents},
    request::{amount::Amount, check::Check, give::Give},
    substitute::{Placeholders, resolve_all},
};

pub const IDENTIFIER: &str = "checkitem";

pub const MSG_GIVE_DISABLED: &str =
    "Give placeholders have been disabled. Check PlaceholderAPI Config.";
pub const MSG_REMOVE_DISABLED: &str =
    "Remove placeholders have been disabled. Check PlaceholderAPI Config.";
pub const RESULT_YES: &str = "yes";
pub const RESULT_ERROR: &str = "error";

const REMOVE_PREFIX: &str = "remove_";
const COLOR_CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

/// Argument characters that make the result depend on the caller.
const DYNAMIC_CHARS: [char; 3] = ['%', '{', '}'];

/// A request kind, selected by its argument prefix.
trait RequestHandler {
    const PREFIX: &'static str;

    fn handle(
        checkitem: &CheckItem,
        placeholders: &dyn Placeholders,
        inventory: &mut dyn Inventory,
        args: &str,
    ) -> String;
}

/// Translates `&`-prefixed colour and format codes into `§` codes.
pub fn translate_color_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(&code) = chars.peek().filter(|code| COLOR_CODES.contains(**code)) {
                out.push('§');
                out.push(code.to_ascii_lowercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// The expansion: configuration, the parse cache and the host's potion
/// capability.
pub struct CheckItem {
    config: Config,
    cache: BoundedCache<Arc<Criteria>>,
    potions: Box<dyn PotionAccess>,
}

impl CheckItem {
    pub fn new(config: Config) -> Self {
        let potions: Box<dyn PotionAccess> = if config.use_components {
            Box::new(PotionContents)
        } else {
            Box::new(BasePotionData)
        };
        Self {
            cache: BoundedCache::new(config.cache_capacity(), config.cache_ttl()),
            config,
            potions,
        }
    }

    pub fn with_potions(mut self, potions: impl PotionAccess + 'static) -> Self {
        self.potions = Box::new(potions);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Resolves `%checkitem_<args>%` for the player owning `inventory`.
    /// Without a player the placeholder is echoed unchanged.
    pub fn on_request(
        &self,
        placeholders: &dyn Placeholders,
        inventory: Option<&mut dyn Inventory>,
        args: &str,
    ) -> String {
        let Some(inventory) = inventory else {
            return format!("%{IDENTIFIER}_{args}%");
        };

        let args = self.resolve(placeholders, args);
        if let Some(rest) = args.strip_prefix(Give::PREFIX) {
            return Give::handle(self, placeholders, inventory, rest);
        }
        if let Some(rest) = args.strip_prefix(Amount::PREFIX) {
            return Amount::handle(self, placeholders, inventory, rest);
        }
        Check::handle(self, placeholders, inventory, &args)
    }

    fn resolve(&self, placeholders: &dyn Placeholders, text: &str) -> String {
        resolve_all(placeholders, text, self.config.substitution_passes)
    }

    fn parser<'p>(
        &self,
        placeholders: &'p dyn Placeholders,
    ) -> CriteriaParser<'p, dyn Placeholders + 'p> {
        CriteriaParser::new(placeholders).with_max_passes(self.config.substitution_passes)
    }

    fn match_env(&self) -> MatchEnv<'_> {
        MatchEnv {
            potions: self.potions.as_ref(),
            use_components: self.config.use_components,
        }
    }

    /// Criteria for a check or amount request, honouring a `remove_` prefix.
    /// Fails with the message to render when removal is disabled.
    fn query_criteria(
        &self,
        placeholders: &dyn Placeholders,
        args: &str,
    ) -> Result<Arc<Criteria>, &'static str> {
        let (remove, args) = match args.strip_prefix(REMOVE_PREFIX) {
            Some(rest) if !self.config.remove_enabled => {
                log::debug!("refusing removal request: {rest}");
                return Err(MSG_REMOVE_DISABLED);
            }
            Some(rest) => (true, rest),
            None => (false, args),
        };

        let args = translate_color_codes(args);
        if remove {
            return Ok(Arc::new(self.parser(placeholders).parse(&args).removing()));
        }
        if !self.config.cache_enabled || args.contains(&DYNAMIC_CHARS[..]) {
            return Ok(Arc::new(self.parser(placeholders).parse(&args)));
        }

        let parser = self.parser(placeholders);
        let criteria = self
            .cache
            .get_or_compute(&args, |key| Some(Arc::new(parser.parse(key))))
            .unwrap_or_else(|| Arc::new(parser.parse(&args)));
        Ok(criteria)
    }

    /// Matches against the inventory and applies removal when requested.
    fn evaluate(&self, criteria: &Criteria, inventory: &mut dyn Inventory) -> MatchResult {
        let env = self.match_env();
        let mut result = criteria.resolve(criteria.candidates(&*inventory), &env);
        if criteria.remove {
            result.aggregate = criteria.remove_matched(&result, inventory);
        }
        result
    }
}
