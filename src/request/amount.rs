use crate::{
    inventory::Inventory,
    request::{CheckItem, RequestHandler},
    substitute::Placeholders,
};

/// `amount_<criteria>`: renders the matched quantity instead of a decision.
pub struct Amount;

impl RequestHandler for Amount {
    const PREFIX: &'static str = "amount_";

    fn handle(
        checkitem: &CheckItem,
        placeholders: &dyn Placeholders,
        inventory: &mut dyn Inventory,
        args: &str,
    ) -> String {
        match checkitem.query_criteria(placeholders, args) {
            Ok(criteria) => checkitem.evaluate(&criteria, inventory).aggregate().to_string(),
            Err(message) => message.to_string(),
        }
    }
}
