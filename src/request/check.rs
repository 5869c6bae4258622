use crate::{
    inventory::Inventory,
    request::{CheckItem, RequestHandler},
    substitute::Placeholders,
};

/// Bare criteria: renders the configured yes/no strings.
pub struct Check;

impl RequestHandler for Check {
    const PREFIX: &'static str = "";

    fn handle(
        checkitem: &CheckItem,
        placeholders: &dyn Placeholders,
        inventory: &mut dyn Inventory,
        args: &str,
    ) -> String {
        let criteria = match checkitem.query_criteria(placeholders, args) {
            Ok(criteria) => criteria,
            Err(message) => return message.to_string(),
        };
        let config = checkitem.config();
        if criteria.rejected_up_front() {
            return config.render(false).to_string();
        }
        let result = checkitem.evaluate(&criteria, inventory);
        config.render(criteria.decide(&result)).to_string()
    }
}
