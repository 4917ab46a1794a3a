use regkit_controls::{Validator, Value, validate};
use regkit_domain::NotificationMethod;

/// A declarative "when this field changes, swap that field's validators"
/// rule. Rules are evaluated inside the same mutation that triggered them,
/// so no observer can see the trigger applied without its consequence.
#[derive(Clone, Copy)]
pub struct ConditionalRule {
    /// Dotted path of the field whose changes drive the rule.
    pub trigger: &'static str,
    /// Dotted path of the field whose validators are replaced.
    pub target: &'static str,
    /// Produces the target's new validator list from the trigger's value.
    pub factory: fn(&Value) -> Vec<Validator>,
}

impl std::fmt::Debug for ConditionalRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionalRule")
            .field("trigger", &self.trigger)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// The phone field is mandatory only while text notification is selected.
pub(crate) fn phone_requirement(notification: &Value) -> Vec<Validator> {
    let method = notification
        .as_text()
        .and_then(|text| text.parse::<NotificationMethod>().ok());
    if method == Some(NotificationMethod::Text) {
        vec![validate::required()]
    } else {
        Vec::new()
    }
}
