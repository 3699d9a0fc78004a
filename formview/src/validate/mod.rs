mod attr;
mod rules;

pub use attr::{AttrAutoValidator, AttrValidator, VALIDATE_ATTR};
pub use rules::{FieldRules, Rule};
