use regex::Regex;

use crate::base::translate::Translator;
use crate::form::FieldValue;
use crate::FormError;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    // declared but not known to this validator, never fails
    Custom(String),
}

impl Rule {
    pub fn parse(token: &str) -> Rule {
        let (name, arg) = match token.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (token, None),
        };
        let length = arg.and_then(|arg| arg.trim().parse::<usize>().ok());
        match (name, length) {
            ("required", _) => Rule::Required,
            ("email", _) => Rule::Email,
            ("min-length", Some(n)) => Rule::MinLength(n),
            ("max-length", Some(n)) => Rule::MaxLength(n),
            _ => Rule::Custom(token.to_string()),
        }
    }
}

/// Validation rules declared on a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    pub validations: Vec<Rule>,
}

impl FieldRules {
    /// Parse a whitespace separated declaration such as
    /// `"required email min-length:8"`.
    pub fn parse(declaration: &str) -> Self {
        Self {
            validations: declaration.split_whitespace().map(Rule::parse).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.validations.is_empty()
    }

    /// Messages for every failed rule. Blank values only fail `required`.
    pub fn check(
        &self,
        value: Option<&FieldValue>,
        email: &Regex,
        translator: &dyn Translator,
    ) -> Vec<String> {
        let text = match value {
            Some(FieldValue::Text(text)) => text.trim(),
            _ => "",
        };
        let blank = match value {
            Some(FieldValue::Checked(checked)) => !checked,
            Some(FieldValue::Text(_)) => text.is_empty(),
            None => true,
        };
        let length = text.chars().count();

        let mut errors = Vec::new();
        for rule in &self.validations {
            let failed = match rule {
                Rule::Required => blank,
                _ if blank => false,
                Rule::Email => !email.is_match(text),
                Rule::MinLength(n) => length < *n,
                Rule::MaxLength(n) => length > *n,
                Rule::Custom(name) => {
                    log::debug!("Skipping unknown validator: {}", name);
                    false
                }
            };
            if failed {
                errors.push(message(rule, translator));
            }
        }
        errors
    }
}

fn message(rule: &Rule, translator: &dyn Translator) -> String {
    match rule {
        Rule::Required => translator.t("validators.required"),
        Rule::Email => translator.t("validators.email"),
        Rule::MinLength(n) => translator
            .t("validators.min-length")
            .replace("{n}", &n.to_string()),
        Rule::MaxLength(n) => translator
            .t("validators.max-length")
            .replace("{n}", &n.to_string()),
        Rule::Custom(name) => name.clone(),
    }
}

pub fn email_regex() -> Result<Regex, FormError> {
    Regex::new(EMAIL_PATTERN).map_err(|err| {
        FormError::Config(format!("Invalid email pattern: {}", err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::translate::Catalog;

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    #[test]
    fn test_parse_declaration() {
        let rules = FieldRules::parse(" required  email min-length:8 max-length:x ");
        assert_eq!(
            rules.validations,
            vec![
                Rule::Required,
                Rule::Email,
                Rule::MinLength(8),
                Rule::Custom("max-length:x".to_string()),
            ]
        );
        assert!(FieldRules::parse("").is_empty());
    }

    #[test]
    fn test_check() {
        let catalog = Catalog::default();
        let email = email_regex().unwrap();
        let rules = FieldRules::parse("required email");
        assert_eq!(
            rules.check(Some(&text("  ")), &email, &catalog),
            vec!["This field is required.".to_string()]
        );
        assert_eq!(
            rules.check(Some(&text("nope")), &email, &catalog),
            vec!["Please enter a valid email address.".to_string()]
        );
        assert!(rules.check(Some(&text("a@b.io")), &email, &catalog).is_empty());

        let optional = FieldRules::parse("min-length:3");
        assert!(optional.check(None, &email, &catalog).is_empty());
        assert_eq!(
            optional.check(Some(&text("ab")), &email, &catalog),
            vec!["Must be at least 3 characters long.".to_string()]
        );

        let terms = FieldRules::parse("required");
        assert_eq!(
            terms.check(Some(&FieldValue::Checked(false)), &email, &catalog).len(),
            1
        );
        assert!(terms
            .check(Some(&FieldValue::Checked(true)), &email, &catalog)
            .is_empty());
    }
}
