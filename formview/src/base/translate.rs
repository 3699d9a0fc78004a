use std::collections::HashMap;

use crate::FormError;

pub const PLEASE_WAIT: &str = "form.please-wait";
pub const UNEXPECTED_ERROR: &str = "form.unexpected-error";

const DEFAULT_ENTRIES: [(&str, &str); 6] = [
    (PLEASE_WAIT, "Please wait..."),
    (UNEXPECTED_ERROR, "An unexpected error occurred, please try again."),
    ("validators.required", "This field is required."),
    ("validators.email", "Please enter a valid email address."),
    ("validators.min-length", "Must be at least {n} characters long."),
    ("validators.max-length", "Must be at most {n} characters long."),
];

/// Localization lookup.
pub trait Translator {
    fn t(&self, key: &str) -> String;
}

/// Flat key to text catalog. Unknown keys translate to themselves.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Default English entries overlaid with a YAML mapping.
    pub fn from_yaml(content: &str) -> Result<Self, FormError> {
        let mut catalog = Self::default();
        if content.trim().is_empty() {
            return Ok(catalog);
        }
        let entries: HashMap<String, String> = serde_yaml::from_str(content)?;
        catalog.entries.extend(entries);
        Ok(catalog)
    }

    pub fn with(mut self, key: &str, text: &str) -> Self {
        self.entries.insert(key.to_string(), text.to_string());
        self
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES
                .iter()
                .map(|(key, text)| (key.to_string(), text.to_string()))
                .collect(),
        }
    }
}

impl Translator for Catalog {
    fn t(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
