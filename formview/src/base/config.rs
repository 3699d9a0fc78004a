use std::time::Duration;

use serde::Deserialize;

use super::query::Query;
use crate::FormError;

const DEFAULT_SPIN_DELAY_MS: u64 = 500;
const DEFAULT_MESSAGE_DELAY_MS: u64 = 1000;
const DEFAULT_SPINNER_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormViewOptions {
    /// Boolean attribute on `form` that turns on client-side validation.
    pub autovalidate_selector: String,
    /// Boolean attribute on `form` that turns on async submission.
    pub autosubmit_selector: String,
    pub spin_delay_ms: u64,
    pub message_delay_ms: u64,
    pub spinner_size: u32,
    pub spinner_light: bool,
    pub is_mobile: bool,
}

impl Default for FormViewOptions {
    fn default() -> Self {
        Self {
            autovalidate_selector: "autovalidate".to_string(),
            autosubmit_selector: "autosubmit".to_string(),
            spin_delay_ms: DEFAULT_SPIN_DELAY_MS,
            message_delay_ms: DEFAULT_MESSAGE_DELAY_MS,
            spinner_size: DEFAULT_SPINNER_SIZE,
            spinner_light: true,
            is_mobile: false,
        }
    }
}

impl FormViewOptions {
    pub fn from_yaml(content: &str) -> Result<Self, FormError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: FormViewOptions = serde_yaml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_mobile(mut self, is_mobile: bool) -> Self {
        self.is_mobile = is_mobile;
        self
    }

    pub fn spin_delay(&self) -> Duration {
        Duration::from_millis(self.spin_delay_ms)
    }

    pub fn message_delay(&self) -> Duration {
        Duration::from_millis(self.message_delay_ms)
    }

    pub fn autovalidate_query(&self) -> Query {
        Query::attr("form", &self.autovalidate_selector)
    }

    pub fn autosubmit_query(&self) -> Query {
        Query::attr("form", &self.autosubmit_selector)
    }

    fn validate(&self) -> Result<(), FormError> {
        for (key, value) in [
            ("autovalidate_selector", &self.autovalidate_selector),
            ("autosubmit_selector", &self.autosubmit_selector),
        ] {
            if value.is_empty()
                || !value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(FormError::Config(format!(
                    "{} must be an attribute name, got \"{}\"",
                    key, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FormViewOptions::default();
        assert_eq!(options.spin_delay(), Duration::from_millis(500));
        assert_eq!(options.message_delay(), Duration::from_millis(1000));
        assert_eq!(options.spinner_size, 20);
        assert!(!options.is_mobile);
        assert_eq!(
            options.autosubmit_query(),
            Query::attr("form", "autosubmit")
        );
        assert_eq!(FormViewOptions::from_yaml("").unwrap(), options);
    }

    #[test]
    fn test_from_yaml_partial() {
        let options = FormViewOptions::from_yaml(
            "message_delay_ms: 250\nis_mobile: true\n",
        )
        .unwrap();
        assert_eq!(options.message_delay_ms, 250);
        assert!(options.is_mobile);
        assert_eq!(options.spin_delay_ms, 500);
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(matches!(
            FormViewOptions::from_yaml("spin_delay_ms: soon"),
            Err(FormError::Config(_))
        ));
        assert!(matches!(
            FormViewOptions::from_yaml("autosubmit_selector: \"form x\""),
            Err(FormError::Config(_))
        ));
    }
}
