/// Element lookups used by the form component.
///
/// Browser back ends render a query to a CSS selector with [`Query::to_css`],
/// the in-memory back end matches nodes against it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Tag(String),
    Class {
        tag: Option<String>,
        class: String,
    },
    Attr {
        tag: String,
        name: String,
        value: Option<String>,
    },
    // `input` or `textarea` with a matching `name`
    Field(String),
    // every named `input`, `textarea` or `select`
    AnyField,
}

pub const FIELD_TAGS: [&str; 2] = ["input", "textarea"];
pub const NAMED_FIELD_TAGS: [&str; 3] = ["input", "textarea", "select"];

impl Query {
    pub fn tag(tag: &str) -> Self {
        Query::Tag(tag.to_string())
    }

    pub fn class(class: &str) -> Self {
        Query::Class {
            tag: None,
            class: class.to_string(),
        }
    }

    pub fn tag_class(tag: &str, class: &str) -> Self {
        Query::Class {
            tag: Some(tag.to_string()),
            class: class.to_string(),
        }
    }

    pub fn attr(tag: &str, name: &str) -> Self {
        Query::Attr {
            tag: tag.to_string(),
            name: name.to_string(),
            value: None,
        }
    }

    pub fn attr_value(tag: &str, name: &str, value: &str) -> Self {
        Query::Attr {
            tag: tag.to_string(),
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    pub fn field(name: &str) -> Self {
        Query::Field(name.to_string())
    }

    pub fn to_css(&self) -> String {
        match self {
            Query::Tag(tag) => tag.clone(),
            Query::Class { tag, class } => {
                format!("{}.{}", tag.as_deref().unwrap_or(""), class)
            }
            Query::Attr { tag, name, value } => match value {
                Some(value) => {
                    format!("{}[{}=\"{}\"]", tag, name, escape_attr(value))
                }
                None => format!("{}[{}]", tag, name),
            },
            Query::Field(name) => FIELD_TAGS
                .iter()
                .map(|tag| format!("{}[name=\"{}\"]", tag, escape_attr(name)))
                .collect::<Vec<String>>()
                .join(", "),
            Query::AnyField => NAMED_FIELD_TAGS
                .iter()
                .map(|tag| format!("{}[name]", tag))
                .collect::<Vec<String>>()
                .join(", "),
        }
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_css() {
        assert_eq!(Query::tag("button").to_css(), "button");
        assert_eq!(Query::tag_class("a", "cancel").to_css(), "a.cancel");
        assert_eq!(Query::class("form-messages").to_css(), ".form-messages");
        assert_eq!(
            Query::attr("form", "autosubmit").to_css(),
            "form[autosubmit]"
        );
        assert_eq!(
            Query::field("email").to_css(),
            "input[name=\"email\"], textarea[name=\"email\"]"
        );
        assert_eq!(
            Query::attr_value("span", "data-error-for", "a\"b").to_css(),
            "span[data-error-for=\"a\\\"b\"]"
        );
    }
}
