use super::form_view::FormView;
use crate::base::dom::Dom;
use crate::base::query::Query;
use crate::base::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Success,
    Sending,
}

impl MessageKind {
    pub fn class(&self) -> &'static str {
        match self {
            MessageKind::Error => "error",
            MessageKind::Success => "success",
            MessageKind::Sending => "sending",
        }
    }
}

/// A batch of HTML messages. A single string is a batch of one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages(Vec<String>);

impl Messages {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl From<&str> for Messages {
    fn from(message: &str) -> Self {
        Self(vec![message.to_string()])
    }
}

impl From<String> for Messages {
    fn from(message: String) -> Self {
        Self(vec![message])
    }
}

impl From<Vec<String>> for Messages {
    fn from(messages: Vec<String>) -> Self {
        Self(messages)
    }
}

impl From<Vec<&str>> for Messages {
    fn from(messages: Vec<&str>) -> Self {
        Self(messages.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Messages {
    fn from(messages: [&str; N]) -> Self {
        Self(messages.iter().map(|m| m.to_string()).collect())
    }
}

impl From<&[&str]> for Messages {
    fn from(messages: &[&str]) -> Self {
        Self(messages.iter().map(|m| m.to_string()).collect())
    }
}

impl<D: Dom> FormView<D> {
    pub fn remove_messages(&self) {
        for item in self.find(&Query::tag_class("li", "msg")) {
            self.dom().discard(&item);
        }
    }

    pub fn errors(&self, messages: impl Into<Messages>) {
        self.messages(messages, Some(MessageKind::Error), false);
    }

    pub fn success(&self, messages: impl Into<Messages>) {
        self.messages(messages, Some(MessageKind::Success), false);
    }

    /// Replace the current message batch. Content is inserted as HTML,
    /// unescaped.
    pub fn messages(
        &self,
        messages: impl Into<Messages>,
        kind: Option<MessageKind>,
        fade: bool,
    ) {
        self.remove_messages();
        let messages = messages.into();
        let Some(list) = self.message_list() else {
            return;
        };
        let dom = self.dom();
        for message in messages.iter() {
            let item = match dom.create_element("li") {
                Ok(item) => item,
                Err(err) => {
                    log::error!("Cannot render message: {}", err);
                    return;
                }
            };
            dom.add_class(&item, "msg");
            if let Some(kind) = kind {
                dom.add_class(&item, kind.class());
            }
            if fade {
                dom.add_class(&item, "fade");
            }
            dom.set_inner_html(&item, message);
            dom.append(&list, &item);
        }
    }

    // `ul.form-messages`, created at the top of the form when missing
    fn message_list(&self) -> Option<D::Node> {
        if let Some(list) = self.find_first(&Query::class("form-messages")) {
            return Some(list);
        }
        let dom = self.dom();
        let list = match dom.create_element("ul") {
            Ok(list) => list,
            Err(err) => {
                log::error!("Cannot create message list: {}", err);
                return None;
            }
        };
        dom.add_class(&list, "form-messages");
        let host = self.find_first(&Query::tag("form")).unwrap_or_else(|| self.el());
        dom.prepend(&host, &list);
        Some(list)
    }
}
