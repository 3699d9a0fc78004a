use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const VOID_ELEMENTS: [&str; 8] =
    ["area", "br", "col", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedNode {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<ParsedNode>,
    },
    Text(String),
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Parse an HTML fragment the way a browser parses `innerHTML` into a body.
///
/// Comments are dropped, and so is whitespace-only text.
pub fn parse_fragment(src: &str) -> Vec<ParsedNode> {
    let dom = parse_document(RcDom::default(), Default::default()).one(src);
    match find_element(&dom.document, "body") {
        Some(body) => convert_children(&body),
        None => Vec::new(),
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn convert_children(handle: &Handle) -> Vec<ParsedNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(convert)
        .collect()
}

fn convert(handle: &Handle) -> Option<ParsedNode> {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if text.trim().is_empty() {
                None
            } else {
                Some(ParsedNode::Text(text))
            }
        }
        NodeData::Element { name, attrs, .. } => Some(ParsedNode::Element {
            tag: name.local.to_string(),
            attrs: attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect(),
            children: convert_children(handle),
        }),
        _ => None,
    }
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(
        tag: &str,
        attrs: &[(&str, &str)],
        children: Vec<ParsedNode>,
    ) -> ParsedNode {
        ParsedNode::Element {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            children,
        }
    }

    #[test]
    fn test_parse_form_template() {
        let nodes = parse_fragment(
            r#"
            <form autosubmit action='/api'>
                <!-- fields -->
                <input name="email" type=email>
                <textarea name="bio">Hi &amp; bye</textarea>
                <button>Send</button>
            </form>
            "#,
        );
        assert_eq!(
            nodes,
            vec![element(
                "form",
                &[("autosubmit", ""), ("action", "/api")],
                vec![
                    element(
                        "input",
                        &[("name", "email"), ("type", "email")],
                        vec![]
                    ),
                    element(
                        "textarea",
                        &[("name", "bio")],
                        vec![ParsedNode::Text("Hi & bye".to_string())]
                    ),
                    element(
                        "button",
                        &[],
                        vec![ParsedNode::Text("Send".to_string())]
                    ),
                ]
            )]
        );
    }

    #[test]
    fn test_character_references_are_decoded() {
        let nodes = parse_fragment("it&#x27;s &copy; 2024 &#8212; ok");
        assert_eq!(
            nodes,
            vec![ParsedNode::Text("it's \u{a9} 2024 \u{2014} ok".to_string())]
        );
    }

    #[test]
    fn test_broken_markup_is_recovered() {
        let nodes = parse_fragment("<div><span>a</div>");
        assert_eq!(
            nodes,
            vec![element(
                "div",
                &[],
                vec![element("span", &[], vec![ParsedNode::Text("a".to_string())])]
            )]
        );
        assert!(parse_fragment("   ").is_empty());
    }

    #[test]
    fn test_self_closing_and_mixed_text() {
        let nodes = parse_fragment("<p>a <b>b</b><br/>c</p>");
        assert_eq!(
            nodes,
            vec![element(
                "p",
                &[],
                vec![
                    ParsedNode::Text("a ".to_string()),
                    element("b", &[], vec![ParsedNode::Text("b".to_string())]),
                    element("br", &[], vec![]),
                    ParsedNode::Text("c".to_string()),
                ]
            )]
        );
    }
}
