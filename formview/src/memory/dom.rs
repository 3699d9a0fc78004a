use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::html::{escape_attr, escape_text, is_void, parse_fragment, ParsedNode};
use crate::base::dom::{Dom, Listener, NativeEvent};
use crate::base::query::{Query, FIELD_TAGS, NAMED_FIELD_TAGS};
use crate::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        // live value of a control, `None` means "use the default"
        value: Option<String>,
    },
    Text(String),
}

struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<(String, Listener)>,
    live: bool,
}

/// Submit/click event dispatched by [`MemoryDom::dispatch`].
#[derive(Default)]
pub struct MemoryEvent {
    default_prevented: Cell<bool>,
}

impl NativeEvent for MemoryEvent {
    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }
}

/// In-memory element tree, used for headless rendering and tests.
///
/// Slots of discarded nodes and of children replaced through
/// `set_inner_html`/`set_text` are reused, so their ids go stale.
#[derive(Default)]
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    free: RefCell<Vec<NodeId>>,
    focused: Cell<Option<NodeId>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `html` and return its single root element.
    pub fn from_html(&self, html: &str) -> Result<NodeId, FormError> {
        self.parse_html(html)
    }

    /// Run the listeners bound to `event` on `node`, innermost first, then
    /// on each ancestor. Returns whether a listener prevented the default.
    pub fn dispatch(&self, node: &NodeId, event: &str) -> bool {
        let native = MemoryEvent::default();
        let mut current = Some(*node);
        while let Some(id) = current {
            let listeners: Vec<Listener> = {
                let nodes = self.nodes.borrow();
                nodes[id.0]
                    .listeners
                    .iter()
                    .filter(|(name, _)| name == event)
                    .map(|(_, listener)| Rc::clone(listener))
                    .collect()
            };
            for listener in listeners {
                listener(&native);
            }
            current = self.nodes.borrow()[id.0].parent;
        }
        native.default_prevented.get()
    }

    pub fn submit(&self, form: &NodeId) -> bool {
        self.dispatch(form, "submit")
    }

    pub fn click(&self, node: &NodeId) -> bool {
        self.dispatch(node, "click")
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    pub fn tag(&self, node: &NodeId) -> Option<String> {
        match &self.nodes.borrow()[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn text(&self, node: &NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        collect_text(&nodes, *node, &mut out);
        out
    }

    pub fn inner_html(&self, node: &NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        for child in &nodes[node.0].children {
            serialize(&nodes, *child, &mut out);
        }
        out
    }

    /// Slots held by the arena, live or free.
    pub fn capacity(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn live_nodes(&self) -> usize {
        self.capacity() - self.free.borrow().len()
    }

    pub fn outer_html(&self, node: &NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        serialize(&nodes, *node, &mut out);
        out
    }

    fn alloc(&self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
            live: true,
        };
        let mut nodes = self.nodes.borrow_mut();
        match self.free.borrow_mut().pop() {
            Some(id) => {
                nodes[id.0] = data;
                id
            }
            None => {
                nodes.push(data);
                NodeId(nodes.len() - 1)
            }
        }
    }

    // detached subtree only
    fn release(&self, node: NodeId) {
        let (children, listeners) = {
            let mut nodes = self.nodes.borrow_mut();
            let data = &mut nodes[node.0];
            if !data.live {
                return;
            }
            data.live = false;
            data.kind = NodeKind::Text(String::new());
            data.parent = None;
            (
                std::mem::take(&mut data.children),
                std::mem::take(&mut data.listeners),
            )
        };
        // captured state may touch the dom on drop
        drop(listeners);
        if self.focused.get() == Some(node) {
            self.focused.set(None);
        }
        self.free.borrow_mut().push(node);
        for child in children {
            self.release(child);
        }
    }

    fn build(&self, parsed: ParsedNode) -> NodeId {
        match parsed {
            ParsedNode::Text(text) => self.alloc(NodeKind::Text(text)),
            ParsedNode::Element {
                tag,
                attrs,
                children,
            } => {
                let id = self.alloc(NodeKind::Element {
                    tag,
                    attrs,
                    value: None,
                });
                for child in children {
                    let child = self.build(child);
                    self.attach(id, child, false);
                }
                id
            }
        }
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    fn attach(&self, parent: NodeId, child: NodeId, front: bool) {
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        let children = &mut nodes[parent.0].children;
        if front {
            children.insert(0, child);
        } else {
            children.push(child);
        }
    }

    fn replace_children(&self, node: NodeId, children: Vec<NodeId>) {
        for child in self.children(&node) {
            self.detach(child);
            self.release(child);
        }
        for child in children {
            self.attach(node, child, false);
        }
    }

    fn with_element<T>(
        &self,
        node: &NodeId,
        f: impl FnOnce(&mut String, &mut Vec<(String, String)>, &mut Option<String>) -> T,
    ) -> Option<T> {
        let mut nodes = self.nodes.borrow_mut();
        match &mut nodes[node.0].kind {
            NodeKind::Element { tag, attrs, value } => Some(f(tag, attrs, value)),
            NodeKind::Text(_) => None,
        }
    }

    fn classes(&self, node: &NodeId) -> Vec<String> {
        self.attr(node, "class")
            .map(|class| class.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    fn matches(&self, node: NodeId, query: &Query) -> bool {
        let Some(tag) = self.tag(&node) else {
            return false;
        };
        match query {
            Query::Tag(wanted) => tag == *wanted,
            Query::Class { tag: wanted, class } => {
                wanted.as_ref().map_or(true, |wanted| tag == *wanted)
                    && self.has_class(&node, class)
            }
            Query::Attr {
                tag: wanted,
                name,
                value,
            } => {
                tag == *wanted
                    && match (self.attr(&node, name), value) {
                        (Some(found), Some(value)) => found == *value,
                        (Some(_), None) => true,
                        (None, _) => false,
                    }
            }
            Query::Field(name) => {
                FIELD_TAGS.contains(&tag.as_str())
                    && self.attr(&node, "name").as_deref() == Some(name.as_str())
            }
            Query::AnyField => {
                NAMED_FIELD_TAGS.contains(&tag.as_str())
                    && self.attr(&node, "name").is_some()
            }
        }
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        out.push(root);
        for child in self.children(&root) {
            self.descendants(child, out);
        }
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn parse_html(&self, html: &str) -> Result<NodeId, FormError> {
        let mut roots: Vec<ParsedNode> = parse_fragment(html)
            .into_iter()
            .filter(|node| matches!(node, ParsedNode::Element { .. }))
            .collect();
        if roots.len() != 1 {
            return Err(FormError::Template(format!(
                "template must have exactly one root element, found {}",
                roots.len()
            )));
        }
        Ok(self.build(roots.remove(0)))
    }

    fn query_all(&self, root: &NodeId, query: &Query) -> Vec<NodeId> {
        let mut all = Vec::new();
        self.descendants(*root, &mut all);
        all.into_iter()
            .filter(|node| self.matches(*node, query))
            .collect()
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, FormError> {
        Ok(self.alloc(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            value: None,
        }))
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    fn append(&self, parent: &NodeId, child: &NodeId) {
        self.attach(*parent, *child, false);
    }

    fn prepend(&self, parent: &NodeId, child: &NodeId) {
        self.attach(*parent, *child, true);
    }

    fn remove(&self, node: &NodeId) {
        self.detach(*node);
    }

    fn discard(&self, node: &NodeId) {
        self.detach(*node);
        self.release(*node);
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut classes = self.classes(node);
        if !classes.iter().any(|existing| existing == class) {
            classes.push(class.to_string());
            self.set_attr(node, "class", &classes.join(" "));
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        let mut classes = self.classes(node);
        let before = classes.len();
        classes.retain(|existing| existing != class);
        if classes.len() != before {
            self.set_attr(node, "class", &classes.join(" "));
        }
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|existing| existing == class)
    }

    fn attr(&self, node: &NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        match &nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone()),
            NodeKind::Text(_) => None,
        }
    }

    fn set_attr(&self, node: &NodeId, name: &str, value: &str) {
        self.with_element(node, |_, attrs, _| {
            match attrs.iter_mut().find(|(key, _)| key == name) {
                Some((_, existing)) => *existing = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        });
    }

    fn remove_attr(&self, node: &NodeId, name: &str) {
        self.with_element(node, |_, attrs, _| {
            attrs.retain(|(key, _)| key != name)
        });
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        let children = parse_fragment(html)
            .into_iter()
            .map(|parsed| self.build(parsed))
            .collect();
        self.replace_children(*node, children);
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        let child = self.alloc(NodeKind::Text(text.to_string()));
        self.replace_children(*node, vec![child]);
    }

    fn value(&self, node: &NodeId) -> String {
        let live = self
            .with_element(node, |_, _, value| value.clone())
            .flatten();
        if let Some(value) = live {
            return value;
        }
        match self.tag(node).as_deref() {
            Some("textarea") => self.text(node),
            _ => self.attr(node, "value").unwrap_or_default(),
        }
    }

    fn set_value(&self, node: &NodeId, value: &str) {
        self.with_element(node, |_, _, live| *live = Some(value.to_string()));
    }

    fn focus(&self, node: &NodeId) {
        self.focused.set(Some(*node));
    }

    fn reset(&self, form: &NodeId) {
        for node in self.query_all(form, &Query::AnyField) {
            self.with_element(&node, |_, _, live| *live = None);
        }
    }

    fn listen(&self, node: &NodeId, event: &str, listener: Listener) {
        self.nodes.borrow_mut()[node.0]
            .listeners
            .push((event.to_string(), listener));
    }
}

fn collect_text(nodes: &[NodeData], node: NodeId, out: &mut String) {
    match &nodes[node.0].kind {
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Element { .. } => {
            for child in &nodes[node.0].children {
                collect_text(nodes, *child, out);
            }
        }
    }
}

fn serialize(nodes: &[NodeData], node: NodeId, out: &mut String) {
    match &nodes[node.0].kind {
        NodeKind::Text(text) => out.push_str(&escape_text(text)),
        NodeKind::Element { tag, attrs, .. } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in attrs {
                out.push(' ');
                out.push_str(key);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
            }
            out.push('>');
            if is_void(tag) {
                return;
            }
            for child in &nodes[node.0].children {
                serialize(nodes, *child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"
        <div class="wrapper">
            <form autosubmit>
                <input name="email" value="a@b.c">
                <input name="terms" type="checkbox" checked>
                <textarea name="bio">hello</textarea>
                <button class="primary">Go</button>
            </form>
        </div>
    "#;

    #[test]
    fn test_query_includes_root_in_document_order() {
        let dom = MemoryDom::new();
        let root = dom.from_html(TEMPLATE).unwrap();
        assert_eq!(dom.query_all(&root, &Query::class("wrapper")), vec![root]);
        let fields = dom.query_all(&root, &Query::AnyField);
        let names: Vec<String> = fields
            .iter()
            .filter_map(|node| dom.attr(node, "name"))
            .collect();
        assert_eq!(names, vec!["email", "terms", "bio"]);
        assert_eq!(dom.query_all(&root, &Query::field("bio")).len(), 1);
        assert_eq!(dom.query_all(&root, &Query::attr("form", "autosubmit")).len(), 1);
        assert!(dom.query_all(&root, &Query::attr("form", "autovalidate")).is_empty());
    }

    #[test]
    fn test_values_and_reset() {
        let dom = MemoryDom::new();
        let root = dom.from_html(TEMPLATE).unwrap();
        let email = dom.query_first(&root, &Query::field("email")).unwrap();
        let bio = dom.query_first(&root, &Query::field("bio")).unwrap();
        assert_eq!(dom.value(&email), "a@b.c");
        assert_eq!(dom.value(&bio), "hello");
        dom.set_value(&email, "x@y.z");
        dom.set_value(&bio, "changed");
        assert_eq!(dom.value(&email), "x@y.z");
        let form = dom.query_first(&root, &Query::tag("form")).unwrap();
        dom.reset(&form);
        assert_eq!(dom.value(&email), "a@b.c");
        assert_eq!(dom.value(&bio), "hello");
    }

    #[test]
    fn test_classes_and_serialization() {
        let dom = MemoryDom::new();
        let ul = dom.create_element("ul").unwrap();
        dom.add_class(&ul, "form-messages");
        dom.add_class(&ul, "form-messages");
        let li = dom.create_element("li").unwrap();
        dom.add_class(&li, "msg");
        dom.set_inner_html(&li, "<b>bold</b> & more");
        dom.append(&ul, &li);
        assert_eq!(
            dom.outer_html(&ul),
            "<ul class=\"form-messages\"><li class=\"msg\"><b>bold</b> &amp; more</li></ul>"
        );
        dom.remove_class(&ul, "form-messages");
        assert!(!dom.has_class(&ul, "form-messages"));
        dom.remove(&li);
        assert!(dom.children(&ul).is_empty());
        assert_eq!(dom.parent(&li), None);
    }

    #[test]
    fn test_dispatch_bubbles_and_reports_prevent_default() {
        let dom = MemoryDom::new();
        let root = dom.from_html(TEMPLATE).unwrap();
        let form = dom.query_first(&root, &Query::tag("form")).unwrap();
        let button = dom.query_first(&root, &Query::tag("button")).unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (node, label) in [(root, "root"), (button, "button")] {
            let order = Rc::clone(&order);
            dom.listen(
                &node,
                "click",
                Rc::new(move |_: &dyn NativeEvent| order.borrow_mut().push(label)),
            );
        }
        dom.listen(
            &form,
            "submit",
            Rc::new(|ev: &dyn NativeEvent| ev.prevent_default()),
        );
        assert!(!dom.click(&button));
        assert_eq!(*order.borrow(), vec!["button", "root"]);
        assert!(dom.submit(&form));
    }

    #[test]
    fn test_parse_html_requires_single_root() {
        let dom = MemoryDom::new();
        assert!(dom.parse_html("<p>a</p><p>b</p>").is_err());
        assert!(dom.parse_html("just text").is_err());
        assert!(dom.parse_html("<form><input></div>").is_ok());
    }

    #[test]
    fn test_inner_html_decodes_character_references() {
        let dom = MemoryDom::new();
        let li = dom.create_element("li").unwrap();
        dom.set_inner_html(&li, "it&#x27;s &copy; 2024 &#8212; ok");
        assert_eq!(dom.text(&li), "it's \u{a9} 2024 \u{2014} ok");
        assert_eq!(dom.inner_html(&li), "it's \u{a9} 2024 \u{2014} ok");

        dom.set_inner_html(&li, "<p>unclosed <b>bold");
        assert_eq!(dom.inner_html(&li), "<p>unclosed <b>bold</b></p>");
    }

    #[test]
    fn test_discarded_and_replaced_nodes_are_reused() {
        let dom = MemoryDom::new();
        let ul = dom.create_element("ul").unwrap();
        for _ in 0..1000 {
            let li = dom.create_element("li").unwrap();
            dom.set_inner_html(&li, "<b>one</b> two");
            dom.set_inner_html(&li, "<i>three</i>");
            dom.append(&ul, &li);
            dom.focus(&li);
            dom.discard(&li);
        }
        assert_eq!(dom.live_nodes(), 1);
        assert!(dom.capacity() <= 8);
        assert_eq!(dom.focused(), None);
        assert!(dom.children(&ul).is_empty());

        let kept = dom.create_element("li").unwrap();
        dom.append(&ul, &kept);
        dom.remove(&kept);
        dom.append(&ul, &kept);
        assert_eq!(dom.children(&ul), vec![kept]);
    }
}
