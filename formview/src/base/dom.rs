use std::fmt::Debug;
use std::rc::Rc;

use super::query::Query;
use crate::FormError;

/// Native event handed to DOM listeners.
pub trait NativeEvent {
    fn prevent_default(&self);
}

pub type Listener = Rc<dyn Fn(&dyn NativeEvent)>;

/// DOM primitives the form component is written against.
///
/// Mutating operations are infallible from the caller's point of view;
/// back ends that can fail (the browser) log and carry on.
pub trait Dom: 'static {
    type Node: Clone + PartialEq + Debug + 'static;

    /// Parse `html` into a single detached root element.
    fn parse_html(&self, html: &str) -> Result<Self::Node, FormError>;

    /// Matches among `root` and its descendants, in document order.
    fn query_all(&self, root: &Self::Node, query: &Query) -> Vec<Self::Node>;

    fn create_element(&self, tag: &str) -> Result<Self::Node, FormError>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn append(&self, parent: &Self::Node, child: &Self::Node);
    fn prepend(&self, parent: &Self::Node, child: &Self::Node);
    fn remove(&self, node: &Self::Node);
    /// Remove `node` for good. Its handle must not be used afterwards.
    fn discard(&self, node: &Self::Node) {
        self.remove(node);
    }

    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn attr(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attr(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attr(&self, node: &Self::Node, name: &str);

    // raw, unescaped
    fn set_inner_html(&self, node: &Self::Node, html: &str);
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Current value of a form control.
    fn value(&self, node: &Self::Node) -> String;
    fn set_value(&self, node: &Self::Node, value: &str);

    fn focus(&self, node: &Self::Node);
    /// Restore the controls of a form element to their defaults.
    fn reset(&self, form: &Self::Node);

    fn listen(&self, node: &Self::Node, event: &str, listener: Listener);

    fn query_first(&self, root: &Self::Node, query: &Query) -> Option<Self::Node> {
        self.query_all(root, query).into_iter().next()
    }
}

/// Markup rendered into the view's root element.
pub trait Template<D: Dom> {
    fn render(&self, dom: &D) -> Result<D::Node, FormError>;
}

impl<D: Dom> Template<D> for &str {
    fn render(&self, dom: &D) -> Result<D::Node, FormError> {
        dom.parse_html(self)
    }
}

impl<D: Dom> Template<D> for String {
    fn render(&self, dom: &D) -> Result<D::Node, FormError> {
        dom.parse_html(self)
    }
}
