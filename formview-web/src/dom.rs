use std::cell::RefCell;

use formview::{Dom, FormError, NativeEvent, Query};
use formview::base::Listener;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement,
};

pub(crate) fn js_error(err: JsValue) -> FormError {
    FormError::Js(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// Browser event handed to form listeners.
pub struct WebEvent(pub Event);

impl NativeEvent for WebEvent {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

/// [`Dom`] over the live browser document.
///
/// Listener closures are owned by the `WebDom` and live as long as it does.
pub struct WebDom {
    document: Document,
    listeners: RefCell<Vec<Closure<dyn Fn(Event)>>>,
}

impl WebDom {
    pub fn new() -> Result<Self, FormError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| FormError::Js("No document available".to_string()))?;
        Ok(Self {
            document,
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn parse_html(&self, html: &str) -> Result<Element, FormError> {
        let holder = self.document.create_element("div").map_err(js_error)?;
        holder.set_inner_html(html.trim());
        if holder.child_element_count() != 1 {
            return Err(FormError::Template(format!(
                "template must have exactly one root element, found {}",
                holder.child_element_count()
            )));
        }
        let root = holder.first_element_child().ok_or_else(|| {
            FormError::Template("template has no root element".to_string())
        })?;
        root.remove();
        Ok(root)
    }

    fn query_all(&self, root: &Element, query: &Query) -> Vec<Element> {
        let css = query.to_css();
        let mut found = Vec::new();
        if root.matches(&css).unwrap_or(false) {
            found.push(root.clone());
        }
        match root.query_selector_all(&css) {
            Ok(list) => {
                for index in 0..list.length() {
                    if let Some(element) =
                        list.item(index).and_then(|node| node.dyn_into::<Element>().ok())
                    {
                        found.push(element);
                    }
                }
            }
            Err(err) => log::error!("Invalid selector {}: {:?}", css, err),
        }
        found
    }

    fn create_element(&self, tag: &str) -> Result<Element, FormError> {
        self.document.create_element(tag).map_err(js_error)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn append(&self, parent: &Element, child: &Element) {
        if let Err(err) = parent.append_child(child) {
            log::error!("Cannot append element: {:?}", err);
        }
    }

    fn prepend(&self, parent: &Element, child: &Element) {
        let first = parent.first_child();
        if let Err(err) = parent.insert_before(child, first.as_ref()) {
            log::error!("Cannot prepend element: {:?}", err);
        }
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn add_class(&self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().add_1(class) {
            log::error!("Cannot add class {}: {:?}", class, err);
        }
    }

    fn remove_class(&self, node: &Element, class: &str) {
        if let Err(err) = node.class_list().remove_1(class) {
            log::error!("Cannot remove class {}: {:?}", class, err);
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn attr(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attr(&self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            log::error!("Cannot set attribute {}: {:?}", name, err);
        }
    }

    fn remove_attr(&self, node: &Element, name: &str) {
        if let Err(err) = node.remove_attribute(name) {
            log::error!("Cannot remove attribute {}: {:?}", name, err);
        }
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            node.get_attribute("value").unwrap_or_default()
        }
    }

    fn set_value(&self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else {
            self.set_attr(node, "value", value);
        }
    }

    fn focus(&self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            if let Err(err) = element.focus() {
                log::warn!("Cannot focus element: {:?}", err);
            }
        }
    }

    fn reset(&self, form: &Element) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }

    fn listen(&self, node: &Element, event: &str, listener: Listener) {
        let closure = Closure::<dyn Fn(Event)>::new(move |event: Event| {
            listener(&WebEvent(event));
        });
        if let Err(err) = node
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            log::error!("Cannot listen to {}: {:?}", event, err);
            return;
        }
        self.listeners.borrow_mut().push(closure);
    }
}
