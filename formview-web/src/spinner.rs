use std::rc::Rc;

use formview::{Dom, Spinner, SpinnerFactory, SpinnerOptions};
use web_sys::Element;

use crate::dom::WebDom;

/// CSS-animated spinner element inside the target button.
pub struct CssSpinner {
    el: Option<Element>,
}

impl Spinner for CssSpinner {
    fn remove(self: Box<Self>) {
        if let Some(el) = self.el {
            el.remove();
        }
    }
}

pub struct CssSpinnerFactory {
    dom: Rc<WebDom>,
}

impl CssSpinnerFactory {
    pub fn new(dom: Rc<WebDom>) -> Self {
        Self { dom }
    }
}

impl SpinnerFactory<Element> for CssSpinnerFactory {
    fn attach(&self, target: &Element, options: &SpinnerOptions) -> Box<dyn Spinner> {
        let el = match self.dom.create_element("span") {
            Ok(el) => el,
            Err(err) => {
                log::error!("Cannot create spinner: {}", err);
                return Box::new(CssSpinner { el: None });
            }
        };
        self.dom.add_class(&el, "spinner");
        self.dom.add_class(
            &el,
            if options.light { "spinner-light" } else { "spinner-dark" },
        );
        self.dom.set_attr(
            &el,
            "style",
            &format!("width: {0}px; height: {0}px", options.size),
        );
        self.dom.append(target, &el);
        Box::new(CssSpinner { el: Some(el) })
    }
}

#[cfg(test)]
mod tests {
    use formview::Query;
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_attach_and_remove() {
        let dom = Rc::new(WebDom::new().unwrap());
        let button = dom.parse_html("<button>Send</button>").unwrap();
        let factory = CssSpinnerFactory::new(Rc::clone(&dom));
        let spinner = factory.attach(&button, &SpinnerOptions { size: 20, light: true });

        let found = dom.query_all(&button, &Query::tag_class("span", "spinner"));
        assert_eq!(found.len(), 1);
        assert!(dom.has_class(&found[0], "spinner-light"));
        assert_eq!(
            dom.attr(&found[0], "style").as_deref(),
            Some("width: 20px; height: 20px")
        );

        spinner.remove();
        assert!(dom.query_all(&button, &Query::class("spinner")).is_empty());
    }
}
