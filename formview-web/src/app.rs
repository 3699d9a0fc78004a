use std::cell::RefCell;
use std::rc::Rc;

use formview::validate::{AttrAutoValidator, AttrValidator};
use formview::{
    Catalog, Collaborators, Dom, EventKind, FormError, FormEvent, FormFields,
    FormView, FormViewOptions, NativeEvent, Query, Translator,
};
use formview::View as _;
use leptos::*;
use leptos_meta::*;
use serde_json::Value;
use web_sys::Element;

use crate::{BrowserScheduler, CssSpinnerFactory, FetchSubmitter, MobileAgents, WebDom};

const OPTIONS: &str = include_str!("../form.yaml");
const LOCALE: &str = include_str!("../locales/en.yaml");

const SIGNUP_TEMPLATE: &str = r##"
<div class="signup">
    <form autovalidate autosubmit action="/api/signup" method="post">
        <label>Email <input name="email" type="email" validate="required email"></label>
        <label>Name <input name="name" type="text" validate="required max-length:64"></label>
        <label>Password <input name="password" type="password" validate="required min-length:8"></label>
        <label><input name="newsletter" type="checkbox"> Keep me posted</label>
        <button type="submit">Sign up</button>
        <a class="cancel" href="#">Cancel</a>
    </form>
</div>
"##;

/// Sign-up form wired to the browser: fetch submission, CSS spinner and
/// timers on the event loop.
pub fn signup_form() -> Result<FormView<WebDom>, FormError> {
    let dom = Rc::new(WebDom::new()?);
    let options = FormViewOptions::from_yaml(OPTIONS)?.with_mobile(MobileAgents::new()?.current());
    let translator = Rc::new(Catalog::from_yaml(LOCALE)?);
    let validator = Rc::new(AttrValidator::new(Rc::clone(&dom), translator.clone())?);
    let collaborators = Collaborators {
        validator: validator.clone(),
        autovalidator: Rc::new(AttrAutoValidator::new(Rc::clone(&dom), validator)),
        submitter: Rc::new(FetchSubmitter::new(Rc::clone(&dom))),
        spinners: Rc::new(CssSpinnerFactory::new(Rc::clone(&dom))),
        scheduler: Rc::new(BrowserScheduler),
        translator: translator.clone(),
    };

    let view = FormView::uninit(dom, &SIGNUP_TEMPLATE, options, collaborators)?;
    view.set_postserialize(|data: &mut FormFields| {
        if let Some(Value::String(email)) = data.get_mut("email") {
            *email = email.trim().to_lowercase();
        }
        data.insert("source".to_string(), Value::from("web"));
    });
    view.init();
    wire_cancel(&view);
    wire_outcome(&view, translator.as_ref());
    Ok(view)
}

// a.cancel aborts a running submission, otherwise it only cancels
fn wire_cancel(view: &FormView<WebDom>) {
    for cancel in view.find(&Query::tag_class("a", "cancel")) {
        let weak = view.downgrade();
        view.dom().listen(
            &cancel,
            "click",
            Rc::new(move |event: &dyn NativeEvent| {
                let Some(view) = weak.upgrade() else {
                    return;
                };
                if view.is_submitting() {
                    event.prevent_default();
                    view.abort();
                } else {
                    view.on_cancel(Some(event));
                }
            }),
        );
    }
}

fn wire_outcome(view: &FormView<WebDom>, translator: &dyn Translator) {
    let weak = view.downgrade();
    let thanks = translator.t("signup.thanks");
    view.on(EventKind::Success, move |_| {
        if let Some(view) = weak.upgrade() {
            view.reset();
            view.success(thanks.as_str());
        }
    });

    let weak = view.downgrade();
    let canceled = translator.t("signup.canceled");
    view.on(EventKind::Cancel, move |_| {
        if let Some(view) = weak.upgrade() {
            view.unloading();
            view.messages(canceled.as_str(), None, true);
        }
    });

    view.on(EventKind::Error, |event| {
        if let FormEvent::Error(err) = event {
            log::warn!("Sign up failed: {}", err);
        }
    });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Sign up"/>
        <main class="container">
            <h1>"Create an account"</h1>
            <SignupForm />
        </main>
    }
}

#[component]
pub fn SignupForm() -> impl IntoView {
    let container = create_node_ref::<html::Div>();
    let mounted: Rc<RefCell<Option<FormView<WebDom>>>> = Rc::new(RefCell::new(None));
    let load_error = create_rw_signal(None::<String>);

    let slot = Rc::clone(&mounted);
    container.on_load(move |host| match signup_form() {
        Ok(view) => {
            let parent: &Element = &host;
            view.insert(parent);
            view.focus("email");
            *slot.borrow_mut() = Some(view);
        }
        Err(err) => {
            log::error!("Cannot render sign up form: {}", err);
            load_error.set(Some(err.to_string()));
        }
    });

    on_cleanup(move || {
        if let Some(view) = mounted.borrow_mut().take() {
            view.destroy();
        }
    });

    view! {
        <div node_ref=container class="form-host"></div>
        {move || load_error.get().map(|error| view! {
            <div class="text-red-500">{error}</div>
        })}
    }
}

#[cfg(test)]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn inserted() -> FormView<WebDom> {
        let view = signup_form().unwrap();
        let body: Element = view.dom().document().body().unwrap().into();
        view.insert(&body);
        view
    }

    #[wasm_bindgen_test]
    fn test_signup_form_renders_messages_container() {
        let view = inserted();
        assert_eq!(view.find(&Query::class("form-messages")).len(), 1);
        assert!(view.is_autovalidating());
        assert_eq!(view.get("email").and_then(|v| v.as_text().map(String::from)), Some(String::new()));
        view.destroy();
        view.el().remove();
    }

    #[wasm_bindgen_test]
    fn test_invalid_submit_prints_errors_without_request() {
        let view = inserted();
        let form = view.find_first(&Query::tag("form")).unwrap();
        let form: web_sys::HtmlFormElement = wasm_bindgen::JsCast::unchecked_into(form);
        form.request_submit().unwrap();

        assert!(!view.is_submitting());
        assert!(!view.is_disabled());
        assert_eq!(view.find(&Query::tag_class("span", "field-error")).len(), 3);
        view.el().remove();
    }

    #[wasm_bindgen_test]
    fn test_cancel_link_without_submission_shows_notice() {
        let view = inserted();
        let cancel = view.find_first(&Query::tag_class("a", "cancel")).unwrap();
        let link: web_sys::HtmlElement = wasm_bindgen::JsCast::unchecked_into(cancel);
        link.click();

        let items = view.find(&Query::tag_class("li", "msg"));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text_content().as_deref(), Some("Sign up canceled."));
        view.el().remove();
    }
}
