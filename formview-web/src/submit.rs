use std::cell::{Cell, RefCell};
use std::rc::Rc;

use formview::form::serialize_fields;
use formview::{
    AutoSubmitter, FormFields, HttpResponse, Postserialize, RequestHandle,
    SubmitOutcome, TransportError,
};
use formview::collaborators::ResponseCallback;
use uuid::Uuid;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{AbortController, AbortSignal, Element, Headers, Request, RequestInit, RequestMode, Response};

use crate::dom::WebDom;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

fn transport(err: JsValue) -> TransportError {
    TransportError(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// A `fetch` in flight.
pub struct FetchRequest {
    controller: Option<AbortController>,
    listeners: RefCell<Vec<Box<dyn Fn()>>>,
    aborted: Cell<bool>,
}

impl FetchRequest {
    pub fn new() -> Self {
        let controller = match AbortController::new() {
            Ok(controller) => Some(controller),
            Err(err) => {
                log::warn!("Request will not be abortable: {:?}", err);
                None
            }
        };
        Self {
            controller,
            listeners: RefCell::new(Vec::new()),
            aborted: Cell::new(false),
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.get()
    }

    fn signal(&self) -> Option<AbortSignal> {
        self.controller.as_ref().map(|controller| controller.signal())
    }
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestHandle for FetchRequest {
    fn on_abort(&self, listener: Box<dyn Fn()>) {
        self.listeners.borrow_mut().push(listener);
    }

    fn abort(&self) {
        if self.aborted.replace(true) {
            return;
        }
        if let Some(controller) = &self.controller {
            controller.abort();
        }
        let listeners = self.listeners.take();
        for listener in &listeners {
            listener();
        }
    }
}

/// Posts the serialized form as JSON to its `action` URL.
pub struct FetchSubmitter {
    dom: Rc<WebDom>,
}

impl FetchSubmitter {
    pub fn new(dom: Rc<WebDom>) -> Self {
        Self { dom }
    }
}

impl AutoSubmitter<Element> for FetchSubmitter {
    fn submit(
        &self,
        form: &Element,
        on_response: ResponseCallback,
        postserialize: Option<Postserialize>,
    ) -> Rc<dyn RequestHandle> {
        let mut data = serialize_fields(self.dom.as_ref(), form);
        if let Some(hook) = postserialize {
            hook(&mut data);
        }
        let url = form.get_attribute("action").unwrap_or_default();
        let method = form
            .get_attribute("method")
            .map(|method| method.to_uppercase())
            .unwrap_or_else(|| "POST".to_string());
        let request_id = Uuid::new_v4().to_string();
        log::debug!("{} {} ({})", method, url, request_id);

        let request = Rc::new(FetchRequest::new());
        let pending = Rc::clone(&request);
        spawn_local(async move {
            let outcome =
                send(&url, &method, &data, pending.signal().as_ref(), &request_id).await;
            // aborted requests end with the cancel signal, not a response
            if pending.is_aborted() {
                log::debug!("Request {} aborted", request_id);
                return;
            }
            on_response(outcome);
        });
        request
    }
}

async fn send(
    url: &str,
    method: &str,
    data: &FormFields,
    signal: Option<&AbortSignal>,
    request_id: &str,
) -> SubmitOutcome {
    let window = web_sys::window()
        .ok_or_else(|| TransportError("No window available".to_string()))?;
    let body = serde_json::to_string(data)
        .map_err(|err| TransportError(err.to_string()))?;

    let headers = Headers::new().map_err(transport)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(transport)?;
    headers.set("Accept", "application/json").map_err(transport)?;
    headers.set(REQUEST_ID_HEADER, request_id).map_err(transport)?;

    let mut request_init = RequestInit::new();
    request_init.method(method);
    request_init.mode(RequestMode::Cors);
    request_init.headers(&headers);
    request_init.body(Some(&JsValue::from_str(&body)));
    request_init.signal(signal);

    let request =
        Request::new_with_str_and_init(url, &request_init).map_err(transport)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;

    let status = response.status();
    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?
        .as_string()
        .unwrap_or_default();
    Ok(HttpResponse::new(status, &text))
}
