#![warn(
    missing_docs,
    clippy::pedantic,
    clippy::allow_attributes,
    clippy::absolute_paths,
    clippy::alloc_instead_of_core,
    clippy::decimal_literal_representation,
    clippy::missing_docs_in_private_items
)]
#![allow(clippy::must_use_candidate)]

//! Browser side of popup login, compiled to WASM. This is the imperative
//! shell around `popup_login_core::Interceptor`: it turns page events into
//! `Event`s and carries out the `Effect`s that come back.

#[expect(clippy::missing_docs_in_private_items)]
mod utils;

use popup_login_core::client::Client;
use popup_login_core::interceptor::{
    Effect, Event, FormId, Submission, LOGIN_FORM_CLASS, MESSAGE_AREA_CLASS,
};
use popup_login_core::{Interceptor, RuntimeConfig};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    console, Element, FormData, HtmlButtonElement, HtmlFormElement, HtmlInputElement, Node,
};

/// Everything that lives for the life of the page.
struct Shell {
    /// Decides what to do
    interceptor: Interceptor,

    /// The elements behind each `FormId`, indexed by the ID
    forms: Vec<HtmlFormElement>,

    /// Shared HTTP client
    http: reqwest::Client,
}

impl Shell {
    /// The `FormId` for an element, handing out a new one the first time we
    /// see it.
    fn form_id(&mut self, form: &HtmlFormElement) -> FormId {
        let node: &Node = form;

        let index = match self.forms.iter().position(|known| known.is_same_node(Some(node))) {
            Some(index) => index,
            None => {
                self.forms.push(form.clone());
                self.forms.len() - 1
            }
        };

        FormId(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

thread_local! {
    static SHELL: RefCell<Option<Shell>> = const { RefCell::new(None) };
}

/// Runs once when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

/// Set up interception with the JSON served by the login config endpoint.
/// Calling this again starts over with the new config.
///
/// # Errors
///
/// If the JSON isn't a valid config.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    let config: RuntimeConfig =
        serde_json::from_str(config_json).map_err(|err| JsValue::from_str(&err.to_string()))?;

    SHELL.with_borrow_mut(|shell| {
        *shell = Some(Shell {
            interceptor: Interceptor::new(config),
            forms: Vec::new(),
            http: reqwest::Client::new(),
        });
    });

    Ok(())
}

/// Tell us a popup opened. `popup` is the popup's root element; the login
/// form, if there is one, is looked up inside it.
///
/// # Errors
///
/// If looking for the form fails.
#[wasm_bindgen]
pub fn popup_shown(popup_id: u32, popup: &Element) -> Result<(), JsValue> {
    let form = popup
        .query_selector(&format!(".{LOGIN_FORM_CLASS}"))?
        .and_then(|element| element.dyn_into::<HtmlFormElement>().ok());

    let form = match form {
        Some(form) => {
            let id = SHELL.with_borrow_mut(|shell| shell.as_mut().map(|shell| shell.form_id(&form)));

            if id.is_none() {
                not_configured();
                return Ok(());
            }

            id
        }
        None => None,
    };

    dispatch(Event::PopupShown { popup_id, form });

    Ok(())
}

/// Events that arrive before `configure` have nothing to act on.
fn not_configured() {
    console::warn_1(&JsValue::from_str(
        "popup login: got an event before configure() was called",
    ));
}

/// Feed an event to the interceptor and run whatever it asks for.
fn dispatch(event: Event) {
    // The borrow has to end before effects run, since they may dispatch again.
    let effects =
        SHELL.with_borrow_mut(|shell| shell.as_mut().map(|shell| shell.interceptor.handle(event)));

    let Some(effects) = effects else {
        not_configured();
        return;
    };

    for effect in effects {
        if let Err(err) = run(effect) {
            console::error_1(&err);
        }
    }
}

/// The element behind a `FormId`.
fn lookup(id: FormId) -> Result<HtmlFormElement, JsValue> {
    SHELL
        .with_borrow(|shell| {
            let index = usize::try_from(id.0).ok()?;
            shell.as_ref()?.forms.get(index).cloned()
        })
        .ok_or_else(|| JsValue::from_str("popup login: unknown form"))
}

/// Carry out one effect.
fn run(effect: Effect) -> Result<(), JsValue> {
    match effect {
        Effect::AttachSubmitListener(id) => attach_submit_listener(id, &lookup(id)?),

        Effect::Post(submission) => {
            post(submission);
            Ok(())
        }

        Effect::Reload => web_sys::window()
            .ok_or_else(|| JsValue::from_str("popup login: no window"))?
            .location()
            .reload(),

        Effect::ShowError { form, banner } => {
            let form = lookup(form)?;

            let area = match form.query_selector(&format!(".{MESSAGE_AREA_CLASS}"))? {
                Some(area) => area,
                None => {
                    let document = form
                        .owner_document()
                        .ok_or_else(|| JsValue::from_str("popup login: form has no document"))?;

                    let area = document.create_element("div")?;
                    area.set_class_name(MESSAGE_AREA_CLASS);
                    form.append_child(&area)?;
                    area
                }
            };

            area.set_inner_html(&banner.to_html());
            Ok(())
        }

        Effect::SetSubmitEnabled { form, enabled } => {
            let controls = lookup(form)?.query_selector_all("[type=submit]")?;

            for index in 0..controls.length() {
                let Some(control) = controls.item(index) else {
                    continue;
                };

                if let Some(button) = control.dyn_ref::<HtmlButtonElement>() {
                    button.set_disabled(!enabled);
                } else if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
                    input.set_disabled(!enabled);
                }
            }

            Ok(())
        }

        Effect::ConsoleError(message) => {
            console::error_1(&JsValue::from_str(&message));
            Ok(())
        }
    }
}

/// Stop the browser submitting `form` itself and tell the interceptor
/// instead. The listener lives as long as the page does.
fn attach_submit_listener(id: FormId, form: &HtmlFormElement) -> Result<(), JsValue> {
    let target = form.clone();

    let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();

        match fields(&target) {
            Ok(fields) => dispatch(Event::Submitted { form: id, fields }),
            Err(err) => console::error_1(&err),
        }
    });

    form.add_event_listener_with_callback("submit", listener.as_ref().unchecked_ref())?;
    listener.forget();

    Ok(())
}

/// Every text field in the form, in document order. File inputs are
/// skipped.
fn fields(form: &HtmlFormElement) -> Result<Vec<(String, String)>, JsValue> {
    let data = FormData::new_with_form(form)?;
    let mut fields = Vec::new();

    if let Some(entries) = js_sys::try_iter(&data)? {
        for entry in entries {
            let entry: js_sys::Array = entry?.dyn_into()?;

            if let (Some(name), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string())
            {
                fields.push((name, value));
            }
        }
    }

    Ok(fields)
}

/// Send a submission in the background and dispatch the result when it
/// lands.
fn post(submission: Submission) {
    let http = SHELL.with_borrow(|shell| shell.as_ref().map(|shell| shell.http.clone()));

    let Some(http) = http else {
        not_configured();
        return;
    };

    spawn_local(async move {
        let client = Client::new(submission.url);

        let outcome = client
            .submit(&http, &submission.fields)
            .await
            .map_err(|err| err.to_string());

        dispatch(Event::Resolved {
            form: submission.form,
            outcome,
        });
    });
}
