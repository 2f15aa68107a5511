//! DOM event bindings for the action controller.
//!
//! Each host control present under the root gets exactly one listener that
//! reads its raw inputs once, prevents the default form navigation where
//! relevant, and forwards a `Gesture` into the controller channel. Dropping
//! the returned bindings removes every listener.

use crate::actions::Gesture;
use futures::channel::mpsc::UnboundedSender;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, HtmlInputElement, HtmlTextAreaElement};

type Handler = Closure<dyn FnMut(Event)>;

pub struct GestureBindings {
    listeners: Vec<(EventTarget, &'static str, Handler)>,
}

impl GestureBindings {
    /// Attach listeners to whichever action controls exist under `root`.
    /// Hosts render only the controls relevant to the page, so every control
    /// is optional; a root with none of them is reported as a warning.
    pub fn bind(root: &Element, sender: UnboundedSender<Gesture>) -> Self {
        let mut bindings = Self { listeners: vec![] };

        bindings.bind_control(root, ".create-release-form", "submit", {
            let sender = sender.clone();
            move |evt: Event| {
                evt.prevent_default();
                if let Some(form) = current_element(&evt) {
                    let _ = sender.unbounded_send(Gesture::Create {
                        name: form_value(&form, "input[name=release_name]"),
                        description: form_value(&form, "textarea[name=description]"),
                    });
                }
            }
        });

        bindings.bind_control(root, ".update-release-form", "submit", {
            let sender = sender.clone();
            move |evt: Event| {
                evt.prevent_default();
                if let Some(form) = current_element(&evt) {
                    let _ = sender.unbounded_send(Gesture::Update {
                        name: form_value(&form, "input[name=release_name]"),
                        description: form_value(&form, "textarea[name=description]"),
                    });
                }
            }
        });

        bindings.bind_control(root, ".delete-release-btn", "click", {
            let sender = sender.clone();
            move |evt: Event| {
                if let Some(release) = data_attribute(&evt, "data-release-name") {
                    let _ = sender.unbounded_send(Gesture::Delete { release });
                } else {
                    log::error!("delete button is missing data-release-name");
                }
            }
        });

        bindings.bind_control(root, ".revert-to-btn", "click", {
            let sender = sender.clone();
            move |evt: Event| {
                if let Some(revision_ref) = data_attribute(&evt, "data-revision-ref") {
                    let _ = sender.unbounded_send(Gesture::Revert { revision_ref });
                } else {
                    log::error!("revert button is missing data-revision-ref");
                }
            }
        });

        if bindings.listeners.is_empty() {
            log::warn!("no action controls found under the configured root");
        }
        bindings
    }

    fn bind_control(
        &mut self,
        root: &Element,
        selector: &str,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) {
        let Ok(Some(element)) = root.query_selector(selector) else {
            return;
        };
        let closure: Handler = Closure::wrap(Box::new(handler));
        let target: EventTarget = element.into();
        if target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("failed to attach {event} listener to {selector}");
            return;
        }
        self.listeners.push((target, event, closure));
    }
}

impl Drop for GestureBindings {
    fn drop(&mut self) {
        for (target, event, closure) in &self.listeners {
            let _ = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

fn current_element(evt: &Event) -> Option<Element> {
    evt.current_target()?.dyn_into::<Element>().ok()
}

fn data_attribute(evt: &Event, name: &str) -> Option<String> {
    current_element(evt)?.get_attribute(name)
}

/// Read a form field's raw value; trimming happens once, in the controller.
fn form_value(form: &Element, selector: &str) -> String {
    let Ok(Some(field)) = form.query_selector(selector) else {
        return String::new();
    };
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}
