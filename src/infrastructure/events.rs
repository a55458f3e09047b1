//! Document-level pointer listeners for the lifetime of one gesture.

use leptos::ev::{self, EventDescriptor};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, PointerEvent};

#[derive(Clone, Debug)]
pub struct EventOptions {
    pub passive: bool,
    pub capture: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self { passive: true, capture: false }
    }
}

pub struct DocumentListenerHandle {
    event_name: String,
    callback: Closure<dyn FnMut(Event)>,
    capture: bool,
}

impl DocumentListenerHandle {
    pub fn remove(self) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let _ = document.remove_event_listener_with_callback_and_bool(
                &self.event_name,
                self.callback.as_ref().unchecked_ref(),
                self.capture,
            );
        }
    }
}

pub fn document_event_listener<E>(
    event: E,
    options: &EventOptions,
    mut cb: impl FnMut(E::EventType) + 'static,
) -> DocumentListenerHandle
where
    E: EventDescriptor + 'static,
    E::EventType: JsCast,
{
    let opts = AddEventListenerOptions::new();
    opts.set_passive(options.passive);
    opts.set_capture(options.capture);

    let event_name = event.name().into_owned();
    let callback = Closure::wrap(Box::new(move |ev: Event| {
        cb(ev.unchecked_into::<E::EventType>());
    }) as Box<dyn FnMut(Event)>);

    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
            &event_name,
            callback.as_ref().unchecked_ref(),
            &opts,
        );
    }

    DocumentListenerHandle { event_name, callback, capture: options.capture }
}

/// The move/up/cancel trio attached while a drag or resize is live.
pub struct SessionListeners {
    handles: Vec<DocumentListenerHandle>,
}

impl SessionListeners {
    pub fn install(
        on_move: impl FnMut(PointerEvent) + 'static,
        on_up: impl FnMut(PointerEvent) + 'static,
        on_cancel: impl FnMut(PointerEvent) + 'static,
    ) -> Self {
        let options = EventOptions::default();
        Self {
            handles: vec![
                document_event_listener(ev::pointermove, &options, on_move),
                document_event_listener(ev::pointerup, &options, on_up),
                document_event_listener(ev::pointercancel, &options, on_cancel),
            ],
        }
    }

    pub fn remove(self) {
        for handle in self.handles {
            handle.remove();
        }
    }
}
