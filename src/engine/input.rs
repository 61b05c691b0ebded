use crate::browser;
use anyhow::Result;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use wasm_bindgen::JsCast;

/// Raw keyboard event, carries `KeyboardEvent.key` ("w", "a", ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    KeyDown(String),
    KeyUp(String),
}

/// Keys currently held plus the ordered events received since the game last
/// drained them. Order matters : the player resolves opposing keys by which
/// one went down last.
#[derive(Debug, Default)]
pub struct KeyState {
    pressed: HashSet<String>,
    events: Vec<KeyPress>,
}

impl KeyState {
    pub fn new() -> Self {
        KeyState::default()
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    pub fn record(&mut self, event: KeyPress) {
        match &event {
            KeyPress::KeyDown(key) => {
                self.pressed.insert(key.clone());
            }
            KeyPress::KeyUp(key) => {
                self.pressed.remove(key);
            }
        }
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<KeyPress> {
        std::mem::take(&mut self.events)
    }
}

/// Hook keydown/keyup on the document and forward them into a channel, so
/// the frame loop can pull them synchronously once per frame
pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
    let (keydown_sender, keyevent_receiver) = unbounded();
    let keydown_sender = Rc::new(RefCell::new(keydown_sender));
    let keyup_sender = Rc::clone(&keydown_sender);

    let onkeydown = browser::closure_wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let _ = keydown_sender
            .borrow_mut()
            .start_send(KeyPress::KeyDown(event.key()));
    }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

    let onkeyup = browser::closure_wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        let _ = keyup_sender
            .borrow_mut()
            .start_send(KeyPress::KeyUp(event.key()));
    }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

    let document = browser::document()?;
    document.set_onkeydown(Some(onkeydown.as_ref().unchecked_ref()));
    document.set_onkeyup(Some(onkeyup.as_ref().unchecked_ref()));
    // listeners live as long as the page
    onkeydown.forget();
    onkeyup.forget();

    Ok(keyevent_receiver)
}

pub fn process_input(state: &mut KeyState, keyevent_receiver: &mut UnboundedReceiver<KeyPress>) {
    loop {
        match keyevent_receiver.try_next() {
            Ok(Some(event)) => state.record(event),
            // closed, or nothing queued this frame
            Ok(None) | Err(_) => break,
        }
    }
}
