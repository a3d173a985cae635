use gtk::glib;
use gtk4 as gtk;
use libadwaita as adw;
use log::debug;

use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crate::app::AppState;
use crate::ui::header::{show_capturing, HeaderComponents};
use crate::ui::log_list::{render_entries, LogListComponents};
use crate::worker::UploadEvent;

/// How often the UI thread drains upload events from the worker
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// User intent forwarded to the capture scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
}

pub type IntentHandler = Rc<dyn Fn(Intent)>;

pub struct UiComponents {
    pub window: adw::ApplicationWindow,
    pub header: HeaderComponents,
    pub log_list: LogListComponents,
}

pub fn connect_toggle_handler(
    state: &Rc<RefCell<AppState>>,
    components: &UiComponents,
    on_intent: IntentHandler,
) {
    components.header.toggle_btn.connect_clicked({
        let state = state.clone();
        let header = components.header.clone();
        move |_| {
            let capturing = state.borrow_mut().toggle_capturing();
            debug!("Toggle pressed, capturing: {}", capturing);
            show_capturing(&header, capturing);

            if capturing {
                start_countdown(&state, &header.countdown_label);
                on_intent(Intent::Start);
            } else {
                stop_countdown(&state);
                on_intent(Intent::Pause);
            }
        }
    });
}

fn start_countdown(state: &Rc<RefCell<AppState>>, label: &gtk::Label) {
    stop_countdown(state);
    update_countdown(state, label);

    let source = glib::timeout_add_seconds_local(1, {
        let state = state.clone();
        let label = label.clone();
        move || {
            update_countdown(&state, &label);
            glib::ControlFlow::Continue
        }
    });
    state.borrow_mut().countdown_source = Some(source);
}

fn stop_countdown(state: &Rc<RefCell<AppState>>) {
    let source = state.borrow_mut().countdown_source.take();
    if let Some(source) = source {
        source.remove();
    }
}

fn update_countdown(state: &Rc<RefCell<AppState>>, label: &gtk::Label) {
    let remaining = state.borrow_mut().countdown.tick();
    label.set_label(&format!("Next screenshot in: {}s", remaining));
}

/// Drain upload events on the main loop and append them to the log view
pub fn connect_event_pump(
    state: &Rc<RefCell<AppState>>,
    components: &UiComponents,
    events: Receiver<UploadEvent>,
) {
    let state = state.clone();
    let list_box = components.log_list.list_box.clone();

    glib::timeout_add_local(EVENT_POLL_INTERVAL, move || {
        let mut received = false;
        let mut disconnected = false;

        loop {
            match events.try_recv() {
                Ok(event) => {
                    debug!("Upload event: {}", event.url);
                    state
                        .borrow_mut()
                        .add_log_entry(&event.message, &event.display_time);
                    received = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if received {
            render_entries(&list_box, state.borrow().log.entries());
        }

        if disconnected {
            glib::ControlFlow::Break
        } else {
            glib::ControlFlow::Continue
        }
    });
}

pub fn connect_all_handlers(
    state: &Rc<RefCell<AppState>>,
    components: &UiComponents,
    on_intent: IntentHandler,
    events: Receiver<UploadEvent>,
) {
    debug!("Initializing UI handlers");
    connect_toggle_handler(state, components, on_intent);
    connect_event_pump(state, components, events);

    components.window.connect_close_request({
        let state = state.clone();
        move |_| {
            stop_countdown(&state);
            glib::Propagation::Proceed
        }
    });
}
