pub mod handlers;
pub mod header;
pub mod log_list;

pub use handlers::{Intent, IntentHandler};

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::Orientation;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

use crate::app::AppState;
use crate::worker::UploadEvent;

/// Build the main window.
///
/// Toggle presses are reported through `on_intent`; upload events arriving on
/// `events` are shown in the recent uploads list.
pub fn build_ui(app: &adw::Application, on_intent: IntentHandler, events: Receiver<UploadEvent>) {
    let state = Rc::new(RefCell::new(AppState::new()));

    let header = header::create_header_bar();
    let log_list = log_list::create_log_list();

    let body = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(15)
        .margin_top(20)
        .margin_bottom(20)
        .margin_start(20)
        .margin_end(20)
        .build();
    body.append(&header.status_frame);
    body.append(&header.toggle_btn);
    body.append(&log_list.container);

    let content = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .build();
    content.append(&header.header_bar);
    content.append(&body);

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("LiveScreenUploader")
        .content(&content)
        .width_request(400)
        .height_request(500)
        .default_width(400)
        .default_height(560)
        .build();

    let components = handlers::UiComponents {
        window: window.clone(),
        header,
        log_list,
    };

    handlers::connect_all_handlers(&state, &components, on_intent, events);

    window.present();
}
