use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::{Align, Orientation};

pub const STATUS_ACTIVE: &str = "Status: Active";
pub const STATUS_PAUSED: &str = "Status: Paused";
pub const COUNTDOWN_IDLE: &str = "Next screenshot in: --";
pub const START_LABEL: &str = "Start Capturing";
pub const PAUSE_LABEL: &str = "Pause Capturing";

#[derive(Clone)]
pub struct HeaderComponents {
    pub header_bar: adw::HeaderBar,
    pub status_frame: gtk::Box,
    pub status_label: gtk::Label,
    pub countdown_label: gtk::Label,
    pub toggle_btn: gtk::Button,
}

pub fn create_header_bar() -> HeaderComponents {
    let header_bar = adw::HeaderBar::builder()
        .title_widget(&adw::WindowTitle::new("LiveScreenUploader", ""))
        .build();

    let status_label = gtk::Label::builder()
        .label(STATUS_PAUSED)
        .halign(Align::Center)
        .build();
    status_label.add_css_class("title-4");

    let countdown_label = gtk::Label::builder()
        .label(COUNTDOWN_IDLE)
        .halign(Align::Center)
        .build();
    countdown_label.add_css_class("dim-label");

    let status_frame = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(6)
        .margin_top(12)
        .margin_bottom(12)
        .margin_start(12)
        .margin_end(12)
        .build();
    status_frame.add_css_class("card");
    status_frame.append(&status_label);
    status_frame.append(&countdown_label);

    let toggle_btn = gtk::Button::builder()
        .label(START_LABEL)
        .height_request(50)
        .build();
    toggle_btn.add_css_class("suggested-action");
    toggle_btn.add_css_class("pill");

    HeaderComponents {
        header_bar,
        status_frame,
        status_label,
        countdown_label,
        toggle_btn,
    }
}

/// Switch the status widgets between the active and paused looks
pub fn show_capturing(header: &HeaderComponents, capturing: bool) {
    if capturing {
        header.status_label.set_label(STATUS_ACTIVE);
        header.toggle_btn.set_label(PAUSE_LABEL);
        header.toggle_btn.remove_css_class("suggested-action");
        header.toggle_btn.add_css_class("destructive-action");
    } else {
        header.status_label.set_label(STATUS_PAUSED);
        header.countdown_label.set_label(COUNTDOWN_IDLE);
        header.toggle_btn.set_label(START_LABEL);
        header.toggle_btn.remove_css_class("destructive-action");
        header.toggle_btn.add_css_class("suggested-action");
    }
}
