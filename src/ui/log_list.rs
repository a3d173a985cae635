use gtk4 as gtk;

use gtk::prelude::*;
use gtk::{Align, Orientation};

use crate::app::LogEntry;

pub struct LogListComponents {
    pub container: gtk::Box,
    pub list_box: gtk::ListBox,
}

pub fn create_log_list() -> LogListComponents {
    let heading = gtk::Label::builder()
        .label("Recent Uploads")
        .halign(Align::Start)
        .build();
    heading.add_css_class("heading");

    let list_box = gtk::ListBox::builder()
        .selection_mode(gtk::SelectionMode::None)
        .build();
    list_box.add_css_class("boxed-list");
    let placeholder = gtk::Label::builder()
        .label("No uploads yet")
        .margin_top(12)
        .margin_bottom(12)
        .build();
    placeholder.add_css_class("dim-label");
    list_box.set_placeholder(Some(&placeholder));

    let scrolled = gtk::ScrolledWindow::builder()
        .hscrollbar_policy(gtk::PolicyType::Never)
        .vexpand(true)
        .child(&list_box)
        .build();

    let container = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(6)
        .build();
    container.append(&heading);
    container.append(&scrolled);

    LogListComponents {
        container,
        list_box,
    }
}

/// Replace the list contents with `entries`, in order
pub fn render_entries<'a>(list_box: &gtk::ListBox, entries: impl Iterator<Item = &'a LogEntry>) {
    list_box.remove_all();
    for entry in entries {
        list_box.append(&create_row(entry));
    }
}

fn create_row(entry: &LogEntry) -> gtk::Box {
    let indicator = gtk::Image::from_icon_name("emblem-ok-symbolic");
    indicator.add_css_class("success");

    let message = gtk::Label::builder()
        .label(entry.message.as_str())
        .halign(Align::Start)
        .ellipsize(gtk::pango::EllipsizeMode::Middle)
        .build();

    let timestamp = gtk::Label::builder()
        .label(entry.timestamp.as_str())
        .halign(Align::Start)
        .build();
    timestamp.add_css_class("dim-label");
    timestamp.add_css_class("caption");

    let text = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(2)
        .hexpand(true)
        .build();
    text.append(&message);
    text.append(&timestamp);

    let row = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(10)
        .margin_top(6)
        .margin_bottom(6)
        .margin_start(10)
        .margin_end(10)
        .build();
    row.append(&indicator);
    row.append(&text);
    row
}
