mod app;
mod capture;
mod retention;
mod ui;
mod upload;
mod worker;

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::glib;
use log::{error, info};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::sync::Arc;

use app::{AppConfig, CAPTURE_INTERVAL, RETENTION_PERIOD};
use capture::PrimaryMonitor;
use ui::{Intent, IntentHandler};
use upload::{SupabaseStore, Uploader};
use worker::{CaptureCycle, Scheduler};

const APP_ID: &str = "org.example.LiveScreenUploader";

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return glib::ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.ensure_dirs() {
        error!("Failed to create application directories: {}", e);
        return glib::ExitCode::FAILURE;
    }

    let uploader = match SupabaseStore::connect(&config) {
        Ok(store) => {
            info!("Backend client initialized (bucket '{}')", config.bucket);
            Uploader::new(Box::new(store))
        }
        Err(e) => {
            error!("Failed to initialize backend client: {}", e);
            Uploader::disabled()
        }
    };

    let cycle = Arc::new(CaptureCycle::new(
        config.temp_dir.clone(),
        Box::new(PrimaryMonitor),
        uploader,
        RETENTION_PERIOD,
    ));
    let (events_tx, events_rx) = mpsc::channel();
    let scheduler = Rc::new(RefCell::new(Scheduler::new(
        cycle,
        CAPTURE_INTERVAL,
        events_tx,
    )));
    let events_rx = RefCell::new(Some(events_rx));

    let app = adw::Application::builder().application_id(APP_ID).build();

    app.connect_activate({
        let scheduler = scheduler.clone();
        move |app| {
            if let Some(window) = app.active_window() {
                window.present();
                return;
            }
            let Some(events) = events_rx.borrow_mut().take() else {
                return;
            };

            let scheduler = scheduler.clone();
            let on_intent: IntentHandler = Rc::new(move |intent| match intent {
                Intent::Start => {
                    scheduler.borrow_mut().start();
                }
                Intent::Pause => scheduler.borrow_mut().stop(),
            });
            ui::build_ui(app, on_intent, events);
        }
    });

    app.connect_shutdown(move |_| scheduler.borrow_mut().stop());

    app.run()
}
