mod app;
mod console_ui;
mod loopback;
mod page_scraper;
mod page_watcher;

pub use app::run_app;
