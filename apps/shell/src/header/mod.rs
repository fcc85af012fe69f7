//! # Header Service
//!
//! Owns the title bar and menu and answers on the `header` channel.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    HeaderService lifecycle                              │
//! │                                                                         │
//! │  new() ────► reply("update:title")                                      │
//! │                                                                         │
//! │  start() ──► header region ◄── TitleBar(store name)                     │
//! │              menu region   ◄── Menu (closed)                            │
//! │              reply("open:menu"), reply("close:menu")                    │
//! │                                                                         │
//! │  stop() ───► channel.reset()  (every request now → NoHandler)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Request        | Payload        | Response                         |
//! |----------------|----------------|----------------------------------|
//! | `update:title` | title string   | shown title, or `null` if none   |
//! | `open:menu`    | ignored        | `true` if a menu is shown        |
//! | `close:menu`   | ignored        | `true` if a menu is shown        |

mod view;

pub use view::{Menu, Region, TitleBar, View};

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::channel::{lock, Channel, Channels};
use crate::context::Service;

pub const HEADER_CHANNEL: &str = "header";
pub const UPDATE_TITLE: &str = "update:title";
pub const OPEN_MENU: &str = "open:menu";
pub const CLOSE_MENU: &str = "close:menu";

/// Title bar and menu, driven over the `header` channel.
#[derive(Debug)]
pub struct HeaderService {
    channel: Arc<Channel>,
    header: Arc<Region>,
    menu: Arc<Region>,
    title: String,
}

impl HeaderService {
    /// Creates the service over two externally owned regions. `title` is
    /// what the title bar shows when started.
    pub fn new(
        channels: &Channels,
        header: Arc<Region>,
        menu: Arc<Region>,
        title: impl Into<String>,
    ) -> Self {
        let service = HeaderService {
            channel: channels.channel(HEADER_CHANNEL),
            header,
            menu,
            title: title.into(),
        };
        service.reply_update_title();
        service
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    fn reply_update_title(&self) {
        let header = self.header.clone();
        self.channel.reply(UPDATE_TITLE, move |payload| {
            let title = match payload {
                Value::String(title) => title,
                other => {
                    warn!(payload = %other, "update:title expects a string");
                    return Value::from(header.title());
                }
            };
            match header.title_bar() {
                Some(bar) => {
                    lock(&bar).update(title.clone());
                    debug!(%title, "title updated");
                    Value::String(title)
                }
                None => Value::Null,
            }
        });
    }

    fn reply_menu(&self, request: &str, open: bool) {
        let menu = self.menu.clone();
        self.channel.reply(request, move |_| {
            let Some(view) = menu.menu() else {
                return Value::Bool(false);
            };
            let mut view = lock(&view);
            if open {
                view.open();
            } else {
                view.close();
            }
            Value::Bool(true)
        });
    }
}

impl Service for HeaderService {
    fn name(&self) -> &str {
        HEADER_CHANNEL
    }

    fn start(&mut self) {
        self.header.show(View::title_bar(self.title.clone()));
        self.menu.show(View::menu());

        self.reply_update_title();
        self.reply_menu(OPEN_MENU, true);
        self.reply_menu(CLOSE_MENU, false);
        info!(title = %self.title, "header started");
    }

    fn stop(&mut self) {
        self.channel.reset();
        info!("header stopped");
    }
}
