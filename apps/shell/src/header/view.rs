//! Display regions and the views shown in them.

use std::sync::{Arc, Mutex};

use crate::channel::lock;

/// The store title shown across the top of the till.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBar {
    title: String,
}

impl TitleBar {
    pub fn new(title: impl Into<String>) -> Self {
        TitleBar {
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn update(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }
}

/// The slide-out navigation menu.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    open: bool,
}

impl Menu {
    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// A view mounted in a [`Region`]. Clones share the underlying view.
#[derive(Debug, Clone)]
pub enum View {
    TitleBar(Arc<Mutex<TitleBar>>),
    Menu(Arc<Mutex<Menu>>),
}

impl View {
    pub fn title_bar(title: impl Into<String>) -> Self {
        View::TitleBar(Arc::new(Mutex::new(TitleBar::new(title))))
    }

    pub fn menu() -> Self {
        View::Menu(Arc::new(Mutex::new(Menu::default())))
    }
}

/// A named slot on screen holding at most one view.
#[derive(Debug)]
pub struct Region {
    name: String,
    view: Mutex<Option<View>>,
}

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Region {
            name: name.into(),
            view: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mounts `view`, replacing whatever was shown.
    pub fn show(&self, view: View) {
        *lock(&self.view) = Some(view);
    }

    pub fn clear(&self) {
        *lock(&self.view) = None;
    }

    pub fn current(&self) -> Option<View> {
        lock(&self.view).clone()
    }

    /// The mounted title bar, if the region shows one.
    pub fn title_bar(&self) -> Option<Arc<Mutex<TitleBar>>> {
        match self.current() {
            Some(View::TitleBar(bar)) => Some(bar),
            _ => None,
        }
    }

    /// The mounted menu, if the region shows one.
    pub fn menu(&self) -> Option<Arc<Mutex<Menu>>> {
        match self.current() {
            Some(View::Menu(menu)) => Some(menu),
            _ => None,
        }
    }

    /// Title of the mounted title bar.
    pub fn title(&self) -> Option<String> {
        self.title_bar().map(|bar| lock(&bar).title().to_string())
    }

    /// Whether the mounted menu is open. `None` when no menu is shown.
    pub fn menu_open(&self) -> Option<bool> {
        self.menu().map(|menu| lock(&menu).is_open())
    }
}
