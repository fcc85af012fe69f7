//! # Collaborators
//!
//! Line items consult two outside services while resolving their defaults:
//! an option store (configured defaults for fees, shipping, ...) and a
//! translator (display titles). Both are traits; the application context
//! hands a [`Services`] bundle to every constructor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppContext (shell)                                                     │
//! │  ├── OptionStore ──────┐                                                │
//! │  └── Catalog ──────────┤                                                │
//! │                        ▼                                                │
//! │                    Services ──► Fee::with_attributes(&services, ..)     │
//! │                                                                         │
//! │  Either service may be missing: lookups then return None and the line   │
//! │  item falls back to its hard-coded defaults.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Entity kind under which store options are looked up.
pub const OPTION_KIND: &str = "option";

/// A request for a named entity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityQuery<'a> {
    pub kind: &'a str,
    pub name: &'a str,
}

impl<'a> EntityQuery<'a> {
    /// `{ kind: "option", name }`
    pub const fn option(name: &'a str) -> Self {
        EntityQuery {
            kind: OPTION_KIND,
            name,
        }
    }
}

/// Source of configured option records.
pub trait OptionLookup: Send + Sync {
    /// Returns the record, or `None` if there is none (or the store failed).
    fn lookup(&self, query: &EntityQuery<'_>) -> Option<Value>;
}

/// Translation of display strings.
pub trait Translate: Send + Sync {
    /// Returns the phrase for `key`, or `None` when it has no translation.
    fn translate(&self, key: &str) -> Option<String>;
}

/// The collaborators available to line-item constructors.
#[derive(Clone, Default)]
pub struct Services {
    options: Option<Arc<dyn OptionLookup>>,
    translator: Option<Arc<dyn Translate>>,
}

impl Services {
    /// No collaborators; every default is the hard-coded one.
    pub fn detached() -> Self {
        Services::default()
    }

    pub fn with_options(mut self, options: Arc<dyn OptionLookup>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translate>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Looks up the store option `name`.
    pub fn option(&self, name: &str) -> Option<Value> {
        self.options
            .as_ref()
            .and_then(|store| store.lookup(&EntityQuery::option(name)))
    }

    /// Translates `key`.
    pub fn translate(&self, key: &str) -> Option<String> {
        self.translator.as_ref().and_then(|t| t.translate(key))
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("options", &self.options.is_some())
            .field("translator", &self.translator.is_some())
            .finish()
    }
}
