//! # Application Context
//!
//! Everything the shell builds at startup, owned in one place and handed
//! out by reference.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AppContext                                      │
//! │                                                                         │
//! │  config ──────────► AppConfig (read-only)                               │
//! │  services() ──────► Services { OptionStore, Catalog }  ──► line items   │
//! │  tax_rates() ─────► TaxRateTable                       ──► recalculate  │
//! │  channels() ──────► Channels (shared with every service)                │
//! │  cart() ──────────► CartState                                           │
//! │  service("header")► HeaderService                                       │
//! │                                                                         │
//! │  start() / stop() run every service's lifecycle, in name order.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use cartline_core::{Services, TaxRateTable};
use tracing::info;

use crate::channel::Channels;
use crate::header::{HeaderService, Region};
use crate::state::{AppConfig, CartState};
use crate::store::services_from_config;

/// A long-lived shell component with a start/stop lifecycle.
pub trait Service: Send + Sync {
    fn name(&self) -> &str;
    fn start(&mut self);
    fn stop(&mut self);
}

/// Application-wide state and services.
pub struct AppContext {
    config: AppConfig,
    services: Services,
    tax_rates: TaxRateTable,
    channels: Arc<Channels>,
    cart: CartState,
    header_region: Arc<Region>,
    menu_region: Arc<Region>,
    modules: BTreeMap<String, Box<dyn Service>>,
}

impl AppContext {
    /// Builds collaborators and services from `config`. Nothing is started.
    pub fn new(config: AppConfig) -> Self {
        let services = services_from_config(&config);
        let tax_rates = config.tax_rate_table();
        let channels = Arc::new(Channels::new());
        let header_region = Arc::new(Region::new("header"));
        let menu_region = Arc::new(Region::new("menu"));

        let mut context = AppContext {
            services,
            tax_rates,
            channels,
            cart: CartState::new(),
            header_region,
            menu_region,
            modules: BTreeMap::new(),
            config,
        };

        let header = HeaderService::new(
            &context.channels,
            context.header_region.clone(),
            context.menu_region.clone(),
            context.config.store.name.clone(),
        );
        context.register(Box::new(header));
        context
    }

    /// Adds a service under its own name, replacing any with the same name.
    pub fn register(&mut self, service: Box<dyn Service>) {
        self.modules.insert(service.name().to_string(), service);
    }

    pub fn start(&mut self) {
        for (name, service) in &mut self.modules {
            service.start();
            info!(%name, "service started");
        }
    }

    pub fn stop(&mut self) {
        for (name, service) in &mut self.modules {
            service.stop();
            info!(%name, "service stopped");
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Collaborators for line-item constructors.
    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn tax_rates(&self) -> &TaxRateTable {
        &self.tax_rates
    }

    pub fn channels(&self) -> &Arc<Channels> {
        &self.channels
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn header_region(&self) -> &Arc<Region> {
        &self.header_region
    }

    pub fn menu_region(&self) -> &Arc<Region> {
        &self.menu_region
    }

    pub fn service(&self, name: &str) -> Option<&dyn Service> {
        self.modules.get(name).map(|service| service.as_ref())
    }
}
