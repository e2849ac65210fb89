use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::observability::Metrics;
use crate::providers::ProviderRegistry;
use crate::settings::ConfigStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ConfigStore>,
    pub dispatcher: Arc<Dispatcher>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ConfigStore>, providers: ProviderRegistry) -> Self {
        let dispatcher =
            Dispatcher::new(config.site.charset.clone(), store.clone()).with_providers(providers);

        Self {
            config: Arc::new(config),
            store,
            dispatcher: Arc::new(dispatcher),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
