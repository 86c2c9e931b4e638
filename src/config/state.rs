// Application state module
// Everything a request handler reads, fixed at startup

use std::path::Path;

use super::types::Config;
use crate::routes::RouteTable;
use crate::settings::{self, Settings};
use crate::template::TemplateLoader;

/// Shared application state
///
/// Built once in `main` and handed to every connection behind an `Arc`.
/// There is no interior mutability: handlers only read, so concurrent
/// request invocations never contend.
pub struct AppState {
    pub config: Config,
    pub settings: Settings,
    pub routes: RouteTable,
    pub templates: TemplateLoader,
}

impl AppState {
    /// Build the state from loaded configuration
    ///
    /// When no token is configured, a fresh one is generated here so the
    /// settings injected into handlers are complete for the process
    /// lifetime.
    pub fn new(config: Config) -> Self {
        let token = config
            .app
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(settings::generate_token);

        let settings = Settings::new(
            config.app.base_url.clone(),
            config.app.page_url.clone(),
            Some(token),
        );
        let routes = RouteTable::for_app(settings.page_url(), Path::new(&config.app.build_dir));
        let templates = TemplateLoader::new(&config.app.template_dir);

        Self {
            config,
            settings,
            routes,
            templates,
        }
    }
}
