use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::provider::MarketData;
use crate::screener::Analyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub provider: Arc<dyn MarketData>,
    pub defaults: AnalysisConfig,
}

impl AppState {
    pub fn new(
        analyzer: Arc<Analyzer>,
        provider: Arc<dyn MarketData>,
        defaults: AnalysisConfig,
    ) -> Self {
        Self {
            analyzer,
            provider,
            defaults,
        }
    }
}
