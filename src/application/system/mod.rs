use crate::application::ml::{ModelSource, SmartCoreModelLoader};
use crate::application::render::{RenderHandler, RenderOutcome, RenderRequest};
use crate::config::Config;
use crate::domain::ports::MarketDataService;
use crate::infrastructure::yahoo::YahooMarketDataService;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Pending requests the UI may queue before `try_send` starts failing.
const REQUEST_QUEUE: usize = 16;

/// Channels connecting the UI thread to the render worker.
pub struct SystemHandle {
    pub request_tx: mpsc::Sender<RenderRequest>,
    pub outcome_rx: crossbeam_channel::Receiver<RenderOutcome>,
}

pub struct Application {
    pub config: Config,
    pub market_service: Arc<dyn MarketDataService>,
    pub model_source: Arc<dyn ModelSource>,
}

impl Application {
    pub fn build(config: Config) -> Result<Self> {
        info!(
            "Building Returncast Application (provider: {}, model: {:?})...",
            config.market_data.base_url, config.model.model_path
        );

        let market_service: Arc<dyn MarketDataService> =
            Arc::new(YahooMarketDataService::from_config(&config.market_data));
        let model_source: Arc<dyn ModelSource> =
            Arc::new(SmartCoreModelLoader::new(config.model.model_path.clone()));

        Ok(Self::with_services(config, market_service, model_source))
    }

    pub fn with_services(
        config: Config,
        market_service: Arc<dyn MarketDataService>,
        model_source: Arc<dyn ModelSource>,
    ) -> Self {
        Self {
            config,
            market_service,
            model_source,
        }
    }

    pub fn render_handler(&self) -> RenderHandler {
        let md = &self.config.market_data;
        RenderHandler::new(
            self.market_service.clone(),
            self.model_source.clone(),
            &md.lookback_period,
            &md.bar_interval,
            md.price_cache_ttl(),
        )
    }

    /// Spawns the render worker on the current runtime. Requests are handled
    /// strictly one after another.
    pub fn start(self) -> SystemHandle {
        let (request_tx, mut request_rx) = mpsc::channel::<RenderRequest>(REQUEST_QUEUE);
        let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded();
        let mut handler = self.render_handler();

        tokio::spawn(async move {
            info!("Render worker started");
            while let Some(request) = request_rx.recv().await {
                let outcome = handler.handle(request).await;
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
            }
            info!("Render worker stopped");
        });

        SystemHandle {
            request_tx,
            outcome_rx,
        }
    }
}
