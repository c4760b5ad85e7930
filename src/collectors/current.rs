use crate::config::CollectorConfig;
use crate::error::Result;
use crate::processors::ParallelProcessor;
use crate::transport::{HttpClient, Transport};
use crate::utils::constants::CURRENT_STATION_PATH;
use crate::utils::progress::ProgressReporter;
use crate::utils::text::slugify;
use serde_json::Value;
use tracing::{error, info};

/// Latest synop observations from the per-station JSON API
pub struct CurrentCollector<T = HttpClient> {
    transport: T,
    base_url: String,
    processor: ParallelProcessor,
}

impl CurrentCollector<HttpClient> {
    pub fn from_config(config: &CollectorConfig) -> Result<Self> {
        let transport = HttpClient::new(config.request_timeout())?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: Transport> CurrentCollector<T> {
    pub fn with_transport(transport: T, config: &CollectorConfig) -> Self {
        Self {
            transport,
            base_url: config.current_base_url.trim_end_matches('/').to_string(),
            processor: ParallelProcessor::new(config.max_workers),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch current data for every location, in input order
    pub fn get(&self, locations: &[String]) -> Result<Vec<Value>> {
        self.get_with_progress(locations, None)
    }

    pub fn get_with_progress(
        &self,
        locations: &[String],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<Value>> {
        self.processor
            .process_locations(locations, progress, |location| self.process(location))
    }

    pub fn process(&self, location: &str) -> Result<Value> {
        let url = self.station_url(location);
        let response = self.transport.check_url(&url).map_err(|e| {
            error!("URL not responding: {}", e);
            e
        })?;

        info!("Getting current data for {}...", location);
        Ok(serde_json::from_slice(&response.body)?)
    }

    pub fn station_url(&self, location: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            CURRENT_STATION_PATH,
            slugify(location)
        )
    }
}
