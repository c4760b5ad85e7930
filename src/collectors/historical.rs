use crate::archive::{Archive, ArchiveListing, ArchiveReader};
use crate::config::{CollectMode, CollectorConfig, ListingLayout};
use crate::error::Result;
use crate::models::{station_code, HistoricalRecord, RawRecord};
use crate::processors::ParallelProcessor;
use crate::transport::{HttpClient, Transport};
use crate::utils::progress::ProgressReporter;
use tracing::{debug, info, warn};

pub type LocationRecords = Option<Vec<HistoricalRecord>>;

/// Historical synop observations from the yearly zip archives
pub struct HistoricalCollector<T = HttpClient> {
    transport: T,
    config: CollectorConfig,
    reader: ArchiveReader,
    processor: ParallelProcessor,
}

impl HistoricalCollector<HttpClient> {
    pub fn from_config(config: CollectorConfig) -> Result<Self> {
        let transport = HttpClient::new(config.request_timeout())?;
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> HistoricalCollector<T> {
    pub fn with_transport(transport: T, config: CollectorConfig) -> Result<Self> {
        let reader = ArchiveReader::with_delimiter(config.delimiter_byte()?);
        let processor = ParallelProcessor::new(config.max_workers);

        Ok(Self {
            transport,
            config,
            reader,
            processor,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collect historical records for every location, in input order.
    /// Locations without any matching archive map to `None`.
    pub fn get(&self, locations: &[String]) -> Result<Vec<LocationRecords>> {
        self.get_with_progress(locations, None)
    }

    pub fn get_with_progress(
        &self,
        locations: &[String],
        progress: Option<&ProgressReporter>,
    ) -> Result<Vec<LocationRecords>> {
        self.processor
            .process_locations(locations, progress, |location| self.process(location))
    }

    pub fn process(&self, location: &str) -> Result<LocationRecords> {
        info!("Getting historical data for {}...", location);
        let urls = self.prepare_urls(location)?;

        let mut collected: LocationRecords = None;
        for url in &urls {
            let content = self.transport.check_url(url)?;

            let Some(mut archive) = self.read_zip(content.body) else {
                warn!("Skipping {}: not a readable zip archive", url);
                continue;
            };

            let Some(records) = self.read_csv(&mut archive) else {
                warn!("Skipping {}: unexpected file layout", url);
                continue;
            };

            let prepared = Self::prepare_data(records, location);
            if prepared.is_empty() {
                debug!("No rows for {} in {}", location, url);
                continue;
            }

            info!("Found {} rows for {} in {}", prepared.len(), location, url);
            match self.config.collect_mode {
                CollectMode::FirstMatch => return Ok(Some(prepared)),
                CollectMode::All => collected.get_or_insert_with(Vec::new).extend(prepared),
            }
        }

        if collected.is_none() {
            info!("No historical data found for {}", location);
        }
        Ok(collected)
    }

    /// Candidate archive URLs for `location` across all configured years
    pub fn prepare_urls(&self, location: &str) -> Result<Vec<String>> {
        let code = station_code(location);
        let base_url = self.config.archive_base_url.trim_end_matches('/');
        let mut files = Vec::new();

        for &year in &self.config.years {
            let index_url = format!("{}/{}", base_url, year);
            let page = self.transport.check_url(&index_url)?;
            let listing = ArchiveListing::parse(&index_url, &page.text())?;

            let layout = self.config.layout_for(year);
            if layout == ListingLayout::StationCode && code.is_none() {
                warn!("No station code for {}, skipping {} listing", location, year);
            }

            let selected = listing.select(layout, code);
            debug!(
                "{}: {} of {} archives selected for {}",
                year,
                selected.len(),
                listing.hrefs().len(),
                location
            );
            files.extend(selected);
        }

        Ok(files)
    }

    pub fn read_zip(&self, content: Vec<u8>) -> Option<Archive> {
        self.reader.read_zip(content)
    }

    pub fn read_csv(&self, archive: &mut Archive) -> Option<Vec<RawRecord>> {
        self.reader.read_csv(archive)
    }

    /// Normalize station names, then keep the rows of `location`
    pub fn prepare_data(records: Vec<RawRecord>, location: &str) -> Vec<HistoricalRecord> {
        records
            .into_iter()
            .map(HistoricalRecord::normalized)
            .filter(|record| record.station_name == location)
            .collect()
    }
}
