use crate::config::ListingLayout;
use crate::error::{CollectorError, Result};
use crate::utils::constants::ARCHIVE_EXTENSION;
use scraper::{Html, Selector};

/// Archive links of one year's directory listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveListing {
    index_url: String,
    hrefs: Vec<String>,
}

impl ArchiveListing {
    /// Parse the anchors of a directory listing, keeping only archive links
    pub fn parse(index_url: &str, html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("a[href]").map_err(|e| {
            CollectorError::InvalidFormat(format!("Invalid anchor selector: {:?}", e))
        })?;

        let suffix = format!(".{}", ARCHIVE_EXTENSION);
        let hrefs = document
            .select(&selector)
            .filter_map(|node| node.value().attr("href"))
            .map(str::trim)
            .filter(|href| href.to_ascii_lowercase().ends_with(&suffix))
            .map(str::to_string)
            .collect();

        Ok(Self {
            index_url: index_url.trim_end_matches('/').to_string(),
            hrefs,
        })
    }

    pub fn hrefs(&self) -> &[String] {
        &self.hrefs
    }

    /// Full URLs of the archives that are candidates under `layout`.
    ///
    /// A station-coded listing yields nothing for a location without a code.
    pub fn select(&self, layout: ListingLayout, station_code: Option<&str>) -> Vec<String> {
        self.hrefs
            .iter()
            .filter(|href| match layout {
                ListingLayout::AllArchives => true,
                ListingLayout::StationCode => {
                    station_code.is_some_and(|code| file_name(href).contains(code))
                }
            })
            .map(|href| self.resolve(href))
            .collect()
    }

    fn resolve(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!(
                "{}/{}",
                self.index_url,
                href.trim_start_matches("./").trim_start_matches('/')
            )
        }
    }
}

fn file_name(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INDEX: &str = "https://example.test/synop/2000";

    fn listing_html() -> &'static str {
        r#"<html><body>
            <a href="?C=N;O=D">Name</a>
            <a href="/data/synop/">Parent Directory</a>
            <a href="2000_205_s.zip">2000_205_s.zip</a>
            <a href="2000_375_s.zip">2000_375_s.zip</a>
            <a href="2000_205_s_t.zip">2000_205_s_t.zip</a>
            <a href="s_t_format.txt">s_t_format.txt</a>
        </body></html>"#
    }

    #[test]
    fn test_parse_keeps_archive_links_only() {
        let listing = ArchiveListing::parse(INDEX, listing_html()).unwrap();
        assert_eq!(
            listing.hrefs(),
            &["2000_205_s.zip", "2000_375_s.zip", "2000_205_s_t.zip"]
        );
    }

    #[test]
    fn test_select_by_station_code() {
        let listing = ArchiveListing::parse(INDEX, listing_html()).unwrap();
        assert_eq!(
            listing.select(ListingLayout::StationCode, Some("205")),
            vec![
                "https://example.test/synop/2000/2000_205_s.zip",
                "https://example.test/synop/2000/2000_205_s_t.zip",
            ]
        );
        assert!(listing
            .select(ListingLayout::StationCode, None)
            .is_empty());
    }

    #[test]
    fn test_select_all_archives() {
        let listing = ArchiveListing::parse(&format!("{INDEX}/"), listing_html()).unwrap();
        let urls = listing.select(ListingLayout::AllArchives, Some("205"));
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[1], "https://example.test/synop/2000/2000_375_s.zip");
    }

    #[test]
    fn test_absolute_links_are_kept() {
        let html = r#"<a href="https://mirror.test/2019_01_s.zip">x</a>"#;
        let listing = ArchiveListing::parse(INDEX, html).unwrap();
        assert_eq!(
            listing.select(ListingLayout::AllArchives, None),
            vec!["https://mirror.test/2019_01_s.zip"]
        );
    }

    #[test]
    fn test_empty_listing() {
        let listing = ArchiveListing::parse(INDEX, "<html></html>").unwrap();
        assert!(listing.hrefs().is_empty());
    }
}
