use crate::error::{CollectorError, Result};
use crate::models::RawRecord;
use crate::utils::constants::DEFAULT_DELIMITER;
use csv::ReaderBuilder;
use encoding_rs::ISO_8859_2;
use std::io::{Cursor, Read};
use tracing::{debug, error, info};
use zip::ZipArchive;

pub type Archive = ZipArchive<Cursor<Vec<u8>>>;

/// Decodes downloaded synop archives into raw records
pub struct ArchiveReader {
    delimiter: u8,
}

impl ArchiveReader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Open a downloaded payload as a zip archive. Corrupt payloads are
    /// logged and yield `None`.
    pub fn read_zip(&self, content: Vec<u8>) -> Option<Archive> {
        match ZipArchive::new(Cursor::new(content)) {
            Ok(archive) => {
                info!("Extracted zipfile with {} entries.", archive.len());
                Some(archive)
            }
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    /// Parse the first entry of `archive`. Malformed content is logged and
    /// yields `None`.
    pub fn read_csv(&self, archive: &mut Archive) -> Option<Vec<RawRecord>> {
        match self.decode_first_entry(archive) {
            Ok(records) => {
                info!("Loaded {} rows from file.", records.len());
                Some(records)
            }
            Err(e) => {
                error!("{}", e);
                None
            }
        }
    }

    fn decode_first_entry(&self, archive: &mut Archive) -> Result<Vec<RawRecord>> {
        if archive.len() == 0 {
            return Err(CollectorError::InvalidFormat(
                "Archive contains no files".to_string(),
            ));
        }

        let mut entry = archive.by_index(0)?;
        debug!("Reading archive entry {}", entry.name());

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;

        let (text, _, _) = ISO_8859_2.decode(&bytes);
        self.parse_rows(&text)
    }

    /// Parse headerless synop CSV text into raw records
    pub fn parse_rows(&self, text: &str) -> Result<Vec<RawRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            records.push(RawRecord::from_row(&row)?);
        }

        Ok(records)
    }
}

impl Default for ArchiveReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::MIN_ROW_WIDTH;
    use chrono::{NaiveDate, Timelike};
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn synop_line(name: &str, hour: u32) -> String {
        let mut fields: Vec<String> = (0..MIN_ROW_WIDTH).map(|i| format!("{}", i * 10)).collect();
        fields[0] = "352050205".to_string();
        fields[1] = format!("\"{}\"", name);
        fields[2] = "2019".to_string();
        fields[3] = "01".to_string();
        fields[4] = "15".to_string();
        fields[5] = format!("{:02}", hour);
        fields.join(",")
    }

    fn zip_bytes(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn latin2(text: &str) -> Vec<u8> {
        let (bytes, _, _) = ISO_8859_2.encode(text);
        bytes.into_owned()
    }

    #[test]
    fn test_read_zip_rejects_corrupt_payload() {
        let reader = ArchiveReader::new();
        assert!(reader.read_zip(b"definitely not a zip".to_vec()).is_none());
        assert!(reader.read_zip(Vec::new()).is_none());
    }

    #[test]
    fn test_read_csv_decodes_latin2_entry() {
        let text = format!(
            "{}\n{}\n",
            synop_line("WROCŁAW-STRACHOWICE", 0),
            synop_line("KRAKÓW-BALICE", 6)
        );
        let content = zip_bytes(&[("s_t_01_2019.csv", latin2(&text))]);

        let reader = ArchiveReader::new();
        let mut archive = reader.read_zip(content).unwrap();
        let records = reader.read_csv(&mut archive).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].station_name, "WROCŁAW-STRACHOWICE");
        assert_eq!(records[1].station_name, "KRAKÓW-BALICE");
        assert_eq!(
            records[1].datetime.date(),
            NaiveDate::from_ymd_opt(2019, 1, 15).unwrap()
        );
        assert_eq!(records[1].datetime.hour(), 6);
        assert_eq!(records[0].measurements[&48], serde_json::json!(480));
    }

    #[test]
    fn test_read_csv_uses_first_entry_only() {
        let first = format!("{}\n", synop_line("SZCZECIN", 12));
        let content = zip_bytes(&[
            ("s_t_01_2019.csv", latin2(&first)),
            ("s_t_format.txt", b"not,a,synop,row".to_vec()),
        ]);

        let reader = ArchiveReader::new();
        let mut archive = reader.read_zip(content).unwrap();
        let records = reader.read_csv(&mut archive).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_read_csv_short_rows_yield_none() {
        let content = zip_bytes(&[("s_t_01_2019.csv", b"352050205,SZCZECIN,2019,1,1,0\n".to_vec())]);

        let reader = ArchiveReader::new();
        let mut archive = reader.read_zip(content).unwrap();
        assert!(reader.read_csv(&mut archive).is_none());
    }

    #[test]
    fn test_read_csv_empty_archive_yields_none() {
        let content = zip_bytes(&[]);
        let reader = ArchiveReader::new();
        let mut archive = reader.read_zip(content).unwrap();
        assert!(reader.read_csv(&mut archive).is_none());
    }

    #[test]
    fn test_parse_rows_with_semicolon_delimiter() {
        let line = synop_line("LUBLIN-RADAWIEC", 18).replace(',', ";");
        let reader = ArchiveReader::with_delimiter(b';');
        let records = reader.parse_rows(&format!("{line}\n\n")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].station_name, "LUBLIN-RADAWIEC");
    }
}
