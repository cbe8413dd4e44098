//! CSV file data adapter.
//!
//! Reads a `date,open,high,low,close,volume` file with a header row. Rows
//! are returned in ascending date order regardless of file order. A blank
//! volume field is carried as a missing value rather than rejected.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn field<'a>(record: &'a csv::StringRecord, index: usize, name: &str) -> Result<&'a str, SigtraderError> {
        record.get(index).ok_or_else(|| SigtraderError::Data {
            reason: format!("missing {} column", name),
        })
    }

    fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, SigtraderError> {
        Self::field(record, index, name)?
            .trim()
            .parse()
            .map_err(|e| SigtraderError::Data {
                reason: format!("invalid {} value: {}", name, e),
            })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SigtraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| SigtraderError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SigtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = Self::field(&record, 0, "date")?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                SigtraderError::Data {
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if start_date.is_some_and(|start| date < start)
                || end_date.is_some_and(|end| date > end)
            {
                continue;
            }

            let open = Self::parse_price(&record, 1, "open")?;
            let high = Self::parse_price(&record, 2, "high")?;
            let low = Self::parse_price(&record, 3, "low")?;
            let close = Self::parse_price(&record, 4, "close")?;

            let volume_str = Self::field(&record, 5, "volume")?.trim();
            let volume = if volume_str.is_empty() {
                f64::NAN
            } else {
                volume_str.parse().map_err(|e| SigtraderError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?
            };

            bars.push(OhlcvBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }
}
