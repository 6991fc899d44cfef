//! Loaders for saved `histominute`/`histohour`/`histoday` responses and
//! plain CSV files with the same columns.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::Candle;

use super::DataError;

/// One row as the provider sends it.
#[derive(Debug, Deserialize)]
struct RawCandle {
    time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volumefrom: f64,
    #[serde(default)]
    volumeto: f64,
}

impl RawCandle {
    fn into_candle(self, bar_length: i64) -> Candle {
        Candle::new(
            self.open,
            self.high,
            self.low,
            self.close,
            self.volumefrom,
            self.volumeto,
            self.time,
            bar_length,
        )
    }
}

/// Either the full response envelope or just its `Data` array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoPayload {
    Envelope {
        #[serde(rename = "Data")]
        data: Vec<RawCandle>,
    },
    Bare(Vec<RawCandle>),
}

fn read_file(path: &Path) -> Result<String, DataError> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn finish(rows: Vec<RawCandle>, bar_length: i64) -> Result<Vec<Candle>, DataError> {
    if rows.is_empty() {
        return Err(DataError::Empty);
    }
    let mut candles: Vec<Candle> = rows.into_iter().map(|r| r.into_candle(bar_length)).collect();
    candles.sort_by_key(|c| c.open_time);
    candles.dedup_by_key(|c| c.open_time);
    debug!(candles = candles.len(), bar_length, "loaded candles");
    Ok(candles)
}

/// Parse a histo response body into chronologically ordered candles.
pub fn parse_histo_json(body: &str, bar_length: i64) -> Result<Vec<Candle>, DataError> {
    let rows = match serde_json::from_str::<HistoPayload>(body)? {
        HistoPayload::Envelope { data } => data,
        HistoPayload::Bare(data) => data,
    };
    finish(rows, bar_length)
}

pub fn load_histo_json(path: &Path, bar_length: i64) -> Result<Vec<Candle>, DataError> {
    parse_histo_json(&read_file(path)?, bar_length)
}

/// Parse CSV with header `time,open,high,low,close,volumefrom,volumeto`.
/// The volume columns may be omitted.
pub fn parse_csv<R: Read>(reader: R, bar_length: i64) -> Result<Vec<Candle>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = rdr
        .deserialize::<RawCandle>()
        .collect::<Result<Vec<_>, _>>()?;
    finish(rows, bar_length)
}

pub fn load_csv(path: &Path, bar_length: i64) -> Result<Vec<Candle>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv(file, bar_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVELOPE: &str = r#"{
        "Response": "Success",
        "Data": [
            {"time": 1530003600, "open": 6100.5, "high": 6150.0, "low": 6080.0, "close": 6120.0,
             "volumefrom": 812.3, "volumeto": 4970000.1},
            {"time": 1530000000, "open": 6090.0, "high": 6110.0, "low": 6050.0, "close": 6100.5,
             "volumefrom": 700.0, "volumeto": 4260000.0}
        ]
    }"#;

    #[test]
    fn parses_envelope_and_sorts_by_time() {
        let candles = parse_histo_json(ENVELOPE, 3600).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open_time, 1_530_000_000);
        assert_eq!(candles[1].close, 6120.0);
        assert_eq!(candles[1].volume_from, 812.3);
        assert!(candles.iter().all(|c| c.length == 3600));
    }

    #[test]
    fn parses_bare_array() {
        let body = r#"[{"time": 60, "open": 1, "high": 2, "low": 0.5, "close": 1.5}]"#;
        let candles = parse_histo_json(body, 60).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].volume_to, 0.0);
    }

    #[test]
    fn empty_data_is_an_error() {
        assert!(matches!(
            parse_histo_json(r#"{"Data": []}"#, 60),
            Err(DataError::Empty)
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_histo_json(r#"{"Data": [{"time": "soon"}]}"#, 60),
            Err(DataError::Json(_))
        ));
    }

    #[test]
    fn duplicate_timestamps_collapse() {
        let body = r#"[
            {"time": 60, "open": 1, "high": 2, "low": 0.5, "close": 1.5},
            {"time": 60, "open": 1, "high": 2, "low": 0.5, "close": 1.5},
            {"time": 120, "open": 1.5, "high": 2, "low": 1, "close": 1.8}
        ]"#;
        assert_eq!(parse_histo_json(body, 60).unwrap().len(), 2);
    }

    #[test]
    fn parses_csv() {
        let body = "time,open,high,low,close,volumefrom,volumeto\n\
                    0,10,11,9,10.5,1,10\n\
                    60,10.5,12,10,11.5,2,23\n";
        let candles = parse_csv(body.as_bytes(), 60).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[1].high, 12.0);
        assert_eq!(candles[1].volume_to, 23.0);
    }

    #[test]
    fn csv_without_rows_is_empty() {
        let body = "time,open,high,low,close,volumefrom,volumeto\n";
        assert!(matches!(parse_csv(body.as_bytes(), 60), Err(DataError::Empty)));
    }
}
