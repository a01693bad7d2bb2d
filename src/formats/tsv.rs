use anyhow::{Result, anyhow};
use csv::WriterBuilder;

use crate::{config::Config, formats::time::format_elapsed, model::ParsedLrc};

pub fn write_tsv(p: &ParsedLrc, cfg: &Config) -> Result<String> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(vec![]);

    let cols = &cfg.formats.tsv.columns;
    wtr.write_record(cols)?;

    for (i, line) in p.lines.iter().enumerate() {
        let row: Vec<String> = cols
            .iter()
            .map(|c| value_for_column(c, i, line.time_ms, &line.text))
            .collect();
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().map_err(|e| anyhow!(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}

fn value_for_column(col: &str, index: usize, time_ms: u64, text: &str) -> String {
    match col {
        "index" => index.to_string(),
        "time_ms" => time_ms.to_string(),
        "seconds" => format!("{:.3}", (time_ms as f64) / 1000.0),
        "elapsed" => format_elapsed(i64::try_from(time_ms).unwrap_or(i64::MAX)),
        "text" => text.to_string(),
        _ => String::new(),
    }
}
