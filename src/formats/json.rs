use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::model::{LrcMetadata, ParsedLrc};

#[derive(Debug, Clone, Serialize)]
pub struct WrappedJson<'a> {
    pub schema: &'static str,
    pub version: u32,
    pub metadata: &'a LrcMetadata,
    pub lines: Vec<JsonLine<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonLine<'a> {
    pub time: Value,
    pub text: &'a str,
}

/// Render a parsed file. The unwrapped millisecond form is the same shape the
/// card UI caches (`{"metadata": .., "lines": [{"timeMs", "text"}]}`).
pub fn write_json(p: &ParsedLrc, cfg_time_units: &str, wrapped: bool) -> Result<String> {
    if !wrapped && cfg_time_units == "ms" {
        return Ok(serde_json::to_string_pretty(p)?);
    }

    let lines: Vec<JsonLine<'_>> = p
        .lines
        .iter()
        .map(|l| JsonLine {
            time: encode_time(l.time_ms, cfg_time_units),
            text: l.text.as_str(),
        })
        .collect();

    if wrapped {
        let w = WrappedJson {
            schema: "lrc-card.lyrics",
            version: 1,
            metadata: &p.metadata,
            lines,
        };
        Ok(serde_json::to_string_pretty(&w)?)
    } else {
        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "metadata": &p.metadata,
            "lines": lines,
        }))?)
    }
}

fn encode_time(ms: u64, units: &str) -> Value {
    match units {
        "ms" => Value::from(ms),
        _ => Value::from((ms as f64) / 1000.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::lrc::parse_lrc;

    #[test]
    fn plain_ms_output_deserializes_back() {
        let p = parse_lrc("[ti:T]\n[00:01.00]a\n[00:02.50]b");
        let s = write_json(&p, "ms", false).unwrap();
        let back: ParsedLrc = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn wrapped_seconds_output() {
        let p = parse_lrc("[ar:A]\n[00:02.50]b");
        let s = write_json(&p, "seconds", true).unwrap();
        let v: Value = serde_json::from_str(&s).unwrap();
        assert_eq!(v["schema"], "lrc-card.lyrics");
        assert_eq!(v["version"], 1);
        assert_eq!(v["metadata"]["artist"], "A");
        assert_eq!(v["lines"][0]["time"], 2.5);
        assert_eq!(v["lines"][0]["text"], "b");
    }
}
