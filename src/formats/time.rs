use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+):([0-9]{1,2})(?:\.([0-9]{1,3}))?$").expect("time tag pattern is valid")
});

/// Parse the inside of an LRC time tag (`mm:ss`, `mm:ss.f`, `mm:ss.ff`,
/// `mm:ss.fff`) into milliseconds. Anything else, including values that
/// overflow, yields `None`.
pub fn parse_lrc_timestamp(tag: &str) -> Option<u64> {
    let caps = TIME_TAG_RE.captures(tag.trim())?;

    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: u64 = caps[2].parse().ok()?;

    let frac_ms = match caps.get(3).map(|m| m.as_str()) {
        None => 0,
        Some(frac) => {
            let n: u64 = frac.parse().ok()?;
            match frac.len() {
                3 => n,
                2 => n * 10,
                _ => n * 100,
            }
        }
    };

    minutes
        .checked_mul(60_000)?
        .checked_add(seconds * 1_000)?
        .checked_add(frac_ms)
}

/// `mm:ss.xx` as written in LRC files; sub-centisecond precision is dropped.
pub fn format_lrc_timestamp(ms: u64) -> String {
    let centis = (ms % 1_000) / 10;
    let total_seconds = ms / 1_000;
    let sec = total_seconds % 60;
    let min = total_seconds / 60;
    format!("{min:02}:{sec:02}.{centis:02}")
}

/// Elapsed clock as shown on a lyric card: `m:ss`, truncated to the second.
pub fn format_elapsed(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1_000;
    let min = total_seconds / 60;
    let sec = total_seconds % 60;
    format!("{min}:{sec:02}")
}

pub fn format_srt_timestamp(ms: u64) -> String {
    let milli = ms % 1_000;
    let total_seconds = ms / 1_000;
    let sec = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let min = total_minutes % 60;
    let hour = total_minutes / 60;

    format!("{hour:02}:{min:02}:{sec:02},{milli:03}")
}

/// Parse a user supplied position: plain milliseconds (`65000`) or a clock
/// value in the LRC grammar (`1:05`, `01:05.5`).
pub fn parse_time_to_ms(s: &str) -> Result<i64> {
    let t = s.trim();

    if let Ok(v) = t.parse::<i64>() {
        return Ok(v);
    }

    let ms = parse_lrc_timestamp(t).ok_or_else(|| anyhow!("unrecognized time: '{t}'"))?;
    i64::try_from(ms).map_err(|_| anyhow!("time out of range: '{t}'"))
}
