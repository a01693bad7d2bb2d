use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    formats::time::{format_lrc_timestamp, parse_lrc_timestamp},
    model::{LrcMetadata, LyricLine, ParsedLrc, shift_ms},
};

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]").expect("tag pattern is valid"));

static META_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z][a-zA-Z0-9_-]*):(.*)$").expect("metadata pattern is valid")
});

struct Candidate {
    time_ms: u64,
    text: String,
    seq: usize,
}

/// Parse LRC text. Malformed rows and tags are dropped, never reported, so
/// this always returns a value (possibly with no lines).
pub fn parse_lrc(raw: &str) -> ParsedLrc {
    let mut metadata = LrcMetadata::default();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut seq = 0usize;

    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    for row in normalized.split('\n') {
        if row.is_empty() {
            continue;
        }

        let tags: Vec<&str> = TAG_RE
            .captures_iter(row)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        if tags.is_empty() {
            continue;
        }

        for tag in &tags {
            apply_metadata(&mut metadata, tag);
        }

        let times: Vec<u64> = tags.iter().filter_map(|t| parse_lrc_timestamp(t)).collect();
        if times.is_empty() {
            continue;
        }

        let stripped = TAG_RE.replace_all(row, "");
        let text = trim_text(&stripped);
        if text.is_empty() {
            continue;
        }

        for time_ms in times {
            candidates.push(Candidate {
                time_ms,
                text: text.to_string(),
                seq,
            });
            seq += 1;
        }
    }

    let offset = metadata.offset_ms.unwrap_or(0);
    for c in &mut candidates {
        c.time_ms = shift_ms(c.time_ms, offset);
    }
    candidates.sort_by(|a, b| a.time_ms.cmp(&b.time_ms).then(a.seq.cmp(&b.seq)));

    let lines: Vec<LyricLine> = candidates
        .into_iter()
        .map(|c| LyricLine {
            time_ms: c.time_ms,
            text: c.text,
        })
        .collect();

    tracing::debug!(
        lines = lines.len(),
        offset_ms = offset,
        has_title = metadata.title.is_some(),
        "parsed lrc"
    );

    ParsedLrc { metadata, lines }
}

fn apply_metadata(metadata: &mut LrcMetadata, tag: &str) {
    let Some(caps) = META_RE.captures(tag.trim()) else {
        return;
    };

    let key = caps[1].to_ascii_lowercase();
    let value = caps[2].trim();

    match key.as_str() {
        "ti" => metadata.title = Some(value.to_string()),
        "ar" => metadata.artist = Some(value.to_string()),
        "al" => metadata.album = Some(value.to_string()),
        "offset" => match parse_offset(value) {
            Some(ms) => metadata.offset_ms = Some(ms),
            None => tracing::trace!(value, "ignoring unparsable offset"),
        },
        _ => tracing::trace!(key = key.as_str(), "ignoring metadata tag"),
    }
}

/// Numeric offset in milliseconds. Integers are taken as is, finite decimals
/// are rounded and an empty value counts as zero.
fn parse_offset(value: &str) -> Option<i64> {
    if value.is_empty() {
        return Some(0);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(|f| f.round() as i64)
}

fn trim_text(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Index of the last line whose timestamp is at or before `time_ms`, or
/// `None` before the first line. On duplicate timestamps the last of them
/// wins. `lines` must be sorted by `time_ms`.
pub fn find_active_line_index(lines: &[LyricLine], time_ms: i64) -> Option<usize> {
    if time_ms < 0 {
        return None;
    }
    let t = time_ms as u64;
    lines.partition_point(|l| l.time_ms <= t).checked_sub(1)
}

/// Render normalized LRC: known metadata tags followed by one timed row per
/// line. The offset is already folded into the timestamps.
pub fn write_lrc(parsed: &ParsedLrc) -> String {
    let mut out = String::new();

    let header = [
        ("ti", parsed.metadata.title.as_deref()),
        ("ar", parsed.metadata.artist.as_deref()),
        ("al", parsed.metadata.album.as_deref()),
    ];
    for (key, value) in header {
        if let Some(v) = value {
            out.push_str(&format!("[{key}:{v}]\n"));
        }
    }

    for line in &parsed.lines {
        out.push_str(&format!("[{}]{}\n", format_lrc_timestamp(line.time_ms), line.text));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(p: &ParsedLrc) -> Vec<u64> {
        p.lines.iter().map(|l| l.time_ms).collect()
    }

    #[test]
    fn parses_basic_rows_and_looks_up() {
        let p = parse_lrc("[00:01.00]a\n[00:02.00]b");
        assert_eq!(
            p.lines,
            vec![LyricLine::new(1_000, "a"), LyricLine::new(2_000, "b")]
        );
        assert_eq!(find_active_line_index(&p.lines, 1_500), Some(0));
    }

    #[test]
    fn offset_shifts_lines() {
        let p = parse_lrc("[offset:1000]\n[00:00.00]x");
        assert_eq!(p.lines, vec![LyricLine::new(1_000, "x")]);
        assert_eq!(p.metadata.offset_ms, Some(1_000));
    }

    #[test]
    fn negative_offset_clamps_to_zero() {
        let p = parse_lrc("[offset:-1500]\n[00:01.00]a\n[00:03.00]b");
        assert_eq!(times(&p), vec![0, 1_500]);
    }

    #[test]
    fn offset_applies_regardless_of_position_and_last_wins() {
        let p = parse_lrc("[00:01.00]a\n[offset:100]\n[offset:250]\n[offset:oops]");
        assert_eq!(p.metadata.offset_ms, Some(250));
        assert_eq!(times(&p), vec![1_250]);
    }

    #[test]
    fn fractional_and_empty_offsets() {
        assert_eq!(parse_lrc("[offset:12.6]").metadata.offset_ms, Some(13));
        assert_eq!(parse_lrc("[offset:]").metadata.offset_ms, Some(0));
        assert_eq!(parse_lrc("[offset:NaN]").metadata.offset_ms, None);
    }

    #[test]
    fn tag_with_empty_text_yields_nothing() {
        assert!(parse_lrc("[00:05.00]").lines.is_empty());
        assert!(parse_lrc("[00:05.00]   \t").lines.is_empty());
    }

    #[test]
    fn multiple_time_tags_share_text() {
        let p = parse_lrc("[00:01.00][00:03.00]dup");
        assert_eq!(
            p.lines,
            vec![LyricLine::new(1_000, "dup"), LyricLine::new(3_000, "dup")]
        );
    }

    #[test]
    fn repeated_chorus_is_interleaved_in_time_order() {
        let raw = "[00:10.00][00:30.00]chorus\n[00:20.00]verse\n[00:40.00]outro";
        let p = parse_lrc(raw);
        let texts: Vec<&str> = p.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["chorus", "verse", "chorus", "outro"]);
    }

    #[test]
    fn equal_timestamps_keep_source_order() {
        let p = parse_lrc("[00:05.00]first\n[00:01.00]early\n[00:05.00]second\n[00:05.00]third");
        let texts: Vec<&str> = p.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["early", "first", "second", "third"]);
    }

    #[test]
    fn metadata_keys_are_case_insensitive_and_trimmed() {
        let p = parse_lrc("[TI: Song Title ]\n[Ar:Artist Name]\n[al:Album]\n[by:someone]\n[length:03:20]");
        assert_eq!(p.metadata.title.as_deref(), Some("Song Title"));
        assert_eq!(p.metadata.artist.as_deref(), Some("Artist Name"));
        assert_eq!(p.metadata.album.as_deref(), Some("Album"));
        assert!(p.lines.is_empty());
    }

    #[test]
    fn metadata_tag_on_a_timed_row_counts_for_both() {
        let p = parse_lrc("[ar:Someone][00:02.00]hello");
        assert_eq!(p.metadata.artist.as_deref(), Some("Someone"));
        assert_eq!(p.lines, vec![LyricLine::new(2_000, "hello")]);
    }

    #[test]
    fn unknown_and_malformed_tags_are_inert() {
        let p = parse_lrc("[00:01.00][??]a\n[xx:yy]b\n[00:02.00]mid [note] text\nplain row\n[1:2:3]c");
        assert_eq!(
            p.lines,
            vec![LyricLine::new(1_000, "a"), LyricLine::new(2_000, "mid  text")]
        );
    }

    #[test]
    fn line_endings_are_normalized() {
        let p = parse_lrc("[00:01.00]a\r\n[00:02.00]b\r[00:03.00]c\n\n");
        assert_eq!(times(&p), vec![1_000, 2_000, 3_000]);
        assert_eq!(p.lines[0].text, "a");
    }

    #[test]
    fn byte_order_mark_is_not_text() {
        let p = parse_lrc("\u{feff}[00:01.00]a");
        assert_eq!(p.lines, vec![LyricLine::new(1_000, "a")]);
    }

    #[test]
    fn empty_and_garbage_input() {
        assert_eq!(parse_lrc(""), ParsedLrc::default());
        assert_eq!(parse_lrc("no tags here\nat all"), ParsedLrc::default());
    }

    #[test]
    fn parse_is_deterministic() {
        let raw = "[ti:x]\n[00:03.00]c\n[00:01.00][00:02.00]ab";
        assert_eq!(parse_lrc(raw), parse_lrc(raw));
    }

    #[test]
    fn lookup_edges() {
        let lines = vec![
            LyricLine::new(1_000, "a"),
            LyricLine::new(2_000, "b"),
            LyricLine::new(3_000, "c"),
        ];
        assert_eq!(find_active_line_index(&[], 5_000), None);
        assert_eq!(find_active_line_index(&lines, 999), None);
        assert_eq!(find_active_line_index(&lines, -1), None);
        for (i, l) in lines.iter().enumerate() {
            assert_eq!(find_active_line_index(&lines, l.time_ms as i64), Some(i));
        }
        assert_eq!(find_active_line_index(&lines, 3_000), Some(2));
        assert_eq!(find_active_line_index(&lines, i64::MAX), Some(2));
    }

    #[test]
    fn lookup_on_duplicate_timestamps_picks_the_last() {
        let lines = vec![
            LyricLine::new(1_000, "a"),
            LyricLine::new(2_000, "b1"),
            LyricLine::new(2_000, "b2"),
            LyricLine::new(2_000, "b3"),
            LyricLine::new(3_000, "c"),
        ];
        assert_eq!(find_active_line_index(&lines, 1_999), Some(0));
        assert_eq!(find_active_line_index(&lines, 2_000), Some(3));
        assert_eq!(find_active_line_index(&lines, 2_500), Some(3));
    }

    #[test]
    fn writes_normalized_lrc_that_parses_back() {
        let p = parse_lrc("[ar:A][ti:T]\n[offset:500]\n[00:01.00][00:03.00]x\n[00:02.00]y");
        let out = write_lrc(&p);
        assert_eq!(
            out,
            "[ti:T]\n[ar:A]\n[00:01.50]x\n[00:02.50]y\n[00:03.50]x\n"
        );
        let again = parse_lrc(&out);
        assert_eq!(again.lines, p.lines);
        assert_eq!(again.metadata.offset_ms, None);
    }
}
