use crate::{config::Config, formats::time::format_srt_timestamp, model::ParsedLrc};
use textwrap::wrap;

/// Each lyric line is shown until the next one starts; the last one stays up
/// for `final_line_ms`.
pub fn write_srt(p: &ParsedLrc, cfg: &Config) -> String {
    let srt = &cfg.formats.srt;
    let mut out = String::new();

    for (i, line) in p.lines.iter().enumerate() {
        let start = line.time_ms;
        let end = p
            .lines
            .get(i + 1)
            .map(|next| next.time_ms)
            .unwrap_or_else(|| start.saturating_add(srt.final_line_ms));

        out.push_str(&(i + 1).to_string());
        out.push('\n');

        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(start),
            format_srt_timestamp(end)
        ));

        for row in wrap(line.text.trim(), srt.wrap_width.max(1))
            .into_iter()
            .take(srt.max_lines.max(1))
        {
            out.push_str(&row);
            out.push('\n');
        }

        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::lrc::parse_lrc;

    #[test]
    fn cues_run_until_the_next_line() {
        let p = parse_lrc("[00:01.00]a\n[00:03.50]b");
        let out = write_srt(&p, &Config::default());
        assert_eq!(
            out,
            "1\n00:00:01,000 --> 00:00:03,500\na\n\n2\n00:00:03,500 --> 00:00:07,500\nb\n\n"
        );
    }

    #[test]
    fn long_text_is_wrapped_and_capped() {
        let mut cfg = Config::default();
        cfg.formats.srt.wrap_width = 5;
        cfg.formats.srt.max_lines = 2;
        let p = parse_lrc("[00:00.00]one two three four");
        let out = write_srt(&p, &cfg);
        assert!(out.contains("\none\ntwo\n\n"), "{out}");
        assert!(!out.contains("three"));
    }
}
