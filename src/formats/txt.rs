use crate::{config::Config, formats::time::format_elapsed, model::ParsedLrc};

pub fn write_txt(p: &ParsedLrc, cfg: &Config) -> String {
    let text_only = cfg.formats.txt.mode.eq_ignore_ascii_case("text_only");
    let mut out = String::new();

    for line in &p.lines {
        if !text_only {
            let elapsed = format_elapsed(i64::try_from(line.time_ms).unwrap_or(i64::MAX));
            out.push_str(&format!("[{elapsed}] "));
        }
        out.push_str(line.text.trim());
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::lrc::parse_lrc;

    #[test]
    fn elapsed_mode() {
        let p = parse_lrc("[00:01.00]a\n[01:05.99]b");
        assert_eq!(write_txt(&p, &Config::default()), "[0:01] a\n[1:05] b\n");
    }

    #[test]
    fn text_only_mode() {
        let mut cfg = Config::default();
        cfg.formats.txt.mode = "text_only".to_string();
        let p = parse_lrc("[00:01.00]a\n[00:02.00]b");
        assert_eq!(write_txt(&p, &cfg), "a\nb\n");
    }
}
