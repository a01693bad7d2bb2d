use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path};

use lrc_card::{
    catalog::Catalog,
    config::Config,
    formats::{self, lrc::parse_lrc, time::format_elapsed, time::parse_time_to_ms},
    model::ParsedLrc,
    playback::Playback,
};

use crate::cli::{CatalogAction, CatalogCmd, Format, LookupCmd, ParseCmd, PlayCmd};

pub fn run_parse(cmd: ParseCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("parse", input = cmd.input.as_str(), to = ?cmd.to);
    let _g = span.enter();

    let parsed = load_lrc(&cmd.input, cfg)?;
    let rendered = render_any(&parsed, cmd.to, cfg)?;

    if cmd.stdout {
        print!("{rendered}");
        tracing::info!(mode = "stdout", "wrote output");
        return Ok(());
    }

    let out_path = derive_output_path(&cmd)?;
    write_output(&out_path, &rendered, cmd.overwrite)?;
    tracing::info!(path = out_path.as_str(), "wrote output file");

    Ok(())
}

pub fn run_lookup(cmd: LookupCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("lookup", input = cmd.input.as_str(), at = cmd.at.as_str());
    let _g = span.enter();

    let parsed = load_lrc(&cmd.input, cfg)?;
    let at_ms = parse_time_to_ms(&cmd.at)?;

    println!("{}", describe_active(&parsed, at_ms));
    Ok(())
}

pub fn run_play(cmd: PlayCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("play", input = cmd.input.as_str(), realtime = cmd.realtime);
    let _g = span.enter();

    let (parsed, known_duration_ms) = match &cmd.catalog {
        Some(db) => {
            let catalog = Catalog::load(db)?;
            let song = catalog
                .find_song(&cmd.input)
                .ok_or_else(|| anyhow!("song not found in catalog: {}", cmd.input))?;
            tracing::info!(song = song.name.as_str(), artist = song.artist_name.as_str(), "playing catalog song");
            let parsed = prepare(parse_lrc(&song.lyric_raw), cfg);
            (parsed, Some(song.duration_ms(cfg.playback.default_duration_sec)))
        }
        None => (load_lrc(&cmd.input, cfg)?, None),
    };

    let duration_ms = play_duration_ms(&parsed, cmd.duration_sec, known_duration_ms, cfg);

    if parsed.is_empty() {
        tracing::warn!("no timed lyrics to play");
        println!("(no lyrics)");
        return Ok(());
    }

    let mut playback = Playback::new(&parsed.lines, duration_ms);
    if let Some(from) = &cmd.from {
        let from_ms = parse_time_to_ms(from)?;
        playback.seek_by(from_ms);
    }

    tracing::info!(
        duration = format_elapsed(i64::try_from(playback.duration_ms()).unwrap_or(i64::MAX)).as_str(),
        start_ms = playback.position_ms(),
        "playback started"
    );

    playback.run_to_end(cfg.playback.tick_ms, cmd.realtime, |change, line| {
        let at = format_elapsed(i64::try_from(change.at_ms).unwrap_or(i64::MAX));
        match line {
            Some(l) => println!("[{at}] {}", l.text),
            None => println!("[{at}]"),
        }
    });

    tracing::info!("playback finished");
    Ok(())
}

pub fn run_catalog(cmd: CatalogCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("catalog", db = %cmd.db.display());
    let _g = span.enter();

    let catalog = Catalog::load(&cmd.db)?;

    match cmd.action {
        CatalogAction::Artists => {
            for a in catalog.artists() {
                println!("{}\t{}\t{}", a.id, a.name, a.song_count);
            }
        }
        CatalogAction::Songs { artist_id } => {
            let songs = catalog
                .songs_for_artist(&artist_id)
                .ok_or_else(|| anyhow!("artist not found in catalog: {artist_id}"))?;
            for s in songs {
                let duration = format_elapsed(
                    i64::try_from(s.duration_ms(cfg.playback.default_duration_sec)).unwrap_or(i64::MAX),
                );
                println!("{}\t{}\t{}\t{}", s.id, s.name, s.album_name, duration);
            }
        }
        CatalogAction::Lyrics { song_id, to } => {
            let song = catalog
                .find_song(&song_id)
                .ok_or_else(|| anyhow!("song not found in catalog: {song_id}"))?;
            let parsed = prepare(parse_lrc(&song.lyric_raw), cfg);
            log_lyrics_summary(&parsed, cfg);
            print!("{}", render_any(&parsed, to, cfg)?);
        }
    }

    Ok(())
}

fn load_lrc(input: &str, cfg: &Config) -> Result<ParsedLrc> {
    let raw = read_input_to_string(input)?;
    tracing::info!(bytes = raw.len(), "read input");

    let parsed = prepare(parse_lrc(&raw), cfg);
    log_lyrics_summary(&parsed, cfg);
    Ok(parsed)
}

fn read_input_to_string(input: &str) -> Result<String> {
    if input == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed reading stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed reading input: {input}"))
    }
}

fn prepare(mut parsed: ParsedLrc, cfg: &Config) -> ParsedLrc {
    apply_policies(&mut parsed, cfg);
    parsed
}

fn apply_policies(p: &mut ParsedLrc, cfg: &Config) {
    let span = tracing::debug_span!("apply_policies");
    let _g = span.enter();

    if cfg.lyrics.normalize_whitespace {
        for line in &mut p.lines {
            line.text = normalize_ws(&line.text);
        }
    }

    if cfg.lyrics.extra_offset_ms != 0 {
        tracing::debug!(extra_offset_ms = cfg.lyrics.extra_offset_ms, "shifting lines");
        p.shift(cfg.lyrics.extra_offset_ms);
    }
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Explicit length wins, then the catalog's, then the configured default
/// stretched to reach the last line.
fn play_duration_ms(p: &ParsedLrc, cli_sec: Option<u64>, known_ms: Option<u64>, cfg: &Config) -> u64 {
    if let Some(sec) = cli_sec {
        return sec.saturating_mul(1_000);
    }
    if let Some(ms) = known_ms {
        return ms;
    }
    cfg.playback
        .default_duration_sec
        .saturating_mul(1_000)
        .max(p.last_time_ms())
}

fn describe_active(p: &ParsedLrc, at_ms: i64) -> String {
    match p.active_index(at_ms) {
        Some(i) => {
            let line = &p.lines[i];
            let at = format_elapsed(i64::try_from(line.time_ms).unwrap_or(i64::MAX));
            format!("{i}\t{at}\t{}", line.text)
        }
        None => "-1".to_string(),
    }
}

fn log_lyrics_summary(p: &ParsedLrc, cfg: &Config) {
    tracing::info!(
        lines = p.lines.len(),
        last_ms = p.last_time_ms(),
        title = p.metadata.title.as_deref().unwrap_or(""),
        artist = p.metadata.artist.as_deref().unwrap_or(""),
        "lyrics summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let n = cfg.logging.debug_line_samples.min(p.lines.len());
        for (i, l) in p.lines.iter().take(n).enumerate() {
            tracing::debug!(
                idx = i,
                time_ms = l.time_ms,
                chars = l.text.chars().count(),
                "line sample"
            );
        }
    }
}

fn render_any(p: &ParsedLrc, fmt: Format, cfg: &Config) -> Result<String> {
    match fmt {
        Format::Json => formats::json::write_json(
            p,
            cfg.formats.json.time_units.as_str(),
            cfg.formats.json.wrapped,
        ),
        Format::Tsv => formats::tsv::write_tsv(p, cfg),
        Format::Txt => Ok(formats::txt::write_txt(p, cfg)),
        Format::Srt => Ok(formats::srt::write_srt(p, cfg)),
        Format::Lrc => Ok(formats::lrc::write_lrc(p)),
    }
}

fn derive_output_path(cmd: &ParseCmd) -> Result<String> {
    if let Some(o) = &cmd.output {
        return Ok(o.clone());
    }

    if cmd.input == "-" {
        return Err(anyhow!(
            "output path required when input is stdin and --stdout is not set"
        ));
    }

    let p = Path::new(&cmd.input);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("bad input filename"))?;

    let parent = p.parent().unwrap_or_else(|| Path::new("."));
    let out = parent.join(format!("{stem}.{}", cmd.to.extension()));
    Ok(out.to_string_lossy().to_string())
}

fn write_output(path: &str, data: &str, overwrite: bool) -> Result<()> {
    if Path::new(path).exists() && !overwrite {
        return Err(anyhow!(
            "refusing to overwrite existing file (pass --overwrite): {path}"
        ));
    }
    fs::write(path, data).with_context(|| format!("failed writing output: {path}"))?;
    Ok(())
}
