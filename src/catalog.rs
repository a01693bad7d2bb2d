//! Song database the lyric cards are built from.
//!
//! The on-disk shape (`db.json`) groups songs per singer. Cards work with the
//! flattened [`Artist`] and [`Song`] views.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbRoot {
    #[serde(default)]
    pub latest_update: i64,
    #[serde(default)]
    pub list: Vec<DbEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbEntry {
    pub singer: DbSinger,
    #[serde(default)]
    pub song_list: Vec<DbSong>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbSinger {
    pub id: u64,
    #[serde(default)]
    pub mid: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbSong {
    pub songid: u64,
    #[serde(default)]
    pub songmid: String,
    pub songname: String,
    #[serde(default)]
    pub albumname: String,
    #[serde(default)]
    pub singer: Vec<DbSinger>,
    /// Duration in seconds; 0 when unknown.
    #[serde(default)]
    pub interval: u64,
    #[serde(default)]
    pub lyric: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub song_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub album_name: String,
    pub artist_name: String,
    pub duration_sec: u64,
    pub lyric_raw: String,
}

impl Song {
    fn from_db(song: &DbSong, entry: &DbEntry) -> Self {
        Self {
            id: song.songid.to_string(),
            name: song.songname.clone(),
            album_name: song.albumname.clone(),
            artist_name: entry.singer.name.clone(),
            duration_sec: song.interval,
            lyric_raw: song.lyric.clone(),
        }
    }

    /// Playback length, falling back to `default_sec` when the catalog does
    /// not know it.
    pub fn duration_ms(&self, default_sec: u64) -> u64 {
        let sec = if self.duration_sec == 0 {
            default_sec
        } else {
            self.duration_sec
        };
        sec.saturating_mul(1_000)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: DbRoot,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading catalog: {}", path.display()))?;
        let catalog = Self::from_json_str(&raw)
            .with_context(|| format!("failed parsing catalog JSON: {}", path.display()))?;

        tracing::info!(
            artists = catalog.root.list.len(),
            latest_update = catalog.root.latest_update,
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let root: DbRoot = serde_json::from_str(raw)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &DbRoot {
        &self.root
    }

    pub fn artists(&self) -> Vec<Artist> {
        self.root
            .list
            .iter()
            .map(|entry| Artist {
                id: entry.singer.id.to_string(),
                name: entry.singer.name.clone(),
                song_count: entry.song_list.len(),
            })
            .collect()
    }

    /// Songs of one artist in catalog order, or `None` for an unknown id.
    pub fn songs_for_artist(&self, artist_id: &str) -> Option<Vec<Song>> {
        let entry = self
            .root
            .list
            .iter()
            .find(|e| e.singer.id.to_string() == artist_id)?;

        Some(
            entry
                .song_list
                .iter()
                .map(|s| Song::from_db(s, entry))
                .collect(),
        )
    }

    /// First song with this id across all artists.
    pub fn find_song(&self, song_id: &str) -> Option<Song> {
        self.root.list.iter().find_map(|entry| {
            entry
                .song_list
                .iter()
                .find(|s| s.songid.to_string() == song_id)
                .map(|s| Song::from_db(s, entry))
        })
    }
}
