//! LRC lyric parsing, active-line lookup and the lyric-card catalog.

pub mod catalog;
pub mod config;
pub mod formats;
pub mod model;
pub mod playback;

pub use formats::lrc::{find_active_line_index, parse_lrc};
pub use formats::time::format_elapsed;
pub use model::{LrcMetadata, LyricLine, ParsedLrc};
