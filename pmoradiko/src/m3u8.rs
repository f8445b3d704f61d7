//! Media URI extraction from time-shift playlist bodies
//!
//! The playlist endpoint answers with an HLS master playlist whose variant
//! points at the chunk list of the requested program:
//!
//! ```text
//! #EXTM3U
//! #EXT-X-VERSION:6
//! #EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=52973,CODECS="mp4a.40.5"
//! https://radiko.jp/v2/api/ts/chunklist/NejwhFyQ.m3u8
//! ```

use crate::error::{Error, Result};
use m3u8_rs::Playlist;
use tracing::debug;

/// Extract the media URI referenced by a playlist body
///
/// Master playlists yield their first variant; media playlists their first
/// segment. A body that is not a playlist, or one that references nothing,
/// is a parsing error.
pub fn uri_from_m3u8(body: &[u8]) -> Result<String> {
    let playlist = m3u8_rs::parse_playlist_res(body)
        .map_err(|e| Error::playlist(format!("body is not an M3U8 playlist: {e:?}")))?;

    let uri = match playlist {
        Playlist::MasterPlaylist(master) => master.variants.into_iter().map(|v| v.uri).next(),
        Playlist::MediaPlaylist(media) => media.segments.into_iter().map(|s| s.uri).next(),
    };

    match uri.map(|u| u.trim().to_string()) {
        Some(uri) if !uri.is_empty() => {
            debug!("Playlist references {}", uri);
            Ok(uri)
        }
        _ => Err(Error::playlist("playlist references no media URI")),
    }
}
