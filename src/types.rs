use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumType {
    Album,
    Single,
    Compilation,
}

impl std::fmt::Display for AlbumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AlbumType::Album => "album",
            AlbumType::Single => "single",
            AlbumType::Compilation => "compilation",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseDatePrecision {
    Year,
    Month,
    #[default]
    Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
    pub album_type: AlbumType,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: ReleaseDatePrecision,
    #[serde(default)]
    pub total_tracks: Option<u32>,
    #[serde(default)]
    pub estimated_track_count: u32,
}

impl Album {
    pub fn primary_artist(&self) -> Option<&AlbumArtist> {
        self.artists.first()
    }

    /// Release date as a calendar day. Year and month precision dates are
    /// pinned to the first day of the period.
    pub fn release_day(&self) -> Option<NaiveDate> {
        let raw = self.release_date.trim();
        let mut parts = raw.splitn(3, '-');
        let year = parts.next()?.parse::<i32>().ok()?;
        let month = match parts.next() {
            Some(m) => m.parse::<u32>().ok()?,
            None => 1,
        };
        let day = match parts.next() {
            Some(d) => d.parse::<u32>().ok()?,
            None => 1,
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release_day().map(|d| d.year())
    }

    /// Milliseconds since the Unix epoch at midnight UTC of the release day.
    pub fn release_timestamp_ms(&self) -> Option<i64> {
        self.release_day()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp_millis())
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub uri: String,
    #[serde(default, deserialize_with = "lenient_album")]
    pub album: Option<Album>,
    #[serde(default)]
    pub artists: Vec<AlbumArtist>,
    /// Collection the track was observed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

// Local files and unavailable tracks come back with null ids.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// An album we cannot read makes the track unclassifiable, not the whole page
// unreadable.
fn lenient_album<'de, D>(deserializer: D) -> Result<Option<Album>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value::<Album>(value).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiscoveryFilters {
    pub include_singles: bool,
    pub include_compilations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionMode {
    #[default]
    Soft,
    Hard,
}

impl std::fmt::Display for AdmissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdmissionMode::Soft => write!(f, "soft"),
            AdmissionMode::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionResult {
    pub selected_albums: Vec<Album>,
    pub total_tracks: u32,
    pub limit_reached: bool,
    pub excluded_albums: Vec<Album>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuffledTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<AlbumArtist>,
    pub album_id: String,
    pub album_name: String,
    /// Synthetic value in `0..1` for client side sorting. Not an audio feature.
    pub energy: f64,
    pub placeholder: bool,
}

/// Source collection of tracks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    Playlist(String),
    LikedSongs,
}

impl Collection {
    pub fn id(&self) -> &str {
        match self {
            Collection::Playlist(id) => id,
            Collection::LikedSongs => "liked-songs",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Coarse shape of a collection used to tell cached data apart from changed
/// data without fetching every track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    pub id: String,
    pub snapshot_id: Option<String>,
    pub track_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub key: String,
    pub value: T,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumPool {
    pub albums: Vec<Album>,
    pub total_tracks: u32,
}

impl AlbumPool {
    pub fn new(albums: Vec<Album>) -> Self {
        let total_tracks = albums.iter().map(|a| a.estimated_track_count).sum();
        Self {
            albums,
            total_tracks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub name: String,
    pub artists: String,
    #[tabled(rename = "type")]
    pub album_type: String,
    pub date: String,
    pub tracks: u32,
}

impl From<&Album> for AlbumTableRow {
    fn from(album: &Album) -> Self {
        AlbumTableRow {
            name: album.name.clone(),
            artists: album.artist_names(),
            album_type: album.album_type.to_string(),
            date: album.release_date.clone(),
            tracks: album.estimated_track_count,
        }
    }
}

// Spotify Web API payloads.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default, deserialize_with = "lenient_track")]
    pub track: Option<Track>,
}

// Podcast episodes share the playlist item shape but not the track shape.
fn lenient_track<'de, D>(deserializer: D) -> Result<Option<Track>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value::<Track>(value).ok())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistShape {
    pub snapshot_id: Option<String>,
    pub tracks: PlaylistShapeTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistShapeTracks {
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
