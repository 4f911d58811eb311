use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{SeedableRng, rngs::StdRng};
use sha2::{Digest, Sha256};

use crate::{
    shuffle::ShuffleAlgorithm,
    types::{AdmissionMode, Collection},
};

/// URL-safe SHA-256 digest of `input`, usable as a file name.
pub fn digest_key(input: &str) -> String {
    let hash = Sha256::digest(input.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Seeded RNG when a seed is given, OS-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub fn parse_admission_mode(s: &str) -> Result<AdmissionMode, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "soft" => Ok(AdmissionMode::Soft),
        "hard" => Ok(AdmissionMode::Hard),
        "" => Err("admission mode cannot be empty".into()),
        other => Err(format!(
            "invalid value '{}'; expected one of: soft, hard",
            other
        )),
    }
}

/// Never fails: unknown names select `random`.
pub fn parse_algorithm(s: &str) -> Result<ShuffleAlgorithm, String> {
    Ok(ShuffleAlgorithm::from_name(s))
}

/// Accepts a bare playlist id, a `spotify:playlist:<id>` uri or an
/// `open.spotify.com/playlist/<id>` link.
pub fn parse_collection(s: &str) -> Result<Collection, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("playlist cannot be empty".into());
    }
    if s.eq_ignore_ascii_case("liked") || s.eq_ignore_ascii_case("liked-songs") {
        return Ok(Collection::LikedSongs);
    }

    let id = if let Some(rest) = s.strip_prefix("spotify:playlist:") {
        rest
    } else if let Some(pos) = s.find("/playlist/") {
        let rest = &s[pos + "/playlist/".len()..];
        rest.split(['?', '/', '#']).next().unwrap_or(rest)
    } else {
        s
    };

    let valid = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if id.is_empty() || !valid {
        return Err(format!("invalid playlist '{}'", s));
    }

    Ok(Collection::Playlist(id.to_string()))
}
