use std::cmp::Ordering;

use rand::Rng;

use crate::types::Album;

// Floor for year weights so that albums without a usable year, or released
// after the pivot, still take part in the draw.
const MIN_WEIGHT: f64 = 1.0;

/// Weighted random order biased towards newer (`prefer_newer`) or older
/// releases.
///
/// Each album draws one key `weight * u` with `u` uniform in `0..1` and the
/// albums are sorted by key, largest first. The weight is the release year
/// for newer-first and `pivot_year - year` for older-first.
pub fn weighted_by_year<R>(
    albums: &[Album],
    prefer_newer: bool,
    pivot_year: i32,
    rng: &mut R,
) -> Vec<Album>
where
    R: Rng + ?Sized,
{
    let keys: Vec<f64> = albums
        .iter()
        .map(|album| {
            let weight = match album.release_year() {
                Some(year) if prefer_newer => year as f64,
                Some(year) => (pivot_year - year) as f64,
                None => MIN_WEIGHT,
            };
            weight.max(MIN_WEIGHT) * rng.random::<f64>()
        })
        .collect();

    sort_by_keys_descending(albums, &keys)
}

/// Mostly newest-first order with local noise: every release timestamp is
/// scaled by `1 + r` where `r` is uniform in `-jitter..=jitter`.
///
/// Albums without a usable release date always sort last, behind releases
/// from before 1970.
pub fn chronological<R>(albums: &[Album], jitter: f64, rng: &mut R) -> Vec<Album>
where
    R: Rng + ?Sized,
{
    let keys: Vec<f64> = albums
        .iter()
        .map(|album| {
            let factor = if jitter > 0.0 {
                rng.random_range(-jitter..=jitter)
            } else {
                0.0
            };
            match album.release_timestamp_ms() {
                Some(timestamp) => timestamp as f64 * (1.0 + factor),
                None => f64::NEG_INFINITY,
            }
        })
        .collect();

    sort_by_keys_descending(albums, &keys)
}

fn sort_by_keys_descending(albums: &[Album], keys: &[f64]) -> Vec<Album> {
    let mut indices: Vec<usize> = (0..albums.len()).collect();
    indices.sort_by(|&a, &b| keys[b].partial_cmp(&keys[a]).unwrap_or(Ordering::Equal));
    indices.into_iter().map(|i| albums[i].clone()).collect()
}
