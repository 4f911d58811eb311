use std::collections::VecDeque;

use rand::Rng;

use crate::types::Album;

/// Interleaves an alphabetical and a chronological reading of the pool.
///
/// Two reference orders are built: by name (case-insensitive, ties by id) and
/// by release date ascending. Picks alternate between the two lists, taking
/// either the head or the tail of the current list; before each pick the
/// side flips with `flip_probability`. Albums already emitted are skipped, so
/// the result is a permutation of the input.
pub fn spiral_dance<R>(albums: &[Album], flip_probability: f64, rng: &mut R) -> Vec<Album>
where
    R: Rng + ?Sized,
{
    let total = albums.len();

    let mut alphabetical: Vec<usize> = (0..total).collect();
    alphabetical.sort_by(|&a, &b| {
        albums[a]
            .name
            .to_lowercase()
            .cmp(&albums[b].name.to_lowercase())
            .then_with(|| albums[a].id.cmp(&albums[b].id))
    });

    let mut by_date: Vec<usize> = (0..total).collect();
    by_date.sort_by(|&a, &b| {
        albums[a]
            .release_day()
            .cmp(&albums[b].release_day())
            .then_with(|| albums[a].id.cmp(&albums[b].id))
    });

    let mut lists: [VecDeque<usize>; 2] = [alphabetical.into(), by_date.into()];
    let mut emitted = vec![false; total];
    let mut result = Vec::with_capacity(total);
    let mut active = 0;
    let mut from_start = true;

    while result.len() < total {
        if rng.random_bool(flip_probability) {
            from_start = !from_start;
        }

        let list = &mut lists[active];
        loop {
            let next = if from_start {
                list.pop_front()
            } else {
                list.pop_back()
            };
            // Each list holds every index, so an unemitted one is always left
            // while the result is short.
            let Some(index) = next else { break };
            if !emitted[index] {
                emitted[index] = true;
                result.push(albums[index].clone());
                break;
            }
        }

        active = 1 - active;
    }

    result
}
