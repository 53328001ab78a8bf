use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{Prize, ReelCell};

/// Expands the catalog into a shuffled reel. Every active prize is repeated
/// according to its rarity tier, so cheap prizes fill most of the reel.
/// An empty or all-inactive catalog gives an empty reel.
pub fn expand<R: Rng + ?Sized>(catalog: &[Prize], rng: &mut R) -> Vec<ReelCell> {
    let mut reel: Vec<ReelCell> = catalog
        .iter()
        .filter(|prize| prize.is_active)
        .flat_map(|prize| {
            let copies = prize.rarity().repetitions();
            (0..copies).map(move |copy| ReelCell::from_prize(prize, copy))
        })
        .collect();

    reel.shuffle(rng);
    debug!("Expanded {} prizes into {} reel cells", catalog.len(), reel.len());
    reel
}
