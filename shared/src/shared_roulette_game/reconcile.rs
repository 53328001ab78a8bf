use log::{debug, warn};
use rand::seq::IteratorRandom;
use rand::Rng;

use super::{GameResult, Rarity, ReelCell};
use crate::RouletteError;

/// Finds the reel index that visually represents an already decided outcome.
///
/// Wins land on the first cell whose category and value equal the won
/// prize. Losses land on a random common cell, falling back to the first
/// cell when the reel has none; that pick is purely cosmetic and has no
/// bearing on the odds. Returns `None` when nothing on the reel fits.
pub fn locate_landing<R: Rng + ?Sized>(
    result: &GameResult,
    reel: &[ReelCell],
    rng: &mut R,
) -> Option<usize> {
    if result.is_winner {
        let prize = result.prize.as_ref()?;
        return reel.iter().position(|cell| cell.matches_prize(prize));
    }

    reel.iter()
        .enumerate()
        .filter(|(_, cell)| cell.rarity == Rarity::Common)
        .map(|(index, _)| index)
        .choose(rng)
        .or(if reel.is_empty() { None } else { Some(0) })
}

/// Picks the landing cell, marks it, and returns its index.
///
/// A win whose prize is missing from the reel gets a one-off cell built from
/// the authoritative prize, spliced in at a random position. A win without a
/// prize reference, or a loss on an empty reel, yields `NoLandingCellFound`.
pub fn reconcile<R: Rng + ?Sized>(
    result: &GameResult,
    reel: &mut Vec<ReelCell>,
    rng: &mut R,
) -> Result<usize, RouletteError> {
    let index = match locate_landing(result, reel, rng) {
        Some(index) => index,
        None => {
            let prize = match (result.is_winner, result.prize.as_ref()) {
                (true, Some(prize)) => prize,
                _ => return Err(RouletteError::NoLandingCellFound),
            };
            warn!(
                "Prize {} ({:?} {}) is not on the reel, synthesizing a landing cell",
                prize.name,
                prize.category,
                prize.effective_value()
            );
            let copy = reel
                .iter()
                .filter(|cell| cell.id.prize_id == prize.id)
                .map(|cell| cell.id.copy + 1)
                .max()
                .unwrap_or(0);
            let mut cell = ReelCell::from_prize(prize, copy);
            cell.synthesized = true;
            let index = rng.gen_range(0..=reel.len());
            reel.insert(index, cell);
            index
        }
    };

    reel[index].is_landing = true;
    debug!("Landing on reel cell {} of {}", index, reel.len());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_roulette_game::{expand, Prize, PrizeCategory};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn money(value: &str) -> Prize {
        Prize {
            id: Uuid::new_v4(),
            name: format!("{} coins", value),
            category: PrizeCategory::Money,
            amount: Some(value.to_string()),
            redemption_value: None,
            image_url: None,
            is_active: true,
        }
    }

    fn win(prize: &Prize) -> GameResult {
        GameResult {
            is_winner: true,
            amount_won: prize.effective_value(),
            prize: Some(prize.clone()),
            game_id: "roulette".to_string(),
        }
    }

    fn loss() -> GameResult {
        GameResult {
            is_winner: false,
            amount_won: 0.0,
            prize: None,
            game_id: "roulette".to_string(),
        }
    }

    #[test]
    fn test_win_lands_on_matching_cell() {
        let catalog = vec![money("5"), money("50"), money("500")];
        let result = win(&catalog[1]);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut reel = expand(&catalog, &mut rng);
            let index = reconcile(&result, &mut reel, &mut rng).unwrap();
            let cell = &reel[index];
            assert!(cell.is_landing);
            assert!(!cell.synthesized);
            assert_eq!(cell.category, PrizeCategory::Money);
            assert_eq!(cell.value, 50.0);
            assert_eq!(reel.iter().filter(|c| c.is_landing).count(), 1);
        }
    }

    #[test]
    fn test_win_matches_on_value_not_identity() {
        let on_reel = money("20");
        let mut awarded = money("20.00");
        awarded.name = "Twenty".to_string();
        let mut rng = StdRng::seed_from_u64(9);
        let mut reel = expand(&[on_reel.clone()], &mut rng);
        let index = reconcile(&win(&awarded), &mut reel, &mut rng).unwrap();
        assert_eq!(reel[index].id.prize_id, on_reel.id);
        assert_eq!(reel.len(), 4);
    }

    #[test]
    fn test_category_must_match() {
        let mut product = money("5");
        product.category = PrizeCategory::Product;
        product.redemption_value = Some("5".to_string());
        let mut rng = StdRng::seed_from_u64(4);
        let reel = expand(&[product], &mut rng);
        let cash = money("5");
        assert_eq!(locate_landing(&win(&cash), &reel, &mut rng), None);
    }

    #[test]
    fn test_missing_prize_is_synthesized() {
        let catalog = vec![money("5")];
        let awarded = money("2500");
        let mut rng = StdRng::seed_from_u64(11);
        let mut reel = expand(&catalog, &mut rng);
        assert_eq!(locate_landing(&win(&awarded), &reel, &mut rng), None);

        let index = reconcile(&win(&awarded), &mut reel, &mut rng).unwrap();
        assert_eq!(reel.len(), 9);
        let cell = &reel[index];
        assert!(cell.synthesized);
        assert!(cell.is_landing);
        assert_eq!(cell.id.prize_id, awarded.id);
        assert_eq!(cell.value, 2500.0);
        assert_eq!(cell.rarity, Rarity::Legendary);
    }

    #[test]
    fn test_loss_prefers_common_cells() {
        let catalog = vec![money("1"), money("30"), money("300"), money("3000")];
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut reel = expand(&catalog, &mut rng);
            let index = reconcile(&loss(), &mut reel, &mut rng).unwrap();
            assert_eq!(reel[index].rarity, Rarity::Common);
        }
    }

    #[test]
    fn test_loss_without_common_cells_takes_first() {
        let catalog = vec![money("30"), money("3000")];
        let mut rng = StdRng::seed_from_u64(2);
        let mut reel = expand(&catalog, &mut rng);
        assert_eq!(reconcile(&loss(), &mut reel, &mut rng), Ok(0));
        assert!(reel[0].is_landing);
    }

    #[test]
    fn test_nothing_to_land_on() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut empty = Vec::new();
        assert_eq!(
            reconcile(&loss(), &mut empty, &mut rng),
            Err(RouletteError::NoLandingCellFound)
        );

        let mut reel = expand(&[money("5")], &mut rng);
        let mut prizeless = loss();
        prizeless.is_winner = true;
        prizeless.amount_won = 5.0;
        assert_eq!(
            reconcile(&prizeless, &mut reel, &mut rng),
            Err(RouletteError::NoLandingCellFound)
        );
        assert!(reel.iter().all(|c| !c.is_landing));
    }

    #[test]
    fn test_result_is_left_untouched() {
        let prize = money("50");
        let result = win(&prize);
        let before = result.clone();
        let mut rng = StdRng::seed_from_u64(5);
        let mut reel = expand(&[money("7")], &mut rng);
        reconcile(&result, &mut reel, &mut rng).unwrap();
        assert_eq!(result, before);
    }
}
