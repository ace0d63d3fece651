use crate::domain::model::{BingoCard, Catalog, WordEntry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Orders entries by a random key drawn per element.
pub fn shuffle<R: Rng + ?Sized>(entries: &[WordEntry], rng: &mut R) -> Vec<WordEntry> {
    let mut keyed: Vec<(u64, &WordEntry)> =
        entries.iter().map(|entry| (rng.gen(), entry)).collect();
    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, entry)| entry.clone()).collect()
}

/// Builds one generator per card. Nothing is shared between cards, so cards
/// can be produced on different threads.
#[derive(Debug, Clone, Default)]
pub struct Shuffler {
    seed: Option<u64>,
}

impl Shuffler {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn rng_for(&self, card_number: u32) -> StdRng {
        match self.seed {
            // splitmix-style spread so neighbouring cards don't get neighbouring seeds
            Some(seed) => StdRng::seed_from_u64(
                seed ^ (card_number as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15),
            ),
            None => StdRng::from_entropy(),
        }
    }

    pub fn shuffle_card(&self, catalog: &Catalog, card_number: u32, title: &str) -> BingoCard {
        let mut rng = self.rng_for(card_number);
        BingoCard {
            number: card_number,
            title: title.to_string(),
            entries: shuffle(catalog.entries(), &mut rng),
        }
    }
}
