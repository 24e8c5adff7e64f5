//! Target selection and multiple-choice option generation.

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::WordCatalog;
use crate::error::SessionError;

/// Default number of choices per question.
pub const DEFAULT_OPTION_COUNT: usize = 3;

/// One choice as shown to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedOption {
    pub key: String,
    /// Image chosen for this render.
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct QuestionSelector {
    option_count: usize,
}

impl QuestionSelector {
    pub fn new(option_count: usize) -> Self {
        Self {
            option_count: option_count.max(1),
        }
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    /// Uniform choice among the active pool.
    pub fn pick_target<R: Rng + ?Sized>(
        &self,
        pool: &[String],
        rng: &mut R,
    ) -> Result<String, SessionError> {
        pool.choose(rng).cloned().ok_or(SessionError::EmptyPool)
    }

    /// The target plus distinct random distractors from the whole catalog,
    /// in uniformly random order.
    ///
    /// Returns `min(option_count, catalog_keys.len())` keys when the target
    /// is part of `catalog_keys`.
    pub fn build_options<R: Rng + ?Sized>(
        &self,
        target: &str,
        catalog_keys: &[String],
        rng: &mut R,
    ) -> Vec<String> {
        let mut options: Vec<String> = catalog_keys
            .iter()
            .filter(|k| k.as_str() != target)
            .choose_multiple(rng, self.option_count - 1)
            .into_iter()
            .cloned()
            .collect();
        options.push(target.to_string());
        options.shuffle(rng);
        options
    }

    /// Pick one image per option. Re-rolled on every call.
    pub fn render_options<R: Rng + ?Sized>(
        &self,
        keys: &[String],
        catalog: &WordCatalog,
        rng: &mut R,
    ) -> Vec<RenderedOption> {
        keys.iter()
            .filter_map(|key| {
                let word = catalog.get(key)?;
                let image = word.images.choose(rng)?;
                tracing::debug!(key = %key, image = %image, "option image chosen");
                Some(RenderedOption {
                    key: key.clone(),
                    image: image.clone(),
                })
            })
            .collect()
    }
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::new(DEFAULT_OPTION_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::model::{CatalogEntry, Language};

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn pick_target_from_pool() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let pool = keys(4);
        let selector = QuestionSelector::default();
        for _ in 0..50 {
            let target = selector.pick_target(&pool, &mut rng).unwrap();
            assert!(pool.contains(&target));
        }
    }

    #[test]
    fn pick_target_empty_pool_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let err = QuestionSelector::default()
            .pick_target(&[], &mut rng)
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptyPool));
    }

    #[test]
    fn options_are_distinct_and_include_target_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let all = keys(10);
        let selector = QuestionSelector::default();
        for _ in 0..200 {
            let options = selector.build_options("w3", &all, &mut rng);
            assert_eq!(options.len(), 3);
            let unique: HashSet<_> = options.iter().collect();
            assert_eq!(unique.len(), 3);
            assert_eq!(options.iter().filter(|k| *k == "w3").count(), 1);
        }
    }

    #[test]
    fn small_catalogs_yield_fewer_options() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let selector = QuestionSelector::default();
        assert_eq!(selector.build_options("w0", &keys(2), &mut rng).len(), 2);
        assert_eq!(selector.build_options("w0", &keys(1), &mut rng), vec!["w0"]);
    }

    #[test]
    fn target_position_varies() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let all = keys(6);
        let selector = QuestionSelector::default();
        let mut positions: HashMap<usize, usize> = HashMap::new();
        for _ in 0..300 {
            let options = selector.build_options("w0", &all, &mut rng);
            let pos = options.iter().position(|k| k == "w0").unwrap();
            *positions.entry(pos).or_default() += 1;
        }
        assert_eq!(positions.len(), 3);
        assert!(positions.values().all(|&n| n > 50));
    }

    #[test]
    fn render_rerolls_images() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let catalog = WordCatalog::from_entries(
            vec![CatalogEntry::new(
                "cat",
                "1",
                vec!["a.png".into(), "b.png".into(), "c.png".into()],
            )],
            Language::English,
        )
        .unwrap();
        let selector = QuestionSelector::default();
        let target = ["cat".to_string()];
        let seen: HashSet<String> = (0..60)
            .map(|_| selector.render_options(&target, &catalog, &mut rng)[0].image.clone())
            .collect();
        assert_eq!(seen.len(), 3);
    }
}
