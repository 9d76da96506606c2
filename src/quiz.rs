//! Quiz question selection.

use crate::db::{self, Pool};
use crate::model::{Question, QuizRequest};
use anyhow::Result;
use rand::Rng;
use tracing::{debug, instrument};

/// Pick one question uniformly from `candidates`.
///
/// A single candidate is returned as is; an empty set yields `None`.
pub fn choose<R: Rng + ?Sized>(mut candidates: Vec<Question>, rng: &mut R) -> Option<Question> {
    match candidates.len() {
        0 => None,
        1 => candidates.pop(),
        n => Some(candidates.swap_remove(rng.gen_range(0..n))),
    }
}

/// Next unseen question for a quiz round, or `None` once the round is exhausted.
#[instrument(skip_all)]
pub async fn next_question(pool: &Pool, request: &QuizRequest) -> Result<Option<Question>> {
    let category = request.category();
    let previous = request.previous_ids();
    let candidates = db::quiz_candidates(pool, category.as_deref(), previous).await?;
    debug!(
        candidates = candidates.len(),
        previous = previous.len(),
        category = category.as_deref().unwrap_or("all"),
        "quiz candidates"
    );
    Ok(choose(candidates, &mut rand::thread_rng()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: i64, category: &str) -> Question {
        Question {
            id,
            question: format!("question {id}"),
            answer: "answer".into(),
            category: category.into(),
            difficulty: 1,
        }
    }

    #[test]
    fn empty_set_is_exhausted() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(choose(Vec::new(), &mut rng).is_none());
    }

    #[test]
    fn single_candidate_always_returned() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let got = choose(vec![question(42, "1")], &mut rng).unwrap();
            assert_eq!(got.id, 42);
        }
    }

    #[test]
    fn draw_stays_in_bounds_and_covers_all() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool: Vec<Question> = (1..=3).map(|id| question(id, "1")).collect();
        let mut seen = [false; 3];
        for _ in 0..300 {
            let got = choose(pool.clone(), &mut rng).unwrap();
            seen[(got.id - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
