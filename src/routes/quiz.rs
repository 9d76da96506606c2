use serde::Serialize;
use tracing::{error, info};

use crate::db::Pool;
use crate::error::ApiError;
use crate::model::{Question, QuizRequest};
use crate::quiz;

#[derive(Debug, Serialize)]
struct QuizResponse {
    success: bool,
    /// `null` once every candidate has been asked.
    question: Option<Question>,
}

pub async fn play_quiz(
    pool: Pool,
    body: Option<QuizRequest>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let Some(request) = body else {
        return Err(warp::reject::custom(ApiError::NotFound));
    };

    let question = quiz::next_question(&pool, &request).await.map_err(|err| {
        error!(?err, "failed to select quiz question");
        warp::reject::custom(ApiError::Internal)
    })?;
    if question.is_none() {
        info!(
            previous = request.previous_ids().len(),
            "quiz round exhausted"
        );
    }

    Ok(warp::reply::json(&QuizResponse {
        success: true,
        question,
    }))
}
