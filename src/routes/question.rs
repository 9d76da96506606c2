use serde::Serialize;
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};
use warp::http::StatusCode;
use warp::Reply;

use crate::db::{self, Pool};
use crate::error::ApiError;
use crate::model::{Question, QuestionRequest};
use crate::pagination::{extract_page, paginate};

#[derive(Debug, Serialize)]
struct QuestionsPage<'a> {
    questions: &'a [Question],
    total_questions: usize,
    current_category: &'a [String],
    categories: &'a [String],
}

#[derive(Debug, Serialize)]
struct QuestionIdResponse {
    success: bool,
    question_id: i64,
}

#[derive(Debug, Serialize)]
struct SearchResponse<'a> {
    question: &'a [Question],
    total_question: usize,
    current_category: &'a str,
    success: bool,
}

fn internal(err: anyhow::Error, what: &'static str) -> warp::Rejection {
    error!(?err, "{what}");
    warp::reject::custom(ApiError::Internal)
}

#[instrument(skip_all)]
pub async fn get_questions(
    params: HashMap<String, String>,
    pool: Pool,
) -> Result<impl warp::Reply, warp::Rejection> {
    let questions = db::all_questions(&pool)
        .await
        .map_err(|e| internal(e, "failed to load questions"))?;
    let page = paginate(&questions, extract_page(&params));
    if page.is_empty() {
        return Err(warp::reject::custom(ApiError::NotFound));
    }

    let categories: Vec<String> = db::all_categories(&pool)
        .await
        .map_err(|e| internal(e, "failed to load categories"))?
        .into_iter()
        .map(|c| c.kind)
        .collect();

    Ok(warp::reply::json(&QuestionsPage {
        questions: page,
        total_questions: questions.len(),
        current_category: &categories,
        categories: &categories,
    }))
}

#[instrument(skip(pool))]
pub async fn delete_question(id: i64, pool: Pool) -> Result<impl warp::Reply, warp::Rejection> {
    let existing = db::get_question(&pool, id)
        .await
        .map_err(|e| internal(e, "failed to look up question"))?;
    if existing.is_none() {
        return Err(warp::reject::custom(ApiError::NotFound));
    }

    match db::delete_question(&pool, id).await {
        Ok(true) => {
            info!(id, "question deleted");
            Ok(warp::reply::json(&QuestionIdResponse {
                success: true,
                question_id: id,
            }))
        }
        Ok(false) => Err(warp::reject::custom(ApiError::NotFound)),
        Err(err) => {
            warn!(?err, id, "failed to delete question");
            Err(warp::reject::custom(ApiError::Unprocessable))
        }
    }
}

/// `POST /questions`: a search when `searchTerm` is set, otherwise an insert.
#[instrument(skip_all)]
pub async fn add_or_search_question(
    pool: Pool,
    body: Option<QuestionRequest>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let Some(request) = body.filter(|b| !b.is_empty()) else {
        return Err(warp::reject::custom(ApiError::BadRequest));
    };

    if let Some(term) = request.search_term() {
        return search_questions(&pool, term).await;
    }

    let Some(new_question) = request.into_new_question() else {
        return Err(warp::reject::custom(ApiError::BadRequest));
    };

    match db::insert_question(&pool, &new_question).await {
        Ok(id) => {
            info!(id, category = %new_question.category, "question created");
            Ok(warp::reply::with_status(
                warp::reply::json(&QuestionIdResponse {
                    success: true,
                    question_id: id,
                }),
                StatusCode::CREATED,
            )
            .into_response())
        }
        Err(err) => {
            warn!(?err, "failed to insert question");
            Err(warp::reject::custom(ApiError::Unprocessable))
        }
    }
}

async fn search_questions(
    pool: &Pool,
    term: &str,
) -> Result<warp::reply::Response, warp::Rejection> {
    let questions = db::search_questions(pool, term)
        .await
        .map_err(|e| internal(e, "failed to search questions"))?;
    let Some(first) = questions.first() else {
        return Err(warp::reject::custom(ApiError::NotFound));
    };

    Ok(warp::reply::json(&SearchResponse {
        question: &questions,
        total_question: questions.len(),
        current_category: &first.category,
        success: true,
    })
    .into_response())
}
