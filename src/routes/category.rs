use serde::Serialize;
use tracing::error;

use crate::db::{self, Pool};
use crate::error::ApiError;
use crate::model::Question;
use crate::pagination::{extract_page, paginate};
use std::collections::HashMap;

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CategoryQuestionsResponse<'a> {
    success: bool,
    questions: &'a [Question],
    total_questions: usize,
    current_category: i64,
}

pub async fn get_categories(pool: Pool) -> Result<impl warp::Reply, warp::Rejection> {
    let categories = db::all_categories(&pool).await.map_err(|err| {
        error!(?err, "failed to load categories");
        warp::reject::custom(ApiError::Internal)
    })?;

    Ok(warp::reply::json(&CategoriesResponse {
        success: true,
        categories: categories.into_iter().map(|c| c.kind).collect(),
    }))
}

pub async fn get_category_questions(
    category_id: i64,
    params: HashMap<String, String>,
    pool: Pool,
) -> Result<impl warp::Reply, warp::Rejection> {
    let category = db::get_category(&pool, category_id).await.map_err(|err| {
        error!(?err, category_id, "failed to load category");
        warp::reject::custom(ApiError::Internal)
    })?;
    if category.is_none() {
        return Err(warp::reject::custom(ApiError::NotFound));
    }

    let questions = db::questions_in_category(&pool, category_id)
        .await
        .map_err(|err| {
            error!(?err, category_id, "failed to load questions for category");
            warp::reject::custom(ApiError::Internal)
        })?;

    Ok(warp::reply::json(&CategoryQuestionsResponse {
        success: true,
        questions: paginate(&questions, extract_page(&params)),
        total_questions: questions.len(),
        current_category: category_id,
    }))
}
