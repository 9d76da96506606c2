//! Trivia questions API: categories, paginated questions, search and quizzes.
#![warn(clippy::all)]

use warp::{http::Method, Filter, Reply};

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod pagination;
pub mod quiz;
pub mod routes;

use db::Pool;
use model::{QuestionRequest, QuizRequest};
use routes::category::{get_categories, get_category_questions};
use routes::question::{add_or_search_question, delete_question, get_questions};
use routes::optional_json;
use routes::quiz::play_quiz;

fn cors(origins: &[String]) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_headers(vec!["Content-Type", "Authorization"])
        .allow_methods(&[
            Method::GET,
            Method::PUT,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]);
    if origins.is_empty() {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(origins.iter().map(String::as_str))
    }
}

/// The complete API filter. Paths are matched before methods, so an unknown
/// path is a 404 while a known path with the wrong verb is a 405.
pub fn build_routes(
    pool: Pool,
    cors_origins: &[String],
) -> impl Filter<Extract = impl Reply> + Clone {
    let store_filter = warp::any().map(move || pool.clone());

    let categories = warp::path("categories")
        .and(warp::path::end())
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_categories);

    let category_questions = warp::path("categories")
        .and(warp::path::param::<i64>())
        .and(warp::path("questions"))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(get_category_questions);

    let list_questions = warp::path("questions")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query())
        .and(store_filter.clone())
        .and_then(get_questions);

    let add_question = warp::path("questions")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter.clone())
        .and(optional_json::<QuestionRequest>())
        .and_then(add_or_search_question);

    let remove_question = warp::path("questions")
        .and(warp::path::param::<i64>())
        .and(warp::path::end())
        .and(warp::delete())
        .and(store_filter.clone())
        .and_then(delete_question);

    let quizzes = warp::path("quizzes")
        .and(warp::path::end())
        .and(warp::post())
        .and(store_filter)
        .and(optional_json::<QuizRequest>())
        .and_then(play_quiz);

    categories
        .or(category_questions)
        .or(list_questions)
        .or(add_question)
        .or(remove_question)
        .or(quizzes)
        .recover(error::return_error)
        .with(cors(cors_origins))
        .with(warp::trace(|info| {
            tracing::info_span!(
                "request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }))
}

/// Serve until `shutdown` resolves, then close the pool.
pub async fn run<S>(
    addr: std::net::SocketAddr,
    pool: Pool,
    cors_origins: &[String],
    shutdown: S,
) -> anyhow::Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let routes = build_routes(pool.clone(), cors_origins);
    let (bound, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, shutdown)?;
    tracing::info!(%bound, "trivia api listening");
    server.await;
    pool.close().await;
    tracing::info!("trivia api stopped");
    Ok(())
}
