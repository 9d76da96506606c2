pub mod category;
pub mod question;
pub mod quiz;

use crate::error::ApiError;
use futures::{Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use warp::hyper::body::Buf;
use warp::{Filter, Rejection};

const MAX_BODY_BYTES: u64 = 64 * 1024;

/// JSON body that may be absent. An empty body extracts `None`; a body that is
/// not valid JSON for `T`, or larger than the limit, is a bad request.
pub fn optional_json<T>() -> impl Filter<Extract = (Option<T>,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::header::optional::<u64>("content-length")
        .and_then(|len: Option<u64>| async move {
            match len {
                Some(len) if len > MAX_BODY_BYTES => {
                    Err(warp::reject::custom(ApiError::BadRequest))
                }
                _ => Ok(()),
            }
        })
        .untuple_one()
        .and(warp::body::stream())
        .and_then(parse_body::<T, _, _>)
}

async fn parse_body<T, S, B>(body: S) -> Result<Option<T>, Rejection>
where
    T: DeserializeOwned,
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    let body = read_limited(body, MAX_BODY_BYTES).await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(&body).map_err(|err| {
        tracing::info!(%err, "malformed request body");
        warp::reject::custom(ApiError::BadRequest)
    })
}

/// Buffer a request body, rejecting it as soon as it grows past `limit`.
/// Chunked bodies carry no `Content-Length`, so the header check alone is not enough.
async fn read_limited<S, B>(body: S, limit: u64) -> Result<Vec<u8>, Rejection>
where
    S: Stream<Item = Result<B, warp::Error>>,
    B: Buf,
{
    futures::pin_mut!(body);
    let mut out = Vec::new();
    while let Some(mut chunk) = body.try_next().await.map_err(|err| {
        tracing::info!(%err, "failed to read request body");
        warp::reject::custom(ApiError::BadRequest)
    })? {
        if (out.len() + chunk.remaining()) as u64 > limit {
            tracing::info!(limit, "request body too large");
            return Err(warp::reject::custom(ApiError::BadRequest));
        }
        while chunk.has_remaining() {
            let part = chunk.chunk();
            let n = part.len();
            out.extend_from_slice(part);
            chunk.advance(n);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::hyper::body::Bytes;

    fn chunks(sizes: &[usize]) -> impl Stream<Item = Result<Bytes, warp::Error>> {
        let parts: Vec<Result<Bytes, warp::Error>> =
            sizes.iter().map(|n| Ok(Bytes::from(vec![b' '; *n]))).collect();
        futures::stream::iter(parts)
    }

    #[tokio::test]
    async fn chunked_body_within_limit_is_buffered() {
        let body = read_limited(chunks(&[10, 20, 30]), 64).await.unwrap();
        assert_eq!(body.len(), 60);
    }

    #[tokio::test]
    async fn chunked_body_over_limit_is_rejected() {
        let err = read_limited(chunks(&[40, 40]), 64).await.unwrap_err();
        assert_eq!(err.find::<ApiError>(), Some(&ApiError::BadRequest));
    }
}
