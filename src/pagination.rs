use std::collections::HashMap;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// Read the 1-based `page` query parameter.
///
/// A missing or non-numeric value means page 1. Zero and negative pages are
/// kept so that [`paginate`] can return an empty window for them.
pub fn extract_page(params: &HashMap<String, String>) -> i64 {
    params
        .get("page")
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(1)
}

/// Records `[(page-1)*10, page*10)`, clamped to the slice. Pages outside the
/// slice yield an empty window.
pub fn paginate<T>(records: &[T], page: i64) -> &[T] {
    if page < 1 {
        return &[];
    }
    let start = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE));
    match start {
        Some(start) if start < records.len() => {
            let end = (start + QUESTIONS_PER_PAGE).min(records.len());
            &records[start..end]
        }
        _ => &[],
    }
}
