use super::{ScoredArticle, SortOrder};

#[derive(Debug, Clone, PartialEq)]
pub struct RankedPage {
    pub articles: Vec<ScoredArticle>,
    /// The threshold every article on this page cleared.
    pub effective_min_score: f64,
    pub relaxed: bool,
}

/// Thresholds, sorts, and truncates already-scored articles.
///
/// When fewer than `fallback_floor` articles clear `min_score`, the same scored
/// set is refiltered against `min_score / 2`.
pub fn rank(
    scored: Vec<ScoredArticle>,
    min_score: f64,
    fallback_floor: usize,
    page_size: usize,
    sort: SortOrder,
) -> RankedPage {
    let passing = scored.iter().filter(|a| a.score.total >= min_score).count();

    let (effective_min_score, relaxed) = if passing < fallback_floor {
        (min_score / 2.0, true)
    } else {
        (min_score, false)
    };

    let mut articles: Vec<ScoredArticle> = scored
        .into_iter()
        .filter(|a| a.score.total >= effective_min_score)
        .collect();

    match sort {
        SortOrder::Recommended => articles.sort_by(|a, b| {
            b.score
                .total
                .total_cmp(&a.score.total)
                .then_with(|| a.article.id.cmp(&b.article.id))
        }),
        SortOrder::Date => articles.sort_by(|a, b| {
            b.article
                .published_at
                .cmp(&a.article.published_at)
                .then_with(|| b.score.total.total_cmp(&a.score.total))
                .then_with(|| a.article.id.cmp(&b.article.id))
        }),
    }

    articles.truncate(page_size);

    RankedPage {
        articles,
        effective_min_score,
        relaxed,
    }
}
