use crate::models::{Listing, MatchSummary, SearchResult};

/// Case-insensitive substring match on names. An empty query matches
/// everything; the query is taken literally.
pub fn search<'a, I, F>(entities: I, query: &str, upcoming_count_of: F) -> SearchResult
where
    I: IntoIterator<Item = Listing<'a>>,
    F: Fn(&Listing<'a>) -> usize,
{
    let needle = query.to_lowercase();
    let matches: Vec<MatchSummary> = entities
        .into_iter()
        .filter(|entity| entity.name().to_lowercase().contains(&needle))
        .map(|entity| MatchSummary {
            id: entity.id(),
            name: entity.name().to_string(),
            num_upcoming_shows: upcoming_count_of(&entity),
        })
        .collect();

    SearchResult {
        count: matches.len(),
        matches,
    }
}
