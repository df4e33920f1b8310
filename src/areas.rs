use std::collections::HashMap;

use crate::models::{AreaGroup, Venue, VenueSummary};

/// Groups venues by their exact `(city, state)` pair.
///
/// Groups appear in the order their pair is first seen and members keep
/// input order. City and state are compared as-is, without case folding or
/// trimming.
pub fn group_by_area<F>(venues: &[Venue], upcoming_count_of: F) -> Vec<AreaGroup>
where
    F: Fn(&Venue) -> usize,
{
    let mut groups: Vec<AreaGroup> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for venue in venues {
        let key = (venue.city.as_str(), venue.state.as_str());
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(AreaGroup {
                city: venue.city.clone(),
                state: venue.state.clone(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(VenueSummary {
            id: venue.id,
            name: venue.name.clone(),
            num_upcoming_shows: upcoming_count_of(venue),
        });
    }

    groups
}
