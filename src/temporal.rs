use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::Result;
use crate::models::{ClassifiedShow, Counterpart, Show};

pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The one boundary rule: a show starting exactly at `reference` is upcoming.
pub fn is_upcoming(start_time: NaiveDateTime, reference: NaiveDateTime) -> bool {
    start_time >= reference
}

pub fn format_start_time(start_time: NaiveDateTime) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
    pub past: Vec<ClassifiedShow>,
    pub upcoming: Vec<ClassifiedShow>,
}

impl Timeline {
    pub fn past_count(&self) -> usize {
        self.past.len()
    }

    pub fn upcoming_count(&self) -> usize {
        self.upcoming.len()
    }
}

/// Splits the shows of one venue or artist into past and upcoming, keeping
/// input order inside each bucket.
///
/// `resolve` supplies the counterpart displayed next to each show. Its first
/// error aborts the whole classification so counts are never built from a
/// partial list.
pub fn classify<'a, I, F>(shows: I, reference: NaiveDateTime, mut resolve: F) -> Result<Timeline>
where
    I: IntoIterator<Item = &'a Show>,
    F: FnMut(&Show) -> Result<Counterpart>,
{
    let mut timeline = Timeline::default();
    for show in shows {
        let classified = ClassifiedShow {
            show_id: show.id,
            counterpart: resolve(show)?,
            start_time: format_start_time(show.start_time),
        };
        if is_upcoming(show.start_time, reference) {
            timeline.upcoming.push(classified);
        } else {
            timeline.past.push(classified);
        }
    }
    Ok(timeline)
}

/// Upcoming show counts per venue and per artist, built in one pass.
#[derive(Clone, Debug, Default)]
pub struct UpcomingCounts {
    by_venue: HashMap<i64, usize>,
    by_artist: HashMap<i64, usize>,
}

impl UpcomingCounts {
    pub fn tally<'a, I>(shows: I, reference: NaiveDateTime) -> Self
    where
        I: IntoIterator<Item = &'a Show>,
    {
        let mut counts = Self::default();
        for show in shows {
            if !is_upcoming(show.start_time, reference) {
                continue;
            }
            *counts.by_venue.entry(show.venue_id).or_insert(0) += 1;
            *counts.by_artist.entry(show.artist_id).or_insert(0) += 1;
        }
        counts
    }

    pub fn for_venue(&self, venue_id: i64) -> usize {
        self.by_venue.get(&venue_id).copied().unwrap_or(0)
    }

    pub fn for_artist(&self, artist_id: i64) -> usize {
        self.by_artist.get(&artist_id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DirectoryError, EntityKind};
    use chrono::{Duration, NaiveDate};

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    fn show(id: i64, start_time: NaiveDateTime) -> Show {
        Show {
            id,
            artist_id: 10 + id,
            venue_id: 1,
            start_time,
        }
    }

    fn counterpart_for(show: &Show) -> Result<Counterpart> {
        Ok(Counterpart {
            id: show.artist_id,
            name: format!("Artist {}", show.artist_id),
            image_link: None,
        })
    }

    fn ids(shows: &[ClassifiedShow]) -> Vec<i64> {
        shows.iter().map(|s| s.show_id).collect()
    }

    #[test]
    fn splits_around_reference_with_exact_match_upcoming() {
        let t = reference();
        let shows = vec![
            show(1, t - Duration::seconds(1)),
            show(2, t),
            show(3, t + Duration::seconds(1)),
        ];

        let timeline = classify(&shows, t, counterpart_for).unwrap();

        assert_eq!(ids(&timeline.past), vec![1]);
        assert_eq!(ids(&timeline.upcoming), vec![2, 3]);
        assert_eq!(timeline.past_count(), 1);
        assert_eq!(timeline.upcoming_count(), 2);
    }

    #[test]
    fn keeps_input_order_inside_buckets() {
        let t = reference();
        let shows = vec![
            show(1, t + Duration::days(10)),
            show(2, t - Duration::days(1)),
            show(3, t + Duration::days(2)),
            show(4, t - Duration::days(30)),
        ];

        let timeline = classify(&shows, t, counterpart_for).unwrap();

        assert_eq!(ids(&timeline.upcoming), vec![1, 3]);
        assert_eq!(ids(&timeline.past), vec![2, 4]);
        assert_eq!(timeline.past_count() + timeline.upcoming_count(), shows.len());
    }

    #[test]
    fn boundary_assignment_is_stable_across_calls() {
        let t = reference();
        let shows = vec![show(7, t)];

        let first = classify(&shows, t, counterpart_for).unwrap();
        let second = classify(&shows, t, counterpart_for).unwrap();

        assert_eq!(first, second);
        assert!(first.past.is_empty());
        assert_eq!(ids(&first.upcoming), vec![7]);
    }

    #[test]
    fn formats_start_time_and_carries_counterpart() {
        let t = reference();
        let shows = vec![show(1, t + Duration::minutes(90))];

        let timeline = classify(&shows, t, counterpart_for).unwrap();
        let item = &timeline.upcoming[0];

        assert_eq!(item.start_time, "2024-05-17 21:30:00");
        assert_eq!(item.counterpart.id, 11);
        assert_eq!(item.counterpart.name, "Artist 11");
    }

    #[test]
    fn empty_input_yields_empty_timeline() {
        let shows: Vec<Show> = Vec::new();
        let timeline = classify(&shows, reference(), counterpart_for).unwrap();
        assert_eq!(timeline, Timeline::default());
    }

    #[test]
    fn resolver_failure_aborts_classification() {
        let t = reference();
        let shows = vec![show(1, t), show(2, t)];

        let err = classify(&shows, t, |show| {
            if show.id == 2 {
                Err(DirectoryError::MalformedInput {
                    show_id: show.id,
                    kind: EntityKind::Artist,
                    id: show.artist_id,
                })
            } else {
                counterpart_for(show)
            }
        })
        .unwrap_err();

        assert!(matches!(
            err,
            DirectoryError::MalformedInput { show_id: 2, .. }
        ));
    }

    #[test]
    fn tally_counts_upcoming_per_venue_and_artist() {
        let t = reference();
        let shows = vec![
            Show {
                id: 1,
                artist_id: 5,
                venue_id: 1,
                start_time: t,
            },
            Show {
                id: 2,
                artist_id: 5,
                venue_id: 2,
                start_time: t + Duration::days(1),
            },
            Show {
                id: 3,
                artist_id: 6,
                venue_id: 1,
                start_time: t - Duration::days(1),
            },
            Show {
                id: 4,
                artist_id: 6,
                venue_id: 1,
                start_time: t + Duration::hours(3),
            },
        ];

        let counts = UpcomingCounts::tally(&shows, t);

        assert_eq!(counts.for_venue(1), 2);
        assert_eq!(counts.for_venue(2), 1);
        assert_eq!(counts.for_venue(99), 0);
        assert_eq!(counts.for_artist(5), 2);
        assert_eq!(counts.for_artist(6), 1);
    }
}
