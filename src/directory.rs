use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::areas::group_by_area;
use crate::error::{DirectoryError, EntityKind, Result};
use crate::models::{
    AreaGroup, Artist, ArtistDetail, ArtistSummary, Counterpart, Listing, SearchResult,
    ShowListing, Snapshot, Venue, VenueDetail,
};
use crate::search::search;
use crate::temporal::{classify, format_start_time, UpcomingCounts};

/// Read-only view over one snapshot with venues and artists indexed by id.
///
/// Construction checks that every show points at a venue and an artist in
/// the snapshot, so the page builders below never see a dangling reference.
pub struct Directory<'a> {
    snapshot: &'a Snapshot,
    venues: HashMap<i64, &'a Venue>,
    artists: HashMap<i64, &'a Artist>,
}

impl<'a> Directory<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Result<Self> {
        let venues: HashMap<i64, &Venue> = snapshot.venues.iter().map(|v| (v.id, v)).collect();
        let artists: HashMap<i64, &Artist> =
            snapshot.artists.iter().map(|a| (a.id, a)).collect();

        for show in &snapshot.shows {
            if !venues.contains_key(&show.venue_id) {
                return Err(DirectoryError::MalformedInput {
                    show_id: show.id,
                    kind: EntityKind::Venue,
                    id: show.venue_id,
                });
            }
            if !artists.contains_key(&show.artist_id) {
                return Err(DirectoryError::MalformedInput {
                    show_id: show.id,
                    kind: EntityKind::Artist,
                    id: show.artist_id,
                });
            }
        }

        Ok(Self {
            snapshot,
            venues,
            artists,
        })
    }

    fn venue(&self, id: i64) -> Result<&'a Venue> {
        self.venues
            .get(&id)
            .copied()
            .ok_or(DirectoryError::NotFound {
                kind: EntityKind::Venue,
                id,
            })
    }

    fn artist(&self, id: i64) -> Result<&'a Artist> {
        self.artists
            .get(&id)
            .copied()
            .ok_or(DirectoryError::NotFound {
                kind: EntityKind::Artist,
                id,
            })
    }

    pub fn areas(&self, reference: NaiveDateTime) -> Vec<AreaGroup> {
        let counts = UpcomingCounts::tally(&self.snapshot.shows, reference);
        let groups = group_by_area(&self.snapshot.venues, |venue| counts.for_venue(venue.id));
        debug!(
            venues = self.snapshot.venues.len(),
            groups = groups.len(),
            "grouped venues by area"
        );
        groups
    }

    pub fn venue_detail(&self, venue_id: i64, reference: NaiveDateTime) -> Result<VenueDetail> {
        let venue = self.venue(venue_id)?;
        let shows = self.snapshot.shows.iter().filter(|s| s.venue_id == venue_id);
        let timeline = classify(shows, reference, |show| {
            self.venue_counterpart_of(show.id, show.artist_id)
        })?;

        Ok(VenueDetail {
            venue: venue.clone(),
            past_shows_count: timeline.past_count(),
            upcoming_shows_count: timeline.upcoming_count(),
            past_shows: timeline.past,
            upcoming_shows: timeline.upcoming,
        })
    }

    pub fn artist_detail(&self, artist_id: i64, reference: NaiveDateTime) -> Result<ArtistDetail> {
        let artist = self.artist(artist_id)?;
        let shows = self.snapshot.shows.iter().filter(|s| s.artist_id == artist_id);
        let timeline = classify(shows, reference, |show| {
            self.artist_counterpart_of(show.id, show.venue_id)
        })?;

        Ok(ArtistDetail {
            artist: artist.clone(),
            past_shows_count: timeline.past_count(),
            upcoming_shows_count: timeline.upcoming_count(),
            past_shows: timeline.past,
            upcoming_shows: timeline.upcoming,
        })
    }

    // Artist shown on a venue page.
    fn venue_counterpart_of(&self, show_id: i64, artist_id: i64) -> Result<Counterpart> {
        self.artists
            .get(&artist_id)
            .map(|artist| Counterpart::from(*artist))
            .ok_or(DirectoryError::MalformedInput {
                show_id,
                kind: EntityKind::Artist,
                id: artist_id,
            })
    }

    // Venue shown on an artist page.
    fn artist_counterpart_of(&self, show_id: i64, venue_id: i64) -> Result<Counterpart> {
        self.venues
            .get(&venue_id)
            .map(|venue| Counterpart::from(*venue))
            .ok_or(DirectoryError::MalformedInput {
                show_id,
                kind: EntityKind::Venue,
                id: venue_id,
            })
    }

    pub fn search_venues(&self, query: &str, reference: NaiveDateTime) -> SearchResult {
        let counts = UpcomingCounts::tally(&self.snapshot.shows, reference);
        let result = search(
            self.snapshot.venues.iter().map(Listing::Venue),
            query,
            |entity| counts.for_venue(entity.id()),
        );
        debug!(query, matches = result.count, "searched venues");
        result
    }

    pub fn search_artists(&self, query: &str, reference: NaiveDateTime) -> SearchResult {
        let counts = UpcomingCounts::tally(&self.snapshot.shows, reference);
        let result = search(
            self.snapshot.artists.iter().map(Listing::Artist),
            query,
            |entity| counts.for_artist(entity.id()),
        );
        debug!(query, matches = result.count, "searched artists");
        result
    }

    pub fn artists(&self) -> Vec<ArtistSummary> {
        self.snapshot
            .artists
            .iter()
            .map(|artist| ArtistSummary {
                id: artist.id,
                name: artist.name.clone(),
            })
            .collect()
    }

    pub fn shows(&self) -> Result<Vec<ShowListing>> {
        self.snapshot
            .shows
            .iter()
            .map(|show| {
                let venue = self.artist_counterpart_of(show.id, show.venue_id)?;
                let artist = self.venue_counterpart_of(show.id, show.artist_id)?;
                Ok(ShowListing {
                    show_id: show.id,
                    venue_id: venue.id,
                    venue_name: venue.name,
                    artist_id: artist.id,
                    artist_name: artist.name,
                    artist_image_link: artist.image_link,
                    start_time: format_start_time(show.start_time),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Show;
    use chrono::{Duration, NaiveDate};

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn venue(id: i64, name: &str, city: &str, state: &str) -> Venue {
        Venue {
            id,
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: format!("{id} Main St"),
            phone: None,
            website: None,
            facebook_link: None,
            image_link: Some(format!("https://img.example.com/venue/{id}.jpg")),
            genres: vec!["Jazz".to_string()],
            seeking_talent: false,
            seeking_description: None,
        }
    }

    fn artist(id: i64, name: &str) -> Artist {
        Artist {
            id,
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            phone: None,
            website: None,
            facebook_link: None,
            image_link: Some(format!("https://img.example.com/artist/{id}.jpg")),
            genres: vec!["Rock n Roll".to_string()],
            seeking_venue: true,
            seeking_description: Some("Looking for gigs".to_string()),
        }
    }

    fn show(id: i64, artist_id: i64, venue_id: i64, offset_hours: i64) -> Show {
        Show {
            id,
            artist_id,
            venue_id,
            start_time: reference() + Duration::hours(offset_hours),
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            venues: vec![
                venue(1, "The Musical Hop", "San Francisco", "CA"),
                venue(2, "The Dueling Pianos Bar", "New York", "NY"),
                venue(3, "Park Square Live Music & Coffee", "San Francisco", "CA"),
            ],
            artists: vec![
                artist(4, "Guns N Petals"),
                artist(5, "Matt Quevedo"),
                artist(6, "The Wild Sax Band"),
            ],
            shows: vec![
                show(1, 4, 1, -48),
                show(2, 5, 3, 0),
                show(3, 6, 3, 24),
                show(4, 6, 3, -24),
                show(5, 6, 3, 72),
            ],
        }
    }

    #[test]
    fn rejects_show_with_missing_venue() {
        let mut snap = snapshot();
        snap.shows.push(show(9, 4, 42, 1));

        let err = Directory::new(&snap).err().unwrap();

        assert!(matches!(
            err,
            DirectoryError::MalformedInput {
                show_id: 9,
                kind: EntityKind::Venue,
                id: 42
            }
        ));
    }

    #[test]
    fn rejects_show_with_missing_artist() {
        let mut snap = snapshot();
        snap.shows.push(show(9, 77, 1, 1));

        let err = Directory::new(&snap).err().unwrap();

        assert!(matches!(
            err,
            DirectoryError::MalformedInput {
                kind: EntityKind::Artist,
                id: 77,
                ..
            }
        ));
    }

    #[test]
    fn areas_carry_upcoming_counts() {
        let snap = snapshot();
        let directory = Directory::new(&snap).unwrap();

        let areas = directory.areas(reference());

        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].city, "San Francisco");
        let counts: Vec<(i64, usize)> = areas[0]
            .members
            .iter()
            .map(|v| (v.id, v.num_upcoming_shows))
            .collect();
        assert_eq!(counts, vec![(1, 0), (3, 3)]);
        assert_eq!(areas[1].city, "New York");
        assert_eq!(areas[1].members[0].num_upcoming_shows, 0);
    }

    #[test]
    fn venue_detail_splits_shows() {
        let snap = snapshot();
        let directory = Directory::new(&snap).unwrap();

        let detail = directory.venue_detail(3, reference()).unwrap();

        assert_eq!(detail.venue.name, "Park Square Live Music & Coffee");
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 3);
        assert_eq!(detail.past_shows[0].counterpart.name, "The Wild Sax Band");
        let upcoming: Vec<i64> = detail.upcoming_shows.iter().map(|s| s.show_id).collect();
        assert_eq!(upcoming, vec![2, 3, 5]);
        assert_eq!(detail.upcoming_shows[0].start_time, "2024-03-01 12:00:00");
    }

    #[test]
    fn artist_detail_shows_venues() {
        let snap = snapshot();
        let directory = Directory::new(&snap).unwrap();

        let detail = directory.artist_detail(4, reference()).unwrap();

        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 0);
        let past = &detail.past_shows[0];
        assert_eq!(past.counterpart.id, 1);
        assert_eq!(past.counterpart.name, "The Musical Hop");
        assert_eq!(
            past.counterpart.image_link.as_deref(),
            Some("https://img.example.com/venue/1.jpg")
        );
    }

    #[test]
    fn unknown_detail_ids_are_not_found() {
        let snap = snapshot();
        let directory = Directory::new(&snap).unwrap();

        assert!(matches!(
            directory.venue_detail(99, reference()),
            Err(DirectoryError::NotFound {
                kind: EntityKind::Venue,
                id: 99
            })
        ));
        assert!(matches!(
            directory.artist_detail(99, reference()),
            Err(DirectoryError::NotFound {
                kind: EntityKind::Artist,
                ..
            })
        ));
    }

    #[test]
    fn searches_count_upcoming_shows() {
        let snap = snapshot();
        let directory = Directory::new(&snap).unwrap();

        let venues = directory.search_venues("MUSIC", reference());
        assert_eq!(venues.count, 2);
        assert_eq!(venues.matches[0].id, 1);
        assert_eq!(venues.matches[1].num_upcoming_shows, 3);

        let artists = directory.search_artists("band", reference());
        assert_eq!(artists.count, 1);
        assert_eq!(artists.matches[0].num_upcoming_shows, 2);
    }

    #[test]
    fn listings_follow_snapshot_order() {
        let snap = snapshot();
        let directory = Directory::new(&snap).unwrap();

        let artists: Vec<i64> = directory.artists().iter().map(|a| a.id).collect();
        assert_eq!(artists, vec![4, 5, 6]);

        let shows = directory.shows().unwrap();
        assert_eq!(shows.len(), 5);
        assert_eq!(shows[0].venue_name, "The Musical Hop");
        assert_eq!(shows[0].artist_name, "Guns N Petals");
        assert_eq!(shows[0].start_time, "2024-02-28 12:00:00");
    }

    #[test]
    fn pages_are_identical_across_calls() {
        let snap = snapshot();
        let directory = Directory::new(&snap).unwrap();

        assert_eq!(directory.areas(reference()), directory.areas(reference()));
        assert_eq!(
            directory.venue_detail(3, reference()).unwrap(),
            directory.venue_detail(3, reference()).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&directory.search_artists("", reference())).unwrap(),
            serde_json::to_string(&directory.search_artists("", reference())).unwrap()
        );
    }
}
