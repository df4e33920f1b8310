use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Venue {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Artist {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

/// A booking of one artist at one venue. Start times carry no timezone.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Show {
    pub id: i64,
    pub artist_id: i64,
    pub venue_id: i64,
    pub start_time: NaiveDateTime,
}

/// Point-in-time set of entities handed to the engine for one request.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Snapshot {
    pub venues: Vec<Venue>,
    pub artists: Vec<Artist>,
    pub shows: Vec<Show>,
}

/// Anything that can be listed and searched by name.
#[derive(Clone, Copy, Debug)]
pub enum Listing<'a> {
    Venue(&'a Venue),
    Artist(&'a Artist),
}

impl<'a> Listing<'a> {
    pub fn id(&self) -> i64 {
        match self {
            Listing::Venue(venue) => venue.id,
            Listing::Artist(artist) => artist.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Listing::Venue(venue) => &venue.name,
            Listing::Artist(artist) => &artist.name,
        }
    }
}

/// The other side of a show: the artist on a venue page, the venue on an
/// artist page.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Counterpart {
    pub id: i64,
    pub name: String,
    pub image_link: Option<String>,
}

impl From<&Venue> for Counterpart {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name.clone(),
            image_link: venue.image_link.clone(),
        }
    }
}

impl From<&Artist> for Counterpart {
    fn from(artist: &Artist) -> Self {
        Self {
            id: artist.id,
            name: artist.name.clone(),
            image_link: artist.image_link.clone(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedShow {
    pub show_id: i64,
    pub counterpart: Counterpart,
    pub start_time: String, // YYYY-MM-DD HH:MM:SS
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AreaGroup {
    pub city: String,
    pub state: String,
    pub members: Vec<VenueSummary>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MatchSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub count: usize,
    pub matches: Vec<MatchSummary>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<ClassifiedShow>,
    pub upcoming_shows: Vec<ClassifiedShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<ClassifiedShow>,
    pub upcoming_shows: Vec<ClassifiedShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ShowListing {
    pub show_id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}
