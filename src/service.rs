use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::db::Store;
use crate::directory::Directory;
use crate::error::{DirectoryError, EntityKind, Result};
use crate::models::{
    AreaGroup, Artist, ArtistDetail, ArtistSummary, SearchResult, ShowListing, Snapshot, Venue,
    VenueDetail,
};

/// One operation per directory page or form. Every call opens the store on
/// the blocking pool; page builders read the clock once.
pub struct DirectoryService<C = SystemClock> {
    database: PathBuf,
    clock: C,
}

impl DirectoryService<SystemClock> {
    pub fn new(database: PathBuf) -> Self {
        Self::with_clock(database, SystemClock)
    }
}

impl<C: Clock> DirectoryService<C> {
    pub fn with_clock(database: PathBuf, clock: C) -> Self {
        Self { database, clock }
    }

    async fn with_store<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.database.clone();
        tokio::task::spawn_blocking(move || -> Result<T> {
            let store = Store::open(&path)?;
            work(&store)
        })
        .await?
    }

    async fn load_snapshot(&self) -> Result<Snapshot> {
        self.with_store(|store| Ok(store.snapshot()?)).await
    }

    pub async fn areas(&self) -> Result<Vec<AreaGroup>> {
        let snapshot = self.load_snapshot().await?;
        let reference = self.clock.now();
        Ok(Directory::new(&snapshot)?.areas(reference))
    }

    pub async fn venue(&self, venue_id: i64) -> Result<VenueDetail> {
        let snapshot = self.load_snapshot().await?;
        let reference = self.clock.now();
        Directory::new(&snapshot)?.venue_detail(venue_id, reference)
    }

    pub async fn artist(&self, artist_id: i64) -> Result<ArtistDetail> {
        let snapshot = self.load_snapshot().await?;
        let reference = self.clock.now();
        Directory::new(&snapshot)?.artist_detail(artist_id, reference)
    }

    pub async fn artists(&self) -> Result<Vec<ArtistSummary>> {
        let snapshot = self.load_snapshot().await?;
        Ok(Directory::new(&snapshot)?.artists())
    }

    pub async fn shows(&self) -> Result<Vec<ShowListing>> {
        let snapshot = self.load_snapshot().await?;
        Directory::new(&snapshot)?.shows()
    }

    pub async fn search_venues(&self, query: &str) -> Result<SearchResult> {
        let snapshot = self.load_snapshot().await?;
        let reference = self.clock.now();
        Ok(Directory::new(&snapshot)?.search_venues(query, reference))
    }

    pub async fn search_artists(&self, query: &str) -> Result<SearchResult> {
        let snapshot = self.load_snapshot().await?;
        let reference = self.clock.now();
        Ok(Directory::new(&snapshot)?.search_artists(query, reference))
    }

    /// Returns the id assigned to the new venue.
    pub async fn create_venue(&self, venue: Venue) -> Result<i64> {
        self.with_store(move |store| Ok(store.create_venue(&venue)?))
            .await
    }

    /// Replaces every field of the venue with id `venue.id`.
    pub async fn update_venue(&self, venue: Venue) -> Result<()> {
        self.with_store(move |store| {
            if store.update_venue(&venue)? {
                Ok(())
            } else {
                Err(DirectoryError::NotFound {
                    kind: EntityKind::Venue,
                    id: venue.id,
                })
            }
        })
        .await
    }

    pub async fn delete_venue(&self, venue_id: i64) -> Result<bool> {
        self.with_store(move |store| Ok(store.delete_venue(venue_id)?))
            .await
    }

    pub async fn create_artist(&self, artist: Artist) -> Result<i64> {
        self.with_store(move |store| Ok(store.create_artist(&artist)?))
            .await
    }

    pub async fn update_artist(&self, artist: Artist) -> Result<()> {
        self.with_store(move |store| {
            if store.update_artist(&artist)? {
                Ok(())
            } else {
                Err(DirectoryError::NotFound {
                    kind: EntityKind::Artist,
                    id: artist.id,
                })
            }
        })
        .await
    }

    pub async fn delete_artist(&self, artist_id: i64) -> Result<bool> {
        self.with_store(move |store| Ok(store.delete_artist(artist_id)?))
            .await
    }

    /// Books an artist at a venue; both must already be listed.
    pub async fn create_show(
        &self,
        artist_id: i64,
        venue_id: i64,
        start_time: NaiveDateTime,
    ) -> Result<i64> {
        self.with_store(move |store| {
            for (kind, id) in [(EntityKind::Artist, artist_id), (EntityKind::Venue, venue_id)] {
                if !store.contains(kind, id)? {
                    return Err(DirectoryError::NotFound { kind, id });
                }
            }
            let id = store.create_show(artist_id, venue_id, start_time)?;
            info!(id, artist_id, venue_id, "show listed");
            Ok(id)
        })
        .await
    }

    pub async fn seed(&self) -> Result<bool> {
        let now = self.clock.now();
        let seeded = self
            .with_store(move |store| Ok(store.seed_if_empty(now)?))
            .await?;
        if seeded {
            info!(database = %self.database.display(), "seeded sample directory");
        } else {
            debug!("store already has venues, skipping seed");
        }
        Ok(seeded)
    }
}
