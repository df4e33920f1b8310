use std::path::Path;

use chrono::{Duration, NaiveDateTime, Timelike};
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use crate::error::EntityKind;
use crate::models::{Artist, Show, Snapshot, Venue};
use crate::utils;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        utils::ensure_parent(path);
        debug!(path = %path.display(), "opening directory store");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> rusqlite::Result<Self> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS venues(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                address TEXT NOT NULL,
                phone TEXT,
                website TEXT,
                facebook_link TEXT,
                image_link TEXT,
                genres TEXT NOT NULL DEFAULT '[]',
                seeking_talent INTEGER NOT NULL DEFAULT 0,
                seeking_description TEXT
            );
            CREATE TABLE IF NOT EXISTS artists(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                phone TEXT,
                website TEXT,
                facebook_link TEXT,
                image_link TEXT,
                genres TEXT NOT NULL DEFAULT '[]',
                seeking_venue INTEGER NOT NULL DEFAULT 0,
                seeking_description TEXT
            );
            CREATE TABLE IF NOT EXISTS shows(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                artist_id INTEGER NOT NULL REFERENCES artists(id) ON DELETE CASCADE,
                venue_id INTEGER NOT NULL REFERENCES venues(id) ON DELETE CASCADE,
                start_time TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Inserts the venue and returns the id the store assigned; `venue.id`
    /// is ignored.
    pub fn create_venue(&self, venue: &Venue) -> rusqlite::Result<i64> {
        self.conn.execute(
            "INSERT INTO venues (name, city, state, address, phone, website, facebook_link,
                                 image_link, genres, seeking_talent, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                venue.website,
                venue.facebook_link,
                venue.image_link,
                encode_genres(&venue.genres),
                venue.seeking_talent,
                venue.seeking_description
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, name = %venue.name, "venue listed");
        Ok(id)
    }

    /// Returns false when no venue has that id.
    pub fn update_venue(&self, venue: &Venue) -> rusqlite::Result<bool> {
        let changed = self.conn.execute(
            "UPDATE venues SET name = ?2, city = ?3, state = ?4, address = ?5, phone = ?6,
                               website = ?7, facebook_link = ?8, image_link = ?9, genres = ?10,
                               seeking_talent = ?11, seeking_description = ?12
             WHERE id = ?1",
            params![
                venue.id,
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                venue.website,
                venue.facebook_link,
                venue.image_link,
                encode_genres(&venue.genres),
                venue.seeking_talent,
                venue.seeking_description
            ],
        )?;
        Ok(changed > 0)
    }

    /// Removes the venue together with all of its shows.
    pub fn delete_venue(&self, id: i64) -> rusqlite::Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM venues WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!(id, "venue removed");
        }
        Ok(changed > 0)
    }

    pub fn create_artist(&self, artist: &Artist) -> rusqlite::Result<i64> {
        self.conn.execute(
            "INSERT INTO artists (name, city, state, phone, website, facebook_link, image_link,
                                  genres, seeking_venue, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                artist.website,
                artist.facebook_link,
                artist.image_link,
                encode_genres(&artist.genres),
                artist.seeking_venue,
                artist.seeking_description
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, name = %artist.name, "artist listed");
        Ok(id)
    }

    pub fn update_artist(&self, artist: &Artist) -> rusqlite::Result<bool> {
        let changed = self.conn.execute(
            "UPDATE artists SET name = ?2, city = ?3, state = ?4, phone = ?5, website = ?6,
                                facebook_link = ?7, image_link = ?8, genres = ?9,
                                seeking_venue = ?10, seeking_description = ?11
             WHERE id = ?1",
            params![
                artist.id,
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                artist.website,
                artist.facebook_link,
                artist.image_link,
                encode_genres(&artist.genres),
                artist.seeking_venue,
                artist.seeking_description
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_artist(&self, id: i64) -> rusqlite::Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM artists WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!(id, "artist removed");
        }
        Ok(changed > 0)
    }

    /// Fails with a constraint violation if either id is unknown.
    pub fn create_show(
        &self,
        artist_id: i64,
        venue_id: i64,
        start_time: NaiveDateTime,
    ) -> rusqlite::Result<i64> {
        self.conn.execute(
            "INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?1, ?2, ?3)",
            params![artist_id, venue_id, start_time],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn contains(&self, kind: EntityKind, id: i64) -> rusqlite::Result<bool> {
        let sql = match kind {
            EntityKind::Venue => "SELECT EXISTS(SELECT 1 FROM venues WHERE id = ?1)",
            EntityKind::Artist => "SELECT EXISTS(SELECT 1 FROM artists WHERE id = ?1)",
        };
        self.conn.query_row(sql, params![id], |row| row.get(0))
    }

    pub fn snapshot(&self) -> rusqlite::Result<Snapshot> {
        let venues = self.query_all("SELECT * FROM venues ORDER BY id", venue_from_row)?;
        let artists = self.query_all("SELECT * FROM artists ORDER BY id", artist_from_row)?;
        let shows = self.query_all(
            "SELECT id, artist_id, venue_id, start_time FROM shows ORDER BY id",
            |row| {
                Ok(Show {
                    id: row.get(0)?,
                    artist_id: row.get(1)?,
                    venue_id: row.get(2)?,
                    start_time: row.get(3)?,
                })
            },
        )?;
        debug!(
            venues = venues.len(),
            artists = artists.len(),
            shows = shows.len(),
            "loaded snapshot"
        );
        Ok(Snapshot {
            venues,
            artists,
            shows,
        })
    }

    fn query_all<T, F>(&self, sql: &str, map: F) -> rusqlite::Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], map)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Lists a few venues, artists and shows around `now` when the store holds
    /// no venues yet. Returns whether anything was inserted.
    pub fn seed_if_empty(&self, now: NaiveDateTime) -> rusqlite::Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM venues", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }

        let hop = self.create_venue(&sample_venue(
            "The Musical Hop",
            "San Francisco",
            "CA",
            "1015 Folsom Street",
        ))?;
        let pianos = self.create_venue(&sample_venue(
            "The Dueling Pianos Bar",
            "New York",
            "NY",
            "335 Delancey Street",
        ))?;
        let square = self.create_venue(&sample_venue(
            "Park Square Live Music & Coffee",
            "San Francisco",
            "CA",
            "34 Whiskey Moore Ave",
        ))?;

        let petals = self.create_artist(&sample_artist("Guns N Petals", "San Francisco", "CA"))?;
        let quevedo = self.create_artist(&sample_artist("Matt Quevedo", "New York", "NY"))?;
        let sax = self.create_artist(&sample_artist("The Wild Sax Band", "San Francisco", "CA"))?;

        let now = now.with_nanosecond(0).unwrap_or(now);
        self.create_show(petals, hop, now - Duration::days(30))?;
        self.create_show(quevedo, square, now - Duration::days(7))?;
        self.create_show(sax, square, now + Duration::days(3))?;
        self.create_show(sax, square, now + Duration::days(10))?;
        self.create_show(petals, pianos, now + Duration::days(21))?;

        Ok(true)
    }
}

fn encode_genres(genres: &[String]) -> String {
    serde_json::Value::from(genres.to_vec()).to_string()
}

fn decode_genres(row: &Row<'_>, column: &str) -> rusqlite::Result<Vec<String>> {
    let payload: String = row.get(column)?;
    serde_json::from_str(&payload).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            payload.len(),
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get("id")?,
        name: row.get("name")?,
        city: row.get("city")?,
        state: row.get("state")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        website: row.get("website")?,
        facebook_link: row.get("facebook_link")?,
        image_link: row.get("image_link")?,
        genres: decode_genres(row, "genres")?,
        seeking_talent: row.get("seeking_talent")?,
        seeking_description: row.get("seeking_description")?,
    })
}

fn artist_from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get("id")?,
        name: row.get("name")?,
        city: row.get("city")?,
        state: row.get("state")?,
        phone: row.get("phone")?,
        website: row.get("website")?,
        facebook_link: row.get("facebook_link")?,
        image_link: row.get("image_link")?,
        genres: decode_genres(row, "genres")?,
        seeking_venue: row.get("seeking_venue")?,
        seeking_description: row.get("seeking_description")?,
    })
}

fn sample_venue(name: &str, city: &str, state: &str, address: &str) -> Venue {
    Venue {
        id: 0,
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: address.to_string(),
        phone: Some("123-123-1234".to_string()),
        website: None,
        facebook_link: None,
        image_link: None,
        genres: vec!["Jazz".to_string(), "Folk".to_string()],
        seeking_talent: true,
        seeking_description: Some("We are on the lookout for a local artist".to_string()),
    }
}

fn sample_artist(name: &str, city: &str, state: &str) -> Artist {
    Artist {
        id: 0,
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: Some("326-123-5000".to_string()),
        website: None,
        facebook_link: None,
        image_link: None,
        genres: vec!["Rock n Roll".to_string()],
        seeking_venue: false,
        seeking_description: None,
    }
}
