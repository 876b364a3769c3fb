use crate::{
    config::Config,
    error::Error,
    review::{NewReview, Review},
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{Connection, PgConnection};

const RECENT_REVIEWS: &str = "
    SELECT id, username, rating, comment, created_at
    FROM reviews
    ORDER BY created_at DESC
    LIMIT $1
";

const INSERT_REVIEW: &str = "
    INSERT INTO reviews (username, rating, comment)
    VALUES ($1, $2, $3)
    RETURNING id, created_at
";

/// One open connection to the reviews table, scoped to a single invocation.
#[async_trait]
pub trait Store: Send {
    /// Up to `limit` reviews, newest first.
    async fn recent(&mut self, limit: i64) -> Result<Vec<Review>, Error>;

    /// Inserts and commits `review`, returning the stored row.
    async fn insert(&mut self, review: &NewReview) -> Result<Review, Error>;

    async fn close(self) -> Result<(), Error>
    where
        Self: Sized;
}

/// Opens a fresh `Store` per invocation.
#[async_trait]
pub trait Connect: Send + Sync {
    type Store: Store;

    async fn connect(&self, config: &Config) -> Result<Self::Store, Error>;
}

pub struct Postgres;

#[async_trait]
impl Connect for Postgres {
    type Store = PgStore;

    async fn connect(&self, config: &Config) -> Result<PgStore, Error> {
        let conn = PgConnection::connect(config.database_url()?).await?;
        Ok(PgStore { conn })
    }
}

pub struct PgStore {
    conn: PgConnection,
}

#[async_trait]
impl Store for PgStore {
    async fn recent(&mut self, limit: i64) -> Result<Vec<Review>, Error> {
        let reviews = sqlx::query_as::<_, Review>(RECENT_REVIEWS)
            .bind(limit)
            .fetch_all(&mut self.conn)
            .await?;
        log::debug!("fetched {} reviews", reviews.len());
        Ok(reviews)
    }

    async fn insert(&mut self, review: &NewReview) -> Result<Review, Error> {
        let mut tx = self.conn.begin().await?;
        let (id, created_at): (i32, Option<NaiveDateTime>) = sqlx::query_as(INSERT_REVIEW)
            .bind(&review.username)
            .bind(review.rating)
            .bind(&review.comment)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        log::debug!("inserted review {}", id);
        Ok(Review {
            id,
            username: review.username.clone(),
            rating: review.rating,
            comment: review.comment.clone(),
            created_at,
        })
    }

    async fn close(self) -> Result<(), Error> {
        self.conn.close().await?;
        Ok(())
    }
}
