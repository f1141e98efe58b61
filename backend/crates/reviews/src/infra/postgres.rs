//! PostgreSQL Repository Implementations
//!
//! One repository struct backs all three content ports. Ratings are
//! computed with `AVG(score)` at query time; the uniqueness invariants
//! live in the schema and are translated back into domain errors here.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use auth::models::user_id::UserId;

use crate::domain::entity::{
    category::Category, comment::Comment, genre::Genre, review::Review,
    title::{Title, TitleDraft},
};
use crate::domain::repository::{
    CatalogRepository, CommentRepository, ReviewRepository, TitleFilter,
};
use crate::domain::value_object::{score::Score, slug::Slug};
use crate::error::{ReviewsError, ReviewsResult};

/// PostgreSQL-backed content repository
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Slug uniqueness is schema-enforced; translate the violation
fn map_slug_violation(err: sqlx::Error) -> ReviewsError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                && matches!(db.constraint(), Some("uq_categories_slug" | "uq_genres_slug")) =>
        {
            ReviewsError::SlugTaken
        }
        _ => ReviewsError::Database(err),
    }
}

/// The (title, author) constraint is the serialization point for
/// concurrent review creation; the loser gets the same error as the
/// application pre-check
fn map_review_violation(err: sqlx::Error) -> ReviewsError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                && db.constraint() == Some("uq_reviews_title_author") =>
        {
            ReviewsError::DuplicateReview
        }
        _ => ReviewsError::Database(err),
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ClassifierRow {
    id: i64,
    name: String,
    slug: String,
}

impl ClassifierRow {
    fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name,
            slug: Slug::from_db(self.slug),
        }
    }

    fn into_genre(self) -> Genre {
        Genre {
            id: self.id,
            name: self.name,
            slug: Slug::from_db(self.slug),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TitleRow {
    id: i64,
    name: String,
    year: Option<i16>,
    description: String,
    rating: Option<f64>,
    category_id: Option<i64>,
    category_name: Option<String>,
    category_slug: Option<String>,
}

impl TitleRow {
    fn into_title(self, genres: Vec<Genre>) -> Title {
        let category = match (self.category_id, self.category_name, self.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Category {
                id,
                name,
                slug: Slug::from_db(slug),
            }),
            _ => None,
        };

        Title {
            id: self.id,
            name: self.name,
            year: self.year,
            description: self.description,
            rating: self.rating,
            genres,
            category,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    title_id: i64,
    title_name: String,
    author_id: Uuid,
    author_username: String,
    text: String,
    score: i16,
    pub_date: DateTime<Utc>,
}

impl ReviewRow {
    fn into_review(self) -> Review {
        Review {
            id: self.id,
            title_id: self.title_id,
            title_name: self.title_name,
            author_id: UserId::from_uuid(self.author_id),
            author_username: self.author_username,
            text: self.text,
            score: Score::from_db(self.score),
            pub_date: self.pub_date,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    review_id: i64,
    review_text: String,
    author_id: Uuid,
    author_username: String,
    text: String,
    pub_date: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            review_id: self.review_id,
            review_text: self.review_text,
            author_id: UserId::from_uuid(self.author_id),
            author_username: self.author_username,
            text: self.text,
            pub_date: self.pub_date,
        }
    }
}

const TITLE_SELECT: &str = r#"
    SELECT
        t.id,
        t.name,
        t.year,
        t.description,
        AVG(r.score)::float8 AS rating,
        c.id AS category_id,
        c.name AS category_name,
        c.slug AS category_slug
    FROM titles t
    LEFT JOIN reviews r ON r.title_id = t.id
    LEFT JOIN categories c ON c.id = t.category_id
"#;

const REVIEW_SELECT: &str = r#"
    SELECT
        r.id,
        r.title_id,
        t.name AS title_name,
        r.author_id,
        u.username AS author_username,
        r.text,
        r.score,
        r.pub_date
    FROM reviews r
    JOIN titles t ON t.id = r.title_id
    JOIN users u ON u.user_id = r.author_id
"#;

const COMMENT_SELECT: &str = r#"
    SELECT
        co.id,
        co.review_id,
        r.text AS review_text,
        co.author_id,
        u.username AS author_username,
        co.text,
        co.pub_date
    FROM comments co
    JOIN reviews r ON r.id = co.review_id
    JOIN users u ON u.user_id = co.author_id
"#;

impl PgContentRepository {
    /// Attach genre sets to a batch of title rows
    async fn load_genres(&self, title_ids: &[i64]) -> ReviewsResult<HashMap<i64, Vec<Genre>>> {
        #[derive(sqlx::FromRow)]
        struct LinkRow {
            title_id: i64,
            id: i64,
            name: String,
            slug: String,
        }

        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT tg.title_id, g.id, g.name, g.slug
            FROM title_genres tg
            JOIN genres g ON g.id = tg.genre_id
            WHERE tg.title_id = ANY($1)
            ORDER BY g.name
            "#,
        )
        .bind(title_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_title: HashMap<i64, Vec<Genre>> = HashMap::new();
        for row in rows {
            by_title.entry(row.title_id).or_default().push(Genre {
                id: row.id,
                name: row.name,
                slug: Slug::from_db(row.slug),
            });
        }
        Ok(by_title)
    }
}

// ============================================================================
// Catalog Repository Implementation
// ============================================================================

impl CatalogRepository for PgContentRepository {
    async fn list_categories(&self, search: Option<&str>) -> ReviewsResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, ClassifierRow>(
            r#"
            SELECT id, name, slug FROM categories
            WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'
            ORDER BY name
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ClassifierRow::into_category).collect())
    }

    async fn create_category(&self, name: &str, slug: &Slug) -> ReviewsResult<Category> {
        let row = sqlx::query_as::<_, ClassifierRow>(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(name)
        .bind(slug.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_slug_violation)?;

        Ok(row.into_category())
    }

    async fn find_category_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Category>> {
        let row = sqlx::query_as::<_, ClassifierRow>(
            "SELECT id, name, slug FROM categories WHERE slug = $1",
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ClassifierRow::into_category))
    }

    async fn delete_category_by_slug(&self, slug: &Slug) -> ReviewsResult<bool> {
        let deleted = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_genres(&self, search: Option<&str>) -> ReviewsResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, ClassifierRow>(
            r#"
            SELECT id, name, slug FROM genres
            WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'
            ORDER BY name
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ClassifierRow::into_genre).collect())
    }

    async fn create_genre(&self, name: &str, slug: &Slug) -> ReviewsResult<Genre> {
        let row = sqlx::query_as::<_, ClassifierRow>(
            "INSERT INTO genres (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(name)
        .bind(slug.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_slug_violation)?;

        Ok(row.into_genre())
    }

    async fn find_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<Option<Genre>> {
        let row = sqlx::query_as::<_, ClassifierRow>(
            "SELECT id, name, slug FROM genres WHERE slug = $1",
        )
        .bind(slug.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ClassifierRow::into_genre))
    }

    async fn delete_genre_by_slug(&self, slug: &Slug) -> ReviewsResult<bool> {
        let deleted = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_titles(&self, filter: &TitleFilter) -> ReviewsResult<Vec<Title>> {
        let rows = sqlx::query_as::<_, TitleRow>(&format!(
            r#"
            {TITLE_SELECT}
            WHERE ($1::text IS NULL OR EXISTS (
                    SELECT 1 FROM title_genres tg
                    JOIN genres g ON g.id = tg.genre_id
                    WHERE tg.title_id = t.id AND g.slug = $1))
              AND ($2::text IS NULL OR c.slug = $2)
              AND ($3::smallint IS NULL OR t.year = $3)
              AND ($4::text IS NULL OR t.name = $4)
            GROUP BY t.id, c.id
            ORDER BY t.name
            "#
        ))
        .bind(filter.genre_slug.as_deref())
        .bind(filter.category_slug.as_deref())
        .bind(filter.year)
        .bind(filter.name.as_deref())
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut genres = self.load_genres(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let title_genres = genres.remove(&row.id).unwrap_or_default();
                row.into_title(title_genres)
            })
            .collect())
    }

    async fn find_title(&self, title_id: i64) -> ReviewsResult<Option<Title>> {
        let row = sqlx::query_as::<_, TitleRow>(&format!(
            "{TITLE_SELECT} WHERE t.id = $1 GROUP BY t.id, c.id"
        ))
        .bind(title_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut genres = self.load_genres(&[row.id]).await?;
        let title_genres = genres.remove(&row.id).unwrap_or_default();

        Ok(Some(row.into_title(title_genres)))
    }

    async fn create_title(&self, draft: &TitleDraft) -> ReviewsResult<Title> {
        let title_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(draft.year)
        .bind(&draft.description)
        .bind(draft.category_id)
        .fetch_one(&self.pool)
        .await?;

        self.replace_genre_links(title_id, &draft.genre_ids).await?;

        self.find_title(title_id)
            .await?
            .ok_or_else(|| ReviewsError::Internal("Created title vanished".to_string()))
    }

    async fn update_title(
        &self,
        title_id: i64,
        draft: &TitleDraft,
    ) -> ReviewsResult<Option<Title>> {
        let updated = sqlx::query(
            r#"
            UPDATE titles SET
                name = $2,
                year = $3,
                description = $4,
                category_id = $5
            WHERE id = $1
            "#,
        )
        .bind(title_id)
        .bind(&draft.name)
        .bind(draft.year)
        .bind(&draft.description)
        .bind(draft.category_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        self.replace_genre_links(title_id, &draft.genre_ids).await?;

        self.find_title(title_id).await
    }

    async fn delete_title(&self, title_id: i64) -> ReviewsResult<bool> {
        let deleted = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(title_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

impl PgContentRepository {
    async fn replace_genre_links(&self, title_id: i64, genre_ids: &[i64]) -> ReviewsResult<()> {
        sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
            .bind(title_id)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO title_genres (title_id, genre_id)
            SELECT $1, genre_id FROM UNNEST($2::bigint[]) AS genre_id
            "#,
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Review Repository Implementation
// ============================================================================

impl ReviewRepository for PgContentRepository {
    async fn list_for_title(&self, title_id: i64) -> ReviewsResult<Vec<Review>> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "{REVIEW_SELECT} WHERE r.title_id = $1 ORDER BY r.id"
        ))
        .bind(title_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReviewRow::into_review).collect())
    }

    async fn find_for_title(
        &self,
        title_id: i64,
        review_id: i64,
    ) -> ReviewsResult<Option<Review>> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "{REVIEW_SELECT} WHERE r.title_id = $1 AND r.id = $2"
        ))
        .bind(title_id)
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReviewRow::into_review))
    }

    async fn exists_for_author(&self, title_id: i64, author_id: &UserId) -> ReviewsResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2)",
        )
        .bind(title_id)
        .bind(author_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(
        &self,
        title_id: i64,
        author_id: &UserId,
        text: &str,
        score: Score,
    ) -> ReviewsResult<Review> {
        let review_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO reviews (title_id, author_id, text, score, pub_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(title_id)
        .bind(author_id.as_uuid())
        .bind(text)
        .bind(score.value())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_review_violation)?;

        self.find_for_title(title_id, review_id)
            .await?
            .ok_or_else(|| ReviewsError::Internal("Created review vanished".to_string()))
    }

    async fn update(&self, review_id: i64, text: &str, score: Score) -> ReviewsResult<()> {
        sqlx::query("UPDATE reviews SET text = $2, score = $3 WHERE id = $1")
            .bind(review_id)
            .bind(text)
            .bind(score.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, review_id: i64) -> ReviewsResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgContentRepository {
    async fn list_for_review(&self, review_id: i64) -> ReviewsResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} WHERE co.review_id = $1 ORDER BY co.id"
        ))
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn find_for_review(
        &self,
        review_id: i64,
        comment_id: i64,
    ) -> ReviewsResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "{COMMENT_SELECT} WHERE co.review_id = $1 AND co.id = $2"
        ))
        .bind(review_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn create(
        &self,
        review_id: i64,
        author_id: &UserId,
        text: &str,
    ) -> ReviewsResult<Comment> {
        let comment_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments (review_id, author_id, text, pub_date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(review_id)
        .bind(author_id.as_uuid())
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        self.find_for_review(review_id, comment_id)
            .await?
            .ok_or_else(|| ReviewsError::Internal("Created comment vanished".to_string()))
    }

    async fn update(&self, comment_id: i64, text: &str) -> ReviewsResult<()> {
        sqlx::query("UPDATE comments SET text = $2 WHERE id = $1")
            .bind(comment_id)
            .bind(text)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, comment_id: i64) -> ReviewsResult<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
