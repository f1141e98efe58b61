//! Catalog Use Cases
//!
//! Categories, genres and titles. Reads are public; every write is
//! admin-gated through the authorization evaluator. Titles resolve
//! their genre/category slugs at write time and carry a derived rating
//! at read time.

use std::collections::BTreeMap;
use std::sync::Arc;

use auth::policy::{Action, Actor, Decision, ResourceKind, can_perform};
use chrono::{Datelike, Utc};

use crate::domain::entity::{
    category::Category, genre::Genre,
    title::{Title, TitleDraft},
};
use crate::domain::repository::{CatalogRepository, TitleFilter};
use crate::domain::value_object::slug::Slug;
use crate::error::{ReviewsError, ReviewsResult};

/// Maximum name length for catalog entities
const NAME_MAX_LENGTH: usize = 256;

/// Create input for a category or genre
pub struct ClassifierInput {
    pub name: String,
    pub slug: String,
}

/// Title create input; genre and category arrive as slugs
pub struct CreateTitleInput {
    pub name: String,
    pub year: Option<i16>,
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub category: Option<String>,
}

/// Title partial update input; absent fields stay unchanged
#[derive(Default)]
pub struct UpdateTitleInput {
    pub name: Option<String>,
    pub year: Option<i16>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Catalog use case
pub struct CatalogUseCase<C>
where
    C: CatalogRepository,
{
    catalog: Arc<C>,
}

impl<C> CatalogUseCase<C>
where
    C: CatalogRepository,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn list_categories(&self, search: Option<&str>) -> ReviewsResult<Vec<Category>> {
        self.catalog.list_categories(search).await
    }

    pub async fn create_category(
        &self,
        actor: &Actor,
        input: ClassifierInput,
    ) -> ReviewsResult<Category> {
        authorize(actor, Action::Create)?;
        let (name, slug) = validate_classifier(input)?;
        self.catalog.create_category(&name, &slug).await
    }

    pub async fn delete_category(&self, actor: &Actor, slug: &str) -> ReviewsResult<()> {
        authorize(actor, Action::Delete)?;
        let Ok(slug) = Slug::new(slug) else {
            return Err(ReviewsError::CategoryNotFound);
        };
        if !self.catalog.delete_category_by_slug(&slug).await? {
            return Err(ReviewsError::CategoryNotFound);
        }
        Ok(())
    }

    // ========================================================================
    // Genres
    // ========================================================================

    pub async fn list_genres(&self, search: Option<&str>) -> ReviewsResult<Vec<Genre>> {
        self.catalog.list_genres(search).await
    }

    pub async fn create_genre(
        &self,
        actor: &Actor,
        input: ClassifierInput,
    ) -> ReviewsResult<Genre> {
        authorize(actor, Action::Create)?;
        let (name, slug) = validate_classifier(input)?;
        self.catalog.create_genre(&name, &slug).await
    }

    pub async fn delete_genre(&self, actor: &Actor, slug: &str) -> ReviewsResult<()> {
        authorize(actor, Action::Delete)?;
        let Ok(slug) = Slug::new(slug) else {
            return Err(ReviewsError::GenreNotFound);
        };
        if !self.catalog.delete_genre_by_slug(&slug).await? {
            return Err(ReviewsError::GenreNotFound);
        }
        Ok(())
    }

    // ========================================================================
    // Titles
    // ========================================================================

    pub async fn list_titles(&self, filter: &TitleFilter) -> ReviewsResult<Vec<Title>> {
        self.catalog.list_titles(filter).await
    }

    pub async fn get_title(&self, title_id: i64) -> ReviewsResult<Title> {
        self.catalog
            .find_title(title_id)
            .await?
            .ok_or(ReviewsError::TitleNotFound)
    }

    pub async fn create_title(
        &self,
        actor: &Actor,
        input: CreateTitleInput,
    ) -> ReviewsResult<Title> {
        authorize(actor, Action::Create)?;

        let mut fields = BTreeMap::new();
        validate_name(&input.name, &mut fields);
        validate_year(input.year, &mut fields);
        if !fields.is_empty() {
            return Err(ReviewsError::Validation(fields));
        }

        let draft = TitleDraft {
            name: input.name,
            year: input.year,
            description: input.description.unwrap_or_default(),
            genre_ids: self.resolve_genres(&input.genre).await?,
            category_id: self.resolve_category(input.category.as_deref()).await?,
        };

        let title = self.catalog.create_title(&draft).await?;

        tracing::info!(title_id = title.id, name = %title.name, "Title created");

        Ok(title)
    }

    pub async fn update_title(
        &self,
        actor: &Actor,
        title_id: i64,
        input: UpdateTitleInput,
    ) -> ReviewsResult<Title> {
        authorize(actor, Action::Update)?;

        let existing = self.get_title(title_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let year = input.year.or(existing.year);

        let mut fields = BTreeMap::new();
        validate_name(&name, &mut fields);
        validate_year(year, &mut fields);
        if !fields.is_empty() {
            return Err(ReviewsError::Validation(fields));
        }

        let genre_ids = match input.genre {
            Some(slugs) => self.resolve_genres(&slugs).await?,
            None => existing.genres.iter().map(|g| g.id).collect(),
        };
        let category_id = match input.category {
            Some(slug) => self.resolve_category(Some(&slug)).await?,
            None => existing.category.map(|c| c.id),
        };

        let draft = TitleDraft {
            name,
            year,
            description: input.description.unwrap_or(existing.description),
            genre_ids,
            category_id,
        };

        self.catalog
            .update_title(title_id, &draft)
            .await?
            .ok_or(ReviewsError::TitleNotFound)
    }

    pub async fn delete_title(&self, actor: &Actor, title_id: i64) -> ReviewsResult<()> {
        authorize(actor, Action::Delete)?;
        if !self.catalog.delete_title(title_id).await? {
            return Err(ReviewsError::TitleNotFound);
        }
        Ok(())
    }

    /// Resolve genre slugs to ids; unknown slugs are a validation failure
    async fn resolve_genres(&self, slugs: &[String]) -> ReviewsResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(slugs.len());
        for raw in slugs {
            let genre = match Slug::new(raw) {
                Ok(slug) => self.catalog.find_genre_by_slug(&slug).await?,
                Err(_) => None,
            };
            match genre {
                Some(genre) => ids.push(genre.id),
                None => {
                    return Err(ReviewsError::field(
                        "genre",
                        format!("Unknown genre slug: {raw}"),
                    ));
                }
            }
        }
        Ok(ids)
    }

    /// Resolve a category slug to an id; unknown slug is a validation
    /// failure
    async fn resolve_category(&self, slug: Option<&str>) -> ReviewsResult<Option<i64>> {
        let Some(raw) = slug else {
            return Ok(None);
        };
        let category = match Slug::new(raw) {
            Ok(slug) => self.catalog.find_category_by_slug(&slug).await?,
            Err(_) => None,
        };
        match category {
            Some(category) => Ok(Some(category.id)),
            None => Err(ReviewsError::field(
                "category",
                format!("Unknown category slug: {raw}"),
            )),
        }
    }
}

fn authorize(actor: &Actor, action: Action) -> ReviewsResult<()> {
    match can_perform(actor, action, ResourceKind::Catalog, None) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => Err(reason.into()),
    }
}

fn validate_classifier(input: ClassifierInput) -> ReviewsResult<(String, Slug)> {
    let mut fields = BTreeMap::new();
    validate_name(&input.name, &mut fields);
    let slug = match Slug::new(&input.slug) {
        Ok(slug) => Some(slug),
        Err(e) => {
            fields.insert("slug".to_string(), e.to_string());
            None
        }
    };
    match slug {
        Some(slug) if fields.is_empty() => Ok((input.name, slug)),
        _ => Err(ReviewsError::Validation(fields)),
    }
}

fn validate_name(name: &str, fields: &mut BTreeMap<String, String>) {
    if name.trim().is_empty() {
        fields.insert("name".to_string(), "Name cannot be empty".to_string());
    } else if name.chars().count() > NAME_MAX_LENGTH {
        fields.insert(
            "name".to_string(),
            format!("Name must be at most {NAME_MAX_LENGTH} characters"),
        );
    }
}

fn validate_year(year: Option<i16>, fields: &mut BTreeMap<String, String>) {
    if let Some(year) = year {
        let current = Utc::now().year() as i16;
        if year > current {
            fields.insert(
                "year".to_string(),
                format!("Year cannot be in the future (got {year})"),
            );
        }
    }
}
