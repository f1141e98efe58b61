//! HTTP Handlers
//!
//! Thin translation between the wire and the use cases. The actor comes
//! from the identity-resolution middleware (an absent extension means
//! the middleware is not mounted, which reads as anonymous).

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use auth::middleware::CurrentUser;
use auth::policy::Actor;

use crate::application::{
    CatalogUseCase, ClassifierInput, CommentsUseCase, CreateCommentInput, CreateReviewInput,
    CreateTitleInput, ReviewsUseCase, UpdateCommentInput, UpdateReviewInput, UpdateTitleInput,
};
use crate::domain::repository::{
    CatalogRepository, CommentRepository, ReviewRepository, TitleFilter,
};
use crate::error::ReviewsResult;
use crate::presentation::dto::{
    CategoryResponse, ClassifierRequest, CommentResponse, CreateCommentRequest,
    CreateReviewRequest, CreateTitleRequest, GenreResponse, ReviewResponse, SearchQuery,
    TitleListQuery, TitleResponse, UpdateCommentRequest, UpdateReviewRequest, UpdateTitleRequest,
};

/// Shared state for content handlers
#[derive(Clone)]
pub struct ContentAppState<S>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<S>,
}

/// The actor of the request; anonymous when the identity middleware is
/// absent or resolved nothing
fn actor_of(current: &Option<Extension<CurrentUser>>) -> Actor {
    current
        .as_ref()
        .map(|Extension(user)| user.actor())
        .unwrap_or(Actor::Anonymous)
}

// ============================================================================
// Categories
// ============================================================================

/// GET /categories
pub async fn list_categories<S>(
    State(state): State<ContentAppState<S>>,
    Query(query): Query<SearchQuery>,
) -> ReviewsResult<Json<Vec<CategoryResponse>>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let categories = CatalogUseCase::new(state.repo.clone())
        .list_categories(query.search.as_deref())
        .await?;

    Ok(Json(categories.iter().map(CategoryResponse::from).collect()))
}

/// POST /categories
pub async fn create_category<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Json(req): Json<ClassifierRequest>,
) -> ReviewsResult<(StatusCode, Json<CategoryResponse>)>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let category = CatalogUseCase::new(state.repo.clone())
        .create_category(
            &actor_of(&current),
            ClassifierInput {
                name: req.name,
                slug: req.slug,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(&category))))
}

/// DELETE /categories/{slug}
pub async fn delete_category<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path(slug): Path<String>,
) -> ReviewsResult<StatusCode>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    CatalogUseCase::new(state.repo.clone())
        .delete_category(&actor_of(&current), &slug)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Genres
// ============================================================================

/// GET /genres
pub async fn list_genres<S>(
    State(state): State<ContentAppState<S>>,
    Query(query): Query<SearchQuery>,
) -> ReviewsResult<Json<Vec<GenreResponse>>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let genres = CatalogUseCase::new(state.repo.clone())
        .list_genres(query.search.as_deref())
        .await?;

    Ok(Json(genres.iter().map(GenreResponse::from).collect()))
}

/// POST /genres
pub async fn create_genre<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Json(req): Json<ClassifierRequest>,
) -> ReviewsResult<(StatusCode, Json<GenreResponse>)>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let genre = CatalogUseCase::new(state.repo.clone())
        .create_genre(
            &actor_of(&current),
            ClassifierInput {
                name: req.name,
                slug: req.slug,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(GenreResponse::from(&genre))))
}

/// DELETE /genres/{slug}
pub async fn delete_genre<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path(slug): Path<String>,
) -> ReviewsResult<StatusCode>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    CatalogUseCase::new(state.repo.clone())
        .delete_genre(&actor_of(&current), &slug)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Titles
// ============================================================================

/// GET /titles
pub async fn list_titles<S>(
    State(state): State<ContentAppState<S>>,
    Query(query): Query<TitleListQuery>,
) -> ReviewsResult<Json<Vec<TitleResponse>>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let filter = TitleFilter {
        genre_slug: query.genre,
        category_slug: query.category,
        year: query.year,
        name: query.name,
    };

    let titles = CatalogUseCase::new(state.repo.clone())
        .list_titles(&filter)
        .await?;

    Ok(Json(titles.iter().map(TitleResponse::from).collect()))
}

/// POST /titles
pub async fn create_title<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Json(req): Json<CreateTitleRequest>,
) -> ReviewsResult<(StatusCode, Json<TitleResponse>)>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let title = CatalogUseCase::new(state.repo.clone())
        .create_title(
            &actor_of(&current),
            CreateTitleInput {
                name: req.name,
                year: req.year,
                description: req.description,
                genre: req.genre,
                category: req.category,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TitleResponse::from(&title))))
}

/// GET /titles/{title_id}
pub async fn get_title<S>(
    State(state): State<ContentAppState<S>>,
    Path(title_id): Path<i64>,
) -> ReviewsResult<Json<TitleResponse>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let title = CatalogUseCase::new(state.repo.clone())
        .get_title(title_id)
        .await?;

    Ok(Json(TitleResponse::from(&title)))
}

/// PATCH /titles/{title_id}
pub async fn update_title<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path(title_id): Path<i64>,
    Json(req): Json<UpdateTitleRequest>,
) -> ReviewsResult<Json<TitleResponse>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let title = CatalogUseCase::new(state.repo.clone())
        .update_title(
            &actor_of(&current),
            title_id,
            UpdateTitleInput {
                name: req.name,
                year: req.year,
                description: req.description,
                genre: req.genre,
                category: req.category,
            },
        )
        .await?;

    Ok(Json(TitleResponse::from(&title)))
}

/// DELETE /titles/{title_id}
pub async fn delete_title<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path(title_id): Path<i64>,
) -> ReviewsResult<StatusCode>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    CatalogUseCase::new(state.repo.clone())
        .delete_title(&actor_of(&current), title_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Reviews
// ============================================================================

/// GET /titles/{title_id}/reviews
pub async fn list_reviews<S>(
    State(state): State<ContentAppState<S>>,
    Path(title_id): Path<i64>,
) -> ReviewsResult<Json<Vec<ReviewResponse>>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let reviews = ReviewsUseCase::new(state.repo.clone(), state.repo.clone())
        .list(title_id)
        .await?;

    Ok(Json(reviews.iter().map(ReviewResponse::from).collect()))
}

/// POST /titles/{title_id}/reviews
pub async fn create_review<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path(title_id): Path<i64>,
    Json(req): Json<CreateReviewRequest>,
) -> ReviewsResult<(StatusCode, Json<ReviewResponse>)>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let review = ReviewsUseCase::new(state.repo.clone(), state.repo.clone())
        .create(
            &actor_of(&current),
            title_id,
            CreateReviewInput {
                text: req.text,
                score: req.score,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&review))))
}

/// GET /titles/{title_id}/reviews/{review_id}
pub async fn get_review<S>(
    State(state): State<ContentAppState<S>>,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> ReviewsResult<Json<ReviewResponse>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let review = ReviewsUseCase::new(state.repo.clone(), state.repo.clone())
        .get(title_id, review_id)
        .await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// PATCH /titles/{title_id}/reviews/{review_id}
pub async fn update_review<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateReviewRequest>,
) -> ReviewsResult<Json<ReviewResponse>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let review = ReviewsUseCase::new(state.repo.clone(), state.repo.clone())
        .update(
            &actor_of(&current),
            title_id,
            review_id,
            UpdateReviewInput {
                text: req.text,
                score: req.score,
            },
        )
        .await?;

    Ok(Json(ReviewResponse::from(&review)))
}

/// DELETE /titles/{title_id}/reviews/{review_id}
pub async fn delete_review<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> ReviewsResult<StatusCode>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    ReviewsUseCase::new(state.repo.clone(), state.repo.clone())
        .delete(&actor_of(&current), title_id, review_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Comments
// ============================================================================

/// GET /titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments<S>(
    State(state): State<ContentAppState<S>>,
    Path((title_id, review_id)): Path<(i64, i64)>,
) -> ReviewsResult<Json<Vec<CommentResponse>>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let comments = CommentsUseCase::new(state.repo.clone(), state.repo.clone())
        .list(title_id, review_id)
        .await?;

    Ok(Json(comments.iter().map(CommentResponse::from).collect()))
}

/// POST /titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path((title_id, review_id)): Path<(i64, i64)>,
    Json(req): Json<CreateCommentRequest>,
) -> ReviewsResult<(StatusCode, Json<CommentResponse>)>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let comment = CommentsUseCase::new(state.repo.clone(), state.repo.clone())
        .create(
            &actor_of(&current),
            title_id,
            review_id,
            CreateCommentInput { text: req.text },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(&comment))))
}

/// GET /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment<S>(
    State(state): State<ContentAppState<S>>,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> ReviewsResult<Json<CommentResponse>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let comment = CommentsUseCase::new(state.repo.clone(), state.repo.clone())
        .get(title_id, review_id, comment_id)
        .await?;

    Ok(Json(CommentResponse::from(&comment)))
}

/// PATCH /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
    Json(req): Json<UpdateCommentRequest>,
) -> ReviewsResult<Json<CommentResponse>>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    let comment = CommentsUseCase::new(state.repo.clone(), state.repo.clone())
        .update(
            &actor_of(&current),
            title_id,
            review_id,
            comment_id,
            UpdateCommentInput { text: req.text },
        )
        .await?;

    Ok(Json(CommentResponse::from(&comment)))
}

/// DELETE /titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment<S>(
    State(state): State<ContentAppState<S>>,
    current: Option<Extension<CurrentUser>>,
    Path((title_id, review_id, comment_id)): Path<(i64, i64, i64)>,
) -> ReviewsResult<StatusCode>
where
    S: CatalogRepository + ReviewRepository + CommentRepository + Clone + Send + Sync + 'static,
{
    CommentsUseCase::new(state.repo.clone(), state.repo.clone())
        .delete(&actor_of(&current), title_id, review_id, comment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
