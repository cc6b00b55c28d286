//! Blog post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::DomainError;
use blog_core::domain::{Author, NewPost, Post, PostPatch};
use blog_core::error::RepoError;
use blog_shared::dto::{AuthorRequest, CreatePostRequest, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult, missing_field};
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author: post.author_name,
        title: post.title,
        content: post.content,
        created: post.created.to_rfc3339(),
    }
}

fn not_found(id: &str) -> AppError {
    DomainError::NotFound {
        entity_type: "Post",
        id: id.to_string(),
    }
    .into()
}

fn author_from(req: AuthorRequest) -> AppResult<Author> {
    let first_name = req
        .first_name
        .ok_or_else(|| missing_field("author.firstName"))?;
    let last_name = req
        .last_name
        .ok_or_else(|| missing_field("author.lastName"))?;
    Ok(Author::new(first_name, last_name)?)
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_all().await?;
    tracing::debug!(count = posts.len(), "Listing posts");

    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post_id = Uuid::parse_str(&id).map_err(|_| not_found(&id))?;

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let title = req.title.ok_or_else(|| missing_field("title"))?;
    let content = req.content.ok_or_else(|| missing_field("content"))?;
    let author = author_from(req.author.ok_or_else(|| missing_field("author"))?)?;

    let new_post = NewPost::new(&author, title, content)?;
    let post = state.posts.create(new_post).await?;

    tracing::info!(post_id = %post.id, "Post created");

    Ok(HttpResponse::Created().json(to_response(post)))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    if let Some(body_id) = req.id.as_deref() {
        if body_id != id {
            return Err(AppError::BadRequest(format!(
                "Request path id ({}) and request body id ({}) must match",
                id, body_id
            )));
        }
    }

    let post_id = Uuid::parse_str(&id).map_err(|_| not_found(&id))?;

    let mut patch = PostPatch::default();
    if let Some(title) = req.title {
        patch = patch.with_title(title)?;
    }
    if let Some(content) = req.content {
        patch = patch.with_content(content);
    }
    if let Some(author) = req.author {
        patch = patch.with_author(&author_from(author)?);
    }

    state
        .posts
        .update_by_id(post_id, patch)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => not_found(&id),
            other => other.into(),
        })?;

    tracing::info!(post_id = %post_id, "Post updated");

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /posts/{id}
///
/// Unknown ids are a no-op, so repeating a delete is safe.
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let removed = match Uuid::parse_str(&id) {
        Ok(post_id) => state.posts.delete_by_id(post_id).await?,
        Err(_) => false,
    };

    if removed {
        tracing::info!(post_id = %id, "Post deleted");
    } else {
        tracing::debug!(post_id = %id, "Delete of unknown post ignored");
    }

    Ok(HttpResponse::NoContent().finish())
}
