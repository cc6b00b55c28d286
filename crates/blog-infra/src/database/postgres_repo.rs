//! PostgreSQL post store.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use blog_core::domain::{NewPost, Post, PostPatch};
use blog_core::error::RepoError;
use blog_core::ports::PostStore;

use super::entity::post::{self, Entity as PostEntity};

/// Post store backed by a SeaORM connection pool.
pub struct PostgresPostStore {
    pub(crate) db: DbConn,
}

impl PostgresPostStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn query_error(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Post already exists".to_string())
    } else if matches!(e, DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) {
        RepoError::Connection(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    async fn insert_many(&self, posts: Vec<Post>) -> Result<usize, RepoError> {
        if posts.is_empty() {
            return Ok(0);
        }

        let models = posts.into_iter().map(post::ActiveModel::from);
        let inserted = PostEntity::insert_many(models)
            .exec_without_returning(&self.db)
            .await
            .map_err(query_error)?;

        tracing::info!(inserted, "Inserted posts");
        Ok(inserted as usize)
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Created)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = %id, "Finding post by id");

        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_one(&self) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(query_error)
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let active_model = post::ActiveModel::from(Post::new(new_post));
        let model = active_model.insert(&self.db).await.map_err(query_error)?;

        tracing::info!(post_id = %model.id, "Created post");
        Ok(model.into())
    }

    async fn update_by_id(&self, id: Uuid, patch: PostPatch) -> Result<(), RepoError> {
        if patch.is_empty() {
            // Nothing to set; still report unknown ids.
            return match self.find_by_id(id).await? {
                Some(_) => Ok(()),
                None => Err(RepoError::NotFound),
            };
        }

        let mut update = PostEntity::update_many().filter(post::Column::Id.eq(id));
        if let Some(title) = patch.title {
            update = update.col_expr(post::Column::Title, Expr::value(title));
        }
        if let Some(content) = patch.content {
            update = update.col_expr(post::Column::Content, Expr::value(content));
        }
        if let Some(author_name) = patch.author_name {
            update = update.col_expr(post::Column::AuthorName, Expr::value(author_name));
        }

        let result = update.exec(&self.db).await.map_err(query_error)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::info!(post_id = %id, "Updated post");
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        let removed = result.rows_affected > 0;
        tracing::info!(post_id = %id, removed, "Deleted post");
        Ok(removed)
    }

    async fn drop_all(&self) -> Result<(), RepoError> {
        let result = PostEntity::delete_many()
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        tracing::warn!(removed = result.rows_affected, "Dropped all posts");
        Ok(())
    }
}
