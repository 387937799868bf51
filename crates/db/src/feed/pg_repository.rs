use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::feed::models::{Comment, NewComment, NewPost, Post};
use crate::feed::repositories::{CommentRepository, PostRepository};
use crate::moderation::models::Category;
use sentinel_common::error::{SentinelError, SentinelResult};

fn map_category(raw: Option<String>) -> SentinelResult<Option<Category>> {
    raw.map(|value| Category::from_str(&value).map_err(SentinelError::Internal))
        .transpose()
}

#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_post_row(row: PgRow) -> SentinelResult<Post> {
        Ok(Post {
            id: row.get("id"),
            author_id: row.get("author_id"),
            author_username: row.get("author_username"),
            content: row.get("content"),
            image_url: row.get("image_url"),
            is_bullying: row.get("is_bullying"),
            category: map_category(row.get("category"))?,
            comment_count: row.get("comment_count"),
            created_at: row.get("created_at"),
        })
    }
}

const POST_SELECT: &str = "select p.id, p.author_id, u.username as author_username, p.content, \
     p.image_url, p.is_bullying, p.category, p.created_at, \
     (select count(*) from comments c where c.post_id = p.id) as comment_count \
     from posts p join users u on u.id = p.author_id";

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: NewPost) -> SentinelResult<Post> {
        sqlx::query(
            "insert into posts (id, author_id, content, image_url, is_bullying, category, created_at) \
             values ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(post.is_bullying)
        .bind(post.category.map(|c| c.as_str()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        self.get_by_id(post.id).await?.ok_or_else(|| {
            SentinelError::Internal(format!("post vanished after insert: {}", post.id))
        })
    }

    async fn get_by_id(&self, id: Uuid) -> SentinelResult<Option<Post>> {
        let row = sqlx::query(&format!("{POST_SELECT} where p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SentinelError::Database(e.to_string()))?;

        row.map(Self::map_post_row).transpose()
    }

    async fn list(&self) -> SentinelResult<Vec<Post>> {
        let rows = sqlx::query(&format!("{POST_SELECT} order by p.created_at desc"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SentinelError::Database(e.to_string()))?;

        rows.into_iter().map(Self::map_post_row).collect()
    }
}

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_comment_row(row: PgRow) -> SentinelResult<Comment> {
        Ok(Comment {
            id: row.get("id"),
            post_id: row.get("post_id"),
            author_id: row.get("author_id"),
            author_username: row.get("author_username"),
            content: row.get("content"),
            is_bullying: row.get("is_bullying"),
            category: map_category(row.get("category"))?,
            created_at: row.get("created_at"),
        })
    }
}

const COMMENT_SELECT: &str = "select c.id, c.post_id, c.author_id, u.username as author_username, \
     c.content, c.is_bullying, c.category, c.created_at \
     from comments c join users u on u.id = c.author_id";

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, comment: NewComment) -> SentinelResult<Comment> {
        sqlx::query(
            "insert into comments (id, post_id, author_id, content, is_bullying, category, created_at) \
             values ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(comment.is_bullying)
        .bind(comment.category.map(|c| c.as_str()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        self.get_by_id(comment.post_id, comment.id)
            .await?
            .ok_or_else(|| {
                SentinelError::Internal(format!("comment vanished after insert: {}", comment.id))
            })
    }

    async fn get_by_id(&self, post_id: Uuid, id: Uuid) -> SentinelResult<Option<Comment>> {
        let row = sqlx::query(&format!("{COMMENT_SELECT} where c.post_id = $1 and c.id = $2"))
            .bind(post_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SentinelError::Database(e.to_string()))?;

        row.map(Self::map_comment_row).transpose()
    }

    async fn list_for_post(&self, post_id: Uuid) -> SentinelResult<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "{COMMENT_SELECT} where c.post_id = $1 order by c.created_at asc"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SentinelError::Database(e.to_string()))?;

        rows.into_iter().map(Self::map_comment_row).collect()
    }

    async fn delete(&self, post_id: Uuid, id: Uuid) -> SentinelResult<()> {
        let result = sqlx::query("delete from comments where post_id = $1 and id = $2")
            .bind(post_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| SentinelError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(SentinelError::NotFound(format!("comment not found: {id}")));
        }

        Ok(())
    }
}
