//! Product comments.
//!
//! Any authenticated user may post on any product. Editing and deleting
//! are author-only, enforced through the shared ownership guard — a
//! rejected mutation leaves the comment exactly as it was.

use crate::access::require_owner;
use crate::errors::CommentError;
use crate::model::Comment;
use crate::store::StorefrontStore;
use crate::types::{CommentId, CommentText, ProductId, UserId};
use tracing::debug;

/// Comment operations for authenticated users.
#[derive(Debug, Clone)]
pub struct CommentService<S> {
    store: S,
}

impl<S> CommentService<S>
where
    S: StorefrontStore,
{
    /// Creates the service over a storage port.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Posts a new comment on a product.
    pub async fn post(
        &self,
        author: UserId,
        product: ProductId,
        text: CommentText,
    ) -> Result<Comment, CommentError> {
        // The product must exist; commenting on ghosts is a 404.
        let product = self.store.product(product).await?;
        let comment = Comment::new(product.id, author, text);
        self.store.insert_comment(comment.clone()).await?;
        debug!(comment = %comment.id, product = %product.id, %author, "comment posted");
        Ok(comment)
    }

    /// A product's comments, newest first.
    pub async fn for_product(&self, product: ProductId) -> Result<Vec<Comment>, CommentError> {
        Ok(self.store.comments_for_product(product).await?)
    }

    /// Replaces a comment's text. Author only.
    pub async fn edit(
        &self,
        requester: UserId,
        id: CommentId,
        text: CommentText,
    ) -> Result<Comment, CommentError> {
        let comment = self.store.comment(id).await?;
        require_owner(requester, comment.author)?;
        let updated = self.store.update_comment_text(comment.id, text).await?;
        debug!(comment = %updated.id, author = %requester, "comment edited");
        Ok(updated)
    }

    /// Deletes a comment. Author only.
    pub async fn delete(&self, requester: UserId, id: CommentId) -> Result<(), CommentError> {
        let comment = self.store.comment(id).await?;
        require_owner(requester, comment.author)?;
        self.store.delete_comment(comment.id).await?;
        debug!(comment = %comment.id, author = %requester, "comment deleted");
        Ok(())
    }
}
