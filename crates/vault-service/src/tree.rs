//! Full-tree query for the authenticated owner.

use std::sync::Arc;

use vault_core::result::AppResult;
use vault_entity::tree::OwnerTree;
use vault_index::TreeIndex;

use crate::context::RequestContext;

/// Serves the owner's complete tree in one call, for clients that render
/// the whole hierarchy at once.
#[derive(Debug, Clone)]
pub struct TreeService {
    index: Arc<TreeIndex>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(index: Arc<TreeIndex>) -> Self {
        Self { index }
    }

    /// Returns every folder and file the owner has, in insertion order.
    /// An owner with no data yet gets an empty tree, not an error.
    pub fn owner_tree(&self, ctx: &RequestContext) -> AppResult<OwnerTree> {
        self.index.owner_tree(ctx.owner_id)
    }
}
