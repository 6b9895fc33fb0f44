use crate::block::Block;

/// Core trait for signal graph nodes.
///
/// A node fills (or transforms, for effects) one block per call. State lives
/// in the node, so consecutive calls continue where the last one stopped.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut Block);

    /// Whether this node still has anything to contribute.
    ///
    /// Finite sources (a held envelope, a sample that ran out) report false
    /// once done. Default implementation is always active.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut Block) {
        (**self).render_block(out)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

/// Scratch block shaped like `like`, allocated on first use and reused
/// while the block length stays the same.
pub(crate) fn scratch<'a>(slot: &'a mut Option<Block>, like: &Block) -> &'a mut Block {
    if slot.as_ref().is_some_and(|block| block.len() != like.len()) {
        *slot = None;
    }
    slot.get_or_insert_with(|| like.clone())
}
