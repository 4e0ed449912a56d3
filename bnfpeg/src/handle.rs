use std::fmt::Debug;

/// Stable identity of an expression node inside an [`Exprs`](crate::Exprs) arena.
///
/// Handles are handed out in allocation order and never reused. Two
/// structurally identical expressions built separately get distinct handles,
/// which is what makes per-node actions possible.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    pub(crate) fn new(index: usize) -> Self {
        assert!(index <= u32::MAX as usize, "Index is too large");
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Debug for ExprId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ExprId").field(&self.0).finish()
    }
}

impl std::fmt::Display for ExprId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
