use crate::error::Result;

/// The contract shared by the avl tree and the red black tree.
///
/// Generic drivers such as `sort::sort_with` and the benchmarks are written against this
/// trait so that both engines run through exactly the same code.
pub trait OrderedTree<T, C> {
    /// Short label identifying the engine in benchmark output.
    const NAME: &'static str;

    fn with_cmp(cmp: C) -> Self;

    fn insert(&mut self, value: T) -> Result<()>;

    fn remove(&mut self, key: &T) -> Option<T>;

    fn search(&self, key: &T) -> Option<&T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn height(&self) -> usize;

    fn in_order<F>(&self, visit: F)
    where
        F: FnMut(&T);
}
