use std::collections::BTreeMap;
use crate::error::{DiodemError, Result};

/// Nested string-keyed structure with values at the leaves.
///
/// Branches keep their keys in a `BTreeMap`, so the canonical traversal order
/// is depth-first with lexicographically sorted keys. Every operation that
/// needs "the first leaf" (e.g. the crop tie-break) relies on this order.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree<T> {
    Leaf(T),
    Branch(BTreeMap<String, Tree<T>>)
}

impl<T> Tree<T> {

    pub fn branch() -> Tree<T> {
        Tree::Branch(BTreeMap::new())
    }

    /// Inserts `child` under `key`. Does nothing on a leaf.
    pub fn insert(&mut self, key: &str, child: Tree<T>) -> &mut Self {
        if let Tree::Branch(children) = self {
            children.insert(key.to_string(), child);
        }
        self
    }

    pub fn with(mut self, key: &str, child: Tree<T>) -> Self {
        self.insert(key, child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            Tree::Leaf(_) => vec!(),
            Tree::Branch(children) => children.keys().map(|k| k.as_str()).collect()
        }
    }

    pub fn child(&self, key: &str) -> Option<&Tree<T>> {
        match self {
            Tree::Leaf(_) => None,
            Tree::Branch(children) => children.get(key)
        }
    }

    /// Follows a `/`-separated path. The empty path is the tree itself.
    pub fn get(&self, path: &str) -> Option<&Tree<T>> {
        path.split('/').filter(|p| !p.is_empty()).try_fold(self, |node, key| node.child(key))
    }

    pub fn leaf(&self) -> Option<&T> {
        match self {
            Tree::Leaf(value) => Some(value),
            Tree::Branch(_) => None
        }
    }

    pub fn leaf_at(&self, path: &str) -> Option<&T> {
        self.get(path).and_then(|node| node.leaf())
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Tree::Leaf(_) => 1,
            Tree::Branch(children) => children.values().map(|c| c.leaf_count()).sum()
        }
    }

    /// Leaves in canonical order.
    pub fn leaves(&self) -> Vec<&T> {
        let mut out = Vec::<&T>::with_capacity(self.leaf_count());
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a T>) {
        match self {
            Tree::Leaf(value) => out.push(value),
            Tree::Branch(children) => children.values().for_each(|c| c.collect_leaves(out))
        }
    }

    /// Leaves in canonical order, each paired with its `/`-separated path.
    pub fn flatten_with_paths(&self) -> Vec<(String, &T)> {
        let mut out = Vec::<(String, &T)>::with_capacity(self.leaf_count());
        self.collect_paths(String::new(), &mut out);
        out
    }

    fn collect_paths<'a>(&'a self, prefix: String, out: &mut Vec<(String, &'a T)>) {
        match self {
            Tree::Leaf(value) => out.push((prefix, value)),
            Tree::Branch(children) => {
                for (key, child) in children {
                    child.collect_paths(join_path(&prefix, key), out);
                }
            }
        }
    }

    pub fn map<U, F>(&self, mut f: F) -> Tree<U> where F: FnMut(&T) -> U {
        self.map_ref(&mut f)
    }

    fn map_ref<U, F>(&self, f: &mut F) -> Tree<U> where F: FnMut(&T) -> U {
        match self {
            Tree::Leaf(value) => Tree::Leaf(f(value)),
            Tree::Branch(children) => Tree::Branch(children.iter().map(|(k, c)| (k.clone(), c.map_ref(f))).collect())
        }
    }

    pub fn try_map<U, E, F>(&self, mut f: F) -> std::result::Result<Tree<U>, E> where F: FnMut(&T) -> std::result::Result<U, E> {
        self.try_map_ref(&mut f)
    }

    fn try_map_ref<U, E, F>(&self, f: &mut F) -> std::result::Result<Tree<U>, E> where F: FnMut(&T) -> std::result::Result<U, E> {
        match self {
            Tree::Leaf(value) => Ok(Tree::Leaf(f(value)?)),
            Tree::Branch(children) => {
                let mut mapped = BTreeMap::new();
                for (key, child) in children {
                    mapped.insert(key.clone(), child.try_map_ref(f)?);
                }
                Ok(Tree::Branch(mapped))
            }
        }
    }

    /// Same shape as `self`, every leaf replaced by `value`.
    pub fn broadcast<U: Clone>(&self, value: U) -> Tree<U> {
        self.map(|_| value.clone())
    }

    /// Walks `self` and `other` in lockstep and combines mirrored leaves.
    ///
    /// Both trees must have exactly the same key structure; the first
    /// diverging path is reported as `TreeStructureMismatch`.
    pub fn zip_with<U, V, F>(&self, other: &Tree<U>, mut f: F) -> Result<Tree<V>> where F: FnMut(&T, &U) -> Result<V> {
        self.zip_ref(other, "", &mut f)
    }

    fn zip_ref<U, V, F>(&self, other: &Tree<U>, path: &str, f: &mut F) -> Result<Tree<V>> where F: FnMut(&T, &U) -> Result<V> {
        match (self, other) {
            (Tree::Leaf(a), Tree::Leaf(b)) => Ok(Tree::Leaf(f(a, b)?)),
            (Tree::Branch(a), Tree::Branch(b)) => {
                if let Some(key) = a.keys().find(|k| !b.contains_key(*k)).or_else(|| b.keys().find(|k| !a.contains_key(*k))) {
                    return Err(DiodemError::TreeStructureMismatch { path: join_path(path, key) });
                }
                let mut zipped = BTreeMap::new();
                for (key, child) in a {
                    let child_path = join_path(path, key);
                    zipped.insert(key.clone(), child.zip_ref(&b[key], &child_path, f)?);
                }
                Ok(Tree::Branch(zipped))
            },
            _ => Err(DiodemError::TreeStructureMismatch { path: path_or_root(path) })
        }
    }

    /// True when both trees have identical key structure.
    pub fn same_structure<U>(&self, other: &Tree<U>) -> bool {
        match (self, other) {
            (Tree::Leaf(_), Tree::Leaf(_)) => true,
            (Tree::Branch(a), Tree::Branch(b)) => {
                a.len() == b.len() && a.iter().all(|(k, c)| b.get(k).map_or(false, |o| c.same_structure(o)))
            },
            _ => false
        }
    }
}

impl<T> From<T> for Tree<T> {
    fn from(value: T) -> Tree<T> {
        Tree::Leaf(value)
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    match prefix.is_empty() {
        true => key.to_string(),
        false => format!("{}/{}", prefix, key)
    }
}

fn path_or_root(path: &str) -> String {
    match path.is_empty() {
        true => String::from("<root>"),
        false => path.to_string()
    }
}
