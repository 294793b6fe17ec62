// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Flatten a forest given by `roots` and a child function into a pre-order list,
/// visiting every node at most once.
pub fn select_tree<T, F>(roots: &[T], mut children: F) -> Vec<T>
where
    T: Copy + PartialEq,
    F: FnMut(T) -> Vec<T>,
{
    let mut visited = vec![];
    let mut stack: Vec<T> = roots.iter().rev().copied().collect();
    while let Some(node) = stack.pop() {
        if visited.contains(&node) {
            continue;
        }
        visited.push(node);
        for child in children(node).into_iter().rev() {
            stack.push(child);
        }
    }
    visited
}

/// Append `item` unless it is already present.
pub fn push_distinct<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Remove every occurrence of each of `removed` from `items`.
pub fn remove_all<T: PartialEq>(items: &mut Vec<T>, removed: &[T]) {
    items.retain(|i| !removed.contains(i));
}
