//! Scoped reconciliation: after a confirmed mutation, patch every copy of a
//! record held by one store (list, saved list, current record). Order is
//! preserved and nothing is ever inserted.

use std::collections::HashSet;

use crate::models::{Entity, EntityId, Likeable, Pagination, Readable, Saveable};
use crate::store::StoreState;

/// Keeps the first occurrence of every id, in order.
pub fn dedupe_by_id<E: Entity>(items: Vec<E>) -> Vec<E> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|entity| seen.insert(entity.id()))
        .collect()
}

/// Applies `patch` to every copy of `id`; returns how many copies changed.
pub fn patch_everywhere<E: Entity>(
    state: &mut StoreState<E>,
    id: EntityId,
    mut patch: impl FnMut(&mut E),
) -> usize {
    let mut touched = 0;
    for entity in state
        .items
        .iter_mut()
        .chain(state.saved.iter_mut())
        .chain(state.current.iter_mut())
        .filter(|entity| entity.id() == id)
    {
        patch(entity);
        touched += 1;
    }
    touched
}

pub fn replace_everywhere<E: Entity>(state: &mut StoreState<E>, replacement: &E) -> usize {
    patch_everywhere(state, replacement.id(), |entity| {
        *entity = replacement.clone();
    })
}

/// Removes `id` from every list; a list's pagination total shrinks only when
/// that list actually held the record.
pub fn remove_everywhere<E: Entity>(state: &mut StoreState<E>, id: EntityId) -> usize {
    let mut removed = 0;

    if remove_from(&mut state.items, id) {
        state.pagination = state.pagination.map(shrink_total);
        removed += 1;
    }
    if remove_from(&mut state.saved, id) {
        state.saved_pagination = state.saved_pagination.map(shrink_total);
        removed += 1;
    }
    if state.current.as_ref().is_some_and(|entity| entity.id() == id) {
        state.current = None;
        removed += 1;
    }

    removed
}

pub fn remove_from_saved<E: Entity>(state: &mut StoreState<E>, id: EntityId) -> bool {
    let removed = remove_from(&mut state.saved, id);
    if removed {
        state.saved_pagination = state.saved_pagination.map(shrink_total);
    }
    removed
}

/// Sets the like flag; the counter moves only when the flag changes.
pub fn apply_like<E: Likeable>(entity: &mut E, liked: bool) {
    if entity.is_liked() == liked {
        return;
    }
    entity.set_liked(liked);
    let count = if liked {
        entity.like_count().saturating_add(1)
    } else {
        entity.like_count().saturating_sub(1)
    };
    entity.set_like_count(count);
}

pub fn apply_saved<E: Saveable>(entity: &mut E, saved: bool) {
    entity.set_saved(saved);
}

pub fn apply_read<E: Readable>(entity: &mut E) {
    entity.set_read(true);
}

fn remove_from<E: Entity>(list: &mut Vec<E>, id: EntityId) -> bool {
    let before = list.len();
    list.retain(|entity| entity.id() != id);
    list.len() != before
}

fn shrink_total(pagination: Pagination) -> Pagination {
    pagination.with_total(pagination.total.saturating_sub(1))
}
