use std::collections::HashSet;
use std::sync::Arc;

use crate::construct::{Criteria, Entity, OtherHasher};

/// True when every required value in `criteria` is present on the entity.
pub fn matches(entity: &Entity, criteria: &Criteria) -> bool {
    criteria
        .iter()
        .all(|(key, value)| entity.get(key) == Some(value))
}

/// The entities matching `criteria`, in their original order.
pub fn lookup(entities: &[Arc<Entity>], criteria: &Criteria) -> Vec<Arc<Entity>> {
    entities
        .iter()
        .filter(|entity| matches(entity, criteria))
        .cloned()
        .collect()
}

/// The entities not present in `removed`, compared by identity.
pub fn exclude(entities: &[Arc<Entity>], removed: &[Arc<Entity>]) -> Vec<Arc<Entity>> {
    let removed: HashSet<&Entity, OtherHasher> = removed.iter().map(|e| e.as_ref()).collect();
    entities
        .iter()
        .filter(|entity| !removed.contains(entity.as_ref()))
        .cloned()
        .collect()
}

/// Children referring to `parent` through `child_key`, where the referred
/// value is read from the parent's `parent_key`.
pub fn related(
    parent: &Entity,
    parent_key: &str,
    children: &[Arc<Entity>],
    child_key: &str,
) -> Vec<Arc<Entity>> {
    match parent.get(parent_key) {
        Some(value) => lookup(children, &Criteria::new().with(child_key, value)),
        None => Vec::new(),
    }
}
