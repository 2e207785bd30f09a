use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use roaring::RoaringTreemap;
use tracing::debug;

use crate::construct::{Criteria, Entity, Kind, OtherHasher, Thing, ThingHasher};
use crate::error::Result;
use crate::parse::Parser;

pub const ID: &str = "id";
pub const ATTACHED_INSTANCE_ID: &str = "attached_instance_id";
pub const SOURCE_VOLUME_ID: &str = "source_volume_id";

// ------------- Lookups -------------
#[derive(Debug)]
pub struct Lookup<K, H = RandomState> {
    index: HashMap<K, RoaringTreemap, H>,
}
impl<K: Eq + Hash, H: BuildHasher + Default> Lookup<K, H> {
    pub fn new() -> Self {
        Self {
            index: HashMap::<K, RoaringTreemap, H>::default(),
        }
    }
    pub fn insert(&mut self, key: K, thing: Thing) {
        self.index.entry(key).or_default().insert(thing);
    }
    pub fn lookup<Q>(&self, key: &Q) -> Option<&RoaringTreemap>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.index.get(key)
    }
}
impl<K: Eq + Hash, H: BuildHasher + Default> Default for Lookup<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- Inventory -------------
// Keeps entities from any number of batches, together with the lookups
// needed to answer attribute queries without scanning.
#[derive(Debug, Default)]
pub struct Inventory {
    parser: Parser,
    kept: HashMap<Thing, Arc<Entity>, ThingHasher>,
    kind_lookup: Lookup<Kind, OtherHasher>,
    // attribute key -> attribute value -> things
    attribute_lookup: HashMap<String, Lookup<String, OtherHasher>, OtherHasher>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, kind: Kind, batch: &str) -> Vec<Arc<Entity>> {
        let entities = self.parser.parse(kind, batch);
        self.keep_all(&entities);
        entities
    }

    pub fn load_named(&mut self, name: &str, batch: &str) -> Vec<Arc<Entity>> {
        let entities = self.parser.parse_named(name, batch);
        self.keep_all(&entities);
        entities
    }

    pub fn try_load(&mut self, kind: Kind, batch: &str) -> Result<Vec<Arc<Entity>>> {
        let entities = self.parser.try_parse(kind, batch)?;
        self.keep_all(&entities);
        Ok(entities)
    }

    fn keep_all(&mut self, entities: &[Arc<Entity>]) {
        for entity in entities {
            let thing = entity.thing();
            self.kind_lookup.insert(entity.kind(), thing);
            for (key, value) in entity.attributes().iter() {
                self.attribute_lookup
                    .entry(key.to_string())
                    .or_default()
                    .insert(value.to_string(), thing);
            }
            self.kept.insert(thing, Arc::clone(entity));
        }
        debug!(kept = entities.len(), total = self.kept.len(), "inventory loaded");
    }

    fn resolve(&self, things: &RoaringTreemap) -> Vec<Arc<Entity>> {
        // things ascend in parse order, so iteration keeps the load order
        things
            .iter()
            .filter_map(|thing| self.kept.get(&thing).cloned())
            .collect()
    }

    fn things_of(&self, kind: Kind) -> RoaringTreemap {
        self.kind_lookup.lookup(&kind).cloned().unwrap_or_default()
    }

    fn matching(&self, kind: Kind, criteria: &Criteria) -> RoaringTreemap {
        let mut result = self.things_of(kind);
        for (key, value) in criteria.iter() {
            let things = self
                .attribute_lookup
                .get(key)
                .and_then(|values| values.lookup(value));
            match things {
                Some(things) => result &= things,
                None => return RoaringTreemap::new(),
            }
            if result.is_empty() {
                break;
            }
        }
        result
    }

    pub fn entities(&self, kind: Kind) -> Vec<Arc<Entity>> {
        self.resolve(&self.things_of(kind))
    }

    pub fn entity(&self, thing: Thing) -> Option<Arc<Entity>> {
        self.kept.get(&thing).cloned()
    }

    pub fn lookup(&self, kind: Kind, criteria: &Criteria) -> Vec<Arc<Entity>> {
        self.resolve(&self.matching(kind, criteria))
    }

    /// Kept entities of `kind` that do not match `criteria`.
    pub fn excluding(&self, kind: Kind, criteria: &Criteria) -> Vec<Arc<Entity>> {
        let mut rest = self.things_of(kind);
        rest -= &self.matching(kind, criteria);
        self.resolve(&rest)
    }

    pub fn attached_volumes(&self, instance: &Entity) -> Vec<Arc<Entity>> {
        self.referring(instance, Kind::Volume, ATTACHED_INSTANCE_ID)
    }

    pub fn snapshots_of(&self, volume: &Entity) -> Vec<Arc<Entity>> {
        self.referring(volume, Kind::Snapshot, SOURCE_VOLUME_ID)
    }

    /// Every instance matching `criteria` paired with its attached volumes.
    pub fn volumes_by_instance(
        &self,
        criteria: &Criteria,
    ) -> Vec<(Arc<Entity>, Vec<Arc<Entity>>)> {
        self.lookup(Kind::Instance, criteria)
            .into_iter()
            .map(|instance| {
                let volumes = self.attached_volumes(&instance);
                (instance, volumes)
            })
            .collect()
    }

    fn referring(&self, target: &Entity, kind: Kind, key: &str) -> Vec<Arc<Entity>> {
        match target.get(ID) {
            Some(id) => self.lookup(kind, &Criteria::new().with(key, id)),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}
