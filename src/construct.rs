// criteria are small maps where keys are not Things
use core::hash::BuildHasherDefault;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use seahash::SeaHasher;

// used to print out readable forms of a construct
use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::CloudkeepError;

// ------------- Thing -------------
pub type Thing = u64;

pub type ThingHasher = BuildHasherDefault<SeaHasher>;
pub type OtherHasher = BuildHasherDefault<SeaHasher>;

pub const GENESIS: Thing = 0;

// one sequence for the whole process, so things never repeat across parsers
static LOWER_BOUND: AtomicU64 = AtomicU64::new(GENESIS);

#[derive(Debug)]
pub struct ThingGenerator {
    generated: u64,
}

impl ThingGenerator {
    pub fn new() -> Self {
        Self { generated: 0 }
    }
    // Things strictly increase, so ascending things follow parse order.
    pub fn generate(&mut self) -> Thing {
        self.generated += 1;
        LOWER_BOUND.fetch_add(1, Ordering::Relaxed) + 1
    }
    /// How many things this generator has handed out.
    pub fn generated(&self) -> u64 {
        self.generated
    }
}
impl Default for ThingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- Kind -------------
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Instance,
    Volume,
    Snapshot,
}
impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Instance, Kind::Volume, Kind::Snapshot];

    /// The name used when asking for a kind, e.g. `"volume"`.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Instance => "instance",
            Kind::Volume => "volume",
            Kind::Snapshot => "snapshot",
        }
    }
}
impl FromStr for Kind {
    type Err = CloudkeepError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instance" => Ok(Kind::Instance),
            "volume" => Ok(Kind::Volume),
            "snapshot" => Ok(Kind::Snapshot),
            _ => Err(CloudkeepError::UnknownKind(s.to_string())),
        }
    }
}
impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Instance => "Instance",
            Kind::Volume => "Volume",
            Kind::Snapshot => "Snapshot",
        };
        write!(f, "{}", name)
    }
}

// ------------- Attributes -------------
/// An open-ended bag of string attributes that remembers the order in which
/// keys were first seen. Re-inserting a key overwrites its value in place.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}
impl Attributes {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }
    pub fn insert(&mut self, key: String, value: String) {
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
    }
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (k, v) in iter {
            attributes.insert(k.into(), v.into());
        }
        attributes
    }
}
impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (k, v) in &self.pairs {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ------------- Entity -------------
#[derive(Debug, serde::Serialize)]
pub struct Entity {
    thing: Thing, // the identity of this particular record
    kind: Kind,
    attributes: Attributes,
}
impl Entity {
    pub fn new(thing: Thing, kind: Kind, attributes: Attributes) -> Self {
        Self {
            thing,
            kind,
            attributes,
        }
    }
    // Fields are only exposed through getters, which keeps entities
    // immutable after they have been parsed.
    pub fn thing(&self) -> Thing {
        self.thing
    }
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }
}
// Two records with the same text are still two entities.
impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.thing == other.thing && self.kind == other.kind
    }
}
impl Eq for Entity {}
impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.thing.hash(state);
        self.kind.hash(state);
    }
}
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let pairs: Vec<String> = self
            .attributes
            .iter()
            .map(|(k, v)| format!("{} : {}", k, v))
            .collect();
        write!(f, "{}({})", self.kind, pairs.join(" , "))
    }
}

// ------------- Criteria -------------
/// Required attribute values, all of which must hold for an entity to match.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Criteria {
    required: HashMap<String, String, OtherHasher>,
}
impl Criteria {
    pub fn new() -> Self {
        Self {
            required: HashMap::default(),
        }
    }
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.required.insert(key.into(), value.into());
        self
    }
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.required.insert(key.into(), value.into());
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.required.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
    pub fn len(&self) -> usize {
        self.required.len()
    }
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }
}
impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Criteria {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut criteria = Criteria::new();
        for (k, v) in iter {
            criteria.insert(k, v);
        }
        criteria
    }
}
impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Criteria {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut pairs: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        pairs.sort();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}
