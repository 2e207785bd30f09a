use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::construct::{Attributes, Entity, Kind, ThingGenerator};
use crate::error::{CloudkeepError, Result};

pub const RECORD_SEPARATOR: char = '%';
pub const FIELD_SEPARATOR: char = ',';

lazy_static! {
    // everything up to the first colon is the key, the rest (colons included) is the value
    static ref FIELD: Regex = Regex::new(r"(?s)^([^:]*):(.*)$").unwrap();
}

fn split_field(field: &str) -> Option<(&str, &str)> {
    let captures = FIELD.captures(field)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

fn records(batch: &str) -> impl Iterator<Item = &str> {
    batch
        .split(RECORD_SEPARATOR)
        .filter(|record| !record.trim().is_empty())
}

fn parse_record(record: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for field in record.split(FIELD_SEPARATOR) {
        match split_field(field) {
            Some((key, value)) => attributes.insert(key.to_string(), value.to_string()),
            None => {
                warn!(%field, %record, "skipping field without colon");
            }
        }
    }
    attributes
}

fn try_parse_record(record: &str) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for field in record.split(FIELD_SEPARATOR) {
        let (key, value) = split_field(field).ok_or_else(|| CloudkeepError::MalformedField {
            record: record.to_string(),
            field: field.to_string(),
        })?;
        attributes.insert(key.to_string(), value.to_string());
    }
    Ok(attributes)
}

/// Turns batch strings into entities, numbering every entity with a thing
/// that is unique within the process.
#[derive(Debug, Default)]
pub struct Parser {
    thing_generator: ThingGenerator,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            thing_generator: ThingGenerator::new(),
        }
    }

    /// Parses leniently: fields without a colon are dropped, but every
    /// non-empty record still yields an entity.
    pub fn parse(&mut self, kind: Kind, batch: &str) -> Vec<Arc<Entity>> {
        let parsed: Vec<Attributes> = records(batch).map(parse_record).collect();
        self.keep(kind, parsed)
    }

    /// Parses strictly: the first field without a colon fails the whole
    /// batch and no things are consumed.
    pub fn try_parse(&mut self, kind: Kind, batch: &str) -> Result<Vec<Arc<Entity>>> {
        let parsed = records(batch)
            .map(try_parse_record)
            .collect::<Result<Vec<Attributes>>>()?;
        Ok(self.keep(kind, parsed))
    }

    /// Parses leniently by kind name. Unknown names yield nothing.
    pub fn parse_named(&mut self, name: &str, batch: &str) -> Vec<Arc<Entity>> {
        match name.parse::<Kind>() {
            Ok(kind) => self.parse(kind, batch),
            Err(_) => {
                debug!(kind = name, "unknown kind, nothing parsed");
                Vec::new()
            }
        }
    }

    pub fn thing_generator(&self) -> &ThingGenerator {
        &self.thing_generator
    }

    fn keep(&mut self, kind: Kind, parsed: Vec<Attributes>) -> Vec<Arc<Entity>> {
        let entities: Vec<Arc<Entity>> = parsed
            .into_iter()
            .map(|attributes| {
                let thing = self.thing_generator.generate();
                Arc::new(Entity::new(thing, kind, attributes))
            })
            .collect();
        debug!(kind = kind.name(), records = entities.len(), "parsed batch");
        entities
    }
}

/// Parses a batch into entities of the named kind using a fresh parser.
pub fn parse(name: &str, batch: &str) -> Vec<Arc<Entity>> {
    Parser::new().parse_named(name, batch)
}

/// Parses a batch into entities of the given kind using a fresh parser.
pub fn parse_kind(kind: Kind, batch: &str) -> Vec<Arc<Entity>> {
    Parser::new().parse(kind, batch)
}
