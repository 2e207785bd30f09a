//! The demonstration walkthrough: load the configured batches, run the
//! sample lookups and write each result as a titled section.
//!
//! In text form a section is a blank line, its title, then one rendered
//! entity per line. In JSON form a section is its title line followed by a
//! single line holding a JSON array.

use std::io::Write;
use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::config::{OutputFormat, Settings};
use crate::construct::{Criteria, Entity, Kind};
use crate::error::Result;
use crate::inventory::Inventory;
use crate::lookup::{exclude, lookup};

#[derive(Debug)]
pub enum Section {
    Entities {
        title: &'static str,
        entities: Vec<Arc<Entity>>,
    },
    Related {
        title: &'static str,
        related: Vec<(Arc<Entity>, Vec<Arc<Entity>>)>,
        // printed under a parent with nothing related to it
        nothing: &'static str,
    },
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Entities { title, .. } | Section::Related { title, .. } => *title,
        }
    }
}

fn entities(title: &'static str, entities: Vec<Arc<Entity>>) -> Section {
    Section::Entities { title, entities }
}

fn load(
    inventory: &mut Inventory,
    settings: &Settings,
    kind: Kind,
    batch: &str,
) -> Result<Vec<Arc<Entity>>> {
    if settings.strict {
        inventory.try_load(kind, batch)
    } else {
        Ok(inventory.load(kind, batch))
    }
}

/// Loads the configured batches and runs every lookup of the walkthrough.
pub fn build(settings: &Settings) -> Result<Vec<Section>> {
    let mut inventory = Inventory::new();
    let instances = load(&mut inventory, settings, Kind::Instance, &settings.instances)?;
    let volumes = load(&mut inventory, settings, Kind::Volume, &settings.volumes)?;
    let snapshots = load(&mut inventory, settings, Kind::Snapshot, &settings.snapshots)?;
    // a kind nobody knows about, which yields nothing
    let mistakes = inventory.load_named("mistake", &settings.snapshots);
    info!(
        instances = instances.len(),
        volumes = volumes.len(),
        snapshots = snapshots.len(),
        "inventory ready"
    );

    let available = Criteria::from([("state", "available")]);
    let available_ohio = Criteria::from([("region", "ohio"), ("state", "available")]);
    let running_oregon = Criteria::from([("state", "running"), ("region", "oregon")]);
    let wrong_region = Criteria::from([("region", "incorrect")]);
    let wrong_attribute = Criteria::from([("incorrect_attribute", "paris")]);
    let running = Criteria::from([("state", "running")]);
    let terminated = Criteria::from([("state", "terminated")]);

    let snapshotted: Vec<(Arc<Entity>, Vec<Arc<Entity>>)> = volumes
        .iter()
        .map(|volume| (Arc::clone(volume), inventory.snapshots_of(volume)))
        .collect();
    let terminated_instances = lookup(&instances, &terminated);

    Ok(vec![
        entities("all created instance objects", instances.clone()),
        entities("all created volume objects", volumes.clone()),
        entities("all created snapshot objects", snapshots.clone()),
        entities("empty list print nothing", mistakes),
        entities("available volumes list", lookup(&volumes, &available)),
        entities("available in Ohio volumes list", lookup(&volumes, &available_ohio)),
        entities(
            "running in Oregon instances list",
            inventory.lookup(Kind::Instance, &running_oregon),
        ),
        entities(
            "empty snapshot list, printing nothing",
            lookup(&snapshots, &wrong_region),
        ),
        entities(
            "empty volumes list, printing nothing",
            lookup(&volumes, &wrong_attribute),
        ),
        Section::Related {
            title: "All volumes attached to running instances",
            related: inventory.volumes_by_instance(&running),
            nothing: "No attached volumes",
        },
        Section::Related {
            title: "Snapshots taken of each volume",
            related: snapshotted,
            nothing: "No snapshots",
        },
        entities(
            "All NOT terminated instances",
            exclude(&instances, &terminated_instances),
        ),
    ])
}

fn as_entities(entities: &[Arc<Entity>]) -> Vec<&Entity> {
    entities.iter().map(|e| e.as_ref()).collect()
}

pub fn write_sections<W: Write>(
    out: &mut W,
    format: OutputFormat,
    sections: &[Section],
) -> Result<()> {
    for section in sections {
        match format {
            OutputFormat::Text => {
                writeln!(out)?;
                writeln!(out, "{}", section.title())?;
                match section {
                    Section::Entities { entities, .. } => {
                        for entity in entities {
                            writeln!(out, "{}", entity)?;
                        }
                    }
                    Section::Related { related, nothing, .. } => {
                        for (parent, children) in related {
                            writeln!(out, "{}", parent)?;
                            for child in children {
                                writeln!(out, "\t{}", child)?;
                            }
                            if children.is_empty() {
                                writeln!(out, "\t{}", nothing)?;
                            }
                        }
                    }
                }
            }
            OutputFormat::Json => {
                writeln!(out, "{}", section.title())?;
                let array: serde_json::Value = match section {
                    Section::Entities { entities, .. } => json!(as_entities(entities)),
                    Section::Related { related, .. } => related
                        .iter()
                        .map(|(parent, children)| {
                            let parent = Arc::as_ref(parent);
                            json!({ "parent": parent, "related": as_entities(children) })
                        })
                        .collect(),
                };
                writeln!(out, "{}", serde_json::to_string(&array)?)?;
            }
        }
    }
    Ok(())
}

/// Builds the walkthrough and writes it in the configured format.
pub fn write_report<W: Write>(out: &mut W, settings: &Settings) -> Result<()> {
    let sections = build(settings)?;
    write_sections(out, settings.format, &sections)
}
