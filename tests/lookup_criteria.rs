use std::collections::HashSet;
use std::sync::Arc;

use cloudkeep::construct::{Criteria, Entity, Kind};
use cloudkeep::lookup::{exclude, lookup, matches, related};
use cloudkeep::parse::{Parser, parse};

fn setup() -> (Vec<Arc<Entity>>, Vec<Arc<Entity>>) {
    let mut parser = Parser::new();
    let instances = parser.parse(
        Kind::Instance,
        "id:1100,name:micro,state:running,region:oregon%\
         id:1200,name:large1,state:terminated,region:n.virginia%\
         id:1300,name:xlarge3,state:stopped,region:pasific%\
         id:1400,name:large1,state:running,region:oregon",
    );
    let volumes = parser.parse(
        Kind::Volume,
        "id:2100,name:data1,state:available,region:ohio,attached_instance_id:%\
         id:2200,name:data1,state:in-use,region:ohio,attached_instance_id:1100%\
         id:2300,name:data2,state:available,region:london,attached_instance_id:%\
         id:2400,name:data2,state:in-use,region:oregon,attached_instance_id:1300",
    );
    (instances, volumes)
}

fn ids(entities: &[Arc<Entity>]) -> Vec<&str> {
    entities.iter().filter_map(|e| e.get("id")).collect()
}

#[test]
fn running_in_oregon() {
    let instances = parse(
        "instance",
        "id:1100,name:micro,state:running,region:oregon%\
         id:1400,name:large1,state:running,region:oregon",
    );
    assert_eq!(instances.len(), 2);
    let running = lookup(&instances, &Criteria::from([("state", "running"), ("region", "oregon")]));
    assert_eq!(running.len(), 2);
    assert!(lookup(&instances, &Criteria::from([("state", "terminated")])).is_empty());
}

#[test]
fn attached_to_single_instance() {
    let volumes = parse(
        "volume",
        "id:2200,name:data1,state:in-use,region:ohio,attached_instance_id:1100",
    );
    let attached = lookup(&volumes, &Criteria::from([("attached_instance_id", "1100")]));
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0], volumes[0]);
}

#[test]
fn empty_criteria_returns_everything_in_order() {
    let (instances, _) = setup();
    let all = lookup(&instances, &Criteria::new());
    assert_eq!(all, instances);
}

#[test]
fn unknown_key_matches_nothing() {
    let (_, volumes) = setup();
    assert!(lookup(&volumes, &Criteria::from([("incorrect_attribute", "paris")])).is_empty());
    let mixed = Criteria::from([("state", "available"), ("incorrect_attribute", "paris")]);
    assert!(lookup(&volumes, &mixed).is_empty());
}

#[test]
fn values_compare_exactly() {
    let (instances, _) = setup();
    assert!(lookup(&instances, &Criteria::from([("state", "Running")])).is_empty());
    assert!(lookup(&instances, &Criteria::from([("state", "running ")])).is_empty());
    assert!(matches(&instances[0], &Criteria::from([("name", "micro")])));
}

#[test]
fn filter_is_stable_and_idempotent() {
    let (_, volumes) = setup();
    let available = Criteria::from([("state", "available")]);
    let once = lookup(&volumes, &available);
    assert_eq!(ids(&once), vec!["2100", "2300"]);
    let twice = lookup(&once, &available);
    assert_eq!(once, twice);
}

#[test]
fn multiple_criteria_all_must_hold() {
    let (_, volumes) = setup();
    let ohio = lookup(&volumes, &Criteria::from([("region", "ohio"), ("state", "available")]));
    assert_eq!(ids(&ohio), vec!["2100"]);
}

#[test]
fn empty_value_criteria_matches_unattached_volumes() {
    let (_, volumes) = setup();
    let unattached = lookup(&volumes, &Criteria::from([("attached_instance_id", "")]));
    assert_eq!(ids(&unattached), vec!["2100", "2300"]);
}

#[test]
fn not_terminated_instances() {
    let (instances, _) = setup();
    let terminated = lookup(&instances, &Criteria::from([("state", "terminated")]));
    let rest = exclude(&instances, &terminated);
    assert_eq!(ids(&rest), vec!["1100", "1300", "1400"]);
    assert_eq!(exclude(&instances, &[]), instances);
}

#[test]
fn exclusion_is_by_identity_not_content() {
    let twins = parse("instance", "id:1100%id:1100");
    let rest = exclude(&twins, &twins[..1]);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0], twins[1]);
}

#[test]
fn volumes_of_running_instances() {
    let (instances, volumes) = setup();
    let running = lookup(&instances, &Criteria::from([("state", "running")]));
    let attached: Vec<Vec<Arc<Entity>>> = running
        .iter()
        .map(|instance| {
            let id = instance.get("id").unwrap();
            let criteria = Criteria::new().with("attached_instance_id", id);
            lookup(&volumes, &criteria)
        })
        .collect();
    assert_eq!(ids(&attached[0]), vec!["2200"]);
    assert!(attached[1].is_empty(), "instance 1400 has no volumes");
    assert_eq!(related(&running[0], "id", &volumes, "attached_instance_id"), attached[0]);
}

#[test]
fn related_without_parent_key_is_empty() {
    let (_, volumes) = setup();
    let orphan = parse("instance", "name:nameless");
    assert!(related(&orphan[0], "id", &volumes, "attached_instance_id").is_empty());
}

#[test]
fn entities_from_separate_batches_stay_distinct() {
    let running = parse("instance", "id:1100,state:running");
    let terminated = parse("instance", "id:9999,state:terminated");
    assert_ne!(running[0], terminated[0]);
    let both: HashSet<Arc<Entity>> = running.iter().chain(terminated.iter()).cloned().collect();
    assert_eq!(both.len(), 2, "a set keeps both entities");
    assert_eq!(exclude(&running, &terminated), running);
}
