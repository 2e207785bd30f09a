//! Cloudkeep – a small in-memory model of cloud resources parsed from flat records.
//!
//! Resources arrive as *batches*: strings where records are separated by `%`,
//! fields by `,`, and each field is a `key:value` pair. For example
//! `id:1100,name:micro,state:running%id:1400,name:large1,state:running`.
//!
//! * A [`construct::Kind`] tags what a record describes (instance, volume or snapshot).
//! * An [`construct::Entity`] is one parsed record: a kind, an identity
//!   ([`construct::Thing`]) and an open-ended bag of [`construct::Attributes`].
//! * A [`construct::Criteria`] holds required attribute values used for filtering.
//!
//! ## Modules
//! * [`construct`] – identities, kinds, attributes, entities and criteria.
//! * [`parse`] – turning batches into entities, leniently or strictly.
//! * [`lookup`] – exact-match filtering and simple relational helpers.
//! * [`inventory`] – a keeper of entities across batches with indexed lookups.
//! * [`config`] – settings for the demonstration binary.
//! * [`report`] – the demonstration walkthrough, rendered as text or JSON.
//!
//! ## Quick Start
//! ```
//! use cloudkeep::{construct::Criteria, lookup::lookup, parse::parse};
//! let instances = parse("instance", "id:1100,state:running%id:1200,state:terminated");
//! let running = lookup(&instances, &Criteria::from([("state", "running")]));
//! assert_eq!(running.len(), 1);
//! assert_eq!(running[0].get("id"), Some("1100"));
//! ```
//!
//! Unknown kinds parse to nothing and unknown criteria keys match nothing;
//! neither is an error.

pub mod config;
pub mod construct;
pub mod error;
pub mod inventory;
pub mod lookup;
pub mod parse;
pub mod report;

pub use error::{CloudkeepError, Result};
