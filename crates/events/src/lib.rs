//! Topology events and the projection they replay into.
//!
//! - [`Event`]: immutable mutation record (equipment, property, reserved link)
//! - [`EventFactory`]: the only place ids and timestamps are minted
//! - [`projection`]: pure replay of a full log into a forest of [`Object`]s

pub mod event;
pub mod factory;
pub mod projection;

pub use event::{Event, Payload};
pub use factory::{EventFactory, NAME_KEY};
pub use projection::{ChildLinking, Object, Projection, UnknownChildLinking, build, build_with};
