//! Replay of a full event log into a forest of materialized objects.
//!
//! [`build`] is a pure function of the log it is handed. Nothing is cached
//! between calls: every rebuild indexes the log afresh and discards the
//! previous generation.

use core::fmt;
use core::str::FromStr;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use topology_core::{Category, EventId};

use crate::event::{Event, Payload};

/// How equipment whose parent is another piece of equipment is materialized.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildLinking {
    /// Only root equipment becomes an object; nested equipment is dropped and
    /// `children` stays empty.
    #[default]
    Flat,
    /// Nested equipment is attached, recursively, under the object it names
    /// as parent.
    Nested,
}

impl fmt::Display for ChildLinking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildLinking::Flat => f.write_str("flat"),
            ChildLinking::Nested => f.write_str("nested"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown child linking mode '{0}' (expected 'flat' or 'nested')")]
pub struct UnknownChildLinking(pub String);

impl FromStr for ChildLinking {
    type Err = UnknownChildLinking;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(ChildLinking::Flat),
            "nested" => Ok(ChildLinking::Nested),
            _ => Err(UnknownChildLinking(s.to_string())),
        }
    }
}

/// A materialized equipment item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    id: EventId,
    attributes: Payload,
    properties: Payload,
    children: Vec<Object>,
}

impl Object {
    /// Id of the equipment event that spawned this object.
    pub fn id(&self) -> &EventId {
        &self.id
    }

    /// Verbatim copy of the spawning event's payload.
    pub fn attributes(&self) -> &Payload {
        &self.attributes
    }

    /// Merge of every property event targeting this object; later events win.
    pub fn properties(&self) -> &Payload {
        &self.properties
    }

    /// Always empty under [`ChildLinking::Flat`].
    pub fn children(&self) -> &[Object] {
        &self.children
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get(crate::factory::NAME_KEY).map(String::as_str)
    }

    fn find(&self, id: &str) -> Option<&Object> {
        let mut pending = vec![self];
        while let Some(object) = pending.pop() {
            if object.id == id {
                return Some(object);
            }
            pending.extend(object.children.iter().rev());
        }
        None
    }
}

/// Unlinks children before they drop so deep nesting never recurses.
impl Drop for Object {
    fn drop(&mut self) {
        let mut pending = core::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

/// One generation of the materialized forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    objects: Vec<Object>,
}

impl Projection {
    /// Root objects in the order their events were appended.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Object> {
        self.objects.iter()
    }

    /// Number of root objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up an object by id, searching nested children as well as roots.
    pub fn get(&self, id: &str) -> Option<&Object> {
        self.objects.iter().find_map(|object| object.find(id))
    }

    pub fn into_objects(self) -> Vec<Object> {
        self.objects
    }
}

impl<'a> IntoIterator for &'a Projection {
    type Item = &'a Object;
    type IntoIter = core::slice::Iter<'a, Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

/// Replay `events` with the baseline [`ChildLinking::Flat`] semantics.
pub fn build(events: &[Event]) -> Projection {
    build_with(events, ChildLinking::Flat)
}

/// Replay `events` (in log order) into a projection.
///
/// Roots are equipment events without a parent, in log order. Property
/// events are merged into the object whose id they name, in log order, so a
/// later value overwrites an earlier one for the same key. Property events
/// naming no object are skipped.
pub fn build_with(events: &[Event], linking: ChildLinking) -> Projection {
    let index = Index::new(events, linking);
    let roots = events
        .iter()
        .filter(|e| e.is_root() && e.category() == Category::Equipment);

    let mut attached = 0usize;
    let objects = index.materialize(roots, &mut attached);

    let orphaned = index.property_events.saturating_sub(attached);
    if orphaned > 0 {
        tracing::trace!(orphaned, "skipped property events with no resolvable parent");
    }

    Projection { objects }
}

/// Per-rebuild lookup tables keyed by parent id. Entries keep log order.
struct Index<'a> {
    properties: HashMap<&'a str, Vec<&'a Event>>,
    /// Only populated under [`ChildLinking::Nested`].
    nested_equipment: HashMap<&'a str, Vec<&'a Event>>,
    property_events: usize,
}

/// An object whose children are still being materialized.
struct Frame<'a> {
    event: &'a Event,
    properties: Payload,
    next_child: usize,
    children: Vec<Object>,
}

impl<'a> Index<'a> {
    fn new(events: &'a [Event], linking: ChildLinking) -> Self {
        let mut properties: HashMap<&str, Vec<&Event>> = HashMap::new();
        let mut nested_equipment: HashMap<&str, Vec<&Event>> = HashMap::new();
        let mut property_events = 0;

        for event in events {
            match (event.category(), event.parent_id()) {
                (Category::Property, parent) => {
                    property_events += 1;
                    if let Some(parent) = parent {
                        properties.entry(parent.as_str()).or_default().push(event);
                    }
                }
                (Category::Equipment, Some(parent)) if linking == ChildLinking::Nested => {
                    nested_equipment.entry(parent.as_str()).or_default().push(event);
                }
                _ => {}
            }
        }

        Self {
            properties,
            nested_equipment,
            property_events,
        }
    }

    /// Depth-first walk from each root with an explicit stack, so nesting
    /// depth is bounded by the heap rather than the thread stack. Children
    /// are closed before their parent and keep log order.
    fn materialize(
        &self,
        roots: impl Iterator<Item = &'a Event>,
        attached: &mut usize,
    ) -> Vec<Object> {
        let mut objects = Vec::new();
        let mut path: HashSet<&'a str> = HashSet::new();
        let mut stack: Vec<Frame<'a>> = Vec::new();

        for root in roots {
            path.insert(root.id().as_str());
            stack.push(self.open(root, attached));

            while let Some(frame) = stack.last_mut() {
                let children = self.children_of(frame.event);
                if let Some(child) = children.get(frame.next_child).copied() {
                    frame.next_child += 1;
                    // An id already on the path would loop forever.
                    if path.insert(child.id().as_str()) {
                        stack.push(self.open(child, attached));
                    }
                    continue;
                }

                let Some(done) = stack.pop() else { break };
                path.remove(done.event.id().as_str());
                let object = Object {
                    id: done.event.id().clone(),
                    attributes: done.event.payload().clone(),
                    properties: done.properties,
                    children: done.children,
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(object),
                    None => objects.push(object),
                }
            }
        }

        objects
    }

    fn open(&self, event: &'a Event, attached: &mut usize) -> Frame<'a> {
        let mut properties = Payload::new();
        let matches = self
            .properties
            .get(event.id().as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for property in matches {
            *attached += 1;
            properties.extend(
                property
                    .payload()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }

        Frame {
            event,
            properties,
            next_child: 0,
            children: Vec::new(),
        }
    }

    fn children_of(&self, event: &Event) -> &[&'a Event] {
        self.nested_equipment
            .get(event.id().as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
