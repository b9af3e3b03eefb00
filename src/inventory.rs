//! Controller, endpoint and DTO accumulation.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointOrigin {
    Declared,
    /// Inherited from the named, directly implemented interface.
    Interface(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointInfo {
    name: String,
    origin: EndpointOrigin,
    dtos: BTreeSet<String>,
}

impl EndpointInfo {
    pub fn new(name: impl Into<String>, origin: EndpointOrigin) -> Self {
        Self {
            name: name.into(),
            origin,
            dtos: BTreeSet::new(),
        }
    }

    pub fn add_dto(&mut self, dto: impl Into<String>) {
        self.dtos.insert(dto.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &EndpointOrigin {
        &self.origin
    }

    pub fn dtos(&self) -> impl Iterator<Item = &str> {
        self.dtos.iter().map(String::as_str)
    }

    pub fn dto_list(&self) -> Vec<String> {
        self.dtos.iter().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerInfo {
    qualified_name: String,
    endpoints: Vec<EndpointInfo>,
}

impl ControllerInfo {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            endpoints: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn add_endpoint(&mut self, endpoint: EndpointInfo) {
        self.endpoints.push(endpoint);
    }

    pub fn endpoints(&self) -> &[EndpointInfo] {
        &self.endpoints
    }

    /// Name-keyed view of the endpoints. When two endpoints share a name the
    /// one appended last wins.
    pub fn flatten(&self) -> EndpointMap {
        let mut map = EndpointMap::new();
        for endpoint in &self.endpoints {
            if map
                .insert(endpoint.name.clone(), endpoint.dto_list())
                .is_some()
            {
                debug!(
                    "{}: endpoint {} declared more than once, keeping the {:?} one",
                    self.qualified_name, endpoint.name, endpoint.origin
                );
            }
        }
        map
    }
}

/// Endpoint method name -> DTO type expressions.
pub type EndpointMap = BTreeMap<String, Vec<String>>;

/// Controller FQN -> endpoints. The exported artifact of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<String, EndpointMap>);

impl Inventory {
    pub fn get(&self, controller: &str) -> Option<&EndpointMap> {
        self.0.get(controller)
    }

    pub fn controllers(&self) -> impl Iterator<Item = (&str, &EndpointMap)> {
        self.0.iter().map(|(name, endpoints)| (name.as_str(), endpoints))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn endpoint_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn dto_lists(&self) -> impl Iterator<Item = &[String]> {
        self.0
            .values()
            .flat_map(|endpoints| endpoints.values().map(Vec::as_slice))
    }
}

impl FromIterator<(String, EndpointMap)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (String, EndpointMap)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Collects controllers during the resolution pass. A controller whose FQN
/// was already seen replaces the earlier one.
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    controllers: BTreeMap<String, ControllerInfo>,
    replaced: usize,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, controller: ControllerInfo) -> Option<ControllerInfo> {
        let previous = self
            .controllers
            .insert(controller.qualified_name.clone(), controller);
        if let Some(prev) = &previous {
            self.replaced += 1;
            warn!(
                "controller {} declared more than once, keeping the later declaration",
                prev.qualified_name
            );
        }
        previous
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn collisions(&self) -> usize {
        self.replaced
    }

    pub fn finish(self) -> Inventory {
        self.controllers
            .into_iter()
            .map(|(name, controller)| {
                let endpoints = controller.flatten();
                (name, endpoints)
            })
            .collect()
    }
}
