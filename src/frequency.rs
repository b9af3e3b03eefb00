//! DTO usage statistics over a finished [`Inventory`].
//!
//! Each DTO is counted once per (controller, endpoint) list it appears in;
//! endpoint DTO sets are already deduplicated.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inventory::Inventory;

/// DTO type expression -> number of endpoint lists referencing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyTable(BTreeMap<String, usize>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MostUsed {
    pub count: usize,
    pub dtos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySummary {
    pub distinct: usize,
    pub most_used: Option<MostUsed>,
    pub top: Vec<(String, usize)>,
}

impl FrequencyTable {
    pub fn from_inventory(inventory: &Inventory) -> Self {
        let mut counts = BTreeMap::new();
        for list in inventory.dto_lists() {
            for dto in list {
                *counts.entry(dto.clone()).or_insert(0) += 1;
            }
        }
        Self(counts)
    }

    pub fn get(&self, dto: &str) -> Option<usize> {
        self.0.get(dto).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(dto, count)| (dto.as_str(), *count))
    }

    pub fn most_used(&self) -> Option<MostUsed> {
        let count = self.0.values().copied().max()?;
        let dtos = self
            .0
            .iter()
            .filter(|(_, c)| **c == count)
            .map(|(dto, _)| dto.clone())
            .collect();
        Some(MostUsed { count, dtos })
    }

    /// The `n` most used DTOs, by count descending then name ascending.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut entries: Vec<(&String, &usize)> = self.0.iter().collect();
        entries.sort_by(|(a_name, a_count), (b_name, b_count)| {
            b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
        });
        entries
            .into_iter()
            .take(n)
            .map(|(dto, count)| (dto.clone(), *count))
            .collect()
    }

    pub fn summary(&self, top: usize) -> FrequencySummary {
        FrequencySummary {
            distinct: self.len(),
            most_used: self.most_used(),
            top: self.top(top),
        }
    }
}

impl fmt::Display for FrequencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of unique DTOs: {}", self.distinct)?;
        match &self.most_used {
            Some(most) => writeln!(
                f,
                "\n== Most used DTO: [{}] (Used {} times) ==",
                most.dtos.join(", "),
                most.count
            )?,
            None => writeln!(f, "\n== No DTOs found ==")?,
        }
        if !self.top.is_empty() {
            writeln!(f, "\n== Frequently used DTOs ==\n")?;
            for (dto, count) in &self.top {
                writeln!(f, "{dto} : {count}")?;
            }
        }
        Ok(())
    }
}
