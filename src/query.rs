//! Pure filter, sort and statistics views over diagram snapshots.
//!
//! Nothing here touches the collection manager: every function takes a
//! slice of diagrams and returns fresh data, so view concerns can never
//! reorder or mutate what the manager holds.
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::{Diagram, DiagramType};

/// Sort orders available for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently updated first
    #[default]
    UpdatedDesc,
    /// Oldest created first
    CreatedAsc,
    /// Title, lexicographically ascending
    TitleAsc,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "updated" | "updatedat" => Ok(SortKey::UpdatedDesc),
            "created" | "createdat" => Ok(SortKey::CreatedAsc),
            "title" => Ok(SortKey::TitleAsc),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

/// Filter and ordering applied to a listing.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Case-insensitive substring matched against title and description
    pub search: Option<String>,
    /// Keep only diagrams of this exact type
    pub diagram_type: Option<DiagramType>,
    pub sort: SortKey,
}

impl ListFilter {
    /// Applies the filter to a snapshot, returning a new ordered vector.
    pub fn apply(&self, diagrams: &[Diagram]) -> Vec<Diagram> {
        let mut result: Vec<Diagram> = diagrams
            .iter()
            .filter(|diagram| self.matches(diagram))
            .cloned()
            .collect();
        sort_diagrams(&mut result, self.sort);
        result
    }

    fn matches(&self, diagram: &Diagram) -> bool {
        if let Some(query) = &self.search {
            let query = query.to_lowercase();
            if !query.is_empty() && !matches_search(diagram, &query) {
                return false;
            }
        }
        if let Some(diagram_type) = self.diagram_type {
            if diagram.diagram_type != diagram_type {
                return false;
            }
        }
        true
    }
}

fn matches_search(diagram: &Diagram, lowercase_query: &str) -> bool {
    diagram.title.to_lowercase().contains(lowercase_query)
        || diagram
            .description
            .as_ref()
            .is_some_and(|description| description.to_lowercase().contains(lowercase_query))
}

/// Sorts in place according to `key`. The sort is stable, so equal keys
/// keep their incoming order.
pub fn sort_diagrams(diagrams: &mut [Diagram], key: SortKey) {
    match key {
        SortKey::UpdatedDesc => diagrams.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortKey::CreatedAsc => diagrams.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::TitleAsc => diagrams.sort_by(|a, b| a.title.cmp(&b.title)),
    }
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStats {
    /// Size of the loaded collection
    pub total: usize,
    /// Diagrams created within the trailing seven days of `now`
    pub created_this_week: usize,
    /// The type appearing most often; ties go to the type encountered
    /// first in collection order. None for an empty collection.
    pub most_used_type: Option<DiagramType>,
}

/// Computes dashboard statistics for a snapshot at a given instant.
pub fn collection_stats(diagrams: &[Diagram], now: DateTime<Utc>) -> CollectionStats {
    let week_ago = now - Duration::days(7);
    let created_this_week = diagrams
        .iter()
        .filter(|diagram| diagram.created_at >= week_ago)
        .count();

    // Counts in first-encounter order so ties resolve deterministically.
    let mut counts: Vec<(DiagramType, usize)> = Vec::new();
    for diagram in diagrams {
        match counts
            .iter_mut()
            .find(|(diagram_type, _)| *diagram_type == diagram.diagram_type)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((diagram.diagram_type, 1)),
        }
    }

    let mut most_used_type = None;
    let mut best = 0;
    for (diagram_type, count) in counts {
        if count > best {
            best = count;
            most_used_type = Some(diagram_type);
        }
    }

    CollectionStats {
        total: diagrams.len(),
        created_this_week,
        most_used_type,
    }
}

/// The `count` most recently updated diagrams.
pub fn most_recent(diagrams: &[Diagram], count: usize) -> Vec<Diagram> {
    let mut sorted = diagrams.to_vec();
    sort_diagrams(&mut sorted, SortKey::UpdatedDesc);
    sorted.truncate(count);
    sorted
}
