// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Read-only exercise and equipment catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog exercise with its muscle groups and equipment name.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub muscle_group: String,
    pub primary_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    /// Equipment name, if the exercise needs any
    pub equipment: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query filters for `GET /api/exercises`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExerciseFilter {
    /// Exact muscle group
    pub muscle_group: Option<String>,
    /// Case-insensitive substring of the equipment name
    pub equipment: Option<String>,
    /// Case-insensitive substring of the exercise name
    pub search: Option<String>,
}

impl ExerciseFilter {
    /// Drop blank parameters so `?search=` behaves like no filter.
    pub fn normalized(self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            muscle_group: clean(self.muscle_group),
            equipment: clean(self.equipment),
            search: clean(self.search),
        }
    }

    pub fn matches(&self, exercise: &Exercise) -> bool {
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        };

        self.muscle_group
            .as_deref()
            .map_or(true, |mg| exercise.muscle_group == mg)
            && self.equipment.as_deref().map_or(true, |eq| {
                exercise
                    .equipment
                    .as_deref()
                    .is_some_and(|name| contains(name, eq))
            })
            && self
                .search
                .as_deref()
                .map_or(true, |s| contains(&exercise.name, s))
    }
}

/// Query filters for `GET /api/equipment`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentFilter {
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_press() -> Exercise {
        Exercise {
            id: 1,
            name: "Bench Press".to_string(),
            muscle_group: "chest".to_string(),
            primary_muscles: vec!["pectorals".to_string()],
            secondary_muscles: vec!["triceps".to_string()],
            equipment: Some("Barbell".to_string()),
            video_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_matches_substrings_case_insensitively() {
        let filter = ExerciseFilter {
            search: Some("bench".to_string()),
            equipment: Some("BAR".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&bench_press()));
    }

    #[test]
    fn filter_muscle_group_is_exact() {
        let filter = ExerciseFilter {
            muscle_group: Some("ches".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&bench_press()));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let filter = ExerciseFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        }
        .normalized();
        assert!(filter.search.is_none());
        assert!(filter.matches(&bench_press()));
    }
}
