// crates/townplanpay-core/src/core/stage.rs
// ============================================================================
// Module: TownPlanPay Milestone Stages
// Description: Fixed catalog of construction milestone stages.
// Purpose: Drive project progress reporting.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Stages are listed in display order. Ledger milestones are free-form
//! strings; a stage counts as reached when a milestone string contains the
//! stage id (see [`crate::runtime::project_status`]).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Stages
// ============================================================================

/// Construction milestone stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStage {
    /// Site preparation complete.
    SitePrep,
    /// Foundation work complete.
    Foundation,
    /// Structural work complete.
    Structural,
    /// Road paving complete.
    Paving,
    /// Materials delivered.
    Materials,
    /// Project half complete.
    Completion,
}

impl MilestoneStage {
    /// Returns every stage in display order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::SitePrep,
            Self::Foundation,
            Self::Structural,
            Self::Paving,
            Self::Materials,
            Self::Completion,
        ]
    }

    /// Returns the stage id used in milestone strings.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::SitePrep => "site_prep",
            Self::Foundation => "foundation",
            Self::Structural => "structural",
            Self::Paving => "paving",
            Self::Materials => "materials",
            Self::Completion => "completion",
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SitePrep => "Site Preparation",
            Self::Foundation => "Foundation Work",
            Self::Structural => "Structural Work",
            Self::Paving => "Road Paving",
            Self::Materials => "Materials Delivered",
            Self::Completion => "Project 50% Complete",
        }
    }

    /// Returns the 1-based display order.
    #[must_use]
    pub const fn order(self) -> u8 {
        match self {
            Self::SitePrep => 1,
            Self::Foundation => 2,
            Self::Structural => 3,
            Self::Paving => 4,
            Self::Materials => 5,
            Self::Completion => 6,
        }
    }

    /// Parses a stage id.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|stage| stage.id() == id)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
