//! Domain entities for randr-layout.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from process APIs, file systems, terminals or UI
//!   frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the rules are: what a monitor is, when two monitors count as mirrored,
//! how real monitor geometry is projected onto the arrangement canvas, and
//! where a dropped monitor tile ends up.

/// A connected display output as reported by the query command.
pub mod monitor;

/// Grouping of monitors by coincident position.
pub mod mirror;

/// Resolution and refresh-rate choice lists.
pub mod modes;

/// Projection of real pixel geometry onto the arrangement canvas.
pub mod scene;

/// Source / target selection state machine.
pub mod selection;

/// Drag-and-drop snap engine and the pending layout change table.
///
/// See [`snap::SnapEngine`] for the main type.
pub mod snap;
