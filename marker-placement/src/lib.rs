//! Computes the successive anchor positions at which a fixed-size marker is drawn along or within a
//! feature's geometry during map rendering.
//!
//! A rendering pipeline builds one [`PlacementParams`](placement::PlacementParams) per symbol layer,
//! binds a [`MarkerPlacement`](placement::MarkerPlacement) strategy to it and drains
//! [`get_point`](placement::MarkerPlacement::get_point) until it returns `None`.

/// Collision queries consulted by the placement strategies
pub mod collision;

/// Geometric primitives, transformations and feature geometries
pub mod geometry;

/// Placement parameters, direction resolution and the placement strategies
pub mod placement;

/// Helper functions which do not belong to any specific module
pub mod util;
