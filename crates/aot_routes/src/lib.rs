//! Lazy route discovery and bookkeeping.
//!
//! A lazy route is a `loadChildren` reference naming a module that is loaded
//! on demand. This crate scans source files for such references
//! ([`scan_routes`]), resolves them into a [`LazyRouteMap`], rewrites them to
//! their generated-factory counterparts ([`PostProcessor`]), and keeps the
//! persistent map merged across build cycles ([`RouteTable`]), reporting
//! [`RouteConflict`]s when an incremental pass disagrees with an earlier one.
//!
//! The entry module of an application can also be inferred from its main
//! file ([`resolve_entry_module`]).

#![warn(missing_docs)]

pub mod entry;
pub mod key;
pub mod map;
pub mod postprocess;
pub mod scan;
pub mod table;

pub use entry::resolve_entry_module;
pub use key::RouteReference;
pub use map::LazyRouteMap;
pub use postprocess::{PostProcessor, FACTORY_SUFFIX};
pub use scan::{
    discover_in_file, discover_incremental, scan_routes, IncrementalDiscovery, ScannedRoute,
};
pub use table::{RouteConflict, RouteTable, CONFLICT_MESSAGE};
