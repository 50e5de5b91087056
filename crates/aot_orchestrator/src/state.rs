//! Build cycle states.

use std::fmt;

/// Where the orchestrator is within a build cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// No cycle is running.
    Idle,
    /// Files changed since the last cycle; the next cycle starts from generation.
    Invalidated,
    /// Running the code generator.
    Generating,
    /// Creating the post-generation program.
    ProgramBuilding,
    /// Collecting global diagnostics.
    TypeChecking,
    /// Discovering lazy routes.
    RouteDiscovery,
    /// Publishing routes and clearing per-cycle markers.
    Finalizing,
}

impl BuildState {
    /// Returns `true` while a cycle is running.
    pub fn is_busy(self) -> bool {
        !matches!(self, BuildState::Idle | BuildState::Invalidated)
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildState::Idle => "idle",
            BuildState::Invalidated => "invalidated",
            BuildState::Generating => "generating",
            BuildState::ProgramBuilding => "program-building",
            BuildState::TypeChecking => "type-checking",
            BuildState::RouteDiscovery => "route-discovery",
            BuildState::Finalizing => "finalizing",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_states() {
        assert!(!BuildState::Idle.is_busy());
        assert!(!BuildState::Invalidated.is_busy());
        assert!(BuildState::Generating.is_busy());
        assert!(BuildState::Finalizing.is_busy());
        assert_eq!(BuildState::RouteDiscovery.to_string(), "route-discovery");
    }
}
