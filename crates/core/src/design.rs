use crate::{
    config::{GridConfig, Limits},
    lattice::{EdgeKey, EdgeKeySet, Lattice},
    mirror::MirrorMode,
    stats::Statistics,
};
use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A light installation design: the grid it's laid out on, how toggles are
/// mirrored, and which edges are lit.
///
/// This is the shape that gets persisted. Enabled edges are kept as raw key
/// strings, because they're only meaningful against the lattice they were
/// created on. After the grid changes, some (or all) of them may not exist
/// anymore, so always go through [Design::enabled_edges] to read them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Design {
    // Plain values go before the nested tables, or TOML can't represent it
    pub mirror_mode: MirrorMode,
    pub enabled_edges: Vec<String>,
    #[validate]
    pub grid: GridConfig,
    #[validate]
    pub limits: Limits,
}

impl Design {
    /// Check that the design's config values are sane. The underlying
    /// [validator::ValidationErrors] can be recovered by downcasting.
    pub fn validate_config(&self) -> anyhow::Result<()> {
        self.validate().context("invalid design config")
    }

    /// Validate the config, then build the lattice for this design's grid
    pub fn build_lattice(&self) -> anyhow::Result<Lattice> {
        self.validate_config()?;
        let solved = self.grid.solve();
        info!(
            "Solved grid is {:.2}x{:.2} ({} requested {}x{})",
            solved.actual_width,
            solved.actual_length,
            self.grid.orientation,
            self.grid.width,
            self.grid.length
        );
        Ok(Lattice::build(
            solved.dimensions,
            self.grid.layout_spacing,
            self.grid.orientation,
        ))
    }

    /// Get the enabled edges that actually exist in the given lattice. Stale
    /// or malformed keys are dropped.
    pub fn enabled_edges(&self, lattice: &Lattice) -> EdgeKeySet {
        lattice.filter_edges(&self.enabled_edges)
    }

    /// Replace the stored edges with the given set. Keys are stored in the
    /// lattice's edge order, so the same design always serializes the same
    /// way. Anything not in the lattice is left out.
    pub fn set_enabled_edges(
        &mut self,
        lattice: &Lattice,
        enabled: &EdgeKeySet,
    ) {
        self.enabled_edges = lattice
            .edges()
            .iter()
            .filter(|key| enabled.contains(key))
            .map(EdgeKey::to_string)
            .collect();
    }

    /// Toggle an edge (plus its mirror images, according to this design's
    /// mirror mode) and store the result. Returns the new enabled set.
    pub fn toggle(&mut self, lattice: &Lattice, key: EdgeKey) -> EdgeKeySet {
        let enabled = toggle_edge(
            &self.enabled_edges(lattice),
            key,
            self.mirror_mode,
            lattice,
        );
        self.set_enabled_edges(lattice, &enabled);
        enabled
    }

    /// Compute statistics for the design's current edges
    pub fn statistics(&self, lattice: &Lattice) -> Statistics {
        lattice.statistics(&self.enabled_edges(lattice))
    }

    /// Deserialize a design from JSON. Missing fields get defaults. Will fail
    /// if the input is malformed.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("error deserializing design")
    }

    /// Serialize this design into JSON. This is a recoverable format, which
    /// can be loaded back with [Design::from_json].
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("error serializing design")
    }
}

/// Toggle an edge and all its mirror images, returning the new set of enabled
/// edges. The input set is left untouched.
///
/// Each edge in the mirror group is flipped on its own: enabled edges turn
/// off, disabled edges turn on. That makes toggling the same key twice (with
/// the same mode and lattice) a no-op. If `key` isn't in the lattice, the
/// output is just a copy of the input.
pub fn toggle_edge(
    enabled: &EdgeKeySet,
    key: EdgeKey,
    mode: MirrorMode,
    lattice: &Lattice,
) -> EdgeKeySet {
    let group = lattice.mirrored_edges(key, mode);
    debug!("Toggling edge {} ({}): {} edges", key, mode, group.len());
    enabled.symmetric_difference(&group).copied().collect()
}
