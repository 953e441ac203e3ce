//! High-level runtime engine settings
//!
//! Selects the force evaluation mode (Barnes–Hut or direct summation) and
//! the tree options used when building and running a `Scenario`

/// Opening-angle threshold used when a scenario does not set one
pub const DEFAULT_THETA: f64 = 0.5;

/// Deepest level the quadtree subdivides to before merging bodies into a leaf
pub const DEFAULT_MAX_DEPTH: u32 = 32;

/// Hard ceiling on the subdivision depth. Insertion recurses once per level,
/// and a 600 unit world is already split below 1e-16 units at this depth.
pub const MAX_DEPTH_LIMIT: u32 = 64;

#[derive(Debug, Clone)]
pub struct Engine {
    pub barnes_hut: bool, // false = direct, true = barnes-hut
    pub theta: f64, // node width / distance below which a subtree is one point mass
    pub max_depth: u32, // subdivision cap for coincident bodies
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            barnes_hut: true,
            theta: DEFAULT_THETA,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
