//! Mesh processing algorithms.
//!
//! - **Subdivision**: regular 1-to-4 splitting and adaptive sliver refinement
//! - **Analysis**: valence and angle deficits, checkerboard coloring
//!
//! Every algorithm takes the mesh it works on explicitly; topology-changing
//! algorithms replace the mesh only once the new one is fully built.

pub mod analysis;
pub mod progress;
pub mod subdivide;

pub use progress::Progress;
