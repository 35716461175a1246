//! Fixture views and recording helpers for testing faces crates

pub mod fixtures;
pub mod recording;
pub mod writers;

pub use fixtures::*;
pub use recording::*;
pub use writers::*;

pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::recording::*;
    pub use crate::writers::*;
}
