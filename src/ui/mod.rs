pub mod surface;

pub use surface::{dispatch, MapSurface};
