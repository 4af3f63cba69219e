//! Domain core of the retro camera photo booth.
//!
//! Pure types and state machines with no I/O: the photo entity, the
//! capture/develop/place lifecycle, the scratch-off occlusion layer, card
//! view state, the camera rig, and the caption contract.

pub mod booth;
pub mod camera;
pub mod caption;
pub mod develop;
pub mod error;
pub mod gallery;
pub mod occlusion;
pub mod photo;
pub mod types;
pub mod view;
