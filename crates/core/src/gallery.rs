//! Public gallery rules shared by the server and the booth.
//!
//! The remote gallery is a fixed-capacity list: new snapshots go to the
//! front, and the list is trimmed to [`GALLERY_CAPACITY`] entries, evicting
//! the oldest insertions first.

use std::collections::HashSet;

use rand::Rng;

use crate::error::CoreError;
use crate::photo::Photo;

/// Maximum number of photos kept in the public gallery.
pub const GALLERY_CAPACITY: usize = 50;

/// Display tilt range for gallery cards in degrees, `[-MAX, MAX)`.
pub const GALLERY_TILT_DEGREES: f64 = 3.0;

/// Reject a snapshot that cannot be rendered.
pub fn validate_snapshot(photo: &Photo) -> Result<(), CoreError> {
    if photo.image_data.trim().is_empty() {
        return Err(CoreError::Validation("Invalid photo data".into()));
    }
    Ok(())
}

/// A gallery card: a photo plus its display tilt.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryCard {
    pub photo: Photo,
    pub tilt: f64,
}

/// Compose the gallery view: the user's own public photos (shown fully
/// developed) followed by the remote feed.
///
/// Each id appears once. A remote snapshot of one of the user's own photos
/// is skipped in favour of the local copy.
pub fn compose_gallery<R: Rng>(local: &[Photo], remote: &[Photo], rng: &mut R) -> Vec<GalleryCard> {
    let own = local.iter().filter(|p| p.is_public()).map(|p| Photo {
        is_developing: false,
        ..p.clone()
    });
    let mut seen = HashSet::new();
    own.chain(remote.iter().cloned())
        .filter(|photo| seen.insert(photo.id.clone()))
        .map(|photo| GalleryCard {
            photo,
            tilt: rng.random_range(-GALLERY_TILT_DEGREES..GALLERY_TILT_DEGREES),
        })
        .collect()
}
