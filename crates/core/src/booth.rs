//! Capture, develop, and placement lifecycle of the photo wall.
//!
//! A [`Booth`] owns the committed wall collection and the single ejecting
//! slot. The slot is an `Option`, so at most one capture can be in flight;
//! asynchronous results (captions) are applied by id through
//! [`Booth::apply_caption`] and silently dropped when the id is gone.

use rand::Rng;

use crate::error::CoreError;
use crate::photo::{Photo, BASE_Z_INDEX, MAX_TILT_DEGREES};
use crate::types::{new_photo_id, PhotoId, Point, Timestamp};

/// Where a photo currently sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoStage {
    /// Held in the ejecting slot, emerging from the camera.
    Ejecting,
    /// Committed to the wall, develop animation still running.
    Developing,
    /// Committed to the wall, fully developed.
    Placed,
    /// Committed and mirrored to the public gallery.
    Published,
}

/// Why a shutter press did not produce a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CaptureRejected {
    #[error("the camera is switched off")]
    CameraOff,
    #[error("a photo is already ejecting")]
    InFlight,
}

/// Handle returned by an accepted capture, used to start the caption call.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureTicket {
    pub id: PhotoId,
    pub image_data: String,
}

/// Where an asynchronous caption landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionPatch {
    Ejecting,
    Committed,
    /// No photo with that id exists any more (deleted mid-flight).
    Dropped,
}

/// The photo wall plus the ejecting slot.
#[derive(Debug, Clone)]
pub struct Booth {
    photos: Vec<Photo>,
    ejecting: Option<Photo>,
    camera_enabled: bool,
}

impl Booth {
    /// Start from a previously persisted wall.
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            photos,
            ejecting: None,
            camera_enabled: true,
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn ejecting(&self) -> Option<&Photo> {
        self.ejecting.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn camera_enabled(&self) -> bool {
        self.camera_enabled
    }

    pub fn set_camera_enabled(&mut self, enabled: bool) {
        self.camera_enabled = enabled;
    }

    pub fn stage_of(&self, id: &str) -> Option<PhotoStage> {
        if self.ejecting.as_ref().is_some_and(|p| p.id == id) {
            return Some(PhotoStage::Ejecting);
        }
        self.get(id).map(|p| {
            if p.is_public() {
                PhotoStage::Published
            } else if p.is_developing {
                PhotoStage::Developing
            } else {
                PhotoStage::Placed
            }
        })
    }

    // -----------------------------------------------------------------------
    // Capture
    // -----------------------------------------------------------------------

    /// Take a still frame into the ejecting slot.
    pub fn begin_capture(
        &mut self,
        image_data: String,
        now: Timestamp,
    ) -> Result<CaptureTicket, CaptureRejected> {
        if !self.camera_enabled {
            return Err(CaptureRejected::CameraOff);
        }
        if self.ejecting.is_some() {
            return Err(CaptureRejected::InFlight);
        }

        let photo = Photo::captured(new_photo_id(), image_data, now);
        let ticket = CaptureTicket {
            id: photo.id.clone(),
            image_data: photo.image_data.clone(),
        };
        self.ejecting = Some(photo);
        Ok(ticket)
    }

    /// Patch a caption that arrived asynchronously.
    pub fn apply_caption(&mut self, id: &str, caption: &str) -> CaptionPatch {
        if let Some(photo) = self.ejecting.as_mut().filter(|p| p.id == id) {
            photo.caption = caption.to_string();
            return CaptionPatch::Ejecting;
        }
        match self.find_mut(id) {
            Some(photo) => {
                photo.caption = caption.to_string();
                CaptionPatch::Committed
            }
            None => CaptionPatch::Dropped,
        }
    }

    /// Finish the placement gesture on the ejecting photo and commit it.
    pub fn place_ejected<R: Rng>(
        &mut self,
        point: Point,
        rng: &mut R,
    ) -> Result<&Photo, CoreError> {
        let mut photo = self
            .ejecting
            .take()
            .ok_or_else(|| CoreError::Conflict("No photo is ejecting".into()))?;

        photo.x = point.x;
        photo.y = point.y;
        photo.rotation = rng.random_range(-MAX_TILT_DEGREES..MAX_TILT_DEGREES);
        photo.z_index = self.max_z_index();
        photo.secret_message = Some(String::new());

        tracing::debug!(photo_id = %photo.id, x = point.x, y = point.y, "Photo placed on wall");
        self.photos.push(photo);
        let last = self.photos.len() - 1;
        Ok(&self.photos[last])
    }

    // -----------------------------------------------------------------------
    // Wall mutations
    // -----------------------------------------------------------------------

    /// Move a placed photo and bring it to the front.
    pub fn drag(&mut self, id: &str, point: Point) -> Result<(), CoreError> {
        let top = self.max_z_index() + 1;
        let photo = self.require_mut(id)?;
        photo.x = point.x;
        photo.y = point.y;
        photo.z_index = top;
        Ok(())
    }

    /// Mark a photo public.
    ///
    /// Returns the gallery snapshot on the first publish and `None` when
    /// the photo was already public, so a repeated publish never mirrors
    /// twice.
    pub fn publish(&mut self, id: &str) -> Result<Option<Photo>, CoreError> {
        let photo = self.require_mut(id)?;
        if photo.is_public() {
            return Ok(None);
        }
        photo.is_public = Some(true);
        Ok(Some(photo.gallery_snapshot()))
    }

    /// Remove a photo from the wall. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != id);
        self.photos.len() != before
    }

    pub fn update_caption(&mut self, id: &str, caption: &str) -> Result<(), CoreError> {
        self.require_mut(id)?.caption = caption.to_string();
        Ok(())
    }

    pub fn update_secret(&mut self, id: &str, secret: &str) -> Result<(), CoreError> {
        self.require_mut(id)?.secret_message = Some(secret.to_string());
        Ok(())
    }

    /// Clear the developing flag once the develop ramp completes.
    ///
    /// Returns `true` if the flag changed.
    pub fn finish_developing(&mut self, id: &str) -> bool {
        match self.find_mut(id) {
            Some(photo) if photo.is_developing => {
                photo.is_developing = false;
                true
            }
            _ => false,
        }
    }

    /// Highest z-index on the wall, never below [`BASE_Z_INDEX`].
    pub fn max_z_index(&self) -> i64 {
        self.photos
            .iter()
            .map(|p| p.z_index)
            .fold(BASE_Z_INDEX, i64::max)
    }

    // ---- private helpers ----

    fn find_mut(&mut self, id: &str) -> Option<&mut Photo> {
        self.photos.iter_mut().find(|p| p.id == id)
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut Photo, CoreError> {
        self.find_mut(id).ok_or_else(|| CoreError::NotFound {
            entity: "Photo",
            id: id.to_string(),
        })
    }
}

impl Default for Booth {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::photo::{EJECTING_Z_INDEX, PLACEHOLDER_CAPTION};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn capture_and_place(booth: &mut Booth, x: f64, y: f64) -> PhotoId {
        let ticket = booth
            .begin_capture("data:image/jpeg;base64,AAAA".into(), chrono::Utc::now())
            .unwrap();
        booth.place_ejected(Point::new(x, y), &mut rng()).unwrap();
        ticket.id
    }

    // -- capture -------------------------------------------------------------

    #[test]
    fn capture_fills_ejecting_slot_only() {
        let mut booth = Booth::default();
        let ticket = booth.begin_capture("img".into(), chrono::Utc::now()).unwrap();

        let ejecting = booth.ejecting().unwrap();
        assert_eq!(ejecting.id, ticket.id);
        assert_eq!(ejecting.caption, PLACEHOLDER_CAPTION);
        assert_eq!(ejecting.z_index, EJECTING_Z_INDEX);
        assert!(booth.photos().is_empty());
        assert_eq!(booth.stage_of(&ticket.id), Some(PhotoStage::Ejecting));
    }

    #[test]
    fn second_capture_while_ejecting_is_rejected() {
        let mut booth = Booth::default();
        booth.begin_capture("one".into(), chrono::Utc::now()).unwrap();
        let second = booth.begin_capture("two".into(), chrono::Utc::now());
        assert_matches!(second, Err(CaptureRejected::InFlight));
        assert_eq!(booth.ejecting().unwrap().image_data, "one");
    }

    #[test]
    fn capture_with_camera_off_is_rejected() {
        let mut booth = Booth::default();
        booth.set_camera_enabled(false);
        assert_matches!(
            booth.begin_capture("img".into(), chrono::Utc::now()),
            Err(CaptureRejected::CameraOff)
        );
        assert!(booth.ejecting().is_none());
    }

    // -- placement -----------------------------------------------------------

    #[test]
    fn placing_commits_with_tilt_and_empty_secret() {
        let mut booth = Booth::default();
        let id = capture_and_place(&mut booth, 40.0, 60.0);

        assert!(booth.ejecting().is_none());
        let photo = booth.get(&id).unwrap();
        assert_eq!(photo.position(), Point::new(40.0, 60.0));
        assert!(photo.rotation >= -MAX_TILT_DEGREES && photo.rotation < MAX_TILT_DEGREES);
        assert_eq!(photo.secret_message.as_deref(), Some(""));
        assert_eq!(photo.z_index, BASE_Z_INDEX);
        assert!(photo.is_developing);
        assert_eq!(booth.stage_of(&id), Some(PhotoStage::Developing));
    }

    #[test]
    fn placing_takes_current_wall_maximum() {
        let mut booth = Booth::default();
        let first = capture_and_place(&mut booth, 0.0, 0.0);
        booth.drag(&first, Point::new(5.0, 5.0)).unwrap();
        booth.drag(&first, Point::new(6.0, 6.0)).unwrap();

        let second = capture_and_place(&mut booth, 10.0, 10.0);
        assert_eq!(booth.get(&second).unwrap().z_index, booth.get(&first).unwrap().z_index);
        // Ties render in list order; the newest photo is last.
        assert_eq!(booth.photos().last().unwrap().id, second);
    }

    #[test]
    fn placing_without_ejecting_photo_is_conflict() {
        let mut booth = Booth::default();
        assert_matches!(
            booth.place_ejected(Point::new(0.0, 0.0), &mut rng()),
            Err(CoreError::Conflict(_))
        );
    }

    // -- drag ----------------------------------------------------------------

    #[test]
    fn dragged_photo_is_strictly_frontmost_after_every_drag() {
        let mut booth = Booth::default();
        let ids: Vec<_> = (0..5)
            .map(|i| capture_and_place(&mut booth, i as f64, 0.0))
            .collect();

        let sequence = [3, 0, 0, 4, 1, 2, 2, 3, 4, 0, 1, 1];
        for (step, &i) in sequence.iter().enumerate() {
            booth.drag(&ids[i], Point::new(step as f64, step as f64)).unwrap();
            let dragged = booth.get(&ids[i]).unwrap().z_index;
            for other in booth.photos().iter().filter(|p| p.id != ids[i]) {
                assert!(dragged > other.z_index, "step {step}: {dragged} <= {}", other.z_index);
            }
        }
    }

    #[test]
    fn drag_touches_only_position_and_z_index() {
        let mut booth = Booth::default();
        let id = capture_and_place(&mut booth, 0.0, 0.0);
        let before = booth.get(&id).unwrap().clone();

        booth.drag(&id, Point::new(300.0, 200.0)).unwrap();
        let after = booth.get(&id).unwrap();
        assert_eq!(after.position(), Point::new(300.0, 200.0));
        assert_eq!(after.z_index, before.z_index + 1);
        assert_eq!(after.rotation, before.rotation);
        assert_eq!(after.caption, before.caption);
        assert_eq!(after.is_developing, before.is_developing);
    }

    #[test]
    fn drag_unknown_photo_is_not_found() {
        let mut booth = Booth::default();
        assert_matches!(
            booth.drag("missing", Point::new(0.0, 0.0)),
            Err(CoreError::NotFound { entity: "Photo", .. })
        );
    }

    // -- captions ------------------------------------------------------------

    #[test]
    fn caption_patches_ejecting_photo() {
        let mut booth = Booth::default();
        let ticket = booth.begin_capture("img".into(), chrono::Utc::now()).unwrap();
        assert_eq!(booth.apply_caption(&ticket.id, "(≧◡≦)"), CaptionPatch::Ejecting);
        assert_eq!(booth.ejecting().unwrap().caption, "(≧◡≦)");
    }

    #[test]
    fn caption_patches_photo_placed_before_it_arrived() {
        let mut booth = Booth::default();
        let ticket = booth.begin_capture("img".into(), chrono::Utc::now()).unwrap();
        booth.place_ejected(Point::new(1.0, 1.0), &mut rng()).unwrap();

        assert_eq!(booth.apply_caption(&ticket.id, "(TwT)"), CaptionPatch::Committed);
        assert_eq!(booth.get(&ticket.id).unwrap().caption, "(TwT)");
    }

    #[test]
    fn caption_for_deleted_photo_is_dropped() {
        let mut booth = Booth::default();
        let id = capture_and_place(&mut booth, 0.0, 0.0);
        assert!(booth.delete(&id));

        assert_eq!(booth.apply_caption(&id, "(o_O)"), CaptionPatch::Dropped);
        assert!(booth.get(&id).is_none());
        assert!(booth.photos().is_empty());
    }

    // -- publish / delete ----------------------------------------------------

    #[test]
    fn publish_twice_mirrors_once_and_keeps_flag() {
        let mut booth = Booth::default();
        let id = capture_and_place(&mut booth, 0.0, 0.0);

        let first = booth.publish(&id).unwrap();
        let second = booth.publish(&id).unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(booth.photos().len(), 1);
        assert!(booth.get(&id).unwrap().is_public());
        assert_eq!(booth.stage_of(&id), Some(PhotoStage::Published));
    }

    #[test]
    fn delete_unknown_photo_reports_false() {
        let mut booth = Booth::default();
        assert!(!booth.delete("nope"));
    }

    #[test]
    fn finish_developing_is_one_way() {
        let mut booth = Booth::default();
        let id = capture_and_place(&mut booth, 0.0, 0.0);
        assert!(booth.finish_developing(&id));
        assert!(!booth.finish_developing(&id));
        assert!(!booth.get(&id).unwrap().is_developing);
        assert_eq!(booth.stage_of(&id), Some(PhotoStage::Placed));
    }

    #[test]
    fn edits_update_caption_and_secret() {
        let mut booth = Booth::default();
        let id = capture_and_place(&mut booth, 0.0, 0.0);
        booth.update_caption(&id, "hello").unwrap();
        booth.update_secret(&id, "a secret").unwrap();
        let photo = booth.get(&id).unwrap();
        assert_eq!(photo.caption, "hello");
        assert_eq!(photo.secret_message.as_deref(), Some("a secret"));
    }
}
