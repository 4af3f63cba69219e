//! The booth session: single owner of all booth state.
//!
//! Everything that takes time (captioning, gallery writes) runs in a
//! spawned task that never touches the session. Results come back as
//! [`BoothEvent`]s over an unbounded channel and are applied by photo id,
//! so a result for a photo deleted in the meantime is simply dropped.
//!
//! Drive the session from one task with [`BoothSession::pump`], which
//! interleaves develop ticks with incoming events.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use snapbooth_core::booth::{Booth, CaptionPatch, CaptureRejected, PhotoStage};
use snapbooth_core::camera::{CameraRig, FacingMode, ShutterCue};
use snapbooth_core::caption::Captioner;
use snapbooth_core::error::CoreError;
use snapbooth_core::gallery::{compose_gallery, GalleryCard};
use snapbooth_core::photo::Photo;
use snapbooth_core::types::{PhotoId, Point};
use snapbooth_core::view::{CardContext, CardEdit, CardView};
use snapbooth_store::blob::{BlobStore, FileBlobStore};
use snapbooth_store::local::PhotoRepo;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

use crate::caption::RemoteCaptioner;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::gallery::{GalleryClient, GalleryFeed};

/// Result of background work, applied by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoothEvent {
    /// First caption for a fresh capture.
    CaptionReady { id: PhotoId, caption: String },
    /// Caption produced by an explicit regenerate request.
    RegenerateReady { id: PhotoId, caption: String },
    /// A gallery write finished; `error` is set when it failed.
    PublishSettled { id: PhotoId, error: Option<String> },
}

/// Something the UI should tell the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CameraUnavailable(String),
    PublishFailed { id: PhotoId, message: String },
    SaveFailed(String),
}

/// Collaborators a session is built from.
pub struct SessionParts {
    pub store: Arc<dyn BlobStore>,
    pub captioner: Captioner,
    pub gallery: Option<GalleryClient>,
    pub camera: CameraRig,
    pub shutter: Box<dyn ShutterCue>,
    pub develop_tick: Duration,
}

pub struct BoothSession {
    booth: Booth,
    store: Arc<dyn BlobStore>,
    captioner: Captioner,
    feed: Option<GalleryFeed>,
    camera: CameraRig,
    shutter: Box<dyn ShutterCue>,
    views: HashMap<PhotoId, CardView>,
    gallery_views: HashMap<PhotoId, CardView>,
    develop_tick: Duration,
    events_tx: mpsc::UnboundedSender<BoothEvent>,
    events_rx: mpsc::UnboundedReceiver<BoothEvent>,
    notices: Vec<Notice>,
}

impl BoothSession {
    /// Load the saved wall and switch the camera on.
    ///
    /// A camera that fails to open leaves the booth with the camera
    /// disabled and a [`Notice::CameraUnavailable`].
    pub fn open(parts: SessionParts) -> Self {
        let photos = PhotoRepo::load(parts.store.as_ref());
        let views = photos
            .iter()
            .map(|p| (p.id.clone(), CardView::new(p, CardContext::Wall)))
            .collect();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        tracing::info!(photos = photos.len(), "Booth session opened");

        let mut session = Self {
            booth: Booth::new(photos),
            store: parts.store,
            captioner: parts.captioner,
            feed: parts.gallery.map(GalleryFeed::new),
            camera: parts.camera,
            shutter: parts.shutter,
            views,
            gallery_views: HashMap::new(),
            develop_tick: parts.develop_tick,
            events_tx,
            events_rx,
            notices: Vec::new(),
        };
        session.set_camera_enabled(true).ok();
        session
    }

    /// Wire a session to the configured data directory and API server.
    pub fn from_config(
        config: &ClientConfig,
        camera: CameraRig,
        shutter: Box<dyn ShutterCue>,
    ) -> Result<Self, ClientError> {
        let store = FileBlobStore::open(config.data_dir.clone())?;
        let http = reqwest::Client::new();
        let captions = RemoteCaptioner::with_client(http.clone(), config.api_url.clone());

        Ok(Self::open(SessionParts {
            store: Arc::new(store),
            captioner: Captioner::new(Arc::new(captions)),
            gallery: Some(GalleryClient::with_client(http, config.api_url.clone())),
            camera,
            shutter,
            develop_tick: config.develop_tick,
        }))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn booth(&self) -> &Booth {
        &self.booth
    }

    pub fn photos(&self) -> &[Photo] {
        self.booth.photos()
    }

    pub fn stage_of(&self, id: &str) -> Option<PhotoStage> {
        self.booth.stage_of(id)
    }

    pub fn view(&self, id: &str) -> Option<&CardView> {
        self.views.get(id)
    }

    pub fn gallery_view(&self, id: &str) -> Option<&CardView> {
        self.gallery_views.get(id)
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Notices accumulated since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // -----------------------------------------------------------------------
    // Camera
    // -----------------------------------------------------------------------

    pub fn set_camera_enabled(&mut self, enabled: bool) -> Result<(), ClientError> {
        if !enabled {
            self.camera.power_off();
            self.booth.set_camera_enabled(false);
            return Ok(());
        }

        if let Err(e) = self.camera.power_on() {
            self.camera_failed(&e);
            return Err(e.into());
        }
        self.booth.set_camera_enabled(true);
        Ok(())
    }

    pub fn toggle_facing(&mut self) -> Result<FacingMode, ClientError> {
        match self.camera.toggle_facing() {
            Ok(facing) => Ok(facing),
            Err(e) => {
                self.camera_failed(&e);
                Err(e.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Capture and placement
    // -----------------------------------------------------------------------

    /// Press the shutter.
    ///
    /// Takes a frame into the ejecting slot, plays the shutter cue, and
    /// starts captioning in the background. Must be called inside a Tokio
    /// runtime.
    pub fn shutter(&mut self) -> Result<PhotoId, ClientError> {
        if !self.booth.camera_enabled() {
            return Err(CaptureRejected::CameraOff.into());
        }
        if self.booth.ejecting().is_some() {
            return Err(CaptureRejected::InFlight.into());
        }

        let frame = self.camera.grab_frame().ok_or(ClientError::NoFrame)?;
        let ticket = self.booth.begin_capture(frame, Utc::now())?;

        if let Err(e) = self.shutter.play() {
            tracing::warn!(error = %e, "Shutter cue failed to play");
        }
        if let Some(photo) = self.booth.ejecting() {
            self.views
                .insert(ticket.id.clone(), CardView::new(photo, CardContext::Ejecting));
        }

        let id = ticket.id.clone();
        let captioner = self.captioner.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let caption = captioner.caption(&ticket.image_data).await;
            let _ = tx.send(BoothEvent::CaptionReady {
                id: ticket.id,
                caption,
            });
        });

        tracing::info!(photo_id = %id, "Photo captured");
        Ok(id)
    }

    /// Drop the ejecting photo onto the wall at `point`.
    pub fn place(&mut self, point: Point) -> Result<PhotoId, ClientError> {
        let photo = self.booth.place_ejected(point, &mut rand::rng())?;
        let mut view = CardView::new(photo, CardContext::Wall);
        let id = photo.id.clone();

        // The develop ramp keeps running across the move to the wall.
        if let Some(previous) = self.views.remove(&id) {
            *view.progress_mut() = previous.progress();
        }
        let developed = view.progress().is_complete();
        self.views.insert(id.clone(), view);
        if developed {
            self.booth.finish_developing(&id);
        }

        self.persist();
        Ok(id)
    }

    pub fn drag(&mut self, id: &str, point: Point) -> Result<(), ClientError> {
        if self.views.get(id).is_some_and(|v| !v.is_draggable()) {
            return Err(CoreError::Conflict(format!("Photo {id} cannot be moved right now")).into());
        }
        self.booth.drag(id, point)?;
        self.persist();
        Ok(())
    }

    /// Remove a photo. Pending captions for it are dropped on arrival.
    pub fn delete(&mut self, id: &str) -> bool {
        self.views.remove(id);
        let removed = self.booth.delete(id);
        if removed {
            tracing::info!(photo_id = %id, "Photo deleted");
            self.persist();
        }
        removed
    }

    /// File name and image data for exporting a card.
    pub fn download(&self, id: &str) -> Result<(String, String), ClientError> {
        let photo = self.booth.get(id).ok_or_else(|| CoreError::NotFound {
            entity: "Photo",
            id: id.to_string(),
        })?;
        Ok((photo.download_file_name(), photo.image_data.clone()))
    }

    // -----------------------------------------------------------------------
    // Card interaction
    // -----------------------------------------------------------------------

    pub fn set_hovering(&mut self, id: &str, hovering: bool) {
        if let Some(view) = self.views.get_mut(id) {
            view.hovering = hovering;
        }
    }

    pub fn flip_to_back(&mut self, id: &str, width: u32, height: u32) {
        if let Some(view) = self.views.get_mut(id) {
            view.show_back(width, height, &mut rand::rng());
        }
    }

    pub fn flip_to_front(&mut self, id: &str) {
        if let Some(view) = self.views.get_mut(id) {
            view.show_front();
        }
    }

    pub fn begin_caption_edit(&mut self, id: &str) -> bool {
        self.views
            .get_mut(id)
            .is_some_and(|v| v.begin_caption_edit())
    }

    pub fn set_draft_caption(&mut self, id: &str, text: &str) {
        if let Some(view) = self.views.get_mut(id) {
            view.set_draft_caption(text);
        }
    }

    /// Save the draft caption (Enter or blur).
    pub fn commit_caption_edit(&mut self, id: &str) -> Result<(), ClientError> {
        match self.views.get_mut(id).and_then(CardView::commit_caption_edit) {
            Some(edit) => self.apply_edit(id, edit),
            None => Ok(()),
        }
    }

    /// Discard the draft caption (Escape).
    pub fn cancel_caption_edit(&mut self, id: &str) {
        if let (Some(photo), Some(view)) = (self.booth.get(id), self.views.get_mut(id)) {
            view.cancel_caption_edit(photo);
        }
    }

    pub fn set_draft_secret(&mut self, id: &str, text: &str) {
        if let Some(view) = self.views.get_mut(id) {
            view.set_draft_secret(text);
        }
    }

    /// Save the secret message when its text surface loses focus.
    pub fn blur_secret(&mut self, id: &str) -> Result<(), ClientError> {
        match self.views.get(id).and_then(CardView::blur_secret) {
            Some(edit) => self.apply_edit(id, edit),
            None => Ok(()),
        }
    }

    /// Ask for a fresh caption. Returns `false` when one is already being
    /// generated for this card.
    pub fn regenerate_caption(&mut self, id: &str) -> bool {
        let (Some(photo), Some(view)) = (self.booth.get(id), self.views.get_mut(id)) else {
            return false;
        };
        if !view.begin_regenerate() {
            return false;
        }

        let id = photo.id.clone();
        let image = photo.image_data.clone();
        let captioner = self.captioner.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let caption = captioner.caption(&image).await;
            let _ = tx.send(BoothEvent::RegenerateReady { id, caption });
        });
        true
    }

    // -----------------------------------------------------------------------
    // Gallery
    // -----------------------------------------------------------------------

    /// Mark a photo public and mirror it to the remote gallery.
    ///
    /// Returns `false` when the photo was already public (nothing is sent
    /// twice). The local flag stays set even if the remote write fails;
    /// the failure arrives later as [`Notice::PublishFailed`].
    pub fn publish(&mut self, id: &str) -> Result<bool, ClientError> {
        let Some(snapshot) = self.booth.publish(id)? else {
            return Ok(false);
        };
        self.persist();

        let Some(client) = self.feed.as_ref().map(|f| f.client().clone()) else {
            tracing::debug!(photo_id = %id, "No gallery configured, publish stays local");
            return Ok(true);
        };

        let tx = self.events_tx.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            let error = client.publish(&snapshot).await.err().map(|e| e.to_string());
            let _ = tx.send(BoothEvent::PublishSettled { id, error });
        });
        Ok(true)
    }

    /// Refresh the remote feed and compose the gallery view.
    pub async fn open_gallery(&mut self) -> Vec<GalleryCard> {
        let remote = match self.feed.as_mut() {
            Some(feed) => feed.refresh().await.to_vec(),
            None => Vec::new(),
        };
        let cards = compose_gallery(self.booth.photos(), &remote, &mut rand::rng());
        self.gallery_views = cards
            .iter()
            .map(|c| (c.photo.id.clone(), CardView::new(&c.photo, CardContext::Gallery)))
            .collect();
        cards
    }

    /// Turn a gallery card over; its back gets a fresh scratch coating.
    pub fn flip_gallery_card(&mut self, id: &str, width: u32, height: u32) -> bool {
        match self.gallery_views.get_mut(id) {
            Some(view) => {
                view.show_back(width, height, &mut rand::rng());
                true
            }
            None => false,
        }
    }

    /// Forward a pointer move to a gallery card's scratch coating.
    pub fn scratch_gallery_card(&mut self, id: &str, x: f32, y: f32, pressed: bool) {
        if let Some(overlay) = self.gallery_views.get_mut(id).and_then(CardView::overlay_mut) {
            overlay.pointer_move(x, y, pressed);
        }
    }

    pub fn release_gallery_card(&mut self, id: &str) {
        if let Some(overlay) = self.gallery_views.get_mut(id).and_then(CardView::overlay_mut) {
            overlay.pointer_up();
        }
    }

    pub fn leave_gallery_card(&mut self, id: &str) {
        if let Some(overlay) = self.gallery_views.get_mut(id).and_then(CardView::overlay_mut) {
            overlay.pointer_leave();
        }
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    /// A ticker at the develop period. Missed ticks are skipped.
    pub fn develop_ticker(&self) -> Interval {
        let mut ticker = tokio::time::interval(self.develop_tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// Advance every developing card by one step. Returns how many cards
    /// finished on this tick.
    pub fn tick_develop(&mut self) -> usize {
        let finished: Vec<PhotoId> = self
            .views
            .iter_mut()
            .filter_map(|(id, view)| view.progress_mut().tick().then(|| id.clone()))
            .collect();

        let mut changed = false;
        for id in &finished {
            changed |= self.booth.finish_developing(id);
        }
        if changed {
            self.persist();
        }
        finished.len()
    }

    /// Wait for the next develop tick or background result, whichever
    /// comes first. Returns the event if one was applied.
    pub async fn pump(&mut self, ticker: &mut Interval) -> Option<BoothEvent> {
        tokio::select! {
            _ = ticker.tick() => {
                self.tick_develop();
                None
            }
            event = self.events_rx.recv() => {
                let event = event?;
                self.apply_event(&event);
                Some(event)
            }
        }
    }

    /// Wait for the next background result and apply it.
    pub async fn next_event(&mut self) -> Option<BoothEvent> {
        let event = self.events_rx.recv().await?;
        self.apply_event(&event);
        Some(event)
    }

    /// Apply every result that has already arrived.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(&event);
            applied += 1;
        }
        applied
    }

    // ---- private helpers ----

    fn apply_event(&mut self, event: &BoothEvent) {
        match event {
            BoothEvent::CaptionReady { id, caption } => match self.booth.apply_caption(id, caption) {
                CaptionPatch::Ejecting => self.sync_view_caption(id, caption),
                CaptionPatch::Committed => {
                    self.sync_view_caption(id, caption);
                    self.persist();
                }
                CaptionPatch::Dropped => {
                    tracing::debug!(photo_id = %id, "Caption arrived for a deleted photo, dropping");
                }
            },
            BoothEvent::RegenerateReady { id, caption } => {
                if let Some(view) = self.views.get_mut(id) {
                    view.finish_regenerate(caption);
                }
                match self.booth.update_caption(id, caption) {
                    Ok(()) => self.persist(),
                    Err(_) => {
                        tracing::debug!(photo_id = %id, "Regenerated caption for a deleted photo, dropping");
                    }
                }
            }
            BoothEvent::PublishSettled { id, error: Some(message) } => {
                tracing::warn!(photo_id = %id, error = %message, "Gallery publish failed");
                self.notices.push(Notice::PublishFailed {
                    id: id.clone(),
                    message: message.clone(),
                });
            }
            BoothEvent::PublishSettled { error: None, .. } => {}
        }
    }

    fn apply_edit(&mut self, id: &str, edit: CardEdit) -> Result<(), ClientError> {
        match edit {
            CardEdit::Caption(text) => self.booth.update_caption(id, &text)?,
            CardEdit::Secret(text) => self.booth.update_secret(id, &text)?,
        }
        self.persist();
        Ok(())
    }

    fn sync_view_caption(&mut self, id: &str, caption: &str) {
        if let Some(view) = self.views.get_mut(id) {
            view.sync_caption(caption);
        }
    }

    fn camera_failed(&mut self, error: &CoreError) {
        tracing::warn!(error = %error, "Camera could not be opened");
        self.camera.power_off();
        self.booth.set_camera_enabled(false);
        self.notices.push(Notice::CameraUnavailable(error.to_string()));
    }

    /// Rewrite the saved wall after a committed mutation.
    fn persist(&mut self) {
        if let Err(e) = PhotoRepo::save(self.store.as_ref(), self.booth.photos()) {
            tracing::warn!(error = %e, "Failed to save photos");
            self.notices.push(Notice::SaveFailed(e.to_string()));
        }
    }
}
