//! Per-card transient view state.
//!
//! Flip, hover, edit drafts, develop progress, and the scratch-off overlay
//! belong to the card on screen, not to the persisted [`Photo`]. A fresh
//! [`CardView`] is built whenever a card is mounted.

use rand::Rng;

use crate::develop::DevelopProgress;
use crate::occlusion::ScratchOverlay;
use crate::photo::Photo;

/// Where a card is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardContext {
    /// Emerging from the camera; not interactive beyond the drag.
    Ejecting,
    /// The user's own free-form wall; back face is editable.
    Wall,
    /// The read-only public gallery; back face is covered by a coating.
    Gallery,
}

/// Which face of the card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Front,
    Back,
}

/// A caption or secret edit that should be written back to the booth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEdit {
    Caption(String),
    Secret(String),
}

#[derive(Debug, Clone)]
pub struct CardView {
    context: CardContext,
    face: CardFace,
    pub hovering: bool,
    editing_caption: bool,
    draft_caption: String,
    draft_secret: String,
    regenerating: bool,
    progress: DevelopProgress,
    overlay: Option<ScratchOverlay>,
}

impl CardView {
    pub fn new(photo: &Photo, context: CardContext) -> Self {
        // The gallery never shows the develop animation.
        let developing = photo.is_developing && context != CardContext::Gallery;
        Self {
            context,
            face: CardFace::Front,
            hovering: false,
            editing_caption: false,
            draft_caption: photo.caption.clone(),
            draft_secret: photo.secret_message.clone().unwrap_or_default(),
            regenerating: false,
            progress: DevelopProgress::for_photo(developing),
            overlay: None,
        }
    }

    pub fn context(&self) -> CardContext {
        self.context
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn progress(&self) -> DevelopProgress {
        self.progress
    }

    pub fn progress_mut(&mut self) -> &mut DevelopProgress {
        &mut self.progress
    }

    pub fn overlay(&self) -> Option<&ScratchOverlay> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut ScratchOverlay> {
        self.overlay.as_mut()
    }

    /// Cards can be dragged only on the wall (or out of the camera), and
    /// not while flipped or editing.
    pub fn is_draggable(&self) -> bool {
        self.context != CardContext::Gallery && self.face == CardFace::Front && !self.editing_caption
    }

    /// The wall toolbar (download, delete) shows on hover of the front face.
    pub fn shows_toolbar(&self) -> bool {
        self.context == CardContext::Wall
            && self.hovering
            && !self.editing_caption
            && self.face == CardFace::Front
    }

    // -----------------------------------------------------------------------
    // Flip
    // -----------------------------------------------------------------------

    /// Turn the card over.
    ///
    /// In the gallery the back face gets a new coating sized to the
    /// container's current dimensions every time it is shown.
    pub fn show_back<R: Rng>(&mut self, width: u32, height: u32, rng: &mut R) {
        if self.context == CardContext::Ejecting {
            return;
        }
        self.face = CardFace::Back;
        if self.context == CardContext::Gallery {
            self.overlay = Some(ScratchOverlay::new(width, height, rng));
        }
    }

    pub fn show_front(&mut self) {
        self.face = CardFace::Front;
    }

    // -----------------------------------------------------------------------
    // Caption editing
    // -----------------------------------------------------------------------

    pub fn is_editing_caption(&self) -> bool {
        self.editing_caption
    }

    pub fn draft_caption(&self) -> &str {
        &self.draft_caption
    }

    pub fn begin_caption_edit(&mut self) -> bool {
        if self.context != CardContext::Wall {
            return false;
        }
        self.editing_caption = true;
        true
    }

    pub fn set_draft_caption(&mut self, text: &str) {
        self.draft_caption = text.to_string();
    }

    /// Save (Enter or blur).
    pub fn commit_caption_edit(&mut self) -> Option<CardEdit> {
        if !self.editing_caption {
            return None;
        }
        self.editing_caption = false;
        Some(CardEdit::Caption(self.draft_caption.clone()))
    }

    /// Cancel (Escape): the draft reverts to the stored caption.
    pub fn cancel_caption_edit(&mut self, photo: &Photo) {
        self.draft_caption = photo.caption.clone();
        self.editing_caption = false;
    }

    /// Keep the draft in sync with a caption that changed underneath.
    pub fn sync_caption(&mut self, caption: &str) {
        if !self.editing_caption {
            self.draft_caption = caption.to_string();
        }
    }

    // -----------------------------------------------------------------------
    // Secret editing
    // -----------------------------------------------------------------------

    pub fn draft_secret(&self) -> &str {
        &self.draft_secret
    }

    pub fn set_draft_secret(&mut self, text: &str) {
        self.draft_secret = text.to_string();
    }

    /// Save the secret when the text surface loses focus (wall only).
    pub fn blur_secret(&self) -> Option<CardEdit> {
        (self.context == CardContext::Wall).then(|| CardEdit::Secret(self.draft_secret.clone()))
    }

    // -----------------------------------------------------------------------
    // Caption regeneration
    // -----------------------------------------------------------------------

    pub fn is_regenerating(&self) -> bool {
        self.regenerating
    }

    /// Claim the regeneration slot. Returns `false` if one is already running.
    pub fn begin_regenerate(&mut self) -> bool {
        if self.regenerating || self.context != CardContext::Wall {
            return false;
        }
        self.regenerating = true;
        true
    }

    pub fn finish_regenerate(&mut self, caption: &str) {
        self.regenerating = false;
        self.draft_caption = caption.to_string();
    }
}
