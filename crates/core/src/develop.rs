//! Develop ramp: the cosmetic 0..=100 clarity progress after capture.
//!
//! Progress advances by [`DEVELOP_STEP`] on every tick of a fixed-period
//! timer ([`DEVELOP_TICK`]) while the photo is developing. The renderer maps
//! progress to CSS filter values through [`DevelopFilter::at`].

use std::time::Duration;

/// Fully developed.
pub const DEVELOP_COMPLETE: u8 = 100;

/// Progress added on each tick.
pub const DEVELOP_STEP: u8 = 2;

/// Period of the develop timer.
pub const DEVELOP_TICK: Duration = Duration::from_millis(50);

/// Develop progress of a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevelopProgress(u8);

impl DevelopProgress {
    /// Initial progress for a card: `0` while developing, complete otherwise.
    pub fn for_photo(is_developing: bool) -> Self {
        if is_developing {
            Self(0)
        } else {
            Self(DEVELOP_COMPLETE)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self.0 >= DEVELOP_COMPLETE
    }

    /// Advance one tick. Returns `true` when this tick completed the ramp.
    pub fn tick(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.0 = self.0.saturating_add(DEVELOP_STEP).min(DEVELOP_COMPLETE);
        self.is_complete()
    }

    pub fn filter(self) -> DevelopFilter {
        DevelopFilter::at(self.0)
    }
}

/// Filter values applied to the image while it develops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevelopFilter {
    /// Percent.
    pub grayscale: f64,
    /// Pixels.
    pub blur: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub opacity: f64,
}

impl DevelopFilter {
    pub fn at(progress: u8) -> Self {
        let p = f64::from(progress.min(DEVELOP_COMPLETE));
        Self {
            grayscale: 100.0 - p,
            blur: (100.0 - p) / 10.0,
            brightness: 0.5 + p / 200.0,
            contrast: 0.8 + p / 500.0,
            opacity: 0.2 + (p / 100.0) * 0.8,
        }
    }

    /// CSS `filter` declaration value.
    pub fn css_filter(&self) -> String {
        format!(
            "grayscale({}%) blur({}px) brightness({}) contrast({})",
            self.grayscale, self.blur, self.brightness, self.contrast
        )
    }
}
