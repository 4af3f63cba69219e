//! Camera rig: the exclusively owned capture device handle.
//!
//! The rig keeps at most one open [`CameraStream`]. Toggling the facing
//! direction or switching the camera off drops the current stream before a
//! new one is opened, so stale frames from the previous device are never
//! delivered.

use crate::error::CoreError;

/// Which physical camera to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing (selfie) camera.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

impl FacingMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::User => Self::Environment,
            Self::Environment => Self::User,
        }
    }

    /// The preview is mirrored for the selfie camera only.
    pub fn is_mirrored(self) -> bool {
        self == Self::User
    }
}

/// An open camera stream.
pub trait CameraStream: Send {
    /// Grab a still frame as an encoded image (data URI). `None` when the
    /// stream has no frame ready yet.
    fn grab_frame(&mut self) -> Option<String>;
}

/// Opens camera streams.
pub trait CameraBackend: Send + Sync {
    fn open(&self, facing: FacingMode) -> Result<Box<dyn CameraStream>, CoreError>;
}

/// Audible shutter cue played on every accepted capture.
pub trait ShutterCue: Send + Sync {
    fn play(&self) -> Result<(), CoreError>;
}

/// A cue that plays nothing.
pub struct SilentCue;

impl ShutterCue for SilentCue {
    fn play(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Owns the single active camera stream.
pub struct CameraRig {
    backend: Box<dyn CameraBackend>,
    facing: FacingMode,
    stream: Option<Box<dyn CameraStream>>,
}

impl CameraRig {
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            backend,
            facing: FacingMode::default(),
            stream: None,
        }
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_on(&self) -> bool {
        self.stream.is_some()
    }

    /// Open a stream for the current facing mode, replacing any open one.
    pub fn power_on(&mut self) -> Result<(), CoreError> {
        self.stream = None;
        self.stream = Some(self.backend.open(self.facing)?);
        tracing::debug!(facing = ?self.facing, "Camera stream opened");
        Ok(())
    }

    pub fn power_off(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Camera stream closed");
        }
    }

    /// Switch between front and rear cameras.
    ///
    /// The current stream is torn down first; a new one is opened only if
    /// the camera was on.
    pub fn toggle_facing(&mut self) -> Result<FacingMode, CoreError> {
        let was_on = self.is_on();
        self.power_off();
        self.facing = self.facing.toggled();
        if was_on {
            self.power_on()?;
        }
        Ok(self.facing)
    }

    pub fn grab_frame(&mut self) -> Option<String> {
        self.stream.as_mut().and_then(|s| s.grab_frame())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records opens and tags each frame with the facing mode of its stream.
    #[derive(Default)]
    struct FakeBackend {
        opened: Mutex<Vec<FacingMode>>,
        live: Arc<AtomicUsize>,
    }

    struct FakeStream {
        facing: FacingMode,
        live: Arc<AtomicUsize>,
    }

    impl Drop for FakeStream {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl CameraStream for FakeStream {
        fn grab_frame(&mut self) -> Option<String> {
            Some(format!("frame-{:?}", self.facing))
        }
    }

    impl CameraBackend for Arc<FakeBackend> {
        fn open(&self, facing: FacingMode) -> Result<Box<dyn CameraStream>, CoreError> {
            self.opened.lock().unwrap().push(facing);
            self.live.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                facing,
                live: Arc::clone(&self.live),
            }))
        }
    }

    #[test]
    fn toggle_recreates_stream_with_new_facing() {
        let backend = Arc::new(FakeBackend::default());
        let mut rig = CameraRig::new(Box::new(Arc::clone(&backend)));
        rig.power_on().unwrap();
        assert_eq!(rig.grab_frame().as_deref(), Some("frame-User"));

        assert_eq!(rig.toggle_facing().unwrap(), FacingMode::Environment);
        assert_eq!(rig.grab_frame().as_deref(), Some("frame-Environment"));
        assert_eq!(backend.live.load(Ordering::SeqCst), 1);
        assert_eq!(
            *backend.opened.lock().unwrap(),
            vec![FacingMode::User, FacingMode::Environment]
        );
    }

    #[test]
    fn power_off_releases_stream() {
        let backend = Arc::new(FakeBackend::default());
        let mut rig = CameraRig::new(Box::new(Arc::clone(&backend)));
        rig.power_on().unwrap();
        rig.power_off();
        assert!(!rig.is_on());
        assert_eq!(backend.live.load(Ordering::SeqCst), 0);
        assert_eq!(rig.grab_frame(), None);
    }

    #[test]
    fn toggle_while_off_does_not_open() {
        let backend = Arc::new(FakeBackend::default());
        let mut rig = CameraRig::new(Box::new(Arc::clone(&backend)));
        rig.toggle_facing().unwrap();
        assert!(!rig.is_on());
        assert!(backend.opened.lock().unwrap().is_empty());
        assert!(!rig.facing().is_mirrored());
    }
}
