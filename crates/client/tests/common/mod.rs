#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use snapbooth_api::config::ServerConfig;
use snapbooth_api::router::build_app_router;
use snapbooth_api::state::AppState;
use snapbooth_client::gallery::GalleryClient;
use snapbooth_client::session::{BoothEvent, BoothSession, SessionParts};
use snapbooth_core::camera::{CameraBackend, CameraRig, CameraStream, FacingMode, SilentCue};
use snapbooth_core::caption::{CaptionError, CaptionProvider, Captioner, ImagePayload};
use snapbooth_core::error::CoreError;
use snapbooth_store::blob::BlobStore;
use snapbooth_store::gallery::{GalleryStore, MemoryGalleryStore};
use tokio::sync::Semaphore;

pub const FRAME: &str = "data:image/jpeg;base64,/9j/4AAQ";

/// Camera whose stream always has the same frame.
pub struct StillCamera;

struct StillStream;

impl CameraStream for StillStream {
    fn grab_frame(&mut self) -> Option<String> {
        Some(FRAME.to_string())
    }
}

impl CameraBackend for StillCamera {
    fn open(&self, _facing: FacingMode) -> Result<Box<dyn CameraStream>, CoreError> {
        Ok(Box::new(StillStream))
    }
}

/// Camera that cannot be opened.
pub struct BrokenCamera;

impl CameraBackend for BrokenCamera {
    fn open(&self, _facing: FacingMode) -> Result<Box<dyn CameraStream>, CoreError> {
        Err(CoreError::Internal("permission denied".into()))
    }
}

/// Caption model that answers one request per released permit.
pub struct GatedCaptions {
    gate: Semaphore,
    answer: &'static str,
}

impl GatedCaptions {
    pub fn new(answer: &'static str) -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
            answer,
        })
    }

    pub fn release(&self, answers: usize) {
        self.gate.add_permits(answers);
    }
}

#[async_trait::async_trait]
impl CaptionProvider for GatedCaptions {
    async fn generate(&self, _image: &ImagePayload) -> Result<String, CaptionError> {
        self.gate
            .acquire()
            .await
            .map_err(|e| CaptionError::Provider(e.to_string()))?
            .forget();
        Ok(self.answer.to_string())
    }
}

/// Caption model that answers immediately.
pub struct FixedCaptions(pub &'static str);

#[async_trait::async_trait]
impl CaptionProvider for FixedCaptions {
    async fn generate(&self, _image: &ImagePayload) -> Result<String, CaptionError> {
        Ok(self.0.to_string())
    }
}

pub fn session(
    store: Arc<dyn BlobStore>,
    captions: Arc<dyn CaptionProvider>,
    gallery: Option<GalleryClient>,
) -> BoothSession {
    BoothSession::open(SessionParts {
        store,
        captioner: Captioner::new(captions),
        gallery,
        camera: CameraRig::new(Box::new(StillCamera)),
        shutter: Box::new(SilentCue),
        develop_tick: Duration::from_millis(50),
    })
}

/// Serve the real API router on an ephemeral port. Returns its base URL.
pub async fn spawn_api(
    gallery: Arc<dyn GalleryStore>,
    captions: Option<Arc<dyn CaptionProvider>>,
) -> String {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        gallery_capacity: 50,
        api_key: None,
        gemini_model: "gemini-2.5-flash".to_string(),
        gemini_api_url: "http://127.0.0.1:9".to_string(),
        database_url: None,
    };
    let state = AppState {
        gallery,
        captions,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn spawn_memory_api() -> (String, Arc<MemoryGalleryStore>) {
    let store = Arc::new(MemoryGalleryStore::new());
    let url = spawn_api(store.clone(), None).await;
    (url, store)
}

/// An address nothing listens on.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Apply events until one matches, failing after ten seconds.
pub async fn wait_for_event(
    session: &mut BoothSession,
    matches: impl Fn(&BoothEvent) -> bool,
) -> BoothEvent {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let event = session.next_event().await.expect("event channel open");
            if matches(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for booth event")
}
