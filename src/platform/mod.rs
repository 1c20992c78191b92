pub mod amixer;
pub mod overlay;
#[cfg(feature = "desktop")]
pub mod rdev;
pub mod screen;

use crate::corner::Corner;
use crate::geometry::{Point, Rect, Size};
use crate::Result;
use tokio::sync::mpsc;

pub use amixer::AmixerMixer;
pub use overlay::LogOverlay;
pub use screen::FixedScreen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Motion(Point),
    ScrollUp,
    ScrollDown,
}

pub trait PointerSource {
    // Scroll events are only reported while grabbed.
    fn start(&mut self, events: mpsc::UnboundedSender<PointerEvent>) -> Result<()>;

    fn stop(&mut self);

    fn grab_scroll(&mut self) -> Result<()>;

    fn ungrab_scroll(&mut self) -> Result<()>;
}

pub trait ResolutionSource {
    fn open(&mut self, changes: mpsc::UnboundedSender<Size>) -> Result<()>;

    fn close(&mut self);

    fn size(&self) -> Option<Size>;
}

pub trait VolumeMixer {
    fn open(&mut self, changes: mpsc::UnboundedSender<f64>) -> Result<()>;

    fn close(&mut self);

    // 0.0..=1.0
    fn volume(&self) -> Result<f64>;

    fn set_volume(&mut self, volume: f64) -> Result<()>;
}

pub trait OverlayUi {
    fn show(&mut self);

    fn hide(&mut self);

    fn set_volume(&mut self, volume: f64);

    fn set_corner(&mut self, corner: Corner);

    fn set_overlay_rect(&mut self, rect: Rect);
}

// Stops a background watcher task.
pub(crate) struct Shutdown {
    sender: Option<tokio::sync::oneshot::Sender<()>>,
}

impl Shutdown {
    pub(crate) fn new() -> (Self, tokio::sync::oneshot::Receiver<()>) {
        let (sender, receiver) = tokio::sync::oneshot::channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    pub(crate) fn signal(&mut self) -> bool {
        match self.sender.take() {
            Some(sender) => {
                // The task may have exited on its own already.
                let _ = sender.send(());
                true
            }
            None => false,
        }
    }
}
