use super::OverlayUi;
use crate::corner::Corner;
use crate::geometry::Rect;
use log::{debug, info};

// Nothing to draw; records and logs what it was asked to show.
#[derive(Debug, Default)]
pub struct LogOverlay {
    visible: bool,
    volume: f64,
    corner: Option<Corner>,
    overlay_rect: Option<Rect>,
}

impl LogOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn corner(&self) -> Option<Corner> {
        self.corner
    }

    pub fn overlay_rect(&self) -> Option<Rect> {
        self.overlay_rect
    }
}

impl OverlayUi for LogOverlay {
    fn show(&mut self) {
        self.visible = true;
        info!("Overlay shown at volume {:.0}%", self.volume * 100.0);
    }

    fn hide(&mut self) {
        self.visible = false;
        info!("Overlay hidden");
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        if self.visible {
            info!("Volume {:.0}%", volume * 100.0);
        } else {
            debug!("Volume {:.0}%", volume * 100.0);
        }
    }

    fn set_corner(&mut self, corner: Corner) {
        self.corner = Some(corner);
    }

    fn set_overlay_rect(&mut self, rect: Rect) {
        debug!("Overlay rect {}", rect);
        self.overlay_rect = Some(rect);
    }
}
