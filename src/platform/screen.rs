use super::ResolutionSource;
use crate::geometry::Size;
use crate::Result;
use log::debug;
use tokio::sync::mpsc;

pub struct FixedScreen {
    size: Size,
    changes: Option<mpsc::UnboundedSender<Size>>,
}

impl FixedScreen {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            changes: None,
        }
    }

    pub fn resize(&mut self, size: Size) {
        if size == self.size {
            return;
        }
        debug!("Screen resized to {}", size);
        self.size = size;
        if let Some(changes) = &self.changes {
            let _ = changes.send(size);
        }
    }
}

impl ResolutionSource for FixedScreen {
    fn open(&mut self, changes: mpsc::UnboundedSender<Size>) -> Result<()> {
        self.changes = Some(changes);
        Ok(())
    }

    fn close(&mut self) {
        self.changes = None;
    }

    fn size(&self) -> Option<Size> {
        Some(self.size)
    }
}
