use crate::config::Settings;
use crate::error::Error;
use crate::geometry::{Rect, Size};
use crate::platform::{OverlayUi, PointerEvent, PointerSource, ResolutionSource, VolumeMixer};
use crate::tracker::{MouseTracker, TrackerEvent};
use crate::Result;
use log::{debug, error, info, warn};
use std::future::Future;
use tokio::sync::mpsc;

pub struct App<P, M, S, U> {
    settings: Settings,
    tracker: MouseTracker,
    tracker_rx: mpsc::UnboundedReceiver<TrackerEvent>,

    pointer: P,
    mixer: M,
    screen: S,
    ui: U,

    activate_region: Option<Rect>,
    deactivate_region: Option<Rect>,

    pointer_tx: mpsc::UnboundedSender<PointerEvent>,
    pointer_rx: mpsc::UnboundedReceiver<PointerEvent>,
    resolution_tx: mpsc::UnboundedSender<Size>,
    resolution_rx: mpsc::UnboundedReceiver<Size>,
    volume_tx: mpsc::UnboundedSender<f64>,
    volume_rx: mpsc::UnboundedReceiver<f64>,
}

impl<P, M, S, U> App<P, M, S, U>
where
    P: PointerSource,
    M: VolumeMixer,
    S: ResolutionSource,
    U: OverlayUi,
{
    pub fn new(settings: Settings, pointer: P, mixer: M, screen: S, ui: U) -> Self {
        let (tracker_tx, tracker_rx) = mpsc::unbounded_channel();
        let (pointer_tx, pointer_rx) = mpsc::unbounded_channel();
        let (resolution_tx, resolution_rx) = mpsc::unbounded_channel();
        let (volume_tx, volume_rx) = mpsc::unbounded_channel();

        Self {
            settings,
            tracker: MouseTracker::new(tracker_tx),
            tracker_rx,
            pointer,
            mixer,
            screen,
            ui,
            activate_region: None,
            deactivate_region: None,
            pointer_tx,
            pointer_rx,
            resolution_tx,
            resolution_rx,
            volume_tx,
            volume_rx,
        }
    }

    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.start()?;
        info!("Initialization complete; running main loop");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down");
                    break;
                }
                Some(event) = self.pointer_rx.recv() => {
                    self.handle_pointer_event(event);
                }
                Some(size) = self.resolution_rx.recv() => {
                    self.handle_resolution_change(size);
                }
                Some(volume) = self.volume_rx.recv() => {
                    self.handle_volume_change(volume);
                }
            }
        }

        self.stop();
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        // Undo whatever did come up, so no watcher outlives a failed start.
        if let Err(e) = self.try_start() {
            error!("Failed to start: {:#}", e);
            self.stop();
            return Err(e);
        }
        Ok(())
    }

    fn try_start(&mut self) -> Result<()> {
        self.mixer.open(self.volume_tx.clone())?;
        match self.mixer.volume() {
            Ok(volume) => self.ui.set_volume(volume),
            Err(e) => warn!("Failed to read initial volume: {}", e),
        }
        info!("Mixer initialized");

        self.screen.open(self.resolution_tx.clone())?;
        let size = self
            .screen
            .size()
            .ok_or_else(|| Error::Backend("Screen size unknown after opening".to_string()))?;
        info!("Screen initialized at {}", size);

        self.ui.set_corner(self.settings.corner);
        self.tracker.start();
        self.update_tracking_regions(size);

        self.pointer.start(self.pointer_tx.clone())?;
        info!("Tracker initialized");

        self.dispatch_tracker_events();
        Ok(())
    }

    pub fn stop(&mut self) {
        // The pointer goes first so nothing new reaches the tracker while it is torn down.
        self.pointer.stop();
        self.tracker.stop();
        while self.tracker_rx.try_recv().is_ok() {}
        self.ui.hide();
        self.screen.close();
        self.mixer.close();
    }

    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Motion(point) => self.tracker.set_last_point(Some(point)),
            PointerEvent::ScrollUp => self.tracker.on_scroll_up(),
            PointerEvent::ScrollDown => self.tracker.on_scroll_down(),
        }
        self.dispatch_tracker_events();
    }

    pub fn handle_resolution_change(&mut self, size: Size) {
        info!("Resolution changed to {}", size);
        self.update_tracking_regions(size);
        self.dispatch_tracker_events();
    }

    pub fn handle_volume_change(&mut self, volume: f64) {
        debug!("Mixer volume changed to {:.2}", volume);
        self.ui.set_volume(volume);
    }

    // Also handles events raised while handling earlier ones.
    fn dispatch_tracker_events(&mut self) {
        while let Ok(event) = self.tracker_rx.try_recv() {
            if let Err(e) = self.handle_tracker_event(event) {
                error!("Error handling tracker event {:?}: {}", event, e);
            }
        }
    }

    fn handle_tracker_event(&mut self, event: TrackerEvent) -> Result<()> {
        debug!("Handling tracker event: {:?}", event);

        match event {
            TrackerEvent::EnterRegion => self.on_enter(),
            TrackerEvent::LeaveRegion => self.on_leave(),
            TrackerEvent::ScrollUp => self.step_volume(self.settings.scroll_step),
            TrackerEvent::ScrollDown => self.step_volume(-self.settings.scroll_step),
        }
    }

    fn on_enter(&mut self) -> Result<()> {
        self.tracker.set_region(self.deactivate_region);
        self.pointer.grab_scroll()?;
        self.ui.show();
        Ok(())
    }

    fn on_leave(&mut self) -> Result<()> {
        self.tracker.set_region(self.activate_region);
        self.pointer.ungrab_scroll()?;
        self.ui.hide();
        Ok(())
    }

    fn step_volume(&mut self, delta: f64) -> Result<()> {
        let current = self.mixer.volume()?;
        let volume = (current + delta).clamp(0.0, 1.0);
        if volume != current {
            self.mixer.set_volume(volume)?;
        }
        self.ui.set_volume(volume);
        Ok(())
    }

    fn update_tracking_regions(&mut self, screen_size: Size) {
        let corner = self.settings.corner;
        let activate = corner.rect(screen_size, self.settings.activate_size);
        let deactivate = corner.rect(screen_size, self.settings.deactivate_size);
        self.activate_region = Some(activate);
        self.deactivate_region = Some(deactivate);
        self.ui.set_overlay_rect(deactivate);

        // The tracker's own flag decides which region is live.
        let region = if self.tracker.in_region() {
            deactivate
        } else {
            activate
        };
        self.tracker.set_region(Some(region));
        debug!("Now tracking region {}", region);
    }

    pub fn tracker(&self) -> &MouseTracker {
        &self.tracker
    }

    pub fn activate_region(&self) -> Option<Rect> {
        self.activate_region
    }

    pub fn deactivate_region(&self) -> Option<Rect> {
        self.deactivate_region
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    pub fn mixer(&self) -> &M {
        &self.mixer
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }
}
