use super::{PointerEvent, PointerSource, ResolutionSource, Shutdown};
use crate::error::Error;
use crate::geometry::{Point, Size};
use crate::Result;
use log::{debug, error, info, trace};
use ::rdev::{listen, EventType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

type EventSlot = Arc<Mutex<Option<mpsc::UnboundedSender<PointerEvent>>>>;

// rdev::listen cannot be interrupted. The listener thread is spawned once and `stop` only
// empties the slot it sends through.
pub struct RdevPointerSource {
    events: EventSlot,
    grabbed: Arc<AtomicBool>,
    listener: Option<thread::JoinHandle<()>>,
}

impl RdevPointerSource {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(None)),
            grabbed: Arc::new(AtomicBool::new(false)),
            listener: None,
        }
    }

    fn translate(event_type: &EventType, grabbed: bool) -> Option<PointerEvent> {
        match *event_type {
            EventType::MouseMove { x, y } => Some(PointerEvent::Motion(Point::new(
                x.round() as i32,
                y.round() as i32,
            ))),
            EventType::Wheel { delta_y, .. } if grabbed => match delta_y {
                d if d > 0 => Some(PointerEvent::ScrollUp),
                d if d < 0 => Some(PointerEvent::ScrollDown),
                _ => None,
            },
            _ => None,
        }
    }

    fn set_events(&self, events: Option<mpsc::UnboundedSender<PointerEvent>>) -> Result<()> {
        let mut slot = self
            .events
            .lock()
            .map_err(|_| Error::Backend("Pointer event slot poisoned".to_string()))?;
        *slot = events;
        Ok(())
    }
}

impl Default for RdevPointerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSource for RdevPointerSource {
    fn start(&mut self, events: mpsc::UnboundedSender<PointerEvent>) -> Result<()> {
        self.set_events(Some(events))?;

        if self.listener.is_some() {
            debug!("Pointer listener already running");
            return Ok(());
        }

        let slot = self.events.clone();
        let grabbed = self.grabbed.clone();
        let listener = thread::Builder::new()
            .name("rdev-pointer".to_string())
            .spawn(move || {
                let result = listen(move |event| {
                    let Some(pointer_event) =
                        Self::translate(&event.event_type, grabbed.load(Ordering::SeqCst))
                    else {
                        return;
                    };
                    let Ok(slot) = slot.lock() else {
                        return;
                    };
                    if let Some(sender) = slot.as_ref() {
                        trace!("Pointer event {:?}", pointer_event);
                        let _ = sender.send(pointer_event);
                    }
                });
                if let Err(e) = result {
                    error!("Error in global pointer listener: {:?}", e);
                }
            })
            .map_err(|e| Error::Backend(format!("Failed to spawn pointer listener: {}", e)))?;

        self.listener = Some(listener);
        info!("Global pointer listener started");
        Ok(())
    }

    fn stop(&mut self) {
        self.grabbed.store(false, Ordering::SeqCst);
        if let Err(e) = self.set_events(None) {
            error!("Failed to stop pointer listener: {}", e);
        }
        info!("Pointer listener stopped");
    }

    fn grab_scroll(&mut self) -> Result<()> {
        debug!("Grabbing scroll wheel");
        self.grabbed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn ungrab_scroll(&mut self) -> Result<()> {
        debug!("Ungrabbing scroll wheel");
        self.grabbed.store(false, Ordering::SeqCst);
        Ok(())
    }
}

pub struct RdevScreen {
    size: Arc<Mutex<Option<Size>>>,
    poll_interval: Duration,
    shutdown: Option<Shutdown>,
}

impl RdevScreen {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            size: Arc::new(Mutex::new(None)),
            poll_interval,
            shutdown: None,
        }
    }

    fn query_size() -> Result<Size> {
        let (width, height) = ::rdev::display_size()
            .map_err(|e| Error::Backend(format!("Failed to get display size: {:?}", e)))?;
        Ok(Size::new(width as u32, height as u32))
    }

    async fn watch_size(
        size: Arc<Mutex<Option<Size>>>,
        poll_interval: Duration,
        changes: mpsc::UnboundedSender<Size>,
        mut shutdown: tokio::sync::oneshot::Receiver<()>,
    ) {
        let mut ticker = interval(poll_interval);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Screen watcher stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let current = match Self::query_size() {
                        Ok(current) => current,
                        Err(e) => {
                            error!("{}", e);
                            continue;
                        }
                    };

                    let changed = match size.lock() {
                        Ok(mut last) if *last != Some(current) => {
                            *last = Some(current);
                            true
                        }
                        _ => false,
                    };

                    if changed {
                        info!("Screen resolution changed to {}", current);
                        if changes.send(current).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl ResolutionSource for RdevScreen {
    fn open(&mut self, changes: mpsc::UnboundedSender<Size>) -> Result<()> {
        if self.shutdown.is_some() {
            return Ok(());
        }

        let current = Self::query_size()?;
        if let Ok(mut size) = self.size.lock() {
            *size = Some(current);
        }
        info!("Screen size {}", current);

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Backend(format!("No runtime to watch the screen on: {}", e)))?;
        let (shutdown, shutdown_rx) = Shutdown::new();
        runtime.spawn(Self::watch_size(
            self.size.clone(),
            self.poll_interval,
            changes,
            shutdown_rx,
        ));
        self.shutdown = Some(shutdown);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut shutdown) = self.shutdown.take() {
            shutdown.signal();
        }
        if let Ok(mut size) = self.size.lock() {
            *size = None;
        }
    }

    fn size(&self) -> Option<Size> {
        self.size.lock().ok().and_then(|size| *size)
    }
}
