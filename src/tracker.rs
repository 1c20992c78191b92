use crate::geometry::{Point, Rect};
use log::{debug, trace};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    EnterRegion,
    LeaveRegion,
    ScrollUp,
    ScrollDown,
}

pub struct MouseTracker {
    region: Option<Rect>,
    last_point: Option<Point>,
    in_region: bool,
    running: bool,
    event_sender: mpsc::UnboundedSender<TrackerEvent>,
}

impl MouseTracker {
    pub fn new(event_sender: mpsc::UnboundedSender<TrackerEvent>) -> Self {
        Self {
            region: None,
            last_point: None,
            in_region: false,
            running: true,
            event_sender,
        }
    }

    pub fn with_region(region: Rect, event_sender: mpsc::UnboundedSender<TrackerEvent>) -> Self {
        let mut tracker = Self::new(event_sender);
        tracker.region = Some(region);
        tracker
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        debug!("Starting mouse tracker");
        self.last_point = None;
        self.in_region = false;
        self.running = true;
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        debug!("Stopping mouse tracker");
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn region(&self) -> Option<Rect> {
        self.region
    }

    pub fn set_region(&mut self, region: Option<Rect>) {
        if !self.running {
            debug!("Ignoring region {:?} on stopped tracker", region);
            return;
        }
        self.region = region;
        self.update_in_region();
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    pub fn set_last_point(&mut self, point: Option<Point>) {
        if !self.running {
            return;
        }
        trace!("Pointer at {:?}", point);
        self.last_point = point;
        self.update_in_region();
    }

    pub fn in_region(&self) -> bool {
        self.in_region
    }

    pub fn on_scroll_up(&self) {
        debug!("Scrolled up");
        self.emit(TrackerEvent::ScrollUp);
    }

    pub fn on_scroll_down(&self) {
        debug!("Scrolled down");
        self.emit(TrackerEvent::ScrollDown);
    }

    fn update_in_region(&mut self) {
        let was_in_region = self.in_region;

        self.in_region = match (self.region, self.last_point) {
            (Some(region), Some(point)) => region.contains(point),
            _ => false,
        };

        // Emit only after the new state is stored.
        if self.in_region != was_in_region {
            debug!("In region: {}", self.in_region);
            if self.in_region {
                self.emit(TrackerEvent::EnterRegion);
            } else {
                self.emit(TrackerEvent::LeaveRegion);
            }
        }
    }

    fn emit(&self, event: TrackerEvent) {
        if !self.running {
            return;
        }
        // A closed receiver means the orchestrator is gone and nobody is listening.
        if self.event_sender.send(event).is_err() {
            debug!("Dropped {:?}, no listener", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokio::sync::mpsc::error::TryRecvError;

    fn tracker() -> (MouseTracker, mpsc::UnboundedReceiver<TrackerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (MouseTracker::with_region(Rect::make(0, 0, 10, 10), tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<TrackerEvent>) -> Vec<TrackerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_enter_region() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(0, 0)));
        assert_eq!(drain(&mut rx), vec![TrackerEvent::EnterRegion]);
        assert!(tracker.in_region());
    }

    #[test]
    fn test_stay_in_region() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(0, 0)));
        assert_eq!(drain(&mut rx), vec![TrackerEvent::EnterRegion]);

        tracker.set_last_point(Some(Point::new(1, 1)));
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_leave_region() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(0, 0)));
        tracker.set_last_point(Some(Point::new(10, 10)));
        assert_eq!(
            drain(&mut rx),
            vec![TrackerEvent::EnterRegion, TrackerEvent::LeaveRegion]
        );
        assert!(!tracker.in_region());
    }

    #[test]
    fn test_stay_out_of_region() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(0, 0)));
        tracker.set_last_point(Some(Point::new(10, 10)));
        drain(&mut rx);

        tracker.set_last_point(Some(Point::new(11, 11)));
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_jitter_inside_emits_once() {
        let (mut tracker, mut rx) = tracker();
        for i in 0..1000 {
            tracker.set_last_point(Some(Point::new(i % 10, (i * 7) % 10)));
        }
        assert_eq!(drain(&mut rx), vec![TrackerEvent::EnterRegion]);
    }

    #[test]
    fn test_jitter_across_boundary_alternates() {
        let (mut tracker, mut rx) = tracker();
        for i in 0..6 {
            let x = if i % 2 == 0 { 9 } else { 10 };
            tracker.set_last_point(Some(Point::new(x, 5)));
        }
        assert_eq!(
            drain(&mut rx),
            vec![
                TrackerEvent::EnterRegion,
                TrackerEvent::LeaveRegion,
                TrackerEvent::EnterRegion,
                TrackerEvent::LeaveRegion,
                TrackerEvent::EnterRegion,
                TrackerEvent::LeaveRegion,
            ]
        );
    }

    #[test]
    fn test_none_point() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(None);
        assert!(!tracker.in_region());
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_none_point_leaves_region() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(5, 5)));
        drain(&mut rx);

        tracker.set_last_point(None);
        assert_eq!(drain(&mut rx), vec![TrackerEvent::LeaveRegion]);
    }

    #[test]
    fn test_none_region() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_region(None);
        tracker.set_last_point(Some(Point::new(1, 1)));
        assert!(!tracker.in_region());
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_region_swap_without_motion() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(5, 5)));
        drain(&mut rx);

        tracker.set_region(None);
        assert_eq!(drain(&mut rx), vec![TrackerEvent::LeaveRegion]);

        tracker.set_region(Some(Rect::make(0, 0, 100, 100)));
        assert_eq!(drain(&mut rx), vec![TrackerEvent::EnterRegion]);
        assert_eq!(tracker.last_point(), Some(Point::new(5, 5)));
    }

    #[test]
    fn test_region_swap_that_still_contains_point_is_silent() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(0, 0)));
        drain(&mut rx);

        tracker.set_region(Some(Rect::make(0, 0, 100, 100)));
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
        assert!(tracker.in_region());
    }

    #[test]
    fn test_same_region_is_idempotent() {
        let (mut tracker, mut rx) = tracker();
        let region = Rect::make(0, 0, 10, 10);
        tracker.set_last_point(Some(Point::new(3, 3)));
        drain(&mut rx);

        for _ in 0..5 {
            tracker.set_region(Some(region));
        }
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));

        tracker.set_last_point(Some(Point::new(50, 50)));
        drain(&mut rx);
        for _ in 0..5 {
            tracker.set_region(Some(region));
        }
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_emit_scroll() {
        let (tracker, mut rx) = tracker();
        tracker.on_scroll_up();
        tracker.on_scroll_down();
        assert_eq!(
            drain(&mut rx),
            vec![TrackerEvent::ScrollUp, TrackerEvent::ScrollDown]
        );
    }

    #[test]
    fn test_stopped_tracker_is_silent() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(1, 1)));
        drain(&mut rx);

        tracker.stop();
        tracker.set_last_point(Some(Point::new(50, 50)));
        tracker.set_region(None);
        tracker.on_scroll_up();
        assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_restart_discards_previous_state() {
        let (mut tracker, mut rx) = tracker();
        tracker.set_last_point(Some(Point::new(1, 1)));
        drain(&mut rx);

        tracker.stop();
        tracker.start();
        assert!(!tracker.in_region());
        assert_eq!(tracker.last_point(), None);

        tracker.set_last_point(Some(Point::new(2, 2)));
        assert_eq!(drain(&mut rx), vec![TrackerEvent::EnterRegion]);
    }

    #[test]
    fn test_closed_receiver_does_not_panic() {
        let (mut tracker, rx) = tracker();
        drop(rx);
        tracker.set_last_point(Some(Point::new(1, 1)));
        tracker.on_scroll_down();
        assert!(tracker.in_region());
    }
}
