//! End-to-end flow: accelerometer samples through flick detection into the
//! controller, with a scripted event queue standing in for the firmware
//! channel.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use chrono::{NaiveDate, NaiveDateTime};
use embassy_time::Duration;
use pinetime_watchface::{
    event::ReversionTimer,
    gesture::FlickDetector,
    peripherals::{accelerometer::AccelSample, battery::ChargeGauge},
    ui::{WatchFace, Watchface},
    DisplayMode, TimerHandle, ViewController, WatchEvent, WatchfaceConfig,
};

/// Fake monotonic clock plus the timers due on it
#[derive(Default)]
struct Scheduler {
    now_ms: u64,
    next_handle: u32,
    due: Vec<(u64, TimerHandle)>,
}

#[derive(Clone, Default)]
struct QueueTimer(Rc<RefCell<Scheduler>>);

impl ReversionTimer for QueueTimer {
    fn schedule(&mut self, after: Duration) -> TimerHandle {
        let mut scheduler = self.0.borrow_mut();
        scheduler.next_handle += 1;
        let handle = TimerHandle(scheduler.next_handle);
        let at = scheduler.now_ms + after.as_millis();
        scheduler.due.push((at, handle));
        handle
    }
}

impl QueueTimer {
    /// Advance the clock, queueing every timer that fires on the way.
    fn advance(&self, ms: u64, events: &mut VecDeque<WatchEvent>) {
        let mut scheduler = self.0.borrow_mut();
        scheduler.now_ms += ms;
        let now = scheduler.now_ms;
        scheduler.due.retain(|(at, handle)| {
            if *at <= now {
                events.push_back(WatchEvent::RevertTimeout(*handle));
                false
            } else {
                true
            }
        });
    }

    fn now_ms(&self) -> u64 {
        self.0.borrow().now_ms
    }
}

struct FullBattery;

impl ChargeGauge for FullBattery {
    fn charge_percent(&self) -> u8 {
        100
    }
}

fn noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 31)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn drain<W: WatchFace>(
    controller: &mut ViewController<W, QueueTimer, FullBattery>,
    events: &mut VecDeque<WatchEvent>,
) -> usize {
    let mut redraws = 0;
    while let Some(event) = events.pop_front() {
        if controller.handle(event).unwrap() {
            redraws += 1;
        }
    }
    redraws
}

#[test]
fn flick_shows_status_then_reverts_once() {
    let timer = QueueTimer::default();
    let config = WatchfaceConfig::default();
    let mut detector = FlickDetector::from_config(&config);
    let mut controller = ViewController::new(Watchface::new(), timer.clone(), FullBattery, config);
    let mut events = VecDeque::new();

    events.push_back(WatchEvent::MinuteTick(noon()));
    assert_eq!(drain(&mut controller, &mut events), 1);
    assert_eq!(controller.face().clock_time().text(), "12:00");
    assert_eq!(controller.face().status_line().text(), "Wed 31 - 100%");

    // Wrist at rest, then flicked along Y, then back
    let samples = [[0, 0, 512], [0, 1000, 480], [0, 0, 512]];
    for accel in samples {
        timer.advance(20, &mut events);
        if let Some(tap) = detector.update(timer.now_ms(), &AccelSample { accel }) {
            events.push_back(WatchEvent::Tap(tap));
        }
    }
    drain(&mut controller, &mut events);
    assert_eq!(controller.mode(), DisplayMode::Status);
    assert!(controller.pending_timer().is_some());

    // A second flick inside the window is debounced
    events.push_back(WatchEvent::Tap(pinetime_watchface::TapEvent {
        axis: pinetime_watchface::Axis::Y,
        direction: 1,
    }));
    assert_eq!(drain(&mut controller, &mut events), 0);

    // A minute tick meanwhile keeps the status view
    events.push_back(WatchEvent::MinuteTick(noon()));
    drain(&mut controller, &mut events);
    assert_eq!(controller.mode(), DisplayMode::Status);

    // Not yet
    timer.advance(4_000, &mut events);
    assert!(events.is_empty());

    timer.advance(1_000, &mut events);
    assert_eq!(events.len(), 1);
    assert_eq!(drain(&mut controller, &mut events), 1);
    assert_eq!(controller.mode(), DisplayMode::Clock);
    assert_eq!(controller.pending_timer(), None);

    // Nothing else fires later
    timer.advance(60_000, &mut events);
    assert!(events.is_empty());
}
