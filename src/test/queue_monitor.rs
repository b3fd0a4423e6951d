use super::recording_stack::RecordingStack;
use crate::net::DeviceId;
use crate::sim::SimTime;
use crate::stack::{NetStack, TimerGuard};
use crate::stats::{MonitoredDevice, QueueMonitor};

fn monitor() -> QueueMonitor {
    QueueMonitor::new(vec![
        MonitoredDevice {
            src_name: "SAT-0".into(),
            dst_name: "SAT-1".into(),
            dev: DeviceId(0),
        },
        MonitoredDevice {
            src_name: "SAT-1".into(),
            dst_name: "SAT-0".into(),
            dev: DeviceId(1),
        },
    ])
}

#[test]
fn samples_every_device_each_period() {
    let mut stack = RecordingStack::default();
    stack.queue_len.insert(DeviceId(0), 7);

    let mon = monitor();
    let period = SimTime::from_millis(100);
    let _guard = mon.start(&mut stack, period);
    stack.run_until(SimTime::from_millis(350));

    let samples = mon.take_samples();
    assert_eq!(samples.len(), 6);
    let times: Vec<_> = samples.iter().step_by(2).map(|s| s.time).collect();
    assert_eq!(
        times,
        vec![
            SimTime::from_millis(100),
            SimTime::from_millis(200),
            SimTime::from_millis(300)
        ]
    );
    assert_eq!(samples[0].src_name, "SAT-0");
    assert_eq!(samples[0].packets, 7);
    assert_eq!(samples[1].dst_name, "SAT-0");
    assert_eq!(samples[1].packets, 0);

    assert!(mon.take_samples().is_empty());
}

#[test]
fn dropping_guard_stops_sampling() {
    let mut stack = RecordingStack::default();
    let mon = monitor();
    let guard = mon.start(&mut stack, SimTime::from_millis(100));

    stack.run_until(SimTime::from_millis(100));
    assert_eq!(mon.take_samples().len(), 2);

    drop(guard);
    stack.run_until(SimTime::from_secs(1));
    assert!(mon.take_samples().is_empty());
}

#[test]
fn timer_flag_observes_cancel() {
    let (guard, flag) = TimerGuard::pair();
    assert!(!flag.is_cancelled());
    guard.cancel();
    assert!(flag.is_cancelled());

    let (guard, flag) = TimerGuard::pair();
    drop(guard);
    assert!(flag.is_cancelled());
}
