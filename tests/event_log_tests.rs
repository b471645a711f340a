#![allow(missing_docs)]

use evo_drive::simulation::event_log::{EventKind, EventLog};

#[test]
fn test_newest_first_and_bounded() {
    let mut log = EventLog::new(3);

    for i in 0..5 {
        log.log(1, i, format!("event {}", i), EventKind::Generation);
    }

    assert_eq!(log.events().len(), 3);
    assert_eq!(log.latest().map(|e| e.tick), Some(4));
    assert_eq!(log.events().back().map(|e| e.tick), Some(2));

    log.clear();
    assert!(log.latest().is_none());
}
