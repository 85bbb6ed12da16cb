/*!
 * Tests for the status queue
 */

use srtbatch::status::{self, ProgressTracker, Severity, StatusBoard, StatusMessage};

#[test]
fn test_queue_withManyProducers_shouldDeliverEverything() {
    let (tx, mut rx) = status::channel::<()>();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tx = tx.clone();
            std::thread::spawn(move || {
                for j in 0..25 {
                    tx.log(Severity::Info, format!("{}-{}", i, j));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(rx.drain().len(), 100);
    assert!(rx.drain().is_empty());
}

#[test]
fn test_queue_fromSingleProducer_shouldKeepFifoOrder() {
    let (tx, mut rx) = status::channel::<()>();
    for i in 0..10 {
        tx.log(Severity::Info, i.to_string());
    }
    let texts: Vec<String> = rx
        .drain()
        .into_iter()
        .filter_map(|m| match m {
            StatusMessage::Log { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(texts, (0..10).map(|i| i.to_string()).collect::<Vec<_>>());
}

#[test]
fn test_board_withoutMessages_shouldNotBeFinished() {
    let (_tx, mut rx) = status::channel::<u8>();
    let mut board = StatusBoard::new();
    assert_eq!(board.poll(&mut rx), 0);
    assert!(!board.is_finished());
    assert_eq!(board.fraction, 0.0);
}

#[test]
fn test_tracker_withThreeFiles_shouldAdvanceMonotonically() {
    let mut tracker = ProgressTracker::new(3);
    let mut last = 0.0;
    for file in 0..3 {
        for done in [0, 5, 10] {
            let fraction = tracker.update(file, done, 10);
            assert!(fraction >= last);
            last = fraction;
        }
        assert!((tracker.file_done(file) - (file as f64 + 1.0) / 3.0).abs() < 1e-9);
    }
    assert!((tracker.current() - 1.0).abs() < 1e-9);
}
