//! Producer and consumer worker tests.

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use super::*;
use crate::protocol::{LogRecord, Priority};

#[tokio::test]
async fn test_basic_produce_consume() {
    let pipeline = Pipeline::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let consumers = pipeline.spawn_consumers(1, tx);

    let record = LogRecord::new(1, "test log", Priority::Medium);
    pipeline.queue().insert(record.clone());

    let consumed = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("consumer never delivered")
        .unwrap();
    assert_eq!(consumed, record);
    assert_eq!(consumed.message, "test log");

    for handle in consumers {
        handle.abort();
    }
}

#[tokio::test]
async fn test_producer_emits_all_priority_classes() {
    let pipeline = Pipeline::new();
    let queue = pipeline.queue();

    Producer::new(queue.clone(), 10).run().await;
    assert_eq!(queue.len(), 10);

    let mut classes = HashSet::new();
    for _ in 0..10 {
        classes.insert(queue.remove_highest().await.priority);
    }

    for priority in Priority::ROUND {
        assert!(classes.contains(&priority), "{priority:?} never produced");
    }
}

#[tokio::test]
async fn test_producer_round_drains_most_urgent_first() {
    let pipeline = Pipeline::new();
    let queue = pipeline.queue();

    Producer::new(queue.clone(), 10).run().await;

    let drained: Vec<LogRecord> = {
        let mut out = Vec::new();
        for _ in 0..10 {
            out.push(queue.remove_highest().await);
        }
        out
    };

    assert_eq!(drained.first().unwrap().priority, Priority::Critical);
    assert_eq!(drained.last().unwrap().priority, Priority::Low);

    // Full drain order: classes descend, and within a class the round
    // drains in insertion order. Seqs 0..10 cycle LOW, MEDIUM, HIGH,
    // CRITICAL, so CRITICAL landed on 3 and 7, HIGH on 2 and 6, and so on.
    let seqs: Vec<u64> = drained.iter().map(|r| r.seq).collect();
    assert_eq!(seqs, vec![3, 7, 2, 6, 1, 5, 9, 0, 4, 8]);
}

#[tokio::test]
async fn test_producer_sequence_strictly_increases() {
    let pipeline = Pipeline::new();
    let queue = pipeline.queue();

    Producer::new(queue.clone(), 8).with_seq_base(2000).run().await;

    let mut seqs: Vec<u64> = (0..8).map(|_| queue.try_remove_highest().unwrap().seq).collect();
    seqs.sort_unstable();
    assert_eq!(seqs, (2000..2008).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_consumer_drains_queue_to_empty() {
    let pipeline = Pipeline::new();
    let queue = pipeline.queue();

    for seq in 0..5u64 {
        queue.insert(LogRecord::new(seq, format!("test log {seq}"), Priority::Medium));
    }
    assert!(!queue.is_empty());

    let (tx, _rx) = mpsc::unbounded_channel();
    let consumers = pipeline.spawn_consumers(1, tx);

    let drained = timeout(Duration::from_secs(2), async {
        while !queue.is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(drained.is_ok(), "consumer did not drain the queue in time");

    for handle in consumers {
        handle.abort();
    }
}

#[tokio::test]
async fn test_consumer_stops_when_sink_closes() {
    let pipeline = Pipeline::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut consumers = pipeline.spawn_consumers(1, tx);
    let handle = consumers.pop().unwrap();

    // With the receiver gone, the first delivery fails and the loop exits.
    drop(rx);
    pipeline
        .queue()
        .insert(LogRecord::new(1, "test log", Priority::Low));

    let finished = timeout(Duration::from_secs(1), handle).await;
    assert!(finished.is_ok(), "consumer kept running after sink closed");
}

#[tokio::test]
async fn test_multiple_producers_and_consumers() {
    let pipeline = Pipeline::new();
    let producers = 3usize;
    let consumers = 2usize;
    let records_each = 10usize;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let consumer_handles = pipeline.spawn_consumers(consumers, tx);
    let producer_handles = pipeline.spawn_producers(producers, records_each);

    for handle in producer_handles {
        handle.await.unwrap();
    }

    let expected = producers * records_each;
    let mut seen = HashSet::new();
    for _ in 0..expected {
        let r = timeout(Duration::from_secs(3), rx.recv())
            .await
            .expect("not all records were consumed in time")
            .unwrap();
        assert!(seen.insert(r.seq), "record {} consumed twice", r.seq);
    }

    assert_eq!(seen.len(), expected);
    assert!(pipeline.queue().is_empty());

    for handle in consumer_handles {
        handle.abort();
    }
}
