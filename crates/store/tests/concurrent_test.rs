//! Concurrent access tests for numbering and document writes.
//!
//! These tests verify that:
//! - Concurrent callers of the numbering service never share a number
//! - Concurrent saves to one document type never drop a record

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use docket_core::document::{Document, DocumentType, LineItem};
use docket_shared::config::NumberingConfig;
use docket_store::{DocumentStore, FileStore, KeyValueStore, MemoryStore, NumberingService};

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
}

fn issue_concurrently<S: KeyValueStore + 'static>(numbering: Arc<NumberingService<S>>) -> Vec<String> {
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let numbering = Arc::clone(&numbering);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .map(|_| numbering.next_on("invoice", today()).unwrap().value)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect()
}

#[test]
fn test_concurrent_numbers_are_unique() {
    let numbering = Arc::new(NumberingService::new(
        MemoryStore::new(),
        &NumberingConfig::default(),
    ));

    let numbers = issue_concurrently(Arc::clone(&numbering));

    let unique: HashSet<_> = numbers.iter().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);
    assert_eq!(
        numbering.counter("invoice").map(|c| c.current),
        Some((THREADS * PER_THREAD) as u64)
    );
}

#[test]
fn test_concurrent_numbers_persist_to_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let numbering = Arc::new(NumberingService::new(
        FileStore::open(dir.path()).unwrap(),
        &NumberingConfig::default(),
    ));

    let numbers = issue_concurrently(numbering);
    assert_eq!(numbers.iter().collect::<HashSet<_>>().len(), THREADS * PER_THREAD);

    let reopened = NumberingService::new(
        FileStore::open(dir.path()).unwrap(),
        &NumberingConfig::default(),
    );
    let next = reopened.next_on("invoice", today()).unwrap();
    assert_eq!(next.value, format!("INV-2024-{:04}", THREADS * PER_THREAD + 1));
}

#[test]
fn test_concurrent_saves_keep_every_document() {
    let store = Arc::new(DocumentStore::new(MemoryStore::new()));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_index| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for n in 0..PER_THREAD {
                    let document = Document::new(
                        DocumentType::Invoice,
                        format!("INV-{thread_index}-{n}"),
                        today(),
                    )
                    .with_items(vec![LineItem::new("Service", dec!(1), dec!(100))]);
                    store.save(DocumentType::Invoice, document).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let documents = store.list(DocumentType::Invoice);
    assert_eq!(documents.len(), THREADS * PER_THREAD);
    let ids: HashSet<_> = documents.iter().filter_map(|d| d.id.clone()).collect();
    assert_eq!(ids.len(), THREADS * PER_THREAD);
}
