use ttyplot::data::MAX_CAPACITY;
use ttyplot::{Error, RecordMode, SampleStore, Series, StreamDecoder};

fn ring_slots(store: &SampleStore) -> Vec<Option<f64>> {
    let ring = store.series(Series::First).unwrap();
    (0..ring.capacity()).map(|i| ring.slot(i)).collect()
}

#[test]
fn five_records_into_four_slots() {
    let mut store = SampleStore::new(4, false).unwrap();
    let mut dec = StreamDecoder::new(RecordMode::Single);
    let mut records = Vec::new();
    dec.feed(b"1 2 3 4 5\n", &mut records);
    for r in &records {
        store.record(r.v1, r.v2);
    }

    assert_eq!(
        ring_slots(&store),
        vec![Some(5.0), Some(2.0), Some(3.0), Some(4.0)]
    );
    let ring = store.series(Series::First).unwrap();
    assert_eq!(ring.write_index(), 0);
    assert_eq!(ring.total_written(), 5);
    assert!(ring.has_wrapped());

    let stats = store.statistics(Series::First).unwrap();
    assert_eq!(stats.min, 2.0);
    assert_eq!(stats.max, 5.0);
    assert_eq!(stats.avg, 3.5);
    assert_eq!(stats.count, 4);
}

#[test]
fn first_write_lands_at_slot_zero() {
    let mut store = SampleStore::new(8, false).unwrap();
    store.record(3.0, None);
    let ring = store.series(Series::First).unwrap();
    assert_eq!(ring.write_index(), 0);
    assert_eq!(ring.slot(0), Some(3.0));
    assert_eq!(ring.slot(1), None);
}

#[test]
fn statistics_skip_unset_slots() {
    let mut store = SampleStore::new(10, false).unwrap();
    assert!(store.statistics(Series::First).is_none());
    store.record(4.0, None);
    store.record(6.0, None);
    let stats = store.statistics(Series::First).unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.avg, 5.0);

    let chrono: Vec<_> = store
        .series(Series::First)
        .unwrap()
        .iter_chronological()
        .collect();
    assert_eq!(chrono.len(), 10);
    assert!(chrono[..8].iter().all(Option::is_none));
    assert_eq!(&chrono[8..], &[Some(4.0), Some(6.0)]);
}

#[test]
fn overwrite_forgets_old_records() {
    let mut store = SampleStore::new(3, false).unwrap();
    for v in 1..=10 {
        store.record(v as f64, None);
    }
    let stats = store.statistics(Series::First).unwrap();
    assert_eq!(stats.min, 8.0);
    assert_eq!(stats.max, 10.0);
    assert_eq!(stats.count, 3);
    assert_eq!(store.value_at(Series::First, 0), Some(10.0));
    assert_eq!(store.value_at(Series::First, 2), Some(8.0));
    assert_eq!(store.value_at(Series::First, 3), None);
}

#[test]
fn negative_values_are_stored_as_zero() {
    let mut store = SampleStore::new(4, true).unwrap();
    store.record(-4.0, Some(-0.5));
    assert_eq!(store.value_at(Series::First, 0), Some(0.0));
    assert_eq!(store.value_at(Series::Second, 0), Some(0.0));
}

#[test]
fn missing_second_value_is_zero() {
    let mut store = SampleStore::new(4, true).unwrap();
    store.record(2.0, None);
    assert_eq!(store.value_at(Series::Second, 0), Some(0.0));
    assert_eq!(
        store.series(Series::Second).unwrap().total_written(),
        store.total_written()
    );
}

#[test]
fn single_series_has_no_second_ring() {
    let mut store = SampleStore::new(4, false).unwrap();
    store.record(1.0, Some(9.0));
    assert!(!store.is_two_series());
    assert!(store.series(Series::Second).is_none());
    assert!(store.statistics(Series::Second).is_none());
}

#[test]
fn observed_range_spans_both_series() {
    let mut store = SampleStore::new(4, true).unwrap();
    store.record(3.0, Some(8.0));
    store.record(5.0, Some(1.0));
    assert_eq!(store.observed_range(), Some((1.0, 8.0)));
}

#[test]
fn capacity_beyond_limit_is_fatal() {
    let err = SampleStore::new(MAX_CAPACITY + 1, false).unwrap_err();
    assert!(matches!(
        err,
        Error::CapacityExceeded {
            requested,
            limit: MAX_CAPACITY
        } if requested == MAX_CAPACITY + 1
    ));
    assert_ne!(err.exit_code(), 0);
    assert!(SampleStore::new(MAX_CAPACITY, false).is_ok());
}

#[test]
fn shrinking_keeps_the_newest_samples() {
    let mut store = SampleStore::new(4, false).unwrap();
    for v in 1..=6 {
        store.record(v as f64, None);
    }
    store.resize(2).unwrap();
    assert_eq!(store.capacity(), 2);
    assert_eq!(store.total_written(), 6);
    let stats = store.statistics(Series::First).unwrap();
    assert_eq!((stats.min, stats.max, stats.count), (5.0, 6.0, 2));

    store.record(7.0, None);
    assert_eq!(store.value_at(Series::First, 0), Some(7.0));
    assert_eq!(store.value_at(Series::First, 1), Some(6.0));
}

#[test]
fn growing_keeps_history_in_order() {
    let mut store = SampleStore::new(3, false).unwrap();
    for v in 1..=5 {
        store.record(v as f64, None);
    }
    store.resize(6).unwrap();
    assert!(
        !store.series(Series::First).unwrap().has_wrapped(),
        "new slots are still unset"
    );
    assert_eq!(store.value_at(Series::First, 0), Some(5.0));
    assert_eq!(store.value_at(Series::First, 2), Some(3.0));
    assert_eq!(store.value_at(Series::First, 3), None);

    store.record(6.0, None);
    let chrono: Vec<_> = store
        .series(Series::First)
        .unwrap()
        .iter_chronological()
        .flatten()
        .collect();
    assert_eq!(chrono, vec![3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn resize_past_limit_is_rejected() {
    let mut store = SampleStore::new(4, false).unwrap();
    assert!(matches!(
        store.resize(MAX_CAPACITY * 2),
        Err(Error::CapacityExceeded { .. })
    ));
    assert_eq!(store.capacity(), 4);
}
