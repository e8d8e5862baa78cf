use baremo::history::{load_history, save_history, HistoryState};
use baremo::scoring::{
    calculate_grades, load_reference_table, AdvisoryKind, RawMeasurement, ReferenceTable, Sex,
    TestEvent,
};
use std::path::PathBuf;
use std::sync::Arc;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("baremos.sample.json")
}

async fn sample_table() -> ReferenceTable {
    load_reference_table(&sample_path()).await.unwrap()
}

fn all_eights() -> RawMeasurement {
    RawMeasurement {
        jump: 2.35,
        push_ups: 32.0,
        sprint: 6.9,
        run_1000m: "3:22".to_string(),
        swim: 36.0,
        run_6000m: "2330".to_string(),
    }
}

#[tokio::test]
async fn test_sample_tables_grade_all_eights() {
    let table = sample_table().await;
    let result = calculate_grades(&table, Sex::Male, &all_eights());

    for event in TestEvent::ALL {
        assert_eq!(result.scores().get(event), 8.0, "{}", event);
    }
    assert_eq!(result.mean(), 8.0);
    assert!((result.final_grade() - 7.2).abs() < 1e-9);
    assert!(result.messages().is_empty());

    let adjusted = result.apply_concept(1.5);
    assert_eq!(adjusted.concept(), Some(1.0));
    assert!((adjusted.final_with_concept().unwrap() - 8.2).abs() < 1e-9);
}

#[tokio::test]
async fn test_sample_tables_cap_and_fail() {
    let table = sample_table().await;
    let measurement = RawMeasurement {
        jump: 1.5,
        push_ups: 50.0,
        ..all_eights()
    };
    let result = calculate_grades(&table, Sex::Male, &measurement);

    // Below every jump tier: worst tier scores 3, which fails
    assert_eq!(result.scores().get(TestEvent::Jump), 0.0);
    // 10.5 tier is capped
    assert_eq!(result.scores().get(TestEvent::PushUps), 10.0);

    let kinds: Vec<(TestEvent, AdvisoryKind)> =
        result.messages().iter().map(|m| (m.test, m.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (TestEvent::Jump, AdvisoryKind::Fail),
            (TestEvent::PushUps, AdvisoryKind::Capped)
        ]
    );
}

#[tokio::test]
async fn test_slow_times_fall_back_to_worst_tier() {
    let table = sample_table().await;
    let measurement = RawMeasurement {
        sprint: 9.5,
        run_6000m: "45:00".to_string(),
        ..all_eights()
    };
    let result = calculate_grades(&table, Sex::Male, &measurement);
    assert_eq!(result.scores().get(TestEvent::Sprint), 5.0);
    assert_eq!(result.scores().get(TestEvent::Run6000), 5.0);
}

#[tokio::test]
async fn test_concurrent_grading_shares_one_table() {
    let table = Arc::new(sample_table().await);
    let expected = calculate_grades(&table, Sex::Female, &all_eights());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let table = Arc::clone(&table);
            std::thread::spawn(move || calculate_grades(&table, Sex::Female, &all_eights()))
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert_eq!(result.scores(), expected.scores());
        assert_eq!(result.final_grade().to_bits(), expected.final_grade().to_bits());
    }
}

#[tokio::test]
async fn test_empty_table_degrades_to_zero() {
    let result = calculate_grades(&ReferenceTable::default(), Sex::Female, &all_eights());
    assert_eq!(result.mean(), 0.0);
    assert_eq!(result.final_grade(), 0.0);
    assert_eq!(result.messages().len(), 6);
}

#[tokio::test]
async fn test_saved_evaluations_survive_reload() {
    let table = sample_table().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut state = HistoryState::new();
    let result = calculate_grades(&table, Sex::Male, &all_eights()).apply_concept(0.5);
    state.record(&result);
    save_history(&path, &state).unwrap();

    let loaded = load_history(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    let entry = &loaded.evaluations[0];
    assert_eq!(entry.scores, *result.scores());
    assert_eq!(entry.concept, 0.5);
    assert!((entry.final_with_concept - 7.7).abs() < 1e-9);
    assert!((loaded.global_mean().unwrap() - 7.7).abs() < 1e-9);
}
