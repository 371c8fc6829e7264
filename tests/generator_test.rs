mod common;

#[test]
fn test_generate_operations_csv() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("ops.csv");
    common::generate_operations_csv(&output_path, 500, 20, 7).expect("Failed to generate CSV");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&output_path)
        .expect("Failed to open CSV");

    let mut callers = std::collections::HashSet::new();
    let mut last_at = 0u64;
    let mut rows = 0;
    for result in reader.records() {
        let record = result.expect("Failed to read record");
        assert!(["fund", "update", "request"].contains(&&record[0]));
        let at: u64 = record[3].parse().expect("Failed to parse time");
        assert!(at >= last_at, "chain time must not decrease");
        last_at = at;
        callers.insert(record[1].to_string());
        rows += 1;
    }

    assert_eq!(rows, 500);
    assert!(callers.len() >= 15, "Should have seen most requesters");
}

#[test]
fn test_generation_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");
    common::generate_operations_csv(&a, 100, 5, 42).unwrap();
    common::generate_operations_csv(&b, 100, 5, 42).unwrap();

    assert_eq!(
        std::fs::read_to_string(a).unwrap(),
        std::fs::read_to_string(b).unwrap()
    );
}
