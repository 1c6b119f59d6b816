use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn run(args: &[&str]) -> (bool, Value) {
    let out = Command::new(env!("CARGO_BIN_EXE_tennis_markets"))
        .args(args)
        .env("RUST_LOG", "off")
        .env_remove("TENNIS_SEED")
        .env_remove("TENNIS_SIMULATIONS")
        .output()
        .expect("binary should run");
    let stdout = String::from_utf8(out.stdout).expect("utf8 output");
    let json = serde_json::from_str(stdout.trim()).unwrap_or(Value::Null);
    (out.status.success(), json)
}

#[test]
fn prices_a_single_match() {
    let (ok, json) = run(&[
        "price", "--p1", "0.65", "--p2", "0.6", "--best-of", "5", "--simulations", "3000",
        "--seed", "7",
    ]);
    assert!(ok);
    assert_eq!(json["samples"], 3000);
    assert_eq!(json["moneyline"]["market"], "ML");
    assert_eq!(json["setTotals"].as_array().map(Vec::len), Some(2));
    let prob_a = json["moneyline"]["probA"].as_f64().unwrap();
    let prob_b = json["moneyline"]["probB"].as_f64().unwrap();
    assert!((prob_a + prob_b - 1.0).abs() < 1e-9);
    assert!(prob_a > 0.5);
}

#[test]
fn same_seed_same_prices() {
    let args = [
        "price", "--p1", "0.66", "--p2", "0.62", "--simulations", "2000", "--seed", "3",
    ];
    let (_, first) = run(&args);
    let (_, second) = run(&args);
    assert_eq!(first, second);
}

#[test]
fn rejects_bad_format() {
    let (ok, _) = run(&["price", "--p1", "0.65", "--p2", "0.6", "--best-of", "4"]);
    assert!(!ok);
}

#[test]
fn batch_reports_failures_and_stats() {
    let path = fixture("batch.json");
    let (ok, json) = run(&["batch", path.to_str().unwrap(), "--seed", "1"]);
    assert!(ok);

    let results = json["results"].as_array().expect("results array");
    assert_eq!(results.len(), 4);
    assert_eq!(results[0]["samples"], 2000);
    assert_eq!(results[1]["gameTotals"][0]["line"], "18.5");
    assert!(results[2]["error"].as_str().unwrap().contains("bestof"));
    assert!(results[3]["error"].as_str().unwrap().contains("p1"));

    assert_eq!(json["stats"]["total_requests"], 4);
    assert_eq!(json["stats"]["success_count"], 2);
    assert_eq!(json["stats"]["error_count"], 2);
}
