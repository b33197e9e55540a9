// tests/unit_config.rs
use std::fs;
use feedrank_core::config::{Config, RunConfig};
use feedrank_core::graph::CollisionPolicy;

#[test]
fn test_load_toml() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join("feedrank.toml");
    fs::write(
        &path,
        "[run]\nbatch_size = 250\n\n[graph]\ncollision = \"last_write_wins\"\n",
    )
    .unwrap();

    let c = Config::load(&path).unwrap();
    assert_eq!(c.run.batch_size, 250);
    assert_eq!(c.run.threads, None);
    assert_eq!(c.graph.collision, CollisionPolicy::LastWriteWins);
}

#[test]
fn test_load_local_picks_up_working_dir() {
    let d = tempfile::tempdir().unwrap();
    fs::write(d.path().join("feedrank.toml"), "[run]\nthreads = 3").unwrap();
    std::env::set_current_dir(d.path()).unwrap();

    let c = Config::load_local().unwrap();
    assert_eq!(c.run.threads, Some(3));
}

#[test]
fn test_defaults() {
    let r = RunConfig::default();
    assert_eq!(r.batch_size, 1000);
    assert_eq!(r.threads, None);
    let c = Config::new();
    assert!(!c.graph.co_comment_follows);
    assert!(!c.graph.synthesize_placeholders);
}

#[test]
fn test_thread_pool_respects_threads() {
    let mut c = Config::new();
    c.run.threads = Some(2);
    let pool = c.thread_pool().unwrap();
    assert_eq!(pool.current_num_threads(), 2);
}

#[test]
fn test_missing_file_is_error() {
    let d = tempfile::tempdir().unwrap();
    assert!(Config::load(&d.path().join("nope.toml")).is_err());
}
