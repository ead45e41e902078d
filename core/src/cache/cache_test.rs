use super::*;
use crate::test_utils::init_test_logging;
use pretty_assertions::assert_eq;

const HOUR: Duration = Duration::from_secs(3600);

fn vars(pairs: &[(&str, Value)]) -> Variables {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn entry_size(key: &str, value: &Value) -> usize {
    key.len() + value.approx_size()
}

#[test]
fn test_get_and_set() {
    let cache = ResultCache::new(1 << 20, HOUR);
    assert_eq!(cache.get("1 + 1"), None);

    cache.set("1 + 1", Value::from(2)).unwrap();
    assert_eq!(cache.get("1 + 1"), Some(Value::from(2)));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.size(), entry_size("1 + 1", &Value::from(2)));
}

#[test]
fn test_replacing_an_entry_keeps_size_consistent() {
    let cache = ResultCache::new(1 << 20, HOUR);
    cache.set("k", Value::from("short")).unwrap();
    cache.set("k", Value::from("a longer value")).unwrap();

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("k"), Some(Value::from("a longer value")));
    assert_eq!(cache.size(), entry_size("k", &Value::from("a longer value")));
}

#[test]
fn test_size_pressure_evicts_oldest_first() {
    init_test_logging();
    let one = entry_size("a", &Value::from(1));
    // Room for exactly three entries.
    let cache = ResultCache::new(one * 3, HOUR);

    for key in ["a", "b", "c"] {
        cache.set(key, Value::from(1)).unwrap();
    }
    assert_eq!(cache.len(), 3);

    cache.set("d", Value::from(1)).unwrap();
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(Value::from(1)));
    assert!(cache.size() <= one * 3);
}

#[test]
fn test_replaced_entry_counts_as_newest() {
    let one = entry_size("a", &Value::from(1));
    let cache = ResultCache::new(one * 2, HOUR);
    cache.set("a", Value::from(1)).unwrap();
    cache.set("b", Value::from(1)).unwrap();
    cache.set("a", Value::from(2)).unwrap();
    cache.set("c", Value::from(3)).unwrap();

    assert_eq!(cache.get("b"), None);
    assert_eq!(cache.get("a"), Some(Value::from(2)));
    assert_eq!(cache.get("c"), Some(Value::from(3)));
}

#[test]
fn test_entry_larger_than_capacity_is_rejected() {
    let cache = ResultCache::new(64, HOUR);
    let big = Value::from("x".repeat(100));
    let err = cache.set("big", big.clone()).unwrap_err();
    assert_eq!(
        err,
        CacheError::EntryTooLarge {
            size: entry_size("big", &big),
            max: 64
        }
    );
    assert!(cache.is_empty());
}

#[test]
fn test_evict_oldest() {
    let cache = ResultCache::new(1 << 20, HOUR);
    assert!(!cache.evict_oldest());
    cache.set("first", Value::from(1)).unwrap();
    cache.set("second", Value::from(2)).unwrap();

    assert!(cache.evict_oldest());
    assert_eq!(cache.get("first"), None);
    assert_eq!(cache.get("second"), Some(Value::from(2)));
    assert_eq!(cache.size(), entry_size("second", &Value::from(2)));
}

#[test]
fn test_stats_track_hits_and_misses() {
    let cache = ResultCache::new(1 << 20, HOUR);
    cache.get("missing");
    cache.set("k", Value::from(1)).unwrap();
    cache.get("k");
    cache.get("k");

    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 2,
            misses: 1,
            entries: 1,
            size_bytes: entry_size("k", &Value::from(1)),
        }
    );

    cache.clear();
    assert_eq!(cache.stats().entries, 0);
    assert_eq!(cache.stats().size_bytes, 0);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entries_are_never_returned() {
    let cache = ResultCache::new(1 << 20, Duration::from_secs(10));
    cache.set("k", Value::from(1)).unwrap();

    tokio::time::advance(Duration::from_secs(9)).await;
    assert_eq!(cache.get("k"), Some(Value::from(1)));

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(cache.get("k"), None);
    // The lookup dropped the expired entry.
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.size(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_purge_expired() {
    let cache = ResultCache::new(1 << 20, Duration::from_secs(10));
    cache.set("old", Value::from(1)).unwrap();
    tokio::time::advance(Duration::from_secs(6)).await;
    cache.set("new", Value::from(2)).unwrap();
    tokio::time::advance(Duration::from_secs(5)).await;

    assert_eq!(cache.purge_expired(), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.size(), entry_size("new", &Value::from(2)));
    assert_eq!(cache.get("new"), Some(Value::from(2)));

    // The order queue was pruned too, so eviction reaches the live entry.
    assert!(cache.evict_oldest());
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_purges_in_background() {
    let cache = Arc::new(ResultCache::new(1 << 20, Duration::from_secs(60)));
    let sweeper = spawn_sweeper(&cache, SWEEP_INTERVAL).unwrap();
    cache.set("k", Value::from(1)).unwrap();

    tokio::time::sleep(SWEEP_INTERVAL + Duration::from_secs(1)).await;
    assert_eq!(cache.len(), 0);

    drop(cache);
    tokio::time::sleep(SWEEP_INTERVAL * 2).await;
    assert!(sweeper.is_finished());
}

#[test]
fn test_sweeper_needs_a_runtime() {
    let cache = Arc::new(ResultCache::new(1 << 20, HOUR));
    assert!(spawn_sweeper(&cache, SWEEP_INTERVAL).is_none());
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn test_key_without_variables_is_the_prefixed_expression() {
    assert_eq!(cache_key("1 + 2", &Variables::new()), "5:1 + 2");
}

#[test]
fn test_key_sorts_variables_by_name() {
    let key = cache_key(
        "x + y",
        &vars(&[("y", Value::from(2)), ("x", Value::from(1))]),
    );
    assert_eq!(key, "5:x + y|x=n:1;y=n:2;");
}

#[test]
fn test_key_distinguishes_types_with_same_display() {
    let number = cache_key("x", &vars(&[("x", Value::from(10))]));
    let string = cache_key("x", &vars(&[("x", Value::from("10"))]));
    assert_ne!(number, string);
    assert_eq!(string, "1:x|x=s:\"10\";");
}

#[test]
fn test_key_is_deterministic() {
    let bindings = vars(&[
        ("b", Value::Bool(true)),
        ("a", Value::from(vec![Value::from(1), Value::Null])),
        ("c", Value::from("q")),
    ]);
    let first = cache_key("f(a, b, c)", &bindings);
    for _ in 0..10 {
        assert_eq!(cache_key("f(a, b, c)", &bindings.clone()), first);
    }
    assert_eq!(first, "10:f(a, b, c)|a=a:[n:1,z:];b=b:true;c=s:\"q\";");
}

#[test]
fn test_expression_text_cannot_spell_another_key() {
    let bound = cache_key("1", &vars(&[("x", Value::from(2))]));
    let spelled = cache_key("1|x=n:2;", &Variables::new());
    assert_eq!(bound, "1:1|x=n:2;");
    assert_ne!(bound, spelled);

    // Spelling out the prefixed form does not help either.
    let respelled = cache_key(&bound, &Variables::new());
    assert_ne!(bound, respelled);
}
