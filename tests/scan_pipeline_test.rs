/// Scan pipeline decision tests.
///
/// These tests validate the per-product decision sequence of the scan loop
/// (persist → detect → suppress → alert) and the anti-spam cooldown against
/// an in-memory store model. Full integration tests against a live Postgres
/// require running the server.
use chrono::{DateTime, Duration, Utc};

const ANTI_SPAM_HOURS: i64 = 6;
const WINDOW_DAYS: i64 = 30;
const DEFAULT_THRESHOLD_PCT: f64 = 15.0;

// ---------------------------------------------------------------------------
// In-memory store model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TrackedProduct {
    slug: &'static str,
    dip_threshold: Option<f64>,
}

#[derive(Debug, Clone)]
struct RecordedAlert {
    slug: String,
    alert_price: f64,
    reference_price: f64,
    discount_pct: f64,
    triggered_at: DateTime<Utc>,
}

#[derive(Default)]
struct InMemoryStore {
    prices: Vec<(String, f64, DateTime<Utc>)>,
    alerts: Vec<RecordedAlert>,
}

impl InMemoryStore {
    fn seed_price(&mut self, slug: &str, price: f64, at: DateTime<Utc>) {
        self.prices.push((slug.to_string(), price, at));
    }

    fn window(&self, slug: &str, now: DateTime<Utc>) -> Vec<f64> {
        let since = now - Duration::days(WINDOW_DAYS);
        self.prices
            .iter()
            .filter(|(s, _, at)| s == slug && *at >= since)
            .map(|(_, price, _)| *price)
            .collect()
    }

    fn has_recent_alert(&self, slug: &str, now: DateTime<Utc>) -> bool {
        let since = now - Duration::hours(ANTI_SPAM_HOURS);
        self.alerts
            .iter()
            .any(|alert| alert.slug == slug && alert.triggered_at >= since)
    }
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    Some((sorted[n / 2] + sorted[(n - 1) / 2]) / 2.0)
}

/// Mirrors the per-product scan: persist the fetched price, evaluate the
/// trailing-window median, suppress inside the cooldown, record otherwise.
/// Returns (price_updated, alert_sent).
fn scan_once(
    store: &mut InMemoryStore,
    product: &TrackedProduct,
    fetched: Option<f64>,
    now: DateTime<Utc>,
) -> (bool, bool) {
    let Some(price) = fetched else {
        return (false, false);
    };

    store.seed_price(product.slug, price, now);

    let window = store.window(product.slug, now);
    let Some(reference_price) = median(&window).filter(|m| *m > 0.0) else {
        return (true, false);
    };

    let discount_pct = (reference_price - price) / reference_price * 100.0;
    let threshold = product.dip_threshold.unwrap_or(DEFAULT_THRESHOLD_PCT);

    if discount_pct < threshold {
        return (true, false);
    }

    if store.has_recent_alert(product.slug, now) {
        return (true, false);
    }

    store.alerts.push(RecordedAlert {
        slug: product.slug.to_string(),
        alert_price: price,
        reference_price,
        discount_pct,
        triggered_at: now,
    });

    (true, true)
}

fn scan_all(
    store: &mut InMemoryStore,
    products: &[(TrackedProduct, Option<f64>)],
    now: DateTime<Utc>,
) -> (i32, i32) {
    let mut scanned = 0;
    let mut dips_found = 0;
    for (product, fetched) in products {
        let (updated, alerted) = scan_once(store, product, *fetched, now);
        if updated {
            scanned += 1;
        }
        if alerted {
            dips_found += 1;
        }
    }
    (scanned, dips_found)
}

fn stable_product() -> TrackedProduct {
    TrackedProduct {
        slug: "labubu-the-monsters-zimomo",
        dip_threshold: None,
    }
}

/// Three observations at 100 over the last days.
fn store_with_flat_history(slug: &str, now: DateTime<Utc>) -> InMemoryStore {
    let mut store = InMemoryStore::default();
    for days_ago in 1..=3 {
        store.seed_price(slug, 100.0, now - Duration::days(days_ago));
    }
    store
}

// ---------------------------------------------------------------------------
// Per-product outcomes
// ---------------------------------------------------------------------------

#[test]
fn fetch_failure_skips_the_product() {
    let now = Utc::now();
    let mut store = InMemoryStore::default();

    let outcome = scan_once(&mut store, &stable_product(), None, now);

    assert_eq!(outcome, (false, false));
    assert!(store.prices.is_empty());
    assert!(store.alerts.is_empty());
}

#[test]
fn first_scan_persists_the_price_without_alerting() {
    let now = Utc::now();
    let mut store = InMemoryStore::default();

    let outcome = scan_once(&mut store, &stable_product(), Some(120.0), now);

    // The only window point is the fresh one, so the discount is zero.
    assert_eq!(outcome, (true, false));
    assert_eq!(store.prices.len(), 1);
    assert!(store.alerts.is_empty());
}

#[test]
fn sub_threshold_drop_does_not_alert() {
    let now = Utc::now();
    let product = stable_product();
    let mut store = store_with_flat_history(product.slug, now);

    let outcome = scan_once(&mut store, &product, Some(90.0), now);

    assert_eq!(outcome, (true, false));
    assert!(store.alerts.is_empty());
}

#[test]
fn deep_drop_raises_an_alert() {
    let now = Utc::now();
    let product = stable_product();
    let mut store = store_with_flat_history(product.slug, now);

    let outcome = scan_once(&mut store, &product, Some(70.0), now);

    assert_eq!(outcome, (true, true));
    assert_eq!(store.alerts.len(), 1);

    let alert = &store.alerts[0];
    assert_eq!(alert.alert_price, 70.0);
    assert_eq!(alert.reference_price, 100.0);
    assert!((alert.discount_pct - 30.0).abs() < 1e-9);
}

#[test]
fn per_product_threshold_overrides_the_default() {
    let now = Utc::now();
    let product = TrackedProduct {
        slug: "rare-figure",
        dip_threshold: Some(40.0),
    };
    let mut store = store_with_flat_history(product.slug, now);

    // 30% below the median: enough for the default, not for this product.
    let outcome = scan_once(&mut store, &product, Some(70.0), now);

    assert_eq!(outcome, (true, false));
    assert!(store.alerts.is_empty());
}

// ---------------------------------------------------------------------------
// Anti-spam cooldown
// ---------------------------------------------------------------------------

#[test]
fn repeat_within_cooldown_is_suppressed() {
    let now = Utc::now();
    let product = stable_product();
    let mut store = store_with_flat_history(product.slug, now);

    assert_eq!(scan_once(&mut store, &product, Some(70.0), now), (true, true));

    // Two hours later the price is still depressed; the discount still
    // clears the threshold but no second alert may be written.
    let later = now + Duration::hours(2);
    assert_eq!(
        scan_once(&mut store, &product, Some(70.0), later),
        (true, false)
    );
    assert_eq!(store.alerts.len(), 1);
}

#[test]
fn immediate_rescan_is_idempotent() {
    let now = Utc::now();
    let product = stable_product();
    let mut store = store_with_flat_history(product.slug, now);

    scan_once(&mut store, &product, Some(70.0), now);
    scan_once(&mut store, &product, Some(70.0), now);

    assert_eq!(store.alerts.len(), 1);
}

#[test]
fn alert_fires_again_after_the_cooldown() {
    let now = Utc::now();
    let product = stable_product();
    let mut store = store_with_flat_history(product.slug, now);

    scan_once(&mut store, &product, Some(70.0), now);

    let later = now + Duration::hours(ANTI_SPAM_HOURS + 1);
    let outcome = scan_once(&mut store, &product, Some(60.0), later);

    assert_eq!(outcome, (true, true));
    assert_eq!(store.alerts.len(), 2);
}

// ---------------------------------------------------------------------------
// Window and whole-scan behavior
// ---------------------------------------------------------------------------

#[test]
fn points_older_than_the_window_are_ignored() {
    let now = Utc::now();
    let product = stable_product();
    let mut store = InMemoryStore::default();

    // Stale high prices outside the 30-day window plus one recent low one.
    for days_ago in 40..43 {
        store.seed_price(product.slug, 200.0, now - Duration::days(days_ago));
    }
    store.seed_price(product.slug, 100.0, now - Duration::days(1));

    // Against a median of 200 this would be a 50% dip; within the real
    // window the median is 100 and nothing fires.
    let outcome = scan_once(&mut store, &product, Some(100.0), now);

    assert_eq!(outcome, (true, false));
    assert!(store.alerts.is_empty());
}

#[test]
fn scan_over_zero_products_reports_zero_counts() {
    let now = Utc::now();
    let mut store = InMemoryStore::default();

    assert_eq!(scan_all(&mut store, &[], now), (0, 0));
    assert!(store.prices.is_empty());
}

#[test]
fn one_failing_product_does_not_stop_the_others() {
    let now = Utc::now();
    let healthy = stable_product();
    let failing = TrackedProduct {
        slug: "delisted-figure",
        dip_threshold: None,
    };
    let mut store = store_with_flat_history(healthy.slug, now);

    let (scanned, dips_found) = scan_all(
        &mut store,
        &[(failing, None), (healthy, Some(70.0))],
        now,
    );

    assert_eq!(scanned, 1);
    assert_eq!(dips_found, 1);
}
