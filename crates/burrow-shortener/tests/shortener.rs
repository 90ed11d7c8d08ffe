use burrow_core::{ManualClock, RedirectKind, ShortCode};
use burrow_generator::RandomGenerator;
use burrow_shortener::{ShortenOptions, Shortener, ShortenerConfig, ShortenerError, ShortenerService};
use burrow_storage::InMemoryRepository;
use jiff::{SignedDuration, Timestamp};
use std::collections::HashSet;
use std::sync::Arc;

type Service = ShortenerService<InMemoryRepository<ManualClock>, RandomGenerator, ManualClock>;

fn service() -> (Service, ManualClock) {
    let clock = ManualClock::new(Timestamp::from_second(1_700_000_000).unwrap());
    let config = ShortenerConfig::builder()
        .domain("https://burrow.sh")
        .build();
    let service = ShortenerService::new(
        InMemoryRepository::with_clock(clock.clone()),
        RandomGenerator::default(),
        config,
    )
    .unwrap()
    .with_clock(clock.clone());
    (service, clock)
}

#[tokio::test]
async fn shorten_then_restore() {
    let (service, _) = service();

    let record = service
        .shorten("https://example.com/some/long/path?q=1", ShortenOptions::default())
        .await
        .unwrap();
    assert_eq!(record.short_code().as_str().len(), 7);

    let restored = service
        .restore(record.short_code().as_str(), None)
        .await
        .unwrap();
    assert_eq!(restored.original_url(), "https://example.com/some/long/path?q=1");
    assert_eq!(restored.redirect_kind(), RedirectKind::Permanent);
}

#[tokio::test]
async fn expired_link_is_gone_but_still_stored() {
    let (service, clock) = service();
    let options = ShortenOptions::builder()
        .ttl(SignedDuration::from_secs(1))
        .build();

    let record = service.shorten("https://example.com", options).await.unwrap();
    let code = record.short_code().as_str().to_string();

    let live = service.restore(&code, None).await.unwrap();
    assert!(live.has_expiry());
    assert_eq!(live.redirect_kind(), RedirectKind::Temporary);

    clock.advance(SignedDuration::from_secs(2));

    let err = service.restore(&code, None).await.unwrap_err();
    assert_eq!(err, ShortenerError::NotFound(code));
    assert_eq!(service.repository().len(), 1);
}

#[tokio::test]
async fn expired_custom_code_can_be_claimed_again() {
    let (service, clock) = service();
    let first = ShortenOptions::builder()
        .custom_code("sale")
        .ttl(SignedDuration::from_hours(1))
        .build();
    service.shorten("https://old.example.com", first).await.unwrap();

    let again = ShortenOptions::builder().custom_code("sale").build();
    let err = service
        .shorten("https://new.example.com", again.clone())
        .await
        .unwrap_err();
    assert_eq!(err, ShortenerError::CodeTaken("sale".to_string()));

    clock.advance(SignedDuration::from_hours(2));
    service.shorten("https://new.example.com", again).await.unwrap();

    let restored = service.restore("sale", None).await.unwrap();
    assert_eq!(restored.original_url(), "https://new.example.com");
}

#[tokio::test]
async fn password_gate() {
    let (service, _) = service();
    let options = ShortenOptions::builder().password("p").build();
    let record = service.shorten("https://example.com", options).await.unwrap();
    let code = record.short_code().as_str();

    assert!(matches!(
        service.restore(code, None).await,
        Err(ShortenerError::Unauthorized(_))
    ));
    assert!(matches!(
        service.restore(code, Some("q")).await,
        Err(ShortenerError::Unauthorized(_))
    ));
    assert_eq!(
        service.restore(code, Some("p")).await.unwrap().original_url(),
        "https://example.com"
    );
}

#[tokio::test]
async fn same_host_and_scheme_rules() {
    let (service, _) = service();

    assert!(matches!(
        service
            .shorten("https://burrow.sh/abc", ShortenOptions::default())
            .await,
        Err(ShortenerError::SameHost(_))
    ));
    assert!(matches!(
        service
            .shorten("ws://example.com", ShortenOptions::default())
            .await,
        Err(ShortenerError::UnsupportedScheme(_))
    ));
    assert!(service
        .shorten("https://example.com", ShortenOptions::default())
        .await
        .is_ok());
}

#[tokio::test]
async fn url_length_bound() {
    let (service, _) = service();
    let base = "https://example.com/";

    let at_limit = format!("{base}{}", "a".repeat(1000 - base.len()));
    assert!(service
        .shorten(&at_limit, ShortenOptions::default())
        .await
        .is_ok());

    let over = format!("{at_limit}a");
    assert_eq!(
        service
            .shorten(&over, ShortenOptions::default())
            .await
            .unwrap_err(),
        ShortenerError::UrlTooLong { len: 1001, max: 1000 }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_custom_code_claims_admit_exactly_one() {
    let (service, _) = service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                let options = ShortenOptions::builder().custom_code("contested").build();
                service
                    .shorten(&format!("https://example{i}.com"), options)
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(err) => assert_eq!(err, ShortenerError::CodeTaken("contested".to_string())),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(service.repository().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_generated_codes_are_unique() {
    let (service, _) = service();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..200)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .shorten(&format!("https://example.com/{i}"), ShortenOptions::default())
                    .await
            })
        })
        .collect();

    let mut codes = HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        assert!(codes.insert(record.short_code().clone()));
    }

    assert_eq!(codes.len(), 200);
    for code in &codes {
        assert!(ShortCode::new(code.as_str()).is_ok());
    }
}
