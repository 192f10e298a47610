//! Tests for the token cache module
//!
//! Includes unit tests and property-based tests for:
//! - Mint/redeem round trips
//! - TTL expiry and lazy sweeping
//! - Self-healing when backing files disappear

use super::*;
use crate::media::Category;
use chrono::Duration as ChronoDuration;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const TTL_SECS: i64 = DEFAULT_TOKEN_TTL_SECS as i64;

/// Cache on a manual clock plus a directory for backing files
fn create_test_cache() -> (TokenCache, ManualClock, TempDir) {
    let clock = ManualClock::default();
    let cache = TokenCache::with_clock(
        Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
        Arc::new(clock.clone()),
    );
    (cache, clock, TempDir::new().unwrap())
}

fn media_file(temp: &TempDir, name: &str) -> PathBuf {
    let path = temp.path().join(name);
    std::fs::write(&path, b"media").unwrap();
    path
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_mint_then_redeem_round_trip() {
        let (cache, _clock, temp) = create_test_cache();
        let path = media_file(&temp, "photo.jpg");

        let token = cache.mint(path.clone(), Category::Image);
        let redemption = cache.redeem(&token).unwrap();

        assert_eq!(redemption.path, path);
        assert_eq!(redemption.category, Category::Image);
    }

    #[test]
    fn test_token_is_uuid() {
        let (cache, _clock, temp) = create_test_cache();
        let token = cache.mint(media_file(&temp, "a.png"), Category::Image);
        assert!(uuid::Uuid::parse_str(&token).is_ok());
    }

    #[test]
    fn test_redeem_is_repeatable() {
        let (cache, _clock, temp) = create_test_cache();
        let token = cache.mint(media_file(&temp, "clip.mp4"), Category::Video);

        let first = cache.redeem(&token).unwrap();
        let second = cache.redeem(&token).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_same_file_many_tokens() {
        let (cache, _clock, temp) = create_test_cache();
        let path = media_file(&temp, "song.mp3");

        let a = cache.mint(path.clone(), Category::Audio);
        let b = cache.mint(path, Category::Audio);
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_redeem_missing_and_unknown() {
        let (cache, _clock, _temp) = create_test_cache();
        assert_eq!(cache.redeem(""), Err(RedeemError::Missing));
        assert_eq!(cache.redeem("not-a-token"), Err(RedeemError::Unknown));
    }

    #[test]
    fn test_expiry_boundary() {
        let (cache, clock, temp) = create_test_cache();
        let token = cache.mint(media_file(&temp, "photo.png"), Category::Image);

        clock.advance(ChronoDuration::seconds(TTL_SECS - 1));
        assert_eq!(cache.sweep_expired(), 0);
        assert!(cache.redeem(&token).is_ok());

        // Exactly TTL old is still live; expiry needs age > TTL
        clock.advance(ChronoDuration::seconds(1));
        assert!(cache.redeem(&token).is_ok());

        clock.advance(ChronoDuration::seconds(1));
        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.redeem(&token), Err(RedeemError::Unknown));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_token_rejected_before_sweep() {
        let (cache, clock, temp) = create_test_cache();
        let token = cache.mint(media_file(&temp, "photo.png"), Category::Image);

        clock.advance(ChronoDuration::seconds(TTL_SECS + 1));
        assert_eq!(cache.redeem(&token), Err(RedeemError::Expired));
        assert!(cache.get(&token).is_none());
    }

    #[test]
    fn test_sweep_only_removes_expired() {
        let (cache, clock, temp) = create_test_cache();
        cache.mint(media_file(&temp, "old.png"), Category::Image);

        clock.advance(ChronoDuration::seconds(TTL_SECS));
        let fresh = cache.mint(media_file(&temp, "new.png"), Category::Image);

        clock.advance(ChronoDuration::seconds(10));
        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&fresh).is_some());
    }

    #[test]
    fn test_vanished_file_removes_record() {
        let (cache, _clock, temp) = create_test_cache();
        let path = media_file(&temp, "gone.webm");
        let token = cache.mint(path.clone(), Category::Video);
        let keep = cache.mint(media_file(&temp, "kept.webm"), Category::Video);
        assert_eq!(cache.len(), 2);

        std::fs::remove_file(&path).unwrap();
        let err = cache.redeem(&token).unwrap_err();
        assert!(matches!(err, RedeemError::FileVanished { .. }));
        assert_eq!(err.public_message(), "File not found");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.redeem(&token), Err(RedeemError::Unknown));
        assert!(cache.redeem(&keep).is_ok());
    }

    #[test]
    fn test_backwards_clock_never_expires() {
        let (cache, clock, temp) = create_test_cache();
        let token = cache.mint(media_file(&temp, "photo.png"), Category::Image);

        clock.advance(ChronoDuration::seconds(-10 * TTL_SECS));
        assert_eq!(cache.sweep_expired(), 0);
        assert!(cache.redeem(&token).is_ok());
    }

    #[test]
    fn test_public_messages_hide_paths() {
        let err = RedeemError::FileVanished {
            path: "/srv/models/secret.png".to_string(),
        };
        assert!(!err.public_message().contains("secret"));
        assert_eq!(RedeemError::Expired.public_message(), RedeemError::Unknown.public_message());
    }

    #[test]
    fn test_concurrent_mint_sweep_redeem() {
        let (cache, clock, temp) = create_test_cache();
        let cache = Arc::new(cache);
        let path = media_file(&temp, "shared.png");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let path = path.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let token = cache.mint(path.clone(), Category::Image);
                        if i % 2 == 0 {
                            cache.sweep_expired();
                        }
                        assert!(cache.redeem(&token).is_ok());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 400);

        clock.advance(ChronoDuration::seconds(TTL_SECS + 1));
        assert_eq!(cache.sweep_expired(), 400);
        assert!(cache.is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn category_strategy() -> impl Strategy<Value = Category> {
        prop_oneof![
            Just(Category::Image),
            Just(Category::Video),
            Just(Category::Audio),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_redeem_returns_minted_file(
            name in prop::string::string_regex("[a-z]{1,12}\\.(png|mp4|wav)").unwrap(),
            category in category_strategy(),
        ) {
            let (cache, _clock, temp) = create_test_cache();
            let path = media_file(&temp, &name);

            let token = cache.mint(path.clone(), category);
            let redemption = cache.redeem(&token).unwrap();
            prop_assert_eq!(redemption.path, path);
            prop_assert_eq!(redemption.category, category);
        }

        #[test]
        fn prop_sweep_counts_expired(
            ages in prop::collection::vec(0i64..(2 * TTL_SECS), 1..20),
        ) {
            let (cache, clock, temp) = create_test_cache();
            let path = media_file(&temp, "x.png");
            let start = clock.now();
            let newest = start + ChronoDuration::seconds(2 * TTL_SECS);

            for age in &ages {
                clock.set(newest - ChronoDuration::seconds(*age));
                cache.mint(path.clone(), Category::Image);
            }
            clock.set(newest);

            let expected = ages.iter().filter(|age| **age > TTL_SECS).count();
            prop_assert_eq!(cache.sweep_expired(), expected);
            prop_assert_eq!(cache.len(), ages.len() - expected);
        }
    }
}
