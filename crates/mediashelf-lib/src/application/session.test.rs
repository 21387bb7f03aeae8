use super::*;
use crate::primitives::{MediaKind, ProviderFamily};
use std::path::PathBuf;

#[test]
fn test_live_providers_without_keys_has_anime_only() {
    let providers = live_providers(&AppConfig::default(), &Client::new());

    assert!(providers.for_kind(MediaKind::Anime).is_some());
    assert!(providers.for_kind(MediaKind::Manga).is_some());
    assert!(providers.for_kind(MediaKind::Movie).is_none());
    assert!(providers.for_kind(MediaKind::Game).is_none());
    assert!(providers.trending().is_none());
}

#[test]
fn test_live_providers_with_keys() {
    let config = AppConfig {
        tmdb_api_key: Some("tmdb".to_string()),
        rawg_api_key: Some("rawg".to_string()),
        ..AppConfig::default()
    };
    let providers = live_providers(&config, &Client::new());

    assert!(providers.for_family(ProviderFamily::FilmTv).is_some());
    assert!(providers.for_family(ProviderFamily::Game).is_some());
    assert!(providers.trending().is_some());
    assert_eq!(providers.names().len(), 3);
    assert!(providers.for_kind(MediaKind::Book).is_none());
}

#[test]
fn test_live_store_requires_data_dir() {
    assert!(live_store(&AppConfig::default()).is_err());

    let config = AppConfig {
        data_dir: Some(PathBuf::from("/tmp/shelf")),
        ..AppConfig::default()
    };
    assert!(live_store(&config).is_ok());
}

#[test]
fn test_live_clock_today_is_close_to_now() {
    let clock = LiveClockProvider;
    let gap = (clock.today() - clock.now().date_naive()).num_days().abs();
    assert!(gap <= 1);
}
