use super::*;
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("mediashelf").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_no_subcommand_is_allowed() {
    let cli = parse(&[]);
    assert!(cli.command.is_none());
}

#[test]
fn test_search_joins_query_words() {
    match parse(&["search", "tv", "the", "wire"]).command {
        Some(Commands::Search { kind, query }) => {
            assert_eq!(kind, MediaKind::Tv);
            assert_eq!(query.join(" "), "the wire");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_search_requires_query() {
    assert!(Cli::try_parse_from(["mediashelf", "search", "movie"]).is_err());
}

#[test]
fn test_kind_aliases() {
    match parse(&["search", "film", "heat"]).command {
        Some(Commands::Search { kind, .. }) => assert_eq!(kind, MediaKind::Movie),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_add_collects_fields() {
    let cli = parse(&[
        "add", "anime", "cowboy", "bebop", "--status", "watching", "--rating", "9", "--tag",
        "space", "--tag", "noir", "--current", "3", "--pick", "2",
    ]);

    let Some(Commands::Add(args)) = cli.command else {
        panic!("expected add");
    };
    assert_eq!(args.title(), "cowboy bebop");
    assert_eq!(args.kind, MediaKind::Anime);
    assert_eq!(args.pick, Some(2));
    assert!(!args.offline);

    let update = args.to_update();
    assert_eq!(update.status, Some(WatchStatus::InProgress));
    assert_eq!(update.rating, Some(Some(9.0)));
    assert_eq!(update.progress_current, Some(Some(3)));
    assert_eq!(update.progress_total, None);
    let tags = update.manual_tags.unwrap();
    assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["space", "noir"]);
}

#[test]
fn test_add_offline_conflicts_with_pick() {
    assert!(
        Cli::try_parse_from(["mediashelf", "add", "book", "dune", "--offline", "--pick", "1"])
            .is_err()
    );
}

#[test]
fn test_edit_accepts_negative_progress_and_dates() {
    let cli = parse(&[
        "edit",
        "dune",
        "--current",
        "-2",
        "--finished",
        "2024-03-01",
        "--clear-rating",
    ]);

    let Some(Commands::Edit(args)) = cli.command else {
        panic!("expected edit");
    };
    let update = args.to_update();
    assert_eq!(update.progress_current, Some(Some(-2)));
    assert_eq!(
        update.date_finished,
        Some(NaiveDate::from_ymd_opt(2024, 3, 1))
    );
    assert_eq!(update.rating, Some(None));
}

#[test]
fn test_edit_without_fields_is_empty_update() {
    let Some(Commands::Edit(args)) = parse(&["edit", "dune"]).command else {
        panic!("expected edit");
    };
    assert!(args.to_update().is_empty());
}

#[test]
fn test_edit_rejects_bad_date() {
    assert!(
        Cli::try_parse_from(["mediashelf", "edit", "dune", "--finished", "yesterday"]).is_err()
    );
}

#[test]
fn test_recommend_random_flag() {
    match parse(&["recommend", "--random"]).command {
        Some(Commands::Recommend { random }) => assert!(random),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_global_options_before_subcommand() {
    let cli = parse(&["--user", "ana", "--jobs", "4", "--color", "never", "undo"]);

    assert_eq!(cli.config.user, "ana");
    assert_eq!(cli.config.jobs, Some(4));
    assert!(matches!(cli.command, Some(Commands::Undo)));
}

#[test]
fn test_library_usage_flags() {
    assert!(!Commands::Version.uses_library());
    assert!(Commands::Undo.mutates_library());
    assert!(!Commands::Recommend { random: false }.mutates_library());
    assert!(Commands::Recommend { random: false }.uses_library());
}
