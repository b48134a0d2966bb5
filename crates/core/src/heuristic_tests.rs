use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

use crate::config::ConfigDocument;

fn config(document: ConfigDocument) -> ReviewConfig {
    ReviewConfig::resolve(ConfigDocument {
        version: Some(2),
        require_notification: Some(false),
        ..document
    })
    .unwrap()
}

fn quota(max: u64, min: u64) -> Quota {
    Quota {
        max_assignable: max,
        min_assignable: min,
        dynamic: false,
    }
}

fn ledger_with_authors(unique_authors: u64) -> OwnershipLedger {
    let mut ledger = OwnershipLedger::default();
    ledger.unique_authors = unique_authors;
    ledger
}

fn blame_candidate(login: &str, count: u64, ownership: f64) -> Candidate {
    Candidate {
        login: login.to_string(),
        count,
        source: CandidateSource::Blame,
        ownership: Some(ownership),
    }
}

#[test]
fn test_skipped_when_single_reviewer_configured() {
    let config = config(ConfigDocument {
        max_reviewers: Some(1),
        min_authors_of_changed_files: Some(5),
        ..ConfigDocument::default()
    });
    let quota = quota(1, 1);
    let ledger = ledger_with_authors(1);
    let mut selection = vec![blame_candidate("bob", 10, 1.0)];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    let mut rng = StdRng::seed_from_u64(7);

    let target = apply(
        &config,
        &quota,
        &ledger,
        &[],
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    assert_eq!(target, 1);
    assert_eq!(selection.len(), 1);
}

#[test]
fn test_skipped_when_change_is_too_small() {
    let config = config(ConfigDocument {
        max_reviewers: Some(3),
        min_authors_of_changed_files: Some(5),
        min_lines_changed_for_extra_reviewer: Some(100),
        ..ConfigDocument::default()
    });
    let quota = quota(3, 1);
    let ledger = ledger_with_authors(1);
    let mut selection = vec![blame_candidate("bob", 10, 1.0)];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    let mut rng = StdRng::seed_from_u64(7);

    let target = apply(
        &config,
        &quota,
        &ledger,
        &[],
        &mut selection,
        &mut eligibility,
        99,
        &mut rng,
    );

    assert_eq!(target, 1);
    assert_eq!(selection.len(), 1);
}

#[test]
fn test_diversity_widens_pool_when_room_remains() {
    let config = config(ConfigDocument {
        max_reviewers: Some(3),
        min_authors_of_changed_files: Some(2),
        ..ConfigDocument::default()
    });
    let quota = quota(3, 1);
    let ledger = ledger_with_authors(1);
    let mut selection = vec![blame_candidate("bob", 10, 1.0)];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    eligibility.select("bob");
    let mut rng = StdRng::seed_from_u64(7);

    let target = apply(
        &config,
        &quota,
        &ledger,
        &[],
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    assert_eq!(target, 2);
    assert_eq!(selection.len(), 1);
}

#[test]
fn test_diversity_swaps_when_pool_is_full() {
    let config = config(ConfigDocument {
        max_reviewers: Some(2),
        min_authors_of_changed_files: Some(3),
        ..ConfigDocument::default()
    });
    let quota = quota(2, 1);
    let ledger = ledger_with_authors(1);
    let mut selection = vec![
        blame_candidate("bob", 10, 0.5),
        blame_candidate("carol", 8, 0.5),
    ];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    eligibility.select("bob");
    eligibility.select("carol");
    let mut rng = StdRng::seed_from_u64(7);

    let target = apply(
        &config,
        &quota,
        &ledger,
        &[],
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    assert_eq!(target, 1);
    assert_eq!(selection.len(), 1);

    // The dropped login is barred from re-entering through later fills.
    let dropped = if selection[0].login == "bob" {
        "carol"
    } else {
        "bob"
    };
    assert!(!eligibility.is_eligible(dropped));
}

#[test]
fn test_diversity_suppresses_concentration() {
    let config = config(ConfigDocument {
        max_reviewers: Some(3),
        min_authors_of_changed_files: Some(2),
        min_percent_authorship_for_extra_reviewer: Some(50),
        ..ConfigDocument::default()
    });
    let quota = quota(3, 1);
    let ledger = ledger_with_authors(1);
    let pool = vec![
        blame_candidate("bob", 10, 0.9),
        blame_candidate("carol", 2, 0.1),
    ];
    let mut selection = vec![blame_candidate("bob", 10, 0.9)];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    eligibility.select("bob");
    let mut rng = StdRng::seed_from_u64(7);

    let target = apply(
        &config,
        &quota,
        &ledger,
        &pool,
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    // Diversity widened the pool; no next-best candidate was promoted.
    assert_eq!(target, 2);
    assert!(selection
        .iter()
        .all(|c| c.source != CandidateSource::NextBest));
}

#[test]
fn test_concentration_promotes_next_best() {
    let config = config(ConfigDocument {
        max_reviewers: Some(3),
        min_percent_authorship_for_extra_reviewer: Some(50),
        ..ConfigDocument::default()
    });
    let quota = quota(3, 1);
    let ledger = ledger_with_authors(5);
    let pool = vec![
        blame_candidate("bob", 10, 0.9),
        blame_candidate("carol", 2, 0.1),
    ];
    let mut selection = vec![blame_candidate("bob", 10, 0.9)];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    eligibility.select("bob");
    let mut rng = StdRng::seed_from_u64(7);

    apply(
        &config,
        &quota,
        &ledger,
        &pool,
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    assert_eq!(selection.len(), 2);
    assert_eq!(selection[1].login, "carol");
    assert_eq!(selection[1].source, CandidateSource::NextBest);
    assert!(!eligibility.is_eligible("carol"));
}

#[test]
fn test_concentration_evicts_when_pool_is_full() {
    let config = config(ConfigDocument {
        max_reviewers: Some(2),
        min_percent_authorship_for_extra_reviewer: Some(50),
        ..ConfigDocument::default()
    });
    let quota = quota(2, 1);
    let ledger = ledger_with_authors(5);
    let pool = vec![
        blame_candidate("bob", 10, 0.9),
        blame_candidate("carol", 5, 0.3),
        blame_candidate("dave", 2, 0.1),
    ];
    let mut selection = vec![
        blame_candidate("bob", 10, 0.9),
        blame_candidate("carol", 5, 0.3),
    ];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    eligibility.select("bob");
    eligibility.select("carol");
    let mut rng = StdRng::seed_from_u64(7);

    apply(
        &config,
        &quota,
        &ledger,
        &pool,
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    assert_eq!(selection.len(), 2);
    assert_eq!(selection[0].login, "bob");
    assert_eq!(selection[1].login, "dave");
    assert_eq!(selection[1].source, CandidateSource::NextBest);
}

#[test]
fn test_concentration_fires_behind_forced_assignment() {
    let config = config(ConfigDocument {
        max_reviewers: Some(3),
        min_percent_authorship_for_extra_reviewer: Some(75),
        ..ConfigDocument::default()
    });
    let quota = quota(3, 1);
    let ledger = ledger_with_authors(5);
    let pool = vec![
        blame_candidate("bob", 90, 0.9),
        blame_candidate("carol", 10, 0.1),
    ];
    // A forced path assignment heads the selection with no ownership.
    let mut selection = vec![
        Candidate::unscored("dba", CandidateSource::Assignment),
        blame_candidate("bob", 90, 0.9),
    ];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    eligibility.select("dba");
    eligibility.select("bob");
    let mut rng = StdRng::seed_from_u64(7);

    apply(
        &config,
        &quota,
        &ledger,
        &pool,
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    assert_eq!(selection.len(), 3);
    assert_eq!(selection[2].login, "carol");
    assert_eq!(selection[2].source, CandidateSource::NextBest);
}

#[test]
fn test_concentration_without_next_best_is_a_no_op() {
    let config = config(ConfigDocument {
        max_reviewers: Some(3),
        min_percent_authorship_for_extra_reviewer: Some(50),
        ..ConfigDocument::default()
    });
    let quota = quota(3, 1);
    let ledger = ledger_with_authors(5);
    let pool = vec![blame_candidate("bob", 10, 0.9)];
    let mut selection = vec![blame_candidate("bob", 10, 0.9)];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    eligibility.select("bob");
    let mut rng = StdRng::seed_from_u64(7);

    apply(
        &config,
        &quota,
        &ledger,
        &pool,
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    assert_eq!(selection.len(), 1);
}

#[test]
fn test_below_concentration_threshold_is_a_no_op() {
    let config = config(ConfigDocument {
        max_reviewers: Some(3),
        min_percent_authorship_for_extra_reviewer: Some(80),
        ..ConfigDocument::default()
    });
    let quota = quota(3, 1);
    let ledger = ledger_with_authors(5);
    let pool = vec![
        blame_candidate("bob", 10, 0.5),
        blame_candidate("carol", 2, 0.1),
    ];
    let mut selection = vec![blame_candidate("bob", 10, 0.5)];
    let mut eligibility = EligibilityFilter::new(&config, "author", &[], []);
    eligibility.select("bob");
    let mut rng = StdRng::seed_from_u64(7);

    apply(
        &config,
        &quota,
        &ledger,
        &pool,
        &mut selection,
        &mut eligibility,
        1000,
        &mut rng,
    );

    assert_eq!(selection.len(), 1);
    assert_eq!(selection[0].login, "bob");
}
