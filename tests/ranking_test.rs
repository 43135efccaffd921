mod common;

use assert2::{check, let_assert};
use common::{labour_candidate, part_candidate};
use rstest::rstest;
use workshop_suggest::domains::{labour, parts};
use workshop_suggest::{
    rank_suggestions, score_match, DomainProfile, Normalizer, ScoreStrategy, SuggestionScope,
    SuggestionSource,
};

// --- Normalization ---

/// Test: messy job-sheet text cleans up to its canonical form, and cleaning
/// twice changes nothing.
#[rstest]
fn normalization_cleans_job_sheet_text() {
    let normalizer = Normalizer::new(labour::profile());

    let cleaned = normalizer.normalize_text(" Off-Side Front Brake Pads!! ");
    check!(cleaned == "offside front brake pads");
    check!(normalizer.normalize_text(&cleaned) == cleaned);
}

/// Test: position abbreviations typed on the job sheet match fully spelled
/// out historical lines.
#[rstest]
fn abbreviated_position_queries_match_spelled_out_lines() {
    let normalizer = Normalizer::new(labour::profile());
    let candidates = vec![
        labour_candidate("nsf-pads", "Nearside front brake pads", 4, 1.1),
        labour_candidate("osr-pads", "Offside rear brake pads", 4, 1.1),
    ];

    let ranked = rank_suggestions(
        &normalizer,
        ScoreStrategy::OverlapF1,
        "replace nsf pads",
        &candidates,
        8,
    );

    check!(ranked.len() == 2);
    check!(ranked[0].id == "nsf-pads", "the matching corner ranks first");
    check!(ranked[0].score > ranked[1].score);
}

// --- Ranking ---

/// Test: equal scores fall back to usage count, and the limit drops the
/// weaker-scoring tail no matter how heavily used it is.
#[rstest]
fn equal_scores_fall_back_to_usage_and_limit_drops_the_tail() {
    let normalizer = Normalizer::new(labour::profile());
    let candidates = vec![
        labour_candidate("usage-2", "Front brake pads and discs", 2, 2.0),
        labour_candidate("usage-5", "Front brake pads and discs", 5, 2.0),
        labour_candidate("usage-9", "Front brake hose", 9, 0.8),
    ];

    let ranked = rank_suggestions(
        &normalizer,
        ScoreStrategy::OverlapF1,
        "front brake pads and discs",
        &candidates,
        2,
    );

    check!(ranked.len() == 2);
    check!(ranked[0].id == "usage-5");
    check!(ranked[1].id == "usage-2");
}

/// Test: a capped ranking is always a prefix of the uncapped one.
#[rstest]
fn capped_results_are_a_prefix_of_the_full_ranking() {
    let normalizer = Normalizer::new(labour::profile());
    let candidates = vec![
        labour_candidate("exact", "Front brake pads", 1, 1.2),
        labour_candidate("superset", "Front brake pads and discs", 6, 2.2),
        labour_candidate("other-corner", "Rear brake pads", 9, 1.2),
        labour_candidate("weak", "Brake fluid change", 20, 0.5),
        labour_candidate("unrelated", "Wiper blades", 50, 0.3),
    ];

    let full = rank_suggestions(
        &normalizer,
        ScoreStrategy::OverlapF1,
        "front brake pads",
        &candidates,
        usize::MAX,
    );
    let capped = rank_suggestions(
        &normalizer,
        ScoreStrategy::OverlapF1,
        "front brake pads",
        &candidates,
        2,
    );

    check!(full.len() == 4, "the unrelated line scores zero and drops");
    check!(capped.len() == 2);
    for (got, expected) in capped.iter().zip(full.iter()) {
        check!(got.id == expected.id);
    }
}

/// Test: identical text scores each strategy's maximum, empty text scores
/// exactly zero.
#[rstest]
fn score_match_hits_strategy_maxima_on_identical_text() {
    let labour_normalizer = Normalizer::new(labour::profile());
    let parts_normalizer = Normalizer::new(parts::profile());

    let text = "timing chain";
    check!(score_match(&labour_normalizer, ScoreStrategy::OverlapF1, text, text, &[]) == 1.0);
    check!(score_match(&parts_normalizer, ScoreStrategy::Jaccard, text, text, &[]) == 1.0);

    check!(score_match(&labour_normalizer, ScoreStrategy::OverlapF1, "", "", &[]) == 0.0);
    check!(score_match(&parts_normalizer, ScoreStrategy::Jaccard, "", "", &[]) == 0.0);
}

// --- Parts provenance ---

/// Test: parts ranking prefers this user's learned lines, then workshop-wide
/// ones, then presets, and projection derives the matching reason line.
#[rstest]
fn parts_ranking_orders_by_provenance_and_projects_reasons() {
    let normalizer = Normalizer::new(parts::profile());
    let candidates = vec![
        part_candidate(
            "preset",
            "brake squeal",
            "oe brake pad kit",
            SuggestionSource::Preset,
            None,
        ),
        part_candidate(
            "global",
            "brake squeal",
            "brake pads",
            SuggestionSource::Learned,
            Some(SuggestionScope::Global),
        ),
        part_candidate(
            "user",
            "brake squeal",
            "brake pads front",
            SuggestionSource::Learned,
            Some(SuggestionScope::User),
        ),
    ];

    let ranked = rank_suggestions(
        &normalizer,
        ScoreStrategy::Jaccard,
        "customer reports brake squeal",
        &candidates,
        10,
    );
    let projected = parts::project(&ranked);

    check!(projected.len() == 3);
    check!(projected[0].id == "user");
    check!(projected[0].reason == "used before on your jobs");
    check!(projected[0].query == "brake pads front");
    check!(projected[1].id == "global");
    check!(projected[1].reason == "used across the workshop");
    check!(projected[2].id == "preset");
    check!(projected[2].reason == "preset for this work type");
}

// --- Configuration-driven domains ---

/// Test: a TOML profile is enough to stand up a third domain with its own
/// rewrites and synonyms.
#[rstest]
fn custom_toml_profile_drives_a_third_domain() {
    let profile = DomainProfile::from_toml_str(
        r#"
name = "glass"
min_token_len = 2

stop_words = ["replace", "the"]

[[rewrites]]
find = "wind screen"
replace = "windscreen"

[synonyms]
windscreen = ["screen", "glass"]
chip = ["crack"]
"#,
    )
    .unwrap();
    let normalizer = Normalizer::new(profile);

    let candidates = vec![
        labour_candidate("glass-chip", "Windscreen chip repair", 9, 0.5),
        labour_candidate("wiper", "Wiper blade", 1, 0.2),
    ];
    let ranked = rank_suggestions(
        &normalizer,
        ScoreStrategy::OverlapF1,
        "replace the wind screen chip",
        &candidates,
        8,
    );

    check!(ranked.len() == 1, "the wiper line shares no token");
    let_assert!(Some(top) = ranked.first());
    check!(top.id == "glass-chip");
    check!(top.normalized_key.starts_with("windscreen"));
}

// --- Transport shape ---

/// Test: ranked suggestions serialize flat, with the domain payload inlined
/// beside the shared fields.
#[rstest]
fn ranked_suggestions_serialize_flat_for_transport() {
    let normalizer = Normalizer::new(labour::profile());
    let candidates = vec![labour_candidate("lab-1", "Front brake pads", 3, 1.2)];

    let ranked = rank_suggestions(
        &normalizer,
        ScoreStrategy::OverlapF1,
        "front brake pads",
        &candidates,
        8,
    );
    let value = serde_json::to_value(&ranked[0]).unwrap();

    check!(value["id"] == "lab-1");
    check!(value["source"] == "learned");
    check!(value["scope"] == "user");
    check!(value["display"] == "Front brake pads");
    check!(value["time_hours"] == 1.2);
    check!(value.get("payload").is_none(), "payload fields are flattened");
}
