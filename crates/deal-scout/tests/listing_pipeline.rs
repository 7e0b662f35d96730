use chrono::{NaiveDate, TimeZone, Utc};
use deal_scout::config::load_criteria_or_standard;
use deal_scout::workflows::acquisition::{
    render_markdown, summary_line, AbsenteeLikelihood, Bucket, CandidateFilter,
    CandidateRepository, CsvCandidateStore, DailyReport, ListingId, RunOptions, RunState,
    ScoutService,
};
use deal_scout::workflows::intake::{
    read_listings, FileListingSource, ListingFormat, ListingSource,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/minnesota_listings.csv")
}

fn scratch_dir(name: &str) -> PathBuf {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    std::env::temp_dir().join(format!(
        "deal-scout-{name}-{}-{nanos}",
        std::process::id()
    ))
}

#[test]
fn exported_listings_flow_through_scoring_storage_and_report() {
    let dir = scratch_dir("pipeline");
    let store = Arc::new(CsvCandidateStore::new(dir.join("candidates.csv")));
    let criteria = load_criteria_or_standard(None).expect("standard criteria");
    let service = ScoutService::new(store.clone(), criteria);
    let mut state = RunState::load(dir.join("state.json")).expect("missing state is empty");

    let source = FileListingSource::new(fixture()).expect("csv extension recognized");
    assert_eq!(source.format(), ListingFormat::Csv);
    let raw = source.load().expect("fixture loads");
    assert_eq!(raw.len(), 5);

    let seen_at = Utc
        .with_ymd_and_hms(2026, 10, 17, 7, 0, 0)
        .single()
        .expect("valid timestamp");
    let outcome = service
        .process(raw.clone(), &mut state, RunOptions::default(), seen_at)
        .expect("run succeeds");

    assert_eq!(outcome.fetched, 5);
    assert_eq!(outcome.new, 4);
    assert_eq!(outcome.counts.shortlist, 1);
    assert_eq!(outcome.counts.review, 1);
    assert_eq!(outcome.counts.auto_reject, 2);
    assert_eq!(
        summary_line(outcome.fetched, outcome.new, &outcome.counts),
        "Done. 5 fetched, 4 new. 2 AUTO-REJECT, 1 REVIEW, 1 SHORTLIST"
    );

    let liquor = store
        .fetch(&ListingId::from("53001"))
        .expect("store readable")
        .expect("liquor store persisted");
    assert_eq!(liquor.bucket, Bucket::AutoReject);
    assert_eq!(liquor.reasons, vec!["regulated: liquor"]);
    assert_eq!(liquor.absentee, AbsenteeLikelihood::Likely);

    let hvac = store
        .fetch(&ListingId::from("48812"))
        .expect("store readable")
        .expect("hvac persisted");
    assert_eq!(hvac.score, 81);
    assert_eq!(hvac.reason_for_selling, "Retirement");
    assert_eq!(hvac.last_seen, Some(seen_at));

    state.save(dir.join("state.json")).expect("state saves");
    let mut reloaded = RunState::load(dir.join("state.json")).expect("state reloads");
    assert_eq!(reloaded.seen_ids().len(), 4);

    let repeat = service
        .process(raw, &mut reloaded, RunOptions::default(), seen_at)
        .expect("repeat run succeeds");
    assert_eq!(repeat.new, 0);
    assert_eq!(store.all().expect("store readable").len(), 4);

    let date = NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date");
    let markdown = render_markdown(&DailyReport::build(&outcome.records, date));
    assert!(markdown.contains("New listings processed: **4**"));
    assert!(markdown.contains("## AUTO-REJECTED (2)"));

    let listing = service
        .candidates(&CandidateFilter::default())
        .expect("candidates listed");
    assert_eq!(listing.totals.total, 4);
    assert_eq!(listing.totals.filtered, 2);
    assert_eq!(listing.candidates[0].id.as_str(), "48812");

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn json_exports_score_the_same_as_csv() {
    let json = r#"[
        {
            "id": " 48812 ",
            "title": "HVAC Service Company",
            "industry": "Service",
            "location": "Minneapolis, Minnesota",
            "asking_price_text": "$500,000",
            "cash_flow_text": "$150,000",
            "revenue_text": "$900,000",
            "employees_full_time": "6",
            "employees_part_time": "2",
            "description": "Turnkey HVAC business with recurring maintenance agreement customers. No website; all word of mouth referrals.",
            "absentee_owner": "   "
        }
    ]"#;
    let from_json = read_listings(json.as_bytes(), ListingFormat::Json).expect("json parses");
    assert_eq!(from_json[0].id, "48812");
    assert_eq!(from_json[0].absentee_owner, None);

    let from_csv = FileListingSource::new(fixture())
        .expect("csv extension recognized")
        .load()
        .expect("fixture loads");

    let dir = scratch_dir("json");
    let store = Arc::new(CsvCandidateStore::new(dir.join("candidates.csv")));
    let service = ScoutService::new(
        store,
        load_criteria_or_standard(None).expect("standard criteria"),
    );
    let json_scored = service.score_batch(from_json);
    let csv_scored = service.score_batch(from_csv);

    assert_eq!(json_scored[0].score, csv_scored[0].score);
    assert_eq!(json_scored[0].reasons, csv_scored[0].reasons);
}

#[test]
fn shipped_criteria_file_drives_the_same_scores() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../criteria.toml");
    let shipped =
        load_criteria_or_standard(Some(path.as_path())).expect("shipped criteria load");
    let standard = load_criteria_or_standard(None).expect("standard criteria");
    assert_eq!(shipped, standard);
}

#[test]
fn unknown_extensions_are_rejected_up_front() {
    let error = FileListingSource::new("listings.xlsx").expect_err("xlsx is not supported");
    assert!(error.to_string().contains("listings.xlsx"));
}
