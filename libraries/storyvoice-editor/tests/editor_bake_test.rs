//! Editor bake flow
//!
//! Open a page, pick an effect, bake, and check what happens to the page's
//! audio, the live graph and the notices in success, failure and stale cases.


use storyvoice_audio::effects::{OfflineRenderer, ParameterSnapshot, RoutingCategory};
use storyvoice_audio::graph::FilterKind;
use storyvoice_editor::{
    AssetSource, AudioAsset, BakeStatus, EditorError, NoticeLevel, Page, StaticFetcher,
};
use test_helpers::{editor, narration};

const PAGE_1: &str = "/media/tts/page_1.wav";
const PAGE_2: &str = "/media/tts/page_2.wav";

fn two_pages() -> (Vec<Page>, StaticFetcher) {
    let pages = vec![
        Page::with_audio(AudioAsset::url(PAGE_1)),
        Page::with_audio(AudioAsset::url(PAGE_2)),
    ];
    let fetcher = StaticFetcher::new()
        .with_asset(PAGE_1, narration(0.5, 22_050, 1))
        .with_asset(PAGE_2, narration(0.25, 22_050, 2));
    (pages, fetcher)
}

#[tokio::test]
async fn bake_replaces_page_audio() {
    let (pages, fetcher) = two_pages();
    let (mut view, notices) = editor(pages, fetcher);

    view.open_page(0).await.unwrap();
    view.select_effect("cave");
    assert_eq!(view.bake().await, BakeStatus::Applied);

    let asset = view.pages()[0].audio.clone().unwrap();
    assert_eq!(asset.file_name.as_deref(), Some("page_1_filtered.wav"));
    assert_eq!(asset.mime_type.as_deref(), Some("audio/wav"));
    let AssetSource::Bytes(bytes) = &asset.source else {
        panic!("baked audio should be held in memory");
    };
    assert_eq!(bytes.len(), 44 + 11_025 * 2);
    assert_eq!(&bytes[..4], b"RIFF");

    let notices = notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);

    // Other pages are untouched
    assert_eq!(view.pages()[1].audio, Some(AudioAsset::url(PAGE_2)));
}

#[tokio::test]
async fn baked_bytes_match_a_direct_bounce() {
    let (pages, fetcher) = two_pages();
    let (mut view, _notices) = editor(pages, fetcher);

    view.open_page(1).await.unwrap();
    view.select_effect("hyperpop");
    view.set_master_volume(0.8);
    assert_eq!(view.bake().await, BakeStatus::Applied);

    let expected = OfflineRenderer::default()
        .bounce(
            narration(0.25, 22_050, 2),
            Some("wav"),
            &ParameterSnapshot::for_effect("hyperpop").with_master_volume(0.8),
        )
        .unwrap();
    let AssetSource::Bytes(bytes) = &view.pages()[1].audio.as_ref().unwrap().source else {
        panic!("baked audio should be held in memory");
    };
    assert_eq!(&bytes[..], expected.as_slice());
}

#[tokio::test]
async fn live_engine_plays_baked_audio_after_bake() {
    let (pages, fetcher) = two_pages();
    let (mut view, _notices) = editor(pages, fetcher);

    view.open_page(0).await.unwrap();
    view.select_effect("echo");
    view.bake().await;

    let engine = view.engine_mut();
    assert_eq!(engine.media_id(), Some("page-1"));
    assert_eq!(engine.voice().unwrap().oscillator_count(), 1);

    let mut block = vec![0.0; 20_000];
    assert_eq!(engine.render(&mut block), 11_025);
}

#[tokio::test]
async fn undecodable_audio_fails_and_leaves_asset_untouched() {
    let pages = vec![Page::with_audio(AudioAsset::url(PAGE_1))];
    let fetcher = StaticFetcher::new().with_asset(PAGE_1, b"<html>oops</html>".repeat(40));
    let (mut view, notices) = editor(pages, fetcher);

    assert!(view.open_page(0).await.is_err());
    assert!(!view.engine().is_attached());
    assert_eq!(notices.drain()[0].level, NoticeLevel::Error);

    view.select_effect("robot");
    assert_eq!(view.bake().await, BakeStatus::Failed);
    assert_eq!(view.pages()[0].audio, Some(AudioAsset::url(PAGE_1)));

    let notices = notices.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn missing_asset_fails_bake() {
    let (pages, _) = two_pages();
    let fetcher = StaticFetcher::new().with_asset(PAGE_2, narration(0.1, 8_000, 1));
    let (mut view, notices) = editor(pages, fetcher);

    assert!(matches!(view.open_page(0).await, Err(EditorError::Fetch(_))));
    notices.drain();

    assert_eq!(view.bake().await, BakeStatus::Failed);
    assert_eq!(view.pages()[0].audio, Some(AudioAsset::url(PAGE_1)));
    assert_eq!(notices.drain()[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn page_without_audio_is_a_silent_attach_and_a_failed_bake() {
    let pages = vec![Page::silent()];
    let (mut view, notices) = editor(pages, StaticFetcher::new());

    view.open_page(0).await.unwrap();
    assert!(!view.engine().is_attached());
    assert!(notices.drain().is_empty());

    assert!(matches!(view.begin_bake(), Err(EditorError::NoAudio(1))));
    assert_eq!(view.bake().await, BakeStatus::Failed);
    assert_eq!(notices.drain().len(), 2);
}

#[tokio::test]
async fn bake_without_open_page_fails() {
    let (pages, fetcher) = two_pages();
    let (view, notices) = editor(pages, fetcher);

    assert!(matches!(view.begin_bake(), Err(EditorError::NoPageOpen)));
    assert_eq!(notices.drain()[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn result_for_a_page_no_longer_open_is_discarded() {
    let (pages, fetcher) = two_pages();
    let (mut view, notices) = editor(pages, fetcher);

    view.open_page(0).await.unwrap();
    view.select_effect("ghost");
    let job = view.begin_bake().unwrap();

    view.open_page(1).await.unwrap();
    let outcome = job.run().await;
    assert!(outcome.result().is_ok());

    assert_eq!(view.complete_bake(outcome), BakeStatus::Discarded);
    assert_eq!(view.pages()[0].audio, Some(AudioAsset::url(PAGE_1)));
    assert!(notices.drain().is_empty());
}

#[tokio::test]
async fn reopening_the_same_page_discards_older_jobs() {
    let (pages, fetcher) = two_pages();
    let (mut view, _notices) = editor(pages, fetcher);

    view.open_page(0).await.unwrap();
    let job = view.begin_bake().unwrap();
    view.open_page(0).await.unwrap();

    assert_eq!(view.complete_bake(job.run().await), BakeStatus::Discarded);
}

#[tokio::test]
async fn close_invalidates_in_flight_jobs() {
    let pages = vec![Page::with_audio(AudioAsset::url(PAGE_1))];
    let fetcher = StaticFetcher::new().with_asset(PAGE_1, b"garbage".repeat(10));
    let (mut view, notices) = editor(pages, fetcher);

    let _ = view.open_page(0).await;
    notices.drain();
    let job = view.begin_bake().unwrap();
    view.close();

    let outcome = job.run().await;
    assert!(outcome.result().is_err());
    assert_eq!(view.complete_bake(outcome), BakeStatus::Discarded);
    assert!(notices.drain().is_empty(), "stale failures stay silent");
    assert_eq!(view.current_page(), None);
}

#[tokio::test]
async fn selection_and_controls_reach_the_live_graph() {
    let (pages, fetcher) = two_pages();
    let (mut view, _notices) = editor(pages, fetcher);

    view.select_effect("robot");
    view.open_page(0).await.unwrap();
    assert_eq!(
        view.engine().voice().unwrap().category(),
        RoutingCategory::TremoloOnly
    );

    view.select_effect("demon");
    view.set_filter_kind(FilterKind::Peaking);
    view.set_frequency(1_234.0);
    view.set_q(2.0);
    view.set_gain(-3.0);

    let voice = view.engine().voice().unwrap();
    let filter = voice.graph().filter(voice.nodes().filter).unwrap().settings();
    assert_eq!(filter.kind, FilterKind::Peaking);
    assert_eq!(filter.frequency, 1_234.0);
    assert_eq!(filter.q, 2.0);
    assert_eq!(filter.gain_db, -3.0);
    assert_eq!(voice.category(), ParameterSnapshot::for_effect("demon").category());
    assert_eq!(view.session().active_effect(), "demon");
}

#[tokio::test]
async fn reselecting_an_effect_keeps_one_graph() {
    let (pages, fetcher) = two_pages();
    let (mut view, _notices) = editor(pages, fetcher);
    view.open_page(0).await.unwrap();

    view.select_effect("portal");
    let once = view.engine().voice().unwrap().connections();
    view.select_effect("portal");

    let voice = view.engine().voice().unwrap();
    assert_eq!(voice.connections(), once);
    assert_eq!(voice.oscillator_count(), 1);
}

#[tokio::test]
async fn out_of_range_page() {
    let (pages, fetcher) = two_pages();
    let (mut view, _notices) = editor(pages, fetcher);

    assert!(matches!(
        view.open_page(5).await,
        Err(EditorError::PageOutOfRange { index: 5, count: 2 })
    ));
}
