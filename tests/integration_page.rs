use heromedia::carousel::Carousel;
use heromedia::page::media::SimulatedMedia;
use heromedia::page::styling::RecordingStyling;
use heromedia::page::{MediaSource, NoopPage, PageApi, StylingSurface};
use heromedia::stability::{stabilization_plan, LayoutShiftMonitor, RegionTarget, ShiftEntry};
use heromedia::taxonomy::{classify_device, classify_page, DeviceType, PageCategory};
use heromedia::{ReadinessLevel, Viewport};

#[test]
fn noop_page_surfaces_are_usable() {
    let p = NoopPage::new();
    let media = p.media();
    media.begin_load("https://example.com/hero.mp4");
    assert_eq!(media.readiness(), ReadinessLevel::NOTHING);
    assert!(media.attempt_playback().is_ok());

    let styling = p.styling();
    styling.show_fallback();
    styling.mark_error();
    assert!(p.analytics().is_none());
}

#[test]
fn simulated_media_readiness_is_scriptable() {
    let m = SimulatedMedia::new();
    m.set_readiness(ReadinessLevel::FUTURE_DATA);
    assert_eq!(m.readiness(), ReadinessLevel::FUTURE_DATA);
}

#[test]
fn recording_styling_starts_with_fallback_only() {
    let s = RecordingStyling::new();
    assert!(s.fallback_visible());
    assert!(!s.media_visible());
    assert!(!s.error_marked());
}

#[test]
fn stabilization_plan_covers_the_hero() {
    let plan = stabilization_plan(Viewport::default());
    assert!(plan.iter().any(|p| p.target == RegionTarget::Hero));
    assert!(plan.iter().any(|p| p.target == RegionTarget::VideoContainer));
}

#[test]
fn shift_monitor_smoke() {
    let mut m = LayoutShiftMonitor::new();
    assert!(m
        .observe(ShiftEntry {
            value: 0.3,
            had_recent_input: false
        })
        .is_some());
}

#[test]
fn taxonomy_smoke() {
    assert_eq!(classify_device("Mozilla/5.0 (X11; Linux x86_64)"), DeviceType::Desktop);
    assert_eq!(classify_page("/contact.html"), PageCategory::Contact);
}

#[test]
fn carousel_smoke() {
    let mut c = Carousel::new(5);
    c.next();
    c.goto(3);
    assert_eq!(c.current(), 3);
}
