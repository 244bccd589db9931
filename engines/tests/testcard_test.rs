use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use zpaceway_core::engine::{Engine, EngineError};
use zpaceway_core::frame::Frame;
use zpaceway_engines::registry;
use zpaceway_engines::testcard::{
    self, DISPLAY_HEIGHT, DISPLAY_WIDTH, FRAME_DURATION, MAX_CATCH_UP_FRAMES, TestCard,
};

fn cartridge(title: &str) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x134..0x134 + title.len()].copy_from_slice(title.as_bytes());
    rom[0x14D] = testcard::header_checksum(&rom).unwrap();
    rom
}

fn running_card() -> TestCard {
    let mut card = TestCard::new();
    card.load_game(&cartridge("TESTCARD")).unwrap();
    card.run();
    card
}

/// Register a sink that records the size of every delivered frame.
fn record_frames(card: &mut TestCard) -> Rc<RefCell<Vec<(u32, u32)>>> {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink_frames = Rc::clone(&frames);
    card.on_frame_finished(Box::new(move |frame: &Frame<'_>| {
        sink_frames.borrow_mut().push(frame.size());
    }));
    frames
}

// =================================================================
// Registry
// =================================================================

#[test]
fn test_registered_under_its_name() {
    let entry = registry::find("testcard").expect("testcard is registered");
    let engine = (entry.create)();
    assert_eq!(engine.display_size(), (160, 144));
    assert!(!engine.is_running());
    assert!(registry::all().iter().any(|e| e.name == "testcard"));
}

#[test]
fn test_unknown_engine_not_found() {
    assert!(registry::find("no-such-engine").is_none());
}

// =================================================================
// Loading
// =================================================================

#[test]
fn test_load_reads_title() {
    let mut card = TestCard::new();
    card.load_game(&cartridge("ZPACEWAY")).unwrap();
    assert_eq!(card.title(), Some("ZPACEWAY"));
}

#[test]
fn test_load_rejects_truncated_image() {
    let mut card = TestCard::new();
    let err = card.load_game(&[0u8; 0x100]).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRom(_)));
    assert_eq!(card.title(), None);
}

#[test]
fn test_header_checksum_needs_a_full_header() {
    assert_eq!(testcard::header_checksum(&[0u8; 0x100]), None);
    assert_eq!(testcard::header_checksum(&[0u8; 0x14C]), None);
    // 25 zero bytes each subtract one.
    assert_eq!(testcard::header_checksum(&[0u8; 0x14D]), Some(0u8.wrapping_sub(25)));
}

#[test]
fn test_load_rejects_bad_header_checksum() {
    let mut rom = cartridge("ZPACEWAY");
    rom[0x14D] = rom[0x14D].wrapping_add(1);
    let err = TestCard::new().load_game(&rom).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRom(_)));
}

#[test]
fn test_load_rejects_colour_only_cartridge() {
    let mut rom = cartridge("ZPACEWAY");
    rom[0x143] = 0xC0;
    rom[0x14D] = testcard::header_checksum(&rom).unwrap();
    let err = TestCard::new().load_game(&rom).unwrap_err();
    assert!(matches!(err, EngineError::Unsupported(_)));
}

// =================================================================
// Scheduling
// =================================================================

#[test]
fn test_no_frames_before_run() {
    let mut card = TestCard::new();
    card.load_game(&cartridge("TESTCARD")).unwrap();
    let frames = record_frames(&mut card);
    card.service(FRAME_DURATION * 3).unwrap();
    assert!(frames.borrow().is_empty());
}

#[test]
fn test_run_without_game_reports_not_loaded() {
    let mut card = TestCard::new();
    card.run();
    assert!(matches!(
        card.service(FRAME_DURATION),
        Err(EngineError::NotLoaded)
    ));
}

#[test]
fn test_one_frame_per_frame_duration() {
    let mut card = running_card();
    let frames = record_frames(&mut card);

    card.service(FRAME_DURATION / 2).unwrap();
    assert_eq!(frames.borrow().len(), 0);
    card.service(FRAME_DURATION / 2 + Duration::from_nanos(1)).unwrap();
    assert_eq!(frames.borrow().len(), 1);
    card.service(FRAME_DURATION * 2).unwrap();
    assert_eq!(frames.borrow().len(), 3);

    assert!(
        frames
            .borrow()
            .iter()
            .all(|&size| size == (DISPLAY_WIDTH, DISPLAY_HEIGHT))
    );
    assert_eq!(card.frame_count(), 3);
}

#[test]
fn test_catch_up_is_bounded() {
    let mut card = running_card();
    let frames = record_frames(&mut card);
    card.service(Duration::from_secs(2)).unwrap();
    assert_eq!(frames.borrow().len(), MAX_CATCH_UP_FRAMES as usize);

    // The stall is forgotten rather than replayed.
    card.service(Duration::ZERO).unwrap();
    assert_eq!(frames.borrow().len(), MAX_CATCH_UP_FRAMES as usize);
}

#[test]
fn test_stop_halts_delivery() {
    let mut card = running_card();
    let frames = record_frames(&mut card);
    card.service(FRAME_DURATION).unwrap();
    card.stop();
    card.stop();
    card.service(FRAME_DURATION * 3).unwrap();
    assert_eq!(frames.borrow().len(), 1);
    assert!(!card.is_running());
}

#[test]
fn test_replaced_sink_receives_subsequent_frames() {
    let mut card = running_card();
    let first = record_frames(&mut card);
    card.service(FRAME_DURATION).unwrap();
    let second = record_frames(&mut card);
    card.service(FRAME_DURATION).unwrap();
    assert_eq!(first.borrow().len(), 1);
    assert_eq!(second.borrow().len(), 1);

    card.clear_frame_sink();
    card.service(FRAME_DURATION).unwrap();
    assert_eq!(second.borrow().len(), 1);
}

// =================================================================
// Input and audio
// =================================================================

#[test]
fn test_input_visible_on_next_frame() {
    let mut card = running_card();
    let (x, y) = card.cursor();

    card.input().right = true;
    card.input().down = true;
    card.service(FRAME_DURATION).unwrap();
    assert_eq!(card.cursor(), (x + 1, y + 1));

    card.input().right = false;
    card.input().down = false;
    card.service(FRAME_DURATION).unwrap();
    assert_eq!(card.cursor(), (x + 1, y + 1));
}

#[test]
fn test_a_button_darkens_cursor() {
    let mut card = running_card();
    let pixel = Rc::new(RefCell::new(None));
    let sink_pixel = Rc::clone(&pixel);
    let (cx, cy) = card.cursor();
    card.on_frame_finished(Box::new(move |frame: &Frame<'_>| {
        *sink_pixel.borrow_mut() = frame.pixel(cx, cy);
    }));

    card.input().a = true;
    card.service(FRAME_DURATION).unwrap();
    assert_eq!(*pixel.borrow(), Some([0x08, 0x18, 0x20]));
}

#[test]
fn test_silent_until_sound_enabled() {
    let mut card = running_card();
    card.input().a = true;
    card.service(FRAME_DURATION).unwrap();
    let mut samples = Vec::new();
    card.drain_audio(&mut samples);
    assert!(samples.is_empty());

    card.enable_sound();
    card.service(FRAME_DURATION).unwrap();
    card.drain_audio(&mut samples);
    assert!(!samples.is_empty());
    assert!(samples.iter().any(|&s| s != 0));
    assert_eq!(card.audio_sample_rate(), 44_100);
}
