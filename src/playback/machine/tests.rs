use super::*;
use crate::playback::testing::{advance, machine, playlist, resolve_play};
use std::cell::Cell;
use std::rc::Rc;

fn options() -> PlaybackOptions {
    PlaybackOptions::default()
}

#[test]
fn starts_idle_and_selects_first_item_when_loaded() {
    let mut m = machine(options());
    assert_eq!(m.phase(), Phase::Idle);
    assert!(m.current_item().is_none());

    m.set_playlist(playlist(&["a.jpg", "b.mp4"]));
    assert_eq!(m.phase(), Phase::Ready);
    assert_eq!(m.state().current_index, 0);
    assert!(m.pending_timer().is_none());
}

#[test]
fn next_wraps_around_the_whole_playlist() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.mp4", "c.png", "d.webm"]));
    for start in 0..4 {
        while m.state().current_index != start {
            m.next();
        }
        for _ in 0..4 {
            m.next();
        }
        assert_eq!(m.state().current_index, start);
    }
}

#[test]
fn prev_and_next_cancel_out() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.png", "c.gif"]));
    for _ in 0..3 {
        let index = m.state().current_index;
        m.prev();
        m.next();
        assert_eq!(m.state().current_index, index);
        m.next();
        m.prev();
        assert_eq!(m.state().current_index, index);
        m.next();
    }

    m.prev();
    assert_eq!(m.state().current_index, 2);
}

#[test]
fn switching_items_resets_elapsed_and_playing() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.png", "c.mp4"]));
    m.seek(2.5);
    assert_eq!(m.state().elapsed, 2.5);

    m.next();
    assert_eq!(m.state().current_index, 1);
    assert_eq!(m.state().elapsed, 0.0);
    assert!(!m.state().is_playing);

    // While playing, the next video waits for its play outcome before
    // reporting playback again.
    m.play();
    advance(&mut m, 1.0);
    assert_eq!(m.state().elapsed, 1.0);
    m.next();
    assert_eq!(m.state().current_index, 2);
    assert_eq!(m.state().elapsed, 0.0);
    assert!(!m.state().is_playing);
    assert_eq!(m.video().play_requests.len(), 1);
}

#[test]
fn autoplayed_image_restarts_its_countdown_from_zero() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.png"]));
    m.play();
    advance(&mut m, 3.0);

    m.next();
    assert_eq!(m.state().elapsed, 0.0);
    assert!(m.state().is_playing);
    advance(&mut m, 3.5);
    assert_eq!(m.state().current_index, 1);
    advance(&mut m, 0.5);
    assert_eq!(m.state().current_index, 0);
}

#[test]
fn rapid_next_keeps_a_single_pending_timer() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.png", "c.gif", "d.bmp"]));
    m.play();
    m.next();
    m.next();

    assert_eq!(m.scheduler().pending_count(), 1);
    assert_eq!(m.state().current_index, 2);

    advance(&mut m, 4.0);
    assert_eq!(m.state().current_index, 3);
    assert_eq!(m.scheduler().pending_count(), 1);
}

#[test]
fn image_expiry_advances_exactly_once_into_video() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["imgA.jpg", "vidB.mp4"]));
    m.play();
    assert!(m.state().is_playing);

    advance(&mut m, 3.9);
    assert_eq!(m.state().current_index, 0);

    advance(&mut m, 0.1);
    assert_eq!(m.state().current_index, 1);
    assert_eq!(m.video().play_requests.len(), 1);
    assert!(!m.state().is_playing);
    assert_eq!(m.scheduler().pending_count(), 0);

    m.video_mut().duration = 12.0;
    resolve_play(&mut m, Ok(()));
    assert!(m.state().is_playing);
    assert_eq!(m.state().duration, 12.0);

    // Nothing else fires while the video clock runs.
    advance(&mut m, 3.0);
    assert_eq!(m.state().current_index, 1);
    assert_eq!(m.video().play_requests.len(), 1);
}

#[test]
fn rejected_video_is_skipped() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["imgA.jpg", "vidB.mp4"]));
    m.play();
    advance(&mut m, 4.0);

    resolve_play(&mut m, Err(MediaError::PlayRejected("NotAllowedError".into())));
    assert_eq!(m.state().current_index, 0);
    assert!(m.state().is_playing);
}

#[test]
fn all_rejecting_playlist_stops_skipping() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4", "b.webm", "c.ogg"]));
    m.play();
    for _ in 0..3 {
        resolve_play(&mut m, Err(MediaError::PlayRejected("blocked".into())));
    }
    assert_eq!(m.video().play_requests.len(), 3);
    assert_eq!(m.phase(), Phase::Ready);
    assert!(!m.is_active());

    m.play();
    assert_eq!(m.video().play_requests.len(), 4);
}

#[test]
fn stale_play_outcome_is_ignored() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4", "b.mp4"]));
    m.play();
    let stale = m.video().last_ticket().unwrap();
    m.next();

    m.handle(PlayerEvent::PlayResolved {
        ticket: stale,
        outcome: Err(MediaError::PlayRejected("AbortError".into())),
    });
    assert_eq!(m.state().current_index, 1);
    assert!(m.is_active());
}

#[test]
fn seek_on_image_reschedules_remaining_time() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.jpg"]));
    m.play();
    advance(&mut m, 0.5);

    m.seek(2.5);
    advance(&mut m, 1.4);
    assert_eq!(m.state().current_index, 0);
    advance(&mut m, 0.1);
    assert_eq!(m.state().current_index, 1);
}

#[test]
fn seek_on_paused_image_only_moves_elapsed() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.jpg"]));
    m.seek(9.0);
    assert_eq!(m.state().elapsed, 4.0);
    assert_eq!(m.scheduler().pending_count(), 0);

    m.seek(1.0);
    m.play();
    advance(&mut m, 3.0);
    assert_eq!(m.state().current_index, 1);
}

#[test]
fn seek_on_video_writes_through_and_clamps() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4"]));
    m.video_mut().duration = 30.0;
    m.handle(PlayerEvent::MetadataLoaded);

    m.seek(12.0);
    assert_eq!(m.video().current_time, 12.0);
    assert_eq!(m.state().elapsed, 12.0);

    m.seek(99.0);
    assert_eq!(m.state().elapsed, 30.0);
    m.seek(f64::NAN);
    assert_eq!(m.state().elapsed, 30.0);
}

#[test]
fn pausing_an_image_keeps_partial_progress() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.jpg"]));
    m.play();
    advance(&mut m, 1.5);
    m.pause();

    assert_eq!(m.state().elapsed, 1.5);
    assert_eq!(m.scheduler().pending_count(), 0);
    assert_eq!(m.phase(), Phase::Ready);

    m.pause();
    assert_eq!(m.state().elapsed, 1.5);

    m.play();
    advance(&mut m, 2.5);
    assert_eq!(m.state().current_index, 1);
}

#[test]
fn stop_rewinds_video() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4"]));
    m.play();
    resolve_play(&mut m, Ok(()));
    m.video_mut().current_time = 7.0;
    advance(&mut m, 1.0);
    assert_eq!(m.state().elapsed, 7.0);

    m.stop();
    assert_eq!(m.state().elapsed, 0.0);
    assert_eq!(m.video().current_time, 0.0);
    assert!(!m.state().is_playing);
    assert_eq!(m.scheduler().pending_count(), 0);
}

#[test]
fn ended_video_advances_like_image_expiry() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4", "b.png"]));
    m.play();
    resolve_play(&mut m, Ok(()));

    m.handle(PlayerEvent::MediaEnded);
    assert_eq!(m.state().current_index, 1);
    assert!(m.state().is_playing);
    assert_eq!(m.scheduler().pending_count(), 1);
}

#[test]
fn ended_while_paused_is_ignored() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4", "b.png"]));
    m.handle(PlayerEvent::MediaEnded);
    assert_eq!(m.state().current_index, 0);
}

#[test]
fn autoplay_starts_on_load_and_after_manual_skip() {
    let mut m = machine(PlaybackOptions {
        autoplay: true,
        ..PlaybackOptions::default()
    });
    m.set_playlist(playlist(&["a.jpg", "b.jpg"]));
    assert!(m.state().is_playing);

    m.pause();
    m.next();
    assert!(m.state().is_playing);
}

#[test]
fn manual_skip_without_autoplay_stays_ready() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.jpg"]));
    m.next();
    assert_eq!(m.phase(), Phase::Ready);
    assert_eq!(m.scheduler().pending_count(), 0);
}

#[test]
fn mute_round_trip_restores_volume() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4"]));
    m.set_volume(0.37);

    m.toggle_mute();
    assert!(m.state().is_muted);
    assert!(m.video().muted);
    m.toggle_mute();
    assert!(!m.state().is_muted);
    assert_eq!(m.state().volume, 0.37);
    assert_eq!(m.video().volume, 0.37);
}

#[test]
fn zero_volume_mutes_and_clamps() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4"]));
    m.set_volume(0.0);
    assert!(m.state().is_muted);
    m.set_volume(1.7);
    assert_eq!(m.state().volume, 1.0);
    assert!(!m.state().is_muted);
}

#[test]
fn element_volume_is_source_of_truth() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.mp4"]));
    m.video_mut().volume = 0.2;
    m.video_mut().muted = true;
    m.handle(PlayerEvent::VolumeChanged);
    assert_eq!(m.state().volume, 0.2);
    assert!(m.state().is_muted);
}

#[test]
fn volume_is_applied_to_each_new_video() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg", "b.mp4"]));
    m.set_volume(0.4);
    m.toggle_mute();
    m.next();
    assert_eq!(m.video().volume, 0.4);
    assert!(m.video().muted);
}

#[test]
fn fullscreen_follows_platform_notifications() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg"]));

    let reported = Rc::new(Cell::new(None));
    let sink = reported.clone();
    m.fullscreen_mut()
        .on_change(Box::new(move |active| sink.set(Some(active))));

    m.toggle_full_screen();
    assert_eq!(m.fullscreen_mut().requests, 1);
    assert!(!m.state().is_full_screen);

    m.fullscreen_mut().emit(true);
    let active = reported.get().unwrap();
    m.handle(PlayerEvent::FullscreenChanged(active));
    assert!(m.state().is_full_screen);

    // Esc exits without the player asking.
    m.handle(PlayerEvent::FullscreenChanged(false));
    m.toggle_full_screen();
    assert_eq!(m.fullscreen_mut().requests, 2);
    assert_eq!(m.fullscreen_mut().exits, 0);
}

#[test]
fn denied_fullscreen_leaves_state_alone() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["a.jpg"]));
    m.fullscreen_mut().deny = true;
    m.toggle_full_screen();
    assert!(!m.state().is_full_screen);
}

#[test]
fn empty_playlist_makes_transport_inert() {
    let mut m = machine(options());
    m.play();
    m.pause();
    m.toggle_play();
    m.stop();
    m.next();
    m.prev();
    m.seek(2.0);
    m.set_volume(0.3);
    m.toggle_mute();
    m.toggle_full_screen();
    m.handle(PlayerEvent::MediaEnded);
    m.handle(PlayerEvent::MetadataLoaded);
    advance(&mut m, 10.0);

    let state = m.state();
    assert_eq!(m.phase(), Phase::Idle);
    assert_eq!(state.current_index, 0);
    assert_eq!(state.volume, 1.0);
    assert!(!state.is_muted);
    assert_eq!(m.fullscreen_mut().requests, 0);
    assert!(m.video().play_requests.is_empty());
}

#[test]
fn replacing_the_playlist_resets_and_cancels() {
    let mut m = machine(options());
    let first = playlist(&["a.jpg", "b.jpg", "c.jpg"]);
    m.set_playlist(first.clone());
    m.next();
    m.play();
    advance(&mut m, 1.0);

    m.set_playlist(first);
    assert_eq!(m.state().current_index, 1);

    m.set_playlist(playlist(&["x.png", "y.png"]));
    assert_eq!(m.state().current_index, 0);
    assert_eq!(m.state().elapsed, 0.0);
    assert!(!m.state().is_playing);
    assert_eq!(m.scheduler().pending_count(), 0);

    m.set_playlist(playlist(&[]));
    assert_eq!(m.phase(), Phase::Idle);
}

#[test]
fn unsupported_items_are_inert() {
    let mut m = machine(options());
    m.set_playlist(playlist(&["notes.txt", "a.jpg"]));
    m.play();
    assert!(!m.state().is_playing);
    assert_eq!(m.scheduler().pending_count(), 0);
    m.next();
    assert_eq!(m.state().current_index, 1);
}
