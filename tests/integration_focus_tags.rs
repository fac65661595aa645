use scroll_wm::config::Config;
use scroll_wm::drivers::{WindowAttributes, WmEvent};
use scroll_wm::geometry::{Geometry, Screen};
use scroll_wm::keybindings::{ButtonBindings, KeyBindings, keysyms, modifiers};
use scroll_wm::window::{Request, WindowManager};

fn wm() -> WindowManager {
    let config = Config {
        animations: false,
        ..Config::default()
    };
    WindowManager::new(
        config,
        KeyBindings::defaults(5),
        ButtonBindings::defaults(),
        Screen::new(1000, 800),
        20,
    )
}

fn map(wm: &mut WindowManager, window: u32, x: i32, y: i32) {
    wm.handle_event(WmEvent::MapRequest {
        window,
        attributes: Some(WindowAttributes {
            x,
            y,
            width: 200,
            height: 100,
            override_redirect: false,
        }),
        title: None,
    });
}

fn key(wm: &mut WindowManager, keysym: u32, state: u16) {
    wm.handle_event(WmEvent::KeyPress { keysym, state });
}

#[test]
fn destroying_the_focused_client_moves_focus_to_its_successor() {
    let mut wm = wm();
    map(&mut wm, 1, 100, 100);
    map(&mut wm, 2, 150, 100);
    map(&mut wm, 3, 200, 100);
    assert_eq!(wm.clients().order(), &[3, 2, 1]);
    assert_eq!(wm.focus(), Some(3));

    wm.handle_event(WmEvent::Destroy { window: 3 });
    assert_eq!(wm.focus(), Some(2));
    wm.handle_event(WmEvent::Destroy { window: 1 });
    assert_eq!(wm.focus(), Some(2));
    wm.handle_event(WmEvent::Destroy { window: 2 });
    assert_eq!(wm.focus(), None);
}

#[test]
fn onscreen_cycle_skips_far_away_clients() {
    let mut wm = wm();
    map(&mut wm, 2, 5000, 100);
    map(&mut wm, 1, 100, 100);
    assert_eq!(wm.focus(), Some(1));

    key(&mut wm, letter('s'), modifiers::MOD4);
    assert_eq!(wm.focus(), Some(1));

    key(&mut wm, keysyms::TAB, modifiers::MOD4);
    assert_eq!(wm.focus(), Some(2));
    let far = wm.clients().get(2).unwrap().geometry;
    assert_eq!((far.x, far.y), (4.0, 24.0));
    let near = wm.clients().get(1).unwrap().geometry;
    assert_eq!((near.x, near.y), (100.0 - 4996.0, 24.0));
}

#[test]
fn same_tags_cycle_stays_within_shared_tags() {
    let mut wm = wm();
    map(&mut wm, 1, 100, 100);
    key(&mut wm, keysyms::digit(2), modifiers::MOD4);
    map(&mut wm, 2, 150, 100);
    key(&mut wm, keysyms::digit(1), modifiers::MOD4);
    assert_eq!(wm.focus(), Some(1));
    map(&mut wm, 3, 200, 100);

    key(&mut wm, letter('t'), modifiers::MOD4);
    assert_eq!(wm.focus(), Some(1));
    key(&mut wm, letter('t'), modifiers::MOD4);
    assert_eq!(wm.focus(), Some(3));
}

#[test]
fn same_tags_cycle_from_a_single_tag_client_reaches_the_shared_one() {
    let mut wm = wm();
    // A{1}
    map(&mut wm, 1, 100, 100);
    // B{1,2}
    map(&mut wm, 2, 150, 100);
    key(&mut wm, keysyms::digit(2), modifiers::MOD4 | modifiers::SHIFT);
    // C{2}
    key(&mut wm, keysyms::digit(2), modifiers::MOD4);
    map(&mut wm, 3, 200, 100);
    key(&mut wm, keysyms::digit(1), modifiers::MOD4);
    assert_eq!(wm.clients().order(), &[3, 2, 1]);
    assert!(wm.clients().get(2).unwrap().tags.contains(1));
    assert!(!wm.clients().get(3).unwrap().tags.contains(0));

    for _ in 0..3 {
        if wm.focus() == Some(1) {
            break;
        }
        key(&mut wm, letter('t'), modifiers::MOD4);
    }
    assert_eq!(wm.focus(), Some(1));
    key(&mut wm, letter('t'), modifiers::MOD4);
    assert_eq!(wm.focus(), Some(2));
}

#[test]
fn isolate_hides_other_tags_from_the_visible_cycle() {
    let mut wm = wm();
    map(&mut wm, 1, 100, 100);
    key(&mut wm, keysyms::digit(2), modifiers::MOD4);
    map(&mut wm, 2, 150, 100);
    map(&mut wm, 3, 200, 100);
    key(&mut wm, letter('o'), modifiers::MOD4);
    assert!(wm.tags().hidden().contains(0));
    assert!(!wm.tags().hidden().contains(1));

    for _ in 0..4 {
        key(&mut wm, keysyms::TAB, modifiers::MOD4);
        assert_ne!(wm.focus(), Some(1));
    }
    let requests = wm.take_requests();
    assert!(requests.contains(&Request::Move(1, 1002, 0)));
}

#[test]
fn toggling_a_tag_on_the_focused_client() {
    let mut wm = wm();
    map(&mut wm, 1, 100, 100);
    key(&mut wm, keysyms::digit(3), modifiers::MOD4 | modifiers::SHIFT);
    let tags = wm.clients().get(1).unwrap().tags;
    assert!(tags.contains(0) && tags.contains(2));
    key(&mut wm, keysyms::digit(1), modifiers::MOD4 | modifiers::SHIFT);
    assert!(!wm.clients().get(1).unwrap().tags.contains(0));
}

#[test]
fn monocle_fills_the_area_below_the_bar() {
    let mut wm = wm();
    map(&mut wm, 1, 100, 100);
    key(&mut wm, letter('m'), modifiers::MOD4);
    assert_eq!(
        wm.clients().get(1).unwrap().geometry,
        Geometry::new(4.0, 24.0, 990.0, 770.0)
    );

    key(&mut wm, letter('b'), modifiers::MOD4 | modifiers::SHIFT);
    key(&mut wm, letter('m'), modifiers::MOD4);
    assert_eq!(
        wm.clients().get(1).unwrap().geometry,
        Geometry::new(4.0, 4.0, 990.0, 790.0)
    );
}

#[test]
fn tiling_leaves_hidden_clients_alone() {
    let mut wm = wm();
    map(&mut wm, 1, 100, 100);
    key(&mut wm, letter('h'), modifiers::MOD4);
    key(&mut wm, keysyms::digit(2), modifiers::MOD4);
    map(&mut wm, 2, 150, 100);
    map(&mut wm, 3, 200, 100);
    let parked = wm.clients().get(1).unwrap().geometry;

    for layout in ['w', 'b', 'r', 'f'] {
        key(&mut wm, letter(layout), modifiers::MOD4);
        assert_eq!(wm.clients().get(1).unwrap().geometry, parked);
        for window in [2, 3] {
            let g = wm.clients().get(window).unwrap().geometry;
            assert!(g.y >= 24.0, "{layout}: {g:?}");
            assert!(g.y + g.h <= 800.0, "{layout}: {g:?}");
        }
    }
}

fn letter(c: char) -> u32 {
    keysyms::letter(c as u8)
}
