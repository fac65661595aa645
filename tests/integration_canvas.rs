use scroll_wm::config::Config;
use scroll_wm::drivers::{WindowAttributes, WmEvent};
use scroll_wm::geometry::Screen;
use scroll_wm::keybindings::{ButtonBindings, KeyBindings, WHEEL_UP, keysyms, modifiers};
use scroll_wm::window::WindowManager;

fn wm_with(config: Config) -> WindowManager {
    let tags = config.tag_count();
    WindowManager::new(
        config,
        KeyBindings::defaults(tags),
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
        title: Some(format!("client {window}")),
    });
}

fn key(wm: &mut WindowManager, keysym: u32, state: u16) {
    wm.handle_event(WmEvent::KeyPress { keysym, state });
}

fn position(wm: &WindowManager, window: u32) -> (f64, f64) {
    let g = wm.clients().get(window).unwrap().geometry;
    (g.x, g.y)
}

fn approx(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
}

#[test]
fn opposite_pans_cancel_out() {
    let mut wm = wm_with(Config::default());
    map(&mut wm, 1, 100, 100);
    let before = position(&wm, 1);
    let home_before = wm.checkpoints().get('2').cloned().unwrap();

    key(&mut wm, keysyms::LEFT, modifiers::MOD4);
    assert_eq!(position(&wm, 1), (300.0, 100.0));
    key(&mut wm, keysyms::RIGHT, modifiers::MOD4);
    key(&mut wm, keysyms::UP, modifiers::MOD4);
    key(&mut wm, keysyms::DOWN, modifiers::MOD4);

    assert_eq!(position(&wm, 1), before);
    assert_eq!(wm.checkpoints().get('2').cloned().unwrap(), home_before);
}

#[test]
fn recalling_home_undoes_pan_and_zoom() {
    let mut wm = wm_with(Config::default());
    map(&mut wm, 1, 200, 150);

    wm.handle_event(WmEvent::ButtonPress {
        window: None,
        button: WHEEL_UP,
        state: modifiers::MOD4 | modifiers::SHIFT,
        root_x: 100,
        root_y: 50,
    });
    assert!(approx(position(&wm, 1), (210.0, 160.0)));
    key(&mut wm, keysyms::RIGHT, modifiers::MOD4);
    assert!(approx(position(&wm, 1), (10.0, 160.0)));

    key(&mut wm, keysyms::digit(0), modifiers::MOD1);
    assert!(approx(position(&wm, 1), (200.0, 150.0)));
    let home = wm.checkpoints().get('0').unwrap();
    assert!(approx((home.x, home.y), (0.0, 0.0)));
    assert!((home.zoom - 1.0).abs() < 1e-9);
}

#[test]
fn default_checkpoints_step_down_one_screen() {
    let mut wm = wm_with(Config {
        animations: false,
        ..Config::default()
    });
    map(&mut wm, 1, 100, 100);
    key(&mut wm, keysyms::digit(3), modifiers::MOD1);
    assert_eq!(position(&wm, 1), (100.0, 100.0 - 1600.0));
    key(&mut wm, keysyms::digit(1), modifiers::MOD1);
    assert_eq!(position(&wm, 1), (100.0, 100.0));
}

#[test]
fn captured_checkpoint_key_sets_and_recalls() {
    let mut wm = wm_with(Config {
        animations: false,
        ..Config::default()
    });
    map(&mut wm, 1, 100, 100);
    key(&mut wm, keysyms::LEFT, modifiers::MOD4);
    key(&mut wm, keysyms::letter(b'c'), modifiers::MOD4 | modifiers::SHIFT);
    assert!(wm.dispatch().awaiting_key());
    key(&mut wm, keysyms::letter(b'x'), modifiers::NONE);
    assert!(!wm.dispatch().awaiting_key());

    key(&mut wm, keysyms::DOWN, modifiers::MOD4);
    key(&mut wm, keysyms::letter(b'c'), modifiers::MOD4);
    key(&mut wm, keysyms::letter(b'x'), modifiers::NONE);
    assert_eq!(position(&wm, 1), (300.0, 100.0));
}

#[test]
fn events_wait_for_the_checkpoint_key() {
    let mut wm = wm_with(Config::default());
    key(&mut wm, keysyms::letter(b'c'), modifiers::MOD4);
    map(&mut wm, 9, 100, 100);
    assert_eq!(wm.deferred_len(), 1);
    assert!(wm.clients().is_empty());

    key(&mut wm, keysyms::digit(1), modifiers::NONE);
    assert_eq!(wm.deferred_len(), 0);
    assert!(wm.clients().contains(9));
}

#[test]
fn sticky_tag_ignores_pan_and_zoom() {
    let mut wm = wm_with(Config {
        animations: false,
        ..Config::default()
    });
    map(&mut wm, 1, 100, 100);
    key(&mut wm, keysyms::digit(2), modifiers::MOD4);
    map(&mut wm, 2, 400, 300);
    key(&mut wm, keysyms::letter(b's'), modifiers::MOD4 | modifiers::SHIFT);

    key(&mut wm, keysyms::LEFT, modifiers::MOD4);
    wm.handle_event(WmEvent::ButtonPress {
        window: None,
        button: WHEEL_UP,
        state: modifiers::MOD4 | modifiers::SHIFT,
        root_x: 0,
        root_y: 0,
    });

    assert_eq!(position(&wm, 2), (400.0, 300.0));
    assert!(approx(position(&wm, 1), (330.0, 110.0)));
}
