use std::io::{self, Write};

use scroll_wm::config::Config;
use scroll_wm::drivers::headless::HeadlessDriver;
use scroll_wm::drivers::{WindowAttributes, WmEvent};
use scroll_wm::geometry::Screen;
use scroll_wm::keybindings::{ButtonBindings, KeyBindings, keysyms, modifiers};
use scroll_wm::runner;
use scroll_wm::status::StatusFeed;
use scroll_wm::window::{Request, WindowManager};

fn manager(driver: &HeadlessDriver) -> WindowManager {
    use scroll_wm::drivers::WindowSystem;
    WindowManager::new(
        Config::default(),
        KeyBindings::defaults(5),
        ButtonBindings::defaults(),
        driver.screen(),
        driver.bar_height(),
    )
}

fn map_request(window: u32, title: &str) -> WmEvent {
    WmEvent::MapRequest {
        window,
        attributes: Some(WindowAttributes {
            x: 50,
            y: 60,
            width: 300,
            height: 200,
            override_redirect: false,
        }),
        title: Some(title.to_string()),
    }
}

#[test]
fn scripted_session_reaches_the_driver_in_order() {
    let mut driver = HeadlessDriver::new(Screen::new(1280, 1024), 16).with_events([
        map_request(10, "editor"),
        map_request(11, "terminal"),
        WmEvent::KeyPress {
            keysym: keysyms::TAB,
            state: modifiers::MOD4,
        },
        WmEvent::KeyPress {
            keysym: keysyms::letter(b'q'),
            state: modifiers::MOD4,
        },
        WmEvent::Destroy { window: 10 },
    ]);
    let mut wm = manager(&driver);
    runner::run(&mut driver, &mut wm, None).unwrap();

    assert!(wm.is_running());
    assert_eq!(wm.clients().order(), &[11]);
    assert_eq!(wm.focus(), Some(11));

    let applied = driver.take_applied();
    let map_at = applied.iter().position(|r| *r == Request::Map(10)).unwrap();
    let border_at = applied
        .iter()
        .position(|r| *r == Request::SetBorderWidth(10, 1))
        .unwrap();
    assert!(border_at < map_at);
    assert!(applied.contains(&Request::Close(10)));

    let focused_title = applied
        .iter()
        .rev()
        .find_map(|r| match r {
            Request::DrawBar(model) => model.focused.clone(),
            _ => None,
        })
        .unwrap();
    assert_eq!(focused_title.title, "terminal");
    assert_eq!(focused_title.tags, vec!["term".to_string()]);
}

#[test]
fn status_feed_runs_until_end_of_input() {
    let (reader, mut writer) = io::pipe().unwrap();
    writeln!(writer, "{{#00ff00}}cpu 3%{{#ffffff}} | 12:00").unwrap();
    drop(writer);

    let mut driver = HeadlessDriver::new(Screen::new(800, 600), 14);
    let mut wm = manager(&driver);
    runner::run(&mut driver, &mut wm, Some(StatusFeed::from_reader(reader))).unwrap();

    let status = driver
        .applied()
        .iter()
        .rev()
        .find_map(|r| match r {
            Request::DrawBar(model) => Some(model.status.clone()),
            _ => None,
        })
        .unwrap();
    let texts: Vec<&str> = status.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["cpu 3%", " | 12:00"]);
    assert!(driver.flushes() > 0);
}
