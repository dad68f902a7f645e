//! Stack navigation, monitors, pointer handling and mouse drags through a recording connection
use simple_test_case::test_case;
use tagwm::{
    core::{
        actions::Action,
        bindings::{ModMask, MouseButton},
    },
    pure::{
        geometry::{Point, Rect},
        StackPosition,
    },
    x::{
        event::{ButtonEvent, ConfigureRequest, MotionEvent},
        XEvent,
    },
    WindowManager, Xid,
};

mod common;

use common::{
    map_window, window_order, wm_with_screens, Call, RecordingXConn, Window, ROOT, SCREEN,
};

type Wm = WindowManager<RecordingXConn>;

const LEFT: Rect = Rect::new(0, 0, 1000, 600);
const RIGHT: Rect = Rect::new(1000, 0, 1000, 600);

fn geometry(wm: &Wm, id: u32) -> Rect {
    wm.state()
        .client_for(Xid(id))
        .map(|c| c.geometry())
        .expect("managed client")
}

fn centre(r: Rect) -> Point {
    Point::new(r.x + r.w / 2, r.y + r.h / 2)
}

fn button(id: Xid, abs: Point) -> ButtonEvent {
    ButtonEvent {
        id,
        button: MouseButton::Left,
        state: ModMask::empty(),
        abs,
    }
}

fn motion(wm: &mut Wm, abs: Point, time: u32) {
    wm.handle_xevent(XEvent::Motion(MotionEvent {
        id: ROOT,
        abs,
        time,
    }))
    .unwrap();
}

fn release(wm: &mut Wm, abs: Point) {
    wm.handle_xevent(XEvent::ButtonRelease(button(ROOT, abs)))
        .unwrap();
}

fn last_position(wm: &Wm, id: u32) -> Option<Rect> {
    wm.conn().calls().into_iter().rev().find_map(|c| match c {
        Call::Position(win, r) if win == Xid(id) => Some(r),
        _ => None,
    })
}

fn with_clients(ids: &[u32]) -> Wm {
    let mut wm = wm_with_screens(vec![SCREEN]);
    for &id in ids {
        map_window(&mut wm, id, Window::new("xterm"));
    }

    wm
}

fn request(id: u32) -> ConfigureRequest {
    ConfigureRequest {
        id: Xid(id),
        x: None,
        y: None,
        w: None,
        h: None,
        border: None,
        sibling: None,
        stack_mode: None,
    }
}

#[test]
fn focus_stack_wraps_and_returns_to_the_previous_client() {
    let mut wm = with_clients(&[10, 20, 30]);
    assert_eq!(window_order(&wm, 0), vec![10, 30, 20]);
    assert_eq!(wm.state().focused_client(), Some(Xid(30)));

    let steps = [
        (StackPosition::Relative(1), 20),
        (StackPosition::Relative(1), 10),
        (StackPosition::Relative(-1), 20),
        (StackPosition::PreviousSelection, 10),
        (StackPosition::PreviousSelection, 20),
        (StackPosition::Absolute(0), 10),
        (StackPosition::FromEnd(1), 20),
        (StackPosition::Absolute(7), 20),
    ];

    for (pos, expected) in steps {
        wm.run_action(Action::FocusStack(pos)).unwrap();
        assert_eq!(wm.state().focused_client(), Some(Xid(expected)), "{pos:?}");
    }
}

#[test]
fn focus_stack_skips_clients_on_hidden_tags() {
    let mut wm = with_clients(&[10, 20, 30]);
    wm.run_action(Action::Tag(1 << 1)).unwrap();
    assert_eq!(wm.state().focused_client(), Some(Xid(20)));

    wm.run_action(Action::FocusStack(StackPosition::Relative(1)))
        .unwrap();
    assert_eq!(wm.state().focused_client(), Some(Xid(10)));

    wm.run_action(Action::FocusStack(StackPosition::Relative(1)))
        .unwrap();
    assert_eq!(wm.state().focused_client(), Some(Xid(20)));
}

// Mapping 10, 20, 30, 40 gives [10, 40, 30, 20] with 40 focused and 30 focused before it
#[test_case(StackPosition::Absolute(0), vec![40, 10, 30, 20]; "absolute head")]
#[test_case(StackPosition::Absolute(2), vec![10, 30, 40, 20]; "absolute index")]
#[test_case(StackPosition::FromEnd(1), vec![10, 30, 20, 40]; "last")]
#[test_case(StackPosition::Relative(1), vec![10, 30, 40, 20]; "one down")]
#[test_case(StackPosition::Relative(-1), vec![40, 10, 30, 20]; "one up")]
#[test_case(StackPosition::Relative(3), vec![40, 10, 30, 20]; "down and around")]
#[test_case(StackPosition::PreviousSelection, vec![10, 30, 40, 20]; "previous selection")]
#[test]
fn push_stack_moves_only_the_focused_client(pos: StackPosition, expected: Vec<u32>) {
    let mut wm = with_clients(&[10, 20, 30, 40]);
    assert_eq!(window_order(&wm, 0), vec![10, 40, 30, 20]);

    wm.run_action(Action::PushStack(pos)).unwrap();
    let order = window_order(&wm, 0);
    let others: Vec<u32> = order.iter().copied().filter(|&id| id != 40).collect();

    assert_eq!(order, expected);
    assert_eq!(others, vec![10, 30, 20]);
    assert_eq!(wm.state().focused_client(), Some(Xid(40)));
}

#[test]
fn tag_mon_moves_the_client_into_the_destination_stack_area() {
    let mut wm = wm_with_screens(vec![LEFT, RIGHT]);

    wm.run_action(Action::FocusMon(1)).unwrap();
    wm.run_action(Action::View(1 << 2)).unwrap();
    map_window(&mut wm, 30, Window::new("xterm"));
    wm.run_action(Action::FocusMon(1)).unwrap();
    assert_eq!(wm.state().selected_monitor(), 0);

    map_window(&mut wm, 10, Window::new("xterm"));
    map_window(&mut wm, 20, Window::new("xterm"));
    assert_eq!(wm.state().focused_client(), Some(Xid(20)));

    wm.run_action(Action::TagMon(1)).unwrap();

    let s = wm.state();
    let moved = s.client_for(Xid(20)).unwrap();
    assert_eq!(moved.monitor(), 1);
    assert_eq!(moved.tags(), 1 << 2);
    assert_eq!(window_order(&wm, 1), vec![30, 20]);
    assert_eq!(window_order(&wm, 0), vec![10]);

    assert_eq!(s.selected_monitor(), 0);
    assert_eq!(s.focused_client(), Some(Xid(10)));
    assert_eq!(s.monitors()[0].selected(), s.client_id(Xid(10)));
    assert!(!s.monitors()[0].focus_stack().contains(&s.client_id(Xid(20)).unwrap()));
}

#[test]
fn tag_mon_with_a_single_monitor_does_nothing() {
    let mut wm = with_clients(&[10]);
    wm.run_action(Action::TagMon(1)).unwrap();

    assert_eq!(wm.state().client_for(Xid(10)).unwrap().monitor(), 0);
    assert_eq!(wm.state().focused_client(), Some(Xid(10)));
}

#[test]
fn configure_requests_from_unmanaged_windows_are_forwarded() {
    let mut wm = with_clients(&[10]);
    wm.conn().clear_calls();

    wm.handle_xevent(XEvent::ConfigureRequest(request(99)))
        .unwrap();

    assert_eq!(wm.conn().calls(), vec![Call::Forward(Xid(99))]);
}

#[test]
fn configure_requests_from_tiled_clients_are_only_acknowledged() {
    let mut wm = with_clients(&[10, 20]);
    let before = geometry(&wm, 10);
    wm.conn().clear_calls();

    wm.handle_xevent(XEvent::ConfigureRequest(ConfigureRequest {
        x: Some(5),
        y: Some(5),
        w: Some(10),
        h: Some(10),
        ..request(10)
    }))
    .unwrap();

    assert_eq!(geometry(&wm, 10), before);
    assert_eq!(wm.conn().calls(), vec![Call::ConfigureNotify(Xid(10), before)]);
}

#[test]
fn configure_requests_from_floating_clients_are_honoured() {
    let mut wm = with_clients(&[10]);
    wm.run_action(Action::ToggleFloating).unwrap();
    wm.conn().clear_calls();

    let r = Rect::new(50, 60, 200, 100);
    wm.handle_xevent(XEvent::ConfigureRequest(ConfigureRequest {
        x: Some(r.x),
        y: Some(r.y),
        w: Some(r.w),
        h: Some(r.h),
        ..request(10)
    }))
    .unwrap();

    assert_eq!(geometry(&wm, 10), r);
    assert!(wm.conn().calls().contains(&Call::Position(Xid(10), r)));

    wm.conn().clear_calls();
    wm.handle_xevent(XEvent::ConfigureRequest(ConfigureRequest {
        x: Some(70),
        ..request(10)
    }))
    .unwrap();

    let moved = Rect::new(70, 60, 200, 100);
    assert_eq!(geometry(&wm, 10), moved);
    assert!(wm
        .conn()
        .calls()
        .contains(&Call::ConfigureNotify(Xid(10), moved)));
}

#[test]
fn floating_clients_overflowing_the_monitor_are_recentred() {
    let mut wm = with_clients(&[10]);
    wm.run_action(Action::ToggleFloating).unwrap();
    let bw = wm.state().client_for(Xid(10)).unwrap().border();

    wm.handle_xevent(XEvent::ConfigureRequest(ConfigureRequest {
        x: Some(600),
        y: Some(60),
        w: Some(600),
        h: Some(100),
        ..request(10)
    }))
    .unwrap();

    let expected_x = SCREEN.w / 2 - (600 + 2 * bw) / 2;
    assert_eq!(geometry(&wm, 10), Rect::new(expected_x, 60, 600, 100));
}

#[test]
fn moving_a_floating_client_near_an_edge_snaps_to_it() {
    let mut wm = with_clients(&[10]);
    wm.run_action(Action::ToggleFloating).unwrap();
    let g = geometry(&wm, 10);
    let work = wm.state().monitors()[0].work_area();

    wm.conn().set_pointer(g.x + 20, g.y + 20);
    wm.run_action(Action::MoveMouse).unwrap();
    let start = wm.conn().pointer();

    // within the snap distance of the left edge
    motion(&mut wm, Point::new(start.x + 5, start.y), 100);
    let snapped = geometry(&wm, 10);
    assert_eq!((snapped.x, snapped.y), (work.x, work.y));

    // well clear of the left and right edges
    motion(&mut wm, Point::new(start.x + 100, start.y), 200);
    assert_eq!(geometry(&wm, 10).x, g.x + 100);

    release(&mut wm, Point::new(start.x + 100, start.y));
    assert!(wm.state().client_for(Xid(10)).unwrap().is_floating());
}

#[test]
fn dragging_a_tiled_client_past_the_snap_distance_floats_it() {
    let mut wm = with_clients(&[10, 20]);
    let g = geometry(&wm, 20);

    wm.conn().set_pointer(g.x + 10, g.y + 10);
    wm.run_action(Action::MoveMouse).unwrap();
    let start = wm.conn().pointer();

    motion(&mut wm, Point::new(start.x - 5, start.y), 100);
    assert!(!wm.state().client_for(Xid(20)).unwrap().is_floating());
    assert_eq!(geometry(&wm, 20), g);

    motion(&mut wm, Point::new(start.x - 100, start.y), 200);
    assert!(wm.state().client_for(Xid(20)).unwrap().is_floating());
    assert_eq!(geometry(&wm, 20).x, g.x - 100);

    release(&mut wm, Point::new(start.x - 100, start.y));
    assert_eq!(wm.state().client_for(Xid(20)).unwrap().monitor(), 0);
}

#[test]
fn motion_events_arriving_too_quickly_are_dropped() {
    let mut wm = with_clients(&[10]);
    wm.run_action(Action::ToggleFloating).unwrap();
    let g = geometry(&wm, 10);

    wm.conn().set_pointer(g.x + 20, g.y + 20);
    wm.run_action(Action::MoveMouse).unwrap();
    let start = wm.conn().pointer();

    motion(&mut wm, Point::new(start.x + 100, start.y), 100);
    motion(&mut wm, Point::new(start.x + 200, start.y), 105);

    assert_eq!(geometry(&wm, 10).x, g.x + 100);
}

#[test]
fn releasing_a_drag_over_another_monitor_moves_the_client_there() {
    let mut wm = wm_with_screens(vec![LEFT, RIGHT]);
    map_window(&mut wm, 10, Window::new("xterm"));
    wm.run_action(Action::ToggleFloating).unwrap();
    let g = geometry(&wm, 10);

    wm.conn().set_pointer(g.x + 20, g.y + 20);
    wm.run_action(Action::MoveMouse).unwrap();
    let start = wm.conn().pointer();

    let end = Point::new(start.x + 1000, start.y);
    motion(&mut wm, end, 100);
    release(&mut wm, end);

    let s = wm.state();
    let c = s.client_for(Xid(10)).unwrap();
    assert_eq!(c.monitor(), 1);
    assert_eq!(c.tags(), s.monitors()[1].tags());
    assert_eq!(s.selected_monitor(), 1);
    assert_eq!(s.focused_client(), Some(Xid(10)));
    assert_eq!(window_order(&wm, 0), Vec::<u32>::new());
    assert_eq!(window_order(&wm, 1), vec![10]);
}

#[test]
fn resizing_follows_the_pointer_from_the_bottom_right_corner() {
    let mut wm = with_clients(&[10]);
    wm.run_action(Action::ToggleFloating).unwrap();
    let g = geometry(&wm, 10);
    let bw = wm.state().client_for(Xid(10)).unwrap().border();

    wm.conn().clear_calls();
    wm.run_action(Action::ResizeMouse).unwrap();
    assert!(wm.conn().calls().contains(&Call::Warp(Xid(10))));
    assert_eq!(
        wm.conn().pointer(),
        Point::new(g.x + g.w + bw - 1, g.y + g.h + bw - 1)
    );

    let end = Point::new(g.x + 400, g.y + 300);
    motion(&mut wm, end, 100);
    release(&mut wm, end);

    let r = geometry(&wm, 10);
    assert_eq!((r.x, r.y), (g.x, g.y));
    assert_eq!((r.w, r.h), (400 - 2 * bw + 1, 300 - 2 * bw + 1));
}

#[test]
fn sticky_clients_stay_visible_across_tag_changes() {
    let mut wm = with_clients(&[10, 20]);
    assert_eq!(wm.state().focused_client(), Some(Xid(20)));

    wm.run_action(Action::ToggleSticky).unwrap();
    assert!(wm.state().client_for(Xid(20)).unwrap().is_sticky());

    wm.run_action(Action::View(1 << 1)).unwrap();
    assert_eq!(wm.state().focused_client(), Some(Xid(20)));
    assert!(last_position(&wm, 10).unwrap().x < 0);
    assert!(last_position(&wm, 20).unwrap().x >= 0);

    wm.run_action(Action::ToggleSticky).unwrap();
    assert!(!wm.state().client_for(Xid(20)).unwrap().is_sticky());
    assert!(last_position(&wm, 20).unwrap().x < 0);
}

#[derive(Debug, Clone, Copy)]
enum Pointer {
    OverClient,
    OverClientBorder,
    OverBar,
    TopEdge,
    Elsewhere,
}

#[test_case(Pointer::OverClient, false; "over the client")]
#[test_case(Pointer::OverClientBorder, false; "over the client border")]
#[test_case(Pointer::OverBar, false; "over the bar")]
#[test_case(Pointer::TopEdge, false; "at the top edge")]
#[test_case(Pointer::Elsewhere, true; "over another client")]
#[test]
fn clicking_a_client_only_warps_a_pointer_that_is_out_of_place(at: Pointer, warps: bool) {
    let mut wm = with_clients(&[10, 20, 30]);
    let g = geometry(&wm, 10);
    let other = geometry(&wm, 20);
    let bh = wm.state().config().bar_height;

    let p = match at {
        Pointer::OverClient => Point::new(g.x + 5, g.y + 5),
        Pointer::OverClientBorder => Point::new(g.x, g.y + g.h),
        Pointer::OverBar => Point::new(other.x + 5, bh / 2),
        Pointer::TopEdge => Point::new(other.x + 5, 0),
        Pointer::Elsewhere => Point::new(other.x + 5, other.y + 5),
    };
    wm.conn().set_pointer(p.x, p.y);
    wm.conn().clear_calls();

    wm.handle_xevent(XEvent::ButtonPress(button(Xid(10), p)))
        .unwrap();

    assert_eq!(wm.state().focused_client(), Some(Xid(10)));
    assert_eq!(wm.conn().calls().contains(&Call::Warp(Xid(10))), warps);
    let expected = if warps { centre(g) } else { p };
    assert_eq!(wm.conn().pointer(), expected);
}

#[test]
fn focusing_an_empty_monitor_warps_to_its_centre() {
    let mut wm = wm_with_screens(vec![LEFT, RIGHT]);
    wm.conn().set_pointer(10, 300);
    wm.conn().clear_calls();

    wm.run_action(Action::FocusMon(1)).unwrap();

    let work = wm.state().monitors()[1].work_area();
    assert_eq!(wm.state().selected_monitor(), 1);
    assert!(wm.conn().calls().contains(&Call::Warp(ROOT)));
    assert_eq!(wm.conn().pointer(), centre(work));
}

#[test]
fn focusing_a_monitor_warps_to_its_selected_client() {
    let mut wm = wm_with_screens(vec![LEFT, RIGHT]);
    map_window(&mut wm, 10, Window::new("xterm"));
    wm.run_action(Action::FocusMon(1)).unwrap();
    wm.conn().set_pointer(1500, 300);

    wm.run_action(Action::FocusMon(1)).unwrap();

    assert_eq!(wm.state().selected_monitor(), 0);
    assert_eq!(wm.state().focused_client(), Some(Xid(10)));
    assert_eq!(wm.conn().pointer(), centre(geometry(&wm, 10)));
}

#[test]
fn huge_nmaster_increments_saturate() {
    let mut wm = with_clients(&[10, 20]);
    wm.conn().set_root_name("fsignal:incnmaster i 2147483647");
    wm.handle_xevent(XEvent::PropertyNotify(tagwm::x::event::PropertyEvent {
        id: ROOT,
        atom: tagwm::x::Atom::WmName,
        deleted: false,
        is_root: true,
    }))
    .unwrap();
    assert_eq!(wm.state().monitors()[0].nmaster(), i32::MAX as usize);

    wm.run_action(Action::IncNmaster(1)).unwrap();
    assert_eq!(wm.state().monitors()[0].nmaster(), i32::MAX as usize);

    wm.run_action(Action::IncNmaster(i32::MIN)).unwrap();
    assert_eq!(wm.state().monitors()[0].nmaster(), 0);
}

#[test]
fn huge_gap_increments_are_capped_by_the_work_area() {
    let mut wm = with_clients(&[10, 20]);
    wm.run_action(Action::IncGaps(i32::MAX)).unwrap();

    let m = &wm.state().monitors()[0];
    let (gaps, work) = (m.gaps(), m.work_area());
    assert!(gaps.outer_h <= work.h && gaps.inner_h <= work.h);
    assert!(gaps.outer_v <= work.w && gaps.inner_v <= work.w);

    wm.run_action(Action::IncGaps(i32::MIN)).unwrap();
    assert!(!wm.state().monitors()[0].gaps().any());
}
