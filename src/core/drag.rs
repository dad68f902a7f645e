//! Moving and resizing the selected client with the mouse.
//!
//! While a drag is active the pointer is grabbed and events are routed through [handle_event]
//! rather than the normal handlers: anything that is not needed to keep the display current is
//! put aside and replayed once the button is released.
use crate::{
    core::{handle, ClientId, State},
    pure::geometry::{Point, Rect},
    x::{CursorShape, XConn, XEvent},
    Result,
};
use tracing::{debug, trace};

/// Motion events closer together than this (in milliseconds) are dropped
const MOTION_INTERVAL_MS: u32 = 1000 / 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragKind {
    Move,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Drag {
    pub(crate) kind: DragKind,
    pub(crate) id: ClientId,
    /// Pointer position when the drag started
    pub(crate) start: Point,
    /// Client geometry when the drag started
    pub(crate) orig: Rect,
    pub(crate) last_motion: u32,
}

impl State {
    /// Grab the pointer and begin moving or resizing the selected client
    pub(crate) fn start_drag<X: XConn>(&mut self, kind: DragKind, x: &X) -> Result<()> {
        let id = match self.sel() {
            Some(id) if !self.clients[id].is_fullscreen => id,
            _ => return Ok(()),
        };

        self.restack(self.selmon, x)?;

        let shape = match kind {
            DragKind::Move => CursorShape::Move,
            DragKind::Resize => CursorShape::Resize,
        };
        if !x.grab_pointer(shape)? {
            debug!("unable to grab pointer for drag");
            return Ok(());
        }

        let c = &self.clients[id];
        let start = match kind {
            DragKind::Move => x.cursor_position()?,
            DragKind::Resize => {
                x.warp_pointer(c.win, c.r.w + c.bw - 1, c.r.h + c.bw - 1)?;
                Point::new(c.r.x + c.r.w + c.bw - 1, c.r.y + c.r.h + c.bw - 1)
            }
        };

        debug!(win = %c.win, ?kind, "starting drag");
        self.drag = Some(Drag {
            kind,
            id,
            start,
            orig: c.r,
            last_motion: 0,
        });

        Ok(())
    }

    fn drag_motion<X: XConn>(&mut self, mut drag: Drag, abs: Point, time: u32, x: &X) -> Result<()> {
        if throttled(drag.last_motion, time) {
            return Ok(());
        }
        drag.last_motion = time;
        self.drag = Some(drag);

        let id = drag.id;
        let c = match self.clients.get(id) {
            Some(c) => c,
            None => return Ok(()),
        };

        let snap = self.config.snap;
        let work = self.monitors[self.selmon].work;
        let arranged = self.is_arranged(self.selmon);

        let r = match drag.kind {
            DragKind::Move => {
                let mut nx = drag.orig.x + (abs.x - drag.start.x);
                let mut ny = drag.orig.y + (abs.y - drag.start.y);
                let (w, h) = (c.outer_width(), c.outer_height());

                if (work.x - nx).abs() < snap {
                    nx = work.x;
                } else if (work.right() - (nx + w)).abs() < snap {
                    nx = work.right() - w;
                }
                if (work.y - ny).abs() < snap {
                    ny = work.y;
                } else if (work.bottom() - (ny + h)).abs() < snap {
                    ny = work.bottom() - h;
                }

                let pulled = (nx - c.r.x).abs() > snap || (ny - c.r.y).abs() > snap;
                if !c.is_floating && arranged && pulled {
                    self.toggle_floating(x)?;
                }

                Rect::new(nx, ny, self.clients[id].r.w, self.clients[id].r.h)
            }

            DragKind::Resize => {
                let nw = (abs.x - drag.orig.x - 2 * c.bw + 1).max(1);
                let nh = (abs.y - drag.orig.y - 2 * c.bw + 1).max(1);
                let cw = self.monitors[c.mon].work;

                let within = cw.x + nw >= work.x
                    && cw.x + nw <= work.right()
                    && cw.y + nh >= work.y
                    && cw.y + nh <= work.bottom();
                let pulled = (nw - c.r.w).abs() > snap || (nh - c.r.h).abs() > snap;
                if within && !c.is_floating && arranged && pulled {
                    self.toggle_floating(x)?;
                }

                let c = &self.clients[id];
                Rect::new(c.r.x, c.r.y, nw, nh)
            }
        };

        if !arranged || self.clients[id].is_floating {
            trace!(?r, "dragging client");
            let bw = self.clients[id].bw;
            self.resize(id, r, bw, true, x)?;
        }

        Ok(())
    }

    fn end_drag<X: XConn>(&mut self, drag: Drag, x: &X) -> Result<()> {
        self.drag = None;

        let c = match self.clients.get(drag.id) {
            Some(c) => c,
            None => return x.ungrab_pointer(),
        };

        if drag.kind == DragKind::Resize {
            x.warp_pointer(c.win, c.r.w + c.bw - 1, c.r.h + c.bw - 1)?;
        }
        x.ungrab_pointer()?;

        if drag.kind == DragKind::Resize {
            // crossings caused by the final warp
            self.deferred.retain(|e| !matches!(e, XEvent::Enter(_)));
            x.discard_enter_events()?;
        }

        let m = self.rect_to_mon(self.clients[drag.id].r);
        debug!(?drag.kind, monitor = m, "drag finished");
        if m != self.selmon {
            self.send_mon(drag.id, m, x)?;
            self.selmon = m;
            self.focus(None, x)?;
        }

        Ok(())
    }
}

fn throttled(last: u32, now: u32) -> bool {
    now.wrapping_sub(last) <= MOTION_INTERVAL_MS
}

/// Process an event while a drag is in progress
pub(crate) fn handle_event<X>(event: XEvent, state: &mut State, x: &X) -> Result<()>
where
    X: XConn,
{
    let drag = match state.drag {
        Some(drag) => drag,
        None => return handle::dispatch(event, state, x),
    };

    match event {
        XEvent::Motion(e) => state.drag_motion(drag, e.abs, e.time, x),
        XEvent::ButtonRelease(_) => state.end_drag(drag, x),
        XEvent::ButtonPress(_) => Ok(()),
        e @ (XEvent::ConfigureRequest(_) | XEvent::Expose(_) | XEvent::MapRequest(_)) => {
            handle::dispatch(e, state, x)
        }
        e => {
            state.deferred.push_back(e);
            Ok(())
        }
    }
}
