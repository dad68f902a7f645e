//! Rendering [BarInfo] into one bar window per monitor using core X fonts
use crate::{
    core::{bar::BarInfo, bindings::Click},
    x11rb::Result,
    Color, Xid,
};
use std::{cell::RefCell, collections::HashMap};
use tracing::debug;
use x11rb::{
    connection::Connection,
    protocol::xproto::{
        AtomEnum, BackPixmap, ChangeGCAux, ConfigureWindowAux, ConnectionExt as _, CreateGCAux,
        CreateWindowAux, EventMask, Font as FontId, Gcontext, PropMode, Rectangle, StackMode,
        Window, WindowClass,
    },
    wrapper::ConnectionExt as _,
};

const FONT_NAME: &[u8] = b"fixed";
const MAX_TEXT_LEN: usize = 255;

#[derive(Debug)]
struct Font {
    id: FontId,
    ascent: i32,
    descent: i32,
    first_char: u16,
    widths: Vec<i32>,
    default_width: i32,
}

impl Font {
    fn open(conn: &impl Connection) -> Result<Self> {
        let id = conn.generate_id()?;
        conn.open_font(id, FONT_NAME)?;
        let info = conn.query_font(id)?.reply()?;

        Ok(Self {
            id,
            ascent: info.font_ascent as i32,
            descent: info.font_descent as i32,
            first_char: info.min_char_or_byte2,
            widths: info
                .char_infos
                .iter()
                .map(|c| c.character_width as i32)
                .collect(),
            default_width: info.max_bounds.character_width as i32,
        })
    }

    fn height(&self) -> i32 {
        self.ascent + self.descent
    }

    fn width(&self, text: &[u8]) -> i32 {
        text.iter()
            .map(|&b| {
                (b as u16)
                    .checked_sub(self.first_char)
                    .and_then(|i| self.widths.get(i as usize))
                    .copied()
                    .unwrap_or(self.default_width)
            })
            .sum()
    }

    // Width of a text segment with its padding
    fn segment_width(&self, text: &[u8]) -> i32 {
        self.width(text) + self.height()
    }
}

// Core fonts only cover latin-1
fn encode(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(c as u32).unwrap_or(b'?'))
        .take(MAX_TEXT_LEN)
        .collect()
}

/// Where each clickable region of a rendered bar ends
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Regions {
    tag_ends: Vec<i32>,
    layout_end: i32,
    status_start: i32,
}

impl Regions {
    /// The region of the bar under a given x offset
    pub(crate) fn click_at(&self, x: i32) -> (Click, Option<usize>) {
        if let Some(i) = self.tag_ends.iter().position(|&end| x < end) {
            (Click::TagBar, Some(i))
        } else if x < self.layout_end {
            (Click::LtSymbol, None)
        } else if x >= self.status_start {
            (Click::StatusText, None)
        } else {
            (Click::WinTitle, None)
        }
    }
}

#[derive(Debug)]
struct BarWindow {
    win: Window,
    r: crate::pure::geometry::Rect,
    regions: Regions,
}

#[derive(Debug)]
pub(crate) struct Bars {
    font: Font,
    gc: Gcontext,
    root: Window,
    depth: u8,
    visual: u32,
    cursor: u32,
    windows: RefCell<HashMap<usize, BarWindow>>,
}

struct Painter<'a, C> {
    conn: &'a C,
    font: &'a Font,
    gc: Gcontext,
    pixmap: u32,
    h: i32,
}

impl<'a, C: Connection> Painter<'a, C> {
    fn colors(&self, fg: Color, bg: Color) -> Result<()> {
        let aux = ChangeGCAux::new()
            .foreground(fg.rgb_u32())
            .background(bg.rgb_u32());
        self.conn.change_gc(self.gc, &aux)?;

        Ok(())
    }

    fn rect(&self, x: i32, y: i32, w: i32, h: i32, color: Color, filled: bool) -> Result<()> {
        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().foreground(color.rgb_u32()))?;
        let r = Rectangle {
            x: x as i16,
            y: y as i16,
            width: w.max(1) as u16,
            height: h.max(1) as u16,
        };

        if filled {
            self.conn.poly_fill_rectangle(self.pixmap, self.gc, &[r])?;
        } else {
            let r = Rectangle {
                width: r.width.saturating_sub(1),
                height: r.height.saturating_sub(1),
                ..r
            };
            self.conn.poly_rectangle(self.pixmap, self.gc, &[r])?;
        }

        Ok(())
    }

    fn text(&self, x: i32, w: i32, pad: i32, text: &[u8], fg: Color, bg: Color) -> Result<()> {
        self.rect(x, 0, w, self.h, bg, true)?;

        let mut t = text;
        while !t.is_empty() && self.font.width(t) > w - pad {
            t = &t[..t.len() - 1];
        }
        if t.is_empty() {
            return Ok(());
        }

        self.colors(fg, bg)?;
        let y = (self.h - self.font.height()) / 2 + self.font.ascent;
        self.conn
            .image_text8(self.pixmap, self.gc, (x + pad / 2) as i16, y as i16, t)?;

        Ok(())
    }
}

impl Bars {
    pub(crate) fn new(
        conn: &impl Connection,
        screen_num: usize,
        cursor: u32,
    ) -> Result<Self> {
        let screen = &conn.setup().roots[screen_num];
        let (root, depth, visual) = (screen.root, screen.root_depth, screen.root_visual);
        let font = Font::open(conn)?;

        let gc = conn.generate_id()?;
        let aux = CreateGCAux::new().font(font.id).graphics_exposures(0);
        conn.create_gc(gc, root, &aux)?;

        Ok(Self {
            font,
            gc,
            root,
            depth,
            visual,
            cursor,
            windows: RefCell::new(HashMap::new()),
        })
    }

    pub(crate) fn window(&self, monitor: usize) -> Option<Xid> {
        self.windows.borrow().get(&monitor).map(|b| Xid(b.win))
    }

    /// The monitor owning a bar window along with the region under `x`
    pub(crate) fn click(&self, win: Window, x: i32) -> Option<(usize, Click, Option<usize>)> {
        self.windows
            .borrow()
            .iter()
            .find(|(_, b)| b.win == win)
            .map(|(&m, b)| {
                let (click, tag) = b.regions.click_at(x);
                (m, click, tag)
            })
    }

    fn ensure_window(&self, conn: &impl Connection, info: &BarInfo) -> Result<Window> {
        let mut windows = self.windows.borrow_mut();
        let r = info.r;

        if let Some(b) = windows.get_mut(&info.monitor) {
            if b.r != r {
                let aux = ConfigureWindowAux::new()
                    .x(r.x)
                    .y(r.y)
                    .width(r.w.max(1) as u32)
                    .height(r.h.max(1) as u32);
                conn.configure_window(b.win, &aux)?;
                b.r = r;
            }
            return Ok(b.win);
        }

        let win = conn.generate_id()?;
        let aux = CreateWindowAux::new()
            .override_redirect(1)
            .background_pixmap(BackPixmap::PARENT_RELATIVE)
            .event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE)
            .cursor(self.cursor);

        conn.create_window(
            self.depth,
            win,
            self.root,
            r.x as i16,
            r.y as i16,
            r.w.max(1) as u16,
            r.h.max(1) as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            self.visual,
            &aux,
        )?;
        conn.change_property8(
            PropMode::REPLACE,
            win,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            b"tagwm\0tagwm\0",
        )?;
        conn.map_window(win)?;
        conn.configure_window(win, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))?;
        debug!(monitor = info.monitor, %win, "created bar window");

        windows.insert(
            info.monitor,
            BarWindow {
                win,
                r,
                regions: Regions::default(),
            },
        );

        Ok(win)
    }

    pub(crate) fn draw(&self, conn: &impl Connection, info: &BarInfo) -> Result<()> {
        let win = self.ensure_window(conn, info)?;
        if !info.visible {
            return Ok(());
        }

        let (ww, bh) = (info.r.w.max(1), info.r.h.max(1));
        let pixmap = conn.generate_id()?;
        conn.create_pixmap(self.depth, pixmap, win, ww as u16, bh as u16)?;

        let p = Painter {
            conn,
            font: &self.font,
            gc: self.gc,
            pixmap,
            h: bh,
        };
        let regions = self.paint(&p, info, ww)?;

        conn.copy_area(pixmap, win, self.gc, 0, 0, 0, 0, ww as u16, bh as u16)?;
        conn.free_pixmap(pixmap)?;

        if let Some(b) = self.windows.borrow_mut().get_mut(&info.monitor) {
            b.regions = regions;
        }

        Ok(())
    }

    fn paint<C: Connection>(&self, p: &Painter<'_, C>, info: &BarInfo, ww: i32) -> Result<Regions> {
        let c = &info.colors;
        let lrpad = self.font.height();
        let boxs = self.font.height() / 9;
        let boxw = self.font.height() / 6 + 2;

        p.rect(0, 0, ww, p.h, c.normal_bg, true)?;

        // status is right aligned and only shown on the selected monitor
        let mut tw = 0;
        if let Some(status) = &info.status {
            let text = encode(status);
            tw = self.font.width(&text) + 2;
            p.text(ww - tw, tw, 0, &text, c.normal_fg, c.normal_bg)?;
        }

        let mut x = 0;
        let mut tag_ends = Vec::with_capacity(info.tags.len());
        for tag in info.tags.iter() {
            let text = encode(&tag.name);
            let w = self.font.segment_width(&text);
            let (mut fg, mut bg) = if tag.selected {
                (c.selected_fg, c.selected_bg)
            } else {
                (c.normal_fg, c.normal_bg)
            };
            if tag.urgent {
                std::mem::swap(&mut fg, &mut bg);
            }

            p.text(x, w, lrpad, &text, fg, bg)?;
            if tag.occupied {
                p.rect(x + boxs, boxs, boxw, boxw, fg, tag.focused)?;
            }

            x += w;
            tag_ends.push(x);
        }

        let text = encode(&info.layout_symbol);
        let w = self.font.segment_width(&text);
        p.text(x, w, lrpad, &text, c.normal_fg, c.normal_bg)?;
        x += w;
        let layout_end = x;

        let w = ww - tw - x;
        if w > p.h {
            match &info.title {
                Some(title) => {
                    let (fg, bg) = if info.is_selected {
                        (c.selected_fg, c.selected_bg)
                    } else {
                        (c.normal_fg, c.normal_bg)
                    };
                    p.text(x, w, lrpad, &encode(&title.text), fg, bg)?;
                    if title.floating {
                        p.rect(x + boxs, boxs, boxw, boxw, fg, title.fixed)?;
                    }
                }
                None => p.rect(x, 0, w, p.h, c.normal_bg, true)?,
            }
        }

        Ok(Regions {
            tag_ends,
            layout_end,
            status_start: ww - tw,
        })
    }

    pub(crate) fn remove(&self, conn: &impl Connection, monitor: usize) -> Result<()> {
        if let Some(b) = self.windows.borrow_mut().remove(&monitor) {
            debug!(monitor, win = b.win, "removing bar window");
            conn.unmap_window(b.win)?;
            conn.destroy_window(b.win)?;
        }

        Ok(())
    }

    pub(crate) fn free(&self, conn: &impl Connection) -> Result<()> {
        let monitors: Vec<usize> = self.windows.borrow().keys().copied().collect();
        for m in monitors {
            self.remove(conn, m)?;
        }
        conn.free_gc(self.gc)?;
        conn.close_font(self.font.id)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn regions() -> Regions {
        Regions {
            tag_ends: vec![20, 40, 60],
            layout_end: 90,
            status_start: 300,
        }
    }

    #[test_case(0, Click::TagBar, Some(0); "first tag")]
    #[test_case(20, Click::TagBar, Some(1); "tag boundary")]
    #[test_case(59, Click::TagBar, Some(2); "last tag")]
    #[test_case(60, Click::LtSymbol, None; "layout symbol")]
    #[test_case(150, Click::WinTitle, None; "title")]
    #[test_case(300, Click::StatusText, None; "status")]
    #[test]
    fn click_regions(x: i32, click: Click, tag: Option<usize>) {
        assert_eq!(regions().click_at(x), (click, tag));
    }

    #[test]
    fn text_outside_latin1_is_replaced() {
        assert_eq!(encode("a→b"), b"a?b".to_vec());
    }
}
