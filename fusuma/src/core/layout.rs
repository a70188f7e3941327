use super::{ClientId, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Tile,
    Monocle,
    /// The null layout: clients keep whatever geometry they have.
    Floating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub symbol: String,
    pub kind: LayoutKind,
}

impl Layout {
    pub fn new(symbol: &str, kind: LayoutKind) -> Self {
        Self {
            symbol: symbol.to_string(),
            kind,
        }
    }
}

/// Monitor parameters a layout pass works with.
#[derive(Debug, Clone, Copy)]
pub struct ArrangeParams {
    pub area: Rect,
    pub gap: u32,
    pub nmaster: u32,
    pub mfact: f32,
}

/// A visible, non-floating client in tiling order.
#[derive(Debug, Clone, Copy)]
pub struct TiledClient {
    pub id: ClientId,
    pub border_width: u32,
}

impl LayoutKind {
    /// Whether the layout positions clients at all.
    pub fn arranges(self) -> bool {
        !matches!(self, LayoutKind::Floating)
    }

    /// Computes client geometries (outer position, inner size).
    pub fn arrange(self, params: &ArrangeParams, clients: &[TiledClient]) -> Vec<(ClientId, Rect)> {
        match self {
            LayoutKind::Tile => tile(params, clients),
            LayoutKind::Monocle => monocle(params, clients),
            LayoutKind::Floating => vec![],
        }
    }
}

fn to_size(v: i64) -> u32 {
    v.clamp(1, u32::MAX as i64) as u32
}

fn offset(origin: i32, by: i64) -> i32 {
    (origin as i64 + by).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn tile(params: &ArrangeParams, clients: &[TiledClient]) -> Vec<(ClientId, Rect)> {
    let n = clients.len() as i64;
    if n == 0 {
        return vec![];
    }

    let area = params.area;
    let ww = area.width as i64;
    let wh = area.height as i64;
    let gap = params.gap as i64;
    let nmaster = params.nmaster as i64;

    let mw = if n > nmaster {
        if nmaster > 0 {
            (ww as f32 * params.mfact).ceil() as i64
        } else {
            0
        }
    } else {
        ww - gap
    };

    let mut result = Vec::with_capacity(clients.len());
    let mut my = gap;
    let mut ty = gap;

    for (i, client) in clients.iter().enumerate() {
        let i = i as i64;
        let bw = client.border_width as i64;
        if i < nmaster {
            let remaining = n.min(nmaster) - i;
            let h = (wh - my) / remaining - gap;
            result.push((
                client.id,
                Rect::new(
                    offset(area.x, gap),
                    offset(area.y, my),
                    to_size(mw - gap - 2 * bw),
                    to_size(h - 2 * bw),
                ),
            ));
            if my + h + gap < wh {
                my += h + gap;
            }
        } else {
            let h = (wh - ty) / (n - i) - gap;
            result.push((
                client.id,
                Rect::new(
                    offset(area.x, mw + gap),
                    offset(area.y, ty),
                    to_size(ww - mw - 2 * gap - 2 * bw),
                    to_size(h - 2 * bw),
                ),
            ));
            if ty + h + gap < wh {
                ty += h + gap;
            }
        }
    }

    result
}

fn monocle(params: &ArrangeParams, clients: &[TiledClient]) -> Vec<(ClientId, Rect)> {
    let area = params.area;
    let gap = params.gap as i64;

    clients
        .iter()
        .map(|c| {
            let bw = c.border_width as i64;
            (
                c.id,
                Rect::new(
                    offset(area.x, gap),
                    offset(area.y, gap),
                    to_size(area.width as i64 - 2 * gap - 2 * bw),
                    to_size(area.height as i64 - 2 * gap - 2 * bw),
                ),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clients(n: u32, bw: u32) -> Vec<TiledClient> {
        (1..=n)
            .map(|id| TiledClient {
                id,
                border_width: bw,
            })
            .collect()
    }

    fn params(nmaster: u32, mfact: f32, gap: u32) -> ArrangeParams {
        ArrangeParams {
            area: Rect::new(0, 0, 1000, 600),
            gap,
            nmaster,
            mfact,
        }
    }

    #[test]
    fn test_tile_empty() {
        assert!(LayoutKind::Tile.arrange(&params(1, 0.55, 0), &[]).is_empty());
    }

    #[test]
    fn test_tile_single_client_fills_area() {
        let result = LayoutKind::Tile.arrange(&params(1, 0.55, 0), &clients(1, 0));
        assert_eq!(result, vec![(1, Rect::new(0, 0, 1000, 600))]);
    }

    #[test]
    fn test_tile_single_client_with_gap_and_border() {
        let result = LayoutKind::Tile.arrange(&params(1, 0.55, 10), &clients(1, 1));
        // mw = ww - gap; width = mw - gap - 2bw
        assert_eq!(result, vec![(1, Rect::new(10, 10, 978, 578))]);
    }

    #[test]
    fn test_tile_master_and_stack() {
        let result = LayoutKind::Tile.arrange(&params(1, 0.55, 0), &clients(3, 0));

        assert_eq!(result.len(), 3);
        // ceil(1000 * 0.55)
        assert_eq!(result[0], (1, Rect::new(0, 0, 550, 600)));
        assert_eq!(result[1], (2, Rect::new(550, 0, 450, 300)));
        assert_eq!(result[2], (3, Rect::new(550, 300, 450, 300)));
    }

    #[test]
    fn test_tile_stack_clients_share_column_width() {
        let result = LayoutKind::Tile.arrange(&params(1, 0.55, 10), &clients(3, 1));

        let master = result[0].1;
        assert_eq!(master.x, 10);
        assert_eq!(master.width, 550 - 10 - 2);

        let (a, b) = (result[1].1, result[2].1);
        assert_eq!(a.width, b.width);
        assert_eq!(a.x, b.x);
        assert_eq!(a.x, 560);
        assert_eq!(a.width, 1000 - 550 - 20 - 2);
        // gaps above, between and below
        assert_eq!(a.y, 10);
        assert_eq!(b.y, a.y + a.height as i32 + 2 + 10);
    }

    #[test]
    fn test_tile_nmaster_zero_puts_everything_in_stack() {
        let result = LayoutKind::Tile.arrange(&params(0, 0.55, 0), &clients(2, 0));
        assert_eq!(result[0], (1, Rect::new(0, 0, 1000, 300)));
        assert_eq!(result[1], (2, Rect::new(0, 300, 1000, 300)));
    }

    #[test]
    fn test_tile_nmaster_covers_all_clients() {
        let result = LayoutKind::Tile.arrange(&params(2, 0.55, 0), &clients(2, 0));
        assert_eq!(result[0], (1, Rect::new(0, 0, 1000, 300)));
        assert_eq!(result[1], (2, Rect::new(0, 300, 1000, 300)));
    }

    #[test]
    fn test_tile_offsets_by_area_origin() {
        let p = ArrangeParams {
            area: Rect::new(1920, 24, 1000, 600),
            ..params(1, 0.5, 0)
        };
        let result = LayoutKind::Tile.arrange(&p, &clients(2, 0));
        assert_eq!(result[0].1, Rect::new(1920, 24, 500, 600));
        assert_eq!(result[1].1, Rect::new(2420, 24, 500, 600));
    }

    #[test]
    fn test_monocle_same_geometry_for_all() {
        let result = LayoutKind::Monocle.arrange(&params(1, 0.55, 10), &clients(4, 1));
        assert_eq!(result.len(), 4);
        for (_, rect) in &result {
            assert_eq!(*rect, Rect::new(10, 10, 1000 - 20 - 2, 600 - 20 - 2));
        }
    }

    #[test]
    fn test_huge_gap_does_not_overflow() {
        let p = ArrangeParams {
            area: Rect::new(100, 24, 1920, 1056),
            ..params(1, 0.55, u32::MAX)
        };
        for kind in [LayoutKind::Tile, LayoutKind::Monocle] {
            let result = kind.arrange(&p, &clients(3, 1));
            assert_eq!(result.len(), 3);
            for (_, rect) in &result {
                assert_eq!(rect.x, i32::MAX);
                assert_eq!(rect.width, 1);
                assert_eq!(rect.height, 1);
            }
        }
    }

    #[test]
    fn test_floating_arranges_nothing() {
        assert!(!LayoutKind::Floating.arranges());
        assert!(LayoutKind::Floating
            .arrange(&params(1, 0.55, 0), &clients(3, 0))
            .is_empty());
    }
}
