use anyhow::Result;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, Keycode};

use crate::core::keysym::XK_NUM_LOCK;

/// Snapshot of the server's keycode to keysym table.
#[derive(Debug, Clone, Default)]
pub struct KeyboardMap {
    min_keycode: Keycode,
    keysyms_per_keycode: usize,
    keysyms: Vec<u32>,
}

impl KeyboardMap {
    pub fn new(min_keycode: Keycode, keysyms_per_keycode: u8, keysyms: Vec<u32>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode: keysyms_per_keycode as usize,
            keysyms,
        }
    }

    pub fn query(conn: &impl Connection) -> Result<Self> {
        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let max_keycode = setup.max_keycode;
        let reply = conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)?
            .reply()?;
        Ok(Self::new(
            min_keycode,
            reply.keysyms_per_keycode,
            reply.keysyms,
        ))
    }

    /// Unshifted keysym of a keycode, 0 if unknown.
    pub fn keysym(&self, keycode: Keycode) -> u32 {
        if keycode < self.min_keycode || self.keysyms_per_keycode == 0 {
            return 0;
        }
        let index = (keycode - self.min_keycode) as usize * self.keysyms_per_keycode;
        self.keysyms.get(index).copied().unwrap_or(0)
    }

    /// Every keycode whose unshifted keysym is `keysym`.
    pub fn keycodes(&self, keysym: u32) -> Vec<Keycode> {
        if self.keysyms_per_keycode == 0 {
            return vec![];
        }
        self.keysyms
            .chunks(self.keysyms_per_keycode)
            .enumerate()
            .filter(|(_, syms)| syms.first() == Some(&keysym))
            .filter_map(|(i, _)| Keycode::try_from(i + self.min_keycode as usize).ok())
            .collect()
    }
}

/// Finds the modifier bit Num Lock is mapped to, 0 when it is not mapped.
pub fn numlock_mask(conn: &impl Connection, keyboard: &KeyboardMap) -> Result<u16> {
    let numlock = keyboard.keycodes(XK_NUM_LOCK);
    if numlock.is_empty() {
        return Ok(0);
    }
    let map = conn.get_modifier_mapping()?.reply()?;
    Ok(modifier_bit(
        &map.keycodes,
        map.keycodes_per_modifier() as usize,
        &numlock,
    ))
}

fn modifier_bit(keycodes: &[Keycode], per_modifier: usize, wanted: &[Keycode]) -> u16 {
    if per_modifier == 0 {
        return 0;
    }
    keycodes
        .chunks(per_modifier)
        .take(8)
        .position(|chunk| chunk.iter().any(|k| *k != 0 && wanted.contains(k)))
        .map_or(0, |i| 1 << i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keysym::{XK_J, XK_K, XK_RETURN};

    fn sample_map() -> KeyboardMap {
        // keycodes 8..=11, two columns each
        KeyboardMap::new(
            8,
            2,
            vec![XK_J, 0x4a, XK_K, 0x4b, XK_RETURN, 0, XK_NUM_LOCK, 0],
        )
    }

    #[test]
    fn test_keysym_uses_first_column() {
        let map = sample_map();
        assert_eq!(map.keysym(8), XK_J);
        assert_eq!(map.keysym(9), XK_K);
        assert_eq!(map.keysym(10), XK_RETURN);
        assert_eq!(map.keysym(7), 0);
        assert_eq!(map.keysym(200), 0);
    }

    #[test]
    fn test_keycodes_for_keysym() {
        let map = sample_map();
        assert_eq!(map.keycodes(XK_K), vec![9]);
        assert_eq!(map.keycodes(XK_NUM_LOCK), vec![11]);
        // shifted column is not grabbed
        assert!(map.keycodes(0x4a).is_empty());
    }

    #[test]
    fn test_modifier_bit() {
        // shift, lock, control, mod1, mod2 with two keycodes each
        let keycodes = [50, 62, 66, 0, 37, 105, 64, 108, 77, 0];
        assert_eq!(modifier_bit(&keycodes, 2, &[77]), 1 << 4);
        assert_eq!(modifier_bit(&keycodes, 2, &[99]), 0);
        assert_eq!(modifier_bit(&keycodes, 0, &[77]), 0);
    }
}
