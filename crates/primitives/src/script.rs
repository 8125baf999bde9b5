//! Minimal script builder for the pushes used by coinbase and pay-to-pubkey scripts.

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_1: u8 = 0x51;
pub const OP_CHECKSIG: u8 = 0xac;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.0.push(opcode);
        self
    }

    /// Pushes an integer the way the reference client pushes an `int64`:
    /// small values become `OP_N`, everything else a minimal script number.
    pub fn push_int(self, value: i64) -> Self {
        match value {
            0 => self.push_opcode(OP_0),
            -1 => self.push_opcode(OP_1NEGATE),
            1..=16 => self.push_opcode(OP_1 + (value as u8 - 1)),
            _ => self.push_slice(&script_num_to_vec(value)),
        }
    }

    /// Pushes the serialized script number as data, even for small values.
    pub fn push_num(self, value: i64) -> Self {
        self.push_slice(&script_num_to_vec(value))
    }

    pub fn push_slice(mut self, data: &[u8]) -> Self {
        match data.len() {
            0..=75 => self.0.push(data.len() as u8),
            76..=0xff => {
                self.0.push(OP_PUSHDATA1);
                self.0.push(data.len() as u8);
            }
            0x100..=0xffff => {
                self.0.push(OP_PUSHDATA2);
                self.0.extend_from_slice(&(data.len() as u16).to_le_bytes());
            }
            _ => {
                self.0.push(OP_PUSHDATA4);
                self.0.extend_from_slice(&(data.len() as u32).to_le_bytes());
            }
        }
        self.0.extend_from_slice(data);
        self
    }
}

pub fn script_num_to_vec(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }
    let mut abs = value.unsigned_abs();
    let mut result = Vec::new();
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }
    let sign_bit = 0x80u8;
    if let Some(last) = result.last_mut() {
        if (*last & sign_bit) != 0 {
            result.push(if value < 0 { sign_bit } else { 0 });
        } else if value < 0 {
            *last |= sign_bit;
        }
    }
    result
}

/// `<pubkey> OP_CHECKSIG`
pub fn pay_to_pubkey(pubkey: &[u8]) -> Script {
    Script::new().push_slice(pubkey).push_opcode(OP_CHECKSIG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_numbers_are_minimal() {
        assert_eq!(script_num_to_vec(0), Vec::<u8>::new());
        assert_eq!(script_num_to_vec(4), vec![0x04]);
        assert_eq!(script_num_to_vec(0x80), vec![0x80, 0x00]);
        assert_eq!(script_num_to_vec(-1), vec![0x81]);
        assert_eq!(script_num_to_vec(-0x80), vec![0x80, 0x80]);
        assert_eq!(
            script_num_to_vec(1_498_464_000),
            vec![0x00, 0xbf, 0x50, 0x59]
        );
    }

    #[test]
    fn push_int_uses_small_opcodes() {
        assert_eq!(Script::new().push_int(0).as_bytes(), &[OP_0]);
        assert_eq!(Script::new().push_int(-1).as_bytes(), &[OP_1NEGATE]);
        assert_eq!(Script::new().push_int(16).as_bytes(), &[0x60]);
        assert_eq!(Script::new().push_int(17).as_bytes(), &[0x01, 0x11]);
    }

    #[test]
    fn push_num_always_pushes_data() {
        assert_eq!(Script::new().push_num(4).as_bytes(), &[0x01, 0x04]);
    }

    #[test]
    fn push_slice_length_prefixes() {
        assert_eq!(Script::new().push_slice(&[0xaa; 75]).as_bytes()[0], 75);

        let script = Script::new().push_slice(&[0xaa; 76]);
        assert_eq!(&script.as_bytes()[..2], &[OP_PUSHDATA1, 76]);

        let script = Script::new().push_slice(&[0xaa; 0x100]);
        assert_eq!(&script.as_bytes()[..3], &[OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(script.len(), 3 + 0x100);
    }

    #[test]
    fn pay_to_pubkey_layout() {
        let script = pay_to_pubkey(&[0x02; 33]);
        assert_eq!(script.len(), 35);
        assert_eq!(script.as_bytes()[0], 33);
        assert_eq!(script.as_bytes()[34], OP_CHECKSIG);
    }
}
