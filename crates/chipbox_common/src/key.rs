/// Physical keys a frontend can report.
///
/// The sixteen letter/number keys form the conventional 4x4 block on the
/// left of a QWERTY keyboard; `keypad_index` maps them onto the CHIP-8 hex
/// keypad:
///
/// ```text
/// 1 2 3 4        1 2 3 C
/// Q W E R   ->   4 5 6 D
/// A S D F        7 8 9 E
/// Z X C V        A 0 B F
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    Num1,
    Num2,
    Num3,
    Num4,
    Q,
    W,
    E,
    R,
    A,
    S,
    D,
    F,
    Z,
    X,
    C,
    V,
    None,
}

impl Key {
    /// CHIP-8 keypad index for this physical key, if it has one.
    pub fn keypad_index(self) -> Option<usize> {
        match self {
            Key::Num1 => Some(0x1),
            Key::Num2 => Some(0x2),
            Key::Num3 => Some(0x3),
            Key::Num4 => Some(0xC),
            Key::Q => Some(0x4),
            Key::W => Some(0x5),
            Key::E => Some(0x6),
            Key::R => Some(0xD),
            Key::A => Some(0x7),
            Key::S => Some(0x8),
            Key::D => Some(0x9),
            Key::F => Some(0xE),
            Key::Z => Some(0xA),
            Key::X => Some(0x0),
            Key::C => Some(0xB),
            Key::V => Some(0xF),
            Key::None => None,
        }
    }
}
