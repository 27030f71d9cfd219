/// Raw key transition at a matrix position, delivered by the runtime's scan
/// loop after debouncing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
}

/// The three virtual inputs of a clickable rotary encoder.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum EncoderInput {
    CounterClockwise = 0,
    Clockwise = 1,
    Click = 2,
}

/// A rotation tick or click edge of one encoder. Rotations are delivered as a
/// press edge immediately followed by a release edge, like the matrix keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderEvent {
    /// The index of the rotary encoder
    pub id: u8,
    pub input: EncoderInput,
    pub pressed: bool,
}

/// Everything the runtime can deliver to [`Keyboard::on_event`](crate::keyboard::Keyboard::on_event).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    Key(KeyEvent),
    Encoder(EncoderEvent),
}
