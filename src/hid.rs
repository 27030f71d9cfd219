//! HID report types handed to the host runtime.
//!
//! The runtime owns the transport (USB or BLE); this crate only fills report
//! payloads and queues them.

/// Standard 6KRO keyboard report.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub leds: u8,
    pub keycodes: [u8; 6],
}

/// Consumer page report, a single usage id (0 = release).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MediaKeyboardReport {
    pub usage_id: u16,
}

/// The report enum sent to the runtime's report writer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    KeyboardReport(KeyboardReport),
    MediaKeyboardReport(MediaKeyboardReport),
}
