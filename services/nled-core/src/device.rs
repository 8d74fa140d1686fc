use serialport::SerialPort;

/// Bytes of color data per LED (always RGB).
pub const BYTES_PER_LED: usize = 3;

/// One microcontroller "interface" board, driving two logical panels over
/// a single serial port as eight parallel strips.
pub struct Device {
    pub uuid: u32,
    pub port: Box<dyn SerialPort>,
    pub port_name: String,

    /// LEDs per parallel strip; the width of one panel.
    pub strip_length: u32,
    /// Total LEDs along the pin direction across both panels; must be a
    /// positive multiple of 8.
    pub led_height: u32,
    /// `true` when row 0 of the physical zigzag starts left-to-right.
    pub layout: bool,

    pub panel_id_one: i32,
    pub panel_id_two: i32,

    /// Registry-owned RGB buffers, each `(led_height/2) * strip_length * 3`
    /// bytes once bound by `set_data`. `None` until the first `set_data`.
    pub panel_buffer_one: Option<Vec<u8>>,
    pub panel_buffer_two: Option<Vec<u8>>,

    /// Owned output buffer, exactly `led_height * strip_length * 3 + 3`
    /// bytes: a 3-byte sync header followed by the bit-sliced body.
    pub wire_buffer: Vec<u8>,
    pub byte_size: usize,
}

impl Device {
    /// LEDs in one panel: `strip_length * (led_height / 2)`.
    pub fn panel_size(&self) -> usize {
        self.strip_length as usize * (self.led_height as usize / 2)
    }

    /// Bytes in one panel's RGB buffer.
    pub fn panel_byte_size(&self) -> usize {
        self.panel_size() * BYTES_PER_LED
    }

    /// Panel height in LEDs: `led_height / 2`.
    pub fn panel_height(&self) -> u32 {
        self.led_height / 2
    }

    pub fn panel_buffer_for(&self, panel_id: i32) -> Option<&Vec<u8>> {
        if panel_id == self.panel_id_one {
            self.panel_buffer_one.as_ref()
        } else if panel_id == self.panel_id_two {
            self.panel_buffer_two.as_ref()
        } else {
            None
        }
    }

    pub fn set_panel_buffer(&mut self, panel_id: i32, data: Vec<u8>) -> bool {
        if panel_id == self.panel_id_one {
            self.panel_buffer_one = Some(data);
            true
        } else if panel_id == self.panel_id_two {
            self.panel_buffer_two = Some(data);
            true
        } else {
            false
        }
    }
}
