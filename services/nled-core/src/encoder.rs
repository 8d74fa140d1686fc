use crate::device::{Device, BYTES_PER_LED};
use crate::gamma::GammaTable;

/// Header byte marking a device as the frame-sync master.
const SYNC_MASTER: u8 = b'*';
/// Requested frame-sync pulse width: 75% of a 30Hz frame, in microseconds.
/// Stored little-endian in the header — do not confuse with the
/// network protocol's big-endian wire integers.
const SYNC_USEC: u16 = ((1_000_000.0 / 30.0) * 0.75) as u16;

/// Packs `(r, g, b)` into the controller's GRB wiring order, most
/// significant byte first: `(g << 16) | (r << 8) | b`.
#[inline]
fn pack_grb(gamma: &GammaTable, r: u8, g: u8, b: u8) -> u32 {
    let r = gamma.correct(r) as u32;
    let g = gamma.correct(g) as u32;
    let b = gamma.correct(b) as u32;
    (g << 16) | (r << 8) | b
}

/// Rewrites `device.wire_buffer` in full from its two panel buffers and the
/// shared gamma table: a 3-byte sync header followed by the bit-sliced,
/// serpentine-remapped body OctoWS2811-style firmware expects.
///
/// Unbound panel buffers (`None`) are treated as all-zero, per §4.4's edge
/// case: the core never refuses to encode, it just emits black for the
/// missing panel. Split from `Device` so the registry can hand out
/// `&mut Device` and a shared `&GammaTable` to independent commit workers
/// without aliasing.
pub fn encode_with_gamma(device: &mut Device, gamma: &GammaTable) {
    let width = device.strip_length as usize;
    let height = device.led_height as usize;
    let panel_height = height / 2;
    let strips_per_pin = height / 8;
    let layout_bias: usize = if device.layout { 0 } else { 1 };
    let display_max_index = width * panel_height;

    let empty = Vec::new();
    let panel_one = device.panel_buffer_one.as_ref().unwrap_or(&empty);
    let panel_two = device.panel_buffer_two.as_ref().unwrap_or(&empty);

    device.wire_buffer[0] = SYNC_MASTER;
    device.wire_buffer[1] = (SYNC_USEC & 0xFF) as u8;
    device.wire_buffer[2] = (SYNC_USEC >> 8) as u8;

    let mut offset = 3usize;
    let mut pixel = [0u32; 8];

    for y in 0..strips_per_pin {
        let xs: Box<dyn Iterator<Item = usize>> = if (y & 1) == layout_bias {
            Box::new(0..width)
        } else {
            Box::new((0..width).rev())
        };

        for x in xs {
            for (i, slot) in pixel.iter_mut().enumerate() {
                let mut linear_index = x + (y + strips_per_pin * i) * width;
                let source = if linear_index < display_max_index {
                    panel_one
                } else {
                    linear_index %= display_max_index;
                    panel_two
                };

                let base = linear_index * BYTES_PER_LED;
                let (r, g, b) = match source.get(base..base + 3) {
                    Some(rgb) => (rgb[0], rgb[1], rgb[2]),
                    None => (0, 0, 0),
                };
                *slot = pack_grb(gamma, r, g, b);
            }

            let mut mask = 0x800000u32;
            while mask != 0 {
                let mut byte = 0u8;
                for (i, &p) in pixel.iter().enumerate() {
                    if p & mask != 0 {
                        byte |= 1 << i;
                    }
                }
                device.wire_buffer[offset] = byte;
                offset += 1;
                mask >>= 1;
            }
        }
    }
}

#[cfg(test)]
use quickcheck_macros::quickcheck;

#[cfg(test)]
mod tests {
    use super::*;
    use serialport::SerialPort;
    use std::io::{Read, Result as IoResult, Write};

    /// A serial port stand-in that just buffers writes, for encoder tests
    /// that don't need real hardware.
    struct NullPort;

    impl Read for NullPort {
        fn read(&mut self, _buf: &mut [u8]) -> IoResult<usize> {
            Ok(0)
        }
    }
    impl Write for NullPort {
        fn write(&mut self, buf: &[u8]) -> IoResult<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> IoResult<()> {
            Ok(())
        }
    }
    impl serialport::SerialPort for NullPort {
        fn name(&self) -> Option<String> { None }
        fn baud_rate(&self) -> serialport::Result<u32> { Ok(9600) }
        fn data_bits(&self) -> serialport::Result<serialport::DataBits> { Ok(serialport::DataBits::Eight) }
        fn flow_control(&self) -> serialport::Result<serialport::FlowControl> { Ok(serialport::FlowControl::None) }
        fn parity(&self) -> serialport::Result<serialport::Parity> { Ok(serialport::Parity::None) }
        fn stop_bits(&self) -> serialport::Result<serialport::StopBits> { Ok(serialport::StopBits::One) }
        fn timeout(&self) -> std::time::Duration { std::time::Duration::from_secs(1) }
        fn set_baud_rate(&mut self, _: u32) -> serialport::Result<()> { Ok(()) }
        fn set_data_bits(&mut self, _: serialport::DataBits) -> serialport::Result<()> { Ok(()) }
        fn set_flow_control(&mut self, _: serialport::FlowControl) -> serialport::Result<()> { Ok(()) }
        fn set_parity(&mut self, _: serialport::Parity) -> serialport::Result<()> { Ok(()) }
        fn set_stop_bits(&mut self, _: serialport::StopBits) -> serialport::Result<()> { Ok(()) }
        fn set_timeout(&mut self, _: std::time::Duration) -> serialport::Result<()> { Ok(()) }
        fn write_request_to_send(&mut self, _: bool) -> serialport::Result<()> { Ok(()) }
        fn write_data_terminal_ready(&mut self, _: bool) -> serialport::Result<()> { Ok(()) }
        fn read_clear_to_send(&mut self) -> serialport::Result<bool> { Ok(true) }
        fn read_data_set_ready(&mut self) -> serialport::Result<bool> { Ok(true) }
        fn read_ring_indicator(&mut self) -> serialport::Result<bool> { Ok(false) }
        fn read_carrier_detect(&mut self) -> serialport::Result<bool> { Ok(false) }
        fn bytes_to_read(&self) -> serialport::Result<u32> { Ok(0) }
        fn bytes_to_write(&self) -> serialport::Result<u32> { Ok(0) }
        fn clear(&self, _: serialport::ClearBuffer) -> serialport::Result<()> { Ok(()) }
        fn try_clone(&self) -> serialport::Result<Box<dyn SerialPort>> { Ok(Box::new(NullPort)) }
        fn set_break(&self) -> serialport::Result<()> { Ok(()) }
        fn clear_break(&self) -> serialport::Result<()> { Ok(()) }
    }

    fn device(width: u32, height: u32, layout: bool) -> Device {
        let byte_size = (height * width * BYTES_PER_LED as u32 + 3) as usize;
        Device {
            uuid: 0,
            port: Box::new(NullPort),
            port_name: "test".into(),
            strip_length: width,
            led_height: height,
            layout,
            panel_id_one: 0,
            panel_id_two: 1,
            panel_buffer_one: None,
            panel_buffer_two: None,
            wire_buffer: vec![0u8; byte_size],
            byte_size,
        }
    }

    /// S1 — single-panel encode, uniform red, gamma=1.0, W=2, H=8, layout=true.
    #[test]
    fn scenario_s1_uniform_red() {
        let gamma = GammaTable::build(1.0);
        let mut dev = device(2, 8, true);
        let panel_size = dev.panel_size();
        dev.panel_buffer_one = Some([255u8, 0, 0].repeat(panel_size));
        dev.panel_buffer_two = Some([255u8, 0, 0].repeat(panel_size));

        encode_with_gamma(&mut dev, &gamma);

        assert_eq!(dev.wire_buffer.len(), 51);
        assert_eq!(&dev.wire_buffer[0..3], &[0x2A, 0xA8, 0x61]);

        let body = &dev.wire_buffer[3..];
        assert_eq!(body.len(), 48);
        // Red is GRB byte position 1 (R<<8): all 8 pins set -> 0xFF.
        // Green (mask 0x800000, byte 0 of each 24) must be 0, blue 0.
        for chunk in body.chunks_exact(24) {
            assert_eq!(chunk[0], 0x00); // top green bit
            for &b in &chunk[8..16] {
                assert_eq!(b, 0xFF); // every red bit
            }
            for &b in &chunk[16..24] {
                assert_eq!(b, 0x00); // every blue bit
            }
        }
    }

    /// S2 — two-panel boundary, W=1, H=16, gamma=1.0.
    #[test]
    fn scenario_s2_panel_boundary() {
        let gamma = GammaTable::build(1.0);
        let mut dev = device(1, 16, true);
        let panel_size = dev.panel_size();
        dev.panel_buffer_one = Some([1u8, 0, 0].repeat(panel_size));
        dev.panel_buffer_two = Some([0u8, 0, 2].repeat(panel_size));

        encode_with_gamma(&mut dev, &gamma);

        let body = &dev.wire_buffer[3..];
        // spp = 2, row y=0 has a single x=0 column -> first 24 bytes.
        let row0 = &body[0..24];
        // R=1 sets only bit 8 of the 24-bit GRB value (R<<8); the mask
        // sweep runs bit 23 down to bit 0, so bit 8 is byte index 15.
        assert_eq!(row0[15], 0x0F); // pins 0..3 (panel one, R=1)
        // B=2 sets only bit 1 (mask 0x000002), byte index 22.
        assert_eq!(row0[22], 0xF0); // pins 4..7 (panel two, B=2)
    }

    #[quickcheck]
    fn prop_buffer_size_matches_formula(w: u8, h8: u8) -> bool {
        let width = (w as u32 % 8) + 1;
        let height = ((h8 as u32 % 8) + 1) * 8;
        let mut dev = device(width, height, true);
        let gamma = GammaTable::build(1.0);
        encode_with_gamma(&mut dev, &gamma);
        dev.wire_buffer.len() == (3 * width * height + 3) as usize
    }

    #[quickcheck]
    fn prop_header_is_constant(w: u8, h8: u8, layout: bool) -> bool {
        let width = (w as u32 % 8) + 1;
        let height = ((h8 as u32 % 8) + 1) * 8;
        let mut dev = device(width, height, layout);
        let gamma = GammaTable::build(1.0);
        encode_with_gamma(&mut dev, &gamma);
        dev.wire_buffer[0] == 0x2A && dev.wire_buffer[1] == 0xA8 && dev.wire_buffer[2] == 0x61
    }
}
