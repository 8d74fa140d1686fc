use std::io::{Read, Write};
use std::time::Duration;

use crate::device::{Device, BYTES_PER_LED};
use crate::error::HandshakeError;

const BAUD_RATE: u32 = 9600;
const READ_TIMEOUT: Duration = Duration::from_secs(1);
const POST_QUERY_DELAY: Duration = Duration::from_secs(1);
const INFO_BUFFER_LEN: usize = 250;

/// Probes one named serial port and, if a controller answers, builds its
/// [`Device`] descriptor.
///
/// Protocol: open the port, send the single byte `?`, wait exactly one
/// second (the firmware needs this delay before it replies), then read up
/// to 250 bytes of a comma-separated, newline-terminated reply. Fields are
/// addressed by index: `[0]` strip_length, `[1]` led_height, `[5]` layout
/// (`0` means left-to-right), `[11]` uuid. Indices 2-4 and 6-10 exist in the
/// reply but are not consumed here.
pub fn probe(port_name: &str) -> Result<Device, HandshakeError> {
    let mut port = serialport::new(port_name, BAUD_RATE)
        .timeout(READ_TIMEOUT)
        .open()?;

    port.write_all(b"?").map_err(HandshakeError::WriteFailed)?;

    std::thread::sleep(POST_QUERY_DELAY);

    let mut raw = [0u8; INFO_BUFFER_LEN];
    let read = port.read(&mut raw).unwrap_or(0);

    let fields = parse_reply(&raw[..read]);
    if fields.len() <= 11 {
        return Err(HandshakeError::MalformedHandshake {
            reason: format!("expected at least 12 comma-separated fields, got {}", fields.len()),
        });
    }

    let strip_length: u32 = fields[0].parse().unwrap_or(0);
    let led_height: u32 = fields[1].parse().unwrap_or(0);
    let layout = fields[5].parse::<u32>().unwrap_or(1) == 0;
    let uuid: u32 = fields[11].parse().unwrap_or(0);

    if led_height % 8 != 0 {
        log::warn!(
            "port {}: led_height {} is not a multiple of 8; wire layout is undefined",
            port_name,
            led_height
        );
    }

    let byte_size = led_height as usize * strip_length as usize * BYTES_PER_LED + 3;
    let device = Device {
        uuid,
        port,
        port_name: port_name.to_string(),
        strip_length,
        led_height,
        layout,
        panel_id_one: (uuid * 2) as i32,
        panel_id_two: (uuid * 2 + 1) as i32,
        panel_buffer_one: None,
        panel_buffer_two: None,
        wire_buffer: vec![0u8; byte_size],
        byte_size,
    };

    log::info!(
        "found interface on {}: uuid={} width={} height={}",
        port_name,
        device.uuid,
        device.strip_length,
        device.led_height
    );

    Ok(device)
}

/// Splits `raw` on commas, stopping at the first newline, and returns the
/// tokens (inclusive of any "extra" fields the caller doesn't consume).
fn parse_reply(raw: &[u8]) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();

    for &byte in raw {
        match byte {
            b'\n' => break,
            b',' => {
                fields.push(std::mem::take(&mut current));
            }
            b => current.push(b as char),
        }
    }
    if !current.is_empty() {
        fields.push(current);
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_fields_up_to_newline() {
        let reply = b"30,60,0,0,0,0,0,0,0,0,0,7\ngarbage-after-newline";
        let fields = parse_reply(reply);
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[0], "30");
        assert_eq!(fields[1], "60");
        assert_eq!(fields[5], "0");
        assert_eq!(fields[11], "7");
    }

    #[test]
    fn too_few_fields_is_tolerated_by_parser_but_rejected_by_probe_caller() {
        let fields = parse_reply(b"30,60\n");
        assert_eq!(fields.len(), 2);
    }
}
