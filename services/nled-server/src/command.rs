use std::io::{Read, Write};

use nled_core::LedApi;

use crate::error::CommandError;

/// `GetConfig` — int `display_count`, then for each panel in
/// `available_display_numbers` order: id, size, byte size, height, width.
pub fn get_config<S: Write>(stream: &mut S, api: &LedApi) -> Result<(), CommandError> {
    let panel_ids = api.available_display_numbers().to_vec();
    nled_proto::write_i32(stream, panel_ids.len() as i32)?;

    for id in panel_ids {
        nled_proto::write_i32(stream, id)?;
        nled_proto::write_i32(stream, api.display_size(id))?;
        nled_proto::write_i32(stream, api.display_byte_size(id))?;
        nled_proto::write_i32(stream, api.display_height(id))?;
        nled_proto::write_i32(stream, api.display_stride(id))?;
    }
    Ok(())
}

/// `DrawPanel` — int `panel_id`, then exactly `display_byte_size(panel_id)`
/// raw RGB bytes, written straight into that panel's server-owned buffer.
pub fn draw_panel<S: Read>(stream: &mut S, api: &mut LedApi) -> Result<(), CommandError> {
    let panel_id = nled_proto::read_i32(stream)?;
    if !api.display_exists(panel_id) {
        log::warn!("DrawPanel: unknown panel id {panel_id}");
        return Err(CommandError::UnknownPanel(panel_id));
    }

    let byte_size = api.display_byte_size(panel_id) as usize;
    let mut buf = vec![0u8; byte_size];
    nled_proto::read_exact(stream, &mut buf)?;
    api.set_data(panel_id, &buf);
    Ok(())
}

/// `DrawAll` — the same raw payload as `DrawPanel`, for every panel in
/// `available_display_numbers` order, with no panel id framing between
/// them.
pub fn draw_all<S: Read>(stream: &mut S, api: &mut LedApi) -> Result<(), CommandError> {
    let panel_ids = api.available_display_numbers().to_vec();
    for panel_id in panel_ids {
        let byte_size = api.display_byte_size(panel_id) as usize;
        let mut buf = vec![0u8; byte_size];
        nled_proto::read_exact(stream, &mut buf)?;
        api.set_data(panel_id, &buf);
    }
    Ok(())
}

/// `Flush` — commits every device's currently bound buffers to its serial
/// port.
pub fn flush(api: &mut LedApi) -> Result<(), CommandError> {
    api.end_display();
    Ok(())
}

/// `SetDebugMode` — reserved. Consumes the mode int and always succeeds;
/// there is no debug mode implemented yet.
pub fn set_debug_mode<S: Read>(stream: &mut S, _api: &LedApi) -> Result<(), CommandError> {
    let _mode = nled_proto::read_i32(stream)?;
    Ok(())
}
