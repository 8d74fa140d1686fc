use crate::device::BYTES_PER_LED;
use crate::dispatcher;
use crate::registry::DeviceRegistry;

/// Public surface used by the command handlers (and any other embedder):
/// init/clear, panel geometry queries, data binding, and commit.
///
/// Panel-id inputs are validated against the registry's panel index. An
/// unknown id is a normal, documented outcome, not a caller bug: numeric
/// geometry queries return the sentinel `-1`, `get_data`/`set_data` return
/// `None`/`false`, in both debug and release builds — the Rust rendition of
/// the original C API's "-1 or null" contract, without the debug-only
/// assertion (there is nothing to assert: the panel id came from this same
/// process and legitimately may not exist yet, e.g. before `init_displays`
/// has probed any ports).
pub struct LedApi {
    registry: DeviceRegistry,
}

impl LedApi {
    /// Enumerates and probes every serial port, building the device
    /// registry from scratch. Replaces any previously initialized state.
    pub fn init_displays(gamma: f32) -> Self {
        Self { registry: DeviceRegistry::init(gamma) }
    }

    /// Closes every serial port and releases all owned buffers.
    pub fn clear_displays(&mut self) {
        self.registry.clear();
    }

    pub fn display_exists(&self, panel_id: i32) -> bool {
        self.registry.display_exists(panel_id)
    }

    /// `2 * device_count` — every device exposes exactly two panels.
    pub fn display_count(&self) -> i32 {
        (2 * self.registry.device_count()) as i32
    }

    /// LEDs in one panel (`W * Hp`), or `-1` for an unknown panel id.
    pub fn display_size(&self, panel_id: i32) -> i32 {
        self.with_device(panel_id, |device| device.panel_size() as i32)
    }

    /// Bytes in one panel's RGB buffer (`3 * W * Hp`), or `-1`.
    pub fn display_byte_size(&self, panel_id: i32) -> i32 {
        self.with_device(panel_id, |device| device.panel_byte_size() as i32)
    }

    /// Panel width in LEDs (`W`), or `-1`.
    pub fn display_stride(&self, panel_id: i32) -> i32 {
        self.with_device(panel_id, |device| device.strip_length as i32)
    }

    /// Panel height in LEDs (`Hp`), or `-1`.
    pub fn display_height(&self, panel_id: i32) -> i32 {
        self.with_device(panel_id, |device| device.panel_height() as i32)
    }

    /// Largest `display_byte_size` across every registered panel, `0` if
    /// there are none.
    pub fn max_display_byte_size(&self) -> i32 {
        self.registry
            .panel_ids()
            .iter()
            .map(|&id| self.display_byte_size(id))
            .max()
            .unwrap_or(0)
    }

    /// Sum of `display_size` across every registered panel.
    pub fn total_display_size(&self) -> i32 {
        self.registry.panel_ids().iter().map(|&id| self.display_size(id)).sum()
    }

    /// Sum of `display_byte_size` across every registered panel.
    pub fn total_display_byte_size(&self) -> i32 {
        self.registry.panel_ids().iter().map(|&id| self.display_byte_size(id)).sum()
    }

    pub fn bytes_per_led(&self) -> i32 {
        BYTES_PER_LED as i32
    }

    /// Panel ids in registry enumeration order (port-discovery order, each
    /// device contributing `panel_id_one` then `panel_id_two`).
    pub fn available_display_numbers(&self) -> &[i32] {
        self.registry.panel_ids()
    }

    /// Copies `data` into the panel's buffer, replacing whatever was bound
    /// before. Returns `false` for an unknown panel id.
    pub fn set_data(&mut self, panel_id: i32, data: &[u8]) -> bool {
        match self.registry.find_mut(panel_id) {
            Some(device) => {
                device.set_panel_buffer(panel_id, data.to_vec());
                true
            }
            None => false,
        }
    }

    /// Borrows the panel's currently bound buffer, or `None` if the panel
    /// id is unknown or nothing has been bound yet.
    pub fn get_data(&self, panel_id: i32) -> Option<&[u8]> {
        match self.registry.find(panel_id) {
            Some(device) => device.panel_buffer_for(panel_id).map(|buf| buf.as_slice()),
            None => None,
        }
    }

    /// Encodes and transmits a frame to every device, one worker per
    /// device, blocking until all have finished.
    pub fn end_display(&mut self) {
        let gamma = self.registry.gamma().clone();
        dispatcher::commit(self.registry.devices_mut(), &gamma);
    }

    fn with_device(&self, panel_id: i32, f: impl FnOnce(&crate::device::Device) -> i32) -> i32 {
        match self.registry.find(panel_id) {
            Some(device) => f(device),
            None => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_reports_zero_and_sentinels() {
        let api = LedApi::init_displays(1.0);
        assert_eq!(api.display_count(), 0);
        assert_eq!(api.display_size(0), -1);
        assert_eq!(api.display_byte_size(0), -1);
        assert_eq!(api.max_display_byte_size(), 0);
        assert_eq!(api.total_display_size(), 0);
        assert_eq!(api.bytes_per_led(), 3);
        assert!(api.available_display_numbers().is_empty());
    }

    #[test]
    fn get_data_on_unknown_panel_is_none() {
        let api = LedApi::init_displays(1.0);
        assert!(api.get_data(0).is_none());
    }

    #[test]
    fn set_data_on_unknown_panel_reports_failure() {
        let mut api = LedApi::init_displays(1.0);
        assert!(!api.set_data(0, &[0u8; 3]));
    }
}
