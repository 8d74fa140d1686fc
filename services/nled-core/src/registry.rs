use std::collections::HashMap;

use crate::device::Device;
use crate::gamma::GammaTable;
use crate::handshake;

/// Holds every initialized [`Device`], the panel-id → device index, and the
/// panel-id enumeration order induced by port discovery.
///
/// Devices are exclusively owned here; so is the gamma table. A registry is
/// fully replaced by [`DeviceRegistry::init`] and fully released by
/// [`DeviceRegistry::clear`] — there is no module-global state (§9 design
/// note #1: this is an owned value, not a static).
pub struct DeviceRegistry {
    devices: Vec<Device>,
    panel_index: HashMap<i32, usize>,
    panel_ids: Vec<i32>,
    gamma: GammaTable,
}

impl DeviceRegistry {
    /// Enumerates every serial port, probes each for an OctoWS2811-style
    /// controller, and keeps the ones that answer. Panel ids are assigned
    /// `uuid*2` / `uuid*2+1`; enumeration order is port-enumeration order,
    /// which callers rely on for `DrawAll`.
    pub fn init(gamma_value: f32) -> Self {
        let mut devices = Vec::new();
        let mut panel_index = HashMap::new();
        let mut panel_ids = Vec::new();

        let ports = serialport::available_ports().unwrap_or_default();
        for port_info in ports {
            let device = match handshake::probe(&port_info.port_name) {
                Ok(device) => device,
                Err(err) => {
                    log::warn!("skipping port {}: {}", port_info.port_name, err);
                    continue;
                }
            };

            assert!(
                !panel_index.contains_key(&device.panel_id_one)
                    && !panel_index.contains_key(&device.panel_id_two),
                "duplicate panel id for device uuid {}",
                device.uuid
            );

            let index = devices.len();
            panel_index.insert(device.panel_id_one, index);
            panel_index.insert(device.panel_id_two, index);
            panel_ids.push(device.panel_id_one);
            panel_ids.push(device.panel_id_two);
            devices.push(device);
        }

        log::info!("found {} valid LED interfaces", devices.len());

        Self { devices, panel_index, panel_ids, gamma: GammaTable::build(gamma_value) }
    }

    /// Closes every serial port (by dropping the devices) and releases all
    /// owned buffers and the gamma table. Also resets the cached panel id
    /// list (§9 design note #3: no stale cache survives a `clear`).
    pub fn clear(&mut self) {
        *self = Self {
            devices: Vec::new(),
            panel_index: HashMap::new(),
            panel_ids: Vec::new(),
            gamma: GammaTable::build(1.0),
        };
    }

    pub fn gamma(&self) -> &GammaTable {
        &self.gamma
    }

    pub fn display_exists(&self, panel_id: i32) -> bool {
        self.panel_index.contains_key(&panel_id)
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn panel_ids(&self) -> &[i32] {
        &self.panel_ids
    }

    pub fn find(&self, panel_id: i32) -> Option<&Device> {
        self.panel_index.get(&panel_id).map(|&i| &self.devices[i])
    }

    pub fn find_mut(&mut self, panel_id: i32) -> Option<&mut Device> {
        self.panel_index.get(&panel_id).copied().map(move |i| &mut self.devices[i])
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn devices_mut(&mut self) -> &mut [Device] {
        &mut self.devices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_has_no_displays() {
        let registry = DeviceRegistry { devices: Vec::new(), panel_index: HashMap::new(), panel_ids: Vec::new(), gamma: GammaTable::build(1.0) };
        assert_eq!(registry.device_count(), 0);
        assert!(!registry.display_exists(0));
        assert!(registry.panel_ids().is_empty());
    }

    #[test]
    fn clear_resets_cached_panel_ids() {
        let mut registry = DeviceRegistry { devices: Vec::new(), panel_index: HashMap::new(), panel_ids: vec![0, 1], gamma: GammaTable::build(1.0) };
        registry.clear();
        assert!(registry.panel_ids().is_empty());
    }
}
