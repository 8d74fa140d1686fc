use std::io::Write;

use crate::device::Device;
use crate::encoder;
use crate::gamma::GammaTable;

/// Fans frame commit out across every registered [`Device`], one worker per
/// device, and joins before returning.
///
/// `std::thread::scope` gives the compiler, not a runtime convention, the
/// guarantee that workers touch disjoint state: each closure borrows
/// exactly one `&mut Device` plus the shared `&GammaTable`, so there is
/// nothing to lock.
pub fn commit(devices: &mut [Device], gamma: &GammaTable) {
    std::thread::scope(|scope| {
        for device in devices.iter_mut() {
            scope.spawn(move || commit_one(device, gamma));
        }
    });
}

fn commit_one(device: &mut Device, gamma: &GammaTable) {
    encoder::encode_with_gamma(device, gamma);
    if let Err(err) = device.port.write_all(&device.wire_buffer) {
        log::error!(
            "port {} (uuid {}): frame write failed, dropping this frame: {}",
            device.port_name,
            device.uuid,
            err
        );
    }
}
