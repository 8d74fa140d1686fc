/// A precomputed 256-entry lookup mapping a linear 8-bit channel value to
/// its gamma-corrected 8-bit value.
///
/// Built once per [`crate::registry::DeviceRegistry::init`] call and shared
/// read-only by every commit worker.
#[derive(Debug, Clone)]
pub struct GammaTable {
    table: [u8; 256],
}

impl GammaTable {
    /// `table[i] = round((i/255)^gamma * 255)`.
    pub fn build(gamma: f32) -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let normalized = i as f32 / 255.0;
            *entry = (normalized.powf(gamma) * 255.0 + 0.5) as u8;
        }
        Self { table }
    }

    #[inline]
    pub fn correct(&self, channel: u8) -> u8 {
        self.table[channel as usize]
    }
}

#[cfg(test)]
use quickcheck_macros::quickcheck;
