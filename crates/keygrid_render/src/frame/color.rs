use rand::Rng;

/// Saturate an intermediate channel value into the 8-bit range.
pub fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// One light's color. Channels are always in `[0, 255]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_channels([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }

    /// Index of the brightest channel, 0 = red. Ties resolve to the lowest index.
    pub fn dominant_channel(self) -> usize {
        let channels = self.channels();
        let mut dominant = 0;
        for (index, &value) in channels.iter().enumerate().skip(1) {
            if value > channels[dominant] {
                dominant = index;
            }
        }
        dominant
    }

    /// Shift every channel independently by an offset drawn from
    /// `[-variety/2, variety/2)` and clamp the result.
    pub fn perturbed<R: Rng + ?Sized>(self, rng: &mut R, variety: u16) -> Self {
        let channels = self.channels().map(|channel| {
            let offset = jitter(rng, variety);
            clamp(i32::from(channel) + offset)
        });
        Self::from_channels(channels)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

/// Uniform signed offset in `[-variety/2, variety/2)`, floor division on both ends.
///
/// An empty range yields zero so that `variety == 0` degenerates to no perturbation.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, variety: u16) -> i32 {
    let variety = i32::from(variety);
    let low = (-variety).div_euclid(2);
    let high = variety.div_euclid(2);
    if low >= high {
        return 0;
    }
    rng.gen_range(low..high)
}

/// A color biased toward one channel.
///
/// The two other channels are drawn without replacement from `0..variety`
/// repeated three times; the dominant channel is then replaced with a value
/// from `256 - variety .. 256`. `variety` is clamped into `1..=256`.
pub fn random_variant<R: Rng + ?Sized>(rng: &mut R, dominant: usize, variety: u16) -> Rgb {
    let variety = variety.clamp(1, 256);
    let pool_len = usize::from(variety) * 3;
    let mut channels = [0u8; 3];
    for (slot, pick) in channels.iter_mut().zip(rand::seq::index::sample(rng, pool_len, 3)) {
        *slot = (pick % usize::from(variety)) as u8;
    }
    let floor = 256 - variety;
    channels[dominant.min(2)] = rng.gen_range(floor..256) as u8;
    Rgb::from_channels(channels)
}
