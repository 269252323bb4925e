//! Tileable fractal Perlin noise in three dimensions.
//!
//! Every octave samples improved Perlin noise on a lattice that wraps after
//! `period` cells per axis. `base` shifts the lattice hashes so that equal
//! coordinates with different bases give unrelated values.

/// Ken Perlin's reference permutation.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

const GRADIENTS: [[f64; 3]; 16] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
    [1.0, 1.0, 0.0],
    [0.0, -1.0, 1.0],
    [-1.0, 1.0, 0.0],
    [0.0, -1.0, -1.0],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseParams {
    pub octaves: u32,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Lattice cells per axis before the first octave wraps.
    pub period: [u32; 3],
    pub base: i32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self { octaves: 1, persistence: 0.5, lacunarity: 2.0, period: [1024; 3], base: 0 }
    }
}

/// Fractal noise at `(x, y, z)`, roughly in `[-1, 1]`.
pub fn perlin3(x: f64, y: f64, z: f64, params: &NoiseParams) -> f64 {
    let mut frequency = 1.0;
    let mut amplitude = 1.0;
    let mut total = 0.0;
    let mut max = 0.0;

    for _ in 0..params.octaves.max(1) {
        let period = params.period.map(|cells| ((f64::from(cells) * frequency) as i32).max(1));
        total += lattice_noise(x * frequency, y * frequency, z * frequency, period, params.base)
            * amplitude;
        max += amplitude;
        frequency *= params.lacunarity;
        amplitude *= params.persistence;
    }

    total / max
}

fn perm(hash: i32) -> i32 {
    i32::from(PERMUTATION[(hash & 255) as usize])
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn gradient(hash: i32, x: f64, y: f64, z: f64) -> f64 {
    let [gx, gy, gz] = GRADIENTS[(hash & 15) as usize];
    gx * x + gy * y + gz * z
}

/// Lattice cell of `coordinate` and its successor, both wrapped by `period`.
fn cell(coordinate: f64, period: i32, base: i32) -> (i32, i32) {
    let low = (coordinate % f64::from(period)).floor() as i32;
    let high = (low + 1) % period;
    ((low & 255) + base, (high & 255) + base)
}

fn lattice_noise(x: f64, y: f64, z: f64, period: [i32; 3], base: i32) -> f64 {
    let (i, ii) = cell(x, period[0], base);
    let (j, jj) = cell(y, period[1], base);
    let (k, kk) = cell(z, period[2], base);

    let x = x - x.floor();
    let y = y - y.floor();
    let z = z - z.floor();
    let (fx, fy, fz) = (fade(x), fade(y), fade(z));

    let a = perm(i);
    let aa = perm(a + j);
    let ab = perm(a + jj);
    let b = perm(ii);
    let ba = perm(b + j);
    let bb = perm(b + jj);

    lerp(
        fz,
        lerp(
            fy,
            lerp(fx, gradient(perm(aa + k), x, y, z), gradient(perm(ba + k), x - 1.0, y, z)),
            lerp(
                fx,
                gradient(perm(ab + k), x, y - 1.0, z),
                gradient(perm(bb + k), x - 1.0, y - 1.0, z),
            ),
        ),
        lerp(
            fy,
            lerp(
                fx,
                gradient(perm(aa + kk), x, y, z - 1.0),
                gradient(perm(ba + kk), x - 1.0, y, z - 1.0),
            ),
            lerp(
                fx,
                gradient(perm(ab + kk), x, y - 1.0, z - 1.0),
                gradient(perm(bb + kk), x - 1.0, y - 1.0, z - 1.0),
            ),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vanishes_on_lattice_points() {
        let params = NoiseParams { octaves: 4, ..Default::default() };
        assert_eq!(perlin3(0.0, 0.0, 0.0, &params), 0.0);
        assert_eq!(perlin3(3.0, 7.0, 2.0, &params), 0.0);
    }

    #[test]
    fn is_deterministic_and_bounded() {
        let params =
            NoiseParams { octaves: 8, period: [1, 1, 512], base: 77, ..Default::default() };
        for step in 0..200 {
            let t = f64::from(step) * 0.37;
            let value = perlin3(t * 1.3, t * 0.7, t * 0.01, &params);
            assert_eq!(value, perlin3(t * 1.3, t * 0.7, t * 0.01, &params));
            assert!((-1.5..=1.5).contains(&value), "{value}");
        }
    }

    #[test]
    fn base_decorrelates_channels() {
        let red = NoiseParams { octaves: 8, base: 10, ..Default::default() };
        let green = NoiseParams { base: 29, ..red };
        let differing = (0..50)
            .filter(|&step| {
                let t = f64::from(step) * 0.41 + 0.13;
                perlin3(t, t * 0.5, 0.2, &red) != perlin3(t, t * 0.5, 0.2, &green)
            })
            .count();
        assert!(differing > 40);
    }

    #[test]
    fn wraps_along_the_period() {
        let params = NoiseParams { octaves: 3, period: [4, 4, 512], base: 3, ..Default::default() };
        let here = perlin3(0.3, 1.6, 0.25, &params);
        let wrapped = perlin3(0.3, 1.6, 512.25, &params);
        assert!((here - wrapped).abs() < 1e-9);
    }
}
