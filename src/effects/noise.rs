/// Seeded 2-D gradient noise in roughly `-1..=1`.
#[derive(Clone, Debug)]
pub struct PerlinNoise {
    perm: [u8; 512],
}

impl PerlinNoise {
    /// Permutation shuffled with a Park-Miller generator seeded by `seed`.
    pub fn new(seed: u32) -> Self {
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        // A zero state would stall the generator.
        let mut n = u64::from(seed.max(1)) % 2_147_483_647;
        if n == 0 {
            n = 1;
        }
        for i in (1..256usize).rev() {
            n = (n * 16_807) % 2_147_483_647;
            let j = (n % (i as u64 + 1)) as usize;
            p.swap(i, j);
        }

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&p);
        perm[256..].copy_from_slice(&p);
        Self { perm }
    }

    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;

        let u = fade(x);
        let v = fade(y);

        let p = |i: usize| usize::from(self.perm[i]);
        let a = p(xi) + yi;
        let b = p(xi + 1) + yi;

        lerp(
            v,
            lerp(u, grad(p(a), x, y), grad(p(b), x - 1.0, y)),
            lerp(u, grad(p(a + 1), x, y - 1.0), grad(p(b + 1), x - 1.0, y - 1.0)),
        )
    }
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: usize, x: f64, y: f64) -> f64 {
    let h = hash & 3;
    let (u, v) = if h < 2 { (x, y) } else { (y, x) };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
