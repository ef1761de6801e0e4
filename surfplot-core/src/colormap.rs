use std::fmt;
use std::str::FromStr;

/// The fixed, ordered set of color maps offered by the sidebar.
///
/// The order is part of the UI contract: the color map option stores an
/// index into [`ColorMap::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMap {
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Jet,
    Coolwarm,
}

const COOLWARM: [(f64, (f64, f64, f64)); 5] = [
    (0.0, (59.0, 76.0, 192.0)),
    (0.25, (141.0, 176.0, 254.0)),
    (0.5, (221.0, 221.0, 221.0)),
    (0.75, (244.0, 154.0, 123.0)),
    (1.0, (180.0, 4.0, 38.0)),
];

impl ColorMap {
    pub const ALL: [ColorMap; 6] = [
        ColorMap::Viridis,
        ColorMap::Plasma,
        ColorMap::Inferno,
        ColorMap::Magma,
        ColorMap::Jet,
        ColorMap::Coolwarm,
    ];

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|idx| Self::ALL.get(idx))
            .copied()
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|cmap| *cmap == self)
            .unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorMap::Viridis => "viridis",
            ColorMap::Plasma => "plasma",
            ColorMap::Inferno => "inferno",
            ColorMap::Magma => "magma",
            ColorMap::Jet => "jet",
            ColorMap::Coolwarm => "coolwarm",
        }
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|cmap| cmap.name().to_string()).collect()
    }

    /// Samples the map at `t`, clamped to `[0, 1]`.
    pub fn sample(self, t: f64) -> (u8, u8, u8) {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let gradient = match self {
            ColorMap::Viridis => colorous::VIRIDIS,
            ColorMap::Plasma => colorous::PLASMA,
            ColorMap::Inferno => colorous::INFERNO,
            ColorMap::Magma => colorous::MAGMA,
            ColorMap::Jet => return jet(t),
            ColorMap::Coolwarm => return interpolate(&COOLWARM, t),
        };
        let color = gradient.eval_continuous(t);
        (color.r, color.g, color.b)
    }
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|cmap| cmap.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown color map '{s}'"))
    }
}

fn jet(t: f64) -> (u8, u8, u8) {
    let channel = |center: f64| ((1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0) * 255.0).round() as u8;
    (channel(3.0), channel(2.0), channel(1.0))
}

fn interpolate(anchors: &[(f64, (f64, f64, f64))], t: f64) -> (u8, u8, u8) {
    let upper = anchors
        .iter()
        .position(|(at, _)| *at >= t)
        .unwrap_or(anchors.len() - 1)
        .max(1);
    let (t0, (r0, g0, b0)) = anchors[upper - 1];
    let (t1, (r1, g1, b1)) = anchors[upper];
    let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
    let mix = |a: f64, b: f64| (a + (b - a) * f).round().clamp(0.0, 255.0) as u8;
    (mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolwarm_hits_its_anchors() {
        assert_eq!(ColorMap::Coolwarm.sample(0.0), (59, 76, 192));
        assert_eq!(ColorMap::Coolwarm.sample(0.5), (221, 221, 221));
        assert_eq!(ColorMap::Coolwarm.sample(1.0), (180, 4, 38));
    }

    #[test]
    fn jet_runs_blue_to_red() {
        let (r0, _, b0) = ColorMap::Jet.sample(0.0);
        let (r1, _, b1) = ColorMap::Jet.sample(1.0);
        assert!(b0 > r0);
        assert!(r1 > b1);
    }
}
