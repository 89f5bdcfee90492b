#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_read_back_unchanged() {
        let samples = [
            (0.0, 0.0),
            (20.0, -40.0),
            (-0.5, 1234.25),
            (f32::MAX, f32::MIN),
            (f32::MIN_POSITIVE, -f32::MIN_POSITIVE),
        ];

        for (x, y) in samples {
            let vector = Vec2::new(x, y);
            assert_eq!(vector.x.to_bits(), x.to_bits());
            assert_eq!(vector.y.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn default_is_origin() {
        assert_eq!(Vec2::default(), Vec2::ZERO);
    }
}
